//! Error types for the command compiler.
//!
//! Every variant describes one rejected line. Clause-level errors carry the
//! 0-based index of the clause that failed so an editor can highlight it.

/// Errors produced while compiling one line of the command language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// The line has no `:` between group name and actions.
    #[error("missing ':' between group name and actions")]
    MissingGroupSeparator,

    /// Nothing follows the `:`.
    #[error("no actions after ':'")]
    NoActions,

    /// The first word of a clause is not a known verb.
    #[error("clause {clause}: unknown verb '{verb}'")]
    UnknownVerb {
        /// Index of the offending clause.
        clause: usize,
        /// The word that was read as a verb.
        verb: String,
    },

    /// The clause has too few or too many parameters for its verb.
    #[error("clause {clause}: '{verb}' takes {min} to {max} parameters, found {found}")]
    WrongArgumentCount {
        /// Index of the offending clause.
        clause: usize,
        /// Verb of the clause.
        verb: String,
        /// Fewest parameters accepted (frequency keyword excluded).
        min: usize,
        /// Most parameters accepted (frequency keyword included).
        max: usize,
        /// Parameters supplied.
        found: usize,
    },

    /// A parameter could not be converted to the type its slot requires.
    #[error("clause {clause}: '{verb}' expected {expected}, got '{value}'")]
    WrongArgumentType {
        /// Index of the offending clause.
        clause: usize,
        /// Verb of the clause.
        verb: String,
        /// The raw token.
        value: String,
        /// Human-readable description of the slot type.
        expected: &'static str,
    },

    /// The frequency slot holds a word that is not a frequency keyword.
    #[error("clause {clause}: '{verb}' has unknown frequency '{keyword}'")]
    UnknownFrequency {
        /// Index of the offending clause.
        clause: usize,
        /// Verb of the clause.
        verb: String,
        /// The rejected word.
        keyword: String,
    },
}

impl CompileError {
    /// Index of the clause that failed, if the error is clause-level.
    pub const fn clause(&self) -> Option<usize> {
        match self {
            Self::MissingGroupSeparator | Self::NoActions => None,
            Self::UnknownVerb { clause, .. }
            | Self::WrongArgumentCount { clause, .. }
            | Self::WrongArgumentType { clause, .. }
            | Self::UnknownFrequency { clause, .. } => Some(*clause),
        }
    }
}
