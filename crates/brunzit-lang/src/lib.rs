//! The Brunzit command language.
//!
//! One line of text names a group and lists comma-separated clauses:
//!
//! ```text
//! birds: avoid 20, join 60 0.5, go 1.5
//! world: make birds 40 triangle orange, background navy
//! ```
//!
//! [`Compiler`] turns such a line into a [`Program`] of typed actions or a
//! single [`CompileError`]. It depends only on the shared action vocabulary
//! in `brunzit-types` and the name tables in [`Lexicon`].
//!
//! # Modules
//!
//! - [`compiler`] -- Line splitting, verb contracts, parameter conversion
//! - [`error`] -- Compile errors ([`CompileError`])
//! - [`lexicon`] -- Icon aliases and named colours

pub mod compiler;
pub mod error;
pub mod lexicon;

pub use compiler::{Compiler, Program, split_target};
pub use error::CompileError;
pub use lexicon::{Lexicon, normalize_color_name};
