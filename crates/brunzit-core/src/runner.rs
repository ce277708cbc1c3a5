//! Live session loop: fixed-cadence ticks interleaved with submitted lines.
//!
//! [`run_session`] drives a [`Runtime`] from any line-oriented async input
//! (stdin in the engine, an in-memory pipe in tests). Ticks and submissions
//! run on the same task, so a line is always fully applied before the next
//! tick begins.
//!
//! The session ends when the input closes, when the shutdown future
//! resolves, or after `max_ticks` ticks.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::clock::ClockError;
use crate::runtime::Runtime;
use crate::tick::TickSummary;

/// Errors that end a session early.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Reading the input failed.
    #[error("input error: {source}")]
    Input {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEndReason {
    /// The input reached end of file.
    InputClosed,
    /// The shutdown signal fired.
    Shutdown,
    /// The configured tick limit was reached.
    TickLimit,
}

/// Knobs for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Time between ticks.
    pub frame_interval: Duration,
    /// Stop after this many ticks. `None` runs until input or shutdown.
    pub max_ticks: Option<u64>,
    /// Log a summary every this many ticks. Zero disables it.
    pub summary_interval_ticks: u64,
}

impl SessionOptions {
    /// Options for an unbounded session at the runtime's frame rate.
    pub fn for_runtime(runtime: &Runtime, summary_interval_ticks: u64) -> Self {
        Self {
            frame_interval: runtime.clock().frame_interval(),
            max_ticks: None,
            summary_interval_ticks,
        }
    }
}

/// Result of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    /// Why the session ended.
    pub end_reason: SessionEndReason,
    /// Ticks executed during the session.
    pub total_ticks: u64,
    /// Lines accepted by the runtime.
    pub lines_accepted: u64,
    /// Lines rejected by the runtime.
    pub lines_rejected: u64,
    /// The last tick summary, if any tick ran.
    pub final_summary: Option<TickSummary>,
}

/// Callback invoked after each tick, typically to hand a snapshot to a
/// renderer.
pub trait TickCallback {
    /// Called after a tick completes.
    fn on_tick(&mut self, summary: &TickSummary, runtime: &Runtime);
}

/// A callback that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _runtime: &Runtime) {}
}

/// Run a session until input closes, `shutdown` resolves, or the tick
/// limit is reached.
///
/// Rejected lines are logged and counted; they never end the session.
///
/// # Errors
///
/// Returns [`RunnerError`] if reading input fails or the clock overflows.
pub async fn run_session<I, S>(
    runtime: &mut Runtime,
    input: I,
    shutdown: S,
    options: SessionOptions,
    callback: &mut dyn TickCallback,
) -> Result<SessionResult, RunnerError>
where
    I: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut interval = tokio::time::interval(options.frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut result = SessionResult {
        end_reason: SessionEndReason::InputClosed,
        total_ticks: 0,
        lines_accepted: 0,
        lines_rejected: 0,
        final_summary: None,
    };

    info!(
        frame_interval_ms = options.frame_interval.as_millis(),
        max_ticks = options.max_ticks,
        "session starting"
    );

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!("shutdown requested");
                result.end_reason = SessionEndReason::Shutdown;
                break;
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed");
                    result.end_reason = SessionEndReason::InputClosed;
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match runtime.execute(&line) {
                    Ok(submission) => {
                        result.lines_accepted = result.lines_accepted.saturating_add(1);
                        info!(line, ?submission, "line accepted");
                    }
                    Err(e) => {
                        result.lines_rejected = result.lines_rejected.saturating_add(1);
                        warn!(line, error = %e, "line rejected");
                    }
                }
            }

            _ = interval.tick() => {
                let summary = runtime.tick()?;
                result.total_ticks = result.total_ticks.saturating_add(1);
                callback.on_tick(&summary, runtime);

                if options.summary_interval_ticks > 0
                    && summary.tick % options.summary_interval_ticks == 0
                {
                    info!(
                        tick = summary.tick,
                        agents_alive = summary.agents_alive,
                        groups = runtime.group_names().count(),
                        "session summary"
                    );
                }
                result.final_summary = Some(summary);

                if options.max_ticks.is_some_and(|max| result.total_ticks >= max) {
                    info!(total_ticks = result.total_ticks, "tick limit reached");
                    result.end_reason = SessionEndReason::TickLimit;
                    break;
                }
            }
        }
    }

    Ok(result)
}

/// Log how a session ended.
pub fn log_session_end(result: &SessionResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        lines_accepted = result.lines_accepted,
        lines_rejected = result.lines_rejected,
        final_agents_alive = result.final_summary.as_ref().map(|s| s.agents_alive),
        "session ended"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::pending;

    use brunzit_agents::FlockConfig;
    use tokio::io::{AsyncWriteExt, BufReader};

    use super::*;

    fn options(max_ticks: Option<u64>) -> SessionOptions {
        SessionOptions {
            frame_interval: Duration::from_millis(10),
            max_ticks,
            summary_interval_ticks: 0,
        }
    }

    #[derive(Default)]
    struct Counter(u64);

    impl TickCallback for Counter {
        fn on_tick(&mut self, _summary: &TickSummary, _runtime: &Runtime) {
            self.0 += 1;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn input_closing_ends_session() {
        let mut runtime = Runtime::with_seed(FlockConfig::default(), 1);
        let input: &[u8] = b"world: make birds 5\nbirds: go\nghost: go\n\n";
        let result = run_session(&mut runtime, input, pending(), options(None), &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SessionEndReason::InputClosed);
        assert_eq!(result.lines_accepted, 2);
        assert_eq!(result.lines_rejected, 1);
        assert!(runtime.has_group("birds"));
    }

    #[tokio::test(start_paused = true)]
    async fn tick_limit_ends_session() {
        let mut runtime = Runtime::with_seed(FlockConfig::default(), 1);
        let (mut writer, reader) = tokio::io::duplex(256);
        writer.write_all(b"world: make birds 3\nbirds: right, go\n").await.unwrap();

        let mut counter = Counter::default();
        let result = run_session(
            &mut runtime,
            BufReader::new(reader),
            pending(),
            options(Some(5)),
            &mut counter,
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, SessionEndReason::TickLimit);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(counter.0, 5);
        assert_eq!(runtime.clock().tick(), 5);
        assert_eq!(result.final_summary.unwrap().agents_alive, 3);
        drop(writer);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_ends_session() {
        let mut runtime = Runtime::with_seed(FlockConfig::default(), 1);
        let (_writer, reader) = tokio::io::duplex(64);
        let shutdown = tokio::time::sleep(Duration::from_millis(35));

        let result = run_session(
            &mut runtime,
            BufReader::new(reader),
            shutdown,
            options(None),
            &mut NoOpCallback,
        )
        .await
        .unwrap();

        assert_eq!(result.end_reason, SessionEndReason::Shutdown);
        assert!(result.total_ticks >= 3);
    }
}
