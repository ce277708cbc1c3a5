//! Tick callback that publishes world snapshots for a renderer.
//!
//! There is no window in this binary. Each snapshot is serialised to JSON
//! and emitted on the `brunzit::frame` tracing target, so a renderer (or a
//! person with `RUST_LOG=brunzit::frame=trace`) can follow along.

use brunzit_core::Runtime;
use brunzit_core::runner::TickCallback;
use brunzit_core::tick::TickSummary;
use brunzit_types::WorldSnapshot;
use tracing::{Level, trace, warn};

/// Target the frame records are logged under.
pub const FRAME_TARGET: &str = "brunzit::frame";

/// Emits one JSON snapshot every `every` ticks.
#[derive(Debug, Clone, Copy)]
pub struct FrameFeed {
    every: u64,
    published: u64,
}

impl FrameFeed {
    /// Publish every `every` ticks. Zero is treated as one.
    pub const fn new(every: u64) -> Self {
        Self {
            every: if every == 0 { 1 } else { every },
            published: 0,
        }
    }

    /// Frames published so far.
    pub const fn published(&self) -> u64 {
        self.published
    }

    fn due(&self, tick: u64) -> bool {
        tick % self.every == 0 && tracing::enabled!(target: FRAME_TARGET, Level::TRACE)
    }
}

/// Serialise a snapshot to a single JSON line.
pub fn encode_frame(snapshot: &WorldSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(snapshot)
}

impl TickCallback for FrameFeed {
    fn on_tick(&mut self, summary: &TickSummary, runtime: &Runtime) {
        if !self.due(summary.tick) {
            return;
        }
        match encode_frame(&runtime.snapshot()) {
            Ok(frame) => {
                trace!(target: FRAME_TARGET, tick = summary.tick, frame, "frame");
                self.published = self.published.saturating_add(1);
            }
            Err(e) => {
                warn!(tick = summary.tick, error = %e, "failed to encode frame");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use brunzit_agents::FlockConfig;

    use super::*;

    #[test]
    fn zero_interval_means_every_tick() {
        let feed = FrameFeed::new(0);
        assert_eq!(feed.every, 1);
        assert_eq!(feed.published(), 0);
    }

    #[test]
    fn frame_is_single_line_json() {
        let mut rt = Runtime::with_seed(FlockConfig::default(), 5);
        rt.execute("world: make birds 3").unwrap();
        rt.tick().unwrap();
        let frame = encode_frame(&rt.snapshot()).unwrap();
        assert!(!frame.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["flocks"][0]["agents"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn nothing_published_without_a_subscriber() {
        let mut rt = Runtime::with_seed(FlockConfig::default(), 5);
        let summary = rt.tick().unwrap();
        let mut feed = FrameFeed::new(1);
        feed.on_tick(&summary, &rt);
        assert_eq!(feed.published(), 0);
    }
}
