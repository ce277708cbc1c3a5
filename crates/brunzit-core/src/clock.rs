//! Frame clock: the tick counter and the fixed frame cadence.
//!
//! One tick is one rendered frame. The counter uses checked arithmetic so
//! it can never wrap silently.

use std::time::Duration;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// A frame rate of zero has no frame interval.
    #[error("frame rate must be at least 1")]
    ZeroFrameRate,
}

/// Tick counter paired with the target frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    /// Ticks completed so far (0 before the first tick).
    tick: u64,
    /// Target ticks per second.
    frame_rate: u32,
}

impl FrameClock {
    /// Frame rate used when none is configured.
    pub const DEFAULT_FRAME_RATE: u32 = 30;

    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::ZeroFrameRate`] if `frame_rate` is 0.
    pub const fn new(frame_rate: u32) -> Result<Self, ClockError> {
        if frame_rate == 0 {
            return Err(ClockError::ZeroFrameRate);
        }
        Ok(Self {
            tick: 0,
            frame_rate,
        })
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub const fn advance(&mut self) -> Result<u64, ClockError> {
        match self.tick.checked_add(1) {
            Some(tick) => {
                self.tick = tick;
                Ok(tick)
            }
            None => Err(ClockError::TickOverflow),
        }
    }

    /// Ticks completed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Target ticks per second.
    pub const fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Wall-clock time between two ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate))
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            tick: 0,
            frame_rate: Self::DEFAULT_FRAME_RATE,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_advances() {
        let mut clock = FrameClock::new(30).unwrap();
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn zero_frame_rate_rejected() {
        assert!(matches!(FrameClock::new(0), Err(ClockError::ZeroFrameRate)));
    }

    #[test]
    fn frame_interval_from_rate() {
        let clock = FrameClock::new(50).unwrap();
        assert_eq!(clock.frame_interval(), Duration::from_millis(20));
        assert_eq!(FrameClock::default().frame_rate(), 30);
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = FrameClock {
            tick: u64::MAX,
            frame_rate: 30,
        };
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
        assert_eq!(clock.tick(), u64::MAX);
    }
}
