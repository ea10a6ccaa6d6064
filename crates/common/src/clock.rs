//! Session clock for per-frame timestamps.
//!
//! Every leveling session is anchored to a monotonic epoch recorded when
//! the first frame is requested. Frame records carry seconds relative to
//! that epoch, and the wall-clock start is kept for reports.

use std::time::Instant;

/// A monotonic clock anchored to the start of a leveling session.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Average frames per second for `frames` processed so far.
    pub fn throughput_fps(&self, frames: u64) -> f64 {
        let secs = self.elapsed_secs();
        if secs <= 0.0 {
            return 0.0;
        }
        frames as f64 / secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = SessionClock::start();
        let secs = clock.elapsed_secs();
        assert!((0.0..1.0).contains(&secs));
    }

    #[test]
    fn test_epoch_wall_is_rfc3339() {
        let clock = SessionClock::start();
        assert!(chrono::DateTime::parse_from_rfc3339(clock.epoch_wall()).is_ok());
    }

    #[test]
    fn test_throughput_without_frames() {
        let clock = SessionClock::start();
        assert_eq!(clock.throughput_fps(0), 0.0);
    }
}
