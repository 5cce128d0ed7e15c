//! Elapsed time between two checkpoints.

use std::time::{Duration, Instant};

/// Measures time since the last meaningful event
///
/// Both checkpoints start at construction time, so `elapsed()` is zero until
/// the first `update()`. Each `update()` moves the end checkpoint to the
/// start and stamps a fresh end, keeping `end >= start`.
#[derive(Debug, Clone, Copy)]
pub struct DeltaTimer {
    start: Instant,
    end: Instant,
}

impl DeltaTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            end: now,
        }
    }

    /// Shift the end checkpoint to the start and stamp a new end
    pub fn update(&mut self) {
        self.start = self.end;
        self.end = Instant::now();
    }

    /// Duration between the two checkpoints
    pub fn elapsed(&self) -> Duration {
        self.end.duration_since(self.start)
    }
}

impl Default for DeltaTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a duration as `"{h}h {m}m {s}s"`
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_timer_is_zero() {
        let timer = DeltaTimer::new();
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_update_measures_since_previous_checkpoint() {
        let mut timer = DeltaTimer::new();
        std::thread::sleep(Duration::from_millis(20));
        timer.update();
        let first = timer.elapsed();
        assert!(first >= Duration::from_millis(20));

        // Second update only spans the time since the first one
        timer.update();
        assert!(timer.elapsed() < first);
    }

    #[test]
    fn test_elapsed_is_pure() {
        let mut timer = DeltaTimer::new();
        std::thread::sleep(Duration::from_millis(5));
        timer.update();
        let a = timer.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(a, timer.elapsed());
    }

    #[test]
    fn test_independent_timers() {
        let mut a = DeltaTimer::new();
        let b = DeltaTimer::new();
        std::thread::sleep(Duration::from_millis(5));
        a.update();
        assert!(a.elapsed() > Duration::ZERO);
        assert_eq!(b.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0h 0m 0s");
        assert_eq!(format_duration(Duration::from_secs(252)), "0h 4m 12s");
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h 2m 3s");
    }
}
