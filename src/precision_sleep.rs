use std::thread;
use std::time::{Duration, Instant};

/// Blocking hold of the output line for a pulse duration.
pub trait Delay {
    fn delay(&mut self, duration: Duration);
}

/// Hybrid sleep: one coarse blocking sleep for most of the duration, then
/// short re-sleeps while polling the monotonic clock until the deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecisionSleep;

impl PrecisionSleep {
    /// Longest re-sleep once the coarse sleep is over.
    pub const RESLEEP_SLICE: Duration = Duration::from_micros(1);

    pub fn new() -> Self {
        Self
    }

    pub fn sleep(duration: Duration) {
        let deadline = Instant::now() + duration;

        // block for 99%, then re-sleep in slices until the deadline
        let coarse = duration - duration / 100;
        if !coarse.is_zero() {
            thread::sleep(coarse);
        }

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            thread::sleep(Self::next_slice(remaining));
        }
    }

    fn next_slice(remaining: Duration) -> Duration {
        remaining.min(Self::RESLEEP_SLICE)
    }
}

impl Delay for PrecisionSleep {
    fn delay(&mut self, duration: Duration) {
        Self::sleep(duration);
    }
}
