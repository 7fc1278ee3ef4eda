use std::time::{Duration, Instant};

/// Source of the short settle and clock delays the monitor inserts
/// between line changes.
///
/// Real attachments need wall-clock pauses; tests substitute a counting
/// stub so suites finish instantly and can assert how long a sequence
/// would have taken.
pub trait DelaySource {
    fn delay(&mut self, duration: Duration);
}

/// Threshold below which sleeping is less accurate than spinning.
const SPIN_THRESHOLD: Duration = Duration::from_millis(1);

/// Wall-clock delays: OS sleep for long pauses, busy-wait for the
/// microsecond-scale settle times where `thread::sleep` overshoots by
/// orders of magnitude.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpinDelay;

impl DelaySource for SpinDelay {
    fn delay(&mut self, duration: Duration) {
        if duration >= SPIN_THRESHOLD {
            std::thread::sleep(duration);
            return;
        }
        let deadline = Instant::now() + duration;
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }
}
