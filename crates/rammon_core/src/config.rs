use std::time::Duration;

use typed_builder::TypedBuilder;

use crate::{DEFAULT_BREAKPOINT_CAPACITY, DEFAULT_MEMORY_SIZE};

/// Settle time between driving read data and releasing the bus.
pub const DATA_SETTLE: Duration = Duration::from_micros(1);
/// Half period of the monitor-driven clock while stepping.
pub const CLOCK_HALF_PERIOD: Duration = Duration::from_micros(1);
/// How long reset is held asserted during a CPU reset.
pub const RESET_PULSE: Duration = Duration::from_millis(10);
/// How long to wait for the argument bytes of a command.
pub const ARG_TIMEOUT: Duration = Duration::from_millis(500);
/// Pause inserted when a polling pass finds nothing to do.
pub const IDLE_BACKOFF: Duration = Duration::from_micros(50);
/// Clock pulses allowed per step before giving up on SYNC.
pub const STEP_CYCLE_LIMIT: u32 = 1000;

/// Tunable parameters of a monitor instance.
///
/// The defaults match the target board: 4 KiB of emulated RAM, ten
/// breakpoint slots, microsecond-scale bus timing. Tests shrink the
/// timings to keep suites fast.
#[derive(Clone, Debug, TypedBuilder)]
pub struct MonitorConfig {
    /// Bytes of emulated memory, decoded from address 0 upward.
    #[builder(default = DEFAULT_MEMORY_SIZE)]
    pub memory_size: usize,
    /// Breakpoint slots available before `B` starts reporting
    /// exhaustion.
    #[builder(default = DEFAULT_BREAKPOINT_CAPACITY)]
    pub breakpoint_capacity: usize,
    #[builder(default = DATA_SETTLE)]
    pub data_settle: Duration,
    #[builder(default = CLOCK_HALF_PERIOD)]
    pub clock_half_period: Duration,
    #[builder(default = RESET_PULSE)]
    pub reset_pulse: Duration,
    /// Upper bound on clock pulses per single step; a CPU that never
    /// raises SYNC within this many cycles is reported instead of
    /// hanging the monitor.
    #[builder(default = STEP_CYCLE_LIMIT)]
    pub step_cycle_limit: u32,
    #[builder(default = ARG_TIMEOUT)]
    pub arg_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_target_board() {
        let config = MonitorConfig::default();
        assert_eq!(config.memory_size, 4096);
        assert_eq!(config.breakpoint_capacity, 10);
        assert_eq!(config.reset_pulse, Duration::from_millis(10));
        assert_eq!(config.step_cycle_limit, 1000);
    }

    #[test]
    fn builder_overrides_selected_fields() {
        let config = MonitorConfig::builder()
            .memory_size(64)
            .step_cycle_limit(8)
            .build();
        assert_eq!(config.memory_size, 64);
        assert_eq!(config.step_cycle_limit, 8);
        assert_eq!(config.breakpoint_capacity, 10);
    }
}
