use crate::breakpoint::BreakpointTable;
use crate::bus::CpuBus;
use crate::config::MonitorConfig;
use crate::delay::DelaySource;
use crate::memory::MemoryStore;

/// Whether the monitor is currently answering CPU bus cycles.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunState {
    /// Bus cycles are serviced; the CPU makes progress.
    Running,
    /// Bus cycles are ignored; the CPU is stalled mid-cycle.
    Halted,
}

/// The monitor proper: emulated memory, breakpoints and run state.
///
/// A `Monitor` owns no bus or channel. Both are passed into the
/// operations that need them, which keeps the core free of platform
/// types and lets one test drive it with scripted stand-ins.
pub struct Monitor {
    mem: MemoryStore,
    breakpoints: BreakpointTable,
    run_state: RunState,
    config: MonitorConfig,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            mem: MemoryStore::new(config.memory_size),
            breakpoints: BreakpointTable::new(config.breakpoint_capacity),
            run_state: RunState::Running,
            config,
        }
    }

    /// Pulses the reset line and leaves the CPU running.
    ///
    /// Memory and breakpoints survive a reset; only the CPU restarts.
    pub fn reset_cpu(&mut self, bus: &mut impl CpuBus, delay: &mut impl DelaySource) {
        log::info!("resetting cpu ({:?} pulse)", self.config.reset_pulse);
        bus.set_reset(true);
        delay.delay(self.config.reset_pulse);
        bus.set_reset(false);
        self.run_state = RunState::Running;
    }

    /// Stops servicing bus cycles. The CPU stalls on its next access.
    pub fn halt(&mut self) {
        self.run_state = RunState::Halted;
    }

    /// Resumes servicing bus cycles.
    pub fn resume(&mut self) {
        self.run_state = RunState::Running;
    }

    #[inline]
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    #[inline]
    pub fn memory(&self) -> &MemoryStore {
        &self.mem
    }

    #[inline]
    pub fn memory_mut(&mut self) -> &mut MemoryStore {
        &mut self.mem
    }

    #[inline]
    pub fn breakpoints(&self) -> &BreakpointTable {
        &self.breakpoints
    }

    #[inline]
    pub fn breakpoints_mut(&mut self) -> &mut BreakpointTable {
        &mut self.breakpoints
    }

    #[inline]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}
