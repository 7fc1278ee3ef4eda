use crate::bus::{BusSample, CpuBus};
use crate::delay::DelaySource;
use crate::monitor::Monitor;
use crate::OPEN_BUS_BYTE;

/// What [`Monitor::service_cycle`] saw and did for one bus cycle.
#[derive(Clone, Copy, Debug)]
pub struct CycleOutcome {
    /// The sample the cycle was serviced against.
    pub sample: BusSample,
    /// Set when the address matched a breakpoint; the cycle was then
    /// left unanswered and the monitor halted itself.
    pub breakpoint: Option<u16>,
}

impl Monitor {
    /// Answers the bus cycle the CPU is presenting right now.
    ///
    /// Must be called while the current clock phase is stable: the
    /// address and R/W lines are sampled once, checked against the
    /// breakpoint table, and then either read data is driven for the
    /// settle window or write data is latched into memory. The whole
    /// path is straight-line so a cycle is always finished inside one
    /// phase.
    ///
    /// Accesses outside emulated memory follow open-bus rules: reads
    /// see [`OPEN_BUS_BYTE`], writes are dropped.
    pub fn service_cycle(
        &mut self,
        bus: &mut impl CpuBus,
        delay: &mut impl DelaySource,
    ) -> CycleOutcome {
        let sample = bus.sample();

        if self.breakpoints().contains(sample.address) {
            // Leave the cycle unanswered so the CPU freezes on the
            // breakpoint address instead of past it.
            self.halt();
            bus.release_data();
            log::debug!("breakpoint hit at {:#06X}", sample.address);
            return CycleOutcome {
                sample,
                breakpoint: Some(sample.address),
            };
        }

        if sample.read {
            let value = self
                .memory()
                .read(sample.address)
                .unwrap_or(OPEN_BUS_BYTE);
            bus.drive_data(value);
            delay.delay(self.config().data_settle);
            bus.release_data();
        } else {
            bus.release_data();
            let value = bus.sample_data();
            if let Err(err) = self.memory_mut().write(sample.address, value) {
                log::debug!("dropped out-of-range write: {err}");
            }
        }

        CycleOutcome {
            sample,
            breakpoint: None,
        }
    }
}
