use crate::bus::CpuBus;
use crate::delay::DelaySource;
use crate::error::MonitorError;
use crate::monitor::{Monitor, RunState};

/// Where the step loop is in the SYNC envelope of one instruction.
///
/// SYNC rises on the opcode-fetch cycle and falls once the fetch is
/// done; rise followed by fall therefore brackets exactly one
/// instruction boundary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SyncPhase {
    AwaitRise,
    AwaitFall,
}

/// Result of a completed single step.
#[derive(Clone, Copy, Debug)]
pub struct StepOutcome {
    /// Clock pulses issued.
    pub cycles: u32,
    /// Set when a breakpoint ended the step early. The CPU is parked on
    /// that address and the instruction did not finish.
    pub breakpoint: Option<u16>,
}

impl Monitor {
    /// Advances the CPU by exactly one instruction.
    ///
    /// The monitor takes over the clock line, pulsing it and servicing
    /// the resulting bus cycles until SYNC has risen and fallen again.
    /// The monitor ends Halted; the clock line ends low.
    ///
    /// A CPU that never produces the SYNC edges within the configured
    /// cycle limit yields [`MonitorError::StepTimeout`] rather than an
    /// unbounded loop on a wedged target.
    pub fn step_instruction(
        &mut self,
        bus: &mut impl CpuBus,
        delay: &mut impl DelaySource,
    ) -> Result<StepOutcome, MonitorError> {
        // Stepping implies halted; the free-running loop must not also
        // be answering cycles.
        self.halt();

        let half = self.config().clock_half_period;
        let limit = self.config().step_cycle_limit;
        let mut phase = SyncPhase::AwaitRise;

        for cycles in 1..=limit {
            bus.set_clock(true);
            delay.delay(half);
            bus.set_clock(false);
            delay.delay(half);

            let outcome = self.service_cycle(bus, delay);
            if let Some(addr) = outcome.breakpoint {
                // The cycle went unanswered, so re-pulsing the clock
                // would only replay the same fetch. Abort the step.
                return Ok(StepOutcome {
                    cycles,
                    breakpoint: Some(addr),
                });
            }

            match phase {
                SyncPhase::AwaitRise if outcome.sample.sync => phase = SyncPhase::AwaitFall,
                SyncPhase::AwaitFall if !outcome.sample.sync => {
                    log::debug!("step complete after {cycles} cycles");
                    debug_assert_eq!(self.run_state(), RunState::Halted);
                    return Ok(StepOutcome {
                        cycles,
                        breakpoint: None,
                    });
                }
                _ => {}
            }
        }

        Err(MonitorError::StepTimeout { cycles: limit })
    }
}
