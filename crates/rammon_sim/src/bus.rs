use bitflags::bitflags;

use rammon_core::{BusSample, CpuBus};

use crate::cpu::ScriptedCpu;

bitflags! {
    /// Monitor-driven control lines; a set bit means asserted.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct ControlLines: u8 {
        const CLOCK = 1 << 0;
        const RESET = 1 << 1;
        const IRQ = 1 << 2;
        const NMI = 1 << 3;
    }
}

/// Software bus attachment wiring a [`ScriptedCpu`] to the monitor.
///
/// The transaction handshake mirrors the physical one: a read is
/// complete when the monitor drives the data bus and releases it again
/// (the CPU latches on release), a write is complete when the monitor
/// samples the CPU's byte. Releasing without having driven anything is
/// a no-op, which is exactly what a breakpoint stop does, so a stopped
/// CPU stays parked on its cycle.
pub struct SimBus {
    cpu: ScriptedCpu,
    control: ControlLines,
    driven: Option<u8>,
    clock_pulses: u64,
    contentions: u64,
}

impl SimBus {
    pub fn new(cpu: ScriptedCpu) -> Self {
        SimBus {
            cpu,
            control: ControlLines::empty(),
            driven: None,
            clock_pulses: 0,
            contentions: 0,
        }
    }

    #[inline]
    pub fn cpu(&self) -> &ScriptedCpu {
        &self.cpu
    }

    #[inline]
    pub fn cpu_mut(&mut self) -> &mut ScriptedCpu {
        &mut self.cpu
    }

    #[inline]
    pub fn control(&self) -> ControlLines {
        self.control
    }

    /// Rising clock edges seen so far.
    #[inline]
    pub fn clock_pulses(&self) -> u64 {
        self.clock_pulses
    }

    /// Times both sides drove the data bus at once. Stays zero under a
    /// correct memory system.
    #[inline]
    pub fn contentions(&self) -> u64 {
        self.contentions
    }
}

impl CpuBus for SimBus {
    fn sample(&mut self) -> BusSample {
        let cycle = self.cpu.current();
        BusSample {
            address: cycle.address(),
            read: cycle.is_read(),
            sync: cycle.is_fetch(),
        }
    }

    fn sample_data(&mut self) -> u8 {
        match self.cpu.current() {
            crate::cpu::CpuCycle::Write(_, value) => {
                self.cpu.complete_write();
                value
            }
            // Nothing is driving the bus from the CPU side.
            _ => rammon_core::OPEN_BUS_BYTE,
        }
    }

    fn drive_data(&mut self, value: u8) {
        if !self.cpu.current().is_read() {
            // Both sides driving at once would cook a real bus.
            self.contentions += 1;
            log::warn!(
                "bus contention: monitor drove {value:#04X} during a cpu write cycle"
            );
        }
        self.driven = Some(value);
    }

    fn release_data(&mut self) {
        if let Some(value) = self.driven.take() {
            if self.cpu.current().is_read() {
                self.cpu.latch_read(value);
            }
        }
    }

    fn set_clock(&mut self, high: bool) {
        if high && !self.control.contains(ControlLines::CLOCK) {
            self.clock_pulses += 1;
        }
        self.control.set(ControlLines::CLOCK, high);
    }

    fn set_reset(&mut self, asserted: bool) {
        // The CPU restarts when the pulse ends, not when it begins.
        if !asserted && self.control.contains(ControlLines::RESET) {
            log::debug!("reset released, cpu restarting");
            self.cpu.restart();
        }
        self.control.set(ControlLines::RESET, asserted);
    }

    fn set_irq(&mut self, asserted: bool) {
        self.control.set(ControlLines::IRQ, asserted);
    }

    fn set_nmi(&mut self, asserted: bool) {
        self.control.set(ControlLines::NMI, asserted);
    }
}

#[cfg(test)]
mod tests;
