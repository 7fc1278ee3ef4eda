use rammon_common::hex_preview;

use crate::bus::CpuBus;
use crate::channel::ByteChannel;
use crate::command::{self, recv_u16};
use crate::config::{MonitorConfig, IDLE_BACKOFF};
use crate::delay::DelaySource;
use crate::error::MonitorError;
use crate::monitor::{Monitor, RunState};

/// What one [`MonitorSession::poll`] pass ended up doing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Activity {
    /// A command byte was consumed and dispatched.
    Command,
    /// One CPU bus cycle was serviced.
    BusCycle,
    /// Nothing to do: no command pending and the CPU is halted.
    Idle,
}

/// One monitor wired to its bus attachment and delay source.
///
/// The session is the single logical thread of control: commands and
/// bus cycles are interleaved by [`poll`](Self::poll), never
/// concurrently, so memory, breakpoints and run state need no locking.
/// A command byte always wins over a bus cycle; while a command
/// (including a multi-cycle step) is being handled, the CPU simply
/// waits on its current cycle.
pub struct MonitorSession<B: CpuBus, D: DelaySource> {
    monitor: Monitor,
    bus: B,
    delay: D,
}

impl<B: CpuBus, D: DelaySource> MonitorSession<B, D> {
    pub fn new(config: MonitorConfig, mut bus: B, delay: D) -> Self {
        bus.idle();
        Self {
            monitor: Monitor::new(config),
            bus,
            delay,
        }
    }

    #[inline]
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    #[inline]
    pub fn monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitor
    }

    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Services one unit of work: a pending command if there is one,
    /// otherwise one bus cycle when the CPU is running.
    ///
    /// A command whose argument bytes never arrive is dropped with a
    /// warning rather than wedging the loop; the CPU keeps being
    /// serviced on the next pass.
    pub fn poll(&mut self, chan: &mut impl ByteChannel) -> Result<Activity, MonitorError> {
        if let Some(code) = chan.poll_byte()? {
            match self.dispatch(code, chan) {
                Err(MonitorError::ChannelTimeout) => {
                    log::warn!(
                        "dropping command {:?}: argument bytes timed out",
                        code as char
                    );
                }
                other => other?,
            }
            return Ok(Activity::Command);
        }

        if self.monitor.run_state() == RunState::Running {
            let outcome = self.monitor.service_cycle(&mut self.bus, &mut self.delay);
            if let Some(addr) = outcome.breakpoint {
                send_breakpoint_notice(chan, addr)?;
            }
            return Ok(Activity::BusCycle);
        }

        Ok(Activity::Idle)
    }

    /// Runs the session until the channel closes.
    pub fn run(&mut self, chan: &mut impl ByteChannel) -> Result<(), MonitorError> {
        loop {
            match self.poll(chan) {
                Ok(Activity::Idle) => self.delay.delay(IDLE_BACKOFF),
                Ok(_) => {}
                Err(MonitorError::ChannelClosed) => {
                    log::info!("debug channel closed, shutting down");
                    return Ok(());
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn dispatch(&mut self, code: u8, chan: &mut impl ByteChannel) -> Result<(), MonitorError> {
        match code {
            command::CMD_RESET => {
                self.monitor.reset_cpu(&mut self.bus, &mut self.delay);
                chan.send(command::MSG_RESET.as_bytes())
            }
            command::CMD_HALT => {
                self.monitor.halt();
                chan.send(command::MSG_HALTED.as_bytes())
            }
            command::CMD_CONTINUE => {
                self.monitor.resume();
                chan.send(command::MSG_CONTINUED.as_bytes())
            }
            command::CMD_STEP => self.cmd_step(chan),
            command::CMD_WRITE => self.cmd_write(chan),
            command::CMD_READ => self.cmd_read(chan),
            command::CMD_LOAD => self.cmd_load(chan),
            command::CMD_BREAKPOINT => self.cmd_breakpoint(chan),
            command::CMD_REGISTERS => chan.send(command::MSG_NO_REGISTERS.as_bytes()),
            other => {
                log::warn!("unknown command byte {other:#04X}");
                chan.send(command::MSG_UNKNOWN.as_bytes())
            }
        }
    }

    fn cmd_step(&mut self, chan: &mut impl ByteChannel) -> Result<(), MonitorError> {
        match self.monitor.step_instruction(&mut self.bus, &mut self.delay) {
            Ok(outcome) => match outcome.breakpoint {
                // The instruction did not finish; report the stop, not
                // a completed step.
                Some(addr) => send_breakpoint_notice(chan, addr),
                None => chan.send(command::MSG_STEPPED.as_bytes()),
            },
            Err(MonitorError::StepTimeout { cycles }) => {
                log::warn!("step gave up after {cycles} cycles without a sync edge");
                chan.send(command::MSG_STEP_TIMEOUT.as_bytes())
            }
            Err(err) => Err(err),
        }
    }

    fn cmd_write(&mut self, chan: &mut impl ByteChannel) -> Result<(), MonitorError> {
        let timeout = self.monitor.config().arg_timeout;
        let addr = recv_u16(chan, timeout)?;
        let value = chan.recv_byte(timeout)?;
        match self.monitor.memory_mut().write(addr, value) {
            Ok(()) => chan.send(format!("Memory written at address 0x{addr:04X}.\n").as_bytes()),
            Err(_) => chan.send(command::MSG_INVALID_ADDRESS.as_bytes()),
        }
    }

    fn cmd_read(&mut self, chan: &mut impl ByteChannel) -> Result<(), MonitorError> {
        let timeout = self.monitor.config().arg_timeout;
        let addr = recv_u16(chan, timeout)?;
        match self.monitor.memory().read(addr) {
            // Reads answer with the raw byte, not text.
            Ok(value) => chan.send(&[value]),
            Err(_) => chan.send(command::MSG_INVALID_ADDRESS.as_bytes()),
        }
    }

    fn cmd_load(&mut self, chan: &mut impl ByteChannel) -> Result<(), MonitorError> {
        let timeout = self.monitor.config().arg_timeout;
        let base = recv_u16(chan, timeout)?;
        let size = recv_u16(chan, timeout)?;

        // The whole payload is consumed before any write, so a failed
        // load never leaves unread payload bytes to be misread as
        // command bytes.
        let mut payload = vec![0u8; size as usize];
        for slot in payload.iter_mut() {
            *slot = chan.recv_byte(timeout)?;
        }
        log::debug!(
            "load {} bytes at {:#06X}: {}",
            payload.len(),
            base,
            hex_preview(&payload, 16)
        );

        match self.monitor.memory_mut().load(base, &payload) {
            Ok(()) => chan.send(command::MSG_LOADED.as_bytes()),
            Err(MonitorError::PartialLoad { offset }) => {
                log::warn!("load aborted at payload offset {offset}");
                chan.send(command::MSG_LOAD_INVALID.as_bytes())
            }
            Err(err) => Err(err),
        }
    }

    fn cmd_breakpoint(&mut self, chan: &mut impl ByteChannel) -> Result<(), MonitorError> {
        let timeout = self.monitor.config().arg_timeout;
        // Address first, capacity check second: the argument bytes must
        // leave the stream even when the table is full, or they would
        // be misread as the next two commands.
        let addr = recv_u16(chan, timeout)?;
        match self.monitor.breakpoints_mut().add(addr) {
            Ok(()) => chan.send(format!("Breakpoint set at address 0x{addr:04X}.\n").as_bytes()),
            Err(_) => chan.send(command::MSG_BREAKPOINTS_FULL.as_bytes()),
        }
    }
}

fn send_breakpoint_notice(chan: &mut impl ByteChannel, addr: u16) -> Result<(), MonitorError> {
    chan.send(format!("Breakpoint reached at address: 0x{addr:04X}\n").as_bytes())
}
