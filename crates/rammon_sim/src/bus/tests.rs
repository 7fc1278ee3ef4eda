use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rammon_core::{
    command, Activity, DelaySource, MemoryChannel, Monitor, MonitorConfig, MonitorSession,
    RunState, OPEN_BUS_BYTE,
};

use super::{ControlLines, SimBus};
use crate::cpu::{demo_program, CpuCycle, ScriptedCpu};

struct NullDelay;

impl DelaySource for NullDelay {
    fn delay(&mut self, _duration: Duration) {}
}

fn sim_bus(program: Vec<CpuCycle>) -> SimBus {
    SimBus::new(ScriptedCpu::new(program).capture_reads())
}

#[test]
fn read_transaction_latches_monitor_byte() {
    let mut monitor = Monitor::new(MonitorConfig::default());
    monitor.memory_mut().write(0x0010, 0x42).unwrap();
    let mut bus = sim_bus(vec![CpuCycle::Read(0x0010), CpuCycle::Read(0x0011)]);
    let mut delay = NullDelay;

    monitor.service_cycle(&mut bus, &mut delay);

    assert_eq!(bus.cpu().reads(), &[(0x0010, 0x42)]);
    assert_eq!(bus.cpu().cycles_completed(), 1);
}

#[test]
fn write_transaction_stores_cpu_byte() {
    let mut monitor = Monitor::new(MonitorConfig::default());
    let mut bus = sim_bus(vec![CpuCycle::Write(0x0030, 0x99), CpuCycle::Read(0x0000)]);
    let mut delay = NullDelay;

    monitor.service_cycle(&mut bus, &mut delay);

    assert_eq!(monitor.memory().read(0x0030).unwrap(), 0x99);
    assert_eq!(bus.cpu().cycles_completed(), 1);
}

#[test]
fn breakpoint_leaves_cpu_parked() {
    let mut monitor = Monitor::new(MonitorConfig::default());
    monitor.breakpoints_mut().add(0x0040).unwrap();
    let mut bus = sim_bus(vec![CpuCycle::Read(0x0040), CpuCycle::Read(0x0041)]);
    let mut delay = NullDelay;

    monitor.service_cycle(&mut bus, &mut delay);
    monitor.service_cycle(&mut bus, &mut delay);

    assert_eq!(monitor.run_state(), RunState::Halted);
    assert_eq!(bus.cpu().cycles_completed(), 0);
    assert_eq!(bus.cpu().current(), CpuCycle::Read(0x0040));
}

#[test]
fn reset_pulse_restarts_the_script() {
    let mut monitor = Monitor::new(MonitorConfig::default());
    let mut bus = sim_bus(vec![CpuCycle::Fetch(0x0000), CpuCycle::Read(0x0001)]);
    let mut delay = NullDelay;

    monitor.service_cycle(&mut bus, &mut delay);
    assert_eq!(bus.cpu().current(), CpuCycle::Read(0x0001));

    monitor.reset_cpu(&mut bus, &mut delay);

    assert_eq!(bus.cpu().resets_seen(), 1);
    assert_eq!(bus.cpu().current(), CpuCycle::Fetch(0x0000));
}

#[test]
fn session_setup_idles_control_lines() {
    let session = MonitorSession::new(
        MonitorConfig::default(),
        sim_bus(vec![CpuCycle::Fetch(0x0000)]),
        NullDelay,
    );
    assert_eq!(session.bus().control(), ControlLines::empty());
}

#[test]
fn session_steps_one_instruction_at_a_time() {
    let program = vec![
        CpuCycle::Fetch(0x0000),
        CpuCycle::Read(0x0001),
        CpuCycle::Write(0x0020, 0x55),
        CpuCycle::Fetch(0x0003),
        CpuCycle::Read(0x0004),
    ];
    let mut session = MonitorSession::new(MonitorConfig::default(), sim_bus(program), NullDelay);
    let mut chan = MemoryChannel::new();

    chan.push_command(&[command::CMD_STEP]);
    while session.poll(&mut chan).unwrap() == Activity::Command {}
    assert_eq!(chan.take_output(), b"CPU stepped one instruction.\n");
    assert_eq!(session.bus().cpu().cycles_completed(), 2);

    chan.push_command(&[command::CMD_STEP]);
    while session.poll(&mut chan).unwrap() == Activity::Command {}
    assert_eq!(chan.take_output(), b"CPU stepped one instruction.\n");
    assert_eq!(session.bus().cpu().cycles_completed(), 5);
    assert_eq!(session.monitor().memory().read(0x0020).unwrap(), 0x55);
}

#[test]
fn session_runs_to_breakpoint_and_notifies() {
    let program = vec![
        CpuCycle::Fetch(0x0000),
        CpuCycle::Read(0x0001),
        CpuCycle::Read(0x0010),
        CpuCycle::Write(0x0020, 0x42),
    ];
    let mut session = MonitorSession::new(MonitorConfig::default(), sim_bus(program), NullDelay);
    let mut chan = MemoryChannel::new();

    chan.push_command(&[command::CMD_BREAKPOINT, 0x00, 0x10]);
    assert_eq!(session.poll(&mut chan).unwrap(), Activity::Command);

    for _ in 0..10 {
        if session.monitor().run_state() == RunState::Halted {
            break;
        }
        session.poll(&mut chan).unwrap();
    }

    let mut expected = Vec::new();
    expected.extend_from_slice(b"Breakpoint set at address 0x0010.\n");
    expected.extend_from_slice(b"Breakpoint reached at address: 0x0010\n");
    assert_eq!(chan.take_output(), expected);
    assert_eq!(session.monitor().run_state(), RunState::Halted);
    assert_eq!(session.bus().cpu().cycles_completed(), 2);
    assert_eq!(session.bus().cpu().current(), CpuCycle::Read(0x0010));
}

/// Random cycle scripts against a plain array model of memory. Keeps
/// the responder honest about write ordering and the open-bus rule for
/// out-of-range addresses.
#[test]
fn random_script_matches_reference_memory_model() {
    let mut rng = StdRng::seed_from_u64(0x6502);
    let mut program = Vec::new();
    for _ in 0..200 {
        // Addresses straddle the 4 KiB boundary on purpose.
        let addr = rng.gen_range(0x0000..0x1100u16);
        program.push(match rng.gen_range(0..3) {
            0 => CpuCycle::Read(addr),
            1 => CpuCycle::Fetch(addr),
            _ => CpuCycle::Write(addr, rng.gen()),
        });
    }

    let mut monitor = Monitor::new(MonitorConfig::default());
    let mut bus = SimBus::new(ScriptedCpu::new(program.clone()).capture_reads());
    let mut delay = NullDelay;

    let mut reference = vec![0u8; 4096];
    for cycle in &program {
        if let CpuCycle::Write(addr, value) = *cycle {
            if (addr as usize) < reference.len() {
                reference[addr as usize] = value;
            }
        }
        monitor.service_cycle(&mut bus, &mut delay);
    }

    assert_eq!(bus.cpu().cycles_completed(), 200);
    assert_eq!(bus.contentions(), 0);
    for (addr, expected) in reference.iter().enumerate() {
        assert_eq!(monitor.memory().read(addr as u16).unwrap(), *expected);
    }
    for (addr, value) in bus.cpu().reads() {
        if *addr >= 0x1000 {
            assert_eq!(*value, OPEN_BUS_BYTE);
        }
    }
}

#[test]
fn step_against_a_parked_cpu_times_out() {
    let config = MonitorConfig::builder().step_cycle_limit(32).build();
    let cpu = ScriptedCpu::once(vec![CpuCycle::Fetch(0x0000), CpuCycle::Read(0x0001)]);
    let mut session = MonitorSession::new(config, SimBus::new(cpu), NullDelay);
    let mut chan = MemoryChannel::new();

    // First step consumes the whole two-cycle script.
    chan.push_command(&[command::CMD_STEP]);
    while session.poll(&mut chan).unwrap() == Activity::Command {}
    assert_eq!(chan.take_output(), b"CPU stepped one instruction.\n");
    assert!(session.bus().cpu().is_parked());

    // The parked CPU never raises SYNC again.
    chan.push_command(&[command::CMD_STEP]);
    while session.poll(&mut chan).unwrap() == Activity::Command {}
    assert_eq!(chan.take_output(), b"Error: Step timed out waiting for SYNC.\n");
}

#[test]
fn demo_program_copies_its_byte_while_free_running() {
    let mut session =
        MonitorSession::new(MonitorConfig::default(), sim_bus(demo_program()), NullDelay);
    let mut chan = MemoryChannel::new();

    while session.bus().cpu().cycles_completed() < 8 {
        assert_eq!(session.poll(&mut chan).unwrap(), Activity::BusCycle);
    }

    assert_eq!(session.monitor().memory().read(0x0020).unwrap(), 0x42);
    // Free running leaves the clock to the external oscillator.
    assert_eq!(session.bus().clock_pulses(), 0);
}

#[test]
fn free_running_cpu_records_no_reads_by_default() {
    let mut session = MonitorSession::new(
        MonitorConfig::default(),
        SimBus::new(ScriptedCpu::new(demo_program())),
        NullDelay,
    );
    let mut chan = MemoryChannel::new();

    // A monitor left running for a long stretch must stay
    // allocation-flat; read recording is strictly opt-in.
    for _ in 0..10_000 {
        session.poll(&mut chan).unwrap();
    }

    assert!(session.bus().cpu().reads().is_empty());
    assert_eq!(session.bus().cpu().cycles_completed(), 10_000);
}

/// The classic debugger workflow, end to end: patch a byte, read it
/// back, poke outside memory, bulk load, dump the loaded range.
#[test]
fn protocol_scenarios_round_trip_end_to_end() {
    let mut session =
        MonitorSession::new(MonitorConfig::default(), sim_bus(demo_program()), NullDelay);
    session.monitor_mut().halt();
    let mut chan = MemoryChannel::new();

    chan.push_command(&[command::CMD_WRITE, 0x00, 0x10, 0x42]);
    chan.push_command(&[command::CMD_READ, 0x00, 0x10]);
    chan.push_command(&[command::CMD_READ, 0x20, 0x00]);
    chan.push_command(&[command::CMD_LOAD, 0x00, 0x00, 0x00, 0x04]);
    chan.push_command(&[0x11, 0x22, 0x33, 0x44]);
    for addr in 0..4u8 {
        chan.push_command(&[command::CMD_READ, 0x00, addr]);
    }
    while session.poll(&mut chan).unwrap() == Activity::Command {}

    let mut expected = Vec::new();
    expected.extend_from_slice(b"Memory written at address 0x0010.\n");
    expected.push(0x42);
    expected.extend_from_slice(b"Error: Invalid address.\n");
    expected.extend_from_slice(b"Data loaded successfully.\n");
    expected.extend_from_slice(&[0x11, 0x22, 0x33, 0x44]);
    assert_eq!(chan.take_output(), expected);
}
