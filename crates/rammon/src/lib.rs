use std::net::TcpListener;

use anyhow::Result;
use rammon_common::xor_checksum;
use rammon_core::{MonitorConfig, MonitorSession, SpinDelay};
use rammon_sim::{demo_program, ScriptedCpu, SimBus};

pub mod net;

/// Default bind address for the debug channel.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:6502";

/// Runs the monitor against the simulated CPU, serving the debug
/// protocol over TCP.
///
/// Connections are served one at a time and monitor state (memory,
/// breakpoints, run state) survives across them, like a board whose
/// serial port is reopened.
pub fn run_sim(bind_addr: &str, image: Option<&[u8]>) -> Result<()> {
    let mut session = MonitorSession::new(
        MonitorConfig::default(),
        SimBus::new(ScriptedCpu::new(demo_program())),
        SpinDelay,
    );
    if let Some(image) = image {
        let copied = session.monitor_mut().memory_mut().preload(image);
        log::info!(
            "preloaded {copied} bytes into emulated memory (xor checksum {:02X})",
            xor_checksum(image)
        );
    }

    let listener = TcpListener::bind(bind_addr)?;
    log::info!("monitor listening on {bind_addr}");

    loop {
        let (stream, peer) = listener.accept()?;
        log::info!("debugger connected from {peer}");
        let mut chan = match net::TcpChannel::new(stream) {
            Ok(chan) => chan,
            Err(err) => {
                log::warn!("dropping connection from {peer}: {err}");
                continue;
            }
        };
        // A failed session must not take the monitor down with it; the
        // machine state stays good for the next debugger.
        if let Err(err) = session.run(&mut chan) {
            log::warn!("session with {peer} ended abnormally: {err}");
        }
        log::info!("debugger disconnected, monitor state kept");
    }
}
