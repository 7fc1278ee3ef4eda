/// One CPU-driven bus cycle as seen by the monitor.
///
/// All three signals come from a single [`CpuBus::sample`] call so they
/// are guaranteed to describe the same cycle; sampling them through
/// separate calls could tear across a clock edge.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BusSample {
    /// The 16 address lines.
    pub address: u16,
    /// Level of the R/W line: `true` means the CPU is reading and
    /// expects data driven to it, `false` means the CPU drives a write.
    pub read: bool,
    /// Level of SYNC: asserted while the CPU fetches an opcode, which
    /// marks the first cycle of every instruction.
    pub sync: bool,
}

/// Capability set of one physical (or simulated) CPU bus attachment.
///
/// This is the only seam between the monitor core and a target platform:
/// a hardware port banger implements it with pin reads/writes, the
/// simulator implements it over an in-memory line model. Implementations
/// must not panic on any input; there is no bus-error concept on this
/// kind of hardware.
pub trait CpuBus {
    /// Samples address, R/W and SYNC atomically for the current cycle.
    fn sample(&mut self) -> BusSample;

    /// Reads the byte the CPU is currently driving on the data lines.
    /// Only meaningful during a write cycle, with the monitor's own
    /// drivers released.
    fn sample_data(&mut self) -> u8;

    /// Takes the data bus and asserts `value` for the CPU to latch.
    fn drive_data(&mut self, value: u8);

    /// Tri-states the data bus so the CPU (or nobody) drives it.
    fn release_data(&mut self);

    /// Drives the CPU clock line. The monitor owns this line while
    /// single-stepping.
    fn set_clock(&mut self, high: bool);

    /// Drives the reset line; `asserted` means the CPU is held in reset
    /// (the physical line is active-low).
    fn set_reset(&mut self, asserted: bool);

    /// Drives the interrupt-request line; held inactive by the monitor.
    fn set_irq(&mut self, asserted: bool);

    /// Drives the non-maskable-interrupt line; held inactive by the
    /// monitor.
    fn set_nmi(&mut self, asserted: bool);

    /// Puts every monitor-driven line into its power-up state: data bus
    /// released, clock low, reset and both interrupt lines deasserted.
    ///
    /// Called once per attachment, before the first bus cycle.
    fn idle(&mut self) {
        self.release_data();
        self.set_clock(false);
        self.set_reset(false);
        self.set_irq(false);
        self.set_nmi(false);
    }
}
