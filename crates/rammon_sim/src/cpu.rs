/// One bus cycle a scripted CPU presents to the monitor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CpuCycle {
    /// Data read at the address.
    Read(u16),
    /// Opcode fetch: a read with SYNC asserted.
    Fetch(u16),
    /// Write of the byte to the address.
    Write(u16, u8),
}

impl CpuCycle {
    #[inline]
    pub fn address(&self) -> u16 {
        match *self {
            CpuCycle::Read(addr) | CpuCycle::Fetch(addr) | CpuCycle::Write(addr, _) => addr,
        }
    }

    #[inline]
    pub fn is_read(&self) -> bool {
        !matches!(self, CpuCycle::Write(..))
    }

    #[inline]
    pub fn is_fetch(&self) -> bool {
        matches!(self, CpuCycle::Fetch(_))
    }
}

/// Bus-level CPU model driven by a fixed cycle script.
///
/// The script stands in for real instruction execution: the CPU
/// presents one cycle at a time and only moves to the next when the
/// memory system completes the transaction (read data latched, or
/// write data accepted). A cycle the monitor refuses to answer leaves
/// the CPU stalled, exactly like a real part waiting on a dead bus.
///
/// [`new`](Self::new) wraps the script around at the end, standing in
/// for a program that loops forever; [`once`](Self::once) instead parks
/// the CPU on a SYNC-low read of its final address after the last
/// cycle, like a target that has wandered off into dead space.
pub struct ScriptedCpu {
    program: Vec<CpuCycle>,
    pos: usize,
    looping: bool,
    completed: u64,
    resets: u32,
    capture: Option<Vec<(u16, u8)>>,
}

impl ScriptedCpu {
    /// Looping script. `program` must be non-empty; an empty script
    /// would leave the CPU with no cycle to present.
    pub fn new(program: Vec<CpuCycle>) -> Self {
        Self::with_looping(program, true)
    }

    /// Script that runs once and then parks.
    pub fn once(program: Vec<CpuCycle>) -> Self {
        Self::with_looping(program, false)
    }

    fn with_looping(program: Vec<CpuCycle>, looping: bool) -> Self {
        assert!(!program.is_empty(), "cycle script must not be empty");
        ScriptedCpu {
            program,
            pos: 0,
            looping,
            completed: 0,
            resets: 0,
            capture: None,
        }
    }

    /// Switches on recording of every latched read for later
    /// inspection. Off by default: a free-running CPU would otherwise
    /// accumulate entries for as long as the process lives.
    pub fn capture_reads(mut self) -> Self {
        self.capture = Some(Vec::new());
        self
    }

    /// The cycle currently presented on the bus.
    #[inline]
    pub fn current(&self) -> CpuCycle {
        match self.program.get(self.pos) {
            Some(cycle) => *cycle,
            // Past the end of a run-once script: park on a plain read
            // of the final address, SYNC low.
            None => CpuCycle::Read(self.program[self.program.len() - 1].address()),
        }
    }

    /// Whether a run-once script has finished.
    #[inline]
    pub fn is_parked(&self) -> bool {
        self.pos >= self.program.len()
    }

    /// Total transactions completed since construction.
    #[inline]
    pub fn cycles_completed(&self) -> u64 {
        self.completed
    }

    /// How many reset pulses the CPU has seen.
    #[inline]
    pub fn resets_seen(&self) -> u32 {
        self.resets
    }

    /// Latched (address, byte) pairs, oldest first. Empty unless
    /// [`capture_reads`](Self::capture_reads) switched recording on.
    #[inline]
    pub fn reads(&self) -> &[(u16, u8)] {
        self.capture.as_deref().unwrap_or(&[])
    }

    /// Called by the bus when the monitor has driven and released read
    /// data: the CPU latches the byte and moves on.
    pub(crate) fn latch_read(&mut self, value: u8) {
        let address = self.current().address();
        if let Some(capture) = &mut self.capture {
            capture.push((address, value));
        }
        self.advance();
    }

    /// Called by the bus when the monitor has sampled the CPU's write
    /// data: the write is done, the CPU moves on.
    pub(crate) fn complete_write(&mut self) {
        self.advance();
    }

    /// Restarts the script from the top, as a released reset line
    /// restarts a real CPU.
    pub(crate) fn restart(&mut self) {
        self.pos = 0;
        self.resets += 1;
    }

    fn advance(&mut self) {
        self.completed += 1;
        if self.is_parked() {
            // Parked reads complete but go nowhere.
            return;
        }
        self.pos += 1;
        if self.looping && self.pos == self.program.len() {
            self.pos = 0;
        }
    }
}

/// Small looping program for demo runs: fetch, copy a byte from
/// 0x0010 to 0x0020, fetch again at the top.
pub fn demo_program() -> Vec<CpuCycle> {
    vec![
        CpuCycle::Fetch(0x0000),
        CpuCycle::Read(0x0001),
        CpuCycle::Read(0x0010),
        CpuCycle::Fetch(0x0003),
        CpuCycle::Read(0x0004),
        CpuCycle::Write(0x0020, 0x42),
        CpuCycle::Fetch(0x0006),
        CpuCycle::Read(0x0007),
    ]
}
