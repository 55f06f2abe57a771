//! The machine: register file, memory, opcode table and trace log driven by
//! one fetch-decode-execute loop.

use crate::api::{
    EntryMode, Host, InputState, MachineConfig, RunBoundary, RunOutcome, StepOutcome,
};
use crate::decoder::{Decoder, DispatchPhase};
use crate::execute::execute;
use crate::memory::map::{VRAM_END, VRAM_START};
use crate::snapshot::MachineSnapshot;
use crate::table::OpcodeTable;
use crate::trace::TraceLog;
use crate::{EntryState, MachineError, Memory, Registers, RunState, POST_BOOT_REGISTERS};

/// A GBZ80 interpreter instance. Owns all of its state.
#[derive(Debug, Clone)]
pub struct Machine {
    registers: Registers,
    memory: Memory,
    table: OpcodeTable,
    log: TraceLog,
    state: RunState,
    cycles: u64,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

impl Machine {
    /// Builds a machine with the standard opcode table.
    #[must_use]
    pub fn new(config: MachineConfig) -> Self {
        Self::with_table(config, OpcodeTable::standard())
    }

    /// Builds a machine dispatching through `table`.
    #[must_use]
    pub fn with_table(config: MachineConfig, table: OpcodeTable) -> Self {
        let log = config
            .expected_trace
            .map_or_else(TraceLog::new, TraceLog::with_expected)
            .keep_entries(config.record_trace);

        let mut registers = Registers::default();
        if config.entry == EntryMode::Cartridge {
            POST_BOOT_REGISTERS.apply(&mut registers);
        }

        Self {
            registers,
            memory: Memory::new(),
            table,
            log,
            state: RunState::Idle,
            cycles: 0,
        }
    }

    /// Copies `bytes` into memory at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::Memory`] when the image does not fit below
    /// `0x10000`; memory is unchanged in that case.
    pub fn load(&mut self, bytes: &[u8], offset: u16) -> Result<(), MachineError> {
        self.memory.load(bytes, offset)?;
        Ok(())
    }

    /// Overwrites `AF`, `BC`, `DE`, `HL`, `SP` and `PC`.
    pub const fn preset_registers(&mut self, entry: &EntryState) {
        entry.apply(&mut self.registers);
    }

    /// Presets the state the bootstrap image leaves behind, so execution
    /// starts at the cartridge entry point.
    pub fn skip_bootstrap(&mut self) {
        log::info!(
            "skipping bootstrap, entering cartridge at {:#06X}",
            POST_BOOT_REGISTERS.pc
        );
        self.preset_registers(&POST_BOOT_REGISTERS);
    }

    /// Notifies `host` and records the entry snapshot as trace line 0.
    ///
    /// Calling it again after the first snapshot only notifies the host.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::TraceMismatch`] when the entry snapshot
    /// differs from the first reference line, and any latched fault.
    pub fn start(&mut self, host: &mut impl Host) -> Result<(), MachineError> {
        host.startup();
        self.begin()
    }

    /// Hands the video RAM window to `host` as the current frame.
    pub fn present_frame(&self, host: &mut impl Host) {
        let vram = usize::from(VRAM_START)..=usize::from(VRAM_END);
        host.update_screen(&self.memory.as_slice()[vram]);
    }

    /// Samples input from `host`.
    pub fn poll_input(&self, host: &mut impl Host) -> InputState {
        let input = host.get_input();
        log::trace!("input {input:?} at {:#06X}", self.registers.pc());
        input
    }

    /// Executes one instruction and records the resulting snapshot.
    ///
    /// A machine that was never started records its entry snapshot first.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::UnimplementedOpcode`] or
    /// [`MachineError::Memory`] with the register file restored to its
    /// pre-step value, or [`MachineError::TraceMismatch`] after the
    /// instruction completed. Any error latches: every later call returns it
    /// again without executing anything.
    pub fn step(&mut self) -> Result<StepOutcome, MachineError> {
        self.begin()?;

        let saved = self.registers;
        let outcome = match self.dispatch() {
            Ok(outcome) => outcome,
            Err((phase, err)) => {
                self.registers = saved;
                log::debug!("{phase:?} phase failed at {:#06X}", saved.pc());
                return Err(self.latch(err));
            }
        };

        self.cycles += u64::from(outcome.cycles);

        let snapshot = self.registers.trace_snapshot();
        if let Err(err) = self.log.record(&snapshot) {
            return Err(self.latch(err));
        }

        Ok(outcome)
    }

    /// Steps until `boundary` is reached or a step fails.
    ///
    /// `ProgramCounter` is checked before every instruction, including the
    /// first.
    ///
    /// # Errors
    ///
    /// Returns the first error [`Machine::step`] reports.
    pub fn run(&mut self, boundary: RunBoundary) -> Result<RunOutcome, MachineError> {
        let mut outcome = RunOutcome::default();

        loop {
            match boundary {
                RunBoundary::Steps(limit) if outcome.steps >= limit => break,
                RunBoundary::ProgramCounter(addr) if self.registers.pc() == addr => break,
                RunBoundary::Steps(_)
                | RunBoundary::ProgramCounter(_)
                | RunBoundary::Unbounded => {}
            }

            let step = self.step()?;
            outcome.steps += 1;
            outcome.cycles += u64::from(step.cycles);
        }

        Ok(outcome)
    }

    /// Captures registers and memory.
    #[must_use]
    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            registers: self.registers,
            memory: self.memory.clone(),
        }
    }

    /// Replaces registers and memory. The trace log and run state are kept.
    pub fn restore(&mut self, snapshot: MachineSnapshot) {
        self.registers = snapshot.registers;
        self.memory = snapshot.memory;
    }

    /// Register file.
    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Mutable register file, for presets beyond [`EntryState`].
    pub const fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    /// Address space.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Opcode table in use.
    #[must_use]
    pub const fn table(&self) -> &OpcodeTable {
        &self.table
    }

    /// Trace log.
    #[must_use]
    pub const fn log(&self) -> &TraceLog {
        &self.log
    }

    /// Run state.
    #[must_use]
    pub const fn run_state(&self) -> &RunState {
        &self.state
    }

    /// Total cycles consumed by executed instructions.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    fn begin(&mut self) -> Result<(), MachineError> {
        match &self.state {
            RunState::Running => Ok(()),
            RunState::FaultLatched(err) => Err(err.clone()),
            RunState::Idle => {
                log::info!(
                    "machine started at {:#06X} with {} opcode(s) registered",
                    self.registers.pc(),
                    self.table.len()
                );
                self.state = RunState::Running;
                let entry = self.registers.trace_snapshot();
                match self.log.record(&entry) {
                    Ok(()) => Ok(()),
                    Err(err) => Err(self.latch(err)),
                }
            }
        }
    }

    fn dispatch(&mut self) -> Result<StepOutcome, (DispatchPhase, MachineError)> {
        let decoded = Decoder::fetch(&mut self.registers, &self.memory);
        let instruction =
            Decoder::resolve(&self.table, decoded).map_err(|err| (DispatchPhase::Lookup, err))?;

        log::trace!(
            "{:#06X} {}:{:02X} {}",
            decoded.pc,
            decoded.bank,
            decoded.opcode,
            instruction.mnemonic()
        );

        let executed = execute(instruction, &mut self.registers, &mut self.memory)
            .map_err(|fault| (DispatchPhase::Execute, MachineError::from(fault)))?;

        Ok(StepOutcome {
            opcode: decoded,
            cycles: executed.cycles,
            branch_taken: executed.branch_taken,
        })
    }

    fn latch(&mut self, err: MachineError) -> MachineError {
        log::error!("machine stopped ({:?}): {err}", err.class());
        self.state = RunState::FaultLatched(err.clone());
        err
    }
}
