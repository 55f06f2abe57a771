//! Core interpreter crate for the GBZ80, the Game Boy's Z80-derived CPU.

/// Flat 64 KiB address space and the DMG region map.
pub mod memory;
pub use memory::{
    decode_memory_region, Memory, MemoryRegion, RegionDescriptor, ADDRESS_SPACE_BYTES,
    BOOTSTRAP_IMAGE_BYTES, CARTRIDGE_ENTRY, DMG_MEMORY_REGIONS,
};

/// Register file, flags and run state.
pub mod state;
pub use state::{
    EntryState, Flag, Register8, RegisterPair, Registers, RunState, FLAGS_ACTIVE_MASK, FLAG_C,
    FLAG_H, FLAG_N, FLAG_Z, POST_BOOT_REGISTERS,
};

/// Opcode banks and opcode bit fields.
pub mod encoding;
pub use encoding::{OpcodeBank, OpcodeFields, OPCODE_BANK_COUNT};

/// Fault taxonomy.
pub mod fault;
pub use fault::{FaultClass, MachineError, MemoryFault};

/// DMG cycle-cost table and lookup helpers.
pub mod timing;
pub use timing::{cycle_cost, CycleCostKind, BRANCH_TAKEN_EXTRA_CYCLES, CYCLE_COST_TABLE};

/// Instruction descriptors and operations.
pub mod instruction;
pub use instruction::{Condition, Instruction, Operand8, Operation, PairAddress};

/// Opcode table and its standard contents.
pub mod table;
pub use table::{standard_entries, OpcodeTable, FIXED_ENTRIES};

/// Opcode fetch and prefix-bank resolution.
pub mod decoder;
pub use decoder::{DecodedOpcode, Decoder, DispatchPhase};

/// Instruction execution.
pub mod execute;
pub use execute::{execute, ExecuteOutcome, FlagsUpdate};

/// Trace snapshots and reference verification.
pub mod trace;
pub use trace::{ExpectedTrace, RegisterSnapshot, TraceLog};

/// Host-facing configuration and capability types.
pub mod api;
pub use api::{
    Button, EntryMode, HeadlessHost, Host, InputState, MachineConfig, RunBoundary, RunOutcome,
    StepOutcome,
};

/// Register and RAM snapshot.
pub mod snapshot;
pub use snapshot::MachineSnapshot;

/// Fetch-decode-execute driver.
pub mod machine;
pub use machine::Machine;

/// Disassembly through the opcode table.
pub mod disasm;
pub use disasm::{disassemble_from, disassemble_one, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use serde_json as _;
