//! Execution trace collection.
//!
//! The buffer has a fixed capacity and stops accepting entries once full; it
//! never rotates, so a full trace is always the first N instructions of the
//! tracing window.

use log::warn;

use crate::cpu::ExecutedInstruction;
use crate::disassembler::{self, Instruction};
use crate::opcodes::Mnemonic;
use crate::registers::Registers;

/// One executed instruction as seen by the tracer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceEntry {
    /// Address of the opcode
    pub address: u16,
    /// Opcode byte
    pub opcode: u8,
    /// Operand bytes; only the first `size - 1` are meaningful
    pub operands: [u8; 2],
    /// Instruction size in bytes
    pub size: u8,
    /// Decoded mnemonic
    pub mnemonic: Mnemonic,
    /// Assembly text, e.g. `LDA #$42`
    pub disassembly: String,
    /// Registers after the instruction
    pub registers: Registers,
    /// Packed status byte after the instruction
    pub flags: u8,
    /// Cycles the instruction took
    pub cycles: u8,
    /// Instruction sequence number since reset
    pub timestamp: u64,
}

impl TraceEntry {
    pub(crate) fn from_executed(executed: &ExecutedInstruction, registers: Registers) -> Self {
        let bytes = [executed.opcode, executed.operands[0], executed.operands[1]];
        let size = (executed.size as usize).clamp(1, 3);
        let instr = disassembler::decode_instruction(&bytes[..size], executed.address)
            .unwrap_or_else(|| Instruction::data_byte(executed.address, executed.opcode));

        Self {
            address: executed.address,
            opcode: executed.opcode,
            operands: executed.operands,
            size: executed.size,
            mnemonic: executed.mnemonic,
            disassembly: disassembler::format_instruction(&instr),
            registers,
            flags: registers.p.to_byte(),
            cycles: executed.cycles,
            timestamp: executed.sequence,
        }
    }

    /// The meaningful operand bytes.
    pub fn operand_bytes(&self) -> &[u8] {
        &self.operands[..(self.size.saturating_sub(1) as usize).min(2)]
    }
}

/// An in-progress trace.
#[derive(Debug)]
pub(crate) struct TraceBuffer {
    entries: Vec<TraceEntry>,
    capacity: usize,
    full: bool,
}

impl TraceBuffer {
    /// Starts a trace reusing `storage`'s allocation.
    pub(crate) fn new(mut storage: Vec<TraceEntry>, capacity: usize) -> Self {
        storage.clear();
        // Grow lazily for very large captures
        storage.reserve(capacity.min(4096));
        Self {
            entries: storage,
            capacity,
            full: false,
        }
    }

    /// Appends an entry. Returns true the first time an entry is refused.
    pub(crate) fn push(&mut self, entry: TraceEntry) -> bool {
        if self.entries.len() < self.capacity {
            self.entries.push(entry);
            return false;
        }
        if self.full {
            return false;
        }
        self.full = true;
        warn!(
            "trace buffer full at {} entries, further instructions are not recorded",
            self.capacity
        );
        true
    }

    pub(crate) fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}
