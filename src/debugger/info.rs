//! One-shot status snapshot.

use std::fmt;

use super::breakpoints::Breakpoint;
use super::profile::PerformanceProfile;
use super::watchpoints::Watchpoint;
use crate::cpu::StackWrap;
use crate::opcodes::Mnemonic;
use crate::registers::Registers;

/// Everything a front-end needs for a status view, gathered in one call.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugInfo {
    /// Register file, flags included
    pub registers: Registers,
    /// Packed status byte
    pub status: u8,
    /// Cycles since reset
    pub cycles: u64,
    /// Instructions retired since reset
    pub instruction_count: u64,
    /// CPU stopped on an illegal opcode
    pub halted: bool,
    /// NMI waiting for the next boundary
    pub nmi_pending: bool,
    /// IRQ line asserted
    pub irq_pending: bool,
    /// Mnemonic of the last executed instruction
    pub last_mnemonic: Option<Mnemonic>,
    /// Stack-pointer wraps since reset
    pub stack_wrap_count: u64,
    /// Most recent stack-pointer wrap
    pub last_stack_wrap: Option<StackWrap>,
    /// Debugging session state
    pub debugging_active: bool,
    /// A trace is being collected
    pub tracing: bool,
    /// Breakpoints by address
    pub breakpoints: Vec<Breakpoint>,
    /// Watchpoints by address
    pub watchpoints: Vec<Watchpoint>,
    /// Profile of the trace in progress
    pub profile: PerformanceProfile,
}

impl fmt::Display for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.registers)?;
        writeln!(
            f,
            "cycles={} instructions={} last={}",
            self.cycles,
            self.instruction_count,
            self.last_mnemonic.map_or("-", |m| m.as_str())
        )?;
        writeln!(
            f,
            "halted={} nmi={} irq={} stack_wraps={}",
            self.halted, self.nmi_pending, self.irq_pending, self.stack_wrap_count
        )?;
        for bp in &self.breakpoints {
            writeln!(
                f,
                "break {} ${:04X} hits={}{}",
                bp.name,
                bp.address,
                bp.hit_count,
                if bp.enabled { "" } else { " (disabled)" }
            )?;
        }
        for wp in &self.watchpoints {
            writeln!(
                f,
                "watch {} ${:04X} {} hits={}{}",
                wp.name,
                wp.address,
                wp.access,
                wp.hit_count,
                if wp.enabled { "" } else { " (disabled)" }
            )?;
        }
        write!(
            f,
            "profile: {} instructions, {} cycles, {:.2} cycles/instruction",
            self.profile.total_instructions,
            self.profile.total_cycles,
            self.profile.average_cycles_per_instruction
        )
    }
}
