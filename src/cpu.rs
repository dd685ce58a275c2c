//! The 6502 core: registers, counters, interrupt lines and the step loop.
//!
//! [`CPU::step`] services a pending interrupt or executes one instruction;
//! [`CPU::execute`] steps until a cycle budget is spent or the CPU halts.
//! Besides [`Registers`] the CPU keeps cycle and instruction counters, the
//! NMI edge and IRQ level, a halt flag, a stack-pointer wrap counter, and
//! a record of the last instruction with its data accesses.
//!
//! Each step is committed in full before the call returns; nothing is
//! interruptible mid-instruction.

use log::{debug, trace, warn};

use crate::addressing::Operand;
use crate::interrupts::Interrupt;
use crate::opcodes::{self, Mnemonic};
use crate::registers::{Flag, Registers, StatusFlags};
use crate::{instructions, CpuConfig, ExecutionError, IllegalOpcodePolicy, MemoryBus};

/// Base address of the hardware stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// Direction of a data access recorded during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessKind {
    /// The CPU read the location.
    Read,
    /// The CPU wrote the location.
    Write,
}

/// One data access performed by the CPU.
///
/// Opcode and operand fetches, indirect pointer fetches and vector reads are
/// instruction-stream traffic and are not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryAccess {
    /// Address touched
    pub address: u16,
    /// Read or write
    pub kind: AccessKind,
    /// Value read or written
    pub value: u8,
}

/// Which way the stack pointer wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackWrapKind {
    /// Push with SP = 0x00 (SP becomes 0xFF).
    Overflow,
    /// Pull with SP = 0xFF (SP becomes 0x00).
    Underflow,
}

/// Record of the most recent stack-pointer wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackWrap {
    /// Direction of the wrap
    pub kind: StackWrapKind,
    /// Address of the instruction that caused it
    pub pc: u16,
    /// Cycle counter at the start of that instruction
    pub cycle: u64,
}

/// The instruction retired by the most recent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutedInstruction {
    /// Address of the opcode byte
    pub address: u16,
    /// Opcode byte
    pub opcode: u8,
    /// Operand bytes; only the first `size - 1` are meaningful
    pub operands: [u8; 2],
    /// Instruction size in bytes
    pub size: u8,
    /// Decoded mnemonic
    pub mnemonic: Mnemonic,
    /// Cycles consumed, penalties included
    pub cycles: u8,
    /// 1-based instruction number since reset
    pub sequence: u64,
}

impl ExecutedInstruction {
    /// The meaningful operand bytes.
    pub fn operand_bytes(&self) -> &[u8] {
        &self.operands[..(self.size.saturating_sub(1) as usize).min(2)]
    }
}

/// What the most recent call to `step()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// Nothing has been stepped since reset.
    None,
    /// An instruction was executed.
    Executed(ExecutedInstruction),
    /// A hardware interrupt was serviced instead of executing an instruction.
    Interrupt(Interrupt),
    /// The CPU is halted; nothing happened.
    Halted,
}

/// An NMOS 6502 attached to a memory bus.
///
/// Generic over the memory implementation via the `MemoryBus` trait. The CPU
/// owns its memory; callers reach it through [`CPU::memory`] and
/// [`CPU::memory_mut`].
///
/// # Examples
///
/// ```
/// use emu6502::{CPU, FlatMemory, MemoryBus};
///
/// let mut memory = FlatMemory::new();
/// memory.write(0xFFFC, 0x00); // Low byte
/// memory.write(0xFFFD, 0x80); // High byte (PC = 0x8000)
///
/// let cpu = CPU::new(memory);
///
/// assert_eq!(cpu.pc(), 0x8000);
/// assert_eq!(cpu.sp(), 0xFD);
/// assert!(cpu.flag_i()); // Interrupt disable set on reset
/// assert_eq!(cpu.cycles(), 0);
/// ```
pub struct CPU<M: MemoryBus> {
    pub(crate) regs: Registers,

    /// Total CPU cycles since reset
    pub(crate) cycles: u64,

    /// Retired instructions since reset
    pub(crate) instructions: u64,

    pub(crate) halted: bool,
    pub(crate) nmi_pending: bool,
    pub(crate) irq_pending: bool,

    pub(crate) stack_wraps: u64,
    pub(crate) last_stack_wrap: Option<StackWrap>,

    /// Start-of-step PC and cycle count, for diagnostics raised mid-step
    step_pc: u16,
    step_cycle: u64,

    pub(crate) last_step: StepEvent,
    pub(crate) last_instruction: Option<ExecutedInstruction>,
    pub(crate) accesses: Vec<MemoryAccess>,

    pub(crate) config: CpuConfig,

    pub(crate) memory: M,
}

impl<M: MemoryBus> CPU<M> {
    /// Creates a CPU with the default configuration and resets it.
    ///
    /// A, X and Y start at zero; PC is loaded from the reset vector at
    /// 0xFFFC/0xFFFD.
    pub fn new(memory: M) -> Self {
        Self::with_config(memory, CpuConfig::default())
    }

    /// Creates a CPU with an explicit configuration and resets it.
    pub fn with_config(memory: M, config: CpuConfig) -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            cycles: 0,
            instructions: 0,
            halted: false,
            nmi_pending: false,
            irq_pending: false,
            stack_wraps: 0,
            last_stack_wrap: None,
            step_pc: 0,
            step_cycle: 0,
            last_step: StepEvent::None,
            last_instruction: None,
            accesses: Vec::with_capacity(8),
            config,
            memory,
        };
        cpu.reset();
        cpu
    }

    /// Performs a RESET.
    ///
    /// - PC is loaded from the reset vector (0xFFFC/0xFFFD)
    /// - I is set, SP becomes 0xFD
    /// - cycle and instruction counters are zeroed
    /// - halt state, pending NMI/IRQ and stack-wrap diagnostics are cleared
    ///
    /// A, X, Y and the remaining flags keep their values, as on hardware.
    /// Memory is not touched. Calling it twice in a row is the same as once.
    pub fn reset(&mut self) {
        self.regs.pc = self.read_vector(Interrupt::Reset.vector());
        self.regs.sp = Registers::POWER_ON_SP;
        self.regs.p.i = true;
        self.cycles = 0;
        self.instructions = 0;
        self.halted = false;
        self.nmi_pending = false;
        self.irq_pending = false;
        self.stack_wraps = 0;
        self.last_stack_wrap = None;
        self.last_step = StepEvent::None;
        self.last_instruction = None;
        self.accesses.clear();
        debug!("reset: PC=0x{:04X}", self.regs.pc);
    }

    /// Executes one instruction, or services one pending interrupt, and returns
    /// the cycles consumed.
    ///
    /// Pending interrupts are honoured at the instruction boundary before the
    /// fetch: NMI first, then IRQ if the I flag is clear. Servicing one takes a
    /// whole 7-cycle step. A halted CPU does nothing and returns 0.
    ///
    /// # Errors
    ///
    /// - [`ExecutionError::IllegalOpcode`] when an undocumented opcode is
    ///   fetched under [`IllegalOpcodePolicy::Halt`]; the CPU is halted.
    /// - [`ExecutionError::Bus`] when the memory reported a fault during the
    ///   step. The step's effects are already committed.
    ///
    /// # Examples
    ///
    /// ```
    /// use emu6502::{CPU, FlatMemory, MemoryBus};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.write(0xFFFC, 0x00);
    /// mem.write(0xFFFD, 0x80);
    /// mem.write(0x8000, 0xEA); // NOP
    ///
    /// let mut cpu = CPU::new(mem);
    /// assert_eq!(cpu.step().unwrap(), 2);
    /// assert_eq!(cpu.pc(), 0x8001);
    /// ```
    pub fn step(&mut self) -> Result<u8, ExecutionError> {
        self.accesses.clear();
        self.step_pc = self.regs.pc;
        self.step_cycle = self.cycles;

        if self.halted {
            self.last_step = StepEvent::Halted;
            return Ok(0);
        }

        if let Some(kind) = self.pending_interrupt() {
            let cycles = self.service_interrupt(kind);
            self.cycles += cycles as u64;
            self.last_step = StepEvent::Interrupt(kind);
            self.check_bus()?;
            return Ok(cycles);
        }

        let pc = self.regs.pc;
        let opcode = self.memory.read(pc);
        let metadata = opcodes::lookup(opcode);

        if metadata.illegal {
            match self.config.illegal_opcode_policy {
                IllegalOpcodePolicy::Halt => {
                    warn!("halting on illegal opcode 0x{opcode:02X} at 0x{pc:04X}");
                    self.halted = true;
                    self.last_step = StepEvent::Halted;
                    return Err(ExecutionError::IllegalOpcode {
                        opcode,
                        address: pc,
                    });
                }
                IllegalOpcodePolicy::Nop => {
                    debug!("illegal opcode 0x{opcode:02X} at 0x{pc:04X} executed as NOP");
                }
            }
        }

        let operands = [
            self.memory.read(pc.wrapping_add(1)),
            self.memory.read(pc.wrapping_add(2)),
        ];
        let resolved = self.resolve_operand(metadata.addressing_mode, pc);
        self.regs.pc = pc.wrapping_add(metadata.size_bytes as u16);

        let extra = instructions::execute(self, metadata.mnemonic, resolved);

        let mut cycles = metadata.base_cycles + extra;
        if metadata.page_penalty && resolved.page_crossed {
            cycles += 1;
        }

        self.cycles += cycles as u64;
        self.instructions += 1;

        let executed = ExecutedInstruction {
            address: pc,
            opcode,
            operands,
            size: metadata.size_bytes,
            mnemonic: metadata.mnemonic,
            cycles,
            sequence: self.instructions,
        };
        self.last_instruction = Some(executed);
        self.last_step = StepEvent::Executed(executed);
        trace!("0x{pc:04X} {} ({cycles} cycles)", metadata.mnemonic);

        self.check_bus()?;
        Ok(cycles)
    }

    /// Steps until at least `max_cycles` cycles have been consumed or the CPU
    /// halts, returning the cycles actually consumed.
    ///
    /// The result may exceed `max_cycles` by at most one instruction's worth.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns its error. Cycles spent
    /// in this call before the failure are not part of the error; compare
    /// [`CPU::cycles`] before and after the call to recover them.
    ///
    /// ```
    /// use emu6502::{CPU, FlatMemory};
    ///
    /// let mut mem = FlatMemory::new();
    /// mem.set_reset_vector(0x8000);
    /// mem.load(0x8000, &[0xEA; 16]); // NOPs, 2 cycles each
    ///
    /// let mut cpu = CPU::new(mem);
    /// assert_eq!(cpu.execute(7).unwrap(), 8);
    /// ```
    pub fn execute(&mut self, max_cycles: u64) -> Result<u64, ExecutionError> {
        let mut consumed = 0u64;
        while consumed < max_cycles && !self.halted {
            consumed += self.step()? as u64;
        }
        Ok(consumed)
    }

    fn check_bus(&mut self) -> Result<(), ExecutionError> {
        match self.memory.take_fault() {
            Some(fault) => Err(ExecutionError::Bus(fault)),
            None => Ok(()),
        }
    }

    pub(crate) fn read_vector(&self, vector: u16) -> u16 {
        let lo = self.memory.read(vector);
        let hi = self.memory.read(vector.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    // Bus access

    /// Reads a data byte through the bus, recording the access.
    pub fn read(&mut self, addr: u16) -> u8 {
        let value = self.memory.read(addr);
        if self.config.record_accesses {
            self.accesses.push(MemoryAccess {
                address: addr,
                kind: AccessKind::Read,
                value,
            });
        }
        value
    }

    /// Writes a data byte through the bus, recording the access.
    pub fn write(&mut self, addr: u16, value: u8) {
        self.memory.write(addr, value);
        if self.config.record_accesses {
            self.accesses.push(MemoryAccess {
                address: addr,
                kind: AccessKind::Write,
                value,
            });
        }
    }

    /// Reads the value an operand refers to.
    pub(crate) fn load(&mut self, operand: Operand) -> u8 {
        match operand {
            Operand::Immediate(value) => value,
            Operand::Address(addr) => self.read(addr),
            Operand::Accumulator => self.regs.a,
            Operand::None => 0,
        }
    }

    /// Stores to the location an operand refers to.
    pub(crate) fn store(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Address(addr) => self.write(addr, value),
            Operand::Accumulator => self.regs.a = value,
            Operand::Immediate(_) | Operand::None => {}
        }
    }

    // Stack

    fn note_stack_wrap(&mut self, kind: StackWrapKind) {
        self.stack_wraps += 1;
        self.last_stack_wrap = Some(StackWrap {
            kind,
            pc: self.step_pc,
            cycle: self.step_cycle,
        });
        warn!(
            "stack pointer {} at 0x{:04X}",
            match kind {
                StackWrapKind::Overflow => "wrapped below 0x00",
                StackWrapKind::Underflow => "wrapped above 0xFF",
            },
            self.step_pc
        );
    }

    /// Pushes a byte: store at `0x0100 | SP`, then decrement SP (wrapping).
    ///
    /// ```
    /// use emu6502::{CPU, FlatMemory};
    ///
    /// let mut cpu = CPU::new(FlatMemory::new());
    /// cpu.set_sp(0x00);
    /// cpu.push_byte(0x42);
    /// assert_eq!(cpu.sp(), 0xFF);
    /// assert_eq!(cpu.stack_wrap_count(), 1);
    /// ```
    pub fn push_byte(&mut self, value: u8) {
        self.write(STACK_PAGE | self.regs.sp as u16, value);
        if self.regs.sp == 0x00 {
            self.note_stack_wrap(StackWrapKind::Overflow);
        }
        self.regs.sp = self.regs.sp.wrapping_sub(1);
    }

    /// Pulls a byte: increment SP (wrapping), then load from `0x0100 | SP`.
    pub fn pull_byte(&mut self) -> u8 {
        if self.regs.sp == 0xFF {
            self.note_stack_wrap(StackWrapKind::Underflow);
        }
        self.regs.sp = self.regs.sp.wrapping_add(1);
        self.read(STACK_PAGE | self.regs.sp as u16)
    }

    /// Pushes a word, high byte first.
    pub fn push_word(&mut self, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push_byte(hi);
        self.push_byte(lo);
    }

    /// Pulls a word, low byte first.
    pub fn pull_word(&mut self) -> u16 {
        let lo = self.pull_byte();
        let hi = self.pull_byte();
        u16::from_le_bytes([lo, hi])
    }

    // Registers

    pub fn a(&self) -> u8 {
        self.regs.a
    }

    pub fn x(&self) -> u8 {
        self.regs.x
    }

    pub fn y(&self) -> u8 {
        self.regs.y
    }

    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    /// The full stack address is 0x0100 + SP. The stack grows downward from 0x01FF.
    pub fn sp(&self) -> u8 {
        self.regs.sp
    }

    /// Returns the status register as a packed byte (bit 5 always set).
    pub fn status(&self) -> u8 {
        self.regs.p.to_byte()
    }

    /// Returns a copy of all registers.
    pub fn registers(&self) -> Registers {
        self.regs
    }

    /// Returns the total number of CPU cycles executed since reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns the number of instructions retired since reset.
    pub fn instruction_count(&self) -> u64 {
        self.instructions
    }

    /// Sets the accumulator.
    pub fn set_a(&mut self, value: u8) {
        self.regs.a = value;
    }

    /// Sets the X register.
    pub fn set_x(&mut self, value: u8) {
        self.regs.x = value;
    }

    /// Sets the Y register.
    pub fn set_y(&mut self, value: u8) {
        self.regs.y = value;
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, value: u16) {
        self.regs.pc = value;
    }

    /// Sets the stack pointer.
    pub fn set_sp(&mut self, value: u8) {
        self.regs.sp = value;
    }

    /// Replaces the status flags from a packed byte.
    pub fn set_status(&mut self, value: u8) {
        self.regs.p = StatusFlags::from_byte(value);
    }

    // Flags

    /// Reads a flag by name.
    ///
    /// ```
    /// use emu6502::{CPU, Flag, FlatMemory};
    ///
    /// let mut cpu = CPU::new(FlatMemory::new());
    /// cpu.set_flag("carry".parse::<Flag>().unwrap(), true);
    /// assert!(cpu.get_flag(Flag::Carry));
    /// ```
    pub fn get_flag(&self, flag: Flag) -> bool {
        self.regs.p.get(flag)
    }

    /// Writes a flag by name. The unused bit cannot be cleared.
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        self.regs.p.set(flag, value);
    }

    /// Returns the unpacked status flags.
    pub fn flags(&self) -> StatusFlags {
        self.regs.p
    }

    pub fn flag_n(&self) -> bool {
        self.regs.p.n
    }

    pub fn flag_v(&self) -> bool {
        self.regs.p.v
    }

    /// B only exists on the stack; this is the bit last written via `set_status`.
    pub fn flag_b(&self) -> bool {
        self.regs.p.b
    }

    pub fn flag_d(&self) -> bool {
        self.regs.p.d
    }

    pub fn flag_i(&self) -> bool {
        self.regs.p.i
    }

    pub fn flag_z(&self) -> bool {
        self.regs.p.z
    }

    pub fn flag_c(&self) -> bool {
        self.regs.p.c
    }

    /// Sets the Negative flag.
    pub fn set_flag_n(&mut self, value: bool) {
        self.regs.p.n = value;
    }

    /// Sets the Overflow flag.
    pub fn set_flag_v(&mut self, value: bool) {
        self.regs.p.v = value;
    }

    /// Sets the Break flag.
    pub fn set_flag_b(&mut self, value: bool) {
        self.regs.p.b = value;
    }

    /// Sets the Decimal flag.
    pub fn set_flag_d(&mut self, value: bool) {
        self.regs.p.d = value;
    }

    /// Sets the Interrupt Disable flag.
    pub fn set_flag_i(&mut self, value: bool) {
        self.regs.p.i = value;
    }

    /// Sets the Zero flag.
    pub fn set_flag_z(&mut self, value: bool) {
        self.regs.p.z = value;
    }

    /// Sets the Carry flag.
    pub fn set_flag_c(&mut self, value: bool) {
        self.regs.p.c = value;
    }

    // Diagnostics

    /// Whether the CPU stopped on an illegal opcode. Only `reset()` clears it.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Whether an NMI is waiting for the next instruction boundary.
    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    /// Whether the IRQ line is asserted, by `irq()` or by a device.
    pub fn irq_pending(&self) -> bool {
        self.irq_pending || self.memory.irq_active()
    }

    /// Number of stack-pointer wraps since reset.
    pub fn stack_wrap_count(&self) -> u64 {
        self.stack_wraps
    }

    /// The most recent stack-pointer wrap, if any.
    pub fn last_stack_wrap(&self) -> Option<StackWrap> {
        self.last_stack_wrap
    }

    /// The last instruction executed since reset, if any.
    pub fn last_instruction(&self) -> Option<&ExecutedInstruction> {
        self.last_instruction.as_ref()
    }

    /// What the last `step()` did.
    pub fn last_step(&self) -> StepEvent {
        self.last_step
    }

    /// Data accesses performed by the last step, in order.
    pub fn accesses(&self) -> &[MemoryAccess] {
        &self.accesses
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: CpuConfig) {
        self.config = config;
    }

    /// Returns a shared reference to the memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Returns a mutable reference to the memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Consumes the CPU and returns its memory.
    pub fn into_memory(self) -> M {
        self.memory
    }
}
