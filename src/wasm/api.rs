//! JavaScript bindings.
//!
//! [`Emulator`] owns a CPU on flat RAM plus an active [`Debugger`]; every
//! step from JavaScript goes through the debugger.

use crate::disassembler::format_instruction;
use crate::{
    disassemble, AccessType, Condition, Debugger, DisassemblyOptions, FlatMemory, MemoryBus,
    RunOutcome, CPU,
};
use wasm_bindgen::prelude::*;

/// Address programs are loaded at when none is given.
const DEFAULT_LOAD_ADDRESS: u16 = 0x0600;

/// Error surfaced to JavaScript as an object with a `message` field.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// One disassembled line
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct DisassemblyLine {
    address: u16,
    bytes: Vec<u8>,
    text: String,
}

#[wasm_bindgen]
impl DisassemblyLine {
    #[wasm_bindgen(getter)]
    pub fn address(&self) -> u16 {
        self.address
    }

    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }
}

/// CPU, memory and debugger behind one handle.
#[wasm_bindgen]
pub struct Emulator {
    cpu: CPU<FlatMemory>,
    debugger: Debugger,
    program_start: u16,
    program_end: u16,
}

#[wasm_bindgen]
impl Emulator {
    /// Creates an emulator on 64KB of RAM with the reset vector at $0600.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let mut memory = FlatMemory::new();
        memory.set_reset_vector(DEFAULT_LOAD_ADDRESS);

        let mut debugger = Debugger::new();
        debugger.start_debugging();

        Emulator {
            cpu: CPU::new(memory),
            debugger,
            program_start: DEFAULT_LOAD_ADDRESS,
            program_end: DEFAULT_LOAD_ADDRESS,
        }
    }

    /// Runs one step; returns cycles consumed.
    pub fn step(&mut self) -> Result<u8, JsError> {
        self.debugger.step(&mut self.cpu).map_err(js_error)
    }

    /// Run until a breakpoint, watchpoint, halt or the cycle budget.
    ///
    /// Returns a short description of why execution stopped.
    pub fn run(&mut self, max_cycles: u32) -> Result<String, JsError> {
        let outcome = self
            .debugger
            .run(&mut self.cpu, max_cycles as u64)
            .map_err(js_error)?;
        Ok(match outcome {
            RunOutcome::Breakpoint { address, .. } => format!("breakpoint ${address:04X}"),
            RunOutcome::Watchpoint { address, .. } => format!("watchpoint ${address:04X}"),
            RunOutcome::Halted { .. } => "halted".to_string(),
            RunOutcome::BudgetExhausted { .. } => "budget".to_string(),
        })
    }

    /// Reset the CPU; memory and debugger records are kept
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Raise a maskable interrupt request
    pub fn irq(&mut self) {
        self.cpu.irq();
    }

    /// Raise a non-maskable interrupt
    pub fn nmi(&mut self) {
        self.cpu.nmi();
    }

    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.cpu.a()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u8 {
        self.cpu.x()
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u8 {
        self.cpu.y()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.cpu.pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u8 {
        self.cpu.sp()
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> u8 {
        self.cpu.status()
    }

    #[wasm_bindgen(getter)]
    pub fn cycles(&self) -> f64 {
        self.cpu.cycles() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn halted(&self) -> bool {
        self.cpu.is_halted()
    }

    pub fn set_pc(&mut self, addr: u16) {
        self.cpu.set_pc(addr);
    }

    /// Reads without side effects beyond those of the bus.
    pub fn read_memory(&self, addr: u16) -> u8 {
        self.cpu.memory().read(addr)
    }

    pub fn write_memory(&mut self, addr: u16, value: u8) {
        self.cpu.memory_mut().write(addr, value);
    }

    /// The 256 bytes of `page`.
    pub fn get_memory_page(&self, page: u8) -> Vec<u8> {
        let start = (page as u16) << 8;
        (0..256).map(|i| self.cpu.memory().read(start + i)).collect()
    }

    /// Copies `program` to `start_addr` and points PC at it.
    pub fn load_program(&mut self, program: &[u8], start_addr: u16) {
        self.cpu.memory_mut().load(start_addr, program);
        self.cpu.set_pc(start_addr);
        self.program_start = start_addr;
        self.program_end = start_addr.wrapping_add(program.len() as u16);
    }

    /// Up to `num_instructions` [`DisassemblyLine`]s read from memory.
    pub fn disassemble(&self, start_addr: u16, num_instructions: u32) -> Vec<JsValue> {
        // Three bytes per instruction is the most any needs
        let window = (num_instructions as usize).saturating_mul(3).min(0x10000);
        let bytes: Vec<u8> = (0..window)
            .map(|i| self.cpu.memory().read(start_addr.wrapping_add(i as u16)))
            .collect();

        let opts = DisassemblyOptions {
            start_address: start_addr,
            ..Default::default()
        };

        disassemble(&bytes, opts)
            .iter()
            .take(num_instructions as usize)
            .map(|instr| {
                let mut bytes = vec![instr.opcode];
                bytes.extend_from_slice(instr.operand_bytes());
                JsValue::from(DisassemblyLine {
                    address: instr.address,
                    bytes,
                    text: format_instruction(instr),
                })
            })
            .collect()
    }

    // Debugger methods

    /// Set a breakpoint; `condition` uses the condition expression syntax
    /// (e.g. `a == $10 && c`). Pass an empty string for none.
    pub fn set_breakpoint(&mut self, addr: u16, condition: &str) -> Result<(), JsError> {
        let condition = parse_condition(condition)?;
        self.debugger.set_breakpoint(addr, condition, None);
        Ok(())
    }

    /// Set a breakpoint that removes itself after the first hit
    pub fn set_temporary_breakpoint(&mut self, addr: u16) {
        self.debugger.set_temporary_breakpoint(addr, None);
    }

    /// Remove a breakpoint; returns false if none was set
    pub fn remove_breakpoint(&mut self, addr: u16) -> bool {
        self.debugger.remove_breakpoint(addr)
    }

    /// Set a watchpoint; `access` is one of `read`, `write`, `both`, `access`
    pub fn set_watchpoint(&mut self, addr: u16, access: &str, condition: &str) -> Result<(), JsError> {
        let access: AccessType = access.parse().map_err(|e: String| JsError::new(&e))?;
        let condition = parse_condition(condition)?;
        self.debugger
            .set_watchpoint(&self.cpu, addr, access, condition, None);
        Ok(())
    }

    /// Remove a watchpoint; returns false if none was set
    pub fn remove_watchpoint(&mut self, addr: u16) -> bool {
        self.debugger.remove_watchpoint(addr)
    }

    /// Start collecting up to `max_entries` trace entries
    pub fn start_tracing(&mut self, max_entries: u32) {
        self.debugger.start_tracing(max_entries as usize);
    }

    /// Stop tracing and return one disassembled line per entry
    pub fn stop_tracing(&mut self) -> Vec<JsValue> {
        let trace = self.debugger.stop_tracing();
        let lines = trace
            .iter()
            .map(|entry| {
                JsValue::from_str(&format!(
                    "{:04X}  {:<12} A={:02X} X={:02X} Y={:02X} SP={:02X} P={:02X}",
                    entry.address,
                    entry.disassembly,
                    entry.registers.a,
                    entry.registers.x,
                    entry.registers.y,
                    entry.registers.sp,
                    entry.flags
                ))
            })
            .collect();
        self.debugger.recycle_trace(trace);
        lines
    }

    /// Drain pending debugger events as text
    pub fn take_events(&mut self) -> js_sys::Array {
        self.debugger
            .take_events()
            .iter()
            .map(|event| JsValue::from_str(&event.to_string()))
            .collect()
    }

    /// Hex dump of a memory range
    pub fn dump_memory(&self, start: u16, length: u32) -> String {
        self.debugger
            .dump_memory(&self.cpu, start, length as usize)
    }

    /// Human-readable status report
    pub fn debug_info(&self) -> String {
        self.debugger.get_comprehensive_debug_info(&self.cpu).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn program_start(&self) -> u16 {
        self.program_start
    }

    /// One past the last byte of the loaded program
    #[wasm_bindgen(getter)]
    pub fn program_end(&self) -> u16 {
        self.program_end
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_condition(text: &str) -> Result<Option<Condition>, JsError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    text.parse::<Condition>().map(Some).map_err(js_error)
}
