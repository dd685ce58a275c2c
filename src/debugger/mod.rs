//! # Debugger
//!
//! Non-invasive observation and control around the CPU: breakpoints,
//! watchpoints, bounded execution tracing, profiling, memory dumps and status
//! snapshots.
//!
//! The debugger never holds on to the CPU. Every call that needs machine state
//! borrows it, and the CPU knows nothing about the debugger. After each
//! [`CPU::step`] the debugger inspects what the step did
//! ([`CPU::last_step`], [`CPU::accesses`]) in [`Debugger::observe`];
//! [`Debugger::step`] and [`Debugger::run`] do both in one call.
//!
//! Anything worth reporting is queued as a [`DebugEvent`] and collected with
//! [`Debugger::take_events`].
//!
//! ## Session
//!
//! ```text
//! inactive --start_debugging--> active --stop_debugging--> inactive
//! ```
//!
//! Breakpoints, watchpoints and the trace are only evaluated while the session
//! is active. Stopping the session clears breakpoints, watchpoints and any
//! trace in progress; traces already returned by `stop_tracing` are the
//! caller's.
//!
//! ## Example
//!
//! ```
//! use emu6502::{AccessType, CPU, Debugger, DebugEvent, FlatMemory};
//!
//! let mut mem = FlatMemory::new();
//! mem.set_reset_vector(0x8000);
//! // LDA #$01 ; STA $0200 ; LDA $0200
//! mem.load(0x8000, &[0xA9, 0x01, 0x8D, 0x00, 0x02, 0xAD, 0x00, 0x02]);
//!
//! let mut cpu = CPU::new(mem);
//! let mut debugger = Debugger::new();
//! debugger.start_debugging();
//! debugger.set_watchpoint(&cpu, 0x0200, AccessType::Write, None, None);
//! debugger.start_tracing(100);
//!
//! for _ in 0..3 {
//!     debugger.step(&mut cpu).unwrap();
//! }
//!
//! let events = debugger.take_events();
//! assert_eq!(events.len(), 1);
//! assert!(matches!(events[0], DebugEvent::WatchpointHit { address: 0x0200, value: 0x01, .. }));
//!
//! let trace = debugger.stop_tracing();
//! assert_eq!(trace[1].disassembly, "STA $0200");
//! ```

mod breakpoints;
mod condition;
mod dump;
mod info;
mod profile;
mod trace;
mod watchpoints;

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};

pub use breakpoints::{Breakpoint, HitStamp};
pub use condition::{
    Comparison, Condition, ConditionContext, ConditionError, CustomPredicate, Term,
};
pub use dump::dump_memory;
pub use info::DebugInfo;
pub use profile::{Hotspot, PerformanceProfile};
pub use trace::TraceEntry;
pub use watchpoints::{AccessType, Watchpoint};

use crate::cpu::{AccessKind, StepEvent};
use crate::{DebuggerConfig, ExecutionError, MemoryBus, CPU};

use trace::TraceBuffer;

/// Which kind of record an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointKind {
    /// A breakpoint
    Breakpoint,
    /// A watchpoint
    Watchpoint,
}

/// Something the debugger observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugEvent {
    /// The PC reached an enabled breakpoint whose condition held.
    BreakpointHit {
        /// Breakpoint address
        address: u16,
        /// Breakpoint name
        name: String,
        /// Hit count including this hit
        hit_count: u64,
        /// The breakpoint was temporary and has been removed
        removed: bool,
    },

    /// A data access matched an enabled watchpoint whose condition held.
    WatchpointHit {
        /// Watched address
        address: u16,
        /// Watchpoint name
        name: String,
        /// Read or write
        kind: AccessKind,
        /// Value read, or the value memory holds after a write
        value: u8,
        /// Last value seen before this access
        previous: Option<u8>,
        /// Hit count including this hit
        hit_count: u64,
    },

    /// A condition failed to evaluate. Reported once per record; the record
    /// keeps failing closed afterwards.
    ConditionError {
        /// Breakpoint or watchpoint
        kind: PointKind,
        /// Its address
        address: u16,
        /// What went wrong
        error: ConditionError,
    },

    /// The trace reached its capacity; later instructions are not recorded.
    TraceFull {
        /// The capacity that was reached
        capacity: usize,
    },
}

impl fmt::Display for DebugEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugEvent::BreakpointHit {
                address,
                name,
                hit_count,
                ..
            } => write!(f, "breakpoint {name} hit at ${address:04X} ({hit_count} hits)"),
            DebugEvent::WatchpointHit {
                address,
                name,
                kind,
                value,
                ..
            } => {
                let verb = match kind {
                    AccessKind::Read => "read",
                    AccessKind::Write => "write",
                };
                write!(f, "watchpoint {name}: {verb} ${value:02X} at ${address:04X}")
            }
            DebugEvent::ConditionError {
                kind,
                address,
                error,
            } => {
                let what = match kind {
                    PointKind::Breakpoint => "breakpoint",
                    PointKind::Watchpoint => "watchpoint",
                };
                write!(f, "{what} at ${address:04X}: condition error: {error}")
            }
            DebugEvent::TraceFull { capacity } => {
                write!(f, "trace full at {capacity} entries")
            }
        }
    }
}

/// Why [`Debugger::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A breakpoint fired; the CPU is stopped at `address`.
    Breakpoint {
        /// Breakpoint address
        address: u16,
        /// Cycles consumed by the run
        cycles: u64,
    },
    /// A watchpoint fired during the last step.
    Watchpoint {
        /// Watched address
        address: u16,
        /// Cycles consumed by the run
        cycles: u64,
    },
    /// The CPU is halted.
    Halted {
        /// Cycles consumed by the run
        cycles: u64,
    },
    /// The cycle budget was used up.
    BudgetExhausted {
        /// Cycles consumed by the run
        cycles: u64,
    },
}

impl RunOutcome {
    /// Cycles consumed by the run.
    pub fn cycles(&self) -> u64 {
        match *self {
            RunOutcome::Breakpoint { cycles, .. }
            | RunOutcome::Watchpoint { cycles, .. }
            | RunOutcome::Halted { cycles }
            | RunOutcome::BudgetExhausted { cycles } => cycles,
        }
    }
}

/// What one observation found, for `run`.
#[derive(Debug, Default)]
struct Observation {
    breakpoint: Option<u16>,
    watchpoint: Option<u16>,
}

/// Breakpoint, watchpoint and trace state for one CPU.
#[derive(Debug, Default)]
pub struct Debugger {
    config: DebuggerConfig,
    active: bool,
    breakpoints: BTreeMap<u16, Breakpoint>,
    watchpoints: BTreeMap<u16, Watchpoint>,
    trace: Option<TraceBuffer>,
    /// Storage handed back through `recycle_trace`
    spare_trace: Vec<TraceEntry>,
    events: Vec<DebugEvent>,
}

impl Debugger {
    /// Creates an inactive debugger with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inactive debugger.
    pub fn with_config(config: DebuggerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &DebuggerConfig {
        &self.config
    }

    // ========== Session ==========

    /// Activates the session. Does nothing if it is already active.
    pub fn start_debugging(&mut self) {
        if !self.active {
            self.active = true;
            debug!("debugging session started");
        }
    }

    /// Ends the session, clearing breakpoints, watchpoints and any trace in
    /// progress. Queued events are kept.
    pub fn stop_debugging(&mut self) {
        self.active = false;
        self.breakpoints.clear();
        self.watchpoints.clear();
        if let Some(buffer) = self.trace.take() {
            self.recycle_trace(buffer.into_entries());
        }
        debug!("debugging session stopped");
    }

    /// Whether the session is active.
    pub fn is_debugging_active(&self) -> bool {
        self.active
    }

    // ========== Breakpoints ==========

    /// Registers a breakpoint at `address`, replacing any existing one, and
    /// returns the replaced record.
    ///
    /// The name defaults to `bp_$XXXX`.
    pub fn set_breakpoint(
        &mut self,
        address: u16,
        condition: Option<Condition>,
        name: Option<&str>,
    ) -> Option<Breakpoint> {
        self.breakpoints
            .insert(address, Breakpoint::new(address, condition, name))
    }

    /// Registers a breakpoint that only fires when `condition` holds.
    pub fn set_conditional_breakpoint(
        &mut self,
        address: u16,
        condition: Condition,
        name: Option<&str>,
    ) -> Option<Breakpoint> {
        self.set_breakpoint(address, Some(condition), name)
    }

    /// Registers a breakpoint that fires once and then removes itself.
    pub fn set_temporary_breakpoint(
        &mut self,
        address: u16,
        name: Option<&str>,
    ) -> Option<Breakpoint> {
        let mut bp = Breakpoint::new(address, Some(Condition::not_yet_hit()), name);
        bp.temporary = true;
        self.breakpoints.insert(address, bp)
    }

    /// Removes the breakpoint at `address`. Returns false if there was none.
    pub fn remove_breakpoint(&mut self, address: u16) -> bool {
        self.breakpoints.remove(&address).is_some()
    }

    /// Removes every breakpoint.
    pub fn clear_breakpoints(&mut self) {
        self.breakpoints.clear();
    }

    /// Enables or disables the breakpoint at `address`. Returns false if there
    /// was none.
    pub fn enable_breakpoint(&mut self, address: u16, enabled: bool) -> bool {
        match self.breakpoints.get_mut(&address) {
            Some(bp) => {
                bp.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// The breakpoint at `address`.
    pub fn breakpoint(&self, address: u16) -> Option<&Breakpoint> {
        self.breakpoints.get(&address)
    }

    /// Snapshot of all breakpoints, ordered by address.
    pub fn get_breakpoints(&self) -> Vec<Breakpoint> {
        self.breakpoints.values().cloned().collect()
    }

    // ========== Watchpoints ==========

    /// Registers a watchpoint at `address`, replacing any existing one, and
    /// returns the replaced record.
    ///
    /// The current value at `address` is captured as the baseline for change
    /// detection. The name defaults to `wp_$XXXX`.
    pub fn set_watchpoint<M: MemoryBus>(
        &mut self,
        cpu: &CPU<M>,
        address: u16,
        access: AccessType,
        condition: Option<Condition>,
        name: Option<&str>,
    ) -> Option<Watchpoint> {
        let initial = cpu.memory().peek(address);
        self.watchpoints.insert(
            address,
            Watchpoint::new(address, access, condition, name, initial),
        )
    }

    /// Removes the watchpoint at `address`. Returns false if there was none.
    pub fn remove_watchpoint(&mut self, address: u16) -> bool {
        self.watchpoints.remove(&address).is_some()
    }

    /// Removes every watchpoint.
    pub fn clear_watchpoints(&mut self) {
        self.watchpoints.clear();
    }

    /// Enables or disables the watchpoint at `address`. Returns false if there
    /// was none.
    pub fn enable_watchpoint(&mut self, address: u16, enabled: bool) -> bool {
        match self.watchpoints.get_mut(&address) {
            Some(wp) => {
                wp.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// The watchpoint at `address`.
    pub fn watchpoint(&self, address: u16) -> Option<&Watchpoint> {
        self.watchpoints.get(&address)
    }

    /// Snapshot of all watchpoints, ordered by address.
    pub fn get_watchpoints(&self) -> Vec<Watchpoint> {
        self.watchpoints.values().cloned().collect()
    }

    // ========== Tracing ==========

    /// Starts a trace holding at most `max_entries` entries, discarding any
    /// trace in progress.
    pub fn start_tracing(&mut self, max_entries: usize) {
        let storage = match self.trace.take() {
            Some(buffer) => buffer.into_entries(),
            None => std::mem::take(&mut self.spare_trace),
        };
        self.trace = Some(TraceBuffer::new(storage, max_entries));
    }

    /// Starts a trace with the configured default capacity.
    pub fn start_tracing_default(&mut self) {
        self.start_tracing(self.config.default_trace_capacity);
    }

    /// Ends the trace and returns its entries (empty if none was running).
    pub fn stop_tracing(&mut self) -> Vec<TraceEntry> {
        self.trace
            .take()
            .map(TraceBuffer::into_entries)
            .unwrap_or_default()
    }

    /// Whether a trace is being collected.
    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    /// Entries collected so far by the trace in progress.
    pub fn trace_entries(&self) -> &[TraceEntry] {
        match &self.trace {
            Some(buffer) => buffer.entries(),
            None => &[],
        }
    }

    /// Hands a finished trace back so its allocation is reused by the next
    /// `start_tracing`.
    pub fn recycle_trace(&mut self, mut entries: Vec<TraceEntry>) {
        if entries.capacity() > self.spare_trace.capacity() {
            entries.clear();
            self.spare_trace = entries;
        }
    }

    /// Profile of the trace in progress (empty when not tracing).
    ///
    /// Use [`PerformanceProfile::from_entries`] for a trace already returned
    /// by `stop_tracing`.
    pub fn get_performance_profile(&self) -> PerformanceProfile {
        PerformanceProfile::from_entries(self.trace_entries(), self.config.hotspot_count)
    }

    // ========== Events ==========

    /// Drains the queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<DebugEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queued events, oldest first.
    pub fn events(&self) -> &[DebugEvent] {
        &self.events
    }

    // ========== Inspection ==========

    /// Hex dump of `length` bytes starting at `start`; see [`dump_memory`].
    pub fn dump_memory<M: MemoryBus>(&self, cpu: &CPU<M>, start: u16, length: usize) -> String {
        dump::dump_memory(cpu.memory(), start, length)
    }

    /// Snapshot of CPU state and debugger records.
    pub fn get_comprehensive_debug_info<M: MemoryBus>(&self, cpu: &CPU<M>) -> DebugInfo {
        DebugInfo {
            registers: cpu.registers(),
            status: cpu.status(),
            cycles: cpu.cycles(),
            instruction_count: cpu.instruction_count(),
            halted: cpu.is_halted(),
            nmi_pending: cpu.nmi_pending(),
            irq_pending: cpu.irq_pending(),
            last_mnemonic: cpu.last_instruction().map(|i| i.mnemonic),
            stack_wrap_count: cpu.stack_wrap_count(),
            last_stack_wrap: cpu.last_stack_wrap(),
            debugging_active: self.active,
            tracing: self.is_tracing(),
            breakpoints: self.get_breakpoints(),
            watchpoints: self.get_watchpoints(),
            profile: self.get_performance_profile(),
        }
    }

    // ========== Execution ==========

    /// Steps the CPU once and observes the result.
    ///
    /// The step is observed even when it fails, since its effects are already
    /// committed.
    pub fn step<M: MemoryBus>(&mut self, cpu: &mut CPU<M>) -> Result<u8, ExecutionError> {
        let result = cpu.step();
        self.observe(cpu);
        result
    }

    /// Steps until a breakpoint or watchpoint fires, the CPU halts, or at
    /// least `max_cycles` cycles have been consumed.
    pub fn run<M: MemoryBus>(
        &mut self,
        cpu: &mut CPU<M>,
        max_cycles: u64,
    ) -> Result<RunOutcome, ExecutionError> {
        let mut cycles = 0u64;
        loop {
            if cpu.is_halted() {
                return Ok(RunOutcome::Halted { cycles });
            }
            if cycles >= max_cycles {
                return Ok(RunOutcome::BudgetExhausted { cycles });
            }

            let result = cpu.step();
            let seen = self.observe_step(cpu);
            cycles += result? as u64;

            if let Some(address) = seen.breakpoint {
                return Ok(RunOutcome::Breakpoint { address, cycles });
            }
            if let Some(address) = seen.watchpoint {
                return Ok(RunOutcome::Watchpoint { address, cycles });
            }
        }
    }

    /// Evaluates breakpoints, watchpoints and tracing against the step the CPU
    /// just made. Does nothing while the session is inactive.
    ///
    /// Call this after every `cpu.step()` when stepping the CPU directly.
    pub fn observe<M: MemoryBus>(&mut self, cpu: &CPU<M>) {
        self.observe_step(cpu);
    }

    fn observe_step<M: MemoryBus>(&mut self, cpu: &CPU<M>) -> Observation {
        let mut seen = Observation::default();
        if !self.active {
            return seen;
        }

        match cpu.last_step() {
            StepEvent::Executed(executed) => {
                if let Some(buffer) = self.trace.as_mut() {
                    let entry = TraceEntry::from_executed(&executed, cpu.registers());
                    if buffer.push(entry) {
                        self.events.push(DebugEvent::TraceFull {
                            capacity: buffer.capacity(),
                        });
                    }
                }
            }
            StepEvent::Interrupt(_) => {}
            StepEvent::Halted | StepEvent::None => return seen,
        }

        seen.watchpoint = self.check_watchpoints(cpu);
        seen.breakpoint = self.check_breakpoint(cpu);
        seen
    }

    fn check_watchpoints<M: MemoryBus>(&mut self, cpu: &CPU<M>) -> Option<u16> {
        let mut first_hit = None;

        for access in cpu.accesses() {
            let Some(wp) = self.watchpoints.get_mut(&access.address) else {
                continue;
            };
            if !wp.enabled {
                continue;
            }
            // A write is judged by what memory holds afterwards
            let seen = match access.kind {
                AccessKind::Read => Some(access.value),
                AccessKind::Write => cpu.memory().peek(access.address),
            };
            if !wp.access.matches(access.kind, seen != wp.last_value) {
                continue;
            }

            let ctx = ConditionContext {
                registers: cpu.registers(),
                hit_count: wp.hit_count,
                last_value: wp.last_value,
            };
            match wp.check(&ctx) {
                Ok(true) => {
                    let previous = wp.last_value;
                    wp.hit_count += 1;
                    wp.last_value = seen.or(previous);
                    wp.last_hit = Some(stamp(cpu));
                    debug!(
                        "watchpoint {} hit: {:?} 0x{:02X} at 0x{:04X}",
                        wp.name, access.kind, access.value, access.address
                    );
                    self.events.push(DebugEvent::WatchpointHit {
                        address: access.address,
                        name: wp.name.clone(),
                        kind: access.kind,
                        value: seen.unwrap_or(access.value),
                        previous,
                        hit_count: wp.hit_count,
                    });
                    first_hit.get_or_insert(access.address);
                }
                Ok(false) => {}
                Err(error) => {
                    if !wp.condition_error_reported {
                        wp.condition_error_reported = true;
                        warn!("watchpoint {} condition failed: {error}", wp.name);
                        self.events.push(DebugEvent::ConditionError {
                            kind: PointKind::Watchpoint,
                            address: access.address,
                            error,
                        });
                    }
                }
            }
        }

        first_hit
    }

    fn check_breakpoint<M: MemoryBus>(&mut self, cpu: &CPU<M>) -> Option<u16> {
        let pc = cpu.pc();
        let bp = self.breakpoints.get_mut(&pc)?;
        if !bp.enabled {
            return None;
        }

        let ctx = ConditionContext {
            registers: cpu.registers(),
            hit_count: bp.hit_count,
            last_value: None,
        };
        match bp.check(&ctx) {
            Ok(true) => {
                bp.hit_count += 1;
                bp.last_hit = Some(stamp(cpu));
                debug!("breakpoint {} hit at 0x{pc:04X} ({} hits)", bp.name, bp.hit_count);

                let event = DebugEvent::BreakpointHit {
                    address: pc,
                    name: bp.name.clone(),
                    hit_count: bp.hit_count,
                    removed: bp.temporary,
                };
                if bp.temporary {
                    self.breakpoints.remove(&pc);
                }
                self.events.push(event);
                Some(pc)
            }
            Ok(false) => None,
            Err(error) => {
                if !bp.condition_error_reported {
                    bp.condition_error_reported = true;
                    warn!("breakpoint {} condition failed: {error}", bp.name);
                    self.events.push(DebugEvent::ConditionError {
                        kind: PointKind::Breakpoint,
                        address: pc,
                        error,
                    });
                }
                None
            }
        }
    }
}

fn stamp<M: MemoryBus>(cpu: &CPU<M>) -> HitStamp {
    HitStamp {
        cycle: cpu.cycles(),
        instruction: cpu.instruction_count(),
    }
}
