//! Runtime configuration for the CPU and the debugger.
//!
//! Both structs are plain data with sensible defaults; construct them with
//! `Default` and adjust with the `with_*` builders.

/// What the CPU does when it fetches an undocumented opcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IllegalOpcodePolicy {
    /// Stop execution: the CPU enters the halted state and `step()` reports
    /// [`ExecutionError::IllegalOpcode`](crate::ExecutionError::IllegalOpcode).
    /// PC is left pointing at the offending opcode.
    #[default]
    Halt,

    /// Treat the opcode as a 1-byte, 2-cycle no-op.
    Nop,
}

/// CPU configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuConfig {
    /// Handling of undocumented opcodes.
    pub illegal_opcode_policy: IllegalOpcodePolicy,

    /// Record the data accesses of each step so observers (watchpoints) can
    /// see them. Costs a small push per memory access.
    pub record_accesses: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            illegal_opcode_policy: IllegalOpcodePolicy::Halt,
            record_accesses: true,
        }
    }
}

impl CpuConfig {
    /// Sets the illegal-opcode policy.
    pub fn with_illegal_opcode_policy(mut self, policy: IllegalOpcodePolicy) -> Self {
        self.illegal_opcode_policy = policy;
        self
    }

    /// Enables or disables per-step access recording.
    pub fn with_record_accesses(mut self, record: bool) -> Self {
        self.record_accesses = record;
        self
    }
}

/// Debugger configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebuggerConfig {
    /// Number of hotspots reported by the performance profile.
    pub hotspot_count: usize,

    /// Trace capacity used by `start_tracing_default`.
    pub default_trace_capacity: usize,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            hotspot_count: 10,
            default_trace_capacity: 1024,
        }
    }
}

impl DebuggerConfig {
    /// Sets the number of reported hotspots.
    pub fn with_hotspot_count(mut self, count: usize) -> Self {
        self.hotspot_count = count;
        self
    }

    /// Sets the default trace capacity.
    pub fn with_default_trace_capacity(mut self, capacity: usize) -> Self {
        self.default_trace_capacity = capacity;
        self
    }
}
