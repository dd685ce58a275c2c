//! Breakpoint records.

use super::condition::{Condition, ConditionContext, ConditionError};

/// When a breakpoint or watchpoint last fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitStamp {
    /// CPU cycle counter after the step
    pub cycle: u64,
    /// Instructions retired after the step
    pub instruction: u64,
}

/// A program-counter breakpoint.
///
/// Hits are evaluated against the PC after each observed step, so a
/// breakpoint at `X` fires once the CPU is about to execute the instruction at
/// `X`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoint {
    /// Address the breakpoint is keyed by
    pub address: u16,

    /// Display name, `bp_$XXXX` unless one was given
    pub name: String,

    /// Disabled breakpoints are kept but never evaluated
    pub enabled: bool,

    /// Extra predicate that must hold for a hit
    #[cfg_attr(feature = "serde", serde(skip))]
    pub condition: Option<Condition>,

    /// Number of hits so far
    pub hit_count: u64,

    /// Most recent hit
    pub last_hit: Option<HitStamp>,

    /// Removed after its first hit
    pub temporary: bool,

    pub(crate) condition_error_reported: bool,
}

impl Breakpoint {
    pub(crate) fn new(address: u16, condition: Option<Condition>, name: Option<&str>) -> Self {
        Self {
            address,
            name: name.map_or_else(|| format!("bp_${address:04X}"), str::to_string),
            enabled: true,
            condition,
            hit_count: 0,
            last_hit: None,
            temporary: false,
            condition_error_reported: false,
        }
    }

    /// Whether evaluating the condition has failed at least once.
    pub fn condition_failed(&self) -> bool {
        self.condition_error_reported
    }

    pub(crate) fn check(&self, ctx: &ConditionContext) -> Result<bool, ConditionError> {
        match &self.condition {
            Some(condition) => condition.evaluate(ctx),
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registers;

    #[test]
    fn test_default_name() {
        assert_eq!(Breakpoint::new(0x8000, None, None).name, "bp_$8000");
        assert_eq!(Breakpoint::new(0x00FF, None, Some("loop")).name, "loop");
    }

    #[test]
    fn test_unconditional_always_holds() {
        let bp = Breakpoint::new(0x1234, None, None);
        let ctx = ConditionContext {
            registers: Registers::default(),
            hit_count: 99,
            last_value: None,
        };
        assert_eq!(bp.check(&ctx), Ok(true));
    }
}
