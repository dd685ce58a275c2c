//! Watchpoint records and access filtering.

use std::fmt;
use std::str::FromStr;

use super::breakpoints::HitStamp;
use super::condition::{Condition, ConditionContext, ConditionError};
use crate::cpu::AccessKind;

/// Which data accesses a watchpoint reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessType {
    /// Any read of the address.
    Read,
    /// A write that leaves memory holding a different value than the last
    /// one seen. Writes the bus drops never count.
    Write,
    /// A read, or a write that changes the value.
    #[default]
    Both,
    /// Any read or any write, changed or not.
    Access,
}

impl AccessType {
    /// Whether an access of `kind` passes this filter. `changed` says whether
    /// a write left the watched byte different from the last value seen.
    pub fn matches(self, kind: AccessKind, changed: bool) -> bool {
        match (self, kind) {
            (AccessType::Read | AccessType::Both | AccessType::Access, AccessKind::Read) => true,
            (AccessType::Write | AccessType::Both, AccessKind::Write) => changed,
            (AccessType::Access, AccessKind::Write) => true,
            (AccessType::Write, AccessKind::Read) => false,
            (AccessType::Read, AccessKind::Write) => false,
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AccessType::Read => "read",
            AccessType::Write => "write",
            AccessType::Both => "both",
            AccessType::Access => "access",
        })
    }
}

impl FromStr for AccessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "read" => Ok(AccessType::Read),
            "w" | "write" => Ok(AccessType::Write),
            "rw" | "both" => Ok(AccessType::Both),
            "a" | "access" | "any" => Ok(AccessType::Access),
            _ => Err(format!("unknown access type {s:?}")),
        }
    }
}

/// A data watchpoint on one address.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Watchpoint {
    /// Watched address
    pub address: u16,

    /// Display name, `wp_$XXXX` unless one was given
    pub name: String,

    /// Access filter
    pub access: AccessType,

    /// Disabled watchpoints are kept but never evaluated
    pub enabled: bool,

    /// Extra predicate that must hold for a hit
    #[cfg_attr(feature = "serde", serde(skip))]
    pub condition: Option<Condition>,

    /// Number of hits so far
    pub hit_count: u64,

    /// Value seen at registration or at the last hit; `None` when the memory
    /// could not be read at registration
    pub last_value: Option<u8>,

    /// Most recent hit
    pub last_hit: Option<HitStamp>,

    pub(crate) condition_error_reported: bool,
}

impl Watchpoint {
    pub(crate) fn new(
        address: u16,
        access: AccessType,
        condition: Option<Condition>,
        name: Option<&str>,
        initial: Option<u8>,
    ) -> Self {
        Self {
            address,
            name: name.map_or_else(|| format!("wp_${address:04X}"), str::to_string),
            access,
            enabled: true,
            condition,
            hit_count: 0,
            last_value: initial,
            last_hit: None,
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
