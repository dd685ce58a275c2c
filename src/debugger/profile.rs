//! Performance profile derived from a trace.

use std::collections::{BTreeMap, HashMap};

use super::trace::TraceEntry;
use crate::opcodes::Mnemonic;

/// An address and how many traced instructions started there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hotspot {
    /// Instruction address
    pub address: u16,
    /// Times executed
    pub count: u64,
}

/// Aggregate statistics over a set of trace entries.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceProfile {
    /// Number of traced instructions
    pub total_instructions: u64,
    /// Sum of their cycles
    pub total_cycles: u64,
    /// `total_cycles / total_instructions`, 0.0 for an empty trace
    pub average_cycles_per_instruction: f64,
    /// Executions per mnemonic
    pub mnemonic_frequency: BTreeMap<Mnemonic, u64>,
    /// Most executed addresses, by count descending then address ascending
    pub hotspots: Vec<Hotspot>,
}

impl PerformanceProfile {
    /// Builds a profile reporting at most `hotspot_count` hotspots.
    ///
    /// ```
    /// use emu6502::PerformanceProfile;
    ///
    /// let empty = PerformanceProfile::from_entries(&[], 10);
    /// assert_eq!(empty.total_instructions, 0);
    /// assert_eq!(empty.average_cycles_per_instruction, 0.0);
    /// ```
    pub fn from_entries(entries: &[TraceEntry], hotspot_count: usize) -> Self {
        let mut mnemonic_frequency = BTreeMap::new();
        let mut per_address: HashMap<u16, u64> = HashMap::new();
        let mut total_cycles = 0u64;

        for entry in entries {
            *mnemonic_frequency.entry(entry.mnemonic).or_insert(0) += 1;
            *per_address.entry(entry.address).or_insert(0) += 1;
            total_cycles += entry.cycles as u64;
        }

        let mut hotspots: Vec<Hotspot> = per_address
            .into_iter()
            .map(|(address, count)| Hotspot { address, count })
            .collect();
        hotspots.sort_by(|a, b| b.count.cmp(&a.count).then(a.address.cmp(&b.address)));
        hotspots.truncate(hotspot_count);

        let total_instructions = entries.len() as u64;
        let average_cycles_per_instruction = if total_instructions == 0 {
            0.0
        } else {
            total_cycles as f64 / total_instructions as f64
        };

        Self {
            total_instructions,
            total_cycles,
            average_cycles_per_instruction,
            mnemonic_frequency,
            hotspots,
        }
    }
}
