//! Opcode table tests.
//!
//! Checks the table as a whole against the NMOS 6502 instruction set: how
//! many entries are documented, sizes agree with modes, and spot checks of
//! cycle counts and penalties.

use emu6502::{AddressingMode, Mnemonic, OPCODE_TABLE};

#[test]
fn test_table_has_every_opcode() {
    assert_eq!(OPCODE_TABLE.len(), 256);
}

#[test]
fn test_documented_and_illegal_counts() {
    let documented = OPCODE_TABLE.iter().filter(|m| !m.illegal).count();
    let illegal = OPCODE_TABLE.iter().filter(|m| m.illegal).count();
    assert_eq!(documented, 151);
    assert_eq!(illegal, 105);
}

#[test]
fn test_illegal_entries_are_one_byte_two_cycles() {
    for (opcode, meta) in OPCODE_TABLE.iter().enumerate().filter(|(_, m)| m.illegal) {
        assert_eq!(meta.mnemonic, Mnemonic::Ill, "opcode 0x{opcode:02X}");
        assert_eq!(meta.size_bytes, 1, "opcode 0x{opcode:02X}");
        assert_eq!(meta.base_cycles, 2, "opcode 0x{opcode:02X}");
        assert!(!meta.page_penalty, "opcode 0x{opcode:02X}");
    }
}

#[test]
fn test_sizes_match_addressing_modes() {
    for (opcode, meta) in OPCODE_TABLE.iter().enumerate().filter(|(_, m)| !m.illegal) {
        assert_eq!(
            meta.size_bytes,
            meta.addressing_mode.instruction_len(),
            "opcode 0x{opcode:02X}"
        );
    }
}

#[test]
fn test_every_documented_mnemonic_present() {
    let mut seen: Vec<Mnemonic> = OPCODE_TABLE
        .iter()
        .filter(|m| !m.illegal)
        .map(|m| m.mnemonic)
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 56);
}

#[test]
fn test_branches_are_relative() {
    for meta in OPCODE_TABLE.iter().filter(|m| m.mnemonic.is_branch()) {
        assert_eq!(meta.addressing_mode, AddressingMode::Relative);
        assert_eq!(meta.base_cycles, 2);
        assert_eq!(meta.size_bytes, 2);
    }
    let branches = OPCODE_TABLE.iter().filter(|m| m.mnemonic.is_branch()).count();
    assert_eq!(branches, 8);
}

#[test]
fn test_known_cycle_counts() {
    let cases: &[(u8, Mnemonic, u8)] = &[
        (0x00, Mnemonic::Brk, 7),
        (0x20, Mnemonic::Jsr, 6),
        (0x40, Mnemonic::Rti, 6),
        (0x60, Mnemonic::Rts, 6),
        (0x4C, Mnemonic::Jmp, 3),
        (0x6C, Mnemonic::Jmp, 5),
        (0xA1, Mnemonic::Lda, 6),
        (0xB1, Mnemonic::Lda, 5),
        (0x91, Mnemonic::Sta, 6),
        (0x1E, Mnemonic::Asl, 7),
        (0x48, Mnemonic::Pha, 3),
        (0x68, Mnemonic::Pla, 4),
        (0xEE, Mnemonic::Inc, 6),
    ];

    for &(opcode, mnemonic, cycles) in cases {
        let meta = &OPCODE_TABLE[opcode as usize];
        assert_eq!(meta.mnemonic, mnemonic, "opcode 0x{opcode:02X}");
        assert_eq!(meta.base_cycles, cycles, "opcode 0x{opcode:02X}");
    }
}

#[test]
fn test_page_penalty_only_on_indexed_reads() {
    // LDA abs,X / abs,Y / (zp),Y
    assert!(OPCODE_TABLE[0xBD].page_penalty);
    assert!(OPCODE_TABLE[0xB9].page_penalty);
    assert!(OPCODE_TABLE[0xB1].page_penalty);
    // LDX abs,Y and LDY abs,X
    assert!(OPCODE_TABLE[0xBE].page_penalty);
    assert!(OPCODE_TABLE[0xBC].page_penalty);

    // Read-modify-write and stores pay the fixed cost
    assert!(!OPCODE_TABLE[0x1E].page_penalty);
    assert!(!OPCODE_TABLE[0xFE].page_penalty);
    assert!(!OPCODE_TABLE[0x9D].page_penalty);
    // Zero page indexed never crosses
    assert!(!OPCODE_TABLE[0xB5].page_penalty);
}

#[test]
fn test_accumulator_shifts() {
    for opcode in [0x0A, 0x2A, 0x4A, 0x6A] {
        let meta = &OPCODE_TABLE[opcode];
        assert_eq!(meta.addressing_mode, AddressingMode::Accumulator);
        assert_eq!(meta.size_bytes, 1);
        assert_eq!(meta.base_cycles, 2);
    }
}

#[test]
fn test_mnemonic_display_pads() {
    assert_eq!(format!("{:<5}|", Mnemonic::Lda), "LDA  |");
    assert_eq!(Mnemonic::Ill.to_string(), "???");
}
