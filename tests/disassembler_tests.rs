//! Disassembler integration tests.

use emu6502::disassembler::{decode_instruction, format_instruction, format_listing};
use emu6502::{disassemble, AddressingMode, DisassemblyOptions, Mnemonic};

fn at(address: u16) -> DisassemblyOptions {
    DisassemblyOptions {
        start_address: address,
        ..Default::default()
    }
}

#[test]
fn test_disassemble_small_program() {
    // LDX #$05 ; loop: DEX ; BNE loop ; RTS
    let code = [0xA2, 0x05, 0xCA, 0xD0, 0xFD, 0x60];
    let listing = disassemble(&code, at(0x0600));

    let text: Vec<String> = listing.iter().map(format_instruction).collect();
    assert_eq!(text, ["LDX #$05", "DEX", "BNE $0602", "RTS"]);

    let addresses: Vec<u16> = listing.iter().map(|i| i.address).collect();
    assert_eq!(addresses, [0x0600, 0x0602, 0x0603, 0x0605]);
}

#[test]
fn test_every_documented_opcode_decodes() {
    for opcode in 0..=255u8 {
        let bytes = [opcode, 0x34, 0x12];
        let instr = decode_instruction(&bytes, 0x4000).unwrap();

        if instr.is_data() {
            assert_eq!(instr.size_bytes, 1);
            assert_eq!(format_instruction(&instr), format!(".byte ${opcode:02X}"));
        } else {
            assert_ne!(instr.mnemonic, Mnemonic::Ill);
            assert_eq!(instr.operand_bytes().len() + 1, instr.size_bytes as usize);
            assert!(format_instruction(&instr).starts_with(instr.mnemonic.as_str()));
        }
    }
}

#[test]
fn test_illegal_bytes_between_instructions() {
    let listing = disassemble(&[0xEA, 0xFF, 0x02, 0xEA], at(0));

    assert_eq!(listing.len(), 4);
    assert!(listing[1].is_data());
    assert!(listing[2].is_data());
    assert_eq!(format_instruction(&listing[1]), ".byte $FF");
    assert_eq!(listing[3].mnemonic, Mnemonic::Nop);
}

#[test]
fn test_truncated_tail_is_data() {
    // JMP with a single operand byte
    let listing = disassemble(&[0xEA, 0x4C, 0x00], at(0x8000));

    assert_eq!(listing.len(), 3);
    assert_eq!(format_instruction(&listing[1]), ".byte $4C");
    assert_eq!(format_instruction(&listing[2]), "BRK");
}

#[test]
fn test_operand_bytes_little_endian_text() {
    let instr = decode_instruction(&[0xBD, 0x34, 0x12], 0).unwrap();

    assert_eq!(instr.addressing_mode, AddressingMode::AbsoluteX);
    assert_eq!(instr.operand_bytes(), &[0x34, 0x12]);
    assert_eq!(format_instruction(&instr), "LDA $1234,X");
}

#[test]
fn test_branch_target_wraps_address_space() {
    let instr = decode_instruction(&[0xD0, 0x10], 0xFFF8).unwrap();
    assert_eq!(format_instruction(&instr), "BNE $000A");
}

#[test]
fn test_listing_with_hex_dump() {
    let options = DisassemblyOptions {
        start_address: 0xC000,
        hex_dump: true,
        show_offsets: false,
    };
    let listing = disassemble(&[0x8D, 0x00, 0x02, 0xEA], options);

    assert_eq!(
        format_listing(&listing, &options),
        "C000  8D 00 02  STA $0200\nC003  EA        NOP\n"
    );
}

#[test]
fn test_listing_empty() {
    let options = DisassemblyOptions::default();
    assert_eq!(format_listing(&disassemble(&[], options), &options), "");
}
