//! Fuzz target for the disassembler.
//!
//! Disassembles arbitrary bytes and cross-checks the result against the
//! opcode table and the single-instruction decoder; the instructions must
//! cover the input with no gaps.

#![no_main]

use arbitrary::Arbitrary;
use emu6502::disassembler::{decode_instruction, format_instruction, format_listing};
use emu6502::{disassemble, DisassemblyOptions, OPCODE_TABLE};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Listing {
    origin: u16,
    hex_dump: bool,
    show_offsets: bool,
    code: Vec<u8>,
}

fuzz_target!(|listing: Listing| {
    if listing.code.len() > 0x1_0000 {
        return;
    }

    let options = DisassemblyOptions {
        start_address: listing.origin,
        hex_dump: listing.hex_dump,
        show_offsets: listing.show_offsets,
    };
    let decoded = disassemble(&listing.code, options);

    let mut offset = 0usize;
    for instr in &decoded {
        let here = listing.origin.wrapping_add(offset as u16);
        assert_eq!(instr.address, here);
        assert_eq!(instr.opcode, listing.code[offset]);

        let meta = &OPCODE_TABLE[instr.opcode as usize];
        let text = format_instruction(instr);
        if instr.is_data() {
            // Either illegal, or cut off by the end of the input
            assert_eq!(instr.size_bytes, 1);
            assert!(meta.illegal || offset + meta.size_bytes as usize > listing.code.len());
            assert_eq!(text, format!(".byte ${:02X}", instr.opcode));
        } else {
            assert_eq!(instr.size_bytes, meta.size_bytes);
            assert_eq!(instr.mnemonic, meta.mnemonic);
            assert_eq!(
                instr.operand_bytes(),
                &listing.code[offset + 1..offset + instr.size_bytes as usize]
            );
            assert_eq!(decode_instruction(&listing.code[offset..], here), Some(*instr));
            assert!(text.starts_with(instr.mnemonic.as_str()));
        }

        offset += instr.size_bytes as usize;
    }
    assert_eq!(offset, listing.code.len());

    let rendered = format_listing(&decoded, &options);
    assert_eq!(rendered.lines().count(), decoded.len());
});
