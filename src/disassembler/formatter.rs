//! Formatting functions for disassembled instructions

use std::fmt::Write;

use crate::addressing::AddressingMode;
use crate::disassembler::{DisassemblyOptions, Instruction};

/// Formats one instruction as assembly text, e.g. `LDA ($40),Y`.
///
/// Relative branches show their absolute target.
pub fn format_instruction(instr: &Instruction) -> String {
    if instr.is_data() {
        return format!(".byte ${:02X}", instr.opcode);
    }

    let operand = format_operand(instr);
    if operand.is_empty() {
        instr.mnemonic.to_string()
    } else {
        format!("{} {}", instr.mnemonic, operand)
    }
}

fn format_operand(instr: &Instruction) -> String {
    use AddressingMode::*;

    let [lo, hi] = instr.operands;
    let word = u16::from_le_bytes([lo, hi]);

    match instr.addressing_mode {
        Implicit => String::new(),
        Accumulator => "A".to_string(),
        Immediate => format!("#${lo:02X}"),
        ZeroPage => format!("${lo:02X}"),
        ZeroPageX => format!("${lo:02X},X"),
        ZeroPageY => format!("${lo:02X},Y"),
        Relative => {
            let target = instr
                .address
                .wrapping_add(2)
                .wrapping_add_signed(lo as i8 as i16);
            format!("${target:04X}")
        }
        Absolute => format!("${word:04X}"),
        AbsoluteX => format!("${word:04X},X"),
        AbsoluteY => format!("${word:04X},Y"),
        Indirect => format!("(${word:04X})"),
        IndirectX => format!("(${lo:02X},X)"),
        IndirectY => format!("(${lo:02X}),Y"),
    }
}

/// Renders a listing, one instruction per line.
///
/// ```
/// use emu6502::disassembler::{disassemble, format_listing, DisassemblyOptions};
///
/// let options = DisassemblyOptions { start_address: 0x8000, hex_dump: true, ..Default::default() };
/// let listing = disassemble(&[0xA9, 0x01, 0x60], options);
///
/// assert_eq!(
///     format_listing(&listing, &options),
///     "8000  A9 01     LDA #$01\n8002  60        RTS\n"
/// );
/// ```
pub fn format_listing(instructions: &[Instruction], options: &DisassemblyOptions) -> String {
    let mut out = String::new();
    for instr in instructions {
        if options.show_offsets {
            let offset = instr.address.wrapping_sub(options.start_address);
            let _ = write!(out, "+{offset:04X} ");
        }
        let _ = write!(out, "{:04X}  ", instr.address);
        if options.hex_dump {
            let mut bytes = format!("{:02X}", instr.opcode);
            for b in instr.operand_bytes() {
                let _ = write!(bytes, " {b:02X}");
            }
            let _ = write!(out, "{bytes:<10}");
        }
        out.push_str(&format_instruction(instr));
        out.push('\n');
    }
    out
}
