//! # 6502 Instruction Implementations
//!
//! Semantic actions for every documented instruction, organized by category.
//! The CPU has already resolved the operand and advanced PC past the
//! instruction when these run; each action only touches registers, flags and
//! memory.
//!
//! ## Categories
//!
//! - **alu**: ADC, SBC, AND, ORA, EOR, CMP, CPX, CPY, BIT
//! - **branches**: BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS
//! - **shifts**: ASL, LSR, ROL, ROR
//! - **load_store**: LDA, LDX, LDY, STA, STX, STY
//! - **inc_dec**: INC, DEC, INX, INY, DEX, DEY
//! - **control**: JMP, JSR, RTS, RTI, BRK, NOP
//! - **stack**: PHA, PHP, PLA, PLP
//! - **flags**: CLC, SEC, CLI, SEI, CLD, SED, CLV
//! - **transfer**: TAX, TAY, TXA, TYA, TSX, TXS

pub(crate) mod alu;
pub(crate) mod branches;
pub(crate) mod control;
pub(crate) mod flags;
pub(crate) mod inc_dec;
pub(crate) mod load_store;
pub(crate) mod shifts;
pub(crate) mod stack;
pub(crate) mod transfer;

use crate::addressing::Resolved;
use crate::opcodes::Mnemonic;
use crate::registers::Flag;
use crate::{MemoryBus, CPU};

/// Runs the semantic action for `mnemonic` and returns the cycles it adds on
/// top of the table's base cost (taken branches only).
pub(crate) fn execute<M: MemoryBus>(cpu: &mut CPU<M>, mnemonic: Mnemonic, resolved: Resolved) -> u8 {
    use Mnemonic::*;

    let operand = resolved.operand;
    let p = cpu.regs.p;

    match mnemonic {
        Adc => alu::execute_adc(cpu, operand),
        Sbc => alu::execute_sbc(cpu, operand),
        And => alu::execute_and(cpu, operand),
        Ora => alu::execute_ora(cpu, operand),
        Eor => alu::execute_eor(cpu, operand),
        Cmp => alu::execute_cmp(cpu, operand),
        Cpx => alu::execute_cpx(cpu, operand),
        Cpy => alu::execute_cpy(cpu, operand),
        Bit => alu::execute_bit(cpu, operand),

        Bcc => return branches::branch_if(cpu, !p.c, resolved),
        Bcs => return branches::branch_if(cpu, p.c, resolved),
        Beq => return branches::branch_if(cpu, p.z, resolved),
        Bne => return branches::branch_if(cpu, !p.z, resolved),
        Bmi => return branches::branch_if(cpu, p.n, resolved),
        Bpl => return branches::branch_if(cpu, !p.n, resolved),
        Bvc => return branches::branch_if(cpu, !p.v, resolved),
        Bvs => return branches::branch_if(cpu, p.v, resolved),

        Asl => shifts::execute_asl(cpu, operand),
        Lsr => shifts::execute_lsr(cpu, operand),
        Rol => shifts::execute_rol(cpu, operand),
        Ror => shifts::execute_ror(cpu, operand),

        Lda => load_store::execute_lda(cpu, operand),
        Ldx => load_store::execute_ldx(cpu, operand),
        Ldy => load_store::execute_ldy(cpu, operand),
        Sta => load_store::execute_sta(cpu, operand),
        Stx => load_store::execute_stx(cpu, operand),
        Sty => load_store::execute_sty(cpu, operand),

        Inc => inc_dec::execute_inc(cpu, operand),
        Dec => inc_dec::execute_dec(cpu, operand),
        Inx => inc_dec::execute_inx(cpu),
        Iny => inc_dec::execute_iny(cpu),
        Dex => inc_dec::execute_dex(cpu),
        Dey => inc_dec::execute_dey(cpu),

        Jmp => control::execute_jmp(cpu, operand),
        Jsr => control::execute_jsr(cpu, operand),
        Rts => control::execute_rts(cpu),
        Rti => control::execute_rti(cpu),
        Brk => control::execute_brk(cpu),
        Nop | Ill => {}

        Pha => stack::execute_pha(cpu),
        Php => stack::execute_php(cpu),
        Pla => stack::execute_pla(cpu),
        Plp => stack::execute_plp(cpu),

        Clc => flags::execute_flag_write(cpu, Flag::Carry, false),
        Sec => flags::execute_flag_write(cpu, Flag::Carry, true),
        Cli => flags::execute_flag_write(cpu, Flag::InterruptDisable, false),
        Sei => flags::execute_flag_write(cpu, Flag::InterruptDisable, true),
        Cld => flags::execute_flag_write(cpu, Flag::Decimal, false),
        Sed => flags::execute_flag_write(cpu, Flag::Decimal, true),
        Clv => flags::execute_flag_write(cpu, Flag::Overflow, false),

        Tax => transfer::execute_tax(cpu),
        Tay => transfer::execute_tay(cpu),
        Txa => transfer::execute_txa(cpu),
        Tya => transfer::execute_tya(cpu),
        Tsx => transfer::execute_tsx(cpu),
        Txs => transfer::execute_txs(cpu),
    }

    0
}
