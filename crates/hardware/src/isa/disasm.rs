//! Instruction Disassembler for RV32I.
//!
//! Converts a 32-bit instruction encoding into a mnemonic string for trace
//! output and test diagnostics. Immediates come from the same format table the
//! decoder uses, so the disassembly always agrees with what the pipeline sees.
//!
//! ```
//! use rv32pipe_core::isa::disasm::disassemble;
//! assert_eq!(disassemble(0x00A0_0513), "addi a0, zero, 10");
//! ```

use crate::isa::abi::name as xreg;
use crate::isa::decode::decode;
use crate::isa::instruction::Decoded;
use crate::isa::rv32i::{funct3 as f3, funct7 as f7, opcodes as op};

/// Disassembles a 32-bit RV32I instruction.
///
/// Returns `"unknown"` for encodings outside the supported subset.
pub fn disassemble(inst: u32) -> String {
    let Ok(d) = decode(inst) else {
        return "unknown".to_string();
    };
    let (rd, rs1, rs2, imm) = (xreg(d.rd), xreg(d.rs1), xreg(d.rs2), d.imm);

    match d.opcode {
        op::OP_REG => disasm_op_reg(&d),
        op::OP_IMM => disasm_op_imm(&d),

        op::OP_LOAD => {
            let mn = match d.funct3 {
                f3::LB => "lb",
                f3::LH => "lh",
                f3::LW => "lw",
                f3::LBU => "lbu",
                f3::LHU => "lhu",
                _ => return "unknown".to_string(),
            };
            format!("{mn} {rd}, {imm}({rs1})")
        }

        op::OP_STORE => {
            let mn = match d.funct3 {
                f3::SB => "sb",
                f3::SH => "sh",
                f3::SW => "sw",
                _ => return "unknown".to_string(),
            };
            format!("{mn} {rs2}, {imm}({rs1})")
        }

        op::OP_BRANCH => {
            let mn = match d.funct3 {
                f3::BEQ => "beq",
                f3::BNE => "bne",
                f3::BLT => "blt",
                f3::BGE => "bge",
                f3::BLTU => "bltu",
                f3::BGEU => "bgeu",
                _ => return "unknown".to_string(),
            };
            format!("{mn} {rs1}, {rs2}, {imm}")
        }

        op::OP_LUI => format!("lui {rd}, {:#x}", (imm as u32) >> 12),
        op::OP_AUIPC => format!("auipc {rd}, {:#x}", (imm as u32) >> 12),
        op::OP_JAL => format!("jal {rd}, {imm}"),
        op::OP_JALR => format!("jalr {rd}, {imm}({rs1})"),
        op::OP_MISC_MEM => "fence".to_string(),

        op::OP_SYSTEM => match inst {
            op::ECALL => "ecall".to_string(),
            op::EBREAK => "ebreak".to_string(),
            _ => "unknown".to_string(),
        },

        _ => "unknown".to_string(),
    }
}

fn disasm_op_reg(d: &Decoded) -> String {
    let mn = match (d.funct3, d.funct7) {
        (f3::ADD_SUB, f7::DEFAULT) => "add",
        (f3::ADD_SUB, f7::SUB) => "sub",
        (f3::SLL, f7::DEFAULT) => "sll",
        (f3::SLT, f7::DEFAULT) => "slt",
        (f3::SLTU, f7::DEFAULT) => "sltu",
        (f3::XOR, f7::DEFAULT) => "xor",
        (f3::SRL_SRA, f7::DEFAULT) => "srl",
        (f3::SRL_SRA, f7::SRA) => "sra",
        (f3::OR, f7::DEFAULT) => "or",
        (f3::AND, f7::DEFAULT) => "and",
        _ => return "unknown".to_string(),
    };
    format!("{mn} {}, {}, {}", xreg(d.rd), xreg(d.rs1), xreg(d.rs2))
}

fn disasm_op_imm(d: &Decoded) -> String {
    let (rd, rs1) = (xreg(d.rd), xreg(d.rs1));
    let mn = match d.funct3 {
        f3::ADD_SUB => "addi",
        f3::SLT => "slti",
        f3::SLTU => "sltiu",
        f3::XOR => "xori",
        f3::OR => "ori",
        f3::AND => "andi",
        f3::SLL => return format!("slli {rd}, {rs1}, {}", d.shamt),
        f3::SRL_SRA => {
            let mn = if d.funct7 == f7::SRA { "srai" } else { "srli" };
            return format!("{mn} {rd}, {rs1}, {}", d.shamt);
        }
        _ => return "unknown".to_string(),
    };
    format!("{mn} {rd}, {rs1}, {}", d.imm)
}
