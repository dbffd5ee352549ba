use rv32pipe_core::isa::rv32i::{funct3 as f3, funct7 as f7, opcodes::*};

/// Fluent RV32I encoder.
///
/// Set the fields, then `build()` packs them according to the opcode's format.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstructionBuilder {
    opcode: u32,
    rd: u32,
    funct3: u32,
    rs1: u32,
    rs2: u32,
    funct7: u32,
    imm: i32,
}

impl InstructionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opcode(mut self, op: u32) -> Self {
        self.opcode = op;
        self
    }

    pub fn rd(mut self, rd: u32) -> Self {
        self.rd = rd;
        self
    }

    pub fn rs1(mut self, rs1: u32) -> Self {
        self.rs1 = rs1;
        self
    }

    pub fn rs2(mut self, rs2: u32) -> Self {
        self.rs2 = rs2;
        self
    }

    pub fn funct3(mut self, funct3: u32) -> Self {
        self.funct3 = funct3;
        self
    }

    pub fn funct7(mut self, funct7: u32) -> Self {
        self.funct7 = funct7;
        self
    }

    pub fn imm(mut self, imm: i32) -> Self {
        self.imm = imm;
        self
    }

    fn r(self, rd: u32, rs1: u32, rs2: u32, funct3: u32, funct7: u32) -> Self {
        self.opcode(OP_REG)
            .rd(rd)
            .rs1(rs1)
            .rs2(rs2)
            .funct3(funct3)
            .funct7(funct7)
    }

    fn i(self, opcode: u32, rd: u32, rs1: u32, funct3: u32, imm: i32) -> Self {
        self.opcode(opcode).rd(rd).rs1(rs1).funct3(funct3).imm(imm)
    }

    // --- Helpers for Common Instructions ---

    pub fn add(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::ADD_SUB, f7::DEFAULT)
    }

    pub fn sub(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::ADD_SUB, f7::SUB)
    }

    pub fn and(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::AND, f7::DEFAULT)
    }

    pub fn or(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::OR, f7::DEFAULT)
    }

    pub fn xor(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::XOR, f7::DEFAULT)
    }

    pub fn sll(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::SLL, f7::DEFAULT)
    }

    pub fn srl(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::SRL_SRA, f7::DEFAULT)
    }

    pub fn sra(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::SRL_SRA, f7::SRA)
    }

    pub fn slt(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::SLT, f7::DEFAULT)
    }

    pub fn sltu(self, rd: u32, rs1: u32, rs2: u32) -> Self {
        self.r(rd, rs1, rs2, f3::SLTU, f7::DEFAULT)
    }

    pub fn addi(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, rd, rs1, f3::ADD_SUB, imm)
    }

    pub fn slti(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, rd, rs1, f3::SLT, imm)
    }

    pub fn sltiu(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, rd, rs1, f3::SLTU, imm)
    }

    pub fn ori(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, rd, rs1, f3::OR, imm)
    }

    pub fn xori(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, rd, rs1, f3::XOR, imm)
    }

    pub fn andi(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_IMM, rd, rs1, f3::AND, imm)
    }

    pub fn slli(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.i(OP_IMM, rd, rs1, f3::SLL, (shamt & 0x1F) as i32)
    }

    pub fn srli(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.i(OP_IMM, rd, rs1, f3::SRL_SRA, (shamt & 0x1F) as i32)
    }

    pub fn srai(self, rd: u32, rs1: u32, shamt: u32) -> Self {
        self.i(
            OP_IMM,
            rd,
            rs1,
            f3::SRL_SRA,
            ((f7::SRA << 5) | (shamt & 0x1F)) as i32,
        )
    }

    pub fn lw(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, rd, rs1, f3::LW, imm)
    }

    pub fn lh(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, rd, rs1, f3::LH, imm)
    }

    pub fn lhu(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, rd, rs1, f3::LHU, imm)
    }

    pub fn lb(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, rd, rs1, f3::LB, imm)
    }

    pub fn lbu(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_LOAD, rd, rs1, f3::LBU, imm)
    }

    pub fn sw(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.opcode(OP_STORE)
            .rs1(rs1)
            .rs2(rs2)
            .funct3(f3::SW)
            .imm(imm)
    }

    pub fn sh(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.sw(rs1, rs2, imm).funct3(f3::SH)
    }

    pub fn sb(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.sw(rs1, rs2, imm).funct3(f3::SB)
    }

    pub fn beq(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.opcode(OP_BRANCH)
            .rs1(rs1)
            .rs2(rs2)
            .funct3(f3::BEQ)
            .imm(imm)
    }

    pub fn bne(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.beq(rs1, rs2, imm).funct3(f3::BNE)
    }

    pub fn blt(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.beq(rs1, rs2, imm).funct3(f3::BLT)
    }

    pub fn bge(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.beq(rs1, rs2, imm).funct3(f3::BGE)
    }

    pub fn bltu(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.beq(rs1, rs2, imm).funct3(f3::BLTU)
    }

    pub fn bgeu(self, rs1: u32, rs2: u32, imm: i32) -> Self {
        self.beq(rs1, rs2, imm).funct3(f3::BGEU)
    }

    pub fn jal(self, rd: u32, imm: i32) -> Self {
        self.opcode(OP_JAL).rd(rd).imm(imm)
    }

    pub fn jalr(self, rd: u32, rs1: u32, imm: i32) -> Self {
        self.i(OP_JALR, rd, rs1, f3::JALR, imm)
    }

    /// `lui rd, imm20`: `imm20` is the 20-bit upper immediate.
    pub fn lui(self, rd: u32, imm20: u32) -> Self {
        self.opcode(OP_LUI).rd(rd).imm((imm20 << 12) as i32)
    }

    /// `auipc rd, imm20`: `imm20` is the 20-bit upper immediate.
    pub fn auipc(self, rd: u32, imm20: u32) -> Self {
        self.opcode(OP_AUIPC).rd(rd).imm((imm20 << 12) as i32)
    }

    /// Packs the fields according to the opcode's format.
    pub fn build(self) -> u32 {
        let imm = self.imm as u32;
        let rd = (self.rd & 0x1F) << 7;
        let rs1 = (self.rs1 & 0x1F) << 15;
        let rs2 = (self.rs2 & 0x1F) << 20;
        let f3 = (self.funct3 & 0x7) << 12;
        let op = self.opcode & 0x7F;

        match self.opcode {
            OP_REG => ((self.funct7 & 0x7F) << 25) | rs2 | rs1 | f3 | rd | op,
            OP_STORE => {
                (((imm >> 5) & 0x7F) << 25) | rs2 | rs1 | f3 | ((imm & 0x1F) << 7) | op
            }
            OP_BRANCH => {
                (((imm >> 12) & 1) << 31)
                    | (((imm >> 5) & 0x3F) << 25)
                    | rs2
                    | rs1
                    | f3
                    | (((imm >> 1) & 0xF) << 8)
                    | (((imm >> 11) & 1) << 7)
                    | op
            }
            OP_LUI | OP_AUIPC => (imm & 0xFFFF_F000) | rd | op,
            OP_JAL => {
                (((imm >> 20) & 1) << 31)
                    | (((imm >> 1) & 0x3FF) << 21)
                    | (((imm >> 11) & 1) << 20)
                    | (((imm >> 12) & 0xFF) << 12)
                    | rd
                    | op
            }
            _ => ((imm & 0xFFF) << 20) | rs1 | f3 | rd | op,
        }
    }
}

/// One-call encoders for test programs.
pub mod asm {
    use super::InstructionBuilder as B;
    use rv32pipe_core::isa::rv32i::opcodes::{EBREAK, ECALL};

    pub fn nop() -> u32 {
        addi(0, 0, 0)
    }
    pub fn ecall() -> u32 {
        ECALL
    }
    pub fn ebreak() -> u32 {
        EBREAK
    }
    pub fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().add(rd, rs1, rs2).build()
    }
    pub fn sub(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().sub(rd, rs1, rs2).build()
    }
    pub fn and(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().and(rd, rs1, rs2).build()
    }
    pub fn or(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().or(rd, rs1, rs2).build()
    }
    pub fn xor(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().xor(rd, rs1, rs2).build()
    }
    pub fn sll(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().sll(rd, rs1, rs2).build()
    }
    pub fn srl(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().srl(rd, rs1, rs2).build()
    }
    pub fn sra(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().sra(rd, rs1, rs2).build()
    }
    pub fn slt(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().slt(rd, rs1, rs2).build()
    }
    pub fn sltu(rd: u32, rs1: u32, rs2: u32) -> u32 {
        B::new().sltu(rd, rs1, rs2).build()
    }
    pub fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().addi(rd, rs1, imm).build()
    }
    pub fn slti(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().slti(rd, rs1, imm).build()
    }
    pub fn sltiu(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().sltiu(rd, rs1, imm).build()
    }
    pub fn ori(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().ori(rd, rs1, imm).build()
    }
    pub fn xori(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().xori(rd, rs1, imm).build()
    }
    pub fn andi(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().andi(rd, rs1, imm).build()
    }
    pub fn slli(rd: u32, rs1: u32, shamt: u32) -> u32 {
        B::new().slli(rd, rs1, shamt).build()
    }
    pub fn srli(rd: u32, rs1: u32, shamt: u32) -> u32 {
        B::new().srli(rd, rs1, shamt).build()
    }
    pub fn srai(rd: u32, rs1: u32, shamt: u32) -> u32 {
        B::new().srai(rd, rs1, shamt).build()
    }
    pub fn lw(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().lw(rd, rs1, imm).build()
    }
    pub fn lh(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().lh(rd, rs1, imm).build()
    }
    pub fn lhu(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().lhu(rd, rs1, imm).build()
    }
    pub fn lb(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().lb(rd, rs1, imm).build()
    }
    pub fn lbu(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().lbu(rd, rs1, imm).build()
    }
    pub fn sw(rs1: u32, rs2: u32, imm: i32) -> u32 {
        B::new().sw(rs1, rs2, imm).build()
    }
    pub fn sh(rs1: u32, rs2: u32, imm: i32) -> u32 {
        B::new().sh(rs1, rs2, imm).build()
    }
    pub fn sb(rs1: u32, rs2: u32, imm: i32) -> u32 {
        B::new().sb(rs1, rs2, imm).build()
    }
    pub fn beq(rs1: u32, rs2: u32, imm: i32) -> u32 {
        B::new().beq(rs1, rs2, imm).build()
    }
    pub fn bne(rs1: u32, rs2: u32, imm: i32) -> u32 {
        B::new().bne(rs1, rs2, imm).build()
    }
    pub fn blt(rs1: u32, rs2: u32, imm: i32) -> u32 {
        B::new().blt(rs1, rs2, imm).build()
    }
    pub fn bge(rs1: u32, rs2: u32, imm: i32) -> u32 {
        B::new().bge(rs1, rs2, imm).build()
    }
    pub fn bltu(rs1: u32, rs2: u32, imm: i32) -> u32 {
        B::new().bltu(rs1, rs2, imm).build()
    }
    pub fn bgeu(rs1: u32, rs2: u32, imm: i32) -> u32 {
        B::new().bgeu(rs1, rs2, imm).build()
    }
    pub fn jal(rd: u32, imm: i32) -> u32 {
        B::new().jal(rd, imm).build()
    }
    pub fn jalr(rd: u32, rs1: u32, imm: i32) -> u32 {
        B::new().jalr(rd, rs1, imm).build()
    }
    pub fn lui(rd: u32, imm20: u32) -> u32 {
        B::new().lui(rd, imm20).build()
    }
    pub fn auipc(rd: u32, imm20: u32) -> u32 {
        B::new().auipc(rd, imm20).build()
    }
}
