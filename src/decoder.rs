use crate::isa::{self, FieldSpan};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Addi,
    Add,
    Sub,
    Syscall,
    Ld,
    St,
    Stp,
    Bne,
    Beq,
    Sbit,
    Ssat,
    Bext,
    Cls,
    J,
}

/// Raw field view of a word. Which fields are meaningful depends on `op`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub op: Op,
    pub raw: u32,
    pub a: u8,      // [25:21]
    pub b: u8,      // [20:16]
    pub c: u8,      // [15:11]
    pub imm16: i32, // [15:0], sign-extended
    pub off11: u32, // [10:0], unsigned
    pub index: u32, // [25:0]
}

pub trait Decoder {
    fn decode(&self, raw32: u32) -> Option<Decoded>;
}

const A: FieldSpan = FieldSpan::operand("a", 21, 5);
const B: FieldSpan = FieldSpan::operand("b", 16, 5);
const C: FieldSpan = FieldSpan::operand("c", 11, 5);
const IMM16: FieldSpan = FieldSpan::operand("imm16", 0, 16);
const OFF11: FieldSpan = FieldSpan::operand("offset11", 0, 11);
const INDEX26: FieldSpan = FieldSpan::operand("index26", 0, 26);

pub fn sign_ext(v: u32, bits: u32) -> i32 {
    let s = 32 - bits;
    ((v << s) as i32) >> s
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IsaDecoder;

impl IsaDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for IsaDecoder {
    fn decode(&self, raw32: u32) -> Option<Decoded> {
        let opcode = isa::OPCODE.extract(raw32);
        let op = if opcode == isa::OPCODE_SPECIAL {
            match isa::FUNCT.extract(raw32) {
                isa::FUNCT_ADD => Op::Add,
                isa::FUNCT_SUB => Op::Sub,
                isa::FUNCT_SYSCALL => Op::Syscall,
                isa::FUNCT_BEXT => Op::Bext,
                isa::FUNCT_CLS => Op::Cls,
                _ => return None,
            }
        } else {
            match opcode {
                isa::OPCODE_ADDI => Op::Addi,
                isa::OPCODE_LD => Op::Ld,
                isa::OPCODE_ST => Op::St,
                isa::OPCODE_STP => Op::Stp,
                isa::OPCODE_BNE => Op::Bne,
                isa::OPCODE_BEQ => Op::Beq,
                isa::OPCODE_SBIT => Op::Sbit,
                isa::OPCODE_SSAT => Op::Ssat,
                isa::OPCODE_J => Op::J,
                _ => return None,
            }
        };
        Some(Decoded {
            op,
            raw: raw32,
            a: A.extract(raw32) as u8,
            b: B.extract(raw32) as u8,
            c: C.extract(raw32) as u8,
            imm16: sign_ext(IMM16.extract(raw32), 16),
            off11: OFF11.extract(raw32),
            index: INDEX26.extract(raw32),
        })
    }
}
