//! Instruction encoder.
//!
//! [`Instr`] carries already-resolved operands and always encodes. The free
//! functions (`addi`, `ld`, ...) take operand tokens, resolve them and encode
//! in one step; they are the per-mnemonic entry points used by the builder.

use crate::error::{AsmError, Result};
use crate::isa::Mnemonic;
use crate::operand::{parse_imm, parse_mem, parse_reg, Mem, Reg};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    Addi { rt: Reg, rs: Reg, imm: i32 },
    Add { rd: Reg, rs: Reg, rt: Reg },
    Sub { rd: Reg, rs: Reg, rt: Reg },
    Syscall,
    Ld { rt: Reg, mem: Mem },
    St { rt: Reg, mem: Mem },
    Stp { rt1: Reg, rt2: Reg, mem: Mem },
    Bne { rs: Reg, rt: Reg, offset: i32 },
    Beq { rs: Reg, rt: Reg, offset: i32 },
    Sbit { rd: Reg, rs: Reg, imm: i32 },
    Ssat { rd: Reg, rs: Reg, imm: i32 },
    Bext { rd: Reg, rs1: Reg, rs2: Reg },
    Cls { rd: Reg, rs: Reg },
    J { index: u32 },
}

impl Instr {
    pub fn mnemonic(&self) -> Mnemonic {
        match self {
            Instr::Addi { .. } => Mnemonic::Addi,
            Instr::Add { .. } => Mnemonic::Add,
            Instr::Sub { .. } => Mnemonic::Sub,
            Instr::Syscall => Mnemonic::Syscall,
            Instr::Ld { .. } => Mnemonic::Ld,
            Instr::St { .. } => Mnemonic::St,
            Instr::Stp { .. } => Mnemonic::Stp,
            Instr::Bne { .. } => Mnemonic::Bne,
            Instr::Beq { .. } => Mnemonic::Beq,
            Instr::Sbit { .. } => Mnemonic::Sbit,
            Instr::Ssat { .. } => Mnemonic::Ssat,
            Instr::Bext { .. } => Mnemonic::Bext,
            Instr::Cls { .. } => Mnemonic::Cls,
            Instr::J { .. } => Mnemonic::J,
        }
    }

    /// Encodes into a 32-bit word. Immediates wider than their field are
    /// truncated to the field's low bits.
    pub fn encode(&self) -> u32 {
        let desc = self.mnemonic().desc();
        let r = |x: &Reg| u32::from(*x);
        // Negative values keep their two's-complement low bits after `place`.
        let imm = |v: &i32| *v as u32;
        match self {
            Instr::Addi { rt, rs, imm: v } => desc.pack(&[r(rs), r(rt), imm(v)]),
            Instr::Add { rd, rs, rt } | Instr::Sub { rd, rs, rt } => {
                desc.pack(&[r(rs), r(rt), r(rd)])
            }
            Instr::Syscall => desc.pack(&[]),
            Instr::Ld { rt, mem } | Instr::St { rt, mem } => {
                desc.pack(&[r(&mem.base), r(rt), imm(&mem.offset)])
            }
            Instr::Stp { rt1, rt2, mem } => {
                desc.pack(&[r(&mem.base), r(rt1), r(rt2), imm(&mem.offset)])
            }
            Instr::Bne { rs, rt, offset } | Instr::Beq { rs, rt, offset } => {
                desc.pack(&[r(rs), r(rt), imm(offset)])
            }
            Instr::Sbit { rd, rs, imm: v } | Instr::Ssat { rd, rs, imm: v } => {
                desc.pack(&[r(rd), r(rs), imm(v)])
            }
            Instr::Bext { rd, rs1, rs2 } => desc.pack(&[r(rd), r(rs1), r(rs2)]),
            Instr::Cls { rd, rs } => desc.pack(&[r(rd), r(rs)]),
            Instr::J { index } => desc.pack(&[*index]),
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.mnemonic();
        match self {
            Instr::Addi { rt, rs, imm } => write!(f, "{m} {rt}, {rs}, {imm}"),
            Instr::Add { rd, rs, rt } | Instr::Sub { rd, rs, rt } => {
                write!(f, "{m} {rd}, {rs}, {rt}")
            }
            Instr::Syscall => write!(f, "{m}"),
            Instr::Ld { rt, mem } | Instr::St { rt, mem } => write!(f, "{m} {rt}, {mem}"),
            Instr::Stp { rt1, rt2, mem } => write!(f, "{m} {rt1}, {rt2}, {mem}"),
            Instr::Bne { rs, rt, offset } | Instr::Beq { rs, rt, offset } => {
                write!(f, "{m} {rs}, {rt}, {offset:+}")
            }
            Instr::Sbit { rd, rs, imm } | Instr::Ssat { rd, rs, imm } => {
                write!(f, "{m} {rd}, {rs}, #{imm}")
            }
            Instr::Bext { rd, rs1, rs2 } => write!(f, "{m} {rd}, {rs1}, {rs2}"),
            Instr::Cls { rd, rs } => write!(f, "{m} {rd}, {rs}"),
            Instr::J { index } => write!(f, "{m} {index}"),
        }
    }
}

fn reg(m: Mnemonic, tok: &str) -> Result<Reg> {
    parse_reg(tok).map_err(AsmError::encode(m))
}

fn mem(m: Mnemonic, tok: &str) -> Result<Mem> {
    parse_mem(tok).map_err(AsmError::encode(m))
}

fn lit(m: Mnemonic, tok: &str) -> Result<i32> {
    parse_imm(tok).map_err(AsmError::encode(m))
}

/// Resolves operand tokens into an [`Instr`] without encoding it.
pub mod resolve {
    use super::*;

    pub fn addi(rt: &str, rs: &str, imm: i32) -> Result<Instr> {
        let m = Mnemonic::Addi;
        Ok(Instr::Addi { rt: reg(m, rt)?, rs: reg(m, rs)?, imm })
    }

    pub fn add(rd: &str, rs: &str, rt: &str) -> Result<Instr> {
        let m = Mnemonic::Add;
        Ok(Instr::Add { rd: reg(m, rd)?, rs: reg(m, rs)?, rt: reg(m, rt)? })
    }

    pub fn sub(rd: &str, rs: &str, rt: &str) -> Result<Instr> {
        let m = Mnemonic::Sub;
        Ok(Instr::Sub { rd: reg(m, rd)?, rs: reg(m, rs)?, rt: reg(m, rt)? })
    }

    pub fn ld(rt: &str, addr: &str) -> Result<Instr> {
        let m = Mnemonic::Ld;
        Ok(Instr::Ld { rt: reg(m, rt)?, mem: mem(m, addr)? })
    }

    pub fn st(rt: &str, addr: &str) -> Result<Instr> {
        let m = Mnemonic::St;
        Ok(Instr::St { rt: reg(m, rt)?, mem: mem(m, addr)? })
    }

    pub fn stp(rt1: &str, rt2: &str, addr: &str) -> Result<Instr> {
        let m = Mnemonic::Stp;
        Ok(Instr::Stp { rt1: reg(m, rt1)?, rt2: reg(m, rt2)?, mem: mem(m, addr)? })
    }

    pub fn bne(rs: &str, rt: &str, offset: i32) -> Result<Instr> {
        let m = Mnemonic::Bne;
        Ok(Instr::Bne { rs: reg(m, rs)?, rt: reg(m, rt)?, offset })
    }

    pub fn beq(rs: &str, rt: &str, offset: i32) -> Result<Instr> {
        let m = Mnemonic::Beq;
        Ok(Instr::Beq { rs: reg(m, rs)?, rt: reg(m, rt)?, offset })
    }

    pub fn sbit(rd: &str, rs: &str, imm: &str) -> Result<Instr> {
        let m = Mnemonic::Sbit;
        Ok(Instr::Sbit { rd: reg(m, rd)?, rs: reg(m, rs)?, imm: lit(m, imm)? })
    }

    pub fn ssat(rd: &str, rs: &str, imm: &str) -> Result<Instr> {
        let m = Mnemonic::Ssat;
        Ok(Instr::Ssat { rd: reg(m, rd)?, rs: reg(m, rs)?, imm: lit(m, imm)? })
    }

    pub fn bext(rd: &str, rs1: &str, rs2: &str) -> Result<Instr> {
        let m = Mnemonic::Bext;
        Ok(Instr::Bext { rd: reg(m, rd)?, rs1: reg(m, rs1)?, rs2: reg(m, rs2)? })
    }

    pub fn cls(rd: &str, rs: &str) -> Result<Instr> {
        let m = Mnemonic::Cls;
        Ok(Instr::Cls { rd: reg(m, rd)?, rs: reg(m, rs)? })
    }
}

pub fn addi(rt: &str, rs: &str, imm: i32) -> Result<u32> {
    resolve::addi(rt, rs, imm).map(|i| i.encode())
}

pub fn add(rd: &str, rs: &str, rt: &str) -> Result<u32> {
    resolve::add(rd, rs, rt).map(|i| i.encode())
}

pub fn sub(rd: &str, rs: &str, rt: &str) -> Result<u32> {
    resolve::sub(rd, rs, rt).map(|i| i.encode())
}

pub fn syscall() -> u32 {
    Instr::Syscall.encode()
}

pub fn ld(rt: &str, addr: &str) -> Result<u32> {
    resolve::ld(rt, addr).map(|i| i.encode())
}

pub fn st(rt: &str, addr: &str) -> Result<u32> {
    resolve::st(rt, addr).map(|i| i.encode())
}

pub fn stp(rt1: &str, rt2: &str, addr: &str) -> Result<u32> {
    resolve::stp(rt1, rt2, addr).map(|i| i.encode())
}

pub fn bne(rs: &str, rt: &str, offset: i32) -> Result<u32> {
    resolve::bne(rs, rt, offset).map(|i| i.encode())
}

pub fn beq(rs: &str, rt: &str, offset: i32) -> Result<u32> {
    resolve::beq(rs, rt, offset).map(|i| i.encode())
}

pub fn sbit(rd: &str, rs: &str, imm: &str) -> Result<u32> {
    resolve::sbit(rd, rs, imm).map(|i| i.encode())
}

pub fn ssat(rd: &str, rs: &str, imm: &str) -> Result<u32> {
    resolve::ssat(rd, rs, imm).map(|i| i.encode())
}

pub fn bext(rd: &str, rs1: &str, rs2: &str) -> Result<u32> {
    resolve::bext(rd, rs1, rs2).map(|i| i.encode())
}

pub fn cls(rd: &str, rs: &str) -> Result<u32> {
    resolve::cls(rd, rs).map(|i| i.encode())
}

pub fn j(index: u32) -> u32 {
    Instr::J { index }.encode()
}
