use crate::emitter::{Emitter, ListingEntry};
use crate::encoder::{resolve, Instr};
use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Fluent front end: each mnemonic method resolves its operands, encodes and
/// appends in one step. A failing call appends nothing.
///
/// ```
/// use tinymips::ProgramBuilder;
///
/// let mut b = ProgramBuilder::new();
/// b.addi("r1", "r0", 5)?.addi("r2", "r0", 3)?.add("r3", "r1", "r2")?;
/// assert_eq!(b.len(), 3);
/// # Ok::<(), tinymips::AsmError>(())
/// ```
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    emitter: Emitter,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an already resolved instruction.
    pub fn push(&mut self, instr: Instr) -> Result<&mut Self> {
        let word = instr.encode();
        self.emitter.append(word)?;
        tracing::debug!(
            index = self.emitter.len() - 1,
            word = format_args!("{word:#010x}"),
            "{instr}"
        );
        Ok(self)
    }

    fn emit(&mut self, instr: Result<Instr>) -> Result<&mut Self> {
        self.push(instr?)
    }

    pub fn addi(&mut self, rt: &str, rs: &str, imm: i32) -> Result<&mut Self> {
        self.emit(resolve::addi(rt, rs, imm))
    }

    pub fn add(&mut self, rd: &str, rs: &str, rt: &str) -> Result<&mut Self> {
        self.emit(resolve::add(rd, rs, rt))
    }

    pub fn sub(&mut self, rd: &str, rs: &str, rt: &str) -> Result<&mut Self> {
        self.emit(resolve::sub(rd, rs, rt))
    }

    pub fn syscall(&mut self) -> Result<&mut Self> {
        self.push(Instr::Syscall)
    }

    pub fn ld(&mut self, rt: &str, addr: &str) -> Result<&mut Self> {
        self.emit(resolve::ld(rt, addr))
    }

    pub fn st(&mut self, rt: &str, addr: &str) -> Result<&mut Self> {
        self.emit(resolve::st(rt, addr))
    }

    pub fn stp(&mut self, rt1: &str, rt2: &str, addr: &str) -> Result<&mut Self> {
        self.emit(resolve::stp(rt1, rt2, addr))
    }

    pub fn bne(&mut self, rs: &str, rt: &str, offset: i32) -> Result<&mut Self> {
        self.emit(resolve::bne(rs, rt, offset))
    }

    pub fn beq(&mut self, rs: &str, rt: &str, offset: i32) -> Result<&mut Self> {
        self.emit(resolve::beq(rs, rt, offset))
    }

    pub fn sbit(&mut self, rd: &str, rs: &str, imm: &str) -> Result<&mut Self> {
        self.emit(resolve::sbit(rd, rs, imm))
    }

    pub fn ssat(&mut self, rd: &str, rs: &str, imm: &str) -> Result<&mut Self> {
        self.emit(resolve::ssat(rd, rs, imm))
    }

    pub fn bext(&mut self, rd: &str, rs1: &str, rs2: &str) -> Result<&mut Self> {
        self.emit(resolve::bext(rd, rs1, rs2))
    }

    pub fn cls(&mut self, rd: &str, rs: &str) -> Result<&mut Self> {
        self.emit(resolve::cls(rd, rs))
    }

    pub fn j(&mut self, index: u32) -> Result<&mut Self> {
        self.push(Instr::J { index })
    }

    pub fn len(&self) -> usize {
        self.emitter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitter.is_empty()
    }

    pub fn words(&self) -> &[u32] {
        self.emitter.words()
    }

    pub fn listing(&self) -> Vec<ListingEntry> {
        self.emitter.listing()
    }

    pub fn finalize<W: Write>(&mut self, sink: W) -> Result<usize> {
        self.emitter.finalize(sink)
    }

    pub fn finalize_to_path(&mut self, path: &Path) -> Result<usize> {
        self.emitter.finalize_to_path(path)
    }

    pub fn into_emitter(self) -> Emitter {
        self.emitter
    }
}
