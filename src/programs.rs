//! Demo programs assembled by `tinymips-asm`.

use crate::builder::ProgramBuilder;
use crate::error::Result;

/// `r3 = 5 + 3`, `r4 = 5 - 3`, prints r3 and exits.
pub fn arith() -> Result<ProgramBuilder> {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 5)?
        .addi("r2", "r0", 3)?
        .add("r3", "r1", "r2")?
        .sub("r4", "r1", "r2")?
        .addi("r8", "r0", 1)? // print r3
        .syscall()?
        .addi("r8", "zero", 0)? // exit
        .syscall()?;
    Ok(b)
}

/// Reads n, prints F(n), exits.
pub fn fibonacci() -> Result<ProgramBuilder> {
    let mut b = ProgramBuilder::new();
    b.addi("r8", "r0", 3)? // read n into r3
        .syscall()?
        .add("r1", "r0", "r3")?
        .addi("r2", "r0", 0)? // F(i-1)
        .addi("r3", "r0", 1)? // F(i)
        .addi("r4", "r0", 1)? // i
        .beq("r1", "r0", 8)? // n == 0
        .beq("r1", "r4", 8)? // n == 1
        // 8: loop
        .addi("r4", "r4", 1)?
        .add("r6", "r2", "r3")?
        .add("r2", "r0", "r3")?
        .add("r3", "r0", "r6")?
        .bne("r4", "r1", -4)?
        .j(15)?
        // 14
        .addi("r3", "r0", 0)?
        // 15: print r3, exit
        .addi("r8", "r0", 1)?
        .syscall()?
        .addi("r8", "r0", 0)?
        .syscall()?;
    Ok(b)
}
