use crate::decoder::{Decoded, Op};

pub fn fmt_decoded(d: &Decoded) -> String {
    match d.op {
        Op::Addi => format!("addi r{}, r{}, {}", d.b, d.a, d.imm16),
        Op::Add => format!("add r{}, r{}, r{}", d.c, d.a, d.b),
        Op::Sub => format!("sub r{}, r{}, r{}", d.c, d.a, d.b),
        Op::Syscall => "syscall".to_string(),
        Op::Ld => format!("ld r{}, {}(r{})", d.b, d.imm16, d.a),
        Op::St => format!("st r{}, {}(r{})", d.b, d.imm16, d.a),
        Op::Stp => format!("stp r{}, r{}, {}(r{})", d.b, d.c, d.off11, d.a),
        Op::Bne => format!("bne r{}, r{}, {:+}", d.a, d.b, d.imm16),
        Op::Beq => format!("beq r{}, r{}, {:+}", d.a, d.b, d.imm16),
        Op::Sbit => format!("sbit r{}, r{}, #{}", d.a, d.b, d.c),
        Op::Ssat => format!("ssat r{}, r{}, #{}", d.a, d.b, d.c),
        Op::Bext => format!("bext r{}, r{}, r{}", d.a, d.b, d.c),
        Op::Cls => format!("cls r{}, r{}", d.a, d.b),
        Op::J => format!("j {}", d.index),
    }
}
