use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mnemonic {
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

impl Mnemonic {
    pub const ALL: [Mnemonic; 14] = [
        Mnemonic::Addi,
        Mnemonic::Add,
        Mnemonic::Sub,
        Mnemonic::Syscall,
        Mnemonic::Ld,
        Mnemonic::St,
        Mnemonic::Stp,
        Mnemonic::Bne,
        Mnemonic::Beq,
        Mnemonic::Sbit,
        Mnemonic::Ssat,
        Mnemonic::Bext,
        Mnemonic::Cls,
        Mnemonic::J,
    ];

    pub fn desc(self) -> &'static InstrDesc {
        // TABLE is ordered like `ALL`.
        &TABLE[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.desc().name
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    R,
    I,
    Memory,
    Branch,
    J,
    Custom,
    SparseR,
    Special,
}

/// A contiguous bit span `[lo + width - 1 : lo]` inside an instruction word.
///
/// Spans with a `fixed` value are filled by the table (opcode, funct,
/// zero padding); the rest take operands in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub name: &'static str,
    pub lo: u8,
    pub width: u8,
    pub fixed: Option<u32>,
}

impl FieldSpan {
    pub const fn operand(name: &'static str, lo: u8, width: u8) -> Self {
        Self { name, lo, width, fixed: None }
    }

    pub const fn fixed(name: &'static str, lo: u8, width: u8, value: u32) -> Self {
        Self { name, lo, width, fixed: Some(value) }
    }

    /// All-ones mask of the field width, unshifted.
    pub const fn mask(&self) -> u32 {
        if self.width >= 32 { u32::MAX } else { (1u32 << self.width) - 1 }
    }

    /// Mask of the bits this span occupies within the word.
    pub const fn word_mask(&self) -> u32 {
        self.mask() << self.lo
    }

    /// Truncates `value` to the field width and moves it into position.
    pub const fn place(&self, value: u32) -> u32 {
        (value & self.mask()) << self.lo
    }

    pub const fn extract(&self, word: u32) -> u32 {
        (word >> self.lo) & self.mask()
    }

    pub const fn hi(&self) -> u8 {
        self.lo + self.width - 1
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub mnemonic: Mnemonic,
    pub name: &'static str,
    pub format: Format,
    pub opcode: u32,
    pub funct: Option<u32>,
    pub fields: &'static [FieldSpan],
}

impl InstrDesc {
    pub fn operand_fields(&self) -> impl Iterator<Item = &FieldSpan> {
        self.fields.iter().filter(|f| f.fixed.is_none())
    }

    /// Packs operand values into a word following this layout.
    /// `operands` are consumed in the order of the non-fixed spans.
    pub fn pack(&self, operands: &[u32]) -> u32 {
        debug_assert_eq!(
            operands.len(),
            self.operand_fields().count(),
            "{} takes {} operand fields",
            self.name,
            self.operand_fields().count()
        );
        let mut ops = operands.iter();
        self.fields.iter().fold(0u32, |word, f| {
            let v = match f.fixed {
                Some(v) => v,
                None => ops.next().copied().unwrap_or(0),
            };
            word | f.place(v)
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpan> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub const OPCODE_SPECIAL: u32 = 0b000000;
pub const OPCODE_SSAT: u32 = 0b001101;
pub const OPCODE_STP: u32 = 0b010101;
pub const OPCODE_BNE: u32 = 0b011000;
pub const OPCODE_BEQ: u32 = 0b011010;
pub const OPCODE_SBIT: u32 = 0b011100;
pub const OPCODE_J: u32 = 0b011111;
pub const OPCODE_ADDI: u32 = 0b101101;
pub const OPCODE_ST: u32 = 0b110111;
pub const OPCODE_LD: u32 = 0b111001;

pub const FUNCT_CLS: u32 = 0b001010;
pub const FUNCT_ADD: u32 = 0b010010;
pub const FUNCT_BEXT: u32 = 0b010100;
pub const FUNCT_SYSCALL: u32 = 0b101000;
pub const FUNCT_SUB: u32 = 0b110110;

pub const OPCODE: FieldSpan = FieldSpan::operand("opcode", 26, 6);
pub const FUNCT: FieldSpan = FieldSpan::operand("funct", 0, 6);

const fn op(value: u32) -> FieldSpan {
    FieldSpan::fixed("opcode", 26, 6, value)
}

const fn funct(value: u32) -> FieldSpan {
    FieldSpan::fixed("funct", 0, 6, value)
}

const fn zero(name: &'static str, lo: u8, width: u8) -> FieldSpan {
    FieldSpan::fixed(name, lo, width, 0)
}

const fn reg(name: &'static str, lo: u8) -> FieldSpan {
    FieldSpan::operand(name, lo, 5)
}

const R3_ADD: &[FieldSpan] = &[
    op(OPCODE_SPECIAL),
    reg("rs", 21),
    reg("rt", 16),
    reg("rd", 11),
    zero("shamt", 6, 5),
    funct(FUNCT_ADD),
];

const R3_SUB: &[FieldSpan] = &[
    op(OPCODE_SPECIAL),
    reg("rs", 21),
    reg("rt", 16),
    reg("rd", 11),
    zero("shamt", 6, 5),
    funct(FUNCT_SUB),
];

const fn imm16_layout(
    opcode: u32,
    base_name: &'static str,
    imm_name: &'static str,
) -> [FieldSpan; 4] {
    [
        op(opcode),
        reg(base_name, 21),
        reg("rt", 16),
        FieldSpan::operand(imm_name, 0, 16),
    ]
}

const ADDI: [FieldSpan; 4] = imm16_layout(OPCODE_ADDI, "rs", "imm16");
const LD: [FieldSpan; 4] = imm16_layout(OPCODE_LD, "base", "offset16");
const ST: [FieldSpan; 4] = imm16_layout(OPCODE_ST, "base", "offset16");
const BNE: [FieldSpan; 4] = imm16_layout(OPCODE_BNE, "rs", "offset16");
const BEQ: [FieldSpan; 4] = imm16_layout(OPCODE_BEQ, "rs", "offset16");

const fn bit_layout(opcode: u32) -> [FieldSpan; 5] {
    [
        op(opcode),
        reg("rd", 21),
        reg("rs", 16),
        FieldSpan::operand("imm5", 11, 5),
        zero("zero", 0, 11),
    ]
}

const SBIT: [FieldSpan; 5] = bit_layout(OPCODE_SBIT);
const SSAT: [FieldSpan; 5] = bit_layout(OPCODE_SSAT);

pub static TABLE: [InstrDesc; 14] = [
    InstrDesc {
        mnemonic: Mnemonic::Addi,
        name: "ADDI",
        format: Format::I,
        opcode: OPCODE_ADDI,
        funct: None,
        fields: &ADDI,
    },
    InstrDesc {
        mnemonic: Mnemonic::Add,
        name: "ADD",
        format: Format::R,
        opcode: OPCODE_SPECIAL,
        funct: Some(FUNCT_ADD),
        fields: R3_ADD,
    },
    InstrDesc {
        mnemonic: Mnemonic::Sub,
        name: "SUB",
        format: Format::R,
        opcode: OPCODE_SPECIAL,
        funct: Some(FUNCT_SUB),
        fields: R3_SUB,
    },
    InstrDesc {
        mnemonic: Mnemonic::Syscall,
        name: "SYSCALL",
        format: Format::Special,
        opcode: OPCODE_SPECIAL,
        funct: Some(FUNCT_SYSCALL),
        fields: &[
            op(OPCODE_SPECIAL),
            zero("zero", 11, 15),
            zero("code", 6, 5),
            funct(FUNCT_SYSCALL),
        ],
    },
    InstrDesc {
        mnemonic: Mnemonic::Ld,
        name: "LD",
        format: Format::Memory,
        opcode: OPCODE_LD,
        funct: None,
        fields: &LD,
    },
    InstrDesc {
        mnemonic: Mnemonic::St,
        name: "ST",
        format: Format::Memory,
        opcode: OPCODE_ST,
        funct: None,
        fields: &ST,
    },
    InstrDesc {
        mnemonic: Mnemonic::Stp,
        name: "STP",
        format: Format::Custom,
        opcode: OPCODE_STP,
        funct: None,
        fields: &[
            op(OPCODE_STP),
            reg("base", 21),
            reg("rt1", 16),
            reg("rt2", 11),
            FieldSpan::operand("offset11", 0, 11),
        ],
    },
    InstrDesc {
        mnemonic: Mnemonic::Bne,
        name: "BNE",
        format: Format::Branch,
        opcode: OPCODE_BNE,
        funct: None,
        fields: &BNE,
    },
    InstrDesc {
        mnemonic: Mnemonic::Beq,
        name: "BEQ",
        format: Format::Branch,
        opcode: OPCODE_BEQ,
        funct: None,
        fields: &BEQ,
    },
    InstrDesc {
        mnemonic: Mnemonic::Sbit,
        name: "SBIT",
        format: Format::Custom,
        opcode: OPCODE_SBIT,
        funct: None,
        fields: &SBIT,
    },
    InstrDesc {
        mnemonic: Mnemonic::Ssat,
        name: "SSAT",
        format: Format::Custom,
        opcode: OPCODE_SSAT,
        funct: None,
        fields: &SSAT,
    },
    InstrDesc {
        mnemonic: Mnemonic::Bext,
        name: "BEXT",
        format: Format::R,
        opcode: OPCODE_SPECIAL,
        funct: Some(FUNCT_BEXT),
        fields: &[
            op(OPCODE_SPECIAL),
            reg("rd", 21),
            reg("rs1", 16),
            reg("rs2", 11),
            zero("pad5", 6, 5),
            funct(FUNCT_BEXT),
        ],
    },
    // CLS has no second source and no shamt; bits [15:6] stay zero.
    InstrDesc {
        mnemonic: Mnemonic::Cls,
        name: "CLS",
        format: Format::SparseR,
        opcode: OPCODE_SPECIAL,
        funct: Some(FUNCT_CLS),
        fields: &[
            op(OPCODE_SPECIAL),
            reg("rd", 21),
            reg("rs", 16),
            zero("zero", 6, 10),
            funct(FUNCT_CLS),
        ],
    },
    InstrDesc {
        mnemonic: Mnemonic::J,
        name: "J",
        format: Format::J,
        opcode: OPCODE_J,
        funct: None,
        fields: &[op(OPCODE_J), FieldSpan::operand("index26", 0, 26)],
    },
];
