use tinymips::encoder::{self, Instr};
use tinymips::isa::{self, Mnemonic};
use tinymips::{AsmError, Mem, OperandError, Reg};

fn r(i: u8) -> Reg {
    Reg::new(i).unwrap()
}

fn opcode(w: u32) -> u32 {
    (w >> 26) & 0x3F
}

fn funct(w: u32) -> u32 {
    w & 0x3F
}

#[test]
fn golden_words() {
    let cases: &[(u32, u32, &str)] = &[
        (encoder::addi("r1", "r0", 5).unwrap(), 0b101101_00000_00001_0000000000000101, "ADDI r1, r0, 5"),
        (encoder::add("r3", "r1", "r2").unwrap(), 0b000000_00001_00010_00011_00000_010010, "ADD r3, r1, r2"),
        (encoder::sub("r3", "r1", "r2").unwrap(), 0b000000_00001_00010_00011_00000_110110, "SUB r3, r1, r2"),
        (encoder::syscall(), 0b101000, "SYSCALL"),
        (encoder::sbit("r3", "r0", "5").unwrap(), 0b011100_00011_00000_00101_00000000000, "SBIT r3, r0, 5"),
        (encoder::ssat("r3", "r1", "#3").unwrap(), 0b001101_00011_00001_00011_00000000000, "SSAT r3, r1, 3"),
        (encoder::bext("r3", "r1", "r2").unwrap(), 0b000000_00011_00001_00010_00000_010100, "BEXT r3, r1, r2"),
        (encoder::cls("r3", "r1").unwrap(), 0b000000_00011_00001_0000000000_001010, "CLS r3, r1"),
        (encoder::st("r2", "0(r1)").unwrap(), 0b110111_00001_00010_0000000000000000, "ST r2, 0(r1)"),
        (encoder::ld("r4", "0(r3)").unwrap(), 0b111001_00011_00100_0000000000000000, "LD r4, 0(r3)"),
        (encoder::beq("r1", "r2", 2).unwrap(), 0b011010_00001_00010_0000000000000010, "BEQ r1, r2, 2"),
        (encoder::j(2), 0b011111_00000000000000000000000010, "J 2"),
        (encoder::stp("r1", "r2", "0(r4)").unwrap(), 0b010101_00100_00001_00010_00000000000, "STP r1, r2, 0(r4)"),
        (encoder::addi("r4", "r0", 0x800).unwrap(), 0b101101_00000_00100_0000100000000000, "ADDI r4, r0, 0x800"),
    ];
    for &(got, want, what) in cases {
        assert_eq!(got, want, "{what}: got {got:#034b}");
    }
}

#[test]
fn r_format_opcode_and_funct_hold_for_all_registers() {
    for a in 0..32u8 {
        for b in [0u8, 1, 17, 31] {
            let words = [
                (Instr::Add { rd: r(a), rs: r(b), rt: r(31 - a) }.encode(), isa::FUNCT_ADD),
                (Instr::Sub { rd: r(b), rs: r(a), rt: r(a) }.encode(), isa::FUNCT_SUB),
                (Instr::Bext { rd: r(a), rs1: r(b), rs2: r(a) }.encode(), isa::FUNCT_BEXT),
                (Instr::Cls { rd: r(a), rs: r(b) }.encode(), isa::FUNCT_CLS),
            ];
            for (w, f) in words {
                assert_eq!(opcode(w), 0);
                assert_eq!(funct(w), f);
            }
        }
    }
}

#[test]
fn register_fields_round_trip() {
    for i in 0..32u8 {
        let j = 31 - i;
        let k = (i + 7) % 32;
        let w = Instr::Add { rd: r(k), rs: r(i), rt: r(j) }.encode();
        assert_eq!(((w >> 21) & 0x1F, (w >> 16) & 0x1F, (w >> 11) & 0x1F), (i as u32, j as u32, k as u32));

        let w = Instr::Stp { rt1: r(j), rt2: r(k), mem: Mem::new(0, r(i)) }.encode();
        assert_eq!(((w >> 21) & 0x1F, (w >> 16) & 0x1F, (w >> 11) & 0x1F), (i as u32, j as u32, k as u32));

        let w = Instr::Sbit { rd: r(i), rs: r(j), imm: 0 }.encode();
        assert_eq!(((w >> 21) & 0x1F, (w >> 16) & 0x1F), (i as u32, j as u32));
    }
}

#[test]
fn sixteen_bit_fields_keep_twos_complement_low_bits() {
    for v in [0, 1, -1, 5, -5, 0x7FFF, -0x8000, 0xFFFF, 65536, 123_456, i32::MIN, i32::MAX] {
        let want = (v as u32) & 0xFFFF;
        assert_eq!(encoder::addi("r1", "r2", v).unwrap() & 0xFFFF, want, "addi {v}");
        assert_eq!(encoder::ld("r1", &format!("{v}(r2)")).unwrap() & 0xFFFF, want, "ld {v}");
        assert_eq!(encoder::st("r1", &format!("{v}(r2)")).unwrap() & 0xFFFF, want, "st {v}");
        assert_eq!(encoder::bne("r1", "r2", v).unwrap() & 0xFFFF, want, "bne {v}");
        assert_eq!(encoder::beq("r1", "r2", v).unwrap() & 0xFFFF, want, "beq {v}");
    }
    assert_eq!(encoder::addi("r1", "r0", -1).unwrap() & 0xFFFF, 0xFFFF);
}

#[test]
fn overflowing_immediate_is_masked_not_rejected() {
    let w = encoder::addi("r1", "r0", 65536).unwrap();
    assert_eq!(w & 0xFFFF, 0x0000);
    // The overflow must not leak into the register fields.
    assert_eq!((w >> 16) & 0x1F, 1);
    assert_eq!((w >> 21) & 0x1F, 0);
    assert_eq!(opcode(w), isa::OPCODE_ADDI);
}

#[test]
fn stp_offset_is_eleven_bits() {
    let w = encoder::stp("r1", "r2", "-1(r4)").unwrap();
    assert_eq!(w & 0x7FF, 0x7FF);
    assert_eq!((w >> 11) & 0x1F, 2);
    let w = encoder::stp("r1", "r2", "2048(r4)").unwrap();
    assert_eq!(w & 0x7FF, 0);
    assert_eq!((w >> 11) & 0x1F, 2);
}

#[test]
fn five_bit_immediates_are_masked() {
    let w = encoder::sbit("r1", "r0", "#33").unwrap();
    assert_eq!((w >> 11) & 0x1F, 1);
    assert_eq!(w & 0x7FF, 0);
}

#[test]
fn jump_index_is_absolute_and_26_bits() {
    let w = encoder::j(15);
    assert_eq!(w & 0x03FF_FFFF, 15);
    assert_eq!(opcode(w), 0b011111);
    assert_eq!(opcode(w), 31);
    let w = encoder::j(u32::MAX);
    assert_eq!(w & 0x03FF_FFFF, 0x03FF_FFFF);
    assert_eq!(opcode(w), 31);
}

#[test]
fn literal_marker_is_optional() {
    assert_eq!(encoder::ssat("r3", "r1", "3").unwrap(), encoder::ssat("r3", "r1", "#3").unwrap());
    assert_eq!(encoder::sbit("r3", "r1", "7").unwrap(), encoder::sbit("r3", "r1", "#7").unwrap());
}

#[test]
fn zero_alias_encodes_as_r0() {
    assert_eq!(encoder::addi("r1", "zero", 5).unwrap(), encoder::addi("r1", "r0", 5).unwrap());
    assert_eq!(encoder::ld("r1", "(zero)").unwrap(), encoder::ld("r1", "0(r0)").unwrap());
}

#[test]
fn errors_name_mnemonic_and_token() {
    let e = encoder::add("r3", "q3", "r2").unwrap_err();
    match &e {
        AsmError::Encode { mnemonic, source } => {
            assert_eq!(*mnemonic, Mnemonic::Add);
            assert_eq!(*source, OperandError::InvalidRegister("q3".into()));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(e.to_string(), "ADD: invalid register `q3`");

    assert!(matches!(
        encoder::sbit("r1", "r2", "#five").unwrap_err().operand(),
        Some(OperandError::InvalidImmediate(_))
    ));
    assert!(matches!(
        encoder::ld("r1", "8r2").unwrap_err().operand(),
        Some(OperandError::MalformedOperand(_))
    ));
    assert!(matches!(
        encoder::stp("r1", "r2", "4(r2").unwrap_err().operand(),
        Some(OperandError::MalformedOperand(_))
    ));
}

#[test]
fn descriptor_layout_agrees_with_encoder() {
    // Put all-ones in every operand and check each span reads back its mask.
    let ones = r(31);
    let mem = Mem::new(-1, ones);
    let instrs = [
        Instr::Addi { rt: ones, rs: ones, imm: -1 },
        Instr::Add { rd: ones, rs: ones, rt: ones },
        Instr::Sub { rd: ones, rs: ones, rt: ones },
        Instr::Syscall,
        Instr::Ld { rt: ones, mem },
        Instr::St { rt: ones, mem },
        Instr::Stp { rt1: ones, rt2: ones, mem },
        Instr::Bne { rs: ones, rt: ones, offset: -1 },
        Instr::Beq { rs: ones, rt: ones, offset: -1 },
        Instr::Sbit { rd: ones, rs: ones, imm: -1 },
        Instr::Ssat { rd: ones, rs: ones, imm: -1 },
        Instr::Bext { rd: ones, rs1: ones, rs2: ones },
        Instr::Cls { rd: ones, rs: ones },
        Instr::J { index: u32::MAX },
    ];
    for i in instrs {
        let d = i.mnemonic().desc();
        let w = i.encode();
        for f in d.fields {
            let want = f.fixed.unwrap_or(f.mask());
            assert_eq!(f.extract(w), want, "{} field {}", d.name, f.name);
        }
    }
}

#[test]
fn display_reads_like_assembly() {
    let i = encoder::resolve::stp("r1", "r2", "-8(r4)").unwrap();
    assert_eq!(i.to_string(), "STP r1, r2, -8(r4)");
    let i = encoder::resolve::bne("r4", "r1", -4).unwrap();
    assert_eq!(i.to_string(), "BNE r4, r1, -4");
}
