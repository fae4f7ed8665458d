use tinymips::decoder::IsaDecoder;
use tinymips::exec::IntExecutor;
use tinymips::{
    programs, BufferHost, Cpu, CpuConfig, LinearMemory, ProgramBuilder, RunOutcome, Trap,
};

fn run_with(words: &[u32], host: &mut BufferHost) -> (Cpu, Result<RunOutcome, Trap>) {
    let cfg = CpuConfig::default();
    let mut mem = LinearMemory::new(cfg.memory_size);
    mem.load_words(cfg.load_base, words).unwrap();
    let mut cpu = Cpu::new(cfg);
    let out = cpu.run(&mut mem, &IsaDecoder::new(), &IntExecutor, host);
    (cpu, out)
}

fn run(b: &ProgramBuilder) -> Cpu {
    let (cpu, out) = run_with(b.words(), &mut BufferHost::default());
    assert!(matches!(out, Ok(RunOutcome::Halted { .. })), "{out:?}");
    cpu
}

fn exit(b: &mut ProgramBuilder) {
    b.addi("r8", "r0", 0).unwrap().syscall().unwrap();
}

#[test]
fn addi_add() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 5).unwrap().addi("r2", "r0", 3).unwrap().add("r3", "r1", "r2").unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[3], 8);
}

#[test]
fn addi_sub_and_negative_immediates() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 8).unwrap().addi("r2", "r0", 3).unwrap().sub("r3", "r1", "r2").unwrap();
    b.addi("r4", "r0", -1).unwrap().sub("r5", "r2", "r1").unwrap();
    exit(&mut b);
    let cpu = run(&b);
    assert_eq!(cpu.gpr[3], 5);
    assert_eq!(cpu.gpr[4], u32::MAX);
    assert_eq!(cpu.gpr[5] as i32, -5);
}

#[test]
fn r0_stays_zero() {
    let mut b = ProgramBuilder::new();
    b.addi("r0", "r0", 123).unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[0], 0);
}

#[test]
fn sbit_sets_single_bit() {
    let mut b = ProgramBuilder::new();
    b.sbit("r3", "r0", "5").unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[3], 32);
}

#[test]
fn bext_extracts_masked_bits() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 0xEA).unwrap().addi("r2", "r0", 0x34).unwrap().bext("r3", "r1", "r2").unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[3], 4);
}

#[test]
fn cls_counts_leading_signs() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 0xF0).unwrap().cls("r3", "r1").unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[3], 24);
}

#[test]
fn ssat_saturates() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 31).unwrap().ssat("r3", "r1", "#3").unwrap();
    b.addi("r2", "r0", -31).unwrap().ssat("r4", "r2", "#3").unwrap();
    exit(&mut b);
    let cpu = run(&b);
    assert_eq!(cpu.gpr[3], 3);
    assert_eq!(cpu.gpr[4] as i32, -4);
}

#[test]
fn st_then_ld() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 0x20).unwrap()
        .addi("r2", "r0", 42).unwrap()
        .st("r2", "0(r1)").unwrap()
        .addi("r3", "r0", 0x24).unwrap()
        .ld("r4", "-4(r3)").unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[4], 42);
}

#[test]
fn stp_stores_a_pair() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 0x2A).unwrap()
        .addi("r2", "r0", 0x1F).unwrap()
        .addi("r4", "r0", 0x800).unwrap()
        .stp("r1", "r2", "0(r4)").unwrap()
        .ld("r3", "0(r4)").unwrap()
        .ld("r5", "4(r4)").unwrap();
    exit(&mut b);
    let cpu = run(&b);
    assert_eq!(cpu.gpr[3], 0x2A);
    assert_eq!(cpu.gpr[5], 0x1F);
}

#[test]
fn stp_offset_above_1023_is_not_negative() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 0x2A).unwrap()
        .addi("r2", "r0", 0x1F).unwrap()
        .addi("r4", "r0", 0x800).unwrap()
        .stp("r1", "r2", "1024(r4)").unwrap()
        .ld("r3", "3072(r0)").unwrap()
        .ld("r5", "3076(r0)").unwrap()
        .ld("r6", "1024(r0)").unwrap();
    exit(&mut b);
    let cpu = run(&b);
    assert_eq!(cpu.gpr[3], 0x2A);
    assert_eq!(cpu.gpr[5], 0x1F);
    assert_eq!(cpu.gpr[6], 0);
}

#[test]
fn stp_negative_offset_wraps_to_2047() {
    // -1 encodes as 0x7FF: 0x401 + 2047 = 0xC00.
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 7).unwrap()
        .addi("r2", "r0", 9).unwrap()
        .addi("r4", "r0", 0x401).unwrap()
        .stp("r1", "r2", "-1(r4)").unwrap()
        .ld("r3", "3072(r0)").unwrap()
        .ld("r5", "3076(r0)").unwrap();
    exit(&mut b);
    let cpu = run(&b);
    assert_eq!(cpu.gpr[3], 7);
    assert_eq!(cpu.gpr[5], 9);
}

#[test]
fn beq_taken_skips() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 5).unwrap()
        .addi("r2", "r0", 5).unwrap()
        .beq("r1", "r2", 2).unwrap()
        .addi("r3", "r0", 0).unwrap() // skipped
        .addi("r3", "r3", 15).unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[3], 15);
}

#[test]
fn bne_not_taken_falls_through_to_jump() {
    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 3).unwrap()
        .addi("r2", "r0", 3).unwrap()
        .bne("r1", "r2", 3).unwrap()
        .addi("r3", "r0", 4).unwrap()
        .j(6).unwrap()
        .addi("r3", "r0", 15).unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[3], 4);
}

#[test]
fn backward_branch_loops() {
    // r1 counts to 10
    let mut b = ProgramBuilder::new();
    b.addi("r2", "r0", 10).unwrap()
        .addi("r1", "r1", 1).unwrap()
        .bne("r1", "r2", -1).unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[1], 10);
}

#[test]
fn jump_skips_instruction() {
    let mut b = ProgramBuilder::new();
    b.j(2).unwrap().addi("r3", "r0", 15).unwrap();
    exit(&mut b);
    assert_eq!(run(&b).gpr[3], 0);
}

#[test]
fn syscalls_print_and_read() {
    let mut b = ProgramBuilder::new();
    b.addi("r8", "r0", 3).unwrap()
        .syscall().unwrap()
        .addi("r3", "r3", 1).unwrap()
        .addi("r8", "r0", 1).unwrap()
        .syscall().unwrap()
        .addi("r8", "r0", 2).unwrap() // unsupported, ignored
        .syscall().unwrap();
    exit(&mut b);
    let mut host = BufferHost::with_input([41]);
    let (cpu, out) = run_with(b.words(), &mut host);
    assert_eq!(out.unwrap(), RunOutcome::Halted { steps: 9 });
    assert_eq!(host.output, vec![42]);
    assert_eq!(cpu.gpr[3], 42);
}

#[test]
fn arith_demo_prints_sum() {
    let mut host = BufferHost::default();
    let (cpu, out) = run_with(programs::arith().unwrap().words(), &mut host);
    assert!(matches!(out, Ok(RunOutcome::Halted { .. })));
    assert_eq!(host.output, vec![8]);
    assert_eq!(cpu.gpr[4], 2);
}

#[test]
fn fibonacci_demo() {
    let fib = programs::fibonacci().unwrap();
    for (n, want) in [(0, 0), (1, 1), (2, 1), (5, 5), (10, 55), (20, 6765)] {
        let mut host = BufferHost::with_input([n]);
        let (_, out) = run_with(fib.words(), &mut host);
        assert!(matches!(out, Ok(RunOutcome::Halted { .. })), "n={n}: {out:?}");
        assert_eq!(host.output, vec![want], "n={n}");
    }
}

#[test]
fn step_limit_stops_infinite_loop() {
    let mut b = ProgramBuilder::new();
    b.j(0).unwrap();
    let (_, out) = run_with(b.words(), &mut BufferHost::default());
    assert_eq!(out.unwrap(), RunOutcome::StepLimit { steps: CpuConfig::default().max_steps });
}

#[test]
fn traps() {
    let (cpu, out) = run_with(&[0xFFFF_FFFF], &mut BufferHost::default());
    assert!(matches!(out, Err(Trap::InvalidInstruction { pc: 0x1000, raw: 0xFFFF_FFFF })));
    assert_eq!(cpu.pc, 0x1000);

    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", 2).unwrap().ld("r2", "0(r1)").unwrap();
    let (_, out) = run_with(b.words(), &mut BufferHost::default());
    assert!(matches!(out, Err(Trap::Unaligned { addr: 2 })));

    let mut b = ProgramBuilder::new();
    b.addi("r1", "r0", -4).unwrap().st("r1", "0(r1)").unwrap();
    let (_, out) = run_with(b.words(), &mut BufferHost::default());
    assert!(matches!(out, Err(Trap::Bus { addr: 0xFFFF_FFFC, .. })));
}

#[test]
fn config_from_json_fills_defaults() {
    let cfg: CpuConfig = serde_json::from_str(r#"{ "load_base": 0, "max_steps": 50 }"#).unwrap();
    assert_eq!(cfg.load_base, 0);
    assert_eq!(cfg.max_steps, 50);
    assert_eq!(cfg.memory_size, CpuConfig::default().memory_size);

    // J targets follow the configured base.
    let mut b = ProgramBuilder::new();
    b.j(2).unwrap().addi("r3", "r0", 15).unwrap();
    exit(&mut b);
    let mut mem = LinearMemory::new(cfg.memory_size);
    mem.load_words(cfg.load_base, b.words()).unwrap();
    let mut cpu = Cpu::new(cfg);
    let out = cpu.run(&mut mem, &IsaDecoder::new(), &IntExecutor, &mut BufferHost::default());
    assert_eq!(out.unwrap(), RunOutcome::Halted { steps: 3 });
    assert_eq!(cpu.gpr[3], 0);
}
