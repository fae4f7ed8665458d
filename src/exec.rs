use crate::cpu::{Cpu, Trap};
use crate::decoder::{Decoded, Op};
use crate::host::{Host, SYS_EXIT, SYS_PRINT_INT, SYS_READ_INT};
use crate::memory::Bus;

/// Register holding the syscall number.
pub const SYSCALL_NUM_REG: u8 = 8;
/// Register used for syscall input and output values.
pub const SYSCALL_ARG_REG: u8 = 3;

pub trait Executor {
    fn exec<B: Bus, H: Host>(
        &self,
        cpu: &mut Cpu,
        bus: &mut B,
        host: &mut H,
        d: Decoded,
    ) -> Result<(), Trap>;
}

pub struct IntExecutor;

impl Executor for IntExecutor {
    fn exec<B: Bus, H: Host>(
        &self,
        cpu: &mut Cpu,
        bus: &mut B,
        host: &mut H,
        d: Decoded,
    ) -> Result<(), Trap> {
        match d.op {
            Op::Addi => {
                let v = cpu.reg(d.a).wrapping_add(d.imm16 as u32);
                cpu.set_reg(d.b, v);
            }
            Op::Add => {
                let v = cpu.reg(d.a).wrapping_add(cpu.reg(d.b));
                cpu.set_reg(d.c, v);
            }
            Op::Sub => {
                let v = cpu.reg(d.a).wrapping_sub(cpu.reg(d.b));
                cpu.set_reg(d.c, v);
            }
            Op::Ld => {
                let addr = word_addr(cpu.reg(d.a), d.imm16)?;
                let v = bus
                    .read_u32(addr)
                    .map_err(|source| Trap::Bus { addr, source })?;
                cpu.set_reg(d.b, v);
            }
            Op::St => {
                let addr = word_addr(cpu.reg(d.a), d.imm16)?;
                store(bus, addr, cpu.reg(d.b))?;
            }
            Op::Stp => {
                let addr = word_addr(cpu.reg(d.a), d.off11 as i32)?;
                store(bus, addr, cpu.reg(d.b))?;
                store(bus, addr.wrapping_add(4), cpu.reg(d.c))?;
            }
            Op::Bne => {
                if cpu.reg(d.a) != cpu.reg(d.b) {
                    cpu.jump(branch_target(cpu.pc, d.imm16));
                }
            }
            Op::Beq => {
                if cpu.reg(d.a) == cpu.reg(d.b) {
                    cpu.jump(branch_target(cpu.pc, d.imm16));
                }
            }
            Op::J => {
                let target = cpu.cfg.load_base.wrapping_add(d.index << 2);
                cpu.jump(target);
            }
            Op::Sbit => {
                cpu.set_reg(d.a, 1u32 << d.c);
            }
            Op::Ssat => {
                let v = saturate(cpu.reg(d.b) as i32, d.c);
                cpu.set_reg(d.a, v as u32);
            }
            Op::Cls => {
                cpu.set_reg(d.a, leading_sign_bits(cpu.reg(d.b)));
            }
            Op::Bext => {
                cpu.set_reg(d.a, extract_bits(cpu.reg(d.b), cpu.reg(d.c)));
            }
            Op::Syscall => syscall(cpu, host),
        }
        Ok(())
    }
}

fn word_addr(base: u32, offset: i32) -> Result<u32, Trap> {
    let addr = base.wrapping_add(offset as u32);
    if addr % 4 != 0 {
        return Err(Trap::Unaligned { addr });
    }
    Ok(addr)
}

fn store<B: Bus>(bus: &mut B, addr: u32, val: u32) -> Result<(), Trap> {
    bus.write_u32(addr, val)
        .map_err(|source| Trap::Bus { addr, source })
}

/// Branch offsets count instructions from the branch itself.
fn branch_target(pc: u32, offset: i32) -> u32 {
    pc.wrapping_add((offset as u32).wrapping_shl(2))
}

/// Clamps to the signed range of a `bits`-wide integer; zero width yields 0.
pub fn saturate(value: i32, bits: u8) -> i32 {
    if bits == 0 || bits > 31 {
        return 0;
    }
    let max = (1i32 << (bits - 1)) - 1;
    let min = -(1i32 << (bits - 1));
    value.clamp(min, max)
}

/// Number of leading bits equal to the sign bit, the sign bit included.
pub fn leading_sign_bits(value: u32) -> u32 {
    if value >> 31 == 1 {
        value.leading_ones()
    } else {
        value.leading_zeros()
    }
}

/// Packs the bits of `value` selected by `mask` into the low bits.
pub fn extract_bits(value: u32, mask: u32) -> u32 {
    let mut out = 0u32;
    let mut n = 0;
    for i in 0..32 {
        if mask & (1 << i) != 0 {
            if value & (1 << i) != 0 {
                out |= 1 << n;
            }
            n += 1;
        }
    }
    out
}

fn syscall<H: Host>(cpu: &mut Cpu, host: &mut H) {
    match cpu.reg(SYSCALL_NUM_REG) {
        SYS_EXIT => cpu.halt(),
        SYS_PRINT_INT => host.print_int(cpu.reg(SYSCALL_ARG_REG)),
        SYS_READ_INT => match host.read_int() {
            Some(v) => cpu.set_reg(SYSCALL_ARG_REG, v),
            None => tracing::warn!("read_int: no input available"),
        },
        n => tracing::warn!(syscall = n, "unsupported syscall ignored"),
    }
}
