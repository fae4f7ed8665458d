use anyhow::Error;
use crate::decoder::Decoder;
use crate::disasm::fmt_decoded;
use crate::exec::Executor;
use crate::host::Host;
use crate::memory::Bus;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub const NUM_GPRS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    pub memory_size: usize,
    /// Address of instruction index 0; `J` targets are relative to it.
    pub load_base: u32,
    pub max_steps: u64,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            memory_size: 64 * 1024,
            load_base: 0x1000,
            max_steps: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub pc: u32,
    pub gpr: [u32; NUM_GPRS],
    pub flags: CpuFlags,
    pub cfg: CpuConfig,
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuFlags: u8 {
const HALTED = 1 << 0;   // exit syscall executed
const BRANCHED = 1 << 1; // current instruction wrote pc
}
}

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("Invalid instruction {raw:#010x} at {pc:#010x}")]
    InvalidInstruction { pc: u32, raw: u32 },
    #[error("Unaligned access at {addr:#010x}")]
    Unaligned { addr: u32 },
    #[error("Bus error at {addr:#010x}: {source}")]
    Bus { addr: u32, #[source] source: Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Halted { steps: u64 },
    StepLimit { steps: u64 },
}

impl Cpu {
    pub fn new(cfg: CpuConfig) -> Self {
        Self {
            pc: cfg.load_base,
            gpr: [0; NUM_GPRS],
            flags: CpuFlags::empty(),
            cfg,
        }
    }

    /// Clears registers and flags and points pc at the load base.
    pub fn reset(&mut self) {
        self.pc = self.cfg.load_base;
        self.gpr = [0; NUM_GPRS];
        self.flags = CpuFlags::empty();
    }

    pub fn reg(&self, index: u8) -> u32 {
        self.gpr[index as usize]
    }

    /// r0 is hard-wired to zero.
    pub fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.gpr[index as usize] = value;
        }
    }

    /// Redirects control flow for the current instruction.
    pub fn jump(&mut self, target: u32) {
        self.pc = target;
        self.flags.insert(CpuFlags::BRANCHED);
    }

    pub fn halt(&mut self) {
        self.flags.insert(CpuFlags::HALTED);
    }

    pub fn is_halted(&self) -> bool {
        self.flags.contains(CpuFlags::HALTED)
    }

    pub fn step<B: Bus, D: Decoder, X: Executor, H: Host>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
        host: &mut H,
    ) -> Result<(), Trap> {
        let pc = self.pc;
        let raw32 = bus
            .read_u32(pc)
            .map_err(|source| Trap::Bus { addr: pc, source })?;
        let d = dec
            .decode(raw32)
            .ok_or(Trap::InvalidInstruction { pc, raw: raw32 })?;
        tracing::trace!(pc = format_args!("{pc:#010x}"), "{}", fmt_decoded(&d));
        self.flags.remove(CpuFlags::BRANCHED);
        exec.exec(self, bus, host, d)?;
        if !self.flags.contains(CpuFlags::BRANCHED) {
            self.pc = pc.wrapping_add(4);
        }
        Ok(())
    }

    /// Steps until the exit syscall or `cfg.max_steps`.
    pub fn run<B: Bus, D: Decoder, X: Executor, H: Host>(
        &mut self,
        bus: &mut B,
        dec: &D,
        exec: &X,
        host: &mut H,
    ) -> Result<RunOutcome, Trap> {
        let mut steps = 0u64;
        while steps < self.cfg.max_steps {
            if self.is_halted() {
                tracing::debug!(steps, "program halted");
                return Ok(RunOutcome::Halted { steps });
            }
            self.step(bus, dec, exec, host)?;
            steps += 1;
        }
        if self.is_halted() {
            return Ok(RunOutcome::Halted { steps });
        }
        tracing::warn!(steps, "step limit reached");
        Ok(RunOutcome::StepLimit { steps })
    }
}
