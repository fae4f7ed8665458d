use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

pub trait Bus {
    fn read_u32(&mut self, addr: u32) -> Result<u32>;
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<()>;
}

/// Flat little-endian RAM mapped at `base`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LinearMemory {
    pub mem: Vec<u8>,
    pub base: u32,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self {
            mem: vec![0; size],
            base: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.mem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    fn offset(&self, addr: u32, size: usize) -> Result<usize> {
        let off = addr.wrapping_sub(self.base) as usize;
        ensure!(
            addr >= self.base && off.checked_add(size).is_some_and(|end| end <= self.mem.len()),
            "memory access out of range: {addr:#010x} (+{size})"
        );
        Ok(off)
    }

    /// Copies a program image to `addr`, one little-endian word per entry.
    pub fn load_words(&mut self, addr: u32, words: &[u32]) -> Result<()> {
        let off = self.offset(addr, words.len() * 4)?;
        for (i, w) in words.iter().enumerate() {
            self.mem[off + i * 4..off + i * 4 + 4].copy_from_slice(&w.to_le_bytes());
        }
        Ok(())
    }

    pub fn load_bytes(&mut self, addr: u32, bytes: &[u8]) -> Result<()> {
        let off = self.offset(addr, bytes.len())?;
        self.mem[off..off + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}

impl Bus for LinearMemory {
    fn read_u32(&mut self, addr: u32) -> Result<u32> {
        let off = self.offset(addr, 4)?;
        Ok(u32::from_le_bytes([
            self.mem[off],
            self.mem[off + 1],
            self.mem[off + 2],
            self.mem[off + 3],
        ]))
    }
    fn write_u32(&mut self, addr: u32, val: u32) -> Result<()> {
        let off = self.offset(addr, 4)?;
        self.mem[off..off + 4].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }
}
