use crate::error::{AsmError, Result};
use crate::isa::{FUNCT, OPCODE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Encoded words in program order. Grows by append only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramBuffer {
    words: Vec<u32>,
}

impl ProgramBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, word: u32) {
        self.words.push(word);
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Little-endian image, 4 bytes per word, no header.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    pub fn listing(&self) -> Vec<ListingEntry> {
        listing(&self.words)
    }
}

/// One line of the diagnostic listing. Operands are not reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub index: usize,
    pub word: u32,
    pub opcode: u8,
    pub funct: u8,
}

impl ListingEntry {
    pub fn new(index: usize, word: u32) -> Self {
        Self {
            index,
            word,
            opcode: OPCODE.extract(word) as u8,
            funct: FUNCT.extract(word) as u8,
        }
    }
}

impl fmt::Display for ListingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  {:2}: 0x{:08X} (opcode: 0x{:02X}, funct: 0x{:02X})",
            self.index, self.word, self.opcode, self.funct
        )
    }
}

pub fn listing(words: &[u32]) -> Vec<ListingEntry> {
    words
        .iter()
        .enumerate()
        .map(|(i, &w)| ListingEntry::new(i, w))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Accepting,
    Finalized,
}

/// Owns the [`ProgramBuffer`] for one build and serializes it exactly once.
#[derive(Debug, Clone)]
pub struct Emitter {
    buf: ProgramBuffer,
    phase: Phase,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            buf: ProgramBuffer::new(),
            phase: Phase::Accepting,
        }
    }

    pub fn append(&mut self, word: u32) -> Result<()> {
        if self.phase == Phase::Finalized {
            return Err(AsmError::EmitterFinalized);
        }
        self.buf.push(word);
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.phase == Phase::Finalized
    }

    pub fn buffer(&self) -> &ProgramBuffer {
        &self.buf
    }

    pub fn words(&self) -> &[u32] {
        self.buf.words()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn listing(&self) -> Vec<ListingEntry> {
        self.buf.listing()
    }

    /// Writes every word little-endian to `sink` and returns the word count.
    ///
    /// The emitter is closed for appends as soon as this is called, even if
    /// the sink then fails.
    pub fn finalize<W: Write>(&mut self, mut sink: W) -> Result<usize> {
        if self.phase == Phase::Finalized {
            return Err(AsmError::EmitterFinalized);
        }
        self.phase = Phase::Finalized;
        let bytes = self.buf.to_le_bytes();
        sink.write_all(&bytes)?;
        sink.flush()?;
        tracing::info!(words = self.buf.len(), bytes = bytes.len(), "program finalized");
        Ok(self.buf.len())
    }

    /// Creates missing parent directories of `path`, then finalizes into it.
    ///
    /// The object is staged next to `path` and renamed into place, so a
    /// failed write leaves no partial file behind.
    pub fn finalize_to_path(&mut self, path: &Path) -> Result<usize> {
        if self.phase == Phase::Finalized {
            return Err(AsmError::EmitterFinalized);
        }
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let staging = staging_path(path);
        let written = std::fs::File::create(&staging)
            .map_err(AsmError::from)
            .and_then(|file| self.finalize(std::io::BufWriter::new(file)))
            .and_then(|n| {
                std::fs::rename(&staging, path)?;
                Ok(n)
            });
        match written {
            Ok(n) => {
                tracing::debug!(path = %path.display(), "object file written");
                Ok(n)
            }
            Err(e) => {
                let _ = std::fs::remove_file(&staging);
                tracing::warn!(path = %path.display(), error = %e, "object file not written");
                Err(e)
            }
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}
