use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use tinymips::decoder::{Decoder, IsaDecoder};
use tinymips::disasm::fmt_decoded;
use tinymips::emitter::{listing, ListingEntry};

/// A loaded object file: the words it holds, in file order.
#[derive(Debug, Clone)]
pub struct Image {
    pub words: Vec<u32>,
}

impl Image {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        anyhow::ensure!(
            bytes.len() % 4 == 0,
            "object size {} is not a multiple of 4 bytes",
            bytes.len()
        );
        let words = bytes
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self { words })
    }

    pub fn listing(&self) -> Vec<ListingEntry> {
        listing(&self.words)
    }
}

pub fn load_object(path: &Path, skip_words: usize, len: Option<usize>) -> Result<Image> {
    let file = std::fs::read(path)?;
    let mut img = Image::from_bytes(&file)?;
    anyhow::ensure!(skip_words <= img.words.len(), "--skip exceeds object size");
    img.words.drain(..skip_words);
    if let Some(lim) = len {
        anyhow::ensure!(lim <= img.words.len(), "--len exceeds remaining words after skip");
        img.words.truncate(lim);
    }
    Ok(img)
}

/// Listing record, optionally with decoded text.
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    #[serde(flatten)]
    pub entry: ListingEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

pub fn render(img: &Image, decode: bool) -> Vec<Line> {
    let dec = IsaDecoder::new();
    img.listing()
        .into_iter()
        .map(|entry| {
            let text = decode.then(|| match dec.decode(entry.word) {
                Some(d) => fmt_decoded(&d),
                None => format!(".word {:#010x}", entry.word),
            });
            Line { entry, text }
        })
        .collect()
}
