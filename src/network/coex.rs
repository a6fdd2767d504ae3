//! Packed pairwise co-expression score matrix (`coex.bin`).
//!
//! Layout: 8-byte magic `COEXNET1`, u32 LE version, u32 LE gene count,
//! then n*(n-1)/2 f32 LE scores in condensed upper-triangle order. The
//! file is memory mapped read-only; its length must match the header
//! exactly.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use memmap2::Mmap;

use crate::store::StoreError;

pub const COEX_FILE: &str = "coex.bin";
pub const COEX_MAGIC: &[u8; 8] = b"COEXNET1";
pub const COEX_VERSION: u32 = 1;

const HEADER_BYTES: usize = 16;

#[derive(Debug)]
pub struct CoexMatrix {
    mmap: Mmap,
    n_genes: usize,
}

impl CoexMatrix {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let file = File::open(path).map_err(|e| {
            StoreError::InvalidDataset(format!("cannot open {}: {e}", path.display()))
        })?;
        let mmap = unsafe { Mmap::map(&file)? };
        let bytes = &mmap[..];
        if bytes.len() < HEADER_BYTES {
            return Err(StoreError::InvalidDataset(format!(
                "{} too small for header",
                path.display()
            )));
        }
        if &bytes[0..8] != COEX_MAGIC {
            return Err(StoreError::InvalidDataset(format!(
                "{}: invalid magic; expected COEXNET1",
                path.display()
            )));
        }
        let version = read_u32(bytes, 8);
        if version != COEX_VERSION {
            return Err(StoreError::InvalidDataset(format!(
                "{}: unsupported version {version}",
                path.display()
            )));
        }
        let n_genes = read_u32(bytes, 12) as usize;
        let expected = HEADER_BYTES + n_pairs(n_genes) * 4;
        if bytes.len() != expected {
            return Err(StoreError::InvalidDataset(format!(
                "{}: expected {expected} bytes for {n_genes} genes, got {}",
                path.display(),
                bytes.len()
            )));
        }
        Ok(CoexMatrix { mmap, n_genes })
    }

    pub fn n_genes(&self) -> usize {
        self.n_genes
    }

    /// Score for a distinct gene-index pair. Symmetric in `i`/`j`.
    pub fn score(&self, i: usize, j: usize) -> f32 {
        assert!(i != j, "no self-score for gene {i}");
        assert!(i < self.n_genes && j < self.n_genes, "gene index out of range");
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let offset = HEADER_BYTES + condensed_index(lo, hi, self.n_genes) * 4;
        let raw: [u8; 4] = self.mmap[offset..offset + 4]
            .try_into()
            .unwrap_or([0u8; 4]);
        f32::from_le_bytes(raw)
    }
}

/// Writes a complete score matrix; `scores` must be the condensed
/// upper triangle for `n_genes`.
pub fn write_scores(path: &Path, n_genes: usize, scores: &[f32]) -> Result<(), StoreError> {
    if scores.len() != n_pairs(n_genes) {
        return Err(StoreError::InvalidDataset(format!(
            "expected {} condensed scores for {n_genes} genes, got {}",
            n_pairs(n_genes),
            scores.len()
        )));
    }
    let mut file = File::create(path)?;
    file.write_all(COEX_MAGIC)?;
    file.write_all(&COEX_VERSION.to_le_bytes())?;
    file.write_all(&(n_genes as u32).to_le_bytes())?;
    for &score in scores {
        file.write_all(&score.to_le_bytes())?;
    }
    Ok(())
}

pub fn n_pairs(n_genes: usize) -> usize {
    n_genes * n_genes.saturating_sub(1) / 2
}

/// Condensed upper-triangle index for `i < j` over `n` genes.
fn condensed_index(i: usize, j: usize, n: usize) -> usize {
    n * i - i * (i + 1) / 2 + (j - i - 1)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let raw: [u8; 4] = bytes[offset..offset + 4]
        .try_into()
        .unwrap_or([0u8; 4]);
    u32::from_le_bytes(raw)
}
