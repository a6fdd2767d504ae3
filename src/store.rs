//! Database-root resolution and low-level dataset access.
//!
//! Datasets are directories under a single database root:
//! `<root>/networks/<name>/` for co-expression networks and
//! `<root>/ontologies/<name>/` for gene ontologies. The root comes from
//! `$COEX_DB_DIR`, falling back to `~/.coex`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use thiserror::Error;

pub const DB_ROOT_ENV: &str = "COEX_DB_DIR";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing dataset: {kind} '{name}' not found at {}", .path.display())]
    MissingDataset {
        kind: &'static str,
        name: String,
        path: PathBuf,
    },
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Database root: `$COEX_DB_DIR` if set, `~/.coex` otherwise.
pub fn db_root() -> PathBuf {
    if let Ok(dir) = std::env::var(DB_ROOT_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".coex"))
        .unwrap_or_else(|| PathBuf::from(".coex"))
}

pub fn network_dir(root: &Path, name: &str) -> Result<PathBuf, StoreError> {
    dataset_dir(root, "networks", "network", name)
}

pub fn ontology_dir(root: &Path, name: &str) -> Result<PathBuf, StoreError> {
    dataset_dir(root, "ontologies", "ontology", name)
}

fn dataset_dir(
    root: &Path,
    group: &str,
    kind: &'static str,
    name: &str,
) -> Result<PathBuf, StoreError> {
    let path = root.join(group).join(name);
    if !path.is_dir() {
        return Err(StoreError::MissingDataset {
            kind,
            name: name.to_string(),
            path,
        });
    }
    Ok(path)
}

/// Resolves `<dir>/<name>` with a transparent `.gz` fallback.
pub fn resolve_table(dir: &Path, name: &str) -> Result<PathBuf, StoreError> {
    let plain = dir.join(name);
    if plain.exists() {
        return Ok(plain);
    }
    let gz = dir.join(format!("{name}.gz"));
    if gz.exists() {
        return Ok(gz);
    }
    Err(StoreError::InvalidDataset(format!(
        "missing table file {name}(.gz) in {}",
        dir.display()
    )))
}

pub fn open_table(dir: &Path, name: &str) -> Result<Box<dyn BufRead>, StoreError> {
    let path = resolve_table(dir, name)?;
    open_maybe_gz(&path)
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, StoreError> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    #[test]
    fn test_resolve_table_prefers_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clusters.tsv"), "gene\tcluster\n").unwrap();
        std::fs::write(dir.path().join("clusters.tsv.gz"), b"not really gz").unwrap();

        let path = resolve_table(dir.path(), "clusters.tsv").unwrap();
        assert_eq!(path, dir.path().join("clusters.tsv"));
    }

    #[test]
    fn test_open_table_reads_gz_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let gz_path = dir.path().join("genes.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&gz_path).unwrap(), Compression::default());
        encoder.write_all(b"name\tchrom\tstart\tend\n").unwrap();
        encoder.finish().unwrap();

        let mut reader = open_table(dir.path(), "genes.tsv").unwrap();
        let mut buf = String::new();
        reader.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "name\tchrom\tstart\tend\n");
    }

    #[test]
    fn test_missing_table_is_invalid_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_table(dir.path(), "expr.tsv").err().unwrap();
        assert!(matches!(err, StoreError::InvalidDataset(_)));
    }

    #[test]
    fn test_missing_network_reports_name_and_path() {
        let root = tempfile::tempdir().unwrap();
        let err = network_dir(root.path(), "no_such_net").unwrap_err();
        match err {
            StoreError::MissingDataset { kind, name, path } => {
                assert_eq!(kind, "network");
                assert_eq!(name, "no_such_net");
                assert!(path.ends_with("networks/no_such_net"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
