//! Read-only access to a pre-built co-expression network dataset.
//!
//! A network exposes its gene list, the gene-to-cluster assignment table
//! produced by the external clustering step, the raw expression matrix,
//! and the pairwise co-expression subnetwork for an arbitrary gene set.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub mod clusters;
pub mod coex;
pub mod expr;

use crate::store::{self, StoreError};
use clusters::ClusterTable;
use coex::CoexMatrix;
use expr::ExprMatrix;

/// Dataset descriptor stored as `meta.json` next to the tables.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkMeta {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub organism: Option<String>,
    #[serde(default)]
    pub built: Option<String>,
}

/// A full gene record from the network's reference gene list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gene {
    pub name: String,
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

/// One pairwise co-expression score from a subnetwork query.
#[derive(Debug, Clone, PartialEq)]
pub struct CoexRecord {
    pub gene_a: String,
    pub gene_b: String,
    pub score: f32,
}

#[derive(Debug)]
pub struct Network {
    name: String,
    dir: PathBuf,
    meta: NetworkMeta,
    genes: Vec<Gene>,
    index: HashMap<String, usize>,
    clusters: ClusterTable,
}

impl Network {
    /// Opens a named network from the default database root.
    pub fn open(name: &str) -> Result<Self, StoreError> {
        Self::open_in(&store::db_root(), name)
    }

    pub fn open_in(root: &Path, name: &str) -> Result<Self, StoreError> {
        let dir = store::network_dir(root, name)?;
        let meta = load_meta(&dir)?;
        let genes = load_genes(&dir)?;

        let mut index = HashMap::with_capacity(genes.len());
        for (idx, gene) in genes.iter().enumerate() {
            if index.insert(gene.name.clone(), idx).is_some() {
                return Err(StoreError::InvalidDataset(format!(
                    "duplicate gene '{}' in network '{name}'",
                    gene.name
                )));
            }
        }

        let clusters = ClusterTable::load(&dir)?;
        tracing::info!(
            "opened network '{name}': {} genes, {} clustered",
            genes.len(),
            clusters.len()
        );

        Ok(Network {
            name: name.to_string(),
            dir,
            meta,
            genes,
            index,
            clusters,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> &NetworkMeta {
        &self.meta
    }

    pub fn num_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn gene_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Resolves cluster-table gene names back to full gene records.
    pub fn from_ids(&self, ids: &[String]) -> Result<Vec<Gene>, StoreError> {
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let idx = self.gene_index(id).ok_or_else(|| {
                StoreError::InvalidDataset(format!(
                    "gene '{id}' not in network '{}'",
                    self.name
                ))
            })?;
            out.push(self.genes[idx].clone());
        }
        Ok(out)
    }

    pub fn clusters(&self) -> &ClusterTable {
        &self.clusters
    }

    /// Loads the raw expression matrix. Not cached; callers that need it
    /// twice should hold on to the result.
    pub fn expr(&self) -> Result<ExprMatrix, StoreError> {
        let matrix = ExprMatrix::load(&self.dir)?;
        if matrix.n_genes() != self.genes.len() {
            tracing::warn!(
                "expression matrix has {} rows but gene list has {}",
                matrix.n_genes(),
                self.genes.len()
            );
        }
        Ok(matrix)
    }

    /// All pairwise co-expression records for exactly this gene set, not
    /// significance-filtered. Pairs are emitted with `gene_a` before
    /// `gene_b` in gene-index order.
    pub fn subnetwork(&self, genes: &[Gene]) -> Result<Vec<CoexRecord>, StoreError> {
        let matrix = CoexMatrix::open(&self.dir.join(coex::COEX_FILE))?;
        if matrix.n_genes() != self.genes.len() {
            return Err(StoreError::InvalidDataset(format!(
                "score matrix covers {} genes but network '{}' has {}",
                matrix.n_genes(),
                self.name,
                self.genes.len()
            )));
        }

        let mut indices = Vec::with_capacity(genes.len());
        for gene in genes {
            let idx = self.gene_index(&gene.name).ok_or_else(|| {
                StoreError::InvalidDataset(format!(
                    "gene '{}' not in network '{}'",
                    gene.name, self.name
                ))
            })?;
            indices.push(idx);
        }
        indices.sort_unstable();
        indices.dedup();

        let mut records = Vec::with_capacity(indices.len() * (indices.len().saturating_sub(1)) / 2);
        for (pos, &i) in indices.iter().enumerate() {
            for &j in &indices[pos + 1..] {
                records.push(CoexRecord {
                    gene_a: self.genes[i].name.clone(),
                    gene_b: self.genes[j].name.clone(),
                    score: matrix.score(i, j),
                });
            }
        }
        Ok(records)
    }
}

fn load_meta(dir: &Path) -> Result<NetworkMeta, StoreError> {
    let path = dir.join("meta.json");
    let file = std::fs::File::open(&path).map_err(|e| {
        StoreError::InvalidDataset(format!("cannot open {}: {e}", path.display()))
    })?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| StoreError::Parse(format!("{}: {e}", path.display())))
}

fn load_genes(dir: &Path) -> Result<Vec<Gene>, StoreError> {
    let reader = store::open_table(dir, "genes.tsv")?;
    parse_genes(reader)
}

fn parse_genes(mut reader: Box<dyn BufRead>) -> Result<Vec<Gene>, StoreError> {
    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Err(StoreError::Parse("genes.tsv is empty".to_string()));
    }
    if buf.trim_end().split('\t').next() != Some("name") {
        return Err(StoreError::Parse(
            "genes.tsv header must start with 'name'".to_string(),
        ));
    }

    let mut genes = Vec::new();
    let mut line_no = 1usize;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 4 {
            return Err(StoreError::Parse(format!(
                "genes.tsv line {line_no}: expected 4 fields, got {}",
                fields.len()
            )));
        }
        let start = fields[2].parse::<u64>().map_err(|_| {
            StoreError::Parse(format!("genes.tsv line {line_no}: bad start '{}'", fields[2]))
        })?;
        let end = fields[3].parse::<u64>().map_err(|_| {
            StoreError::Parse(format!("genes.tsv line {line_no}: bad end '{}'", fields[3]))
        })?;
        genes.push(Gene {
            name: fields[0].to_string(),
            chrom: fields[1].to_string(),
            start,
            end,
        });
    }
    Ok(genes)
}

#[cfg(test)]
mod tests {
    use std::io::BufRead;

    use super::*;

    fn reader(text: &str) -> Box<dyn BufRead> {
        Box::new(std::io::Cursor::new(text.to_string()))
    }

    #[test]
    fn test_parse_genes() {
        let genes = parse_genes(reader(
            "name\tchrom\tstart\tend\ng1\tchr1\t100\t200\ng2\tchr2\t300\t450\n",
        ))
        .unwrap();
        assert_eq!(genes.len(), 2);
        assert_eq!(genes[0].name, "g1");
        assert_eq!(genes[1].chrom, "chr2");
        assert_eq!(genes[1].start, 300);
    }

    #[test]
    fn test_parse_genes_rejects_bad_header() {
        let err = parse_genes(reader("gene\tchrom\tstart\tend\n")).unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }

    #[test]
    fn test_parse_genes_rejects_short_row() {
        let err = parse_genes(reader("name\tchrom\tstart\tend\ng1\tchr1\t100\n")).unwrap_err();
        match err {
            StoreError::Parse(msg) => assert!(msg.contains("line 2")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
