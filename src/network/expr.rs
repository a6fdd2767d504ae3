//! Raw expression matrix (`expr.tsv`): one row per gene, one column per
//! accession. Values are f32; empty cells and `NA`/`nan` load as NaN.

use std::io::BufRead;
use std::path::Path;

use crate::store::{self, StoreError};

#[derive(Debug, Clone)]
pub struct ExprMatrix {
    accessions: Vec<String>,
    genes: Vec<String>,
    values: Vec<Vec<f32>>,
}

impl ExprMatrix {
    pub(crate) fn load(dir: &Path) -> Result<Self, StoreError> {
        let reader = store::open_table(dir, "expr.tsv")?;
        Self::parse(reader)
    }

    fn parse(mut reader: Box<dyn BufRead>) -> Result<Self, StoreError> {
        let mut buf = String::new();
        if reader.read_line(&mut buf)? == 0 {
            return Err(StoreError::Parse("expr.tsv is empty".to_string()));
        }
        let header: Vec<&str> = buf.trim_end().split('\t').collect();
        if header.first() != Some(&"gene") || header.len() < 2 {
            return Err(StoreError::Parse(
                "expr.tsv header must be 'gene' followed by accession names".to_string(),
            ));
        }
        let accessions: Vec<String> = header[1..].iter().map(|s| s.to_string()).collect();

        let mut genes = Vec::new();
        let mut values = Vec::new();
        let mut line_no = 1usize;
        loop {
            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                break;
            }
            line_no += 1;
            let line = buf.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != accessions.len() + 1 {
                return Err(StoreError::Parse(format!(
                    "expr.tsv line {line_no}: expected {} fields, got {}",
                    accessions.len() + 1,
                    fields.len()
                )));
            }
            let mut row = Vec::with_capacity(accessions.len());
            for cell in &fields[1..] {
                row.push(parse_cell(cell).ok_or_else(|| {
                    StoreError::Parse(format!("expr.tsv line {line_no}: bad value '{cell}'"))
                })?);
            }
            genes.push(fields[0].to_string());
            values.push(row);
        }

        Ok(ExprMatrix {
            accessions,
            genes,
            values,
        })
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_accessions(&self) -> usize {
        self.accessions.len()
    }

    pub fn accessions(&self) -> &[String] {
        &self.accessions
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn row(&self, gene_idx: usize) -> &[f32] {
        &self.values[gene_idx]
    }
}

fn parse_cell(cell: &str) -> Option<f32> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") || cell.eq_ignore_ascii_case("nan") {
        return Some(f32::NAN);
    }
    cell.parse::<f32>().ok()
}
