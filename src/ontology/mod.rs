//! Gene-ontology datasets and the term-enrichment test.

use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

pub mod enrichment;

use crate::network::Gene;
use crate::store::{self, StoreError};
pub use enrichment::EnrichedTerm;

/// One ontology term with its annotated gene set.
#[derive(Debug, Clone)]
pub struct Term {
    pub id: String,
    pub name: String,
    pub source: String,
    genes: HashSet<String>,
}

impl Term {
    pub fn num_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.genes.contains(gene)
    }
}

#[derive(Debug)]
pub struct GeneOntology {
    name: String,
    terms: Vec<Term>,
}

impl GeneOntology {
    /// Opens a named ontology from the default database root.
    pub fn open(name: &str) -> Result<Self, StoreError> {
        Self::open_in(&store::db_root(), name)
    }

    pub fn open_in(root: &Path, name: &str) -> Result<Self, StoreError> {
        let dir = store::ontology_dir(root, name)?;
        let mut terms = parse_terms(store::open_table(&dir, "terms.tsv")?)?;
        let annotations = attach_annotations(store::open_table(&dir, "gene2term.tsv")?, &mut terms)?;
        tracing::info!(
            "opened ontology '{name}': {} terms, {annotations} annotations",
            terms.len()
        );
        Ok(GeneOntology {
            name: name.to_string(),
            terms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Hypergeometric enrichment of ontology terms in `genes` against a
    /// background universe of `num_universe` genes. Returns terms whose
    /// Bonferroni-corrected p-value is below `alpha`, sorted by
    /// corrected p-value then term id.
    pub fn enrichment(
        &self,
        genes: &[Gene],
        num_universe: usize,
        alpha: f64,
    ) -> Vec<EnrichedTerm> {
        enrichment::enrichment_test(self, genes, num_universe, alpha)
    }
}

fn parse_terms(mut reader: Box<dyn BufRead>) -> Result<Vec<Term>, StoreError> {
    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Err(StoreError::Parse("terms.tsv is empty".to_string()));
    }
    if buf.trim_end() != "term\tname\tsource" {
        return Err(StoreError::Parse(
            "terms.tsv header must be 'term\\tname\\tsource'".to_string(),
        ));
    }

    let mut terms = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
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
        if fields.len() != 3 {
            return Err(StoreError::Parse(format!(
                "terms.tsv line {line_no}: expected 3 fields, got {}",
                fields.len()
            )));
        }
        if !seen.insert(fields[0].to_string()) {
            return Err(StoreError::Parse(format!(
                "terms.tsv line {line_no}: duplicate term '{}'",
                fields[0]
            )));
        }
        terms.push(Term {
            id: fields[0].to_string(),
            name: fields[1].to_string(),
            source: fields[2].to_string(),
            genes: HashSet::new(),
        });
    }
    Ok(terms)
}

fn attach_annotations(
    mut reader: Box<dyn BufRead>,
    terms: &mut [Term],
) -> Result<usize, StoreError> {
    let index: HashMap<String, usize> = terms
        .iter()
        .enumerate()
        .map(|(idx, term)| (term.id.clone(), idx))
        .collect();

    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Err(StoreError::Parse("gene2term.tsv is empty".to_string()));
    }
    if buf.trim_end() != "gene\tterm" {
        return Err(StoreError::Parse(
            "gene2term.tsv header must be 'gene\\tterm'".to_string(),
        ));
    }

    let mut count = 0usize;
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
        let mut fields = line.split('\t');
        let gene = fields.next().unwrap_or("").trim();
        let term = fields.next().map(str::trim).ok_or_else(|| {
            StoreError::Parse(format!("gene2term.tsv line {line_no}: missing term column"))
        })?;
        if gene.is_empty() || term.is_empty() {
            tracing::warn!("gene2term.tsv line {line_no}: empty field; skipping");
            continue;
        }
        match index.get(term) {
            Some(&idx) => {
                if terms[idx].genes.insert(gene.to_string()) {
                    count += 1;
                }
            }
            None => {
                tracing::warn!(
                    "gene2term.tsv line {line_no}: unknown term '{term}'; skipping"
                );
            }
        }
    }
    Ok(count)
}
