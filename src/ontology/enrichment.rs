//! Hypergeometric term-enrichment test with Bonferroni correction.

use statrs::distribution::{DiscreteCDF, Hypergeometric};

use crate::network::Gene;
use crate::ontology::GeneOntology;

/// One significant term from an enrichment test, with the contingency
/// counts behind its p-value.
#[derive(Debug, Clone)]
pub struct EnrichedTerm {
    pub term_id: String,
    pub term_name: String,
    pub source: String,
    /// Bonferroni-corrected p-value.
    pub pval_bf: f64,
    /// Query genes annotated to the term, in query order.
    pub loci: Vec<String>,
    /// Terms with a nonzero overlap with the query (the correction factor).
    pub terms_tested: usize,
    pub num_common: usize,
    /// Genes annotated to the term.
    pub source_term_size: usize,
    /// Size of the query gene list.
    pub target_term_size: usize,
    /// Total terms in the ontology.
    pub num_terms: usize,
    pub num_universe: usize,
}

pub(crate) fn enrichment_test(
    ontology: &GeneOntology,
    genes: &[Gene],
    num_universe: usize,
    alpha: f64,
) -> Vec<EnrichedTerm> {
    let draws = genes.len();
    if draws == 0 || num_universe == 0 {
        return Vec::new();
    }

    // Only terms that share at least one gene with the query are tested;
    // that count is also the Bonferroni correction factor.
    let candidates: Vec<(usize, Vec<String>)> = ontology
        .terms()
        .iter()
        .enumerate()
        .filter_map(|(idx, term)| {
            let loci: Vec<String> = genes
                .iter()
                .filter(|g| term.contains(&g.name))
                .map(|g| g.name.clone())
                .collect();
            if loci.is_empty() { None } else { Some((idx, loci)) }
        })
        .collect();
    let terms_tested = candidates.len();

    let mut out = Vec::new();
    for (idx, loci) in candidates {
        let term = &ontology.terms()[idx];
        // Terms can annotate genes outside the network; the universe
        // bound keeps the distribution well-formed.
        let successes = term.num_genes().min(num_universe);
        let hyper = match Hypergeometric::new(
            num_universe as u64,
            successes as u64,
            draws.min(num_universe) as u64,
        ) {
            Ok(h) => h,
            Err(e) => {
                tracing::warn!("skipping term '{}': {e}", term.id);
                continue;
            }
        };
        // sf gives "more than k"; subtract one to include the observed count.
        let pval = hyper.sf(loci.len() as u64 - 1);
        let pval_bf = (pval * terms_tested as f64).min(1.0);
        if pval_bf >= alpha {
            continue;
        }
        out.push(EnrichedTerm {
            term_id: term.id.clone(),
            term_name: term.name.clone(),
            source: term.source.clone(),
            pval_bf,
            num_common: loci.len(),
            loci,
            terms_tested,
            source_term_size: term.num_genes(),
            target_term_size: draws,
            num_terms: ontology.num_terms(),
            num_universe,
        });
    }

    out.sort_by(|a, b| {
        a.pval_bf
            .partial_cmp(&b.pval_bf)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term_id.cmp(&b.term_id))
    });
    out
}
