//! GO term enrichment for every requested cluster of a co-expression
//! network, as a tab-separated table on stdout.

use std::io::{self, BufWriter, Write};

use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

use coex_extract::export::{Delim, write_row};
use coex_extract::network::Network;
use coex_extract::network::clusters::parse_cluster_list;
use coex_extract::ontology::GeneOntology;
use coex_extract::store::StoreError;

const HEADER: [&str; 11] = [
    "Cluster",
    "Term_info",
    "Loci",
    "Source",
    "pval(BF)",
    "Terms_tested",
    "Num_in_Common",
    "Source_term_size",
    "Target_term_size",
    "Num_of_terms",
    "Number_Universe",
];

/// GO enrichment of co-expression network clusters
#[derive(Parser, Debug)]
#[command(name = "cluster-enrichment", version)]
#[command(about = "Performs GO term enrichment for clusters of a co-expression network")]
struct Args {
    /// Name of the co-expression network
    #[arg(short = 'c', long = "cob", value_name = "NETWORK")]
    cob: String,

    /// Name of the GO ontology dataset
    #[arg(short = 'g', long = "go", value_name = "ONTOLOGY")]
    go: String,

    /// Comma-separated cluster ids (default: all clusters in the network)
    #[arg(short = 's', long = "clusters", value_name = "LIST")]
    clusters: Option<String>,

    /// Bonferroni-corrected significance cutoff
    #[arg(long, value_name = "PVAL", default_value_t = 0.05)]
    alpha: f64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), StoreError> {
    let network = Network::open(&args.cob)?;
    let ontology = GeneOntology::open(&args.go)?;
    let num_universe = network.num_genes();
    let membership = network.clusters().membership();

    let requested = match &args.clusters {
        Some(list) => parse_cluster_list(list)?,
        None => membership.keys().copied().collect(),
    };

    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);
    write_row(&mut out, Delim::Tab, &HEADER)?;

    for cluster in requested {
        let members = membership.get(&cluster).ok_or_else(|| {
            StoreError::InvalidDataset(format!(
                "cluster {cluster} not present in network '{}'",
                args.cob
            ))
        })?;
        let genes = network.from_ids(members)?;
        let significant = ontology.enrichment(&genes, num_universe, args.alpha);

        if significant.is_empty() {
            let mut row = vec![cluster.to_string(), "No enrichment".to_string()];
            row.extend(std::iter::repeat_n("NA".to_string(), HEADER.len() - 2));
            write_row(&mut out, Delim::Tab, &row)?;
            continue;
        }

        for term in significant {
            let row = [
                cluster.to_string(),
                format!("{} {}", term.term_id, term.term_name),
                term.loci.join(","),
                term.source.clone(),
                format!("{:.6e}", term.pval_bf),
                term.terms_tested.to_string(),
                term.num_common.to_string(),
                term.source_term_size.to_string(),
                term.target_term_size.to_string(),
                term.num_terms.to_string(),
                term.num_universe.to_string(),
            ];
            write_row(&mut out, Delim::Tab, &row)?;
        }
    }

    out.flush()?;
    Ok(())
}
