//! Pairwise co-expression scores for the genes of each requested
//! cluster, one tab-separated file per cluster.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use coex_extract::export::{Delim, fmt_value, write_row};
use coex_extract::network::Network;
use coex_extract::network::clusters::parse_cluster_list;
use coex_extract::store::StoreError;

/// Co-expression score extraction per cluster
#[derive(Parser, Debug)]
#[command(name = "coexpression-scores", version)]
#[command(about = "Extracts pairwise co-expression scores between genes of network clusters")]
struct Args {
    /// Name of the co-expression network
    #[arg(value_name = "NETWORK")]
    network_name: String,

    /// Comma-separated list of cluster ids
    #[arg(value_name = "CLUSTERS")]
    cluster_list: String,

    /// Prefix for output file names
    #[arg(value_name = "PREFIX")]
    output_prefix: String,
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
    let network = Network::open(&args.network_name)?;
    let membership = network.clusters().membership();
    let requested = parse_cluster_list(&args.cluster_list)?;

    for cluster in requested {
        info!("retrieving cluster {cluster}");
        let members = membership.get(&cluster).ok_or_else(|| {
            StoreError::InvalidDataset(format!(
                "cluster {cluster} not present in network '{}'",
                args.network_name
            ))
        })?;
        let genes = network.from_ids(members)?;
        let records = network.subnetwork(&genes)?;

        let path = format!("{}.cluster_{cluster}.txt", args.output_prefix);
        let mut out = BufWriter::new(File::create(&path)?);
        write_row(&mut out, Delim::Tab, &["gene_a", "gene_b", "score"])?;
        for record in &records {
            write_row(
                &mut out,
                Delim::Tab,
                &[
                    record.gene_a.as_str(),
                    record.gene_b.as_str(),
                    &fmt_value(record.score, "NA"),
                ],
            )?;
        }
        out.flush()?;
        info!("wrote {} gene pairs to {path}", records.len());
    }

    Ok(())
}
