//! Dumps a network's raw expression matrix and cluster table as CSV
//! files into an output directory.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use coex_extract::export::{Delim, fmt_value, write_row};
use coex_extract::network::Network;
use coex_extract::store::StoreError;

/// Raw table dump for a co-expression network
#[derive(Parser, Debug)]
#[command(name = "network-info", version)]
#[command(about = "Extracts gene expression and cluster tables from a co-expression network")]
struct Args {
    /// Name of the co-expression network
    #[arg(value_name = "NETWORK")]
    network_name: String,

    /// Directory for the output CSV files
    #[arg(value_name = "OUT_DIR")]
    out_dir: PathBuf,
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
    std::fs::create_dir_all(&args.out_dir)?;

    let expr_path = args
        .out_dir
        .join(format!("network_expr.{}.csv", network.name()));
    let expr = network.expr()?;
    let mut out = BufWriter::new(File::create(&expr_path)?);
    let mut header = vec!["gene".to_string()];
    header.extend(expr.accessions().iter().cloned());
    write_row(&mut out, Delim::Comma, &header)?;
    for (idx, gene) in expr.genes().iter().enumerate() {
        let mut row = vec![gene.clone()];
        row.extend(expr.row(idx).iter().map(|&v| fmt_value(v, "")));
        write_row(&mut out, Delim::Comma, &row)?;
    }
    out.flush()?;
    info!("wrote {} expression rows to {}", expr.n_genes(), expr_path.display());

    let clusters_path = args
        .out_dir
        .join(format!("network_clusters.{}.csv", network.name()));
    let clusters = network.clusters();
    let mut out = BufWriter::new(File::create(&clusters_path)?);
    write_row(&mut out, Delim::Comma, &["gene", "cluster"])?;
    for (gene, cluster) in clusters.iter() {
        write_row(&mut out, Delim::Comma, &[gene, &cluster.to_string()])?;
    }
    out.flush()?;
    info!(
        "wrote {} cluster rows to {}",
        clusters.len(),
        clusters_path.display()
    );

    Ok(())
}
