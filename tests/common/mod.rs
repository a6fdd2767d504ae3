//! Fixture database shared by the integration tests.
//!
//! Ten genes, of which six are clustered (g1-g3, g4-g5, g6), and two GO
//! terms. The score matrix stores `10*i + j` for the 0-based gene-index
//! pair `(i, j)`. Cluster 1 is exactly the GO:0001 gene set, giving an
//! enrichment p-value of 1/C(10,3) = 1/120.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use coex_extract::network::coex;

pub const NETWORK: &str = "testnet";
pub const ONTOLOGY: &str = "go_test";

pub fn fixture_db() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    write_network(root.path());
    write_ontology(root.path());
    root
}

fn write_network(root: &Path) {
    let dir = root.join("networks").join(NETWORK);
    fs::create_dir_all(&dir).unwrap();

    let meta = serde_json::json!({
        "name": NETWORK,
        "description": "fixture network",
        "organism": "Zea mays",
        "built": "2025-01-15",
    });
    fs::write(dir.join("meta.json"), serde_json::to_string_pretty(&meta).unwrap()).unwrap();

    fs::write(
        dir.join("genes.tsv"),
        "name\tchrom\tstart\tend\n\
         g1\tchr1\t100\t200\n\
         g2\tchr1\t300\t400\n\
         g3\tchr1\t500\t600\n\
         g4\tchr2\t100\t250\n\
         g5\tchr2\t400\t500\n\
         g6\tchr3\t100\t900\n\
         g7\tchr3\t1000\t1200\n\
         g8\tchr4\t100\t300\n\
         g9\tchr4\t500\t800\n\
         g10\tchr5\t100\t400\n",
    )
    .unwrap();

    fs::write(
        dir.join("expr.tsv"),
        "gene\ts1\ts2\ts3\n\
         g1\t1.0\t1.1\t1.2\n\
         g2\t2.0\t2.1\t2.2\n\
         g3\t3.0\t3.1\t3.2\n\
         g4\t4.0\t4.1\t4.2\n\
         g5\t5.0\t5.1\t5.2\n\
         g6\t6.0\t6.1\tNA\n\
         g7\t7.0\t7.1\t7.2\n\
         g8\t8.0\t8.1\t8.2\n\
         g9\t9.0\t9.1\t9.2\n\
         g10\t10.0\t10.1\t10.2\n",
    )
    .unwrap();

    fs::write(
        dir.join("clusters.tsv"),
        "gene\tcluster\ng1\t1\ng2\t1\ng3\t1\ng4\t2\ng5\t2\ng6\t3\n",
    )
    .unwrap();

    let n = 10usize;
    let mut scores = Vec::with_capacity(coex::n_pairs(n));
    for i in 0..n {
        for j in (i + 1)..n {
            scores.push((10 * i + j) as f32);
        }
    }
    coex::write_scores(&dir.join(coex::COEX_FILE), n, &scores).unwrap();
}

fn write_ontology(root: &Path) {
    let dir = root.join("ontologies").join(ONTOLOGY);
    fs::create_dir_all(&dir).unwrap();

    fs::write(
        dir.join("terms.tsv"),
        "term\tname\tsource\nGO:0001\tphotosynthesis\tBP\nGO:0002\tkinase activity\tMF\n",
    )
    .unwrap();

    fs::write(
        dir.join("gene2term.tsv"),
        "gene\tterm\ng1\tGO:0001\ng2\tGO:0001\ng3\tGO:0001\ng5\tGO:0002\ng6\tGO:0002\n",
    )
    .unwrap();
}
