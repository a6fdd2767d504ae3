//! Library-level tests against a complete fixture database.

mod common;

use coex_extract::network::Network;
use coex_extract::ontology::GeneOntology;
use coex_extract::store::StoreError;

use common::{NETWORK, ONTOLOGY, fixture_db};

#[test]
fn test_network_open_and_counts() {
    let db = fixture_db();
    let network = Network::open_in(db.path(), NETWORK).unwrap();

    assert_eq!(network.name(), NETWORK);
    assert_eq!(network.num_genes(), 10);
    assert_eq!(network.meta().organism.as_deref(), Some("Zea mays"));

    let clusters = network.clusters();
    assert_eq!(clusters.len(), 6);
    assert_eq!(clusters.cluster_ids(), vec![1, 2, 3]);

    // Each clustered gene is assigned exactly once, so member counts
    // sum to the table's row count.
    let membership = clusters.membership();
    let total: usize = membership.values().map(Vec::len).sum();
    assert_eq!(total, clusters.len());
}

#[test]
fn test_missing_network_is_reported() {
    let db = fixture_db();
    let err = Network::open_in(db.path(), "no_such_network").unwrap_err();
    assert!(matches!(err, StoreError::MissingDataset { .. }));
}

#[test]
fn test_from_ids_resolves_full_gene_records() {
    let db = fixture_db();
    let network = Network::open_in(db.path(), NETWORK).unwrap();

    let genes = network
        .from_ids(&["g4".to_string(), "g5".to_string()])
        .unwrap();
    assert_eq!(genes.len(), 2);
    assert_eq!(genes[0].chrom, "chr2");
    assert_eq!(genes[0].start, 100);

    let err = network.from_ids(&["g99".to_string()]).unwrap_err();
    assert!(matches!(err, StoreError::InvalidDataset(_)));
}

#[test]
fn test_subnetwork_covers_exactly_the_cluster() {
    let db = fixture_db();
    let network = Network::open_in(db.path(), NETWORK).unwrap();
    let members = network.clusters().members_of(1);
    let genes = network.from_ids(&members).unwrap();

    let records = network.subnetwork(&genes).unwrap();
    assert_eq!(records.len(), 3);
    for record in &records {
        assert!(members.contains(&record.gene_a));
        assert!(members.contains(&record.gene_b));
    }
    // Scores follow the fixture's 10*i + j pattern over gene indices.
    assert_eq!(records[0].gene_a, "g1");
    assert_eq!(records[0].gene_b, "g2");
    assert_eq!(records[0].score, 1.0);
    assert_eq!(records[1].score, 2.0);
    assert_eq!(records[2].gene_a, "g2");
    assert_eq!(records[2].score, 12.0);
}

#[test]
fn test_subnetwork_is_input_order_insensitive() {
    let db = fixture_db();
    let network = Network::open_in(db.path(), NETWORK).unwrap();

    let forward = network
        .from_ids(&["g1".to_string(), "g2".to_string(), "g3".to_string()])
        .unwrap();
    let shuffled = network
        .from_ids(&["g3".to_string(), "g1".to_string(), "g2".to_string()])
        .unwrap();

    assert_eq!(
        network.subnetwork(&forward).unwrap(),
        network.subnetwork(&shuffled).unwrap()
    );
}

#[test]
fn test_expr_matrix_loads_with_missing_values() {
    let db = fixture_db();
    let network = Network::open_in(db.path(), NETWORK).unwrap();
    let expr = network.expr().unwrap();

    assert_eq!(expr.n_genes(), 10);
    assert_eq!(expr.n_accessions(), 3);
    assert_eq!(expr.genes()[5], "g6");
    assert_eq!(expr.row(0), [1.0, 1.1, 1.2]);
    assert!(expr.row(5)[2].is_nan());
}

#[test]
fn test_cluster_enrichment_against_fixture_ontology() {
    let db = fixture_db();
    let network = Network::open_in(db.path(), NETWORK).unwrap();
    let ontology = GeneOntology::open_in(db.path(), ONTOLOGY).unwrap();
    assert_eq!(ontology.num_terms(), 2);

    let members = network.clusters().members_of(1);
    let genes = network.from_ids(&members).unwrap();

    // Cluster 1 is exactly the GO:0001 gene set: p = 1/C(10,3) = 1/120,
    // with a single tested term.
    let hits = ontology.enrichment(&genes, network.num_genes(), 0.05);
    assert_eq!(hits.len(), 1);
    let hit = &hits[0];
    assert_eq!(hit.term_id, "GO:0001");
    assert!((hit.pval_bf - 1.0 / 120.0).abs() < 1e-9);
    assert_eq!(hit.loci, members);
    assert_eq!(hit.terms_tested, 1);
    assert_eq!(hit.num_common, 3);
    assert_eq!(hit.source_term_size, 3);
    assert_eq!(hit.target_term_size, 3);
    assert_eq!(hit.num_terms, 2);
    assert_eq!(hit.num_universe, 10);

    // A cutoff below the p-value filters the term back out.
    assert!(
        ontology
            .enrichment(&genes, network.num_genes(), 0.001)
            .is_empty()
    );
}

#[test]
fn test_weakly_overlapping_cluster_has_no_enrichment() {
    let db = fixture_db();
    let network = Network::open_in(db.path(), NETWORK).unwrap();
    let ontology = GeneOntology::open_in(db.path(), ONTOLOGY).unwrap();

    let members = network.clusters().members_of(2);
    let genes = network.from_ids(&members).unwrap();
    assert!(
        ontology
            .enrichment(&genes, network.num_genes(), 0.05)
            .is_empty()
    );
}
