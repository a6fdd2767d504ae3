//! Gene-to-cluster assignment table (`clusters.tsv`).

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use crate::store::{self, StoreError};

/// Ordered cluster assignments as stored on disk: one row per gene,
/// each gene in exactly one cluster. The table may cover only a subset
/// of the network's gene list.
#[derive(Debug, Clone)]
pub struct ClusterTable {
    entries: Vec<(String, u32)>,
}

impl ClusterTable {
    pub(crate) fn load(dir: &Path) -> Result<Self, StoreError> {
        let reader = store::open_table(dir, "clusters.tsv")?;
        Self::parse(reader)
    }

    fn parse(mut reader: Box<dyn BufRead>) -> Result<Self, StoreError> {
        let mut buf = String::new();
        if reader.read_line(&mut buf)? == 0 {
            return Err(StoreError::Parse("clusters.tsv is empty".to_string()));
        }
        if buf.trim_end() != "gene\tcluster" {
            return Err(StoreError::Parse(
                "clusters.tsv header must be 'gene\\tcluster'".to_string(),
            ));
        }

        let mut entries: Vec<(String, u32)> = Vec::new();
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
            let cluster = fields.next().ok_or_else(|| {
                StoreError::Parse(format!("clusters.tsv line {line_no}: missing cluster column"))
            })?;
            if gene.is_empty() {
                tracing::warn!("clusters.tsv line {line_no}: empty gene name; skipping");
                continue;
            }
            let cluster = cluster.trim().parse::<u32>().map_err(|_| {
                StoreError::Parse(format!(
                    "clusters.tsv line {line_no}: bad cluster id '{cluster}'"
                ))
            })?;
            if entries.iter().any(|(g, _)| g == gene) {
                tracing::warn!(
                    "clusters.tsv line {line_no}: duplicate gene '{gene}'; keeping first"
                );
                continue;
            }
            entries.push((gene.to_string(), cluster));
        }
        Ok(ClusterTable { entries })
    }

    /// Number of assignment rows (clustered genes).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(g, c)| (g.as_str(), *c))
    }

    /// Distinct cluster ids, ascending.
    pub fn cluster_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.entries.iter().map(|(_, c)| *c).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Member gene names for one cluster, in table order.
    pub fn members_of(&self, cluster: u32) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, c)| *c == cluster)
            .map(|(g, _)| g.clone())
            .collect()
    }

    /// Ordered cluster-id to member-gene-names map.
    pub fn membership(&self) -> BTreeMap<u32, Vec<String>> {
        let mut map: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for (gene, cluster) in &self.entries {
            map.entry(*cluster).or_default().push(gene.clone());
        }
        map
    }
}

/// Parses a comma-separated cluster-id list from the command line into
/// ascending, deduplicated ids.
pub fn parse_cluster_list(list: &str) -> Result<Vec<u32>, StoreError> {
    let mut ids = Vec::new();
    for part in list.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = part.parse::<u32>().map_err(|_| {
            StoreError::InvalidDataset(format!("bad cluster id '{part}' in cluster list"))
        })?;
        ids.push(id);
    }
    if ids.is_empty() {
        return Err(StoreError::InvalidDataset(
            "empty cluster list".to_string(),
        ));
    }
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}
