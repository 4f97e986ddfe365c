pub(crate) mod kmeans;
pub use kmeans::squared_euclidean;
pub use kmeans::{KMeans, KMeansResult};

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

/// Maps each molecule identifier to the index of its cluster.
///
/// Keys are kept sorted so the JSON export is stable. Inserting an identifier
/// twice keeps the later cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterAssignment {
    clusters: BTreeMap<String, usize>,
}

impl ClusterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, cluster: usize) -> Option<usize> {
        self.clusters.insert(identifier.into(), cluster)
    }

    pub fn get(&self, identifier: &str) -> Option<usize> {
        self.clusters.get(identifier).copied()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.clusters.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.clusters.iter().map(|(id, &cluster)| (id.as_str(), cluster))
    }

    /// Identifiers assigned to `cluster`, in sorted order.
    pub fn members(&self, cluster: usize) -> Vec<&str> {
        self.iter()
            .filter(|&(_, c)| c == cluster)
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of identifiers per cluster, indexed by cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let n_clusters = self.clusters.values().max().map_or(0, |&max| max + 1);
        let mut sizes = vec![0; n_clusters];
        for &cluster in self.clusters.values() {
            sizes[cluster] += 1;
        }
        sizes
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for ClusterAssignment {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut assignment = ClusterAssignment::new();
        for (identifier, cluster) in iter {
            assignment.insert(identifier, cluster);
        }
        assignment
    }
}

impl IntoIterator for ClusterAssignment {
    type Item = (String, usize);
    type IntoIter = btree_map::IntoIter<String, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.into_iter()
    }
}
