//! Conversion of a chemical node network into a `petgraph` directed graph.
//!
//! A network is a map from node key to its name, optional SMILES and the keys
//! of its children and parents. Every child link and every parent link
//! becomes one `parent → child` edge; links given from both ends collapse.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkNode {
    pub name: String,
    pub smiles: Option<String>,
    pub children: Vec<String>,
    pub parents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChemicalNetwork {
    nodes: BTreeMap<String, NetworkNode>,
}

impl ChemicalNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, key: impl Into<String>, node: NetworkNode) -> Option<NetworkNode> {
        self.nodes.insert(key.into(), node)
    }

    pub fn get(&self, key: &str) -> Option<&NetworkNode> {
        self.nodes.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NetworkNode)> + '_ {
        self.nodes.iter().map(|(key, node)| (key.as_str(), node))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChemicalNode {
    pub key: String,
    pub name: String,
    pub smiles: Option<String>,
}

#[derive(Debug)]
pub struct ChemicalGraph {
    pub graph: DiGraph<ChemicalNode, ()>,
    indices: HashMap<String, NodeIndex>,
}

impl ChemicalGraph {
    pub fn from_network(network: &ChemicalNetwork) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(network.len(), network.len());
        let mut indices = HashMap::with_capacity(network.len());

        for (key, node) in network.iter() {
            let name = if node.name.is_empty() {
                key.to_string()
            } else {
                node.name.clone()
            };
            let index = graph.add_node(ChemicalNode {
                key: key.to_string(),
                name,
                smiles: node.smiles.clone(),
            });
            indices.insert(key.to_string(), index);
        }

        let lookup = |from: &str, to: &str| {
            indices.get(to).copied().ok_or_else(|| Error::UnknownNode {
                from: from.to_string(),
                to: to.to_string(),
            })
        };

        let mut edges = Vec::new();
        for (key, node) in network.iter() {
            let this = lookup(key, key)?;
            for child in &node.children {
                edges.push((this, lookup(key, child)?));
            }
            for parent in &node.parents {
                edges.push((lookup(key, parent)?, this));
            }
        }
        for (parent, child) in edges {
            graph.update_edge(parent, child, ());
        }

        debug!(
            "network of {} nodes converted with {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(ChemicalGraph { graph, indices })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, key: &str) -> Option<&ChemicalNode> {
        self.indices.get(key).map(|&index| &self.graph[index])
    }

    pub fn contains_edge(&self, parent: &str, child: &str) -> bool {
        match (self.indices.get(parent), self.indices.get(child)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    pub fn children(&self, key: &str) -> Vec<&str> {
        self.linked(key, Direction::Outgoing)
    }

    pub fn parents(&self, key: &str) -> Vec<&str> {
        self.linked(key, Direction::Incoming)
    }

    /// Keys of nodes without parents, sorted.
    pub fn roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = self
            .graph
            .node_indices()
            .filter(|&index| {
                self.graph
                    .neighbors_directed(index, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|index| self.graph[index].key.as_str())
            .collect();
        roots.sort_unstable();
        roots
    }

    fn linked(&self, key: &str, direction: Direction) -> Vec<&str> {
        let Some(&index) = self.indices.get(key) else {
            return Vec::new();
        };
        let mut linked: Vec<&str> = self
            .graph
            .neighbors_directed(index, direction)
            .map(|other| self.graph[other].key.as_str())
            .collect();
        linked.sort_unstable();
        linked
    }
}
