use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::scope::Scope;

/// Opaque pass-through attribute bundle. Keys and values go to the layout
/// engine verbatim; iteration order is the key order, so serialization stays
/// deterministic.
pub type Attrs = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub(crate) usize);

impl NodeId {
    /// Identity string used in the serialized graph description.
    pub fn dot_id(&self) -> String {
        format!("n{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub kind: String,
    pub label: String,
    pub icon: PathBuf,
    pub scope: Scope,
    pub attrs: Attrs,
}

#[derive(Debug, Clone)]
pub struct Cluster {
    pub id: ClusterId,
    pub label: String,
    pub parent: Scope,
    pub attrs: Attrs,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: Option<String>,
    pub attrs: Attrs,
}

/// Accumulated diagram contents in declaration order.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        kind: String,
        label: String,
        icon: PathBuf,
        scope: Scope,
        attrs: Attrs,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            kind,
            label,
            icon,
            scope,
            attrs,
        });
        id
    }

    pub fn add_cluster(&mut self, label: String, parent: Scope, attrs: Attrs) -> ClusterId {
        let id = ClusterId(self.clusters.len());
        self.clusters.push(Cluster {
            id,
            label,
            parent,
            attrs,
        });
        id
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, label: Option<String>, attrs: Attrs) {
        self.edges.push(Edge {
            from,
            to,
            label,
            attrs,
        });
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Clusters whose parent is `scope`, in declaration order.
    pub fn clusters_in(&self, scope: Scope) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(move |c| c.parent == scope)
    }

    /// Nodes owned directly by `scope`, in declaration order.
    pub fn nodes_in(&self, scope: Scope) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.scope == scope)
    }
}
