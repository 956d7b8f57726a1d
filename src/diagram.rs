use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use log::info;

use crate::config::DiagramConfig;
use crate::dot;
use crate::error::{ReferenceError, Result};
use crate::icons;
use crate::model::{Attrs, Graph, NodeId};
use crate::render::{invoke_engine, write_output};
use crate::scope::ScopeStack;
use crate::OutputFormat;

static NEXT_DIAGRAM_ID: AtomicU64 = AtomicU64::new(0);

/// Token referencing a declared node. Only valid as an edge endpoint within
/// the diagram that issued it; a handle outliving its diagram is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle {
    diagram: u64,
    id: NodeId,
}

/// Optional label and style overrides for an edge. Everything beyond the
/// label is an opaque key/value bundle passed through to the layout engine.
#[derive(Debug, Clone, Default)]
pub struct EdgeInfo {
    pub label: Option<String>,
    pub attrs: Attrs,
}

impl EdgeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn color(self, color: impl Into<String>) -> Self {
        self.attr("color", color)
    }

    pub fn style(self, style: impl Into<String>) -> Self {
        self.attr("style", style)
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// Root scope and unit of output. Accumulates nodes, clusters and edges under
/// the builder API, then serializes and renders on [`Diagram::render`].
#[derive(Debug)]
pub struct Diagram {
    id: u64,
    config: DiagramConfig,
    graph: Graph,
    scopes: ScopeStack,
}

impl Diagram {
    pub fn begin(config: DiagramConfig) -> Result<Self> {
        let mut scopes = ScopeStack::new();
        scopes.enter_diagram()?;
        Ok(Self {
            id: NEXT_DIAGRAM_ID.fetch_add(1, Ordering::Relaxed),
            config,
            graph: Graph::new(),
            scopes,
        })
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Open a nested cluster; declarations attach to it until
    /// [`Diagram::end_cluster`].
    pub fn cluster(&mut self, label: impl Into<String>) -> Result<()> {
        self.cluster_with(label, Attrs::new())
    }

    pub fn cluster_with(&mut self, label: impl Into<String>, attrs: Attrs) -> Result<()> {
        let parent = self.scopes.current();
        let id = self.graph.add_cluster(label.into(), parent, attrs);
        self.scopes.enter_cluster(id)?;
        Ok(())
    }

    pub fn end_cluster(&mut self) -> Result<()> {
        self.scopes.exit_cluster()?;
        Ok(())
    }

    /// Declare a node in the current scope. The kind's icon is resolved here,
    /// so an unknown kind fails at declaration time, not at render time.
    pub fn node(&mut self, kind: &str, label: impl Into<String>) -> Result<NodeHandle> {
        self.node_with(kind, label, Attrs::new())
    }

    pub fn node_with(
        &mut self,
        kind: &str,
        label: impl Into<String>,
        attrs: Attrs,
    ) -> Result<NodeHandle> {
        let icon = icons::resolve(kind, &self.config.resource_dir)?;
        let id = self.graph.add_node(
            kind.to_string(),
            label.into(),
            icon,
            self.scopes.current(),
            attrs,
        );
        Ok(NodeHandle {
            diagram: self.id,
            id,
        })
    }

    pub fn edge(&mut self, from: NodeHandle, to: NodeHandle) -> Result<()> {
        self.edge_with(from, to, EdgeInfo::new())
    }

    pub fn edge_with(&mut self, from: NodeHandle, to: NodeHandle, info: EdgeInfo) -> Result<()> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.graph.add_edge(from, to, info.label, info.attrs);
        Ok(())
    }

    /// Connect consecutive handles pairwise, each edge carrying `info`.
    pub fn chain(&mut self, handles: &[NodeHandle], info: EdgeInfo) -> Result<()> {
        for pair in handles.windows(2) {
            self.edge_with(pair[0], pair[1], info.clone())?;
        }
        Ok(())
    }

    fn resolve(&self, handle: NodeHandle) -> Result<NodeId> {
        if handle.diagram != self.id || !self.graph.contains_node(handle.id) {
            return Err(ReferenceError::ForeignNode {
                id: handle.id.dot_id(),
            }
            .into());
        }
        Ok(handle.id)
    }

    /// Serialized graph description, without invoking the engine.
    pub fn to_dot(&self) -> String {
        dot::serialize(&self.graph, &self.config)
    }

    /// Close the diagram scope, serialize, invoke the layout engine and write
    /// exactly one output file. All clusters must be closed first. Consumes
    /// the diagram; its handles become useless.
    pub fn render(mut self) -> Result<PathBuf> {
        self.scopes.exit_diagram()?;
        let source = self.to_dot();
        let output = self.config.output_path();

        let bytes = match self.config.format {
            OutputFormat::Dot => source.into_bytes(),
            format => invoke_engine(&self.config.engine, format, &source)?,
        };
        write_output(&bytes, &output)?;

        info!(
            "rendered \"{}\" to {}",
            self.config.title,
            output.display()
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ScopeError};

    fn diagram() -> Diagram {
        Diagram::begin(DiagramConfig::new("test", "out/test")).unwrap()
    }

    #[test]
    fn duplicate_labels_get_distinct_identities() {
        let mut d = diagram();
        let a = d.node("generic.blank", "same").unwrap();
        let b = d.node("generic.blank", "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unknown_kind_fails_at_declaration() {
        let mut d = diagram();
        let err = d.node("azure.compute.vm", "vm").unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn foreign_handle_is_a_reference_error() {
        let mut first = diagram();
        let stray = first.node("generic.blank", "stray").unwrap();

        let mut second = diagram();
        let local = second.node("generic.blank", "local").unwrap();
        let err = second.edge(stray, local).unwrap_err();
        assert!(matches!(err, Error::Reference(_)));
    }

    #[test]
    fn end_cluster_without_cluster_is_a_scope_error() {
        let mut d = diagram();
        let err = d.end_cluster().unwrap_err();
        assert!(matches!(
            err,
            Error::Scope(ScopeError::NoActiveCluster)
        ));
    }

    #[test]
    fn render_with_open_cluster_is_a_scope_error() {
        let mut d = diagram();
        d.cluster("tier").unwrap();
        let err = d.render().unwrap_err();
        assert!(matches!(err, Error::Scope(ScopeError::OpenClusters(1))));
    }

    #[test]
    fn chain_connects_pairwise() {
        let mut d = diagram();
        let a = d.node("generic.blank", "a").unwrap();
        let b = d.node("generic.blank", "b").unwrap();
        let c = d.node("generic.blank", "c").unwrap();
        d.chain(&[a, b, c], EdgeInfo::new().label("hop")).unwrap();

        let dot = d.to_dot();
        assert!(dot.contains("\"n0\" -> \"n1\""));
        assert!(dot.contains("\"n1\" -> \"n2\""));
    }
}
