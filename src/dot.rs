use std::fmt::Write as _;

use crate::config::{default_cluster_attr, DiagramConfig};
use crate::model::{Attrs, Edge, Graph, Node};
use crate::scope::Scope;

/// Serialize the accumulated graph into the layout engine's input language.
///
/// Clusters are walked depth-first in declaration order, each emitting a
/// `subgraph cluster_*` block holding its directly-owned nodes and nested
/// child blocks. Edges may cross cluster boundaries, so they are emitted as a
/// flat list after all grouping blocks. Output is byte-deterministic for a
/// given declaration sequence.
pub fn serialize(graph: &Graph, config: &DiagramConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph {} {{", quote(&config.title));

    let mut graph_attr = config.graph_attr.clone();
    graph_attr.insert("label".to_string(), config.title.clone());
    graph_attr.insert("rankdir".to_string(), config.direction.rankdir().to_string());
    let _ = writeln!(out, "  graph [{}];", format_attrs(&graph_attr));
    let _ = writeln!(out, "  node [{}];", format_attrs(&config.node_attr));
    let _ = writeln!(out, "  edge [{}];", format_attrs(&config.edge_attr));
    out.push('\n');

    emit_scope(&mut out, graph, Scope::Root, 1);

    if !graph.edges().is_empty() {
        out.push('\n');
        for edge in graph.edges() {
            emit_edge(&mut out, edge);
        }
    }

    out.push_str("}\n");
    out
}

fn emit_scope(out: &mut String, graph: &Graph, scope: Scope, depth: usize) {
    let pad = "  ".repeat(depth);

    for cluster in graph.clusters_in(scope) {
        let mut attrs = default_cluster_attr(depth - 1);
        attrs.extend(cluster.attrs.clone());
        attrs.insert("label".to_string(), cluster.label.clone());

        let _ = writeln!(out, "{pad}subgraph \"cluster_{}\" {{", cluster.id.0);
        let _ = writeln!(out, "{pad}  graph [{}];", format_attrs(&attrs));
        for node in graph.nodes_in(Scope::Cluster(cluster.id)) {
            emit_node(out, node, depth + 1);
        }
        emit_scope(out, graph, Scope::Cluster(cluster.id), depth + 1);
        let _ = writeln!(out, "{pad}}}");
    }

    if scope == Scope::Root {
        for node in graph.nodes_in(Scope::Root) {
            emit_node(out, node, depth);
        }
    }
}

fn emit_node(out: &mut String, node: &Node, depth: usize) {
    let mut attrs = node.attrs.clone();
    attrs.insert("image".to_string(), node.icon.display().to_string());
    attrs.insert("label".to_string(), node.label.clone());
    let _ = writeln!(
        out,
        "{}{} [{}];",
        "  ".repeat(depth),
        quote(&node.id.dot_id()),
        format_attrs(&attrs)
    );
}

fn emit_edge(out: &mut String, edge: &Edge) {
    let mut attrs = edge.attrs.clone();
    if let Some(label) = &edge.label {
        attrs.insert("label".to_string(), label.clone());
    }
    if attrs.is_empty() {
        let _ = writeln!(
            out,
            "  {} -> {};",
            quote(&edge.from.dot_id()),
            quote(&edge.to.dot_id())
        );
    } else {
        let _ = writeln!(
            out,
            "  {} -> {} [{}];",
            quote(&edge.from.dot_id()),
            quote(&edge.to.dot_id()),
            format_attrs(&attrs)
        );
    }
}

fn format_attrs(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!("{key}={}", quote(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attrs;
    use std::path::PathBuf;

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        let tier = graph.add_cluster("UI Tier".into(), Scope::Root, Attrs::new());
        let one = graph.add_node(
            "onprem.client.users".into(),
            "one".into(),
            PathBuf::from("resources/onprem/client/users.png"),
            Scope::Cluster(tier),
            Attrs::new(),
        );
        let two = graph.add_node(
            "gcp.storage.gcs".into(),
            "two".into(),
            PathBuf::from("resources/gcp/storage/gcs.png"),
            Scope::Root,
            Attrs::new(),
        );
        graph.add_edge(one, two, Some("go".into()), Attrs::new());
        graph
    }

    #[test]
    fn emits_cluster_block_root_node_and_edge() {
        let config = DiagramConfig::new("Topology", "out");
        let dot = serialize(&sample_graph(), &config);

        assert!(dot.starts_with("digraph \"Topology\" {"));
        assert!(dot.contains("subgraph \"cluster_0\" {"));
        assert!(dot.contains("label=\"UI Tier\""));
        // clustered node sits inside the block, root node outside
        let cluster_block = &dot[dot.find("subgraph").unwrap()..dot.find("\n  }").unwrap()];
        assert!(cluster_block.contains("\"n0\""));
        assert!(!cluster_block.contains("\"n1\""));
        assert!(dot.contains("\"n1\" ["));
        assert!(dot.contains("\"n0\" -> \"n1\" ["));
        assert!(dot.contains("label=\"go\""));
    }

    #[test]
    fn serialization_is_deterministic() {
        let config = DiagramConfig::new("Topology", "out");
        let first = serialize(&sample_graph(), &config);
        let second = serialize(&sample_graph(), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn labels_are_escaped() {
        let mut graph = Graph::new();
        graph.add_node(
            "generic.blank".into(),
            "User\n\"Browser\"".into(),
            PathBuf::from("resources/generic/blank.png"),
            Scope::Root,
            Attrs::new(),
        );
        let dot = serialize(&graph, &DiagramConfig::default());
        assert!(dot.contains(r#"label="User\n\"Browser\"""#));
    }

    #[test]
    fn nested_clusters_nest_blocks() {
        let mut graph = Graph::new();
        let outer = graph.add_cluster("outer".into(), Scope::Root, Attrs::new());
        let inner = graph.add_cluster("inner".into(), Scope::Cluster(outer), Attrs::new());
        graph.add_node(
            "generic.blank".into(),
            "deep".into(),
            PathBuf::from("resources/generic/blank.png"),
            Scope::Cluster(inner),
            Attrs::new(),
        );
        let dot = serialize(&graph, &DiagramConfig::default());

        let outer_pos = dot.find("\"cluster_0\"").unwrap();
        let inner_pos = dot.find("\"cluster_1\"").unwrap();
        let node_pos = dot.find("\"n0\"").unwrap();
        assert!(outer_pos < inner_pos && inner_pos < node_pos);
    }
}
