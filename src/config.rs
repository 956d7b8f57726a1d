use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::Attrs;

/// Rank direction handed to the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Direction {
    #[default]
    TopBottom,
    BottomTop,
    LeftRight,
    RightLeft,
}

impl Direction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TB" | "TD" => Some(Self::TopBottom),
            "BT" => Some(Self::BottomTop),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    pub fn rankdir(&self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    /// Write the serialized graph description itself, skipping the engine.
    Dot,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Dot => "dot",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiagramConfig {
    pub title: String,
    /// Output path without extension; the format's extension is appended.
    pub filename: PathBuf,
    pub format: OutputFormat,
    pub direction: Direction,
    /// Layout engine command, resolved through PATH.
    pub engine: String,
    /// Root directory holding the icon assets.
    pub resource_dir: PathBuf,
    pub graph_attr: Attrs,
    pub node_attr: Attrs,
    pub edge_attr: Attrs,
}

impl DiagramConfig {
    pub fn new(title: impl Into<String>, filename: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// Final artifact path: `filename` plus the format's extension.
    pub fn output_path(&self) -> PathBuf {
        self.filename.with_extension(self.format.extension())
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            filename: PathBuf::from("diagram"),
            format: OutputFormat::Png,
            direction: Direction::LeftRight,
            engine: "dot".to_string(),
            resource_dir: PathBuf::from("resources"),
            graph_attr: default_graph_attr(),
            node_attr: default_node_attr(),
            edge_attr: default_edge_attr(),
        }
    }
}

fn default_graph_attr() -> Attrs {
    attrs([
        ("fontcolor", "#2D3436"),
        ("fontname", "Sans-Serif"),
        ("fontsize", "15"),
        ("nodesep", "0.60"),
        ("pad", "2.0"),
        ("ranksep", "0.75"),
        ("splines", "ortho"),
    ])
}

fn default_node_attr() -> Attrs {
    attrs([
        ("fixedsize", "true"),
        ("fontcolor", "#2D3436"),
        ("fontname", "Sans-Serif"),
        ("fontsize", "13"),
        ("height", "1.9"),
        ("imagescale", "true"),
        ("labelloc", "b"),
        ("shape", "box"),
        ("style", "rounded"),
        ("width", "1.4"),
    ])
}

fn default_edge_attr() -> Attrs {
    attrs([("color", "#7B8894")])
}

/// Cluster background palette, cycled by nesting depth.
pub const CLUSTER_BGCOLORS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

pub fn default_cluster_attr(depth: usize) -> Attrs {
    attrs([
        ("bgcolor", CLUSTER_BGCOLORS[depth % CLUSTER_BGCOLORS.len()]),
        ("fontname", "Sans-Serif"),
        ("fontsize", "12"),
        ("labeljust", "l"),
        ("pencolor", "#AEB6BE"),
        ("shape", "box"),
        ("style", "rounded"),
    ])
}

fn attrs<const N: usize>(pairs: [(&str, &str); N]) -> Attrs {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    title: Option<String>,
    direction: Option<String>,
    engine: Option<String>,
    resource_dir: Option<PathBuf>,
    graph_attr: Option<BTreeMap<String, String>>,
    node_attr: Option<BTreeMap<String, String>>,
    edge_attr: Option<BTreeMap<String, String>>,
}

/// Merge a JSON override file over `base`. Attribute maps merge key by key
/// rather than replacing the whole bundle.
pub fn load_config(base: DiagramConfig, path: Option<&Path>) -> anyhow::Result<DiagramConfig> {
    let mut config = base;
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(title) = parsed.title {
        config.title = title;
    }
    if let Some(token) = parsed.direction.as_deref() {
        config.direction = Direction::from_token(token)
            .ok_or_else(|| anyhow::anyhow!("unknown direction token: {token}"))?;
    }
    if let Some(engine) = parsed.engine {
        config.engine = engine;
    }
    if let Some(dir) = parsed.resource_dir {
        config.resource_dir = dir;
    }
    if let Some(overrides) = parsed.graph_attr {
        config.graph_attr.extend(overrides);
    }
    if let Some(overrides) = parsed.node_attr {
        config.node_attr.extend(overrides);
    }
    if let Some(overrides) = parsed.edge_attr {
        config.edge_attr.extend(overrides);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tokens() {
        assert_eq!(Direction::from_token("TD"), Some(Direction::TopBottom));
        assert_eq!(Direction::from_token("LR"), Some(Direction::LeftRight));
        assert_eq!(Direction::from_token("sideways"), None);
    }

    #[test]
    fn output_path_appends_extension() {
        let mut config = DiagramConfig::new("t", "out/system_topology");
        config.format = OutputFormat::Svg;
        assert_eq!(
            config.output_path(),
            PathBuf::from("out/system_topology.svg")
        );
    }

    #[test]
    fn config_file_merges_attr_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"direction": "TB", "graphAttr": {"bgcolor": "white", "pad": "0.8"}}"#,
        )
        .unwrap();

        let config = load_config(DiagramConfig::default(), Some(&path)).unwrap();
        assert_eq!(config.direction, Direction::TopBottom);
        assert_eq!(config.graph_attr["bgcolor"], "white");
        assert_eq!(config.graph_attr["pad"], "0.8");
        // untouched defaults survive the merge
        assert_eq!(config.graph_attr["splines"], "ortho");
    }
}
