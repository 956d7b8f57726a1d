use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{load_config, DiagramConfig, Direction, OutputFormat};
use crate::diagram::{Diagram, EdgeInfo};
use crate::icons;

#[derive(Parser, Debug)]
#[command(name = "archdot", version, about = "Render the built-in sample architecture diagram")]
pub struct Args {
    /// Diagram title
    #[arg(short = 't', long = "title", default_value = "System Topology")]
    pub title: String,

    /// Output path without extension
    #[arg(short = 'o', long = "output", default_value = "system_topology")]
    pub output: PathBuf,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "png")]
    pub output_format: OutputFormat,

    /// Layout direction
    #[arg(short = 'd', long = "direction", value_enum, default_value = "left-right")]
    pub direction: Direction,

    /// Config JSON file (title, direction, attribute overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout engine command
    #[arg(long = "engine", default_value = "dot")]
    pub engine: String,

    /// Icon asset root
    #[arg(long = "resourceDir", default_value = "resources")]
    pub resource_dir: PathBuf,

    /// List the registered node kinds and exit
    #[arg(long = "listKinds")]
    pub list_kinds: bool,
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default()).init();
    let args = Args::parse();

    if args.list_kinds {
        for kind in icons::known_kinds() {
            println!("{kind}");
        }
        return Ok(());
    }

    let mut config = DiagramConfig::new(args.title, args.output);
    config.format = args.output_format;
    config.direction = args.direction;
    config.engine = args.engine;
    config.resource_dir = args.resource_dir;
    let config = load_config(config, args.config.as_deref())?;

    let diagram = sample_topology(config)?;
    let path = diagram.render()?;
    println!("{}", path.display());
    Ok(())
}

/// Three-tier web service with an external model API; exercises clusters,
/// icon kinds, labeled edges and one emphasized edge.
fn sample_topology(config: DiagramConfig) -> Result<Diagram> {
    let mut d = Diagram::begin(config)?;

    d.cluster("UI Tier")?;
    let browser = d.node("onprem.client.users", "User\nBrowser")?;
    let frontend = d.node("programming.framework.react", "Frontend\nPages")?;
    d.end_cluster()?;

    d.cluster("Logic Tier")?;
    let gateway = d.node("onprem.network.nginx", "API Gateway")?;
    let auth = d.node("saas.identity.auth0", "Auth\nJWT sessions")?;
    d.end_cluster()?;

    d.cluster("Data Tier")?;
    let db = d.node("onprem.database.postgresql", "PostgreSQL")?;
    let blob = d.node("aws.storage.s3", "Blob Store")?;
    d.end_cluster()?;

    d.cluster("External AI Service")?;
    let model = d.node("gcp.ml.vertexai", "Model API")?;
    d.end_cluster()?;

    d.edge_with(browser, frontend, EdgeInfo::new().label("HTTP"))?;
    d.edge_with(frontend, gateway, EdgeInfo::new().label("POST upload"))?;
    d.edge_with(gateway, auth, EdgeInfo::new().label("verify session"))?;
    d.edge_with(gateway, blob, EdgeInfo::new().label("store file"))?;
    d.edge_with(
        gateway,
        model,
        EdgeInfo::new()
            .label("analyze")
            .style("bold")
            .color("#4f46e5"),
    )?;
    d.edge_with(gateway, db, EdgeInfo::new().label("write results"))?;
    d.edge_with(frontend, db, EdgeInfo::new().label("poll").style("dashed"))?;

    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_topology_serializes() {
        let mut config = DiagramConfig::new("sample", "out/sample");
        config.format = OutputFormat::Dot;
        let diagram = sample_topology(config).unwrap();
        let dot = diagram.to_dot();
        assert!(dot.contains("subgraph \"cluster_3\""));
        assert!(dot.contains("label=\"analyze\""));
    }
}
