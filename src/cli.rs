use crate::aggregate::aggregate;
use crate::config::{Categories, load_config};
use crate::model_dump::write_model_dump;
use crate::render::{render, write_output};
use crate::source::{Scope, fetch_policies};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "npv", version, about = "Network Policy Visualizer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render network policies as a PlantUML component diagram
    Visualize(VisualizeArgs),
}

#[derive(Args, Debug)]
pub struct VisualizeArgs {
    /// Namespace to read policies from (repeatable). All namespaces when omitted.
    #[arg(long = "namespace", conflicts_with = "files")]
    pub namespaces: Vec<String>,

    /// Manifest file or glob pattern to read policies from (repeatable)
    #[arg(long = "file")]
    pub files: Vec<String>,

    /// Output file. Defaults to stdout if omitted or '-'.
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Only draw ingress traffic
    #[arg(long = "ingress-only")]
    pub ingress_only: bool,

    /// Only draw egress traffic
    #[arg(long = "egress-only")]
    pub egress_only: bool,

    /// PlantUML line type (e.g. ortho, polyline)
    #[arg(long = "linetype")]
    pub linetype: Option<String>,

    /// Config JSON file (lineType, categories)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Write the aggregated model as JSON to this path
    #[arg(long = "dump-model")]
    pub dump_model: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    match cli.command {
        Command::Visualize(args) => visualize(args),
    }
}

// Logs go to stderr; stdout carries the diagram.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn visualize(args: VisualizeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.ingress_only || args.egress_only {
        config.render.categories = Categories::from_flags(args.ingress_only, args.egress_only);
    }
    if let Some(linetype) = args.linetype {
        config.render.line_type = Some(linetype);
    }

    let scope = Scope::from_args(args.namespaces, args.files);
    info!(?scope, "fetching network policies");
    let policies = fetch_policies(&scope)?;
    let model = aggregate(&policies);
    if let Some(path) = args.dump_model.as_deref() {
        write_model_dump(path, &model)?;
    }

    let uml = render(&model, &config.render);
    write_output(&uml, args.out.as_deref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<VisualizeArgs, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        match cli.command {
            Command::Visualize(args) => Ok(args),
        }
    }

    #[test]
    fn parses_repeated_files_and_flags() {
        let args = parse(&[
            "npv",
            "visualize",
            "--file",
            "a.yaml",
            "--file",
            "policies/*.yaml",
            "--ingress-only",
            "--linetype",
            "ortho",
            "--out",
            "out.puml",
        ])
        .unwrap();
        assert_eq!(args.files, vec!["a.yaml", "policies/*.yaml"]);
        assert!(args.namespaces.is_empty());
        assert!(args.ingress_only);
        assert!(!args.egress_only);
        assert_eq!(args.linetype.as_deref(), Some("ortho"));
        assert_eq!(args.out, Some(PathBuf::from("out.puml")));
    }

    #[test]
    fn namespaces_and_files_conflict() {
        assert!(parse(&["npv", "visualize", "--namespace", "default", "--file", "a.yaml"]).is_err());
    }

    #[test]
    fn no_source_means_all_namespaces() {
        let args = parse(&["npv", "visualize"]).unwrap();
        assert_eq!(Scope::from_args(args.namespaces, args.files), Scope::AllNamespaces);
    }

    #[test]
    fn renders_files_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("deny.yaml");
        std::fs::write(
            &input,
            "kind: NetworkPolicy\nmetadata:\n  name: deny\n  namespace: default\nspec:\n  policyTypes: [Ingress]\n",
        )
        .unwrap();
        let out = dir.path().join("out.puml");
        let dump = dir.path().join("model.json");
        let args = parse(&[
            "npv",
            "visualize",
            "--file",
            input.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--dump-model",
            dump.to_str().unwrap(),
        ])
        .unwrap();
        visualize(args).unwrap();

        let uml = std::fs::read_to_string(&out).unwrap();
        assert!(uml.starts_with("@startuml\n"));
        assert!(uml.contains("_ALL_PEER_INGRESS_ingressportout --down[#red]--> default_ALL__ALL_port\n"));
        assert!(uml.ends_with("@enduml\n"));
        assert!(dump.exists());
    }
}
