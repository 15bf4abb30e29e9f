//! gtmgraph CLI tool
//!
//! Command-line interface for inspecting the dependency graph of a GTM container export.
//!
//! ## Commands
//!
//! - `summary <file>`: Entity counts and diagnostics
//! - `list <kind> <file>`: Sorted outline of one entity kind with its related entities
//! - `show <key> <file>`: One entity and its edges
//! - `unused <file>`: Triggers and variables nothing references
//! - `export <file>`: JSON snapshot, or Graphviz DOT with `--dot`

use clap::{Parser, Subcommand};
use gtm_graph::{
    container::{ContainerGraph, EntityContext},
    nodekey::EntityKey,
    properties::EntityKind,
    query::EntityPred,
    ContainerEntity, GraphBuilder, GraphConfig, GtmGraphError,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gtmgraph")]
#[command(author, version, about = "Inspect the tag, trigger and variable graph of a GTM container export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print entity counts and build diagnostics
    Summary {
        /// Path to the container export JSON
        path: PathBuf,

        /// Print every diagnostic, not just the count
        #[arg(short, long)]
        verbose: bool,
    },

    /// List every entity of one kind, sorted by name, with its related entities
    List {
        /// Entity kind: tags, triggers or variables
        kind: String,

        /// Path to the container export JSON
        path: PathBuf,
    },

    /// Show one entity, addressed as `kind:id:<id>`, `kind:name:<name>` or `kind:<name>`
    Show {
        key: String,

        /// Path to the container export JSON
        path: PathBuf,
    },

    /// List triggers and variables that nothing references
    Unused {
        /// Path to the container export JSON
        path: PathBuf,
    },

    /// Write the graph to stdout
    Export {
        /// Path to the container export JSON
        path: PathBuf,

        /// Emit Graphviz DOT instead of the JSON snapshot
        #[arg(long)]
        dot: bool,
    },
}

fn load_graph(path: &Path, config: Option<&Path>) -> Result<ContainerGraph, GtmGraphError> {
    let config = match config {
        Some(config_path) => GraphConfig::load(config_path)?,
        None => GraphConfig::default(),
    };
    GraphBuilder::new(config).build_file(path)
}

fn print_entity(ctx: &EntityContext<'_>, indent: usize) {
    let pad = " ".repeat(indent);
    match ctx.node() {
        Some(node) => println!("{pad}{} [{}]", node.name(), node.object_id()),
        None => println!("{pad}{}", ctx.entity_ref()),
    }
    for (relation, related) in ctx.children() {
        println!("{pad}  {}", relation);
        for child in related {
            println!(
                "{pad}    - {} [{}]",
                child.name(),
                child.object_id().map(|id| id.as_str()).unwrap_or_default()
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Summary { path, verbose } => {
            let graph = load_graph(&path, config)?;
            println!("=== {} ===", path.display());
            println!("Container section: {}", graph.has_container());
            println!("Tags: {}", graph.num_tags());
            println!("Triggers: {}", graph.num_triggers());
            println!("Variables: {}", graph.num_variables());
            println!("Diagnostics: {}", graph.diagnostics().len());
            if verbose {
                for diagnostic in graph.diagnostics() {
                    println!("  {}", diagnostic);
                }
            }
        }

        Commands::List { kind, path } => {
            let kind: EntityKind = kind.parse()?;
            let graph = load_graph(&path, config)?;
            let selected = graph.select(&EntityPred::kind(kind));
            println!("{} ({})", kind.plural(), selected.len());
            for entity in selected {
                if let Some(ctx) = graph.context(entity) {
                    print_entity(&ctx, 2);
                }
            }
        }

        Commands::Show { key, path } => {
            let key: EntityKey = key.parse()?;
            let graph = load_graph(&path, config)?;
            let entity = graph
                .find(&key)
                .ok_or_else(|| GtmGraphError::NotFound(format!("No entity matches {key}")))?;
            if let Some(ctx) = graph.context(entity) {
                println!("{}", entity.kind());
                print_entity(&ctx, 0);
            }
        }

        Commands::Unused { path } => {
            let graph = load_graph(&path, config)?;
            for entity in graph.select(&EntityPred::unused()) {
                if let Some(node) = graph.entity(entity) {
                    println!("{}\t{}\t{}", node.kind(), node.object_id(), node.name());
                }
            }
        }

        Commands::Export { path, dot } => {
            let graph = load_graph(&path, config)?;
            if dot {
                println!("{}", graph.to_dot()?);
            } else {
                println!("{}", serde_json::to_string_pretty(&graph.snapshot())?);
            }
        }
    }

    Ok(())
}
