//! flora CLI: query the plant knowledge graph from the command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use flora_graph::config::EngineConfig;
use flora_graph::engine::Engine;

#[derive(Parser)]
#[command(name = "flora", version, about = "Plant taxonomy knowledge-graph queries")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Turtle fact file (overrides the config).
    #[arg(long, global = true)]
    facts: Option<PathBuf>,

    /// CSV name corpus (overrides the config).
    #[arg(long, global = true)]
    names: Option<PathBuf>,

    /// JSON taxonomy table (overrides the config).
    #[arg(long, global = true)]
    taxonomy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Neighborhood graph of the plant whose name matches a keyword.
    Query {
        /// Plant name, matched case-insensitively against subject labels.
        keyword: String,
    },

    /// Forward and reverse relationships of an exact identifier.
    Details {
        /// Full identifier as stored (e.g. an IRI).
        entity: String,
    },

    /// Structured attribute record of a plant.
    Info {
        /// Plant label.
        label: String,
    },

    /// Suggest plant names for a prefix or substring.
    Complete {
        prefix: String,
    },

    /// Print the taxonomy tree.
    Taxonomy,

    /// Show counts of the loaded data.
    Stats,

    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::load_or_default(cli.config.as_deref())?;
    if let Some(facts) = cli.facts {
        config.facts_path = facts;
    }
    if let Some(names) = cli.names {
        config.names_path = names;
    }
    if let Some(taxonomy) = cli.taxonomy {
        config.taxonomy_path = Some(taxonomy);
    }

    let output = match cli.command {
        Commands::Config => config.to_toml()?,
        command => {
            let engine = Engine::new(&config)?;
            run(&engine, command)?
        }
    };

    println!("{output}");
    Ok(())
}

fn run(engine: &Engine, command: Commands) -> Result<String> {
    let json = match command {
        Commands::Query { keyword } => serde_json::to_string_pretty(&engine.neighborhood(&keyword)),
        Commands::Details { entity } => serde_json::to_string_pretty(&engine.detail(&entity)),
        Commands::Info { label } => serde_json::to_string_pretty(
            &serde_json::json!({ "info": engine.structured_info(&label) }),
        ),
        Commands::Complete { prefix } => {
            serde_json::to_string_pretty(&engine.autocomplete(&prefix))
        }
        Commands::Taxonomy => serde_json::to_string_pretty(engine.taxonomy().tree()),
        Commands::Stats | Commands::Config => return Ok(engine.info().to_string()),
    };
    json.into_diagnostic()
}
