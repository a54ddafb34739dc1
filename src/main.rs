//! directive-synth
//!
//! Renders proxy directive fragments from a routing model snapshot.
//!
//! # Usage
//!
//! ```text
//! directive-synth render model.toml
//! directive-synth render model.json --format json --server foo.bar
//! directive-synth render model.toml --watch
//! ```
//!
//! With `--watch` the snapshot is reloaded on every file change. The
//! current snapshot lives in an `ArcSwap` and is replaced wholesale; a
//! snapshot that fails to load or validate leaves the previous one in
//! place. Deny variables stay stable across reloads because the same
//! synthesizer (and its slug cache) renders every snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use clap::{Parser, Subcommand, ValueEnum};

use directive_synth::config::loader::load_model;
use directive_synth::config::watcher::ModelWatcher;
use directive_synth::observability::logging::{self, LogFormat};
use directive_synth::{RoutingModel, Synthesizer};

#[derive(Parser)]
#[command(name = "directive-synth", version)]
#[command(about = "Render proxy directives from a routing model", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Log output format (pretty or json)
    #[arg(long, default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the fragments of a model file
    Render {
        /// Routing model snapshot (.toml or .json)
        model: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Re-render whenever the model file changes
        #[arg(long)]
        watch: bool,

        /// Only print the server with this hostname
        #[arg(long)]
        server: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format);

    match cli.command {
        Command::Render {
            model,
            format,
            watch,
            server,
        } => render(&model, format, watch, server.as_deref()).await,
    }
}

async fn render(
    path: &Path,
    format: OutputFormat,
    watch: bool,
    server: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let synth = Synthesizer::new();
    let current = ArcSwap::from_pointee(load_model(path)?);

    print_rendered(&synth, &current.load(), format, server)?;

    if !watch {
        return Ok(());
    }

    let (watcher, mut updates) = ModelWatcher::new(path);
    // Dropping the handle stops the watch.
    let _handle = watcher.run()?;

    loop {
        tokio::select! {
            Some(model) = updates.recv() => {
                current.store(Arc::new(model));
                print_rendered(&synth, &current.load(), format, server)?;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping watch");
                break;
            }
        }
    }

    Ok(())
}

fn print_rendered(
    synth: &Synthesizer,
    model: &RoutingModel,
    format: OutputFormat,
    server: Option<&str>,
) -> Result<(), serde_json::Error> {
    let mut rendered = synth.render(model);

    if let Some(host) = server {
        rendered.servers.retain(|s| s.hostname == host);
        if rendered.servers.is_empty() {
            tracing::warn!(hostname = host, "no server with this hostname in the model");
        }
    }

    match format {
        OutputFormat::Text => print!("{rendered}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rendered)?),
    }

    tracing::info!(
        servers = rendered.servers.len(),
        slugs = synth.slug_cache().len(),
        "render complete"
    );
    Ok(())
}
