//! Lorebook CLI
//!
//! Renders rich-content documents and reclaims attachments an edit dropped.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "lorebook", version, about = "Story-bible document tools")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a document file
    Render {
        /// Serialized document
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },

    /// List image URLs a document references
    Attachments {
        /// Serialized document
        file: PathBuf,
    },

    /// Delete owned images referenced by OLD but not by NEW
    Reclaim {
        /// Document before the edit
        old: PathBuf,

        /// Document after the edit (already saved)
        new: PathBuf,

        /// Print the plan without deleting anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Sanitized HTML fragment
    Html,
    /// Presentation tree as JSON
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so rendered output stays clean on stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Render { file, format } => commands::render(&file, format),
        Command::Attachments { file } => commands::attachments(&file),
        Command::Reclaim { old, new, dry_run } => {
            let config = commands::load_config(cli.config.as_deref())?;
            commands::reclaim(&config, &old, &new, dry_run).await
        }
    }
}
