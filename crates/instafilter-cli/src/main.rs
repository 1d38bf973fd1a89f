use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;
mod config;

#[derive(Parser)]
#[command(name = "instafilter")]
#[command(about = "Apply a photo filter from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter one image and save the result
    Apply(cli::ApplyOptions),

    /// List filters, the sliders they accept, and native ranges
    Filters {
        /// Mapping config (default: ~/.config/instafilter/mapping.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG to control verbosity, e.g. RUST_LOG=instafilter_core=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply(options) => cli::apply(&options),
        Commands::Filters { config } => cli::list_filters(config.as_deref()),
    }
}
