//! upmanifest CLI - write the update descriptor of a built project.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use upmanifest::{BuildConfig, Overrides};

#[derive(Parser)]
#[command(name = "upmanifest")]
#[command(
    author,
    version,
    about = "Generate the update descriptor of a project's distributable files"
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the descriptor and write it to the output directory
    Build {
        /// Build configuration file (YAML)
        #[arg(long, short, default_value = "upmanifest.yaml")]
        config: PathBuf,

        /// Base URI files are downloaded from
        #[arg(long)]
        base_uri: Option<String>,

        /// Base path files are installed to
        #[arg(long)]
        base_path: Option<String>,

        /// Name of the descriptor file
        #[arg(long)]
        config_name: Option<String>,

        /// Directory the descriptor is written to
        #[arg(long, short)]
        output_dir: Option<PathBuf>,

        /// Launcher class recorded in the descriptor
        #[arg(long)]
        launcher: Option<String>,
    },

    /// Validate a build configuration without writing anything
    Validate {
        /// Build configuration file (YAML)
        #[arg(long, short, default_value = "upmanifest.yaml")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Build {
            config,
            base_uri,
            base_path,
            config_name,
            output_dir,
            launcher,
        } => {
            let overrides = Overrides {
                base_uri,
                base_path,
                config_name,
                output_dir,
                launcher,
            };
            let written = upmanifest::run(&config, overrides)?;
            println!("{}", written.display());
        }

        Commands::Validate { config } => {
            info!("Validating {:?}", config);

            let build_config = BuildConfig::load(&config)
                .with_context(|| format!("Failed to load {}", config.display()))?;
            let result = build_config.validate();

            for warning in &result.warnings {
                warn!("{}", warning);
            }
            for err in &result.errors {
                error!("{}", err);
            }

            if !result.valid {
                bail!("Configuration has {} error(s)", result.errors.len());
            }
            info!("Configuration is valid");
        }
    }

    Ok(())
}
