#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use harness_toolchain::core::HostPlatform;
use harness_toolchain::{clean_cmd, generate_cmd, paths_cmd, references_cmd};

#[derive(Parser, Debug)]
#[command(name = "harness-toolchain")]
#[command(about = "Generate and clean up standalone benchmark harness builds", long_about = None)]
struct Cli {
    /// Enable verbose logging (or set HARNESS_TOOLCHAIN_LOG)
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Clean old artifacts and write the app config and build script
    Generate {
        /// Path to the harness manifest (harness.toml)
        #[arg(long)]
        manifest: PathBuf,
        /// Host the script will run on (default: current host)
        #[arg(long, value_enum)]
        host: Option<HostPlatform>,
        /// Write machine-readable JSON report to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Delete artifacts left by a previous run
    Clean {
        /// Path to the harness manifest (harness.toml)
        #[arg(long)]
        manifest: PathBuf,
        /// Host the script runs on (selects the script extension)
        #[arg(long, value_enum)]
        host: Option<HostPlatform>,
    },

    /// Print the modules the harness is compiled against
    References {
        /// Path to the harness manifest (harness.toml)
        #[arg(long)]
        manifest: PathBuf,
    },

    /// Print the artifact paths for the target
    Paths {
        /// Path to the harness manifest (harness.toml)
        #[arg(long)]
        manifest: PathBuf,
        /// Host the script runs on (selects the script extension)
        #[arg(long, value_enum)]
        host: Option<HostPlatform>,
    },
}

fn init_tracing(verbose: bool) {
    let env = std::env::var("HARNESS_TOOLCHAIN_LOG").unwrap_or_else(|_| {
        if verbose {
            "harness_toolchain=debug".to_string()
        } else {
            "harness_toolchain=info".to_string()
        }
    });
    let _ = tracing_subscriber::fmt()
        .with_span_events(FmtSpan::ACTIVE)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_env_filter(EnvFilter::new(env))
        .try_init();
}

fn main() {
    color_eyre::install().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate { manifest, host, json } => generate_cmd::run(manifest, host, json),
        Commands::Clean { manifest, host } => clean_cmd::run(manifest, host),
        Commands::References { manifest } => references_cmd::run(manifest),
        Commands::Paths { manifest, host } => paths_cmd::run(manifest, host),
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
