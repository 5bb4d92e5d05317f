use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser)]
#[command(name = "scopegate")]
#[command(about = "Run only the pre-commit checks your staged files need")]
#[command(version)]
struct Cli {
    /// Path to the repository (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Path to the config file (defaults to .scopegate/config.toml in repo root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the checks for every scope touched by the staged files
    Run {
        /// Use these paths instead of the staged files
        #[arg(long, num_args = 1..)]
        files: Option<Vec<String>>,
    },

    /// Show which scopes the staged files trigger, without running anything
    Classify {
        /// Use these paths instead of the staged files
        #[arg(long, num_args = 1..)]
        files: Option<Vec<String>>,

        /// Print JSON instead of one scope per line
        #[arg(long)]
        json: bool,
    },

    /// Initialize a new .scopegate/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Install the git pre-commit hook
    Install {
        /// Replace an existing hook not installed by scopegate
        #[arg(long)]
        force: bool,
    },
}

/// Exit status for configuration and classification errors
const CONFIG_ERROR_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Determine the working directory
    let work_dir = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Some(Commands::Run { files }) => cli::run::run_command(&work_dir, config_path, files).await,
        Some(Commands::Classify { files, json }) => {
            cli::classify::classify_command(&work_dir, config_path, files, json).map(|_| 0)
        }
        Some(Commands::Init { force }) => cli::init::init_command(&work_dir, force).map(|_| 0),
        Some(Commands::Install { force }) => {
            cli::install::install_command(&work_dir, config_path, force).map(|_| 0)
        }
        // Default: behave like the hook
        None => cli::run::run_command(&work_dir, config_path, None).await,
    };

    match result {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(CONFIG_ERROR_EXIT)
        }
    }
}
