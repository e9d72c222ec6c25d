//! invigil CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "invigil", version, about = "Timed proctored assessment engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an assessment session and grade it
    Run {
        /// Path to a .toml assessment file
        #[arg(long)]
        assessment: PathBuf,

        /// Path to a .toml answers file (unset indices stay blank)
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Focus-loss violations to inject before submitting
        #[arg(long, default_value = "0")]
        violations: u32,

        /// Skip the remote grading service and grade locally
        #[arg(long)]
        simulated: bool,

        /// Seed for reproducible simulated grades
        #[arg(long)]
        seed: Option<u64>,

        /// Output directory for the session report
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate assessment TOML files
    Validate {
        /// Path to an assessment file or directory
        #[arg(long)]
        assessment: PathBuf,
    },

    /// Generate questions for a topic via the remote collaborator
    Questions {
        /// Topic to generate questions for
        #[arg(long)]
        topic: String,

        /// Regeneration counter (how many fresh sets were requested before)
        #[arg(long, default_value = "0")]
        regenerate: u32,

        /// Write an assessment skeleton TOML instead of printing
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example assessment
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("invigil=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            assessment,
            answers,
            violations,
            simulated,
            seed,
            output,
            config,
        } => commands::run::execute(assessment, answers, violations, simulated, seed, output, config)
            .await,
        Commands::Validate { assessment } => commands::validate::execute(assessment),
        Commands::Questions {
            topic,
            regenerate,
            output,
            config,
        } => commands::questions::execute(topic, regenerate, output, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
