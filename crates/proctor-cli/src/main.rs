//! proctor CLI: run timed exams and review the results.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "proctor",
    version,
    about = "Timed exam runner with per-topic SWOT feedback"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an exam interactively
    Run {
        /// Path to the exam JSON file
        #[arg(long)]
        exam: PathBuf,

        /// Countdown hours (defaults to the configured timer)
        #[arg(long)]
        hours: Option<u64>,

        /// Countdown minutes (defaults to the configured timer)
        #[arg(long)]
        minutes: Option<u64>,

        /// Directory the result JSON is written to
        #[arg(long)]
        output: Option<PathBuf>,

        /// Seed for question and option shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate exam JSON files
    Validate {
        /// Path to an exam file or a directory of them
        #[arg(long)]
        exam: PathBuf,
    },

    /// Summarize a saved result
    Summary {
        /// Result JSON written by `proctor run`
        #[arg(long)]
        result: PathBuf,

        /// Output format: text, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Also list every question with the chosen and correct answers
        #[arg(long)]
        review: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example exam
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "proctor=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            exam,
            hours,
            minutes,
            output,
            seed,
            config,
        } => commands::run::execute(exam, hours, minutes, output, seed, config).await,
        Commands::Validate { exam } => commands::validate::execute(exam),
        Commands::Summary {
            result,
            format,
            review,
            config,
        } => commands::summary::execute(result, format, review, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
