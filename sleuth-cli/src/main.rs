use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "sleuth",
    about = "Build social-deduction transcripts and grade how well models spot the mafia"
)]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build transcripts from a dataset of game logs
    Build(commands::build::BuildArgs),
    /// Ask a model to rank the players of each transcript
    Rank(commands::rank::RankArgs),
    /// Score the rankings in a results file
    Grade(commands::grade::GradeArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::ConfigLoader::load()?;

    match cli.command {
        Commands::Build(args) => commands::build::run(args, &config),
        Commands::Rank(args) => commands::rank::run(args, &config).await,
        Commands::Grade(args) => commands::grade::run(args, &config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
