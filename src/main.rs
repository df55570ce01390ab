// symphony - synthesis entry point
//
// Loads the environment configuration and tags, attaches the policy
// aspects, builds the stateful and stateless stacks (stateless consumes
// identifiers the stateful stack produced), then synthesizes one
// template file per stack.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod init;
mod stacks;
mod synth;

#[derive(Parser)]
#[command(name = "symphony", version, about = "Synthesizes Symphony deployment templates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize deployment templates for one environment
    Synth(SynthArgs),
}

#[derive(Args)]
pub struct SynthArgs {
    /// Deployment environment (dev, staging, prod)
    #[arg(long, short = 'e')]
    pub environment: String,

    /// Directory to write template files into
    #[arg(long, short = 'o', default_value = "out")]
    pub output: PathBuf,

    /// Overwrite existing template files without asking
    #[arg(long)]
    pub force: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Synth(args) => synth::run(args),
    }
}
