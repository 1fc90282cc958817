use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::cmd::{self, fill::FillArgs, save::SaveArgs, validate::ValidateArgs};
use crate::config::FormflowConfig;
use crate::logging;

#[derive(Parser, Debug)]
#[command(
    name = "formflow",
    about = "Author, check and fill multi-page conditional questionnaires",
    version,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Configuration file (defaults to config.toml in the platform config dir)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a form document and print the report
    Validate(ValidateArgs),
    /// Print the JSON schema of the form document format
    Schema,
    /// Fill out a form from an answers file
    Fill(FillArgs),
    /// Validate a form document and persist it to the store
    Save(SaveArgs),
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FormflowConfig::load(cli.config.as_deref())?;
    logging::init(config.log_filter());

    match cli.command {
        Commands::Validate(args) => cmd::validate::run(&args),
        Commands::Schema => cmd::schema::run(),
        Commands::Fill(args) => block_on(cmd::fill::run(args, &config)),
        Commands::Save(args) => block_on(cmd::save::run(args, &config)),
    }
}

fn block_on<F>(future: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?
        .block_on(future)
}
