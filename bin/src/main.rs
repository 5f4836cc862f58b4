//! mstock CLI - Metastock archive decoder.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use mstock_lib::{MstockError, Periodicity};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod display;
mod logging;

use display::Format;

#[derive(Parser)]
#[command(name = "mstock")]
#[command(about = "Decode Metastock archives into CSV, JSON or Parquet", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the symbols of an archive
    List {
        /// Archive directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Only list symbols of this periodicity (daily, weekly, intraday, ...)
        #[arg(short, long)]
        periodicity: Option<Periodicity>,
    },

    /// Show details of one symbol
    Info {
        /// Ticker as listed by `mstock list`
        ticker: String,

        /// Archive directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Decode symbols and write their rows
    Extract {
        /// Tickers to extract (all symbols if omitted)
        tickers: Vec<String>,

        /// Archive directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Decimal places to round values to
        #[arg(short, long, default_value = "4")]
        precision: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file path. Defaults to stdout (required for parquet)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Decode data files in parallel
        #[arg(long)]
        parallel: bool,
    },
}

/// Exit status for a failed run: 2 when the archive itself could not be read,
/// 1 for everything else.
fn exit_status(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<MstockError>() {
        Some(error) if error.is_fatal() => 2,
        _ => 1,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error:?}");
            ExitCode::from(exit_status(&error))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::List { dir, periodicity } => commands::list::list_symbols(&dir, periodicity),
        Commands::Info { ticker, dir } => commands::info::show_info(&ticker, &dir),
        Commands::Extract {
            tickers,
            dir,
            precision,
            format,
            output,
            parallel,
        } => commands::extract::extract(
            &dir,
            tickers,
            precision,
            format,
            output.as_deref(),
            parallel,
            cli.quiet,
        ),
    }
}
