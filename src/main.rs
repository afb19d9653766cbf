use anyhow::Result;
use clap::{Parser, Subcommand};

use family_budget::cli::{
    handle_accounts_command, handle_config_command, handle_report_command, AccountsArgs, ReportArgs,
};
use family_budget::config::{BudgetPaths, Settings};
use family_budget::logging::init_tracing;

#[derive(Parser)]
#[command(
    name = "family-budget",
    version,
    about = "Monthly family budget from Moneybird bookkeeping",
    long_about = "family-budget reads a month of Moneybird transactions, groups family \
                  spending by category, works out the disposable family budget after VAT, \
                  income tax and business expenses, and posts a summary with a pie chart \
                  to a Telegram chat."
)]
struct Cli {
    /// Debug logging for family-budget
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, print and send the monthly report
    Report(ReportArgs),

    /// List the ledger account tree
    Accounts(AccountsArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    // Before parsing and logging setup, so `.env` can carry RUST_LOG
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env"),
    }

    let paths = BudgetPaths::new()?;
    let settings = Settings::resolve(&paths)?;

    match cli.command {
        Commands::Report(args) => handle_report_command(&settings, args)?,
        Commands::Accounts(args) => handle_accounts_command(&settings, args)?,
        Commands::Config => handle_config_command(&paths, &settings),
    }

    Ok(())
}
