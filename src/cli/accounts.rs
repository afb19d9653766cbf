//! CLI command listing the ledger accounts

use clap::Args;

use crate::api::{BookkeepingApi, MoneybirdClient};
use crate::config::settings::api_token;
use crate::config::Settings;
use crate::display::{format_account_table, format_account_tree};
use crate::error::BudgetResult;
use crate::models::AccountTable;

/// Arguments of `family-budget accounts`
#[derive(Args, Debug, Clone, Default)]
pub struct AccountsArgs {
    /// Flat table with resolved root instead of a tree
    #[arg(long)]
    pub flat: bool,
}

/// Render the accounts of `api`
pub fn list_accounts(api: &dyn BookkeepingApi, args: &AccountsArgs) -> BudgetResult<String> {
    let accounts = AccountTable::new(api.ledger_accounts()?);
    Ok(if args.flat {
        format_account_table(&accounts)
    } else {
        format_account_tree(&accounts)
    })
}

/// Handle `family-budget accounts`
pub fn handle_accounts_command(settings: &Settings, args: AccountsArgs) -> BudgetResult<()> {
    let client = MoneybirdClient::from_settings(settings, api_token()?)?;
    println!("{}", list_accounts(&client, &args)?);
    Ok(())
}
