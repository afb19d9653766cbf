//! Ledger account display formatting
//!
//! Formats the account table for terminal output in tree and table views.

use std::collections::HashSet;
use std::fmt::Write as _;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{AccountTable, LedgerAccount};
use crate::services::hierarchy::find_root;

/// Format the account hierarchy as a tree, roots first
///
/// An account whose parent is missing from the table is shown as a root.
/// Accounts only reachable through a parent cycle are listed separately.
pub fn format_account_tree(accounts: &AccountTable) -> String {
    if accounts.is_empty() {
        return "No ledger accounts found.".to_string();
    }

    let mut roots: Vec<&LedgerAccount> = accounts
        .iter()
        .filter(|a| a.parent().map_or(true, |p| accounts.get(p).is_none()))
        .collect();
    roots.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));

    let mut output = String::new();
    let mut visited: HashSet<&str> = HashSet::new();

    for root in roots {
        visited.insert(root.id.as_str());
        let _ = writeln!(output, "{} [{}]", root.name, root.kind);
        write_children(&mut output, accounts, root, "", &mut visited);
    }

    let mut cyclic: Vec<&LedgerAccount> = accounts
        .iter()
        .filter(|a| !visited.contains(a.id.as_str()))
        .collect();
    if !cyclic.is_empty() {
        cyclic.sort_by(|a, b| a.name.cmp(&b.name));
        let _ = writeln!(output, "\nIn a parent cycle:");
        for account in cyclic {
            let _ = writeln!(output, "  {} [{}]", account.name, account.kind);
        }
    }

    output
}

fn write_children<'a>(
    output: &mut String,
    accounts: &'a AccountTable,
    parent: &'a LedgerAccount,
    prefix: &str,
    visited: &mut HashSet<&'a str>,
) {
    let mut children: Vec<&LedgerAccount> = accounts
        .children_of(&parent.id)
        .filter(|c| !visited.contains(c.id.as_str()))
        .collect();
    children.sort_by(|a, b| a.name.cmp(&b.name));

    for (i, child) in children.iter().enumerate() {
        if !visited.insert(child.id.as_str()) {
            continue;
        }
        let is_last = i == children.len() - 1;
        let connector = if is_last { "└── " } else { "├── " };
        let _ = writeln!(output, "{}{}{} [{}]", prefix, connector, child.name, child.kind);

        let next_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
        write_children(output, accounts, child, &next_prefix, visited);
    }
}

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Root")]
    root: String,
}

/// Format the accounts as a flat table with their resolved root
pub fn format_account_table(accounts: &AccountTable) -> String {
    if accounts.is_empty() {
        return "No ledger accounts found.".to_string();
    }

    let mut rows: Vec<AccountRow> = accounts
        .iter()
        .map(|account| {
            let parent = account
                .parent()
                .map(|p| {
                    accounts
                        .get(p)
                        .map_or_else(|| format!("{} (missing)", p), |a| a.name.clone())
                })
                .unwrap_or_default();
            AccountRow {
                id: account.id.clone(),
                name: account.name.clone(),
                kind: account.kind.to_string(),
                parent,
                root: find_root(accounts, account).0.name.clone(),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));

    Table::new(rows).with(Style::sharp()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountKind;
    use crate::testing::sample_accounts;

    #[test]
    fn test_format_empty() {
        assert_eq!(format_account_tree(&AccountTable::default()), "No ledger accounts found.");
        assert_eq!(format_account_table(&AccountTable::default()), "No ledger accounts found.");
    }

    #[test]
    fn test_format_tree() {
        let output = format_account_tree(&AccountTable::new(sample_accounts()));

        assert!(output.contains("Omzet [revenue]"));
        assert!(output.contains("Wonen [equity]\n├── Energie [equity]\n└── Huur [equity]\n"));
        assert!(!output.contains("parent cycle"));
        // Revenue accounts come before family accounts
        assert!(output.find("Omzet").unwrap() < output.find("Wonen").unwrap());
    }

    #[test]
    fn test_format_tree_nested_and_orphaned() {
        let accounts = AccountTable::new(vec![
            LedgerAccount::new("a", "Auto", AccountKind::Equity),
            LedgerAccount::new("b", "Brandstof", AccountKind::Equity).with_parent("a"),
            LedgerAccount::new("c", "Diesel", AccountKind::Equity).with_parent("b"),
            LedgerAccount::new("o", "Wees", AccountKind::Equity).with_parent("gone"),
        ]);

        let output = format_account_tree(&accounts);

        let expected = "Auto [equity]\n└── Brandstof [equity]\n    └── Diesel [equity]\n";
        assert!(output.contains(expected));
        assert!(output.contains("Wees [equity]"));
    }

    #[test]
    fn test_format_tree_with_cycle() {
        let accounts = AccountTable::new(vec![
            LedgerAccount::new("a", "A", AccountKind::Equity).with_parent("b"),
            LedgerAccount::new("b", "B", AccountKind::Equity).with_parent("a"),
        ]);

        let output = format_account_tree(&accounts);

        assert!(output.contains("In a parent cycle:\n  A [equity]\n  B [equity]\n"));
    }

    #[test]
    fn test_format_table() {
        let output = format_account_table(&AccountTable::new(sample_accounts()));

        assert!(output.contains("ID"));
        assert!(output.contains("fam-huur"));
        assert!(output.contains("Wonen"));
        assert!(output.lines().count() > sample_accounts().len());
    }
}
