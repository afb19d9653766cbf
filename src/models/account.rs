//! Ledger account model
//!
//! Ledger accounts form a tree of financial categories. The tree is loaded
//! once per run and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Kind of ledger account, as far as the budget is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Business revenue
    Revenue,
    /// Business expenses
    #[serde(rename = "expenses", alias = "expense")]
    Expense,
    /// Private withdrawals, used as the family spending categories
    Equity,
    /// Anything else (assets, liabilities, direct costs, ...)
    Other,
}

impl AccountKind {
    /// Map an upstream `account_type` value onto a kind
    pub fn from_account_type(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Self::Revenue,
            "expenses" | "expense" => Self::Expense,
            "equity" | "family" => Self::Equity,
            _ => Self::Other,
        }
    }
}

impl Default for AccountKind {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Revenue => write!(f, "revenue"),
            Self::Expense => write!(f, "expenses"),
            Self::Equity => write!(f, "equity"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A ledger account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Upstream identifier
    pub id: String,

    /// Display name (e.g., "Boodschappen")
    pub name: String,

    /// Category kind
    pub kind: AccountKind,

    /// Parent account identifier, `None` for roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl LedgerAccount {
    /// Create a root account
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            parent_id: None,
        }
    }

    /// Builder-style parent assignment
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Parent identifier, treating an empty string as "no parent"
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }
}

impl fmt::Display for LedgerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Lookup table of all ledger accounts, keyed by identifier
///
/// Keeps the upstream order so listings are stable.
#[derive(Debug, Clone, Default)]
pub struct AccountTable {
    accounts: Vec<LedgerAccount>,
    index: HashMap<String, usize>,
}

impl AccountTable {
    /// Build the table. A later account with a duplicate id replaces the earlier one.
    pub fn new(accounts: Vec<LedgerAccount>) -> Self {
        let mut table = Self::default();
        for account in accounts {
            match table.index.get(&account.id) {
                Some(&pos) => table.accounts[pos] = account,
                None => {
                    table.index.insert(account.id.clone(), table.accounts.len());
                    table.accounts.push(account);
                }
            }
        }
        table
    }

    pub fn get(&self, id: &str) -> Option<&LedgerAccount> {
        self.index.get(id).map(|&pos| &self.accounts[pos])
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate in upstream order
    pub fn iter(&self) -> impl Iterator<Item = &LedgerAccount> {
        self.accounts.iter()
    }

    /// Find the first account with the given name and kind
    pub fn find_by_name_and_kind(&self, name: &str, kind: AccountKind) -> Option<&LedgerAccount> {
        self.accounts
            .iter()
            .find(|a| a.kind == kind && a.name == name)
    }

    /// Direct children of an account, in upstream order
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a LedgerAccount> + 'a {
        self.accounts.iter().filter(move |a| a.parent() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_account_type() {
        assert_eq!(AccountKind::from_account_type("revenue"), AccountKind::Revenue);
        assert_eq!(AccountKind::from_account_type("expenses"), AccountKind::Expense);
        assert_eq!(AccountKind::from_account_type("equity"), AccountKind::Equity);
        assert_eq!(AccountKind::from_account_type("current_assets"), AccountKind::Other);
        assert_eq!(AccountKind::from_account_type(""), AccountKind::Other);
    }

    #[test]
    fn test_empty_parent_is_root() {
        let mut account = LedgerAccount::new("1", "Wonen", AccountKind::Equity);
        assert_eq!(account.parent(), None);
        account.parent_id = Some(String::new());
        assert_eq!(account.parent(), None);
        let child = LedgerAccount::new("2", "Huur", AccountKind::Equity).with_parent("1");
        assert_eq!(child.parent(), Some("1"));
    }

    #[test]
    fn test_table_lookup() {
        let table = AccountTable::new(vec![
            LedgerAccount::new("1", "Omzet", AccountKind::Revenue),
            LedgerAccount::new("2", "Omzet", AccountKind::Equity),
            LedgerAccount::new("3", "Kinderen", AccountKind::Equity).with_parent("2"),
        ]);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get("3").unwrap().name, "Kinderen");
        assert!(table.get("9").is_none());

        let revenue = table
            .find_by_name_and_kind("Omzet", AccountKind::Revenue)
            .unwrap();
        assert_eq!(revenue.id, "1");
        assert!(table.find_by_name_and_kind("Omzet", AccountKind::Expense).is_none());

        let children: Vec<_> = table.children_of("2").map(|a| a.id.as_str()).collect();
        assert_eq!(children, vec!["3"]);
    }

    #[test]
    fn test_table_duplicate_id_replaces() {
        let table = AccountTable::new(vec![
            LedgerAccount::new("1", "Old", AccountKind::Equity),
            LedgerAccount::new("1", "New", AccountKind::Equity),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("1").unwrap().name, "New");
    }
}
