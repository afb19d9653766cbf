//! Hierarchy aggregation
//!
//! Rolls family (equity) totals up the account tree to their root
//! categories. Roots are keyed by display name, so two roots sharing a name
//! are merged into one figure.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::categorize::CategoryTotals;
use crate::models::{AccountKind, AccountTable, LedgerAccount, Money};

/// How a root walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootWalk {
    /// Reached an account without a parent
    Complete,
    /// The next parent id is not in the table
    UnresolvedParent,
    /// The next parent was already visited
    Cycle,
}

/// Find the topmost ancestor of `account`
///
/// The walk is iterative and keeps a visited set, so it terminates on any
/// table. On an unresolvable parent the last resolved account is the root;
/// on a cycle, the last account visited before re-entry is.
pub fn find_root<'a>(
    accounts: &'a AccountTable,
    account: &'a LedgerAccount,
) -> (&'a LedgerAccount, RootWalk) {
    let mut current = account;
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(current.id.as_str());

    loop {
        let Some(parent_id) = current.parent() else {
            return (current, RootWalk::Complete);
        };
        let Some(parent) = accounts.get(parent_id) else {
            return (current, RootWalk::UnresolvedParent);
        };
        if !visited.insert(parent.id.as_str()) {
            return (current, RootWalk::Cycle);
        }
        current = parent;
    }
}

/// One root category and its rolled-up amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootTotal {
    pub name: String,
    pub amount: Money,
}

/// Root name → rolled-up amount, ordered largest magnitude first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RootTotals {
    entries: Vec<RootTotal>,
}

impl RootTotals {
    /// Entries ordered by descending absolute amount, ties by name
    pub fn ordered(&self) -> &[RootTotal] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<Money> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.amount)
    }

    /// Sum over all roots
    pub fn total(&self) -> Money {
        self.entries.iter().map(|e| e.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rolls category totals up to root categories
pub struct HierarchyAggregator<'a> {
    accounts: &'a AccountTable,
}

impl<'a> HierarchyAggregator<'a> {
    pub fn new(accounts: &'a AccountTable) -> Self {
        Self { accounts }
    }

    /// Root totals of the equity accounts present in `totals`
    ///
    /// A root with its own direct total gets that total plus all of its
    /// descendants' totals. Accounts missing from the table are ignored.
    pub fn aggregate(&self, totals: &CategoryTotals) -> RootTotals {
        let mut by_name: HashMap<String, Money> = HashMap::new();

        for (account_id, amount) in totals.iter() {
            let Some(account) = self.accounts.get(account_id) else {
                continue;
            };
            if account.kind != AccountKind::Equity {
                continue;
            }

            let (root, walk) = find_root(self.accounts, account);
            match walk {
                RootWalk::Complete => {}
                RootWalk::UnresolvedParent => tracing::warn!(
                    account = %account.name,
                    root = %root.name,
                    "Parent account not found, rolling up to last known ancestor"
                ),
                RootWalk::Cycle => tracing::warn!(
                    account = %account.name,
                    root = %root.name,
                    "Cycle in account hierarchy, stopping walk"
                ),
            }

            *by_name.entry(root.name.clone()).or_default() += amount;
        }

        let mut entries: Vec<RootTotal> = by_name
            .into_iter()
            .map(|(name, amount)| RootTotal { name, amount })
            .collect();
        entries.sort_by(|a, b| {
            b.amount
                .abs()
                .cmp(&a.amount.abs())
                .then_with(|| a.name.cmp(&b.name))
        });

        RootTotals { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{capture_logs, sample_accounts};

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    fn equity(id: &str, name: &str) -> LedgerAccount {
        LedgerAccount::new(id, name, AccountKind::Equity)
    }

    #[test]
    fn test_root_and_children_roll_up() {
        let accounts = AccountTable::new(vec![
            equity("root", "Root"),
            equity("c1", "Child1").with_parent("root"),
            equity("c2", "Child2").with_parent("root"),
        ]);
        let mut totals = CategoryTotals::new();
        totals.add("root", cents(-10000));
        totals.add("c1", cents(-112774));
        totals.add("c2", cents(-33504));

        let roots = HierarchyAggregator::new(&accounts).aggregate(&totals);

        assert_eq!(roots.len(), 1);
        assert_eq!(roots.get("Root"), Some(cents(-156278)));
    }

    #[test]
    fn test_deep_chain() {
        let accounts = AccountTable::new(vec![
            equity("a", "A"),
            equity("b", "B").with_parent("a"),
            equity("c", "C").with_parent("b"),
            equity("d", "D").with_parent("c"),
        ]);
        let mut totals = CategoryTotals::new();
        totals.add("d", cents(-500));

        let roots = HierarchyAggregator::new(&accounts).aggregate(&totals);
        assert_eq!(roots.ordered(), &[RootTotal { name: "A".into(), amount: cents(-500) }]);
    }

    #[test]
    fn test_only_equity_accounts() {
        let accounts = AccountTable::new(sample_accounts());
        let mut totals = CategoryTotals::new();
        totals.add("rev", cents(100000));
        totals.add("exp-sw", cents(-2000));
        totals.add("bank", cents(2500));
        totals.add("fam-huur", cents(-95000));
        totals.add("fam-energie", cents(-12000));
        totals.add("fam-bood", cents(-45000));
        totals.add("not-in-table", cents(-1));

        let roots = HierarchyAggregator::new(&accounts).aggregate(&totals);

        assert_eq!(roots.len(), 2);
        assert_eq!(roots.get("Wonen"), Some(cents(-107000)));
        assert_eq!(roots.get("Boodschappen"), Some(cents(-45000)));
        assert_eq!(roots.total(), cents(-152000));
    }

    #[test]
    fn test_ordered_by_magnitude() {
        let accounts = AccountTable::new(vec![
            equity("a", "Small"),
            equity("b", "Large"),
            equity("c", "Refund"),
            equity("d", "Medium"),
        ]);
        let mut totals = CategoryTotals::new();
        totals.add("a", cents(-100));
        totals.add("b", cents(-90000));
        totals.add("c", cents(50000));
        totals.add("d", cents(-20000));

        let roots = HierarchyAggregator::new(&accounts).aggregate(&totals);
        let names: Vec<_> = roots.ordered().iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, vec!["Large", "Refund", "Medium", "Small"]);
    }

    #[test]
    fn test_roots_with_same_name_merge() {
        let accounts = AccountTable::new(vec![
            equity("a", "Auto"),
            equity("b", "Auto"),
            equity("c", "Brandstof").with_parent("b"),
        ]);
        let mut totals = CategoryTotals::new();
        totals.add("a", cents(-1000));
        totals.add("c", cents(-6000));

        let roots = HierarchyAggregator::new(&accounts).aggregate(&totals);
        assert_eq!(roots.get("Auto"), Some(cents(-7000)));
    }

    #[test]
    fn test_unresolved_parent_is_root() {
        let accounts = AccountTable::new(vec![
            equity("a", "Orphan").with_parent("missing"),
            equity("b", "Kid").with_parent("a"),
        ]);
        let (root, walk) = find_root(&accounts, accounts.get("b").unwrap());
        assert_eq!(root.id, "a");
        assert_eq!(walk, RootWalk::UnresolvedParent);

        let mut totals = CategoryTotals::new();
        totals.add("b", cents(-300));
        let roots = HierarchyAggregator::new(&accounts).aggregate(&totals);
        assert_eq!(roots.get("Orphan"), Some(cents(-300)));
    }

    #[test]
    fn test_cycle_terminates() {
        let accounts = AccountTable::new(vec![
            equity("a", "A").with_parent("b"),
            equity("b", "B").with_parent("a"),
        ]);

        let (root, walk) = find_root(&accounts, accounts.get("a").unwrap());
        assert_eq!(walk, RootWalk::Cycle);
        assert_eq!(root.id, "b");

        let mut totals = CategoryTotals::new();
        totals.add("a", cents(-100));
        totals.add("b", cents(-200));
        let (roots, logs) =
            capture_logs(|| HierarchyAggregator::new(&accounts).aggregate(&totals));
        assert_eq!(roots.total(), cents(-300));
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Cycle in account hierarchy, stopping walk"));
    }

    #[test]
    fn test_self_parent_terminates() {
        let accounts = AccountTable::new(vec![equity("a", "Loop").with_parent("a")]);
        let (root, walk) = find_root(&accounts, accounts.get("a").unwrap());
        assert_eq!(root.id, "a");
        assert_eq!(walk, RootWalk::Cycle);
    }

    #[test]
    fn test_empty_totals() {
        let accounts = AccountTable::new(sample_accounts());
        let roots = HierarchyAggregator::new(&accounts).aggregate(&CategoryTotals::new());
        assert!(roots.is_empty());
        assert_eq!(roots.total(), Money::zero());
    }
}
