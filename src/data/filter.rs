use std::collections::BTreeSet;

use super::model::{Transaction, TransactionTable};

// ---------------------------------------------------------------------------
// Amount range
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` amount window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl AmountRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The full range observed in the table at load time.
    pub fn full(table: &TransactionTable) -> Self {
        let (min, max) = table.amount_bounds;
        Self { min, max }
    }

    /// Force the range inside `bounds`, keeping `min <= max`.
    pub fn clamped(self, bounds: (f64, f64)) -> Self {
        let (lo, hi) = bounds;
        let min = self.min.clamp(lo, hi);
        let max = self.max.clamp(lo, hi).max(min);
        Self { min, max }
    }

    pub fn contains(&self, amount: f64) -> bool {
        self.min <= amount && amount <= self.max
    }
}

// ---------------------------------------------------------------------------
// Filter predicate: selected categories, merchants and amount window
// ---------------------------------------------------------------------------

/// The analyst's current filter choices.
///
/// An empty category or merchant set means "no filter" on that dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub merchants: BTreeSet<String>,
    pub amount: AmountRange,
}

impl FilterSelection {
    /// Selection that keeps every row of `table`.
    pub fn for_table(table: &TransactionTable) -> Self {
        Self {
            categories: BTreeSet::new(),
            merchants: BTreeSet::new(),
            amount: AmountRange::full(table),
        }
    }

    /// Whether a single transaction passes every active filter.
    pub fn matches(&self, tx: &Transaction) -> bool {
        member_of(&self.categories, tx.category.as_deref())
            && member_of(&self.merchants, tx.merchant.as_deref())
            && self.amount.contains(tx.amount)
    }

    /// Indices of rows in `table` passing all filters, in file order.
    pub fn apply(&self, table: &TransactionTable) -> Vec<usize> {
        self.apply_to(table, 0..table.len())
    }

    /// Narrow an existing view; lets filters be chained in any order.
    pub fn apply_to(
        &self,
        table: &TransactionTable,
        view: impl IntoIterator<Item = usize>,
    ) -> Vec<usize> {
        view.into_iter()
            .filter(|&i| self.matches(&table.rows[i]))
            .collect()
    }

    pub fn toggle_category(&mut self, category: &str) {
        toggle(&mut self.categories, category);
    }

    pub fn toggle_merchant(&mut self, merchant: &str) {
        toggle(&mut self.merchants, merchant);
    }
}

/// Empty selection passes everything; otherwise absent values never match.
fn member_of(selected: &BTreeSet<String>, value: Option<&str>) -> bool {
    if selected.is_empty() {
        return true;
    }
    value.is_some_and(|v| selected.contains(v))
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}
