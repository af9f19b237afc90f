use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::model::TransactionTable;

/// Users need strictly more distinct categories than this to be drilled into.
pub const ELIGIBILITY_THRESHOLD: usize = 3;

// ---------------------------------------------------------------------------
// Category aggregates (chart inputs)
// ---------------------------------------------------------------------------

/// Row count per category, largest first (ties by name).
///
/// Rows without a category are not counted.
pub fn category_volume(table: &TransactionTable, view: &[usize]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &i in view {
        if let Some(c) = table.rows[i].category.as_deref() {
            *counts.entry(c).or_default() += 1;
        }
    }
    sorted_counts(counts)
}

/// Mean amount per category, highest first (ties by name).
///
/// Only categories present in `view` appear in the output.
pub fn category_average(table: &TransactionTable, view: &[usize]) -> Vec<(String, f64)> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for &i in view {
        let tx = &table.rows[i];
        if let Some(c) = tx.category.as_deref() {
            let entry = sums.entry(c).or_default();
            entry.0 += tx.amount;
            entry.1 += 1;
        }
    }
    let mut means: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(c, (sum, n))| (c.to_string(), sum / n as f64))
        .collect();
    // BTreeMap order + stable sort gives name order for equal means.
    means.sort_by(|a, b| b.1.total_cmp(&a.1));
    means
}

// ---------------------------------------------------------------------------
// Per-user aggregates (drill-down)
// ---------------------------------------------------------------------------

/// Distinct non-null categories per user, in user-id order.
pub fn user_diversity(table: &TransactionTable, view: &[usize]) -> Vec<(String, usize)> {
    let mut per_user: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for &i in view {
        let tx = &table.rows[i];
        let Some(user) = tx.user_id.as_deref() else {
            continue;
        };
        let seen = per_user.entry(user).or_default();
        if let Some(c) = tx.category.as_deref() {
            seen.insert(c);
        }
    }
    per_user
        .into_iter()
        .map(|(u, cats)| (u.to_string(), cats.len()))
        .collect()
}

/// Users whose filtered rows span more than [`ELIGIBILITY_THRESHOLD`] categories.
pub fn eligible_users(table: &TransactionTable, view: &[usize]) -> Vec<String> {
    user_diversity(table, view)
        .into_iter()
        .filter(|(_, n)| *n > ELIGIBILITY_THRESHOLD)
        .map(|(u, _)| u)
        .collect()
}

/// Occurrences of each category among one user's rows, largest first.
pub fn user_breakdown(
    table: &TransactionTable,
    view: &[usize],
    user_id: &str,
) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &i in view {
        let tx = &table.rows[i];
        if tx.user_id.as_deref() != Some(user_id) {
            continue;
        }
        if let Some(c) = tx.category.as_deref() {
            *counts.entry(c).or_default() += 1;
        }
    }
    sorted_counts(counts)
}

/// One user's rows from `view`, most recent first.
pub fn user_rows(table: &TransactionTable, view: &[usize], user_id: &str) -> Vec<usize> {
    let mut rows: Vec<usize> = view
        .iter()
        .copied()
        .filter(|&i| table.rows[i].user_id.as_deref() == Some(user_id))
        .collect();
    rows.sort_by(|&a, &b| {
        cmp_absent_last(
            table.rows[a].date.as_deref(),
            table.rows[b].date.as_deref(),
            true,
        )
    });
    rows
}

fn sorted_counts(counts: BTreeMap<&str, usize>) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(c, n)| (c.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Compare optional values, absent ones sorting last in either direction.
pub(crate) fn cmp_absent_last<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
