use std::cmp::Ordering;

use super::aggregate::{
    category_average, category_volume, cmp_absent_last, eligible_users, user_breakdown, user_rows,
};
use super::filter::FilterSelection;
use super::model::{Transaction, TransactionTable};

// ---------------------------------------------------------------------------
// Table sorting
// ---------------------------------------------------------------------------

/// Columns of the transaction table the analyst can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Date,
    Amount,
    User,
    Merchant,
    Category,
    Description,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Date,
        SortColumn::Amount,
        SortColumn::User,
        SortColumn::Merchant,
        SortColumn::Category,
        SortColumn::Description,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Date => "Date",
            SortColumn::Amount => "Amount (GBP)",
            SortColumn::User => "User",
            SortColumn::Merchant => "Merchant",
            SortColumn::Category => "Category",
            SortColumn::Description => "Description",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction, descending: bool) -> Ordering {
        match self {
            SortColumn::Amount if descending => b.amount.total_cmp(&a.amount),
            SortColumn::Amount => a.amount.total_cmp(&b.amount),
            SortColumn::Date => cmp_absent_last(a.date.as_deref(), b.date.as_deref(), descending),
            SortColumn::User => {
                cmp_absent_last(a.user_id.as_deref(), b.user_id.as_deref(), descending)
            }
            SortColumn::Merchant => {
                cmp_absent_last(a.merchant.as_deref(), b.merchant.as_deref(), descending)
            }
            SortColumn::Category => {
                cmp_absent_last(a.category.as_deref(), b.category.as_deref(), descending)
            }
            SortColumn::Description => cmp_absent_last(
                a.description.as_deref(),
                b.description.as_deref(),
                descending,
            ),
        }
    }
}

/// Current sort of the main transaction table. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub column: SortColumn,
    pub descending: bool,
}

impl Default for TableSort {
    fn default() -> Self {
        Self {
            column: SortColumn::Date,
            descending: true,
        }
    }
}

impl TableSort {
    /// Clicking the active column flips direction; a new column starts descending.
    pub fn clicked(self, column: SortColumn) -> Self {
        if self.column == column {
            Self {
                column,
                descending: !self.descending,
            }
        } else {
            Self {
                column,
                descending: true,
            }
        }
    }

    /// Stable sort of `rows`; ties keep file order.
    pub fn sort(&self, table: &TransactionTable, rows: &mut [usize]) {
        rows.sort_by(|&a, &b| {
            self.column
                .compare(&table.rows[a], &table.rows[b], self.descending)
        });
    }
}

// ---------------------------------------------------------------------------
// DashboardView – everything the presenter draws for one interaction
// ---------------------------------------------------------------------------

/// Drill-down section state.
#[derive(Debug, Clone, PartialEq)]
pub enum DrillDown {
    /// Nobody in the filtered view has more than three categories.
    NoEligibleUsers,
    User {
        user_id: String,
        /// `(category, count)`, largest first.
        breakdown: Vec<(String, usize)>,
        /// The user's filtered rows, newest first.
        rows: Vec<usize>,
    },
}

/// Result of one pass through the filter → aggregate pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Filtered rows in table-sort order.
    pub rows: Vec<usize>,
    pub volume: Vec<(String, usize)>,
    pub average: Vec<(String, f64)>,
    pub eligible_users: Vec<String>,
    pub drill_down: DrillDown,
}

impl DashboardView {
    /// Recompute every derived value from the immutable table.
    ///
    /// `requested_user` is honoured while it stays eligible; otherwise the
    /// first eligible user is shown.
    pub fn compute(
        table: &TransactionTable,
        selection: &FilterSelection,
        sort: &TableSort,
        requested_user: Option<&str>,
    ) -> Self {
        let filtered = selection.apply(table);

        let volume = category_volume(table, &filtered);
        let average = category_average(table, &filtered);
        let eligible = eligible_users(table, &filtered);

        let chosen = requested_user
            .and_then(|u| eligible.iter().find(|e| e.as_str() == u))
            .or_else(|| eligible.first());

        let drill_down = match chosen {
            Some(user_id) => DrillDown::User {
                user_id: user_id.clone(),
                breakdown: user_breakdown(table, &filtered, user_id),
                rows: user_rows(table, &filtered, user_id),
            },
            None => DrillDown::NoEligibleUsers,
        };

        let mut rows = filtered;
        sort.sort(table, &mut rows);

        log::debug!(
            "recomputed view: {} rows, {} categories, {} eligible users",
            rows.len(),
            volume.len(),
            eligible.len()
        );

        DashboardView {
            rows,
            volume,
            average,
            eligible_users: eligible,
            drill_down,
        }
    }

    pub fn selected_user(&self) -> Option<&str> {
        match &self.drill_down {
            DrillDown::User { user_id, .. } => Some(user_id.as_str()),
            DrillDown::NoEligibleUsers => None,
        }
    }
}
