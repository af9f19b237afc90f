use std::path::PathBuf;

use crate::color::CategoryColors;
use crate::data::filter::{AmountRange, FilterSelection};
use crate::data::model::TransactionTable;
use crate::data::view::{DashboardView, SortColumn, TableSort};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every handler mutates the selection and then calls [`AppState::refresh`],
/// which rebuilds `view` from scratch.
pub struct AppState {
    /// Loaded once at startup and shared for the life of the process.
    pub table: &'static TransactionTable,

    /// Where the table came from, for the top bar.
    pub source: PathBuf,

    /// Current filter choices.
    pub selection: FilterSelection,

    /// Sort of the main transaction table.
    pub sort: TableSort,

    /// User picked in the drill-down selector.
    pub requested_user: Option<String>,

    /// Output of the last pipeline run.
    pub view: DashboardView,

    /// Colour per category, shared by all charts.
    pub colors: CategoryColors,
}

impl AppState {
    pub fn new(table: &'static TransactionTable, source: PathBuf) -> Self {
        let selection = FilterSelection::for_table(table);
        let sort = TableSort::default();
        let view = DashboardView::compute(table, &selection, &sort, None);
        Self {
            table,
            source,
            selection,
            sort,
            requested_user: None,
            view,
            colors: CategoryColors::new(&table.categories),
        }
    }

    /// Recompute the dashboard after any selection change.
    pub fn refresh(&mut self) {
        self.view = DashboardView::compute(
            self.table,
            &self.selection,
            &self.sort,
            self.requested_user.as_deref(),
        );
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.selection.toggle_category(category);
        self.refresh();
    }

    pub fn toggle_merchant(&mut self, merchant: &str) {
        self.selection.toggle_merchant(merchant);
        self.refresh();
    }

    pub fn clear_categories(&mut self) {
        self.selection.categories.clear();
        self.refresh();
    }

    pub fn clear_merchants(&mut self) {
        self.selection.merchants.clear();
        self.refresh();
    }

    /// Apply a new amount window, clamped to the table's bounds.
    pub fn set_amount_range(&mut self, range: AmountRange) {
        let clamped = range.clamped(self.table.amount_bounds);
        if clamped != self.selection.amount {
            self.selection.amount = clamped;
            self.refresh();
        }
    }

    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::for_table(self.table);
        self.refresh();
    }

    pub fn select_user(&mut self, user_id: &str) {
        self.requested_user = Some(user_id.to_string());
        self.refresh();
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = self.sort.clicked(column);
        self.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Transaction;
    use crate::data::view::DrillDown;

    fn leak_table() -> &'static TransactionTable {
        let mut rows = Vec::new();
        for (i, cat) in ["Streaming", "Music", "Cloud", "News"].iter().enumerate() {
            rows.push(Transaction {
                date: Some(format!("2024-01-0{}", i + 1)),
                amount: (i + 1) as f64 * 5.0,
                user_id: Some("u1".into()),
                merchant: Some(format!("M{i}")),
                category: Some(cat.to_string()),
                description: None,
            });
        }
        Box::leak(Box::new(TransactionTable::from_rows(rows)))
    }

    #[test]
    fn handlers_recompute_the_view() {
        let mut state = AppState::new(leak_table(), PathBuf::from("t.csv"));
        assert_eq!(state.view.rows.len(), 4);
        assert_eq!(state.view.selected_user(), Some("u1"));

        state.toggle_category("Music");
        assert_eq!(state.view.rows.len(), 1);
        assert_eq!(state.view.drill_down, DrillDown::NoEligibleUsers);

        state.clear_categories();
        state.toggle_merchant("M0");
        assert_eq!(state.view.rows.len(), 1);

        state.reset_filters();
        assert_eq!(state.view.rows.len(), 4);
        assert_eq!(state.selection, FilterSelection::for_table(state.table));
    }

    #[test]
    fn amount_range_is_clamped_to_table_bounds() {
        let mut state = AppState::new(leak_table(), PathBuf::from("t.csv"));
        state.set_amount_range(AmountRange::new(-100.0, 12.0));
        assert_eq!(state.selection.amount, AmountRange::new(5.0, 12.0));
        assert_eq!(state.view.rows.len(), 2);
    }

    #[test]
    fn sort_by_flips_direction() {
        let mut state = AppState::new(leak_table(), PathBuf::from("t.csv"));
        state.sort_by(SortColumn::Amount);
        assert_eq!(state.view.rows, vec![3, 2, 1, 0]);
        state.sort_by(SortColumn::Amount);
        assert_eq!(state.view.rows, vec![0, 1, 2, 3]);
    }
}
