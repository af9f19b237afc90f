use eframe::egui::{self, Label, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Transaction, TransactionTable};
use crate::data::view::{SortColumn, TableSort};

const ROW_HEIGHT: f32 = 20.0;

/// Columns of the per-user table, in display order.
pub const USER_COLUMNS: [SortColumn; 5] = [
    SortColumn::Date,
    SortColumn::Amount,
    SortColumn::Merchant,
    SortColumn::Category,
    SortColumn::Description,
];

// ---------------------------------------------------------------------------
// Transaction table
// ---------------------------------------------------------------------------

/// Scrollable table of `rows` (indices into `table`).
///
/// With `sort` set the headers become buttons; the clicked column is returned
/// so the caller can re-sort through its event handler.
pub fn transactions_table(
    ui: &mut Ui,
    id: &str,
    table: &TransactionTable,
    rows: &[usize],
    columns: &[SortColumn],
    sort: Option<TableSort>,
    max_height: f32,
) -> Option<SortColumn> {
    let mut clicked = None;

    ui.push_id(id, |ui: &mut Ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .min_scrolled_height(0.0)
            .max_scroll_height(max_height);
        for col in columns {
            builder = builder.column(column_width(*col));
        }

        builder
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for &col in columns {
                    header.col(|ui: &mut Ui| match sort {
                        Some(s) => {
                            let active = s.column == col;
                            let marker = match (active, s.descending) {
                                (false, _) => "",
                                (true, true) => " ⏷",
                                (true, false) => " ⏶",
                            };
                            let text = format!("{}{marker}", col.label());
                            if ui.selectable_label(active, text).clicked() {
                                clicked = Some(col);
                            }
                        }
                        None => {
                            ui.strong(col.label());
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let tx = &table.rows[rows[row.index()]];
                    for &col in columns {
                        row.col(|ui: &mut Ui| {
                            ui.add(Label::new(cell_text(tx, col)).truncate());
                        });
                    }
                });
            });
    });

    clicked
}

fn column_width(col: SortColumn) -> Column {
    match col {
        SortColumn::Date | SortColumn::Amount | SortColumn::User => Column::auto().at_least(70.0),
        SortColumn::Merchant | SortColumn::Category => {
            Column::initial(150.0).at_least(80.0).clip(true)
        }
        SortColumn::Description => Column::remainder().at_least(120.0).clip(true),
    }
}

fn cell_text(tx: &Transaction, col: SortColumn) -> String {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    match col {
        SortColumn::Date => text(&tx.date),
        SortColumn::Amount => format!("£{:.2}", tx.amount),
        SortColumn::User => text(&tx.user_id),
        SortColumn::Merchant => text(&tx.merchant),
        SortColumn::Category => text(&tx.category),
        SortColumn::Description => text(&tx.description),
    }
}
