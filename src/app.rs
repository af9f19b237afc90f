use eframe::egui::{self, ScrollArea, Ui};

use crate::data::view::SortColumn;
use crate::state::AppState;
use crate::ui::table::transactions_table;
use crate::ui::{charts, drilldown, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SubscriptionExplorerApp {
    pub state: AppState,
}

impl SubscriptionExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SubscriptionExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: toolbar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts, tables, drill-down ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    dashboard(ui, &mut self.state);
                });
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Subscription Explorer – Boshhh");
    ui.label(
        "Explore subscription transactions detected in open banking data. Filter by \
         category or merchant to analyse volume, spending patterns, and descriptions.",
    );
    if state.table.is_empty() {
        ui.label(format!("{} contains no transactions.", state.source.display()));
    }
    ui.separator();

    ui.heading("Volume of Subscriptions by Category");
    charts::volume_chart(ui, state);
    ui.add_space(12.0);

    ui.heading("Average Spend by Category");
    charts::average_chart(ui, state);
    ui.add_space(12.0);

    ui.heading("Filtered Transactions");
    let clicked = transactions_table(
        ui,
        "filtered_transactions",
        state.table,
        &state.view.rows,
        &SortColumn::ALL,
        Some(state.sort),
        320.0,
    );
    if let Some(column) = clicked {
        state.sort_by(column);
    }
    ui.add_space(12.0);

    ui.heading("Explore Individual User Subscriptions");
    drilldown::drill_down(ui, state);
}
