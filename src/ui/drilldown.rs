use eframe::egui::{self, RichText, Ui};

use crate::data::view::DrillDown;
use crate::state::AppState;
use crate::ui::charts::breakdown_donut;
use crate::ui::table::{USER_COLUMNS, transactions_table};

pub const NO_ELIGIBLE_MESSAGE: &str = "No users found with more than 3 subscription categories.";

// ---------------------------------------------------------------------------
// Per-user drill-down section
// ---------------------------------------------------------------------------

/// User selector, breakdown donut and the user's own transactions.
pub fn drill_down(ui: &mut Ui, state: &mut AppState) {
    let mut picked: Option<String> = None;

    match &state.view.drill_down {
        DrillDown::NoEligibleUsers => {
            ui.label(RichText::new(NO_ELIGIBLE_MESSAGE).color(ui.visuals().warn_fg_color));
        }
        DrillDown::User {
            user_id,
            breakdown,
            rows,
        } => {
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Select a user with more than 3 subscriptions:");
                egui::ComboBox::from_id_salt("eligible_user")
                    .selected_text(user_id.as_str())
                    .show_ui(ui, |ui: &mut Ui| {
                        for candidate in &state.view.eligible_users {
                            if ui
                                .selectable_label(candidate == user_id, candidate.as_str())
                                .clicked()
                            {
                                picked = Some(candidate.clone());
                            }
                        }
                    });
            });
            ui.add_space(6.0);

            ui.heading(format!("Subscription Breakdown for User: {user_id}"));
            breakdown_donut(ui, breakdown, &state.colors);
            ui.add_space(6.0);

            ui.strong("Subscriptions List");
            transactions_table(
                ui,
                "user_transactions",
                state.table,
                rows,
                &USER_COLUMNS,
                None,
                240.0,
            );
        }
    }

    if let Some(user_id) = picked {
        log::debug!("drill-down user changed to {user_id}");
        state.select_user(&user_id);
    }
}
