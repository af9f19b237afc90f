use std::collections::BTreeSet;

use eframe::egui::{self, RichText, ScrollArea, Slider, Ui};

use crate::color::CategoryColors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// What the analyst clicked inside a multi-select.
enum Pick {
    Toggle(String),
    Clear,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let table = state.table;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            amount_sliders(ui, state);
            ui.separator();

            let pick = multi_select(
                ui,
                "Subscription Category",
                &table.categories,
                &state.selection.categories,
                Some(&state.colors),
            );
            match pick {
                Some(Pick::Toggle(c)) => state.toggle_category(&c),
                Some(Pick::Clear) => state.clear_categories(),
                None => {}
            }

            let pick = multi_select(
                ui,
                "Merchant",
                &table.merchants,
                &state.selection.merchants,
                None,
            );
            match pick {
                Some(Pick::Toggle(m)) => state.toggle_merchant(&m),
                Some(Pick::Clear) => state.clear_merchants(),
                None => {}
            }
        });
}

/// Min / max sliders bounded by the amounts seen at load time.
fn amount_sliders(ui: &mut Ui, state: &mut AppState) {
    let (lo, hi) = state.table.amount_bounds;
    let mut range = state.selection.amount;

    ui.strong("Transaction Amount Range");
    let min_changed = ui
        .add(Slider::new(&mut range.min, lo..=hi).prefix("£").text("min"))
        .changed();
    let max_changed = ui
        .add(Slider::new(&mut range.max, lo..=hi).prefix("£").text("max"))
        .changed();

    if min_changed || max_changed {
        // Dragging one handle past the other drags the other along.
        if min_changed && range.min > range.max {
            range.max = range.min;
        }
        if max_changed && range.max < range.min {
            range.min = range.max;
        }
        state.set_amount_range(range);
    }
}

/// Collapsible checkbox list. Nothing ticked means no filtering.
fn multi_select(
    ui: &mut Ui,
    title: &str,
    options: &[String],
    selected: &BTreeSet<String>,
    colors: Option<&CategoryColors>,
) -> Option<Pick> {
    let header_text = if selected.is_empty() {
        format!("{title}  (all {})", options.len())
    } else {
        format!("{title}  ({}/{})", selected.len(), options.len())
    };

    let mut pick = None;
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            if ui
                .add_enabled(!selected.is_empty(), egui::Button::new("Clear").small())
                .clicked()
            {
                pick = Some(Pick::Clear);
            }

            for value in options {
                let mut checked = selected.contains(value);
                let mut text = RichText::new(value);
                if let Some(cm) = colors {
                    text = text.color(cm.color_for(value));
                }
                if ui.checkbox(&mut checked, text).changed() {
                    pick = Some(Pick::Toggle(value.clone()));
                }
            }
        });
    pick
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Subscription Explorer");
        ui.separator();

        ui.label(state.source.display().to_string());
        ui.separator();

        ui.label(format!(
            "{} transactions loaded, {} visible",
            state.table.len(),
            state.view.rows.len()
        ));
        ui.separator();

        if ui.button("Reset filters").clicked() {
            state.reset_filters();
        }
    });
}
