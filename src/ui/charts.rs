use std::f32::consts::TAU;

use eframe::egui::{Color32, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

use crate::color::CategoryColors;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Category charts (central panel)
// ---------------------------------------------------------------------------

/// Bar chart of transaction counts per category, largest first.
pub fn volume_chart(ui: &mut Ui, state: &AppState) {
    let volume = &state.view.volume;
    if volume.is_empty() {
        ui.label("No transactions match the current filters.");
        return;
    }

    let bars: Vec<Bar> = volume
        .iter()
        .enumerate()
        .map(|(i, (category, count))| {
            Bar::new(i as f64, *count as f64)
                .name(category)
                .fill(state.colors.color_for(category))
                .width(0.7)
        })
        .collect();
    let labels: Vec<String> = volume.iter().map(|(c, _)| c.clone()).collect();

    Plot::new("volume_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Subscription Category")
        .y_axis_label("Number of Transactions")
        .x_axis_formatter(move |mark, _range| category_tick(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

/// Line with a point per category showing mean amount, highest first.
pub fn average_chart(ui: &mut Ui, state: &AppState) {
    let average = &state.view.average;
    if average.is_empty() {
        ui.label("No transactions match the current filters.");
        return;
    }

    let labels: Vec<String> = average.iter().map(|(c, _)| c.clone()).collect();
    let line_points: PlotPoints = average
        .iter()
        .enumerate()
        .map(|(i, (_, mean))| [i as f64, *mean])
        .collect();

    Plot::new("average_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Subscription Category")
        .y_axis_label("Avg. Transaction Amount (GBP)")
        .x_axis_formatter(move |mark, _range| category_tick(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(line_points)
                    .name("Average spend")
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
            for (i, (category, mean)) in average.iter().enumerate() {
                let point: PlotPoints = std::iter::once([i as f64, *mean]).collect();
                plot_ui.points(
                    Points::new(point)
                        .name(format!("{category}: £{mean:.2}"))
                        .color(state.colors.color_for(category))
                        .radius(5.0),
                );
            }
        });
}

/// Axis label for integer positions; other grid marks stay blank.
fn category_tick(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if idx < 0.0 || (value - idx).abs() > 1e-6 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Per-user donut chart
// ---------------------------------------------------------------------------

const DONUT_SIZE: f32 = 260.0;
const DONUT_HOLE: f32 = 40.0;

/// Donut of one user's `(category, count)` breakdown with a legend beside it.
pub fn breakdown_donut(ui: &mut Ui, breakdown: &[(String, usize)], colors: &CategoryColors) {
    let total: usize = breakdown.iter().map(|(_, n)| n).sum();
    if total == 0 {
        ui.label("No categorised transactions for this user.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) = ui.allocate_painter(Vec2::splat(DONUT_SIZE), Sense::hover());
        let center = response.rect.center();
        let outer = DONUT_SIZE * 0.5 - 4.0;
        let pointer = response.hover_pos();

        // Start at twelve o'clock; screen y points down so angles run clockwise.
        let mut start = -TAU / 4.0;
        let mut hovered = None;
        for (category, count) in breakdown {
            let sweep = TAU * (*count as f32 / total as f32);
            let color = colors.color_for(category);

            let steps = ((sweep / TAU * 96.0).ceil() as usize).max(1);
            for s in 0..steps {
                let a0 = start + sweep * s as f32 / steps as f32;
                let a1 = start + sweep * (s + 1) as f32 / steps as f32;
                let quad = vec![
                    polar(center, DONUT_HOLE, a0),
                    polar(center, outer, a0),
                    polar(center, outer, a1),
                    polar(center, DONUT_HOLE, a1),
                ];
                painter.add(Shape::convex_polygon(quad, color, Stroke::NONE));
            }

            if let Some(p) = pointer {
                if in_slice(center, p, outer, start, sweep) {
                    hovered = Some((category, *count));
                }
            }
            start += sweep;
        }

        if let Some((category, count)) = hovered {
            response.on_hover_text(format!("{category}: {count}"));
        }

        ui.vertical(|ui: &mut Ui| {
            for (category, count) in breakdown {
                let pct = 100.0 * *count as f64 / total as f64;
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(colors.color_for(category)));
                    ui.label(format!("{category}: {count} ({pct:.0}%)"));
                });
            }
        });
    });
}

fn polar(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + Vec2::angled(angle) * radius
}

fn in_slice(center: Pos2, p: Pos2, outer: f32, start: f32, sweep: f32) -> bool {
    let d = p - center;
    let r = d.length();
    if r < DONUT_HOLE || r > outer {
        return false;
    }
    let rel = (d.y.atan2(d.x) - start).rem_euclid(TAU);
    rel < sweep
}
