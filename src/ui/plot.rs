use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use recovery_panel::format::format_brl;

use crate::color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Defendant concentration (left chart)
// ---------------------------------------------------------------------------

/// Horizontal bars of the top defendants by summed balance, largest on top.
pub fn defendant_chart(ui: &mut Ui, state: &AppState) {
    ui.heading("Concentration by defendant");
    let ranking = &state.view.ranking;
    if ranking.is_empty() {
        return;
    }

    let totals: Vec<f64> = ranking.iter().map(|g| g.total_balance).collect();
    let colors = color::value_scale(&totals);
    let n = ranking.len();

    let bars: Vec<Bar> = ranking
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (group, fill))| {
            Bar::new((n - i) as f64, group.total_balance)
                .name(format!(
                    "{}: {} ({} cases)",
                    group.defendant,
                    format_brl(group.total_balance),
                    group.cases
                ))
                .fill(fill)
        })
        .collect();

    let chart = BarChart::new(bars)
        .horizontal()
        .name(format!("Top {} defendants by recoverable balance", state.config.top_n));

    Plot::new("defendant_chart")
        .legend(Legend::default())
        .height(320.0)
        .x_axis_label("Total balance (R$)")
        .show_y(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
}

// ---------------------------------------------------------------------------
// Base-year distribution (right chart)
// ---------------------------------------------------------------------------

pub fn year_histogram(ui: &mut Ui, state: &AppState) {
    ui.heading("Distribution by base year");
    if state.view.histogram.is_empty() {
        return;
    }

    let bars: Vec<Bar> = state
        .view
        .histogram
        .iter()
        .map(|&(year, count)| {
            Bar::new(year as f64, count as f64)
                .name(format!("{year}: {count}"))
                .width(0.9)
                .fill(color::HISTOGRAM)
        })
        .collect();

    Plot::new("year_histogram")
        .height(320.0)
        .x_axis_label("Base year")
        .y_axis_label("Cases")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Frequency"));
        });
}
