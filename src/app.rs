use eframe::egui::{self, Color32, RichText};

use recovery_panel::config::PanelConfig;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RecoveryPanelApp {
    pub state: AppState,
}

impl RecoveryPanelApp {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RecoveryPanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Session gate ----
        if !self.state.session.authorized {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::login_screen(ui, &mut self.state);
            });
            return;
        }

        // ---- Fatal load failure: nothing else renders ----
        if let Some(message) = &self.state.load_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::fatal_error(ui, message);
            });
            return;
        }

        // ---- Top panel: status bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Recovery overview");
            panels::metrics_row(ui, &self.state);
            ui.separator();

            if self.state.view.metrics.filtered_rows == 0 {
                ui.label(
                    RichText::new("Adjust the filters to see data.").color(Color32::LIGHT_BLUE),
                );
                return;
            }

            ui.columns(2, |cols| {
                plot::defendant_chart(&mut cols[0], &self.state);
                plot::year_histogram(&mut cols[1], &self.state);
            });
            ui.separator();
            ui.heading("Selected opportunities");
            table::cases_table(ui, &self.state);
        });
    }
}
