use eframe::egui::{self, Color32, Key, RichText, ScrollArea, Ui};

use recovery_panel::format::{format_brl, format_count, format_pct};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Login gate
// ---------------------------------------------------------------------------

/// Render the sign-in form.
pub fn login_screen(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(60.0);
        ui.heading(RichText::new("Legal Intelligence Portal").size(28.0).strong());
        ui.label(RichText::new("Judicial recovery opportunities").color(Color32::GRAY));
        ui.add_space(24.0);

        egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
            ui.set_max_width(320.0);
            ui.label("Username");
            ui.text_edit_singleline(&mut state.login.username);
            ui.label("Password");
            let pw = ui.add(egui::TextEdit::singleline(&mut state.login.password).password(true));
            let submitted = pw.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));

            ui.add_space(8.0);
            if ui.button("Open panel").clicked() || submitted {
                state.submit_login();
            }
            if state.login.rejected {
                ui.label(RichText::new("Incorrect username or password").color(Color32::RED));
            }
        });
    });
}

/// Full-screen error once the dataset could not be loaded.
pub fn fatal_error(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(
            RichText::new(format!("The case database could not be loaded.\n\n{message}"))
                .color(Color32::RED)
                .size(18.0),
        );
    });
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data management");
    ui.label("Focus on the cases most likely to be recovered.");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Geographic segmentation");

            // Clone the option lists so the toggles can borrow state mutably.
            let courts = state.court_options.clone();
            let header = format!("Courts  ({}/{})", state.criteria.courts.len(), courts.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("courts")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for court in &courts {
                        let mut checked = state.criteria.courts.contains(court);
                        if ui.checkbox(&mut checked, court.as_str()).changed() {
                            state.toggle_court(court);
                        }
                    }
                });

            let states = state.state_options.clone();
            let header = format!("States (UF)  ({}/{})", state.criteria.states.len(), states.len());
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("states")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for uf in &states {
                        let mut checked = state.criteria.states.contains(uf);
                        if ui.checkbox(&mut checked, uf.as_str()).changed() {
                            state.toggle_state(uf);
                        }
                    }
                });

            ui.separator();
            ui.strong("Data quality");
            let mut changed = false;
            changed |= ui
                .checkbox(
                    &mut state.criteria.cnj_valid_only,
                    "Valid CNJ only (easy to locate)",
                )
                .changed();
            changed |= ui
                .checkbox(
                    &mut state.criteria.doc_valid_only,
                    "Valid CPF/CNPJ only (manual search)",
                )
                .changed();
            changed |= ui
                .checkbox(
                    &mut state.criteria.electronic_only,
                    "Electronic processes only (>2014)",
                )
                .changed();
            if changed {
                state.refilter();
            }

            ui.separator();
            if ui
                .add_enabled(!state.criteria.is_empty(), egui::Button::new("Clear filters"))
                .clicked()
            {
                state.clear_filters();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Recovery Panel");
        ui.separator();
        let m = &state.view.metrics;
        ui.label(format!(
            "{} cases loaded, {} visible",
            format_count(m.total_rows),
            format_count(m.filtered_rows)
        ));
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn metric_card(ui: &mut Ui, title: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).color(Color32::GRAY));
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

/// Headline metrics for the current view.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let m = state.view.metrics;
    ui.columns(3, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Filtered cases", format_count(m.filtered_rows));
        metric_card(&mut cols[1], "Electronic (>2014)", format_pct(m.electronic_pct));
        metric_card(&mut cols[2], "Original deposit", format_brl(m.deposit_total));
    });
}
