use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use recovery_panel::data::model::{CaseDataset, CaseRecord, Column};
use recovery_panel::format::format_brl;

use crate::color;
use crate::state::AppState;

/// Table columns in display order, after the derived "Type" column.
const DISPLAY_COLUMNS: [Column; 10] = [
    Column::Defendant,
    Column::Claimant,
    Column::Court,
    Column::State,
    Column::CaseNumber,
    Column::BaseYear,
    Column::Balance,
    Column::DepositOriginal,
    Column::CnjOk,
    Column::DocOk,
];

fn title(col: Column) -> &'static str {
    match col {
        Column::Defendant => "Defendant",
        Column::Claimant => "Claimant",
        Column::Court => "Court",
        Column::State => "UF",
        Column::County => "County",
        Column::CaseNumber => "Case",
        Column::BaseYear => "Base year",
        Column::Balance => "Balance",
        Column::DepositOriginal => "Orig. deposit",
        Column::CnjOk => "CNJ valid",
        Column::DocOk => "Doc OK",
    }
}

/// Columns shown for this dataset. The balance column is redacted unless
/// the configuration asks for it.
fn visible_columns(dataset: &CaseDataset, show_balance: bool) -> Vec<Column> {
    DISPLAY_COLUMNS
        .into_iter()
        .filter(|c| dataset.has_column(*c))
        .filter(|c| show_balance || *c != Column::Balance)
        .collect()
}

fn cell(ui: &mut Ui, record: &CaseRecord, col: Column) {
    match col {
        Column::BaseYear => {
            ui.label(record.base_year.map(|y| format!("{y:.0}")).unwrap_or_default());
        }
        Column::Balance | Column::DepositOriginal => {
            ui.label(record.number(col).map(format_brl).unwrap_or_default());
        }
        Column::CnjOk | Column::DocOk => {
            let mut checked = record.flag(col).unwrap_or(false);
            ui.add_enabled(false, egui::Checkbox::without_text(&mut checked));
        }
        _ => {
            ui.label(record.text(col).unwrap_or_default());
        }
    }
}

/// Render the opportunities table for the current view.
pub fn cases_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let columns = visible_columns(dataset, state.config.show_balance);
    let rows = &state.view.rows;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(TableColumn::auto().at_least(90.0))
        .columns(TableColumn::auto().at_least(70.0).clip(true), columns.len())
        .min_scrolled_height(0.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Type");
            });
            for col in &columns {
                header.col(|ui| {
                    ui.strong(title(*col));
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let (index, kind) = rows[row.index()];
                let record = &dataset.records[index];
                row.col(|ui| {
                    ui.label(RichText::new(kind.label()).color(color::kind_color(kind)));
                });
                for col in &columns {
                    row.col(|ui| cell(ui, record, *col));
                }
            });
        });
}
