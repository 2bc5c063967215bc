use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::LIGHT_BLUE;
use crate::data::table::TableColumn;
use crate::state::Session;

const ROW_HEIGHT: f32 = 20.0;

/// Render the transaction table with a search box and sortable headers.
pub fn transaction_table(ui: &mut Ui, session: &mut Session) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new("Transaction Details").color(LIGHT_BLUE).size(16.0));
        ui.add(
            egui::TextEdit::singleline(&mut session.table_search)
                .hint_text("Search…")
                .desired_width(200.0),
        );
    });

    let sort = session.table_sort;
    let mut clicked: Option<TableColumn> = None;
    let rows: Vec<Vec<String>> = session
        .table_rows()
        .into_iter()
        .map(|t| TableColumn::ALL.iter().map(|c| c.cell(t)).collect())
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(80.0), TableColumn::ALL.len())
        .header(ROW_HEIGHT, |mut header| {
            for column in TableColumn::ALL {
                header.col(|ui: &mut Ui| {
                    let arrow = match sort {
                        Some(s) if s.column == column && s.descending => " ▼",
                        Some(s) if s.column == column => " ▲",
                        _ => "",
                    };
                    if ui.button(format!("{}{arrow}", column.title())).clicked() {
                        clicked = Some(column);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let cells = &rows[row.index()];
                for (column, text) in TableColumn::ALL.iter().zip(cells) {
                    row.col(|ui: &mut Ui| {
                        if column.is_numeric() {
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                                ui.label(text);
                            });
                        } else {
                            ui.label(text);
                        }
                    });
                }
            });
        });

    if let Some(column) = clicked {
        session.toggle_sort(column);
    }
}
