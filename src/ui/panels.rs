use eframe::egui::{self, Color32, Frame, RichText, ScrollArea, Ui};

use crate::color::{DARK_GRAY, LIGHT_BLUE, LIGHT_GRAY, LIGHT_GREEN};
use crate::data::aggregate::Metrics;
use crate::data::filter::FilterIntent;
use crate::data::model::{CategoricalField, Dimension};
use crate::data::table::{format_dollars, group_thousands};
use crate::state::Session;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, session: &mut Session) {
    ui.heading(RichText::new("Filters").color(LIGHT_BLUE));
    ui.separator();

    if session.dataset().is_empty() {
        ui.label("No data available.");
        return;
    }

    // Clone what we need so we can mutate the session inside the loop.
    let options = session.view().options.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dimension in [Dimension::StartDate, Dimension::EndDate] {
                filter_row(ui, session, dimension, |ui, session| {
                    let text = match dimension {
                        Dimension::StartDate => {
                            session.draft.start_date.get_or_insert_with(String::new)
                        }
                        _ => session.draft.end_date.get_or_insert_with(String::new),
                    };
                    ui.add(
                        egui::TextEdit::singleline(text)
                            .hint_text("MM/DD/YYYY")
                            .desired_width(110.0),
                    );
                });
            }

            for field in CategoricalField::ALL {
                let dimension = Dimension::Categorical(field);
                let choices = options.get(field);
                filter_row(ui, session, dimension, |ui, session| {
                    let current = session.draft.get(dimension).map(str::to_string);
                    let shown = current
                        .clone()
                        .unwrap_or_else(|| format!("Select {}...", field.label().to_lowercase()));
                    egui::ComboBox::from_id_salt(field.label())
                        .selected_text(shown)
                        .width(170.0)
                        .show_ui(ui, |ui: &mut Ui| {
                            if ui.selectable_label(current.is_none(), "(any)").clicked() {
                                session.draft.set(dimension, None);
                            }
                            for choice in choices {
                                let selected = current.as_deref() == Some(choice.as_str());
                                if ui.selectable_label(selected, choice).clicked() {
                                    session.draft.set(dimension, Some(choice.clone()));
                                }
                            }
                        });
                });
            }
        });
}

/// One labelled filter: its input widget plus Go / Reset buttons.
fn filter_row(
    ui: &mut Ui,
    session: &mut Session,
    dimension: Dimension,
    input: impl FnOnce(&mut Ui, &mut Session),
) {
    ui.label(RichText::new(dimension.label()).color(LIGHT_GRAY));
    ui.horizontal(|ui: &mut Ui| {
        input(ui, session);
        if ui.small_button("Go").clicked() {
            session.apply_draft(dimension);
        }
        if ui.small_button("Reset").clicked() {
            session.dispatch(FilterIntent::Reset(dimension));
        }
    });
    ui.add_space(6.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top bar: title, counts, global reset.
pub fn top_bar(ui: &mut Ui, session: &mut Session, port: u16) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.label(RichText::new("Maritime Imports Dashboard").strong().size(18.0));
        ui.separator();

        let total = session.dataset().len();
        let visible = session.view().visible_indices.len();
        ui.label(format!("{total} transactions loaded, {visible} visible"));
        if session.filters().is_unconstrained() {
            ui.label(RichText::new("no filters active").italics());
        }

        ui.separator();
        ui.label(format!("port {port}"));

        if let Some(msg) = &session.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui.button("Reset All Filters").clicked() {
                session.dispatch(FilterIntent::ResetAll);
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

pub fn metric_cards(ui: &mut Ui, metrics: &Metrics) {
    let avg = metrics
        .avg_value_per_kg
        .map(|v| format!("${v:.2}"))
        .unwrap_or_else(|| "N/A".to_string());
    let cards = [
        (group_thousands(&metrics.count.to_string()), "Total Transactions", LIGHT_BLUE),
        (format_dollars(metrics.total_value), "Total Value", LIGHT_GREEN),
        (format!("{:.1}", metrics.total_volume), "Metric Tons", LIGHT_BLUE),
        (avg, "Avg Price/KG", LIGHT_GREEN),
    ];

    ui.columns(cards.len(), |cols| {
        for (col, (value, label, color)) in cols.iter_mut().zip(cards) {
            Frame::group(col.style())
                .fill(DARK_GRAY)
                .stroke(egui::Stroke::new(1.0, LIGHT_BLUE))
                .show(col, |ui: &mut Ui| {
                    ui.vertical_centered(|ui: &mut Ui| {
                        ui.label(RichText::new(value).size(24.0).color(color));
                        ui.label(label);
                    });
                });
        }
    });
}
