use std::sync::Arc;

use eframe::egui::{self, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::data::model::Dataset;
use crate::state::Session;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub session: Session,
    port: u16,
}

impl DashboardApp {
    pub fn new(dataset: Arc<Dataset>, config: &DashboardConfig, load_error: Option<String>) -> Self {
        let mut session = Session::new(dataset);
        session.status_message = load_error;
        Self {
            session,
            port: config.port,
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title, counts, global reset ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.session, self.port);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.session);
            });

        // ---- Bottom panel: transaction table ----
        egui::TopBottomPanel::bottom("table_panel")
            .resizable(true)
            .default_height(280.0)
            .show(ctx, |ui| {
                table::transaction_table(ui, &mut self.session);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.dataset().is_empty() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("No data available");
                });
                return;
            }
            let view = self.session.view();
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                panels::metric_cards(ui, &view.metrics);
                ui.add_space(8.0);
                plot::charts(ui, &view.breakdowns);
            });
        });
    }
}
