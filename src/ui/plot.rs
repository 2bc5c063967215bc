use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::{category_colors, lerp, DARK_GRAY, LIGHT_BLUE, LIGHT_GREEN};
use crate::data::aggregate::{Breakdowns, DailyPoint};

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the five dashboard charts for the current breakdowns.
pub fn charts(ui: &mut Ui, breakdowns: &Breakdowns) {
    ui.columns(2, |cols| {
        ranked_bars(
            &mut cols[0],
            "Top 10 Buyers by Volume",
            &breakdowns.buyers_by_volume,
            LIGHT_BLUE,
            true,
        );
        ranked_bars(
            &mut cols[1],
            "Top 10 Sellers by Value",
            &breakdowns.sellers_by_value,
            LIGHT_GREEN,
            true,
        );
    });

    ui.columns(2, |cols| {
        category_bars(&mut cols[0], &breakdowns.category_counts);
        let countries: Vec<(String, f64)> = breakdowns
            .country_counts
            .iter()
            .map(|(k, c)| (k.clone(), *c as f64))
            .collect();
        ranked_bars(
            &mut cols[1],
            "Top 10 Countries by Transaction Count",
            &countries,
            LIGHT_BLUE,
            false,
        );
    });

    time_series(ui, &breakdowns.daily);
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).color(LIGHT_BLUE).size(16.0));
}

/// Bars shaded from dark gray (smallest) to `accent` (largest). Hover shows the group.
fn ranked_bars(ui: &mut Ui, title: &str, items: &[(String, f64)], accent: Color32, horizontal: bool) {
    chart_title(ui, title);
    let max = items.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);

    // Largest on top for horizontal charts.
    let count = items.len();
    let bars: Vec<Bar> = items
        .iter()
        .enumerate()
        .map(|(i, (name, value))| {
            let shade = if max > 0.0 { (*value / max) as f32 } else { 0.0 };
            let pos = if horizontal { (count - 1 - i) as f64 } else { i as f64 };
            Bar::new(pos, *value)
                .name(name)
                .fill(lerp(DARK_GRAY, accent, shade))
        })
        .collect();

    let mut chart = BarChart::new(bars).width(0.7).color(accent);
    if horizontal {
        chart = chart.horizontal();
    }

    Plot::new(title)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Category share as coloured bars, one colour per category.
fn category_bars(ui: &mut Ui, items: &[(String, usize)]) {
    chart_title(ui, "Top 5 Categories Distribution");
    let colors = category_colors(items.len());
    let total: usize = items.iter().map(|(_, c)| c).sum();

    Plot::new("category_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for (i, ((name, count), color)) in items.iter().zip(colors).enumerate() {
                let share = if total > 0 {
                    100.0 * *count as f64 / total as f64
                } else {
                    0.0
                };
                let bar = Bar::new(i as f64, *count as f64)
                    .name(format!("{name} ({share:.1}%)"))
                    .fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(name).color(color));
            }
        });
}

/// Value and volume per day. X is days since the first plotted day.
fn time_series(ui: &mut Ui, daily: &[DailyPoint]) {
    chart_title(ui, "Trade Volume & Value Over Time");
    let Some(first) = daily.first().map(|p| p.date) else {
        ui.label("No dated transactions.");
        return;
    };
    let x = |p: &DailyPoint| (p.date - first).num_days() as f64;
    let value_points: PlotPoints = daily.iter().map(|p| [x(p), p.total_value]).collect();
    let volume_points: PlotPoints = daily.iter().map(|p| [x(p), p.total_volume]).collect();

    ui.columns(2, |cols| {
        Plot::new("value_series")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(format!("Days from {first}"))
            .show(&mut cols[0], |plot_ui| {
                plot_ui.line(Line::new(value_points).name("Total Value ($)").color(LIGHT_GREEN).width(3.0));
            });
        Plot::new("volume_series")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label(format!("Days from {first}"))
            .show(&mut cols[1], |plot_ui| {
                plot_ui.line(Line::new(volume_points).name("Metric Tons").color(LIGHT_BLUE).width(3.0));
            });
    });
}
