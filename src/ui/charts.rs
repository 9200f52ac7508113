use std::ops::RangeInclusive;

use eframe::egui::{RichText, ScrollArea, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints,
};

use crate::color;
use crate::data::aggregate::{BoxStats, ViewModel};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – metric cards and charts
// ---------------------------------------------------------------------------

/// Render the dashboard body: title, metric cards, the four charts, and the
/// static insight text. Pure presentation; everything it shows comes from the
/// precomputed [`ViewModel`].
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading("Failed to load the bike-sharing dataset");
                ui.label(RichText::new(err).color(eframe::egui::Color32::RED));
            });
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.add_space(4.0);
            ui.heading("Bike Sharing Dataset Analysis");
            ui.label("This dashboard analyzes bike sharing patterns based on various factors");
            ui.add_space(8.0);

            let Some(vm) = &state.view else {
                ui.add_space(24.0);
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.heading("No data for the selected filters");
                    ui.label("Widen the date range or select more seasons.");
                });
                return;
            };

            metric_cards(ui, vm);
            ui.add_space(8.0);

            section(ui, "1. Bike Usage: Working Days vs Holidays");
            workingday_chart(ui, vm);

            section(ui, "2. Impact of Weather on Bike Usage");
            box_chart(
                ui,
                "weather_boxes",
                &vm.weather_boxes,
                |label| state.weather_colors.color_for(label),
                "Weather Situation",
            );

            section(ui, "3. Seasonal Trends in Bike Usage");
            box_chart(
                ui,
                "season_boxes",
                &vm.season_boxes,
                |label| state.season_colors.color_for(label),
                "Season",
            );

            section(ui, "4. Hourly Usage Patterns");
            hourly_chart(ui, vm);

            insights(ui);

            ui.separator();
            ui.weak("Data Source: Bike Sharing Dataset");
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.strong(RichText::new(title).size(18.0));
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

fn metric_cards(ui: &mut Ui, vm: &ViewModel) {
    let s = &vm.summary;
    ui.columns(3, |cols: &mut [Ui]| {
        metric_card(&mut cols[0], "Average Daily Users", &thousands(s.avg_daily_users), None);
        metric_card(
            &mut cols[1],
            "Peak Hour",
            &format!("{}:00", s.peak_hour),
            Some(&format!("{} users", s.peak_hour_users)),
        );
        metric_card(
            &mut cols[2],
            "Most Popular Season",
            &s.popular_season,
            Some(&format!("{} avg users", s.popular_season_avg)),
        );
    });
}

fn metric_card(ui: &mut Ui, label: &str, value: &str, detail: Option<&str>) {
    eframe::egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(24.0).strong());
        if let Some(detail) = detail {
            ui.weak(detail);
        }
    });
}

/// Format an integer with thousands separators, e.g. `4504` → `"4,504"`.
fn thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Tick formatter that maps integer positions to category labels.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }
}

fn workingday_chart(ui: &mut Ui, vm: &ViewModel) {
    let labels: Vec<String> = vm.workingday_means.iter().map(|(l, _)| l.clone()).collect();
    let palette = color::generate_palette(vm.workingday_means.len());

    let bars: Vec<Bar> = vm
        .workingday_means
        .iter()
        .enumerate()
        .map(|(i, (label, mean))| {
            Bar::new(i as f64, *mean)
                .width(0.6)
                .name(label)
                .fill(palette[i])
        })
        .collect();

    Plot::new("workingday_bars")
        .height(260.0)
        .x_axis_label("Day Type")
        .y_axis_label("Average Number of Rentals")
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average rentals"));
        });
}

fn box_chart(
    ui: &mut Ui,
    id: &str,
    boxes: &[(String, BoxStats)],
    color_for: impl Fn(&str) -> eframe::egui::Color32,
    x_label: &str,
) {
    let labels: Vec<String> = boxes.iter().map(|(l, _)| l.clone()).collect();

    Plot::new(id)
        .height(260.0)
        .legend(Legend::default())
        .x_axis_label(x_label)
        .y_axis_label("Number of Rentals")
        .x_axis_formatter(category_formatter(labels))
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (i, (label, stats)) in boxes.iter().enumerate() {
                let c = color_for(label);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(stats.min, stats.q1, stats.median, stats.q3, stats.max),
                )
                .name(label)
                .box_width(0.5)
                .fill(c.gamma_multiply(0.35))
                .stroke(Stroke::new(1.5, c));

                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(label).color(c));
            }
        });
}

fn hourly_chart(ui: &mut Ui, vm: &ViewModel) {
    let points: PlotPoints = vm
        .hourly_means
        .iter()
        .map(|&(hour, mean)| [hour as f64, mean])
        .collect();

    Plot::new("hourly_line")
        .height(260.0)
        .x_axis_label("Hour of Day")
        .y_axis_label("Average Number of Rentals")
        .include_y(0.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name("Average hourly rentals")
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Static insight text
// ---------------------------------------------------------------------------

fn insights(ui: &mut Ui) {
    section(ui, "Key Insights");
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label(
            "• Highest usage occurs during Fall season\n\
             • Clear weather significantly increases bike rentals\n\
             • Working days see higher average usage than holidays",
        );
        cols[1].label(
            "• Two peak usage times: morning and evening commute hours\n\
             • Lowest usage during early morning hours (2-4 AM)\n\
             • Weather has a significant impact on rental patterns",
        );
    });
}

#[cfg(test)]
mod tests {
    use super::thousands;

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(4504), "4,504");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(-4504), "-4,504");
    }
}
