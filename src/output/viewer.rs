use anyhow::{Result, anyhow};
use eframe::egui::{self, Color32, Ui};
use egui_plot::{GridInput, GridMark, Legend, Line, Plot, PlotBounds, PlotPoints, Points};

use crate::chart::{Axis, Chart, Corner, CurveStyle, LineStyle, Scale, format_tick};
use crate::color::Rgb;

// ---------------------------------------------------------------------------
// Display seam
// ---------------------------------------------------------------------------

/// Something that can present a finished chart to the user.
pub trait ChartViewer {
    /// Show `chart`; returns once the user is done with it.
    fn show(&mut self, chart: &Chart) -> Result<()>;
}

/// Opens a native window and blocks until it is closed.
#[derive(Debug, Default)]
pub struct WindowViewer;

/// Used when no display is available.
#[derive(Debug, Default)]
pub struct HeadlessViewer;

impl ChartViewer for HeadlessViewer {
    fn show(&mut self, chart: &Chart) -> Result<()> {
        log::warn!("No display available; not showing '{}'", chart.window_title);
        Ok(())
    }
}

impl ChartViewer for WindowViewer {
    fn show(&mut self, chart: &Chart) -> Result<()> {
        let (width, height) = chart.size;
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([width as f32, height as f32])
                .with_min_inner_size([320.0, 240.0]),
            ..Default::default()
        };

        let app = ChartApp::new(chart.clone());
        eframe::run_native(
            &chart.window_title,
            options,
            Box::new(move |_cc| Ok(Box::new(app))),
        )
        .map_err(|e| anyhow!("chart viewer failed: {e}"))
    }
}

/// Whether a window can be opened in this session.
pub fn display_available() -> bool {
    if cfg!(any(target_os = "windows", target_os = "macos")) {
        return true;
    }
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}

/// The viewer matching the current environment.
pub fn default_viewer() -> Box<dyn ChartViewer> {
    if display_available() {
        Box::new(WindowViewer)
    } else {
        Box::new(HeadlessViewer)
    }
}

impl<V: ChartViewer + ?Sized> ChartViewer for Box<V> {
    fn show(&mut self, chart: &Chart) -> Result<()> {
        (**self).show(chart)
    }
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

struct ChartApp {
    chart: Chart,
    /// Initial view applied; afterwards the user may pan and zoom freely.
    bounds_applied: bool,
}

impl ChartApp {
    fn new(chart: Chart) -> Self {
        ChartApp {
            chart,
            bounds_applied: false,
        }
    }

    fn area_plot(&self, ui: &mut Ui, idx: usize, height: f32) {
        let area = &self.chart.areas[idx];
        let Some(view) = self.chart.view(idx) else {
            return;
        };
        let (xs, ys) = (area.x.scale, area.y.scale);

        if let Some(title) = &area.title {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.strong(title);
            });
        }

        let mut plot = Plot::new(("chart_area", idx))
            .height(height)
            .x_axis_label(area.x.label.clone())
            .y_axis_label(area.y.label.clone())
            .show_grid(area.grid.is_some())
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .x_axis_formatter(move |mark, _range| format_tick(xs.inverse(mark.value)))
            .y_axis_formatter(move |mark, _range| format_tick(ys.inverse(mark.value)));

        if let Some(corner) = area.legend_corner(&view) {
            plot = plot.legend(Legend::default().position(legend_corner(corner)));
        }
        if self.chart.shared_x && self.chart.areas.iter().all(|a| a.x.scale == xs) {
            plot = plot.link_axis("shared_x", [true, false]);
        }
        if needs_spacer(&area.x) {
            plot = plot.x_grid_spacer(tick_spacer(area.x.clone()));
        }
        if needs_spacer(&area.y) {
            plot = plot.y_grid_spacer(tick_spacer(area.y.clone()));
        }

        let apply_bounds = !self.bounds_applied;
        plot.show(ui, |plot_ui| {
            if apply_bounds {
                let (x_lo, x_hi) = view.x.ordered();
                let (y_lo, y_hi) = view.y.ordered();
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [xs.forward(x_lo), ys.forward(y_lo)],
                    [xs.forward(x_hi), ys.forward(y_hi)],
                ));
            }

            for curve in &area.curves {
                let points: PlotPoints = curve
                    .points(xs, ys)
                    .map(|(x, y)| [xs.forward(x), ys.forward(y)])
                    .collect();
                let color = color32(curve.color);

                match curve.style {
                    CurveStyle::Line(style) => {
                        let mut line = Line::new(points).color(color).width(1.5);
                        if style == LineStyle::Dashed {
                            line = line.style(egui_plot::LineStyle::dashed_loose());
                        }
                        if let Some(label) = &curve.label {
                            line = line.name(label);
                        }
                        plot_ui.line(line);
                    }
                    CurveStyle::Scatter => {
                        plot_ui.points(Points::new(points).color(color).radius(2.5));
                    }
                }
            }
        });
    }
}

impl eframe::App for ChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let n = self.chart.areas.len().max(1) as f32;
            // leave room for each area's title row
            let height = (ui.available_height() / n - 24.0).max(80.0);
            for idx in 0..self.chart.areas.len() {
                self.area_plot(ui, idx, height);
            }
        });
        self.bounds_applied = true;
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Log axes and overridden locators need explicit grid marks; plain linear
/// axes keep egui's own spacing.
fn needs_spacer(axis: &Axis) -> bool {
    axis.scale == Scale::Log || axis.ticks.is_some()
}

fn tick_spacer(axis: Axis) -> impl Fn(GridInput) -> Vec<GridMark> {
    move |input: GridInput| {
        let scale = axis.scale;
        let (lo, hi) = input.bounds;
        let view = crate::chart::Limits::new(scale.inverse(lo), scale.inverse(hi));

        let major: Vec<f64> = axis
            .major_ticks(view)
            .into_iter()
            .map(|v| scale.forward(v))
            .collect();
        let step = match major.as_slice() {
            [a, b, ..] => (b - a).abs(),
            _ => (hi - lo).abs().max(f64::EPSILON),
        };

        let mut marks: Vec<GridMark> = major
            .into_iter()
            .map(|value| GridMark {
                value,
                step_size: step,
            })
            .collect();
        marks.extend(axis.minor_ticks(view).into_iter().map(|v| GridMark {
            value: scale.forward(v),
            step_size: step / 10.0,
        }));
        marks
    }
}

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

fn legend_corner(corner: Corner) -> egui_plot::Corner {
    match corner {
        Corner::UpperRight => egui_plot::Corner::RightTop,
        Corner::UpperLeft => egui_plot::Corner::LeftTop,
        Corner::LowerLeft => egui_plot::Corner::LeftBottom,
        Corner::LowerRight => egui_plot::Corner::RightBottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Limits, TickLocator};

    #[test]
    fn headless_viewer_is_a_no_op() {
        let chart = Chart::single(
            "t",
            crate::chart::PlotArea::new(Axis::new("x"), Axis::new("y")),
        );
        assert!(HeadlessViewer.show(&chart).is_ok());
    }

    #[test]
    fn spacer_only_for_log_or_overridden_axes() {
        assert!(!needs_spacer(&Axis::new("t")));
        assert!(needs_spacer(&Axis::new("f").log()));
        let mut axis = Axis::new("v");
        axis.ticks = Some(TickLocator::MaxN(4));
        assert!(needs_spacer(&axis));
    }

    #[test]
    fn log_axis_marks_sit_on_decades() {
        let axis = Axis::new("f").log();
        let majors: Vec<f64> = axis
            .major_ticks(Limits::new(10.0, 1e4))
            .into_iter()
            .map(|v| Scale::Log.forward(v))
            .collect();
        assert_eq!(majors.len(), 4);
        for (mark, expected) in majors.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert!((mark - expected).abs() < 1e-12);
        }
    }
}
