use std::borrow::Cow;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, anyhow};
use plotters::coord::Shift;
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::chart::{Chart, Corner, CurveStyle, LineStyle, PlotArea, Scale, View, format_tick};
use crate::color::Rgb;
use crate::error::PlotError;

const GRID_MAJOR: RGBColor = RGBColor(176, 176, 176);
const GRID_MINOR: RGBColor = RGBColor(222, 222, 222);
const LINE_WIDTH: u32 = 2;
const MARKER_RADIUS: i32 = 3;
const LEGEND_SWATCH: i32 = 20;
/// egui ships this face with its default fonts.
const BUNDLED_FONT: &str = "Ubuntu-Light";

// ---------------------------------------------------------------------------
// Output format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    Svg,
}

impl ImageFormat {
    /// Pick the format from the file extension.  A path without an extension
    /// gets `.png` appended.
    pub fn resolve(path: &Path) -> Result<(Self, PathBuf), PlotError> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Ok((ImageFormat::Png, path.with_extension("png")));
        };
        let format = match ext.to_ascii_lowercase().as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "bmp" => ImageFormat::Bmp,
            "svg" => ImageFormat::Svg,
            other => {
                return Err(PlotError::invalid(
                    "save_path",
                    format!("unsupported image format '.{other}' (use png, jpg, bmp or svg)"),
                ));
            }
        };
        Ok((format, path.to_path_buf()))
    }

    fn encoder(self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
            ImageFormat::Svg => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Render `chart` completely in memory, then write it to `path`.
pub fn write_chart(chart: &Chart, path: &Path, format: ImageFormat) -> Result<()> {
    ensure_font()?;
    let (width, height) = chart.size;

    match format.encoder() {
        None => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, chart.size).into_drawing_area();
                draw_chart(&root, chart)?;
            }
            std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
        }
        Some(encoder) => {
            let mut buffer = vec![0u8; width as usize * height as usize * 3];
            {
                let root = BitMapBackend::with_buffer(&mut buffer, chart.size).into_drawing_area();
                draw_chart(&root, chart)?;
            }
            let img = image::RgbImage::from_raw(width, height, buffer)
                .context("chart buffer has the wrong size")?;
            img.save_with_format(path, encoder)
                .with_context(|| format!("encoding {}", path.display()))?;
        }
    }

    log::debug!("Wrote {format:?} chart to {}", path.display());
    Ok(())
}

/// Plotters is built without system font lookup, so register egui's bundled
/// sans-serif face once per process.
fn ensure_font() -> Result<()> {
    static FONT: OnceLock<Result<(), String>> = OnceLock::new();
    FONT.get_or_init(|| {
        let fonts = eframe::egui::FontDefinitions::default();
        let data = fonts
            .font_data
            .get(BUNDLED_FONT)
            .ok_or_else(|| format!("font '{BUNDLED_FONT}' is not bundled"))?;
        let bytes: &'static [u8] = match &data.font {
            Cow::Borrowed(bytes) => *bytes,
            Cow::Owned(bytes) => &*Box::leak(bytes.clone().into_boxed_slice()),
        };
        plotters::style::register_font("sans-serif", FontStyle::Normal, bytes)
            .map_err(|_| format!("font '{BUNDLED_FONT}' could not be parsed"))
    })
    .clone()
    .map_err(|e| anyhow!(e))
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Draw every area of `chart`, stacked top to bottom, onto `root`.
pub fn draw_chart<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, chart: &Chart) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let panels = root.split_evenly((chart.areas.len().max(1), 1));
    for (idx, (panel, area)) in panels.iter().zip(&chart.areas).enumerate() {
        let view = chart
            .view(idx)
            .ok_or_else(|| anyhow!("chart area {idx} has no view"))?;
        draw_area(panel, area, &view)?;
    }

    root.present()?;
    Ok(())
}

fn draw_area<DB: DrawingBackend>(panel: &DrawingArea<DB, Shift>, area: &PlotArea, view: &View) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let (xs, ys) = (area.x.scale, area.y.scale);

    // Log axes are drawn in log10 space; labels map back to data values.
    let x_range = xs.forward(view.x.min)..xs.forward(view.x.max);
    let y_range = ys.forward(view.y.min)..ys.forward(view.y.max);
    let x_major: Vec<f64> = area.x.major_ticks(view.x).into_iter().map(|v| xs.forward(v)).collect();
    let y_major: Vec<f64> = area.y.major_ticks(view.y).into_iter().map(|v| ys.forward(v)).collect();

    let mut builder = ChartBuilder::on(panel);
    builder.margin(12).x_label_area_size(40).y_label_area_size(64);
    if let Some(title) = &area.title {
        builder.caption(title, ("sans-serif", 18));
    }
    let mut chart = builder.build_cartesian_2d(
        TickedRange::new(x_range.clone(), x_major.clone(), xs),
        TickedRange::new(y_range.clone(), y_major.clone(), ys),
    )?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(area.x.label.as_str())
        .y_desc(area.y.label.as_str())
        .x_label_formatter(&|v| format_tick(xs.inverse(*v)))
        .y_label_formatter(&|v| format_tick(ys.inverse(*v)))
        .label_style(("sans-serif", 12))
        .draw()?;

    if let Some(grid) = area.grid {
        let x_minor: Vec<f64> = if grid.minor {
            area.x.minor_ticks(view.x).into_iter().map(|v| xs.forward(v)).collect()
        } else {
            Vec::new()
        };
        let y_minor: Vec<f64> = if grid.minor {
            area.y.minor_ticks(view.y).into_iter().map(|v| ys.forward(v)).collect()
        } else {
            Vec::new()
        };

        let width = grid.line_width.ceil().max(1.0) as u32;
        let mut lines = Vec::new();
        for (ticks, color) in [(&x_minor, GRID_MINOR), (&x_major, GRID_MAJOR)] {
            for x in ticks {
                lines.push(([(*x, y_range.start), (*x, y_range.end)], color));
            }
        }
        for (ticks, color) in [(&y_minor, GRID_MINOR), (&y_major, GRID_MAJOR)] {
            for y in ticks {
                lines.push(([(x_range.start, *y), (x_range.end, *y)], color));
            }
        }
        for (points, color) in lines {
            if grid.dashed {
                chart.draw_series(DashedLineSeries::new(points, 4, 3, color.stroke_width(width)))?;
            } else {
                chart.draw_series(LineSeries::new(points, color.stroke_width(width)))?;
            }
        }
    }

    for curve in &area.curves {
        let color = rgb(curve.color);
        let points: Vec<(f64, f64)> = curve
            .points(xs, ys)
            .map(|(x, y)| (xs.forward(x), ys.forward(y)))
            .collect();

        let drawn = match curve.style {
            CurveStyle::Line(LineStyle::Solid) => {
                chart.draw_series(LineSeries::new(points, color.stroke_width(LINE_WIDTH)))?
            }
            CurveStyle::Line(LineStyle::Dashed) => chart.draw_series(DashedLineSeries::new(
                points,
                8,
                5,
                color.stroke_width(LINE_WIDTH),
            ))?,
            CurveStyle::Scatter => chart.draw_series(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, MARKER_RADIUS, color.filled())),
            )?,
        };

        if let Some(label) = &curve.label {
            drawn.label(label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + LEGEND_SWATCH, y)], color.stroke_width(LINE_WIDTH))
            });
        }
    }

    let has_labels = area.curves.iter().any(|c| c.label.is_some());
    if let (Some(corner), true) = (area.legend_corner(view), has_labels) {
        chart
            .configure_series_labels()
            .position(label_position(corner))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(("sans-serif", 12))
            .draw()?;
    }

    Ok(())
}

/// A drawing-space axis range whose ticks come from the chart model and whose
/// labels are printed in data units.
struct TickedRange {
    inner: RangedCoordf64,
    ticks: Vec<f64>,
    scale: Scale,
}

impl TickedRange {
    fn new(range: Range<f64>, ticks: Vec<f64>, scale: Scale) -> Self {
        TickedRange {
            inner: range.into(),
            ticks,
            scale,
        }
    }
}

impl Ranged for TickedRange {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

impl ValueFormatter<f64> for TickedRange {
    fn format(value: &f64) -> String {
        format_tick(*value)
    }

    fn format_ext(&self, value: &f64) -> String {
        format_tick(self.scale.inverse(*value))
    }
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}

fn label_position(corner: Corner) -> SeriesLabelPosition {
    match corner {
        Corner::UpperRight => SeriesLabelPosition::UpperRight,
        Corner::UpperLeft => SeriesLabelPosition::UpperLeft,
        Corner::LowerLeft => SeriesLabelPosition::LowerLeft,
        Corner::LowerRight => SeriesLabelPosition::LowerRight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Axis, Curve, Grid, LegendPosition, TickLocator};
    use crate::color::RED;

    #[test]
    fn format_follows_extension() {
        let (f, p) = ImageFormat::resolve(Path::new("out/plot.PNG")).unwrap();
        assert_eq!((f, p), (ImageFormat::Png, PathBuf::from("out/plot.PNG")));
        assert_eq!(ImageFormat::resolve(Path::new("a.jpeg")).unwrap().0, ImageFormat::Jpeg);
        assert_eq!(ImageFormat::resolve(Path::new("a.svg")).unwrap().0, ImageFormat::Svg);
    }

    #[test]
    fn missing_extension_becomes_png() {
        let (f, p) = ImageFormat::resolve(Path::new("plots/bode")).unwrap();
        assert_eq!(f, ImageFormat::Png);
        assert_eq!(p, PathBuf::from("plots/bode.png"));
    }

    #[test]
    fn ticked_range_keeps_model_ticks_and_data_labels() {
        let range = TickedRange::new(1.0..4.0, vec![1.0, 2.0, 3.0, 4.0], Scale::Log);
        assert_eq!(range.key_points(3usize), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(range.range(), 1.0..4.0);
        assert_eq!(range.format_ext(&3.0), "1000");
        assert_eq!(range.map(&1.0, (0, 300)), 0);
        assert_eq!(range.map(&4.0, (0, 300)), 300);
    }

    #[test]
    fn log_axes_with_tick_overrides_render() {
        let freq = [10.0, 100.0, 1e3, 1e4, 1e5];
        let mut x = Axis::new("Frequency (Hz)").log();
        x.ticks = Some(TickLocator::Log { base: 10.0, numticks: 4 });
        let mut y = Axis::new("Phase (deg)");
        y.ticks = Some(TickLocator::MaxN(5));
        let top = PlotArea::new(x.clone(), y.clone())
            .title("Phase")
            .curve(Curve::line("th", &freq, &[-80.0, -45.0, 0.0, 45.0, 80.0], RED))
            .grid(Grid::default())
            .legend(LegendPosition::Best);
        y.ticks = Some(TickLocator::MaxN(3));
        let mut log_y = y.log();
        log_y.label = "Magnitude".into();
        let bottom = PlotArea::new(x, log_y)
            .curve(Curve::line("mag", &freq, &[1.0, 2.0, 5.0, 20.0, 50.0], RED).dashed());
        let chart = Chart::stacked("bode", vec![top, bottom]);

        let dir = tempfile::tempdir().unwrap();
        for name in ["bode.png", "bode.svg"] {
            let path = dir.path().join(name);
            let (format, path) = ImageFormat::resolve(&path).unwrap();
            write_chart(&chart, &path, format).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }

    #[test]
    fn unknown_extension_is_invalid() {
        let err = ImageFormat::resolve(Path::new("plot.tiff")).unwrap_err();
        assert!(matches!(err, PlotError::InvalidParameter { .. }));
    }
}
