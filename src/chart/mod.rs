//! Chart model shared by the renderers, the image writer and the viewer.
//!
//! A renderer builds a [`Chart`] from a table; the output sink either
//! rasterizes it or shows it in a window.  Nothing here draws.

pub mod ticks;

use crate::color::Rgb;

/// Fraction of the data span added on each side when autoscaling.
pub const AUTOSCALE_MARGIN: f64 = 0.05;

/// Pixel size of a single-area chart.
pub const SINGLE_SIZE: (u32, u32) = (640, 480);
/// Pixel size of a chart with stacked areas.
pub const STACKED_SIZE: (u32, u32) = (1000, 800);

// ---------------------------------------------------------------------------
// Axis description
// ---------------------------------------------------------------------------

/// An axis interval as given by the user; `min > max` flips the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    pub fn new(min: f64, max: f64) -> Self {
        Limits { min, max }
    }

    /// `(low, high)` regardless of orientation.
    pub fn ordered(&self) -> (f64, f64) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

impl Scale {
    /// Map a data value into the linear drawing space.
    pub fn forward(self, v: f64) -> f64 {
        match self {
            Scale::Linear => v,
            Scale::Log => v.log10(),
        }
    }

    pub fn inverse(self, v: f64) -> f64 {
        match self {
            Scale::Linear => v,
            Scale::Log => 10f64.powf(v),
        }
    }

    /// Whether a data value can be shown on this scale.
    pub fn accepts(self, v: f64) -> bool {
        v.is_finite() && (self == Scale::Linear || v > 0.0)
    }
}

/// How major ticks are placed when the user overrides the default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickLocator {
    /// Target bin count for the axis' own locator.
    Bins(usize),
    /// Ticks on powers of `base`, about `numticks` of them.
    Log { base: f64, numticks: usize },
    /// At most `n` intervals of "nice" numbers.
    MaxN(usize),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axis {
    pub label: String,
    pub scale: Scale,
    /// `None` leaves the range to autoscaling.
    pub limits: Option<Limits>,
    /// `None` keeps the default locator.
    pub ticks: Option<TickLocator>,
}

impl Axis {
    pub fn new(label: impl Into<String>) -> Self {
        Axis {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn log(mut self) -> Self {
        self.scale = Scale::Log;
        self
    }

    /// Major tick positions for the given visible range.
    pub fn major_ticks(&self, view: Limits) -> Vec<f64> {
        let (lo, hi) = view.ordered();
        ticks::major_ticks(self.ticks.as_ref(), self.scale, lo, hi)
    }

    /// Minor tick positions; only log axes have them.
    pub fn minor_ticks(&self, view: Limits) -> Vec<f64> {
        match self.scale {
            Scale::Linear => Vec::new(),
            Scale::Log => {
                let (lo, hi) = view.ordered();
                ticks::minor_log_ticks(lo, hi)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveStyle {
    Line(LineStyle),
    /// Unconnected markers.
    Scatter,
}

/// One trace: an x/y series drawn in a single colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Legend text; `None` keeps the curve out of the legend.
    pub label: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Rgb,
    pub style: CurveStyle,
}

impl Curve {
    pub fn line(label: &str, x: &[f64], y: &[f64], color: Rgb) -> Self {
        Curve {
            label: Some(label.to_string()),
            x: x.to_vec(),
            y: y.to_vec(),
            color,
            style: CurveStyle::Line(LineStyle::Solid),
        }
    }

    pub fn scatter(x: &[f64], y: &[f64], color: Rgb) -> Self {
        Curve {
            label: None,
            x: x.to_vec(),
            y: y.to_vec(),
            color,
            style: CurveStyle::Scatter,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.style = CurveStyle::Line(LineStyle::Dashed);
        self
    }

    /// Points that are representable on the given axis scales.
    pub fn points(&self, x_scale: Scale, y_scale: Scale) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(x, y)| (*x, *y))
            .filter(move |(x, y)| x_scale.accepts(*x) && y_scale.accepts(*y))
    }
}

// ---------------------------------------------------------------------------
// Plot area
// ---------------------------------------------------------------------------

/// Grid appearance; `which = both` means minor lines are drawn where the
/// axis has minor ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub dashed: bool,
    pub line_width: f32,
    pub minor: bool,
}

impl Default for Grid {
    fn default() -> Self {
        Grid {
            dashed: true,
            line_width: 0.7,
            minor: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    At(Corner),
    /// The corner covering the fewest data points.
    Best,
}

/// One rectangular region with its own axes and traces.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotArea {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub curves: Vec<Curve>,
    pub grid: Option<Grid>,
    pub legend: Option<LegendPosition>,
}

impl PlotArea {
    pub fn new(x: Axis, y: Axis) -> Self {
        PlotArea {
            title: None,
            x,
            y,
            curves: Vec::new(),
            grid: None,
            legend: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn curve(mut self, curve: Curve) -> Self {
        self.curves.push(curve);
        self
    }

    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn legend(mut self, position: LegendPosition) -> Self {
        self.legend = Some(position);
        self
    }

    /// Autoscaled Y range over this area's curves.
    fn auto_y(&self) -> Limits {
        let ys = self
            .curves
            .iter()
            .flat_map(|c| c.points(self.x.scale, self.y.scale).map(|(_, y)| y));
        autoscale(ys, self.y.scale)
    }

    /// Resolve where the legend goes for the given view.
    pub fn legend_corner(&self, view: &View) -> Option<Corner> {
        match self.legend? {
            LegendPosition::At(corner) => Some(corner),
            LegendPosition::Best => Some(self.least_crowded_corner(view)),
        }
    }

    fn least_crowded_corner(&self, view: &View) -> Corner {
        let (x_lo, x_hi) = view.x.ordered();
        let (y_lo, y_hi) = view.y.ordered();
        let x_mid = self.x.scale.forward(x_lo) / 2.0 + self.x.scale.forward(x_hi) / 2.0;
        let y_mid = self.y.scale.forward(y_lo) / 2.0 + self.y.scale.forward(y_hi) / 2.0;

        let mut counts = [0usize; 4];
        for curve in &self.curves {
            for (x, y) in curve.points(self.x.scale, self.y.scale) {
                if x < x_lo || x > x_hi || y < y_lo || y > y_hi {
                    continue;
                }
                let right = self.x.scale.forward(x) >= x_mid;
                let upper = self.y.scale.forward(y) >= y_mid;
                let idx = match (upper, right) {
                    (true, true) => 0,
                    (true, false) => 1,
                    (false, false) => 2,
                    (false, true) => 3,
                };
                counts[idx] += 1;
            }
        }

        let corners = [
            Corner::UpperRight,
            Corner::UpperLeft,
            Corner::LowerLeft,
            Corner::LowerRight,
        ];
        let best = (0..4).min_by_key(|i| counts[*i]).unwrap_or(0);
        corners[best]
    }
}

/// Resolved visible range of one area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub x: Limits,
    pub y: Limits,
}

// ---------------------------------------------------------------------------
// Chart
// ---------------------------------------------------------------------------

/// A complete figure: one area, or several stacked top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub window_title: String,
    pub size: (u32, u32),
    pub areas: Vec<PlotArea>,
    /// Stacked areas autoscale X over the union of their data.
    pub shared_x: bool,
}

impl Chart {
    pub fn single(window_title: impl Into<String>, area: PlotArea) -> Self {
        Chart {
            window_title: window_title.into(),
            size: SINGLE_SIZE,
            areas: vec![area],
            shared_x: false,
        }
    }

    pub fn stacked(window_title: impl Into<String>, areas: Vec<PlotArea>) -> Self {
        Chart {
            window_title: window_title.into(),
            size: STACKED_SIZE,
            areas,
            shared_x: true,
        }
    }

    /// Visible range of area `idx`: user limits where given, autoscaled
    /// otherwise.
    pub fn view(&self, idx: usize) -> Option<View> {
        let area = self.areas.get(idx)?;

        let auto_x = || {
            let sources: Vec<&PlotArea> = if self.shared_x {
                self.areas.iter().collect()
            } else {
                vec![area]
            };
            let x_scale = area.x.scale;
            let xs = sources.iter().copied().flat_map(|a| {
                let y_scale = a.y.scale;
                a.curves
                    .iter()
                    .flat_map(move |c| c.points(x_scale, y_scale).map(|(x, _)| x))
            });
            autoscale(xs, x_scale)
        };
        let x = resolve_limits(area.x.limits, area.x.scale, auto_x);
        let y = resolve_limits(area.y.limits, area.y.scale, || area.auto_y());

        Some(View { x, y })
    }

    /// Number of curves over all areas.
    pub fn curve_count(&self) -> usize {
        self.areas.iter().map(|a| a.curves.len()).sum()
    }
}

/// User limits if given; on a log axis a non-positive end falls back to the
/// autoscaled value.
fn resolve_limits(user: Option<Limits>, scale: Scale, auto: impl FnOnce() -> Limits) -> Limits {
    let Some(lim) = user else {
        return auto();
    };
    if scale == Scale::Log && (lim.min <= 0.0 || lim.max <= 0.0) {
        let fallback = auto();
        log::warn!("Ignoring non-positive limit on a log axis: [{}, {}]", lim.min, lim.max);
        return Limits::new(
            if lim.min > 0.0 { lim.min } else { fallback.min },
            if lim.max > 0.0 { lim.max } else { fallback.max },
        );
    }
    lim
}

/// Data range padded by [`AUTOSCALE_MARGIN`] in drawing space.
pub fn autoscale(values: impl Iterator<Item = f64>, scale: Scale) -> Limits {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values.filter(|v| scale.accepts(*v)) {
        let t = scale.forward(v);
        lo = lo.min(t);
        hi = hi.max(t);
    }

    if lo > hi {
        return match scale {
            Scale::Linear => Limits::new(0.0, 1.0),
            Scale::Log => Limits::new(1.0, 10.0),
        };
    }

    let (lo, hi) = if hi - lo < f64::EPSILON {
        let pad = match scale {
            Scale::Linear if lo.abs() > f64::EPSILON => lo.abs() * AUTOSCALE_MARGIN,
            Scale::Linear => 0.1,
            Scale::Log => 1.0,
        };
        (lo - pad, hi + pad)
    } else {
        let pad = (hi - lo) * AUTOSCALE_MARGIN;
        (lo - pad, hi + pad)
    };

    Limits::new(scale.inverse(lo), scale.inverse(hi))
}

/// Tick label text: plain decimals in the usual range, exponent form for
/// very large or very small magnitudes.
pub fn format_tick(v: f64) -> String {
    if !v.is_finite() {
        return String::new();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    // drop noise picked up going through log space and back
    let a = v.abs();
    let mag = 10f64.powi(9 - a.log10().floor() as i32);
    let snapped = (v * mag).round() / mag;
    let v = if snapped.is_finite() && snapped != 0.0 { snapped } else { v };

    if !(1e-3..1e5).contains(&a) {
        format!("{v:e}")
    } else {
        format!("{v}")
    }
}
