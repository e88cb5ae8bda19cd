//! Tick placement.
//!
//! Three locator families:
//!
//! * [`TickLocator::Bins`] tunes whatever locator the axis already has – a
//!   "nice number" locator on linear axes, a decade locator on log axes.
//! * [`TickLocator::Log`] always places ticks on integer powers of the base,
//!   even on a linear axis.
//! * [`TickLocator::MaxN`] always places at most `n + 1` "nice number" ticks,
//!   even on a log axis.

use super::{Scale, TickLocator};

/// Bin count used when an axis has no tick override.
pub const DEFAULT_BINS: usize = 8;
/// Tick count used for log axes without an override.
pub const DEFAULT_LOG_TICKS: usize = 9;

/// Upper bound on ticks per axis.
pub const MAX_TICKS: usize = 1000;

const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Major tick positions (data space) within `[lo, hi]`.
pub fn major_ticks(locator: Option<&TickLocator>, scale: Scale, lo: f64, hi: f64) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let ticks = match (locator, scale) {
        (None, Scale::Linear) => nice_ticks(lo, hi, DEFAULT_BINS),
        (None, Scale::Log) => log_ticks(lo, hi, 10.0, DEFAULT_LOG_TICKS),
        (Some(TickLocator::Bins(n)), Scale::Linear) => nice_ticks(lo, hi, *n),
        (Some(TickLocator::Bins(n)), Scale::Log) => log_ticks(lo, hi, 10.0, n + 1),
        (Some(TickLocator::Log { base, numticks }), _) => log_ticks(lo, hi, *base, *numticks),
        (Some(TickLocator::MaxN(n)), _) => nice_ticks(lo, hi, *n),
    };

    match scale {
        Scale::Linear => ticks,
        Scale::Log => ticks.into_iter().filter(|t| *t > 0.0).collect(),
    }
}

/// Minor tick positions for a log axis: 2..9 × each decade.
pub fn minor_log_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if hi <= 0.0 || !hi.is_finite() {
        return Vec::new();
    }
    let lo = if lo > 0.0 { lo } else { hi / 1e3 };
    let first = lo.log10().floor() as i32;
    let last = hi.log10().ceil() as i32;

    let mut ticks = Vec::new();
    for exp in first..=last {
        let decade = 10f64.powi(exp);
        for m in 2..=9 {
            let v = decade * m as f64;
            if v >= lo && v <= hi {
                ticks.push(v);
            }
        }
    }
    ticks
}

/// At most `nbins + 1` ticks on multiples of 1, 2, 2.5 or 5 × 10^k.
pub fn nice_ticks(lo: f64, hi: f64, nbins: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    if hi <= lo {
        return vec![lo];
    }

    let raw = (hi - lo) / nbins.clamp(1, MAX_TICKS) as f64;
    let scale = 10f64.powf(raw.log10().floor());
    let step = NICE_STEPS
        .iter()
        .map(|s| s * scale)
        .find(|s| *s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * scale);

    let eps = step * 1e-9;
    let first = ((lo - eps) / step).ceil() as i64;
    let last = ((hi + eps) / step).floor() as i64;

    // snap away float noise such as 0.30000000000000004
    let decimals = (3 - step.log10().floor() as i32).max(0);
    let snap = 10f64.powi(decimals);

    (first..=last)
        .map(|k| {
            let v = (k as f64 * step * snap).round() / snap;
            if v == 0.0 { 0.0 } else { v }
        })
        .collect()
}

/// Ticks on integer powers of `base`, thinned to roughly `numticks`.
pub fn log_ticks(lo: f64, hi: f64, base: f64, numticks: usize) -> Vec<f64> {
    if hi <= 0.0 || !hi.is_finite() || base <= 1.0 {
        return Vec::new();
    }
    let numticks = numticks.clamp(1, MAX_TICKS);
    let lo = if lo > 0.0 {
        lo
    } else {
        hi / base.powi(numticks as i32 - 1)
    };

    let eps = 1e-9;
    let first = (lo.log(base) - eps).ceil() as i32;
    let last = (hi.log(base) + eps).floor() as i32;
    if last < first {
        // no whole power inside the range
        return nice_ticks(lo, hi, numticks);
    }

    let decades = (last - first) as usize;
    let stride = if numticks > 1 {
        decades.div_ceil(numticks - 1).max(1)
    } else {
        decades.max(1)
    };

    (first..=last)
        .step_by(stride)
        .map(|exp| base.powi(exp))
        .collect()
}
