use super::{Device, require_columns};
use crate::chart::{Axis, Chart, Curve, Grid, LegendPosition, PlotArea, TickLocator};
use crate::color::{BLUE, ORANGE, RED};
use crate::data::Table;
use crate::error::Result;
use crate::params::Params;

/// Columns: frequency, θ, Rs, Xs.
///
/// Top area: Rs (solid) and Xs (dashed) on a linear frequency axis.
/// Bottom area: θ on a log frequency axis. The analyzer's own display uses
/// the same split, so the two areas do not share a scale.
///
/// Tick overrides here are explicit locators rather than bin counts:
/// `xticks` places about that many ticks on powers of ten, `yticks_*` caps
/// the number of Y intervals.
pub fn render(table: &Table, params: &Params) -> Result<Chart> {
    require_columns(table, Device::ImpedanceAnalyzer, 4..=4)?;

    let color_trace_rs = params.color_or("color_trace_rs", ORANGE)?;
    let color_trace_xs = params.color_or("color_trace_xs", BLUE)?;
    let color_trace_th = params.color_or("color_trace_th", RED)?;

    let freq = &table.columns[0];
    let trace_th = &table.columns[1];
    let trace_rs = &table.columns[2];
    let trace_xs = &table.columns[3];

    let xlims = params.range("xlims")?;
    let xticks = params
        .count("xticks")?
        .map(|numticks| TickLocator::Log { base: 10.0, numticks });
    let freq_axis = || {
        let mut axis = Axis::new(&freq.name);
        axis.limits = xlims;
        axis.ticks = xticks;
        axis
    };

    let mut rs_xs_y = Axis::new("Resistance/Reactance (Ohm)");
    rs_xs_y.limits = params.range("ylims_rs_xs")?;
    rs_xs_y.ticks = params.count("yticks_rs_xs")?.map(TickLocator::MaxN);

    let rs_xs = PlotArea::new(freq_axis(), rs_xs_y)
        .title("Resistance (Rs) and Reactance (Xs) vs Frequency")
        .curve(Curve::line(&trace_rs.name, &freq.values, &trace_rs.values, color_trace_rs))
        .curve(Curve::line(&trace_xs.name, &freq.values, &trace_xs.values, color_trace_xs).dashed())
        .grid(Grid::default())
        .legend(LegendPosition::Best);

    let mut th_y = Axis::new("Phase (deg)");
    th_y.limits = params.range("ylims_th")?;
    th_y.ticks = params.count("yticks_th")?.map(TickLocator::MaxN);

    let th = PlotArea::new(freq_axis().log(), th_y)
        .title("Phase vs Frequency")
        .curve(Curve::line(&trace_th.name, &freq.values, &trace_th.values, color_trace_th))
        .grid(Grid::default())
        .legend(LegendPosition::Best);

    let title = params.str_or("title", Device::ImpedanceAnalyzer.display_name())?;
    Ok(Chart::stacked(title, vec![rs_xs, th]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{CurveStyle, Limits, LineStyle, Scale};
    use crate::device::fixtures::table;
    use serde_json::json;

    const HEADERS: [&str; 4] = ["Frequency (Hz)", "Trace Th (deg)", "Trace Rs (Ohm)", "Trace Xs (Ohm)"];

    #[test]
    fn top_axis_linear_bottom_axis_log() {
        let chart = render(&table(&HEADERS, 8), &Params::new()).unwrap();
        assert_eq!(chart.areas[0].x.scale, Scale::Linear);
        assert_eq!(chart.areas[1].x.scale, Scale::Log);
    }

    #[test]
    fn traces_land_in_the_right_areas() {
        let chart = render(&table(&HEADERS, 3), &Params::new()).unwrap();
        let top = &chart.areas[0];
        assert_eq!(top.curves.len(), 2);
        assert_eq!(top.curves[0].label.as_deref(), Some("Trace Rs (Ohm)"));
        assert_eq!(top.curves[0].style, CurveStyle::Line(LineStyle::Solid));
        assert_eq!(top.curves[1].label.as_deref(), Some("Trace Xs (Ohm)"));
        assert_eq!(top.curves[1].style, CurveStyle::Line(LineStyle::Dashed));
        assert_eq!((top.curves[0].color, top.curves[1].color), (ORANGE, BLUE));

        let bottom = &chart.areas[1];
        assert_eq!(bottom.curves.len(), 1);
        assert_eq!(bottom.curves[0].label.as_deref(), Some("Trace Th (deg)"));
        assert_eq!(bottom.curves[0].y, vec![11.0, 12.0, 13.0]);
        assert_eq!(bottom.y.label, "Phase (deg)");
    }

    #[test]
    fn tick_overrides_use_explicit_locators() {
        let params = Params::from_json(json!({
            "xticks": 6,
            "yticks_rs_xs": 5,
            "yticks_th": 3,
        }))
        .unwrap();
        let chart = render(&table(&HEADERS, 3), &params).unwrap();
        let log6 = Some(TickLocator::Log { base: 10.0, numticks: 6 });
        assert_eq!(chart.areas[0].x.ticks, log6);
        assert_eq!(chart.areas[1].x.ticks, log6);
        assert_eq!(chart.areas[0].y.ticks, Some(TickLocator::MaxN(5)));
        assert_eq!(chart.areas[1].y.ticks, Some(TickLocator::MaxN(3)));
    }

    #[test]
    fn limits_per_area() {
        let params = Params::from_json(json!({
            "xlims": [100, 1e5],
            "ylims_rs_xs": [-50, 50],
        }))
        .unwrap();
        let chart = render(&table(&HEADERS, 3), &params).unwrap();
        assert_eq!(chart.areas[0].x.limits, Some(Limits::new(100.0, 1e5)));
        assert_eq!(chart.areas[1].x.limits, Some(Limits::new(100.0, 1e5)));
        assert_eq!(chart.areas[0].y.limits, Some(Limits::new(-50.0, 50.0)));
        assert_eq!(chart.areas[1].y.limits, None);
    }

    #[test]
    fn colours_can_be_overridden() {
        let params = Params::from_json(json!({"color_trace_th": "#000000"})).unwrap();
        let chart = render(&table(&HEADERS, 3), &params).unwrap();
        assert_eq!(chart.areas[1].curves[0].color, palette::Srgb::new(0, 0, 0));
    }
}
