use super::{Device, require_columns};
use crate::chart::{Axis, Chart, Corner, Curve, Grid, LegendPosition, PlotArea, TickLocator};
use crate::color::{BLUE, ORANGE, RED};
use crate::data::Table;
use crate::error::Result;
use crate::params::Params;

/// Columns: frequency, CH1 magnitude, CH2 magnitude, CH2 phase.
///
/// Magnitude on top, phase below, both on a log frequency axis.
pub fn render(table: &Table, params: &Params) -> Result<Chart> {
    require_columns(table, Device::NetworkAnalyzer, 4..=4)?;

    let color_ch1_mag = params.color_or("color_ch1_mag", ORANGE)?;
    let color_ch2_mag = params.color_or("color_ch2_mag", BLUE)?;
    let color_ch2_phase = params.color_or("color_ch2_phase", RED)?;

    let freq = &table.columns[0];
    let ch1_mag = &table.columns[1];
    let ch2_mag = &table.columns[2];
    let ch2_phase = &table.columns[3];

    let xlims = params.range("xlims")?;
    let xticks = params.count("xticks")?.map(TickLocator::Bins);
    let freq_axis = || {
        let mut axis = Axis::new(&freq.name).log();
        axis.limits = xlims;
        axis.ticks = xticks;
        axis
    };

    let mut mag_y = Axis::new("Magnitude (X)");
    mag_y.limits = params.range("ylims_mag")?;
    mag_y.ticks = params.count("yticks_mag")?.map(TickLocator::Bins);

    let magnitude = PlotArea::new(freq_axis(), mag_y)
        .title("Magnitude")
        .curve(Curve::line(&ch1_mag.name, &freq.values, &ch1_mag.values, color_ch1_mag))
        .curve(Curve::line(&ch2_mag.name, &freq.values, &ch2_mag.values, color_ch2_mag))
        .grid(Grid::default())
        .legend(LegendPosition::At(Corner::UpperRight));

    let mut phase_y = Axis::new("Phase (deg)");
    phase_y.limits = params.range("ylims_phase")?;
    phase_y.ticks = params.count("yticks_phase")?.map(TickLocator::Bins);

    let phase = PlotArea::new(freq_axis(), phase_y)
        .title("Phase")
        .curve(Curve::line(&ch2_phase.name, &freq.values, &ch2_phase.values, color_ch2_phase))
        .grid(Grid::default())
        .legend(LegendPosition::At(Corner::UpperRight));

    let title = params.str_or("title", Device::NetworkAnalyzer.display_name())?;
    Ok(Chart::stacked(title, vec![magnitude, phase]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Limits, Scale};
    use crate::device::fixtures::table;
    use serde_json::json;

    const HEADERS: [&str; 4] = ["Frequency (Hz)", "CH1 Magnitude (dB)", "CH2 Magnitude (dB)", "CH2 Phase (deg)"];

    #[test]
    fn two_log_scaled_areas_with_legends() {
        let chart = render(&table(&HEADERS, 6), &Params::new()).unwrap();
        assert_eq!(chart.areas.len(), 2);
        assert!(chart.shared_x);

        let (mag, phase) = (&chart.areas[0], &chart.areas[1]);
        assert_eq!(mag.curves.len(), 2);
        assert_eq!(phase.curves.len(), 1);
        assert_eq!(mag.y.label, "Magnitude (X)");
        assert_eq!(phase.y.label, "Phase (deg)");
        assert_eq!(mag.x.label, "Frequency (Hz)");
        for area in [mag, phase] {
            assert_eq!(area.x.scale, Scale::Log);
            assert!(area.legend.is_some());
            assert!(area.grid.is_some());
        }
        assert_eq!(phase.curves[0].label.as_deref(), Some("CH2 Phase (deg)"));
        assert_eq!(phase.curves[0].color, RED);
    }

    #[test]
    fn magnitude_limits_do_not_leak_into_phase() {
        let params = Params::from_json(json!({"ylims_mag": [0, 10]})).unwrap();
        let chart = render(&table(&HEADERS, 6), &params).unwrap();
        assert_eq!(chart.areas[0].y.limits, Some(Limits::new(0.0, 10.0)));
        assert_eq!(chart.areas[1].y.limits, None);
    }

    #[test]
    fn shared_keys_apply_to_both_areas() {
        let params = Params::from_json(json!({
            "xlims": [10, 1e6],
            "xticks": 5,
            "yticks_mag": 4,
            "ylims_phase": [-180, 180],
            "yticks_phase": 6,
        }))
        .unwrap();
        let chart = render(&table(&HEADERS, 6), &params).unwrap();
        for area in &chart.areas {
            assert_eq!(area.x.limits, Some(Limits::new(10.0, 1e6)));
            assert_eq!(area.x.ticks, Some(TickLocator::Bins(5)));
        }
        assert_eq!(chart.areas[0].y.ticks, Some(TickLocator::Bins(4)));
        assert_eq!(chart.areas[1].y.ticks, Some(TickLocator::Bins(6)));
        assert_eq!(chart.areas[1].y.limits, Some(Limits::new(-180.0, 180.0)));
    }

    #[test]
    fn requires_exactly_four_columns() {
        assert!(render(&table(&HEADERS[..3], 2), &Params::new()).is_err());
        assert!(render(&table(&["a", "b", "c", "d", "e"], 2), &Params::new()).is_err());
    }
}
