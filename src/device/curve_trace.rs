use super::{Device, require_columns};
use crate::chart::{Axis, Chart, Curve, Grid, PlotArea, TickLocator};
use crate::color::RED;
use crate::data::Table;
use crate::error::Result;
use crate::params::Params;

pub const CURRENT_LABEL: &str = "I_C (A)";

/// Columns: voltage, current.  A bare scatter plot with no legend.
pub fn render(table: &Table, params: &Params) -> Result<Chart> {
    require_columns(table, Device::CurveTrace, 2..=2)?;

    let color = params.color_or("color_1", RED)?;
    let title = params.str_or("title", "Graph")?;

    let mut x = Axis::new("Voltage (V)");
    x.limits = params.range("x_range")?;
    x.ticks = params.count("x_ticks")?.map(TickLocator::Bins);

    let mut y = Axis::new(CURRENT_LABEL);
    y.limits = params.range("y_range")?;
    y.ticks = params.count("y_ticks")?.map(TickLocator::Bins);

    let voltage = &table.columns[0];
    let current = &table.columns[1];

    let area = PlotArea::new(x, y)
        .title(&title)
        .curve(Curve::scatter(&voltage.values, &current.values, color))
        .grid(Grid::default());

    Ok(Chart::single(title, area))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::CurveStyle;
    use crate::device::fixtures::table;
    use serde_json::json;

    #[test]
    fn scatter_without_legend() {
        let chart = render(&table(&["V", "I"], 10), &Params::new()).unwrap();
        let area = &chart.areas[0];
        assert_eq!(area.curves.len(), 1);
        assert_eq!(area.curves[0].style, CurveStyle::Scatter);
        assert_eq!(area.curves[0].label, None);
        assert_eq!(area.curves[0].color, RED);
        assert!(area.legend.is_none());
        assert!(area.grid.is_some());
    }

    #[test]
    fn axis_labels_are_fixed() {
        let chart = render(&table(&["Vce", "Ic"], 2), &Params::new()).unwrap();
        let area = &chart.areas[0];
        assert_eq!(area.x.label, "Voltage (V)");
        assert_eq!(area.y.label, CURRENT_LABEL);
        assert_eq!(area.title.as_deref(), Some("Graph"));
    }

    #[test]
    fn legend_stays_off_even_with_every_option_set() {
        let params = Params::from_json(json!({
            "title": "2N3904",
            "color_1": "blue",
            "x_range": [0, 5],
            "y_range": [0, 0.05],
            "x_ticks": 5,
            "y_ticks": 5,
        }))
        .unwrap();
        let chart = render(&table(&["V", "I"], 4), &params).unwrap();
        let area = &chart.areas[0];
        assert!(area.legend.is_none());
        assert_eq!(area.title.as_deref(), Some("2N3904"));
        assert_eq!(area.x.ticks, Some(TickLocator::Bins(5)));
        assert!(area.y.limits.is_some());
    }

    #[test]
    fn requires_two_columns() {
        assert!(render(&table(&["V", "I", "T"], 2), &Params::new()).is_err());
    }
}
