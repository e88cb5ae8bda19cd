use super::{Device, require_columns};
use crate::chart::{Axis, Chart, Corner, Curve, Grid, LegendPosition, PlotArea, TickLocator};
use crate::color::{BLUE, ORANGE, RED};
use crate::data::Table;
use crate::error::Result;
use crate::params::Params;

/// Columns: time, CH1, CH2 and an optional math channel.
///
/// Keys: `title`, `color_1`..`color_3`, `x_range`, `y_range`, `x_ticks`, `y_ticks`.
pub fn render(table: &Table, params: &Params) -> Result<Chart> {
    require_columns(table, Device::Oscilloscope, 3..=usize::MAX)?;
    if table.width() > 4 {
        log::warn!(
            "Oscilloscope data has {} columns; only the first 4 are plotted",
            table.width()
        );
    }

    let colors = [
        params.color_or("color_1", ORANGE)?,
        params.color_or("color_2", BLUE)?,
        params.color_or("color_3", RED)?,
    ];
    let title = params.str_or("title", "Graph")?;

    let time = &table.columns[0];
    let mut x = Axis::new(&time.name);
    x.limits = params.range("x_range")?;
    x.ticks = params.count("x_ticks")?.map(TickLocator::Bins);

    let mut y = Axis::new("Voltage (V)");
    y.limits = params.range("y_range")?;
    y.ticks = params.count("y_ticks")?.map(TickLocator::Bins);

    let mut area = PlotArea::new(x, y)
        .title(&title)
        .grid(Grid::default())
        .legend(LegendPosition::At(Corner::UpperRight));

    for (channel, color) in table.columns[1..].iter().take(3).zip(colors) {
        area = area.curve(Curve::line(&channel.name, &time.values, &channel.values, color));
    }

    Ok(Chart::single(title, area))
}
