use std::path::{Path, PathBuf};

use crate::chart::Chart;
use crate::data::load_table;
use crate::device::dispatch;
use crate::error::Result;
use crate::output::{ChartViewer, save_chart};
use crate::params::Params;

/// What one pipeline run produced.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub chart: Chart,
    /// Set when `save_path` was given and the image was written.
    pub saved_to: Option<PathBuf>,
}

/// Load `path`, render it for `params["device"]`, save the image if
/// `save_path` is set, then hand the chart to `viewer`.
///
/// Nothing is written when loading, dispatch or rendering fails.
pub fn plot_from_csv<V>(path: &Path, params: &Params, viewer: &mut V) -> Result<Rendered>
where
    V: ChartViewer + ?Sized,
{
    let table = load_table(path)?;
    let chart = dispatch(&table, params)?;
    log::debug!(
        "Built chart '{}' with {} area(s), {} curve(s)",
        chart.window_title,
        chart.areas.len(),
        chart.curve_count()
    );

    let saved_to = match params.save_path()? {
        Some(target) => Some(save_chart(&chart, &target)?),
        None => None,
    };

    viewer.show(&chart)?;
    Ok(Rendered { chart, saved_to })
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// Keeps every chart it is asked to show.
    #[derive(Debug, Default)]
    pub struct RecordingViewer {
        pub shown: Vec<Chart>,
    }

    impl ChartViewer for RecordingViewer {
        fn show(&mut self, chart: &Chart) -> anyhow::Result<()> {
            self.shown.push(chart.clone());
            Ok(())
        }
    }
}
