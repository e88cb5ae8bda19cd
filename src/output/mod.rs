//! Where finished charts go: an image file, a window, or both.

pub mod raster;
pub mod viewer;

use std::path::{Path, PathBuf};

use anyhow::Context;

pub use raster::ImageFormat;
pub use viewer::{ChartViewer, HeadlessViewer, WindowViewer, default_viewer};

use crate::chart::Chart;
use crate::error::PlotError;

/// Write `chart` to `path`, creating missing parent directories.  Returns the
/// path actually written (an extension-less path gains `.png`).
pub fn save_chart(chart: &Chart, path: &Path) -> Result<PathBuf, PlotError> {
    let (format, path) = ImageFormat::resolve(path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    raster::write_chart(chart, &path, format)?;

    log::info!("Plot saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{Axis, Curve, PlotArea};
    use crate::color::BLUE;

    fn sample_chart() -> Chart {
        let area = PlotArea::new(Axis::new("t"), Axis::new("v"))
            .title("sample")
            .curve(Curve::line("ch1", &[0.0, 1.0, 2.0], &[0.0, 1.0, 0.5], BLUE));
        Chart::single("sample", area)
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a").join("b").join("plot.png");

        let written = save_chart(&sample_chart(), &target).unwrap();
        assert_eq!(written, target);

        let img = image::open(&written).unwrap();
        assert_eq!((img.width(), img.height()), sample_chart().size);
    }

    #[test]
    fn extensionless_path_is_saved_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let written = save_chart(&sample_chart(), &dir.path().join("bode")).unwrap();
        assert_eq!(written, dir.path().join("bode.png"));
        assert!(written.exists());
    }

    #[test]
    fn svg_output_is_text() {
        let dir = tempfile::tempdir().unwrap();
        let written = save_chart(&sample_chart(), &dir.path().join("plot.svg")).unwrap();
        let svg = std::fs::read_to_string(written).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn unsupported_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("plot.gif");
        assert!(save_chart(&sample_chart(), &target).is_err());
        assert!(!dir.path().join("out").exists());
    }
}
