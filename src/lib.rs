//! Plot CSV exports from bench instruments: oscilloscopes, network
//! analyzers, impedance analyzers and curve tracers.
//!
//! ```text
//!   CSV file ──► data::load_table ──► device::dispatch ──► Chart
//!                                                          │
//!                                    output::save_chart ◄──┤
//!                                    ChartViewer::show  ◄──┘
//! ```

pub mod chart;
pub mod color;
pub mod data;
pub mod device;
pub mod error;
pub mod output;
pub mod params;
pub mod pipeline;
pub mod session;

pub use error::{ErrorKind, PlotError};
pub use params::Params;
pub use pipeline::{Rendered, plot_from_csv};
