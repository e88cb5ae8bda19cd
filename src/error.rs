use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// PlotError – everything the pipeline reports back to the session
// ---------------------------------------------------------------------------

/// Errors surfaced by [`crate::pipeline::plot_from_csv`].
///
/// None of these are fatal to an interactive session; the driver reports
/// them and prompts again.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("The file {} does not exist.", .0.display())]
    FileNotFound(PathBuf),

    #[error(
        "Unsupported device type '{0}'. Please use 'oscilloscope', 'network_analyzer', \
         'impedance_analyzer' or 'curve_trace'."
    )]
    UnsupportedDevice(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The three user-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingFile,
    InvalidValue,
    Unexpected,
}

impl PlotError {
    pub fn invalid(key: &str, reason: impl Into<String>) -> Self {
        PlotError::InvalidParameter {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PlotError::FileNotFound(_) => ErrorKind::MissingFile,
            PlotError::UnsupportedDevice(_) | PlotError::InvalidParameter { .. } => {
                ErrorKind::InvalidValue
            }
            PlotError::Other(_) => ErrorKind::Unexpected,
        }
    }
}

pub type Result<T, E = PlotError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        assert_eq!(
            PlotError::FileNotFound("x.csv".into()).kind(),
            ErrorKind::MissingFile
        );
        assert_eq!(
            PlotError::UnsupportedDevice("spectrometer".into()).kind(),
            ErrorKind::InvalidValue
        );
        assert_eq!(
            PlotError::invalid("x_range", "expected two numbers").kind(),
            ErrorKind::InvalidValue
        );
        assert_eq!(
            PlotError::from(anyhow::anyhow!("boom")).kind(),
            ErrorKind::Unexpected
        );
    }

    #[test]
    fn messages_name_the_offender() {
        let err = PlotError::UnsupportedDevice("spectrometer".into());
        assert!(err.to_string().contains("'spectrometer'"));

        let err = PlotError::invalid("xticks", "expected a positive integer");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'xticks': expected a positive integer"
        );
    }
}
