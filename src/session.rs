use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::device::Device;
use crate::error::{ErrorKind, PlotError};
use crate::output::ChartViewer;
use crate::params::Params;
use crate::pipeline::plot_from_csv;

const PATH_PROMPT: &str = "Enter the path to the CSV file (or 'q' to quit): ";
const DEVICE_PROMPT: &str =
    "Enter the device name (oscilloscope, network_analyzer, impedance_analyzer, curve_trace): ";
const TITLE_PROMPT: &str = "Enter the name of the plot: ";
const DIR_PROMPT: &str = "Enter the directory to save the plot: ";
const QUIT: &str = "q";

/// The interactive prompt loop.  Each completed cycle runs the pipeline once;
/// `q` at the path prompt or end of input finishes the session.
pub struct Session<R, W, V> {
    input: R,
    output: W,
    viewer: V,
}

impl<R: BufRead, W: Write, V: ChartViewer> Session<R, W, V> {
    pub fn new(input: R, output: W, viewer: V) -> Self {
        Session {
            input,
            output,
            viewer,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        while let Some(cycle) = self.ask()? {
            self.plot(&cycle)?;
        }
        writeln!(self.output, "Exiting the program.")?;
        self.output.flush()
    }

    pub fn into_inner(self) -> (R, W, V) {
        (self.input, self.output, self.viewer)
    }

    /// Collect one cycle's answers.  `None` ends the session.
    fn ask(&mut self) -> io::Result<Option<(String, Params)>> {
        let csv_path = loop {
            let Some(answer) = self.prompt(PATH_PROMPT)? else {
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case(QUIT) {
                return Ok(None);
            }
            if Path::new(&answer).exists() {
                break answer;
            }
            writeln!(self.output, "File does not exist")?;
        };

        let device = loop {
            let Some(answer) = self.prompt(DEVICE_PROMPT)? else {
                return Ok(None);
            };
            match answer.to_lowercase().parse::<Device>() {
                Ok(device) => break device,
                Err(_) => writeln!(
                    self.output,
                    "Error: Device not found. Please enter a valid device name."
                )?,
            }
        };

        let Some(title) = self.prompt(TITLE_PROMPT)? else {
            return Ok(None);
        };
        let Some(dir) = self.prompt(DIR_PROMPT)? else {
            return Ok(None);
        };

        let save_path = Path::new(&dir).join(format!("{title}.png"));
        let params = Params::new()
            .with("device", device.name())
            .with("title", title.as_str())
            .with("save_path", save_path.display().to_string());
        log::debug!("Session cycle: {csv_path} as {device}");

        Ok(Some((csv_path, params)))
    }

    fn plot(&mut self, (csv_path, params): &(String, Params)) -> io::Result<()> {
        match plot_from_csv(Path::new(csv_path), params, &mut self.viewer) {
            Ok(rendered) => {
                if let Some(path) = rendered.saved_to {
                    writeln!(self.output, "Plot saved to {}", path.display())?;
                }
                Ok(())
            }
            Err(e) => self.report(&e),
        }
    }

    fn report(&mut self, e: &PlotError) -> io::Result<()> {
        log::error!("{e:#}");
        match e.kind() {
            ErrorKind::MissingFile | ErrorKind::InvalidValue => writeln!(self.output, "Error: {e}"),
            ErrorKind::Unexpected => writeln!(self.output, "An unexpected error occurred: {e:#}"),
        }
    }

    /// Print `message` and read one trimmed line; `None` on end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
