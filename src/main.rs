use std::io;

use instrument_plot::output::default_viewer;
use instrument_plot::session::Session;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), default_viewer());
    session.run()?;
    Ok(())
}
