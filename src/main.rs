//! Binary entry point: resolve the config, start file logging, load the
//! profile database, and drive the Ratatui frame loop until the user exits.
use anyhow::Context;
use profile_name_editor::config::Config;
use profile_name_editor::{logging, run_app, App, DatabaseStore};

/// A database that cannot be loaded is not an early exit: the app opens in
/// its error screen and waits for the exit button, like the host tool does.
fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = logging::init(&config)?;

    let mut app = match DatabaseStore::load(&config.database_path) {
        Ok(store) => App::new(store),
        Err(err) => App::failed(&err),
    };
    run_app(&mut app, config.frames_per_second)
}
