//! Binary entry point: resolve configuration, start logging, open the SQLite
//! store and hand the terminal to the controller until the user exits.
use records_tui::db::open_database;
use records_tui::{init_logging, run_app, Config, Controller, SqliteStore};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_logging(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting session");

    let conn = open_database(&config.db_path())?;
    let mut controller = Controller::new(SqliteStore::new(conn), config.timing);

    let result = run_app(&mut controller);
    if let Err(err) = &result {
        error!(error = %err, "terminal session failed");
    }
    result
}
