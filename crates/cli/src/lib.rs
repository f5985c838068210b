// Filer storage
pub mod database;
pub mod filer;

// App state (configuration, paths) and logging
pub mod logging;
pub mod state;

pub use database::{Database, DatabaseSetupError, EntryChange, FilerEntry};
pub use filer::{PullError, PullSummary, SqliteFiler};
pub use logging::{init_logging, LogConfig};
pub use state::{AppConfig, AppState, StateError};
