//! Persistence for task collections and configuration.
//!
//! Task lists live in a SQLite key-value table, configuration in a TOML
//! file. Both sit in the directory returned by [`data_dir`].

mod config;
pub mod database;
pub mod task_store;

pub use config::Config;
pub use database::Database;
pub use task_store::{MemoryTaskStore, TaskStore};

use std::path::PathBuf;

/// Returns `~/.config/dayplanner[-dev]/` based on DAYPLANNER_ENV.
///
/// Set DAYPLANNER_ENV=dev to use development data directory, or
/// DAYPLANNER_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("DAYPLANNER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("DAYPLANNER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("dayplanner-dev")
            } else {
                base_dir.join("dayplanner")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
