use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub sqlite_path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("data/textflow.db"),
        }
    }
}

impl DatabaseConfig {
    /// In-memory database, used by tests.
    pub fn in_memory() -> Self {
        Self {
            sqlite_path: PathBuf::from(":memory:"),
        }
    }
}
