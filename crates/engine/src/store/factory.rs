use std::sync::Arc;

use crate::store::{DatabaseConfig, SqliteStore, Store};

pub async fn create_store(config: &DatabaseConfig) -> crate::Result<Arc<dyn Store>> {
    let path = config
        .sqlite_path
        .to_str()
        .ok_or_else(|| crate::Error::Config("SQLite path is not valid UTF-8".into()))?;
    Ok(Arc::new(SqliteStore::new(path).await?))
}
