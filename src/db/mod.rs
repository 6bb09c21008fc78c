//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB backend) under `work_dir/database`.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "mudecoop";
const DATABASE: &str = "main";

/// Open (or create) the embedded database under `work_dir/database`
pub async fn connect(work_dir: &str) -> Result<Surreal<Db>, AppError> {
    let db_dir = Path::new(work_dir).join("database");
    std::fs::create_dir_all(&db_dir)
        .map_err(|e| AppError::database(format!("Failed to create database dir: {e}")))?;

    let db = Surreal::new::<RocksDb>(db_dir.to_string_lossy().as_ref())
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

    tracing::info!(path = %db_dir.display(), "Database connection established");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_database_dir() {
        let dir = tempfile::tempdir().unwrap();
        let db = connect(dir.path().to_str().unwrap()).await.unwrap();

        assert!(dir.path().join("database").exists());
        db.query("RETURN 1").await.unwrap();
    }
}
