// Shared test helpers for writing configuration documents and seeding databases.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Writes a YAML document into `dir` and returns its path.
#[allow(dead_code)] // Used by other test files
pub fn write_document(dir: &TempDir, file: &str, content: &str) -> PathBuf {
    let path = dir.path().join(file);
    std::fs::write(&path, content).expect("Failed to write configuration document");
    path
}

/// Renders a `file://` descriptor entry for `path`.
#[allow(dead_code)]
pub fn file_entry(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Creates a SQLite database file with a populated `configuration` table and
/// returns its connection URL.
#[allow(dead_code)]
pub async fn seed_database(dir: &TempDir, file: &str, rows: &[(&str, &str, Option<&str>)]) -> String {
    let path = dir.path().join(file);
    let url = format!("sqlite://{}?mode=rwc", path.display());

    sqlx::any::install_default_drivers();
    let pool = sqlx::AnyPool::connect(&url)
        .await
        .expect("Failed to create test database");
    sqlx::query(
        "CREATE TABLE configuration (environment TEXT NOT NULL, name TEXT NOT NULL, content TEXT)",
    )
    .execute(&pool)
    .await
    .expect("Failed to create configuration table");

    for (env, name, content) in rows {
        sqlx::query("INSERT INTO configuration (environment, name, content) VALUES ($1, $2, $3)")
            .bind(*env)
            .bind(*name)
            .bind(*content)
            .execute(&pool)
            .await
            .expect("Failed to insert configuration row");
    }
    pool.close().await;
    url
}
