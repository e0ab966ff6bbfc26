//! Schema setup and teardown from the bundled SQL files.
//!
//! `migrations/` is applied in ascending file-name order and `cleanup/` in
//! descending order, so each cleanup file undoes its migration counterpart.

use sqlx::PgPool;
use std::fs;
use std::path::{Path, PathBuf};

/// Create the tables and legacy routine shims.
///
/// ```rust,no_run
/// use sqlx::PgPool;
/// use cacm_desa_postgres::init_database;
///
/// # async fn example(pool: &PgPool) -> Result<(), sqlx::Error> {
/// init_database(pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    run_scripts(pool, &dir, Order::Ascending).await
}

/// Drop everything [`init_database`] created.
pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cleanup");
    run_scripts(pool, &dir, Order::Descending).await
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Order {
    Ascending,
    Descending,
}

fn sql_files(dir: &Path, order: Order) -> Result<Vec<PathBuf>, sqlx::Error> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(sqlx::Error::Io)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();
    files.sort();
    if order == Order::Descending {
        files.reverse();
    }
    Ok(files)
}

async fn run_scripts(pool: &PgPool, dir: &Path, order: Order) -> Result<(), sqlx::Error> {
    for path in sql_files(dir, order)? {
        tracing::info!(script = %path.display(), "applying schema script");
        let sql = fs::read_to_string(&path).map_err(sqlx::Error::Io)?;
        sqlx::raw_sql(&sql).execute(pool).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleanup_runs_in_reverse_migration_order() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let up = sql_files(&root.join("migrations"), Order::Ascending).unwrap();
        let down = sql_files(&root.join("cleanup"), Order::Descending).unwrap();

        assert_eq!(up.len(), down.len());
        let first_up = up.first().unwrap().file_name().unwrap().to_string_lossy().into_owned();
        let last_down = down.last().unwrap().file_name().unwrap().to_string_lossy().into_owned();
        assert!(first_up.starts_with("20250101000001"));
        assert!(last_down.starts_with("20250101000001"));
    }
}
