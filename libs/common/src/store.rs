//! CSV table store for the studio ledger
//!
//! Every table lives in its own CSV file under a single data directory. The
//! first row of each file is the header; the remaining rows are records.
//! Writes replace the whole file (last write wins).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;
use tracing::{error, info};

use crate::error::{StoreError, StoreResult};

/// A typed CSV table
///
/// `COLUMNS` lists the header cells in file order; the serde field order of
/// the implementing type must follow the same order.
pub trait Table: Serialize + DeserializeOwned {
    /// File stem of the table inside the data directory
    const NAME: &'static str;
    /// Header row of the table
    const COLUMNS: &'static [&'static str];
}

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the table files
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Create a new StoreConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STUDIO_DATA_DIR`: directory holding the CSV tables (default: "data")
    pub fn from_env() -> StoreResult<Self> {
        let data_dir = env::var("STUDIO_DATA_DIR").unwrap_or_else(|_| "data".to_string());

        if data_dir.trim().is_empty() {
            return Err(StoreError::Configuration(
                "STUDIO_DATA_DIR must not be empty".to_string(),
            ));
        }

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
        })
    }

    /// Path of the file backing table `T`
    pub fn table_path<T: Table>(&self) -> PathBuf {
        self.data_dir.join(format!("{}.csv", T::NAME))
    }
}

/// Check that the data directory exists and is a directory
pub fn health_check(config: &StoreConfig) -> StoreResult<bool> {
    match fs::metadata(&config.data_dir) {
        Ok(meta) if meta.is_dir() => {
            info!("Data directory {} is available", config.data_dir.display());
            Ok(true)
        }
        Ok(_) => {
            error!("Data path {} is not a directory", config.data_dir.display());
            Ok(false)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StoreError::Missing(config.data_dir.clone()))
        }
        Err(source) => Err(StoreError::Io {
            path: config.data_dir.clone(),
            source,
        }),
    }
}

/// Load every row of table `T` from `path`
pub fn load_table<T: Table>(path: &Path) -> StoreResult<Vec<T>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    check_columns::<T>(path, headers)?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record.map_err(|source| StoreError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Replace the contents of table `T` at `path` with `rows`
///
/// The header row is always written, so an empty table stays readable. Each
/// save writes its own temporary file next to the table and renames it over
/// the table, so concurrent saves never clobber each other and the last
/// rename wins.
pub fn save_table<T: Table>(path: &Path, rows: &[T]) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let csv_err = |source| StoreError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file_mut());
        writer.write_record(T::COLUMNS).map_err(csv_err)?;
        for row in rows {
            writer.serialize(row).map_err(csv_err)?;
        }
        writer.flush().map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;

    info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Run blocking table work on the blocking thread pool
///
/// Handlers call this instead of touching the files from the async runtime.
pub async fn run_blocking<F, R, E>(work: F) -> Result<R, E>
where
    F: FnOnce() -> Result<R, E> + Send + 'static,
    R: Send + 'static,
    E: From<StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!("Blocking store task failed: {}", e);
        E::from(StoreError::Task(e.to_string()))
    })?
}

fn check_columns<T: Table>(path: &Path, headers: &csv::StringRecord) -> StoreResult<()> {
    let missing: Vec<&str> = T::COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Schema {
            path: path.to_path_buf(),
            message: format!("missing columns: {}", missing.join(", ")),
        })
    }
}
