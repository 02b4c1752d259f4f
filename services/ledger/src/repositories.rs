//! Repository over the ledger CSV tables

use std::path::Path;

use common::error::StoreResult;
use common::store::{StoreConfig, Table, load_table, run_blocking, save_table};
use tracing::{info, warn};

use crate::models::{Client, Expense, Project, Salary};

/// Read and append access to every ledger table
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    store: StoreConfig,
}

/// Snapshot of every ledger table
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub clients: Vec<Client>,
    pub projects: Vec<Project>,
    pub salaries: Vec<Salary>,
    pub expenses: Vec<Expense>,
}

impl LedgerRepository {
    /// Create a new ledger repository
    pub fn new(store: StoreConfig) -> Self {
        Self { store }
    }

    /// Load every row of table `T`; an absent table reads as empty
    pub async fn list<T: Table + Send + 'static>(&self) -> StoreResult<Vec<T>> {
        let path = self.store.table_path::<T>();
        run_blocking(move || load_or_empty(&path)).await
    }

    /// Append one row to table `T`
    pub async fn append<T: Table + Send + 'static>(&self, row: T) -> StoreResult<()> {
        let path = self.store.table_path::<T>();
        run_blocking(move || {
            info!("Appending row to table {}", T::NAME);
            let mut rows = load_or_empty::<T>(&path)?;
            rows.push(row);
            save_table(&path, &rows)
        })
        .await
    }

    /// Whether a client with this name exists
    pub async fn client_exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.list::<Client>().await?.iter().any(|c| c.name == name))
    }

    /// Load the tables used by the dashboard
    pub async fn snapshot(&self) -> StoreResult<LedgerSnapshot> {
        let store = self.store.clone();
        run_blocking(move || {
            Ok(LedgerSnapshot {
                clients: load_or_empty(&store.table_path::<Client>())?,
                projects: load_or_empty(&store.table_path::<Project>())?,
                salaries: load_or_empty(&store.table_path::<Salary>())?,
                expenses: load_or_empty(&store.table_path::<Expense>())?,
            })
        })
        .await
    }
}

fn load_or_empty<T: Table>(path: &Path) -> StoreResult<Vec<T>> {
    match load_table(path) {
        Ok(rows) => Ok(rows),
        Err(e) if e.is_missing() => {
            warn!("Table {} has no file yet, treating it as empty", T::NAME);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
