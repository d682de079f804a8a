//! Warehouse table access.
//!
//! Tables are referenced as `warehouse://project.dataset.table` and read with
//! a full-table scan through the [`Warehouse`] trait. The SQLite backend maps
//! datasets to ATTACHed database schemas; the in-memory backend serves tests.

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::{Mutex, RwLock};
use thiserror::Error;

use crate::data::{Cell, Table};

/// Prefix required on warehouse table references.
pub const WAREHOUSE_PREFIX: &str = "warehouse://";

/// Warehouse errors.
#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("not a warehouse uri, expected warehouse://project.dataset.table: {0:?}")]
    InvalidRef(String),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("inconsistent row width in table {0}")]
    RowWidth(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for warehouse operations.
pub type Result<T> = std::result::Result<T, WarehouseError>;

/// Parsed `warehouse://project.dataset.table` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    /// Validate the prefix and the three dot-separated identifiers. This runs
    /// before any query is issued, so a malformed reference never reaches a
    /// backend.
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(WAREHOUSE_PREFIX)
            .ok_or_else(|| WarehouseError::InvalidRef(uri.to_string()))?;
        let parts: Vec<&str> = rest.split('.').collect();
        let [project, dataset, table] = parts[..] else {
            return Err(WarehouseError::InvalidRef(uri.to_string()));
        };
        for part in [project, dataset, table] {
            let valid = !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return Err(WarehouseError::InvalidRef(uri.to_string()));
            }
        }
        Ok(Self {
            project: project.to_string(),
            dataset: dataset.to_string(),
            table: table.to_string(),
        })
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{WAREHOUSE_PREFIX}{}.{}.{}",
            self.project, self.dataset, self.table
        )
    }
}

/// Trait for warehouse backends.
pub trait Warehouse: Send + Sync {
    /// Full-table scan, materializing every row.
    fn scan(&self, table: &TableRef) -> Result<Table>;

    /// Get backend type name.
    fn backend_type(&self) -> &'static str;
}

// =============================================================================
// SQLite Backend
// =============================================================================

/// SQLite-backed warehouse. The reference's dataset selects an ATTACHed
/// database schema (`main` for the primary database).
pub struct SqliteWarehouse {
    conn: Mutex<Connection>,
}

impl SqliteWarehouse {
    /// Open the primary database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open(path)?),
        })
    }

    /// Open a transient in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        })
    }

    /// ATTACH another database file under a dataset name.
    pub fn attach(&self, dataset: &str, path: impl AsRef<Path>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("ATTACH DATABASE ?1 AS \"{dataset}\"");
        conn.execute(&sql, [path.as_ref().to_string_lossy().into_owned()])?;
        Ok(())
    }

    /// Run arbitrary setup statements (schema creation, inserts) on the
    /// primary database.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.lock().unwrap().execute_batch(sql)?;
        Ok(())
    }
}

fn cell_from_sql(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Missing,
        ValueRef::Integer(v) => Cell::Float(v as f64),
        ValueRef::Real(v) => Cell::Float(v),
        ValueRef::Text(t) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => Cell::Missing,
    }
}

impl Warehouse for SqliteWarehouse {
    fn scan(&self, table: &TableRef) -> Result<Table> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT * FROM \"{}\".\"{}\"",
            table.dataset, table.table
        );
        let mut stmt = conn.prepare(&sql).map_err(|e| match e {
            rusqlite::Error::SqliteFailure(_, Some(ref msg)) if msg.contains("no such table") => {
                WarehouseError::TableNotFound(table.to_string())
            }
            other => WarehouseError::Sqlite(other),
        })?;

        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let n_cols = names.len();
        let mut out = Table::new(names);

        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(n_cols);
            for i in 0..n_cols {
                cells.push(cell_from_sql(row.get_ref(i)?));
            }
            out.push_row(cells)
                .map_err(|_| WarehouseError::RowWidth(table.to_string()))?;
        }
        Ok(out)
    }

    fn backend_type(&self) -> &'static str {
        "sqlite"
    }
}

// =============================================================================
// In-Memory Backend (for testing)
// =============================================================================

/// In-memory warehouse for tests, keyed by the full table reference.
#[derive(Debug, Default)]
pub struct MemoryWarehouse {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under `warehouse://project.dataset.table`.
    pub fn insert(&self, table_ref: &TableRef, table: Table) {
        self.tables
            .write()
            .unwrap()
            .insert(table_ref.to_string(), table);
    }
}

impl Warehouse for MemoryWarehouse {
    fn scan(&self, table: &TableRef) -> Result<Table> {
        self.tables
            .read()
            .unwrap()
            .get(&table.to_string())
            .cloned()
            .ok_or_else(|| WarehouseError::TableNotFound(table.to_string()))
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// Unified Backend Configuration
// =============================================================================

/// Warehouse backend selection.
#[derive(Debug, Clone)]
pub enum WarehouseConfig {
    /// SQLite database file.
    Sqlite { path: std::path::PathBuf },
    /// Empty in-memory warehouse; every scan reports table-not-found.
    Memory,
}

impl WarehouseConfig {
    /// Create a backend from this configuration.
    pub fn build(&self) -> Result<Box<dyn Warehouse>> {
        match self {
            Self::Sqlite { path } => Ok(Box::new(SqliteWarehouse::open(path)?)),
            Self::Memory => Ok(Box::new(MemoryWarehouse::new())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
