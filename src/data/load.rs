//! Data loading from object storage and warehouse tables.

use crate::data::{Cell, Table};
use crate::storage::{ObjectStore, StorageUri, TableRef, Warehouse};
use crate::{Error, Result};

/// Load CSV data from an object-storage path into a table.
///
/// Wildcards are supported, e.g. `gs://example_bucket/data/training-*.csv`;
/// every matching object is read and concatenated. Fails if nothing matches
/// or the shards disagree on columns.
pub fn load_from_object_storage(store: &dyn ObjectStore, data_uri: &str) -> Result<Table> {
    let uri = StorageUri::parse(data_uri)?;
    let pattern = uri.object_key(&uri.file);
    let keys = store.list(&uri.bucket, &pattern)?;

    let mut merged: Option<Table> = None;
    for key in keys {
        let bytes = store.get(&uri.bucket, &key)?;
        let shard = read_csv(&bytes)?;
        match merged.as_mut() {
            None => merged = Some(shard),
            Some(table) => table.append(shard)?,
        }
    }
    merged.ok_or_else(|| Error::Input(format!("no objects match {data_uri}")))
}

/// Load a warehouse table into a table via a full-table scan.
///
/// The reference must look like `warehouse://project.dataset.table`; a
/// malformed reference is an input error raised before any scan.
pub fn load_from_warehouse(warehouse: &dyn Warehouse, table_uri: &str) -> Result<Table> {
    let table_ref = TableRef::parse(table_uri)?;
    Ok(warehouse.scan(&table_ref)?)
}

/// Decode one CSV document. The first record is the header; every value is
/// kept as text until cleaning coerces it.
pub fn read_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(bytes);
    let names: Vec<String> = reader
        .headers()
        .map_err(|e| Error::Data(format!("invalid csv header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = Table::new(names);
    for record in reader.records() {
        let record = record.map_err(|e| Error::Data(format!("invalid csv record: {e}")))?;
        table.push_row(record.iter().map(|s| Cell::Text(s.to_string())).collect())?;
    }
    Ok(table)
}
