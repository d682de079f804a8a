//! Storage: URI handling, object-storage backends and warehouse backends.

pub mod object;
pub mod uri;
pub mod warehouse;

pub use object::{
    BackendConfig, GcsConfig, InMemoryBackend, LocalBackend, ObjectMetadata, ObjectStore,
};
pub use uri::{StorageUri, OBJECT_STORAGE_SCHEME};
pub use warehouse::{
    MemoryWarehouse, SqliteWarehouse, TableRef, Warehouse, WarehouseConfig, WarehouseError,
    WAREHOUSE_PREFIX,
};
