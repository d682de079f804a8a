//! Tabular data: the in-memory table, source loaders, numeric cleaning and
//! feature/label selection.

mod clean;
mod load;
mod select;
mod table;

pub use clean::clean_numeric;
pub use load::{load_from_object_storage, load_from_warehouse, read_csv};
pub use select::data_selection;
pub use table::{Cell, Table};
