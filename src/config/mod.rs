//! Job configuration: CLI flags (with managed-environment env defaults) and
//! the feature schema describing column roles.

mod cli;
mod schema;

pub use cli::{Cli, DataFormat};
pub use schema::FeatureSchema;
