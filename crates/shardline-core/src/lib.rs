//! shardline-core — entity/partition types and namespace configuration.
//!
//! Everything else in the workspace derives physical database and table
//! names from the [`ProjectNamespace`] owned by this crate. The namespace
//! is loaded once per process (see [`LazyNamespace`]) from a persisted
//! JSON file and only changes through an explicit, fail-closed rename.

pub mod config;
pub mod error;
pub mod types;

pub use config::{LazyNamespace, NamespaceStore, ProjectNamespace, sanitize_prefix};
pub use error::{ConfigError, ConfigResult};
pub use types::{
    EntityType, IndicationType, PartitionDimension, StrategyType, UnknownPartitionValue,
};
