// ============================================================================
// memoslug Library
// ============================================================================

pub mod core;
pub mod facade;
pub mod model;
pub mod slugs;
pub mod storage;

// Re-export main types for convenience
pub use crate::core::{Column, ConfigurationError, DataType, DbError, Result, RowId, Value};
pub use facade::InMemoryDB;
pub use model::{Model, ModelBuilder, Record, SaveHook};
pub use slugs::{QueryProvider, QuerySet, SlugField, SlugSettings, Slugifier};
pub use storage::{DatePart, Filter, Lookup};
