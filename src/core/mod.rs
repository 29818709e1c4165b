pub mod error;
pub mod types;
pub mod value;

pub use error::{ConfigurationError, DbError, Result};
pub use types::{Column, Row, RowId, Schema};
pub use value::{DataType, Value};
