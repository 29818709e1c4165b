pub mod catalog;
pub mod query;
pub mod table;

pub use catalog::Catalog;
pub use query::{DatePart, Filter, Lookup, Predicate, LOOKUP_SEP};
pub use table::{Table, TableSchema};
