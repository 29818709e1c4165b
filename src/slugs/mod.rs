//! Slug fields: derive a URL-friendly token from a record and keep it
//! unique within a scope on every save.
//!
//! A save runs two steps. The source (a column, a method, a closure, or the
//! value already stored) is slugified into a candidate; the candidate is then
//! probed against the query provider as `base`, `base-2`, `base-3`, …
//! under the record's current scope values, cropped to `max_length` with the
//! numeric suffix always kept whole.

mod field;
mod queryset;
pub mod scope;
mod settings;
mod slugify;
mod source;
pub mod unique;

pub use field::SlugField;
pub use queryset::{QueryProvider, QuerySet};
pub use scope::{ScopeTerm, Traversal};
pub use settings::{DEFAULT_MAX_LENGTH, DEFAULT_SEPARATOR, SlugSettings};
pub use slugify::{Slugifier, crop, default_slugify};
pub use source::{BaseValue, SlugSource};
