//! Where a slug's base value comes from, and turning it into a candidate.

use super::SlugField;
use crate::core::{DbError, Result, Value};
use crate::model::{Method, Record};
use std::fmt;

#[derive(Clone)]
pub enum SlugSource {
    /// Value of a column.
    Column(String),
    /// Result of a method registered on the model.
    Method(String),
    /// Closure evaluated against the record.
    Derived(Method),
    /// Only what the caller stored in the slug column.
    Manual,
}

impl SlugSource {
    pub fn evaluate(&self, record: &Record) -> Result<Value> {
        match self {
            Self::Column(name) => Ok(record.get(name)?.clone()),
            Self::Method(name) => record.call(name),
            Self::Derived(f) => f(record),
            Self::Manual => Ok(Value::Null),
        }
    }
}

impl fmt::Debug for SlugSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => f.debug_tuple("Column").field(name).finish(),
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
            Self::Manual => f.write_str("Manual"),
        }
    }
}

/// Outcome of base-value resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseValue {
    /// Store this empty value as-is, without uniqueness probing.
    Blank(Value),
    /// Slugified candidate, still to be made unique.
    Candidate(String),
}

pub(crate) fn resolve_base(field: &SlugField, record: &Record) -> Result<BaseValue> {
    let mut raw = record.get(field.name())?.clone();
    let derived = !matches!(field.source, SlugSource::Manual);
    if derived && (field.always_update || raw.is_empty()) {
        raw = field.source.evaluate(record)?;
    }

    if raw.is_empty() {
        if field.blank {
            return Ok(BaseValue::Blank(field.empty_value()));
        }
        raw = Value::Text(record.model().name().to_lowercase());
    }

    let slug = field.slugify.apply(&raw.to_string());
    if slug.is_empty() {
        if field.blank {
            return Ok(BaseValue::Blank(field.empty_value()));
        }
        return Err(DbError::ConstraintViolation(format!(
            "Column '{}.{}' cannot be empty: '{}' has no slug form",
            record.model().name(),
            field.name(),
            raw
        )));
    }
    Ok(BaseValue::Candidate(slug))
}
