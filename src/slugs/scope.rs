//! `unique_with` entries: parsing, validation against the schema, and
//! extraction of the current scope values from a record.

use crate::core::{ConfigurationError, DataType, DbError, Result, Value};
use crate::facade::InMemoryDB;
use crate::model::{Model, Record};
use crate::storage::{DatePart, Lookup, LOOKUP_SEP};

/// One validated `unique_with` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTerm {
    pub local: String,
    pub traversal: Option<Traversal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Traversal {
    /// Compare the date column down to this granularity.
    DatePart(DatePart),
    /// Follow the foreign key into `target` and apply `term` there.
    Related { target: String, term: Box<ScopeTerm> },
}

/// Split a lookup on its first `__`.
pub fn split_lookup(lookup: &str) -> (&str, Option<&str>) {
    match lookup.split_once(LOOKUP_SEP) {
        Some((local, rest)) => (local, Some(rest)),
        None => (lookup, None),
    }
}

/// Names the slug field that configuration and dependency errors refer to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldRef<'a> {
    pub model: &'a str,
    pub field: &'a str,
}

impl FieldRef<'_> {
    fn config_error(&self, kind: ConfigurationError) -> DbError {
        DbError::configuration(self.model, self.field, kind)
    }
}

/// Validate every entry of `unique_with` against `model`.
pub(crate) fn resolve_scope(
    db: &InMemoryDB,
    model: &Model,
    slug: FieldRef<'_>,
    lookups: &[String],
) -> Result<Vec<ScopeTerm>> {
    let slug_idx = model.column_index(slug.field)?;
    lookups
        .iter()
        .map(|lookup| {
            let (local, rest) = split_lookup(lookup);
            if local == slug.field {
                return Err(slug.config_error(ConfigurationError::SelfReference));
            }
            let local_idx = model
                .schema()
                .find_column_index(local)
                .ok_or_else(|| slug.config_error(ConfigurationError::UnknownField(local.to_string())))?;
            if local_idx > slug_idx {
                return Err(slug.config_error(ConfigurationError::FieldOrder(local.to_string())));
            }
            resolve_term(db, model, local, rest)
                .ok_or_else(|| slug.config_error(ConfigurationError::UnresolvedLookup(lookup.clone())))
        })
        .collect()
}

// Anything past the top level that does not resolve is an unresolved lookup.
fn resolve_term(db: &InMemoryDB, model: &Model, local: &str, rest: Option<&str>) -> Option<ScopeTerm> {
    let column = model.schema().get_column(local)?;

    let traversal = if column.data_type == DataType::Date && !column.is_relation() {
        let part = match rest {
            None => DatePart::Day,
            Some(name) => DatePart::parse(name)?,
        };
        Some(Traversal::DatePart(part))
    } else if let Some(target) = &column.references {
        match rest {
            None => None,
            Some(rest) => {
                let target_model = db.model(target).ok()?;
                let (inner, inner_rest) = split_lookup(rest);
                let term = resolve_term(db, &target_model, inner, inner_rest)?;
                Some(Traversal::Related {
                    target: target.clone(),
                    term: Box::new(term),
                })
            }
        }
    } else if rest.is_some() {
        return None;
    } else {
        None
    };

    Some(ScopeTerm {
        local: local.to_string(),
        traversal,
    })
}

/// Current scope values of `record` as filter terms.
pub(crate) fn extract_scope(
    db: &InMemoryDB,
    record: &Record,
    slug: FieldRef<'_>,
    terms: &[ScopeTerm],
) -> Result<Vec<(Lookup, Value)>> {
    let mut lookups = Vec::new();
    for term in terms {
        lookups.extend(extract_term(db, record, slug, term)?);
    }
    Ok(lookups)
}

fn extract_term(
    db: &InMemoryDB,
    record: &Record,
    slug: FieldRef<'_>,
    term: &ScopeTerm,
) -> Result<Vec<(Lookup, Value)>> {
    let column = record.model().column(&term.local)?;
    let value = record.get(&term.local)?.clone();

    if value.is_empty() {
        if !column.blank {
            return Err(DbError::DependencyEmpty {
                model: slug.model.to_string(),
                field: slug.field.to_string(),
                dependency: term.local.clone(),
            });
        }
        // An acceptable empty dependency is itself the scope key.
        return Ok(vec![(Lookup::column(&term.local), value)]);
    }

    match &term.traversal {
        None => Ok(vec![(Lookup::column(&term.local), value)]),
        Some(Traversal::DatePart(part)) => {
            let date = value.as_date().ok_or_else(|| {
                DbError::TypeMismatch(format!(
                    "Column '{}' expects type DATE, got {}",
                    term.local,
                    value.type_name()
                ))
            })?;
            Ok(part
                .granularity()
                .iter()
                .map(|p| (Lookup::date_part(&term.local, *p), Value::Integer(p.extract(date))))
                .collect())
        }
        Some(Traversal::Related { target, term: inner }) => {
            let id = value.as_i64().ok_or_else(|| {
                DbError::TypeMismatch(format!(
                    "Column '{}' expects a row id, got {}",
                    term.local,
                    value.type_name()
                ))
            })?;
            let related = db.get(target, id as u64)?;
            Ok(extract_term(db, &related, slug, inner)?
                .into_iter()
                .map(|(lookup, value)| (Lookup::related(&term.local, lookup), value))
                .collect())
        }
    }
}
