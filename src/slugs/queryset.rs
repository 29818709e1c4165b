use crate::core::{Result, Value};
use crate::facade::InMemoryDB;
use crate::model::Record;
use crate::storage::{Filter, Lookup};
use std::fmt;

/// Query capability used to look for slug collisions.
pub trait QueryProvider: Send + Sync + fmt::Debug {
    /// Whether any row other than `record` itself matches `filter`.
    fn exists(&self, db: &InMemoryDB, record: &Record, filter: &Filter) -> Result<bool>;
}

/// Rows of one or more tables, optionally narrowed by extra terms.
///
/// With no tables the saving record's own table is used. Listing several
/// tables makes them share one slug namespace; every listed table must carry
/// the slug column and the scope columns.
#[derive(Debug, Clone, Default)]
pub struct QuerySet {
    tables: Vec<String>,
    restrict: Vec<(Lookup, Value)>,
}

impl QuerySet {
    pub fn own() -> Self {
        Self::default()
    }

    pub fn shared<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
            restrict: Vec::new(),
        }
    }

    /// Only rows also matching `lookup = value` take part in the namespace.
    pub fn filter(mut self, lookup: Lookup, value: impl Into<Value>) -> Self {
        self.restrict.push((lookup, value.into()));
        self
    }
}

impl QueryProvider for QuerySet {
    fn exists(&self, db: &InMemoryDB, record: &Record, filter: &Filter) -> Result<bool> {
        let own = record.model().name();
        let tables: Vec<&str> = if self.tables.is_empty() {
            vec![own]
        } else {
            self.tables.iter().map(String::as_str).collect()
        };

        for table in tables {
            let exclude = if table == own { record.id() } else { None };
            let filter = filter
                .clone()
                .extend(self.restrict.iter().cloned())
                .exclude(exclude);
            if db.exists(table, &filter)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
