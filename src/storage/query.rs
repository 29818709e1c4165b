//! Exact-match filters over a single table.
//!
//! A [`Filter`] is written against column names, in the `field__part`
//! lookup syntax. The facade compiles it into [`Predicate`]s on column
//! indexes, turning relation lookups into semi-joins over the target table.

use crate::core::{Row, RowId, Value};
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use std::fmt;

/// Separator between the steps of a lookup path.
pub const LOOKUP_SEP: &str = "__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "year" => Some(Self::Year),
            "month" => Some(Self::Month),
            "day" => Some(Self::Day),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
        }
    }

    pub fn extract(&self, date: NaiveDate) -> i64 {
        match self {
            Self::Year => date.year() as i64,
            Self::Month => date.month() as i64,
            Self::Day => date.day() as i64,
        }
    }

    /// Parts that must all match for two dates to share this granularity.
    pub fn granularity(&self) -> &'static [DatePart] {
        match self {
            Self::Year => &[Self::Year],
            Self::Month => &[Self::Year, Self::Month],
            Self::Day => &[Self::Year, Self::Month, Self::Day],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lookup {
    Column(String),
    DatePart(String, DatePart),
    /// Follow the foreign key in `column` and apply `inner` to the target row.
    Related { column: String, inner: Box<Lookup> },
}

impl Lookup {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    pub fn date_part(name: impl Into<String>, part: DatePart) -> Self {
        Self::DatePart(name.into(), part)
    }

    pub fn related(column: impl Into<String>, inner: Lookup) -> Self {
        Self::Related {
            column: column.into(),
            inner: Box::new(inner),
        }
    }

    /// Column of the queried table this lookup starts from.
    pub fn root(&self) -> &str {
        match self {
            Self::Column(name) | Self::DatePart(name, _) => name,
            Self::Related { column, .. } => column,
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => write!(f, "{}", name),
            Self::DatePart(name, part) => write!(f, "{}{}{}", name, LOOKUP_SEP, part.as_str()),
            Self::Related { column, inner } => write!(f, "{}{}{}", column, LOOKUP_SEP, inner),
        }
    }
}

/// Conjunction of `lookup = value` terms, optionally excluding one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    terms: Vec<(Lookup, Value)>,
    exclude: Option<RowId>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, lookup: Lookup, value: impl Into<Value>) -> Self {
        self.terms.push((lookup, value.into()));
        self
    }

    pub fn extend(mut self, terms: impl IntoIterator<Item = (Lookup, Value)>) -> Self {
        self.terms.extend(terms);
        self
    }

    pub fn exclude(mut self, id: Option<RowId>) -> Self {
        self.exclude = id;
        self
    }

    pub fn terms(&self) -> &[(Lookup, Value)] {
        &self.terms
    }

    pub fn excluded(&self) -> Option<RowId> {
        self.exclude
    }
}

/// A compiled filter term bound to a column position.
#[derive(Debug, Clone)]
pub enum Predicate {
    Equals(usize, Value),
    DatePart(usize, DatePart, i64),
    /// Foreign key value is one of the given target rows.
    OneOf(usize, HashSet<RowId>),
}

impl Predicate {
    pub fn column_index(&self) -> usize {
        match self {
            Self::Equals(idx, _) | Self::DatePart(idx, _, _) | Self::OneOf(idx, _) => *idx,
        }
    }

    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Self::Equals(idx, value) => &row[*idx] == value,
            Self::DatePart(idx, part, expected) => row[*idx]
                .as_date()
                .is_some_and(|d| part.extract(d) == *expected),
            Self::OneOf(idx, ids) => row[*idx]
                .as_i64()
                .is_some_and(|id| ids.contains(&(id as RowId))),
        }
    }
}
