use super::queryset::{QueryProvider, QuerySet};
use super::scope::{self, FieldRef, ScopeTerm};
use super::settings::SlugSettings;
use super::slugify::Slugifier;
use super::source::{self, BaseValue, SlugSource};
use super::unique;
use crate::core::{Column, ConfigurationError, DataType, DbError, Result, Value};
use crate::facade::InMemoryDB;
use crate::model::{Method, Model, Record, SaveHook};
use crate::storage::{Filter, Lookup};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// A text column whose value is derived and kept unique on every save.
///
/// ```
/// use memoslug::{Column, DataType, InMemoryDB, Model, SlugField, Value};
///
/// # fn main() -> memoslug::Result<()> {
/// let db = InMemoryDB::new();
/// db.register(
///     Model::builder("article")
///         .column(Column::new("title", DataType::Text))
///         .slug(SlugField::new("slug").populate_from("title").unique())
///         .build()?,
/// )?;
///
/// let a = db.create("article", [("title", Value::from("Hello world!"))])?;
/// let b = db.create("article", [("title", Value::from("Hello world!"))])?;
/// assert_eq!(a.text("slug")?, Some("hello-world"));
/// assert_eq!(b.text("slug")?, Some("hello-world-2"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SlugField {
    name: String,
    pub(crate) source: SlugSource,
    pub(crate) always_update: bool,
    pub(crate) blank: bool,
    nullable: bool,
    unique: bool,
    index: bool,
    unique_with: Vec<String>,
    separator: String,
    max_length: usize,
    pub(crate) slugify: Slugifier,
    query: Arc<dyn QueryProvider>,
    model: String,
    scope: OnceLock<Vec<ScopeTerm>>,
}

impl SlugField {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, &SlugSettings::default())
    }

    pub fn with_settings(name: impl Into<String>, settings: &SlugSettings) -> Self {
        Self {
            name: name.into(),
            source: SlugSource::Manual,
            always_update: false,
            blank: false,
            nullable: false,
            unique: false,
            index: true,
            unique_with: Vec::new(),
            separator: settings.separator.clone(),
            max_length: settings.max_length,
            slugify: settings.slugify.clone(),
            query: Arc::new(QuerySet::own()),
            model: String::new(),
            scope: OnceLock::new(),
        }
    }

    /// Populate from a column or from a model method of that name.
    pub fn populate_from(mut self, name: impl Into<String>) -> Self {
        self.source = SlugSource::Column(name.into());
        self
    }

    /// Populate from a closure evaluated against the record.
    pub fn populate_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Result<Value> + Send + Sync + 'static,
    {
        let f: Method = Arc::new(f);
        self.source = SlugSource::Derived(f);
        self
    }

    /// Recompute from the source on every save, not only while empty.
    pub fn always_update(mut self) -> Self {
        self.always_update = true;
        self
    }

    /// Accept an empty source: store it without a slug instead of failing.
    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Store `NULL` rather than `""` for a blank value.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Back the slug with a unique index on its column.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Add a scope entry: `field`, `relation__field` or `date__year|month|day`.
    pub fn unique_with(mut self, lookup: impl Into<String>) -> Self {
        self.unique_with.push(lookup.into());
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = max;
        self
    }

    pub fn slugify(mut self, slugify: Slugifier) -> Self {
        self.slugify = slugify;
        self
    }

    pub fn query_provider(mut self, provider: impl QueryProvider + 'static) -> Self {
        self.query = Arc::new(provider);
        self
    }

    pub fn no_index(mut self) -> Self {
        self.index = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_length_value(&self) -> usize {
        self.max_length
    }

    pub fn source(&self) -> &SlugSource {
        &self.source
    }

    pub fn scope(&self) -> &[String] {
        &self.unique_with
    }

    /// Column declaration backing this field.
    pub fn column(&self) -> Column {
        let mut column = Column::new(&self.name, DataType::Text).max_length(self.max_length);
        if !self.nullable {
            column = column.not_null();
        }
        if self.blank {
            column = column.blank();
        }
        if self.index {
            column = column.indexed();
        }
        if self.unique {
            column = column.unique();
        }
        column
    }

    pub(crate) fn empty_value(&self) -> Value {
        if self.nullable {
            Value::Null
        } else {
            Value::Text(String::new())
        }
    }

    fn field_ref(&self) -> FieldRef<'_> {
        FieldRef {
            model: &self.model,
            field: &self.name,
        }
    }

    /// Attach to `model`, resolving a named source to a column or a method.
    pub(crate) fn bind(
        mut self,
        model: &str,
        columns: &[Column],
        methods: &HashMap<String, Method>,
    ) -> Result<Self> {
        self.model = model.to_string();
        if self.max_length == 0 || self.separator.chars().count() >= self.max_length {
            return Err(DbError::configuration(
                model,
                &self.name,
                ConfigurationError::Length {
                    max_length: self.max_length,
                    separator: self.separator.clone(),
                },
            ));
        }
        if let SlugSource::Column(name) = self.source.clone() {
            if methods.contains_key(&name) {
                self.source = SlugSource::Method(name);
            } else if !columns.iter().any(|c| c.name == name) {
                return Err(DbError::configuration(
                    model,
                    &self.name,
                    ConfigurationError::UnknownSource(name),
                ));
            }
        }
        Ok(self)
    }

    /// Validated scope, computed on first use and then reused.
    fn scope_terms(&self, db: &InMemoryDB, model: &Model) -> Result<&[ScopeTerm]> {
        if let Some(terms) = self.scope.get() {
            return Ok(terms.as_slice());
        }
        let terms = scope::resolve_scope(db, model, self.field_ref(), &self.unique_with)?;
        debug!(model = model.name(), field = %self.name, terms = terms.len(), "validated slug scope");
        Ok(self.scope.get_or_init(|| terms).as_slice())
    }

    /// Compute the slug for `record` and assign it to the slug column.
    pub fn assign(&self, db: &InMemoryDB, record: &mut Record) -> Result<Value> {
        let model = record.model().clone();
        let terms = self.scope_terms(db, &model)?;

        let value = match source::resolve_base(self, record)? {
            BaseValue::Blank(value) => value,
            BaseValue::Candidate(candidate) => {
                let scope = scope::extract_scope(db, record, self.field_ref(), terms)?;
                Value::Text(self.resolve_unique(db, record, &candidate, scope)?)
            }
        };

        debug!(model = model.name(), field = %self.name, slug = %value, "assigned slug");
        record.set(&self.name, value.clone())?;
        Ok(value)
    }

    fn resolve_unique(
        &self,
        db: &InMemoryDB,
        record: &Record,
        candidate: &str,
        scope: Vec<(Lookup, Value)>,
    ) -> Result<String> {
        let scoped = Filter::new().extend(scope);
        unique::find_available(candidate, &self.separator, self.max_length, |probe| {
            let filter = scoped.clone().and(Lookup::column(&self.name), probe);
            let taken = self.query.exists(db, record, &filter)?;
            if taken {
                debug!(model = record.model().name(), field = %self.name, probe, "slug taken");
            } else {
                trace!(model = record.model().name(), field = %self.name, probe, "slug free");
            }
            Ok(taken)
        })
    }
}

impl SaveHook for SlugField {
    fn pre_save(&self, db: &InMemoryDB, record: &mut Record) -> Result<()> {
        self.assign(db, record).map(|_| ())
    }
}
