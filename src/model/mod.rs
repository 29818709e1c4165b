//! Record types: ordered columns, named methods and save hooks.

mod record;

pub use record::Record;

use crate::core::{Column, DbError, Result, Schema, Value};
use crate::facade::InMemoryDB;
use crate::slugs::SlugField;
use crate::storage::TableSchema;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Zero-argument record method, also usable as a derived slug source.
pub type Method = Arc<dyn Fn(&Record) -> Result<Value> + Send + Sync>;

/// Lifecycle hook run by [`InMemoryDB::save`].
///
/// `pre_save` hooks run in declaration order on a staged copy of the record
/// and may mutate it; any error aborts the save before the row is written.
pub trait SaveHook: Send + Sync {
    fn pre_save(&self, db: &InMemoryDB, record: &mut Record) -> Result<()>;

    fn post_save(&self, _db: &InMemoryDB, _record: &Record) -> Result<()> {
        Ok(())
    }
}

pub struct Model {
    table: TableSchema,
    methods: HashMap<String, Method>,
    hooks: Vec<Arc<dyn SaveHook>>,
    slug_fields: Vec<Arc<SlugField>>,
}

impl Model {
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn table_schema(&self) -> &TableSchema {
        &self.table
    }

    pub fn schema(&self) -> &Schema {
        self.table.schema()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.schema()
            .get_column(name)
            .ok_or_else(|| DbError::ColumnNotFound(name.to_string(), self.name().to_string()))
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.schema()
            .find_column_index(name)
            .ok_or_else(|| DbError::ColumnNotFound(name.to_string(), self.name().to_string()))
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn hooks(&self) -> &[Arc<dyn SaveHook>] {
        &self.hooks
    }

    pub fn slug_field(&self, name: &str) -> Option<&Arc<SlugField>> {
        self.slug_fields.iter().find(|f| f.name() == name)
    }

    pub fn slug_fields(&self) -> &[Arc<SlugField>] {
        &self.slug_fields
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("table", &self.table)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks.len())
            .field("slug_fields", &self.slug_fields)
            .finish()
    }
}

enum HookSlot {
    Slug(SlugField),
    Custom(Arc<dyn SaveHook>),
}

/// Declares a model column by column; declaration order is significant.
pub struct ModelBuilder {
    name: String,
    columns: Vec<Column>,
    methods: HashMap<String, Method>,
    hooks: Vec<HookSlot>,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            methods: HashMap::new(),
            hooks: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Declares the slug column at this position and installs its pre-save hook.
    pub fn slug(mut self, field: SlugField) -> Self {
        self.columns.push(field.column());
        self.hooks.push(HookSlot::Slug(field));
        self
    }

    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    pub fn hook(mut self, hook: Arc<dyn SaveHook>) -> Self {
        self.hooks.push(HookSlot::Custom(hook));
        self
    }

    pub fn build(self) -> Result<Model> {
        for (idx, column) in self.columns.iter().enumerate() {
            if self.columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(DbError::ExecutionError(format!(
                    "Column '{}' declared twice in '{}'",
                    column.name, self.name
                )));
            }
        }

        let mut hooks: Vec<Arc<dyn SaveHook>> = Vec::with_capacity(self.hooks.len());
        let mut slug_fields = Vec::new();
        for slot in self.hooks {
            match slot {
                HookSlot::Slug(field) => {
                    let field = Arc::new(field.bind(&self.name, &self.columns, &self.methods)?);
                    hooks.push(field.clone());
                    slug_fields.push(field);
                }
                HookSlot::Custom(hook) => hooks.push(hook),
            }
        }

        Ok(Model {
            table: TableSchema::new(self.name, self.columns),
            methods: self.methods,
            hooks,
            slug_fields,
        })
    }
}
