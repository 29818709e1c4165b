use crate::core::{DbError, Result, RowId, Value};
use crate::model::{Model, Record};
use crate::storage::{Catalog, Filter, Lookup, Predicate, Table};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Synchronous in-memory record store.
///
/// Each table sits behind its own lock; the catalog is copy-on-write.
/// Queries take read locks one table at a time, so a save's uniqueness
/// probing never blocks on itself, and concurrent savers are reconciled only
/// by the tables' unique constraints.
pub struct InMemoryDB {
    catalog: RwLock<Catalog>,
    tables: RwLock<HashMap<String, Arc<RwLock<Table>>>>,
}

impl InMemoryDB {
    pub fn new() -> Self {
        Self {
            catalog: RwLock::new(Catalog::new()),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Register a model and create its table.
    ///
    /// Foreign keys must point at an already registered model or at the
    /// model itself.
    pub fn register(&self, model: Model) -> Result<Arc<Model>> {
        let model = Arc::new(model);
        let mut catalog = self.catalog.write()?;

        for column in model.schema().columns() {
            if let Some(target) = &column.references
                && target != model.name()
                && !catalog.model_exists(target)
            {
                return Err(DbError::TableNotFound(target.clone()));
            }
        }

        *catalog = catalog.clone().with_model(model.clone())?;
        self.tables.write()?.insert(
            model.name().to_string(),
            Arc::new(RwLock::new(Table::new(model.table_schema().clone()))),
        );
        debug!(model = model.name(), "registered model");
        Ok(model)
    }

    pub fn model(&self, name: &str) -> Result<Arc<Model>> {
        Ok(self.catalog.read()?.get_model(name)?.clone())
    }

    fn table(&self, name: &str) -> Result<Arc<RwLock<Table>>> {
        self.tables
            .read()?
            .get(name)
            .cloned()
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub fn new_record(&self, name: &str) -> Result<Record> {
        Ok(Record::new(self.model(name)?))
    }

    /// Build a record from `(column, value)` pairs and save it.
    pub fn create<'a, I>(&self, name: &str, values: I) -> Result<Record>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut record = self.new_record(name)?;
        for (column, value) in values {
            record.set(column, value)?;
        }
        self.save(&mut record)?;
        Ok(record)
    }

    /// Run the pre-save hooks, write the row, then run the post-save hooks.
    ///
    /// Hooks work on a staged copy: when anything before the write fails,
    /// `record` is left exactly as it was.
    pub fn save(&self, record: &mut Record) -> Result<RowId> {
        let model = record.model().clone();
        let mut staged = record.clone();

        for hook in model.hooks() {
            hook.pre_save(self, &mut staged)?;
        }
        self.check_references(&model, &staged)?;

        let table = self.table(model.name())?;
        let id = {
            let mut table = table.write()?;
            match staged.id() {
                Some(id) => {
                    table.update(id, staged.values().clone())?;
                    id
                }
                None => table.insert(staged.values().clone())?,
            }
        };
        staged.set_id(id);
        *record = staged;

        for hook in model.hooks() {
            hook.post_save(self, record)?;
        }
        debug!(model = model.name(), id, "saved record");
        Ok(id)
    }

    pub fn get(&self, name: &str, id: RowId) -> Result<Record> {
        let model = self.model(name)?;
        let table = self.table(name)?;
        let row = table
            .read()?
            .get(id)
            .cloned()
            .ok_or_else(|| DbError::RowNotFound(id, name.to_string()))?;
        Ok(Record::from_row(model, id, row))
    }

    /// Reload a saved record's values from its stored row.
    pub fn refresh(&self, record: &mut Record) -> Result<()> {
        let id = record.id().ok_or_else(|| {
            DbError::ExecutionError(format!(
                "Cannot refresh an unsaved '{}' record",
                record.model().name()
            ))
        })?;
        *record = self.get(record.model().name(), id)?;
        Ok(())
    }

    /// Delete a stored record; rows still referenced by a foreign key are kept.
    pub fn delete(&self, record: &Record) -> Result<bool> {
        let Some(id) = record.id() else {
            return Ok(false);
        };
        let name = record.model().name();

        let referencing = self.catalog.read()?.referencing(name);
        for (model, col_idx) in referencing {
            let predicate = Predicate::Equals(col_idx, Value::Integer(id as i64));
            let table = self.table(model.name())?;
            if table.read()?.count(&[predicate], None) > 0 {
                return Err(DbError::ConstraintViolation(format!(
                    "Delete on '{}' violates foreign key constraint from '{}'",
                    name,
                    model.name()
                )));
            }
        }

        let table = self.table(name)?;
        let deleted = table.write()?.delete(id);
        Ok(deleted)
    }

    pub fn all(&self, name: &str) -> Result<Vec<Record>> {
        self.filter(name, &Filter::new())
    }

    pub fn filter(&self, name: &str, filter: &Filter) -> Result<Vec<Record>> {
        let model = self.model(name)?;
        let predicates = self.compile(&model, filter)?;
        let table = self.table(name)?;
        let table = table.read()?;
        Ok(table
            .select(&predicates, filter.excluded())
            .into_iter()
            .filter_map(|id| {
                table
                    .get(id)
                    .map(|row| Record::from_row(model.clone(), id, row.clone()))
            })
            .collect())
    }

    pub fn count(&self, name: &str, filter: &Filter) -> Result<usize> {
        let model = self.model(name)?;
        Ok(self.select_ids(&model, filter)?.len())
    }

    pub fn exists(&self, name: &str, filter: &Filter) -> Result<bool> {
        Ok(self.count(name, filter)? > 0)
    }

    fn select_ids(&self, model: &Model, filter: &Filter) -> Result<Vec<RowId>> {
        let predicates = self.compile(model, filter)?;
        let table = self.table(model.name())?;
        let ids = table.read()?.select(&predicates, filter.excluded());
        Ok(ids)
    }

    fn compile(&self, model: &Model, filter: &Filter) -> Result<Vec<Predicate>> {
        filter
            .terms()
            .iter()
            .map(|(lookup, value)| self.compile_term(model, lookup, value))
            .collect()
    }

    fn compile_term(&self, model: &Model, lookup: &Lookup, value: &Value) -> Result<Predicate> {
        let idx = model.column_index(lookup.root())?;
        let column = &model.schema().columns()[idx];

        match lookup {
            Lookup::Column(_) => Ok(Predicate::Equals(idx, value.clone())),
            Lookup::DatePart(_, part) => {
                let expected = value.as_i64().ok_or_else(|| {
                    DbError::TypeMismatch(format!(
                        "Lookup '{}' expects an integer, got {}",
                        lookup,
                        value.type_name()
                    ))
                })?;
                Ok(Predicate::DatePart(idx, *part, expected))
            }
            Lookup::Related { inner, .. } => {
                let target = column.references.as_deref().ok_or_else(|| {
                    DbError::TypeMismatch(format!(
                        "Column '{}.{}' is not a relation",
                        model.name(),
                        column.name
                    ))
                })?;
                let target = self.model(target)?;
                let inner_filter = Filter::new().and((**inner).clone(), value.clone());
                let ids = self.select_ids(&target, &inner_filter)?;
                Ok(Predicate::OneOf(idx, ids.into_iter().collect()))
            }
        }
    }

    fn check_references(&self, model: &Model, record: &Record) -> Result<()> {
        for (column, value) in model.schema().columns().iter().zip(record.values()) {
            let (Some(target), Some(id)) = (&column.references, value.as_i64()) else {
                continue;
            };
            let id = id as RowId;
            // A row may reference itself.
            if target == model.name() && record.id() == Some(id) {
                continue;
            }
            if !self.table(target)?.read()?.contains(id) {
                return Err(DbError::ConstraintViolation(format!(
                    "Column '{}.{}' references non-existent key {} in '{}'",
                    model.name(),
                    column.name,
                    id,
                    target
                )));
            }
        }
        Ok(())
    }
}

impl Default for InMemoryDB {
    fn default() -> Self {
        Self::new()
    }
}
