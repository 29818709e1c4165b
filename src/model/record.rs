use super::Model;
use crate::core::{DbError, Result, Row, RowId, Value};
use std::fmt;
use std::sync::Arc;

/// In-memory instance of a model: a row plus its identity once stored.
#[derive(Clone)]
pub struct Record {
    model: Arc<Model>,
    id: Option<RowId>,
    values: Row,
}

impl Record {
    pub fn new(model: Arc<Model>) -> Self {
        let values = model.schema().empty_row();
        Self {
            model,
            id: None,
            values,
        }
    }

    pub(crate) fn from_row(model: Arc<Model>, id: RowId, values: Row) -> Self {
        Self {
            model,
            id: Some(id),
            values,
        }
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Row id assigned by the store, `None` until the first save.
    pub fn id(&self) -> Option<RowId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: RowId) {
        self.id = Some(id);
    }

    pub fn values(&self) -> &Row {
        &self.values
    }

    pub fn get(&self, name: &str) -> Result<&Value> {
        let idx = self.model.column_index(name)?;
        Ok(&self.values[idx])
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let idx = self.model.column_index(name)?;
        self.values[idx] = value.into();
        Ok(())
    }

    /// Text value of a column, `None` for `NULL` and non-text values.
    pub fn text(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.get(name)?.as_str())
    }

    pub fn call(&self, method: &str) -> Result<Value> {
        let f = self.model.method(method).ok_or_else(|| {
            DbError::ExecutionError(format!(
                "Model '{}' has no method '{}'",
                self.model.name(),
                method
            ))
        })?;
        f(self)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Record");
        s.field("model", &self.model.name()).field("id", &self.id);
        for (column, value) in self.model.schema().columns().iter().zip(&self.values) {
            s.field(&column.name, value);
        }
        s.finish()
    }
}
