use super::query::Predicate;
use crate::core::{Column, DbError, Result, Row, RowId, Schema, Value};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
pub struct Table {
    schema: TableSchema,
    rows: BTreeMap<RowId, Row>,
    next_row_id: RowId,
    indexes: HashMap<String, BTreeMap<Value, Vec<RowId>>>,
}

impl Table {
    pub fn new(schema: TableSchema) -> Self {
        let indexed: Vec<String> = schema
            .schema()
            .columns()
            .iter()
            .filter(|c| c.indexed || c.unique || c.primary_key)
            .map(|c| c.name.clone())
            .collect();

        let mut table = Self {
            schema,
            rows: BTreeMap::new(),
            next_row_id: 1,
            indexes: HashMap::new(),
        };
        for column in indexed {
            table.indexes.insert(column.clone(), BTreeMap::new());
            if !table.schema.is_indexed(&column) {
                table.schema.indexes.push(column);
            }
        }
        table
    }

    pub fn insert(&mut self, row: Row) -> Result<RowId> {
        self.validate_row(&row)?;
        self.check_uniqueness(&row, None)?;

        let id = self.next_row_id;
        self.next_row_id += 1;

        self.update_indexes(id, &row);
        self.rows.insert(id, row);

        Ok(id)
    }

    pub fn update(&mut self, id: RowId, new_row: Row) -> Result<()> {
        self.validate_row(&new_row)?;
        if !self.rows.contains_key(&id) {
            return Err(DbError::RowNotFound(id, self.schema.name.clone()));
        }
        self.check_uniqueness(&new_row, Some(id))?;

        if let Some(old) = self.rows.remove(&id) {
            self.remove_from_indexes(id, &old);
        }
        self.update_indexes(id, &new_row);
        self.rows.insert(id, new_row);
        Ok(())
    }

    pub fn delete(&mut self, id: RowId) -> bool {
        match self.rows.remove(&id) {
            Some(old) => {
                self.remove_from_indexes(id, &old);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.rows.contains_key(&id)
    }

    /// Ids of rows matching every predicate, in insertion order.
    pub fn select(&self, predicates: &[Predicate], exclude: Option<RowId>) -> Vec<RowId> {
        self.candidates(predicates)
            .into_iter()
            .filter(|id| Some(*id) != exclude)
            .filter(|id| {
                self.rows
                    .get(id)
                    .is_some_and(|row| predicates.iter().all(|p| p.matches(row)))
            })
            .collect()
    }

    pub fn count(&self, predicates: &[Predicate], exclude: Option<RowId>) -> usize {
        self.select(predicates, exclude).len()
    }

    // Narrow the scan through the first equality term on an indexed column.
    fn candidates(&self, predicates: &[Predicate]) -> Vec<RowId> {
        let columns = self.schema.schema().columns();
        for predicate in predicates {
            if let Predicate::Equals(idx, value) = predicate
                && let Some(index) = self.indexes.get(&columns[*idx].name)
            {
                let mut ids = index.get(value).cloned().unwrap_or_default();
                ids.sort_unstable();
                return ids;
            }
        }
        self.rows.keys().copied().collect()
    }

    fn check_uniqueness(&self, row: &Row, ignore_id: Option<RowId>) -> Result<()> {
        for (col_idx, column) in self.schema.schema().columns().iter().enumerate() {
            if !(column.primary_key || column.unique) {
                continue;
            }
            let value = &row[col_idx];
            // Multiple NULLs are allowed in a UNIQUE column
            if value.is_null() {
                continue;
            }

            let clash = match self.indexes.get(&column.name) {
                Some(index) => index
                    .get(value)
                    .is_some_and(|ids| ids.iter().any(|id| Some(*id) != ignore_id)),
                None => self
                    .rows
                    .iter()
                    .any(|(id, existing)| Some(*id) != ignore_id && &existing[col_idx] == value),
            };

            if clash {
                return Err(DbError::IntegrityConflict(format!(
                    "Unique constraint violation: Column '{}.{}' already contains value {}",
                    self.schema.name, column.name, value
                )));
            }
        }
        Ok(())
    }

    fn validate_row(&self, row: &Row) -> Result<()> {
        let columns = self.schema.schema().columns();
        if row.len() != columns.len() {
            return Err(DbError::ExecutionError(format!(
                "Expected {} columns, got {}",
                columns.len(),
                row.len()
            )));
        }
        for (column, value) in columns.iter().zip(row.iter()) {
            column.validate(value)?;
        }
        Ok(())
    }

    fn update_indexes(&mut self, id: RowId, row: &Row) {
        for (col_name, index) in &mut self.indexes {
            if let Some(col_idx) = self.schema.schema.find_column_index(col_name) {
                index
                    .entry(row[col_idx].clone())
                    .or_insert_with(Vec::new)
                    .push(id);
            }
        }
    }

    fn remove_from_indexes(&mut self, id: RowId, row: &Row) {
        for (col_name, index) in &mut self.indexes {
            if let Some(col_idx) = self.schema.schema.find_column_index(col_name)
                && let Some(ids) = index.get_mut(&row[col_idx])
            {
                ids.retain(|&x| x != id);
                if ids.is_empty() {
                    index.remove(&row[col_idx]);
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    schema: Schema,
    pub indexes: Vec<String>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            schema: Schema::new(columns),
            indexes: Vec::new(),
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
    pub fn is_indexed(&self, column: &str) -> bool {
        self.indexes.iter().any(|idx| idx == column)
    }
}
