use crate::core::{DbError, Result};
use crate::model::Model;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered models, keyed by table name.
///
/// Copy-on-write: registering a model yields a new catalog and leaves
/// clones of the old one untouched, so readers never block on writers.
#[derive(Clone, Default)]
pub struct Catalog {
    models: Arc<HashMap<String, Arc<Model>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(self, model: Arc<Model>) -> Result<Self> {
        let name = model.name().to_string();
        if self.models.contains_key(&name) {
            return Err(DbError::TableExists(name));
        }

        let mut models = (*self.models).clone();
        models.insert(name, model);
        Ok(Self {
            models: Arc::new(models),
        })
    }

    pub fn get_model(&self, name: &str) -> Result<&Arc<Model>> {
        self.models
            .get(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub fn model_exists(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Models holding a foreign key into `table`, with the referencing column index.
    pub fn referencing(&self, table: &str) -> Vec<(Arc<Model>, usize)> {
        let mut refs = Vec::new();
        for model in self.models.values() {
            for (idx, column) in model.schema().columns().iter().enumerate() {
                if column.references.as_deref() == Some(table) {
                    refs.push((model.clone(), idx));
                }
            }
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, DataType};

    fn model(name: &str, columns: Vec<Column>) -> Arc<Model> {
        let mut builder = Model::builder(name);
        for column in columns {
            builder = builder.column(column);
        }
        Arc::new(builder.build().unwrap())
    }

    #[test]
    fn test_copy_on_write() {
        let empty = Catalog::new();
        let snapshot = empty.clone();
        let catalog = empty
            .with_model(model("author", vec![Column::new("name", DataType::Text)]))
            .unwrap();

        assert!(catalog.model_exists("author"));
        assert!(!snapshot.model_exists("author"));
        assert!(catalog.get_model("book").is_err());
    }

    #[test]
    fn test_duplicate_model_rejected() {
        let catalog = Catalog::new().with_model(model("author", vec![])).unwrap();
        assert!(matches!(
            catalog.with_model(model("author", vec![])),
            Err(DbError::TableExists(_))
        ));
    }

    #[test]
    fn test_referencing() {
        let catalog = Catalog::new()
            .with_model(model("author", vec![]))
            .unwrap()
            .with_model(model(
                "book",
                vec![
                    Column::new("title", DataType::Text),
                    Column::foreign_key("author", "author"),
                ],
            ))
            .unwrap();

        let refs = catalog.referencing("author");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].0.name(), "book");
        assert_eq!(refs[0].1, 1);
    }
}
