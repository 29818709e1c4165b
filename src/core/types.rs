use super::{DataType, DbError, Result, Value};

pub type Row = Vec<Value>;

/// Store-assigned identity of a row within its table.
pub type RowId = u64;

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    /// An empty value is an acceptable application-level value.
    pub blank: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub indexed: bool,
    pub max_length: Option<usize>,
    /// Target table of a foreign key; the column then stores the target `RowId`.
    pub references: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            blank: false,
            unique: false,
            primary_key: false,
            indexed: false,
            max_length: None,
            references: None,
        }
    }

    /// Integer column holding the `RowId` of a row in `table`.
    pub fn foreign_key(name: impl Into<String>, table: impl Into<String>) -> Self {
        let mut column = Self::new(name, DataType::Integer).not_null();
        column.references = Some(table.into());
        column
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self.indexed = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self.unique()
    }

    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn is_relation(&self) -> bool {
        self.references.is_some()
    }

    pub fn validate(&self, value: &Value) -> Result<()> {
        if matches!(value, Value::Null) {
            if !self.nullable {
                return Err(DbError::ConstraintViolation(format!(
                    "Column '{}' cannot be NULL",
                    self.name
                )));
            }
            return Ok(());
        }

        if !self.data_type.is_compatible(value) {
            return Err(DbError::TypeMismatch(format!(
                "Column '{}' expects type {}, got {}",
                self.name,
                self.data_type,
                value.type_name()
            )));
        }

        if let (Some(max), Value::Text(s)) = (self.max_length, value)
            && s.chars().count() > max
        {
            return Err(DbError::ConstraintViolation(format!(
                "Value for column '{}' exceeds {} characters",
                self.name, max
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn find_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.find_column_index(name).map(|idx| &self.columns[idx])
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn empty_row(&self) -> Row {
        vec![Value::Null; self.columns.len()]
    }
}
