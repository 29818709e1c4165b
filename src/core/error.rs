use thiserror::Error;

/// Schema-shape problems detected while validating a slug field.
///
/// These are programming errors: they surface on the first save of the
/// offending model and never degrade into a silently non-unique slug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("attribute references itself in `unique_with`; use `unique` for this case")]
    SelfReference,

    #[error("could not find attribute '{0}' referenced in `unique_with`")]
    UnknownField(String),

    #[error("could not resolve lookup \"{0}\" in `unique_with`")]
    UnresolvedLookup(String),

    #[error("'{0}' is declared after the slug field; declare the slug after all fields listed in `unique_with`")]
    FieldOrder(String),

    #[error("could not find attribute or method '{0}' to populate from")]
    UnknownSource(String),

    #[error("max_length {max_length} leaves no room for a slug with separator '{separator}'")]
    Length { max_length: usize, separator: String },
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Table '{0}' already exists")]
    TableExists(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("Row {0} not found in table '{1}'")]
    RowNotFound(u64, String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Integrity error: {0}")]
    IntegrityConflict(String),

    #[error("Invalid configuration of {model}.{field}: {kind}")]
    Configuration {
        model: String,
        field: String,
        #[source]
        kind: ConfigurationError,
    },

    #[error(
        "Could not check uniqueness of {model}.{field} with respect to {model}.{dependency} because the latter is empty"
    )]
    DependencyEmpty {
        model: String,
        field: String,
        dependency: String,
    },

    #[error("Execution error: {0}")]
    ExecutionError(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

impl DbError {
    pub fn configuration(
        model: impl Into<String>,
        field: impl Into<String>,
        kind: ConfigurationError,
    ) -> Self {
        Self::Configuration {
            model: model.into(),
            field: field.into(),
            kind,
        }
    }

    /// The configuration problem behind this error, if any.
    pub fn configuration_kind(&self) -> Option<&ConfigurationError> {
        match self {
            Self::Configuration { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

impl<T> From<std::sync::PoisonError<T>> for DbError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}
