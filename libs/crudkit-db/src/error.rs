use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),

    #[error("Unknown field '{field}' on '{table}'")]
    UnknownField { table: String, field: String },

    #[error("Value for field '{field}' cannot be bound: {value}")]
    Unbindable { field: String, value: String },

    #[error("Record decode failed: {0}")]
    Decode(String),

    #[error("Invalid connection options: {0}")]
    Config(String),
}

impl StoreError {
    pub fn unknown_field(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            table: table.into(),
            field: field.into(),
        }
    }

    pub fn decode(e: impl std::fmt::Display) -> Self {
        Self::Decode(e.to_string())
    }

    /// True for errors caused by caller input rather than the backend.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. } | Self::Unbindable { .. } | Self::Decode(_)
        )
    }
}
