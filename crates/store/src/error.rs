//! Error types for the store crate.
//!
//! - `StoreError`: everything a store operation can fail with
//! - `ValidationErrors`: per-field messages for rejected writes

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// No row with this id exists (or it is not visible to the caller)
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The write was rejected; nothing was persisted
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The database driver failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the schema failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Per-field validation messages.
///
/// Serializes as a JSON object mapping each field to its list of messages,
/// e.g. `{"name": ["This field may not be blank."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single message for a single field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, empty if there are none
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// `Ok(())` when nothing was recorded, the errors otherwise
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Whether a driver error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Message used when a referenced id does not exist
pub(crate) fn invalid_pk(id: i64) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
