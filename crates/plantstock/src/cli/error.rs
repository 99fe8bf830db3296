//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use plantstock_db::{Column, DbError};
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    /// Create a new helpful error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggestion for fixing the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add multiple suggestions
    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Plant ID argument is not a positive integer
    pub fn invalid_id(input: &str) -> Self {
        Self::new(format!("Invalid plant ID: '{}'", input))
            .with_context("Plant ID must be a positive integer")
            .with_suggestion("TRY: plantstock list   # List plants to find valid IDs")
    }

    /// No plant with this ID
    pub fn plant_not_found(id: i64) -> Self {
        Self::new(format!("Plant {} not found", id))
            .with_context("It may have been deleted")
            .with_suggestion("TRY: plantstock list   # List available plants")
    }

    /// The database file could not be opened or created
    pub fn cannot_open_db(path: &Path, reason: &str) -> Self {
        Self::new(format!("Cannot open plant database: {}", path.display()))
            .with_context(reason.to_string())
            .with_suggestions([
                "TRY: Ensure the directory exists and is writable".to_string(),
                "TRY: Use another file: plantstock --db PATH ...".to_string(),
                "TRY: Show resolved paths: plantstock config".to_string(),
            ])
    }

    /// Translate a record store error into a user-facing message.
    pub fn from_db(err: &DbError) -> Self {
        match err {
            DbError::Validation { field, reason } => {
                let err = Self::new(format!("Invalid {}: {}", field_label(*field), reason))
                    .with_context("Nothing was saved");
                match field_flag(*field) {
                    Some(flag) => {
                        err.with_suggestion(format!("TRY: Provide a valid value with {}", flag))
                    }
                    None => err,
                }
            }
            DbError::StorageUnavailable(reason) => Self::new("Plant database is unavailable")
                .with_context(reason.clone())
                .with_suggestion("TRY: Check the path with: plantstock config"),
            DbError::InvalidState(reason) => Self::new("Plant database is in an unexpected state")
                .with_context(reason.clone())
                .with_suggestions([
                    "TRY: The file may come from a newer PlantStock; upgrade this binary",
                    "TRY: Use a fresh database: plantstock --db PATH ...",
                ]),
            DbError::InsertFailed(_) => Self::new("Failed to save the plant")
                .with_context(err.to_string())
                .with_suggestion("TRY: Run again with -v for details"),
            other => Self::new(other.to_string()),
        }
    }
}

impl From<DbError> for HelpfulError {
    fn from(err: DbError) -> Self {
        Self::from_db(&err)
    }
}

fn field_label(column: Column) -> &'static str {
    match column {
        Column::Id => "ID",
        Column::Name => "name",
        Column::Price => "price",
        Column::Quantity => "quantity",
        Column::Image => "image",
        Column::SupplierName => "supplier name",
        Column::SupplierPhone => "supplier phone",
        Column::SupplierEmail => "supplier email",
    }
}

fn field_flag(column: Column) -> Option<&'static str> {
    match column {
        Column::Id => None,
        Column::Name => Some("--name"),
        Column::Price => Some("--price"),
        Column::Quantity => Some("--quantity"),
        Column::Image => Some("--image"),
        Column::SupplierName => Some("--supplier-name"),
        Column::SupplierPhone => Some("--supplier-phone"),
        Column::SupplierEmail => Some("--supplier-email"),
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpful_error_display() {
        let err = HelpfulError::new("Something went wrong")
            .with_context("While saving")
            .with_suggestion("Try again");

        let display = format!("{}", err);
        assert!(display.contains("ERROR: Something went wrong"));
        assert!(display.contains("CONTEXT: While saving"));
        assert!(display.contains("Try again"));
    }

    #[test]
    fn test_validation_error_names_flag() {
        let err =
            HelpfulError::from(DbError::validation(Column::SupplierEmail, "must not be empty"));
        let display = err.to_string();
        assert!(display.contains("Invalid supplier email: must not be empty"));
        assert!(display.contains("--supplier-email"));
        assert!(display.contains("Nothing was saved"));
    }

    #[test]
    fn test_id_validation_has_no_flag() {
        let source = DbError::validation(Column::Id, "id is assigned by the store");
        let err = HelpfulError::from_db(&source);
        assert!(err.suggestions.is_empty());
    }

    #[test]
    fn test_invalid_state_suggests_fresh_db() {
        let err = HelpfulError::from_db(&DbError::invalid_state("schema version 7 is newer"));
        assert_eq!(err.context.as_deref(), Some("schema version 7 is newer"));
        assert!(err.suggestions.iter().any(|s| s.contains("--db")));
    }
}
