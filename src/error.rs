use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // Database errors might contain schema details or stored values
            Error::Database(_) => "Database operation failed".to_string(),
            Error::Migration(_) => "Database migration failed".to_string(),

            Error::Io(_) => "File system operation failed".to_string(),
            Error::Csv(e) => format!("CSV error: {e}"),
            Error::Yaml(e) => format!("YAML error: {e}"),
            Error::Json(e) => format!("JSON error: {e}"),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::NotFound(msg) => format!("Not found: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_safe_redacts_database_details() {
        let err = Error::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.log_safe(), "Database operation failed");
    }

    #[test]
    fn test_log_safe_hides_paths() {
        let err = Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "/home/cook/secret/uploads",
        ));
        assert_eq!(err.log_safe(), "File system operation failed");

        let err = Error::NotFound("Recipe 7 not found".to_string());
        assert_eq!(err.log_safe(), "Not found: Recipe 7 not found");
    }

    #[test]
    fn test_display() {
        let err = Error::Validation("Ingredient name cannot be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: Ingredient name cannot be empty"
        );
    }
}
