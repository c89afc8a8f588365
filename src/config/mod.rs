pub mod noise;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub vocabulary: VocabularyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Folder holding uploaded vocabulary CSV files
    pub upload_folder: PathBuf,
    /// Optional YAML file overriding the built-in noise rules
    pub noise_rules_path: Option<PathBuf>,
    /// Header of the CSV column holding ingredient names
    pub ingredient_column: String,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/meals.db?mode=rwc".to_string());

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid DATABASE_MAX_CONNECTIONS value".to_string()))?;

        let min_connections = std::env::var("DATABASE_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid DATABASE_MIN_CONNECTIONS value".to_string()))?;

        let connection_timeout_seconds = std::env::var("DATABASE_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid DATABASE_CONNECTION_TIMEOUT value".to_string()))?;

        let idle_timeout_seconds = std::env::var("DATABASE_IDLE_TIMEOUT")
            .unwrap_or_else(|_| "600".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid DATABASE_IDLE_TIMEOUT value".to_string()))?;

        let upload_folder = std::env::var("UPLOAD_FOLDER")
            .unwrap_or_else(|_| "./data/uploads".to_string())
            .into();

        let noise_rules_path = std::env::var("NOISE_RULES_PATH").ok().map(PathBuf::from);

        let ingredient_column =
            std::env::var("INGREDIENT_COLUMN").unwrap_or_else(|_| "Ingredient".to_string());

        Ok(Settings {
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                min_connections,
                connection_timeout_seconds,
                idle_timeout_seconds,
            },
            vocabulary: VocabularyConfig {
                upload_folder,
                noise_rules_path,
                ingredient_column,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "Database max connections must be non-zero".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(Error::Config(
                "Database min connections cannot exceed max connections".to_string(),
            ));
        }

        if self.vocabulary.ingredient_column.trim().is_empty() {
            return Err(Error::Config(
                "Ingredient column name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> Settings {
        Settings {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 5,
                min_connections: 1,
                connection_timeout_seconds: 30,
                idle_timeout_seconds: 600,
            },
            vocabulary: VocabularyConfig {
                upload_folder: "/tmp/uploads".into(),
                noise_rules_path: None,
                ingredient_column: "Ingredient".to_string(),
            },
        }
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = test_settings();
        assert!(settings.validate().is_ok());

        settings.database.max_connections = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_connection_bounds() {
        let mut settings = test_settings();
        settings.database.min_connections = 6;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_blank_ingredient_column() {
        let mut settings = test_settings();
        settings.vocabulary.ingredient_column = "  ".to_string();
        assert!(settings.validate().is_err());
    }
}
