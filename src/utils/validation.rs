// Validation utilities
use crate::error::{Error, Result};
use std::path::Path;
use tracing::warn;

/// Longest name accepted for recipes, ingredients and pantry items
pub const MAX_NAME_LENGTH: usize = 500;

/// Validate a user-entered name: non-blank, bounded length, no control characters
pub fn validate_name(field: &str, name: &str) -> Result<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{field} cannot be empty")));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "{field} is longer than {MAX_NAME_LENGTH} characters"
        )));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(Error::Validation(format!(
            "{field} cannot contain control characters"
        )));
    }

    Ok(())
}

/// True iff the file has a `.csv` extension, in any case
pub fn is_csv_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Vocabulary files must be CSV
pub fn validate_csv_path(path: &Path) -> Result<()> {
    if !is_csv_path(path) {
        warn!("Rejected non-CSV vocabulary file: {}", path.display());
        return Err(Error::Validation(format!(
            "CSV files only: {}",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Recipe name", "Chicken Soup").is_ok());
        assert!(validate_name("Recipe name", "").is_err());
        assert!(validate_name("Recipe name", "   ").is_err());
        assert!(validate_name("Recipe name", "Soup\u{0}").is_err());
        assert!(validate_name("Recipe name", &"a".repeat(MAX_NAME_LENGTH)).is_ok());
        assert!(validate_name("Recipe name", &"a".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_name_message() {
        let err = validate_name("Pantry item", " ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Pantry item cannot be empty");
    }

    #[test]
    fn test_is_csv_path() {
        assert!(is_csv_path(Path::new("a.csv")));
        assert!(is_csv_path(Path::new("uploads/b.Csv")));
        assert!(!is_csv_path(Path::new("notes.txt")));
        assert!(!is_csv_path(Path::new(".csv")));
        assert!(!is_csv_path(Path::new("csv")));
    }

    #[test]
    fn test_validate_csv_path() {
        assert!(validate_csv_path(Path::new("uploads/ingredients.csv")).is_ok());
        assert!(validate_csv_path(Path::new("uploads/INGREDIENTS.CSV")).is_ok());
        assert!(validate_csv_path(Path::new("uploads/ingredients.xlsx")).is_err());
        assert!(validate_csv_path(Path::new("uploads/ingredients")).is_err());
    }
}
