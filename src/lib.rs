pub mod config;
pub mod db;
pub mod error;

// Ingredient recognition
pub mod extractor;
pub mod vocabulary;

// Vocabulary ingestion
pub mod ingest;

// Recipe workflow
pub mod recipes;

// Command-line interface
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use extractor::{IngredientExtractor, NoiseRule, NoiseRules};
pub use recipes::RecipeBook;
pub use vocabulary::{Vocabulary, VocabularyIndex};
