use crate::config::{noise::load_noise_rules, VocabularyConfig};
use crate::db::{
    self,
    models::{Recipe, RecipeWithIngredients},
    DbPool,
};
use crate::extractor::IngredientExtractor;
use crate::ingest;
use crate::vocabulary::{canonicalize, Vocabulary};
use crate::{Error, Result};
use serde::Serialize;
use sqlx::SqliteConnection;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Answer to a vocabulary lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub name: String,
    pub exact: bool,
    pub prefix: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub completions: Vec<String>,
}

/// Build the vocabulary from the upload folder
pub fn load_vocabulary(config: &VocabularyConfig) -> Result<Arc<Vocabulary>> {
    let vocabulary = Arc::new(Vocabulary::new());
    ingest::load_directory(&vocabulary, &config.upload_folder, &config.ingredient_column)?;

    info!(
        "Vocabulary ready: {} names from {}",
        vocabulary.len(),
        config.upload_folder.display()
    );
    Ok(vocabulary)
}

/// Build the extractor: vocabulary from the upload folder, noise rules from
/// the configured file or the built-in list
pub fn build_extractor(config: &VocabularyConfig) -> Result<IngredientExtractor> {
    let rules = load_noise_rules(config.noise_rules_path.as_deref())?;
    let vocabulary = load_vocabulary(config)?;

    info!("Ingredient extractor ready with {} noise rules", rules.rules().len());
    Ok(IngredientExtractor::new(vocabulary, rules))
}

/// Look a name up in the vocabulary
pub fn lookup(vocabulary: &Vocabulary, name: &str, complete: Option<usize>) -> LookupResult {
    LookupResult {
        name: canonicalize(name),
        exact: vocabulary.contains_exact(name),
        prefix: vocabulary.contains_prefix(name),
        completions: complete
            .map(|limit| vocabulary.complete(name, limit))
            .unwrap_or_default(),
    }
}

/// Read an ingredient list from a file
pub fn read_ingredient_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::Validation(format!(
            "Failed to read ingredient list from {}: {}",
            path.display(),
            e
        ))
    })
}

/// Recognize the ingredients of an inline text or a file
pub fn extract(
    extractor: &IngredientExtractor,
    text: Option<String>,
    file: Option<PathBuf>,
) -> Result<BTreeSet<String>> {
    let input = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => read_ingredient_file(&path)?,
        (None, None) => {
            return Err(Error::Validation(
                "Provide an ingredient list with --text or --file".to_string(),
            ))
        }
    };

    Ok(extractor.extract(&input))
}

/// Names of a recipe's ingredients that are not in its owner's pantry
pub async fn missing(pool: &DbPool, recipe_id: i64) -> Result<Vec<String>> {
    // Surface an unknown recipe instead of an empty list
    db::recipes::get_recipe(pool, recipe_id).await?;

    let missing = db::pantry::missing_ingredients(pool, recipe_id).await?;
    Ok(missing.into_iter().map(|i| i.name).collect())
}

/// A recipe with the names of its recognized ingredients
pub async fn recipe_show(pool: &DbPool, recipe_id: i64) -> Result<RecipeWithIngredients> {
    db::recipes::get_recipe_with_ingredients(pool, recipe_id).await
}

/// Recipes of an existing user
pub async fn recipe_list(pool: &DbPool, user_id: i64) -> Result<Vec<Recipe>> {
    db::users::get_user(pool, user_id).await?;
    db::recipes::list_recipes_by_user(pool, user_id).await
}

/// Remove a pantry item, then the user's ingredient records nothing refers to
/// any more. Returns whether the item existed.
pub async fn pantry_remove(pool: &DbPool, user_id: i64, name: &str) -> Result<bool> {
    db::users::get_user(pool, user_id).await?;

    let mut tx = pool.begin().await?;
    let result = remove_and_prune(&mut *tx, user_id, name).await;
    let removed = db::commit_or_rollback(tx, result).await?;

    if !removed {
        info!("{} is not in the pantry of user {}", name.trim(), user_id);
    }
    Ok(removed)
}

async fn remove_and_prune(conn: &mut SqliteConnection, user_id: i64, name: &str) -> Result<bool> {
    if !db::pantry::remove_pantry_item(&mut *conn, user_id, name).await? {
        return Ok(false);
    }

    let pruned = db::ingredients::delete_unused_ingredients(&mut *conn, user_id).await?;
    if pruned > 0 {
        debug!("Removed {} ingredients no longer used by user {}", pruned, user_id);
    }
    Ok(true)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vocab_config(dir: &Path) -> VocabularyConfig {
        VocabularyConfig {
            upload_folder: dir.to_path_buf(),
            noise_rules_path: None,
            ingredient_column: "Ingredient".to_string(),
        }
    }

    #[test]
    fn test_build_extractor_from_upload_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pantry.csv"), "Ingredient\nbutter\nflour\n").unwrap();

        let extractor = build_extractor(&vocab_config(dir.path())).unwrap();
        let found = extract(&extractor, Some("<li>Butter</li><li>Sugar</li>".to_string()), None).unwrap();

        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["Butter"]);
    }

    #[test]
    fn test_build_extractor_with_rule_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("list.csv"), "Ingredient\nGreen Onion\n").unwrap();

        let mut rules = tempfile::NamedTempFile::new().unwrap();
        write!(
            rules,
            "version: 1\nseparator: \"|\"\nrules:\n  - pattern: \"scallions\"\n    replacement: \"green onion\"\n"
        )
        .unwrap();

        let mut config = vocab_config(dir.path());
        config.noise_rules_path = Some(rules.path().to_path_buf());

        let extractor = build_extractor(&config).unwrap();
        assert_eq!(extractor.rules().separator(), "|");
        assert!(extractor.extract("scallions").contains("Green Onion"));
    }

    #[test]
    fn test_lookup() {
        let vocabulary = Vocabulary::new();
        vocabulary.insert_many(["Chicken Breast", "Chicken Thigh"]);

        let result = lookup(&vocabulary, "chicken", Some(5));
        assert_eq!(result.name, "Chicken");
        assert!(!result.exact);
        assert!(result.prefix);
        assert_eq!(result.completions, vec!["Chicken Breast", "Chicken Thigh"]);

        let result = lookup(&vocabulary, "chicken breast", None);
        assert!(result.exact);
        assert!(result.completions.is_empty());
    }

    #[test]
    fn test_extract_requires_input() {
        let extractor = IngredientExtractor::with_default_rules(Arc::new(Vocabulary::new()));
        assert!(matches!(
            extract(&extractor, None, None),
            Err(Error::Validation(_))
        ));
        assert!(extract(&extractor, None, Some(PathBuf::from("/nonexistent/list.html"))).is_err());
    }

    async fn test_pool() -> DbPool {
        let pool = db::init_pool("sqlite::memory:").await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_recipe_show_and_list() {
        let pool = test_pool().await;
        let vocabulary = Arc::new(Vocabulary::new());
        vocabulary.insert_many(["Rice", "Beans"]);
        let book = crate::RecipeBook::new(
            pool.clone(),
            IngredientExtractor::with_default_rules(vocabulary),
        );

        let user = db::users::create_user(&pool, "Cook").await.unwrap();
        let saved = book
            .save_recipe(user.id, "Rice And Beans", "<li>rice</li><li>beans</li>")
            .await
            .unwrap();

        let shown = recipe_show(&pool, saved.recipe.id).await.unwrap();
        assert_eq!(shown.recipe.name, "Rice And Beans");
        assert_eq!(shown.ingredients, vec!["Beans", "Rice"]);

        let listed = recipe_list(&pool, user.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(matches!(recipe_list(&pool, user.id + 1).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_pantry_remove_prunes_orphaned_ingredients() {
        let pool = test_pool().await;
        let vocabulary = Arc::new(Vocabulary::new());
        vocabulary.insert("Eggs");
        let book = crate::RecipeBook::new(
            pool.clone(),
            IngredientExtractor::with_default_rules(vocabulary),
        );

        let user = db::users::create_user(&pool, "Cook").await.unwrap();
        db::pantry::add_pantry_item(&pool, user.id, "eggs").await.unwrap();
        let saved = book.save_recipe(user.id, "Omelette", "Eggs").await.unwrap();

        // The pantry entry keeps the ingredient record alive
        book.delete_recipe(saved.recipe.id).await.unwrap();
        assert_eq!(db::ingredients::count_ingredients(&pool).await.unwrap(), 1);

        assert!(pantry_remove(&pool, user.id, " EGGS ").await.unwrap());
        assert_eq!(db::ingredients::count_ingredients(&pool).await.unwrap(), 0);
        assert!(!pantry_remove(&pool, user.id, "eggs").await.unwrap());
    }

    #[tokio::test]
    async fn test_pantry_remove_unknown_user() {
        let pool = test_pool().await;
        assert!(matches!(
            pantry_remove(&pool, 42, "Salt").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_unknown_recipe() {
        let pool = test_pool().await;

        assert!(matches!(missing(&pool, 42).await, Err(Error::NotFound(_))));
    }
}
