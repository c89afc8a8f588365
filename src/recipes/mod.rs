// Recipe save/edit workflow: persist the recipe, then materialize the
// ingredients recognized in its ingredient list

use crate::db::{self, models::*, DbPool};
use crate::error::Result;
use crate::extractor::IngredientExtractor;
use crate::utils::validation::validate_name;
use serde::Serialize;
use sqlx::SqliteConnection;
use tracing::{debug, info};

/// A saved recipe with the ingredient records linked to it
#[derive(Debug, Clone, Serialize)]
pub struct RecordedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
    /// Pantry entries that were linked to one of the ingredients
    pub pantry_links: usize,
}

impl RecordedRecipe {
    pub fn ingredient_names(&self) -> Vec<&str> {
        self.ingredients.iter().map(|i| i.name.as_str()).collect()
    }
}

/// Entry point for recipe writes that keep recognized ingredients in sync
#[derive(Debug, Clone)]
pub struct RecipeBook {
    pool: DbPool,
    extractor: IngredientExtractor,
}

impl RecipeBook {
    pub fn new(pool: DbPool, extractor: IngredientExtractor) -> Self {
        Self { pool, extractor }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn extractor(&self) -> &IngredientExtractor {
        &self.extractor
    }

    /// Save a new recipe for a user and record its ingredients.
    ///
    /// Runs in one transaction: on error neither the recipe nor any of its
    /// ingredient records are kept.
    pub async fn save_recipe(
        &self,
        user_id: i64,
        name: &str,
        ingredients_text: &str,
    ) -> Result<RecordedRecipe> {
        validate_name("Recipe name", name)?;

        let mut tx = self.pool.begin().await?;
        let result = self.save_in(&mut *tx, user_id, name, ingredients_text).await;
        let recorded = db::commit_or_rollback(tx, result).await?;

        info!(
            "Saved recipe {} ({}) for user {}",
            recorded.recipe.id, recorded.recipe.name, recorded.recipe.user_id
        );
        Ok(recorded)
    }

    /// Replace a recipe's ingredient text and re-record its ingredients.
    ///
    /// Runs in one transaction: on error the previous text and links stay.
    pub async fn edit_recipe(&self, recipe_id: i64, ingredients_text: &str) -> Result<RecordedRecipe> {
        let mut tx = self.pool.begin().await?;
        let result = self.edit_in(&mut *tx, recipe_id, ingredients_text).await;
        let recorded = db::commit_or_rollback(tx, result).await?;

        info!("Updated ingredients of recipe {}", recorded.recipe.id);
        Ok(recorded)
    }

    /// Delete a recipe along with ingredient records nothing else uses
    pub async fn delete_recipe(&self, recipe_id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let result = delete_in(&mut *tx, recipe_id).await;
        let removed = db::commit_or_rollback(tx, result).await?;

        info!(
            "Deleted recipe {} and {} unused ingredients",
            recipe_id, removed
        );
        Ok(())
    }

    async fn save_in(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        name: &str,
        ingredients_text: &str,
    ) -> Result<RecordedRecipe> {
        let user = db::users::get_user(&mut *conn, user_id).await?;

        let recipe = db::recipes::create_recipe(
            &mut *conn,
            &NewRecipe {
                user_id: user.id,
                name: name.trim().to_string(),
                ingredients: ingredients_text.to_string(),
            },
        )
        .await?;

        self.record_ingredients(conn, recipe).await
    }

    async fn edit_in(
        &self,
        conn: &mut SqliteConnection,
        recipe_id: i64,
        ingredients_text: &str,
    ) -> Result<RecordedRecipe> {
        let recipe =
            db::recipes::update_recipe_ingredients(&mut *conn, recipe_id, ingredients_text).await?;

        db::ingredients::clear_recipe_ingredients(&mut *conn, recipe.id).await?;
        let recorded = self.record_ingredients(&mut *conn, recipe).await?;

        let user_id = recorded.recipe.user_id;
        let removed = db::ingredients::delete_unused_ingredients(&mut *conn, user_id).await?;
        if removed > 0 {
            debug!("Removed {} ingredients no longer used by user {}", removed, user_id);
        }

        Ok(recorded)
    }

    /// Extract the recipe's ingredients and link them to it and to the pantry
    async fn record_ingredients(&self, conn: &mut SqliteConnection, recipe: Recipe) -> Result<RecordedRecipe> {
        let names = self.extractor.extract(&recipe.ingredients);

        let mut ingredients = Vec::with_capacity(names.len());
        let mut pantry_links = 0;

        for name in &names {
            let ingredient =
                db::ingredients::get_or_create_ingredient(&mut *conn, recipe.user_id, name).await?;
            db::ingredients::add_recipe_ingredient(&mut *conn, recipe.id, ingredient.id).await?;

            if db::pantry::link_pantry_item(&mut *conn, &ingredient).await? {
                pantry_links += 1;
            }
            ingredients.push(ingredient);
        }

        debug!(
            "Recipe {}: {} ingredients recorded, {} pantry links",
            recipe.id,
            ingredients.len(),
            pantry_links
        );

        Ok(RecordedRecipe {
            recipe,
            ingredients,
            pantry_links,
        })
    }
}

/// Delete a recipe, then the owner's ingredient records nothing refers to.
/// Returns how many ingredient records went with it.
async fn delete_in(conn: &mut SqliteConnection, recipe_id: i64) -> Result<i64> {
    let recipe = db::recipes::get_recipe(&mut *conn, recipe_id).await?;
    db::recipes::delete_recipe(&mut *conn, recipe.id).await?;
    db::ingredients::delete_unused_ingredients(&mut *conn, recipe.user_id).await
}
