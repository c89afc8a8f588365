use crate::db::{ingredients, models::*, DbPool};
use crate::error::{Error, Result};
use chrono::Utc;
use sqlx::{Acquire, Sqlite};

/// Create a new recipe
pub async fn create_recipe<'a, A>(conn: A, new_recipe: &NewRecipe) -> Result<Recipe>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let now = Utc::now();

    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        INSERT INTO recipes (user_id, name, ingredients, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(new_recipe.user_id)
    .bind(&new_recipe.name)
    .bind(&new_recipe.ingredients)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(recipe)
}

/// Get recipe by ID
pub async fn get_recipe<'a, A>(conn: A, recipe_id: i64) -> Result<Recipe>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let recipe = sqlx::query_as::<_, Recipe>("SELECT * FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// Get recipe with its recognized ingredient names
pub async fn get_recipe_with_ingredients(
    pool: &DbPool,
    recipe_id: i64,
) -> Result<RecipeWithIngredients> {
    let recipe = get_recipe(pool, recipe_id).await?;
    let ingredients = ingredients::get_ingredient_names_for_recipe(pool, recipe_id).await?;

    Ok(RecipeWithIngredients {
        recipe,
        ingredients,
    })
}

/// Replace the ingredient text of a recipe
pub async fn update_recipe_ingredients<'a, A>(
    conn: A,
    recipe_id: i64,
    ingredients: &str,
) -> Result<Recipe>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let recipe = sqlx::query_as::<_, Recipe>(
        r#"
        UPDATE recipes
        SET ingredients = ?, updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(ingredients)
    .bind(Utc::now())
    .bind(recipe_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| Error::NotFound(format!("Recipe {recipe_id} not found")))?;

    Ok(recipe)
}

/// List a user's recipes
pub async fn list_recipes_by_user(pool: &DbPool, user_id: i64) -> Result<Vec<Recipe>> {
    let recipes = sqlx::query_as::<_, Recipe>(
        "SELECT * FROM recipes WHERE user_id = ? ORDER BY name, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(recipes)
}

/// Delete recipe. Its ingredient links go with it.
pub async fn delete_recipe<'a, A>(conn: A, recipe_id: i64) -> Result<()>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Recipe {recipe_id} not found")));
    }

    Ok(())
}
