use crate::db::{models::*, DbPool};
use crate::error::{Error, Result};
use crate::vocabulary::canonicalize;
use chrono::Utc;
use sqlx::{Acquire, Sqlite};

/// Find a user's ingredient by name
pub async fn find_ingredient<'a, A>(conn: A, user_id: i64, name: &str) -> Result<Option<Ingredient>>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let canonical = canonicalize(name);

    let ingredient = sqlx::query_as::<_, Ingredient>(
        "SELECT * FROM ingredients WHERE name = ? AND user_id = ?",
    )
    .bind(&canonical)
    .bind(user_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(ingredient)
}

/// Get or create a user's ingredient by name
pub async fn get_or_create_ingredient<'a, A>(conn: A, user_id: i64, name: &str) -> Result<Ingredient>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let canonical = canonicalize(name);
    if canonical.is_empty() {
        return Err(Error::Validation("Ingredient name cannot be empty".to_string()));
    }

    // Try to find existing ingredient
    if let Some(ingredient) = find_ingredient(&mut *conn, user_id, &canonical).await? {
        return Ok(ingredient);
    }

    // Create new ingredient
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "INSERT INTO ingredients (name, user_id, created_at) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(&canonical)
    .bind(user_id)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Ok(ingredient)
}

/// Add ingredient to recipe
pub async fn add_recipe_ingredient<'a, A>(conn: A, recipe_id: i64, ingredient_id: i64) -> Result<()>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    sqlx::query("INSERT OR IGNORE INTO recipe_ingredients (recipe_id, ingredient_id) VALUES (?, ?)")
        .bind(recipe_id)
        .bind(ingredient_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Get ingredients for a recipe
pub async fn get_recipe_ingredients(pool: &DbPool, recipe_id: i64) -> Result<Vec<Ingredient>> {
    let ingredients = sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT i.*
        FROM ingredients i
        JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
        WHERE ri.recipe_id = ?
        ORDER BY i.name
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(ingredients)
}

/// Get ingredient names for a recipe
pub async fn get_ingredient_names_for_recipe(pool: &DbPool, recipe_id: i64) -> Result<Vec<String>> {
    let ingredients = get_recipe_ingredients(pool, recipe_id).await?;
    Ok(ingredients.into_iter().map(|i| i.name).collect())
}

/// List every ingredient record a user owns
pub async fn list_user_ingredients(pool: &DbPool, user_id: i64) -> Result<Vec<Ingredient>> {
    let ingredients = sqlx::query_as::<_, Ingredient>(
        "SELECT * FROM ingredients WHERE user_id = ? ORDER BY name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ingredients)
}

/// Count total ingredients
pub async fn count_ingredients(pool: &DbPool) -> Result<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ingredients")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Remove all ingredients from a recipe
pub async fn clear_recipe_ingredients<'a, A>(conn: A, recipe_id: i64) -> Result<()>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Delete a user's ingredients that no recipe and no pantry entry refers to
pub async fn delete_unused_ingredients<'a, A>(conn: A, user_id: i64) -> Result<i64>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let result = sqlx::query(
        r#"
        DELETE FROM ingredients
        WHERE user_id = ?
          AND id NOT IN (SELECT DISTINCT ingredient_id FROM recipe_ingredients)
          AND id NOT IN (
              SELECT ingredient_id FROM pantry_items WHERE ingredient_id IS NOT NULL
          )
        "#,
    )
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() as i64)
}
