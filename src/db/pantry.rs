use crate::db::{ingredients, models::*, DbPool};
use crate::error::{Error, Result};
use crate::vocabulary::canonicalize;
use chrono::Utc;
use sqlx::{Acquire, Sqlite};

/// Add a free-text item to a user's pantry, or return the existing entry.
///
/// The name is canonicalized and linked to the user's ingredient record of the
/// same name when one exists.
pub async fn add_pantry_item(pool: &DbPool, user_id: i64, name: &str) -> Result<PantryItem> {
    let canonical = canonicalize(name);
    if canonical.is_empty() {
        return Err(Error::Validation("Pantry item name cannot be empty".to_string()));
    }

    if let Some(item) = get_pantry_item(pool, user_id, &canonical).await? {
        return Ok(item);
    }

    let ingredient_id = ingredients::find_ingredient(pool, user_id, &canonical)
        .await?
        .map(|i| i.id);

    let item = sqlx::query_as::<_, PantryItem>(
        r#"
        INSERT INTO pantry_items (user_id, name, ingredient_id, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&canonical)
    .bind(ingredient_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(item)
}

/// Get a pantry entry by name
pub async fn get_pantry_item(pool: &DbPool, user_id: i64, name: &str) -> Result<Option<PantryItem>> {
    let item = sqlx::query_as::<_, PantryItem>(
        "SELECT * FROM pantry_items WHERE user_id = ? AND name = ?",
    )
    .bind(user_id)
    .bind(canonicalize(name))
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

/// List a user's pantry
pub async fn list_pantry(pool: &DbPool, user_id: i64) -> Result<Vec<PantryItem>> {
    let items = sqlx::query_as::<_, PantryItem>(
        "SELECT * FROM pantry_items WHERE user_id = ? ORDER BY name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Remove a pantry entry. Returns whether one existed.
pub async fn remove_pantry_item<'a, A>(conn: A, user_id: i64, name: &str) -> Result<bool>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let result = sqlx::query("DELETE FROM pantry_items WHERE user_id = ? AND name = ?")
        .bind(user_id)
        .bind(canonicalize(name))
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Point the user's pantry entry with the ingredient's name at that ingredient.
/// Returns whether a pantry entry matched.
pub async fn link_pantry_item<'a, A>(conn: A, ingredient: &Ingredient) -> Result<bool>
where
    A: Acquire<'a, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let result = sqlx::query(
        "UPDATE pantry_items SET ingredient_id = ? WHERE user_id = ? AND name = ?",
    )
    .bind(ingredient.id)
    .bind(ingredient.user_id)
    .bind(&ingredient.name)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Ingredients of a recipe that are not in its owner's pantry
pub async fn missing_ingredients(pool: &DbPool, recipe_id: i64) -> Result<Vec<Ingredient>> {
    let missing = sqlx::query_as::<_, Ingredient>(
        r#"
        SELECT i.*
        FROM ingredients i
        JOIN recipe_ingredients ri ON ri.ingredient_id = i.id
        JOIN recipes r ON r.id = ri.recipe_id
        WHERE ri.recipe_id = ?
          AND NOT EXISTS (
              SELECT 1 FROM pantry_items p
              WHERE p.user_id = r.user_id AND p.name = i.name
          )
        ORDER BY i.name
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(missing)
}
