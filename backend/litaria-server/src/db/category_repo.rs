use crate::models::{Category, CategoryWithCount};
use sqlx::PgPool;
use uuid::Uuid;

const COUNTED_SELECT: &str = r#"
    SELECT c.id, c.name, c.language, c.created_at,
           COUNT(p.id) AS post_count
    FROM categories c
    LEFT JOIN posts p ON p.category_id = c.id
"#;

/// List categories for a language with post counts, name order.
pub async fn list_by_language(
    pool: &PgPool,
    language: &str,
) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
    let categories = sqlx::query_as::<_, CategoryWithCount>(&format!(
        r#"{COUNTED_SELECT}
        WHERE c.language = $1
        GROUP BY c.id
        ORDER BY c.name ASC
        "#
    ))
    .bind(language)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

/// Fetch one category with its post count.
pub async fn find_with_count(
    pool: &PgPool,
    category_id: Uuid,
) -> Result<Option<CategoryWithCount>, sqlx::Error> {
    let category = sqlx::query_as::<_, CategoryWithCount>(&format!(
        "{COUNTED_SELECT} WHERE c.id = $1 GROUP BY c.id"
    ))
    .bind(category_id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Fetch one category.
pub async fn find_by_id(pool: &PgPool, category_id: Uuid) -> Result<Option<Category>, sqlx::Error> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, language, created_at FROM categories WHERE id = $1",
    )
    .bind(category_id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Uniqueness probe for (name, language), optionally excluding one row.
pub async fn find_duplicate(
    pool: &PgPool,
    name: &str,
    language: &str,
    exclude_id: Option<Uuid>,
) -> Result<Option<Category>, sqlx::Error> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, language, created_at
        FROM categories
        WHERE name = $1 AND language = $2 AND ($3::uuid IS NULL OR id <> $3)
        "#,
    )
    .bind(name)
    .bind(language)
    .bind(exclude_id)
    .fetch_optional(pool)
    .await?;

    Ok(category)
}

/// Insert a new category.
pub async fn insert(pool: &PgPool, name: &str, language: &str) -> Result<Category, sqlx::Error> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, language)
        VALUES ($1, $2)
        RETURNING id, name, language, created_at
        "#,
    )
    .bind(name)
    .bind(language)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Rename a category.
pub async fn rename(pool: &PgPool, category_id: Uuid, name: &str) -> Result<Category, sqlx::Error> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET name = $2
        WHERE id = $1
        RETURNING id, name, language, created_at
        "#,
    )
    .bind(category_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Delete a category. The service checks the reference-count guard first;
/// the FK constraint backs it up at the storage layer.
pub async fn delete(pool: &PgPool, category_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(category_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
