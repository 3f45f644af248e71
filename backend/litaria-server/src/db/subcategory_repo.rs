use crate::models::{Subcategory, SubcategoryWithCount};
use sqlx::PgPool;
use uuid::Uuid;

/// List subcategories of a category with post counts, name order.
pub async fn list_by_category(
    pool: &PgPool,
    category_id: Uuid,
) -> Result<Vec<SubcategoryWithCount>, sqlx::Error> {
    let subcategories = sqlx::query_as::<_, SubcategoryWithCount>(
        r#"
        SELECT s.id, s.name, s.category_id, s.created_at,
               COUNT(p.id) AS post_count
        FROM subcategories s
        LEFT JOIN posts p ON p.subcategory_id = s.id
        WHERE s.category_id = $1
        GROUP BY s.id
        ORDER BY s.name ASC
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(subcategories)
}

/// Fetch one subcategory.
pub async fn find_by_id(
    pool: &PgPool,
    subcategory_id: Uuid,
) -> Result<Option<Subcategory>, sqlx::Error> {
    let subcategory = sqlx::query_as::<_, Subcategory>(
        "SELECT id, name, category_id, created_at FROM subcategories WHERE id = $1",
    )
    .bind(subcategory_id)
    .fetch_optional(pool)
    .await?;

    Ok(subcategory)
}

/// Uniqueness probe for (name, category_id), optionally excluding one row.
pub async fn find_duplicate(
    pool: &PgPool,
    name: &str,
    category_id: Uuid,
    exclude_id: Option<Uuid>,
) -> Result<Option<Subcategory>, sqlx::Error> {
    let subcategory = sqlx::query_as::<_, Subcategory>(
        r#"
        SELECT id, name, category_id, created_at
        FROM subcategories
        WHERE name = $1 AND category_id = $2 AND ($3::uuid IS NULL OR id <> $3)
        "#,
    )
    .bind(name)
    .bind(category_id)
    .bind(exclude_id)
    .fetch_optional(pool)
    .await?;

    Ok(subcategory)
}

/// Insert a new subcategory under a category.
pub async fn insert(
    pool: &PgPool,
    name: &str,
    category_id: Uuid,
) -> Result<Subcategory, sqlx::Error> {
    let subcategory = sqlx::query_as::<_, Subcategory>(
        r#"
        INSERT INTO subcategories (name, category_id)
        VALUES ($1, $2)
        RETURNING id, name, category_id, created_at
        "#,
    )
    .bind(name)
    .bind(category_id)
    .fetch_one(pool)
    .await?;

    Ok(subcategory)
}

/// Rename a subcategory.
pub async fn rename(
    pool: &PgPool,
    subcategory_id: Uuid,
    name: &str,
) -> Result<Subcategory, sqlx::Error> {
    let subcategory = sqlx::query_as::<_, Subcategory>(
        r#"
        UPDATE subcategories
        SET name = $2
        WHERE id = $1
        RETURNING id, name, category_id, created_at
        "#,
    )
    .bind(subcategory_id)
    .bind(name)
    .fetch_one(pool)
    .await?;

    Ok(subcategory)
}

/// Delete a subcategory.
pub async fn delete(pool: &PgPool, subcategory_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subcategories WHERE id = $1")
        .bind(subcategory_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
