use crate::models::{
    AuthorSummary, CategorySummary, Post, PostDetail, PostStatus, PromotedPost, SubcategorySummary,
};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

const POST_COLUMNS: &str = "id, title, content, language, image_url, video_url, is_lead, status, \
                            scheduled_date, created_at, updated_at, author_id, category_id, subcategory_id";

/// Filters for post listing. Unset fields are not constrained.
#[derive(Debug, Default, Clone)]
pub struct PostFilter {
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub language: Option<String>,
}

/// Fields written on insert; the service has already validated them.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub language: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_lead: bool,
    pub status: PostStatus,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
}

/// Partial update; `None` leaves the column untouched. Nullable columns use
/// a double Option so "set to null" and "leave alone" stay distinct.
#[derive(Debug, Default, Clone)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
    pub image_url: Option<Option<String>>,
    pub video_url: Option<Option<String>>,
    pub is_lead: Option<bool>,
    pub status: Option<PostStatus>,
    pub scheduled_date: Option<Option<DateTime<Utc>>>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Option<Uuid>>,
}

/// Insert a post inside the caller's transaction.
pub async fn insert_post(
    tx: &mut Transaction<'_, Postgres>,
    new: &NewPost,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        INSERT INTO posts (title, content, language, image_url, video_url, is_lead, status,
                           scheduled_date, author_id, category_id, subcategory_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(&new.title)
    .bind(&new.content)
    .bind(&new.language)
    .bind(&new.image_url)
    .bind(&new.video_url)
    .bind(new.is_lead)
    .bind(new.status)
    .bind(new.scheduled_date)
    .bind(new.author_id)
    .bind(new.category_id)
    .bind(new.subcategory_id)
    .fetch_one(tx.as_mut())
    .await?;

    Ok(post)
}

/// Apply a partial update inside the caller's transaction.
pub async fn update_post(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    changes: &PostChanges,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        UPDATE posts
        SET title          = COALESCE($2, title),
            content        = COALESCE($3, content),
            language       = COALESCE($4, language),
            image_url      = CASE WHEN $5 THEN $6 ELSE image_url END,
            video_url      = CASE WHEN $7 THEN $8 ELSE video_url END,
            is_lead        = COALESCE($9, is_lead),
            status         = COALESCE($10, status),
            scheduled_date = CASE WHEN $11 THEN $12 ELSE scheduled_date END,
            category_id    = COALESCE($13, category_id),
            subcategory_id = CASE WHEN $14 THEN $15 ELSE subcategory_id END,
            updated_at     = NOW()
        WHERE id = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(post_id)
    .bind(&changes.title)
    .bind(&changes.content)
    .bind(&changes.language)
    .bind(changes.image_url.is_some())
    .bind(changes.image_url.clone().flatten())
    .bind(changes.video_url.is_some())
    .bind(changes.video_url.clone().flatten())
    .bind(changes.is_lead)
    .bind(changes.status)
    .bind(changes.scheduled_date.is_some())
    .bind(changes.scheduled_date.flatten())
    .bind(changes.category_id)
    .bind(changes.subcategory_id.is_some())
    .bind(changes.subcategory_id.flatten())
    .fetch_one(tx.as_mut())
    .await?;

    Ok(post)
}

/// Find a post by ID.
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Same as [`find_post_by_id`] but inside a transaction, locking the row.
pub async fn find_post_for_update(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(&format!(
        "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 FOR UPDATE"
    ))
    .bind(post_id)
    .fetch_optional(tx.as_mut())
    .await?;

    Ok(post)
}

fn detail_from_row(row: &sqlx::postgres::PgRow) -> PostDetail {
    let post = Post {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        language: row.get("language"),
        image_url: row.get("image_url"),
        video_url: row.get("video_url"),
        is_lead: row.get("is_lead"),
        status: row.get("status"),
        scheduled_date: row.get("scheduled_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        author_id: row.get("author_id"),
        category_id: row.get("category_id"),
        subcategory_id: row.get("subcategory_id"),
    };

    let subcategory = row
        .get::<Option<Uuid>, _>("subcategory_id")
        .map(|id| SubcategorySummary {
            id,
            name: row.get("subcategory_name"),
        });

    PostDetail {
        author: AuthorSummary {
            id: row.get("author_id"),
            name: row.get("author_name"),
            email: row.get("author_email"),
        },
        category: CategorySummary {
            id: row.get("category_id"),
            name: row.get("category_name"),
        },
        subcategory,
        post,
    }
}

const DETAIL_SELECT: &str = r#"
    SELECT p.id, p.title, p.content, p.language, p.image_url, p.video_url, p.is_lead,
           p.status, p.scheduled_date, p.created_at, p.updated_at,
           p.author_id, p.category_id, p.subcategory_id,
           u.name AS author_name, u.email AS author_email,
           c.name AS category_name,
           s.name AS subcategory_name
    FROM posts p
    JOIN users u ON u.id = p.author_id
    JOIN categories c ON c.id = p.category_id
    LEFT JOIN subcategories s ON s.id = p.subcategory_id
"#;

/// Fetch a post with its author/category/subcategory summaries.
pub async fn find_detail_by_id(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostDetail>, sqlx::Error> {
    let row = sqlx::query(&format!("{DETAIL_SELECT} WHERE p.id = $1"))
        .bind(post_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(detail_from_row))
}

/// Paginated listing with optional filters, newest first.
pub async fn list_details(
    pool: &PgPool,
    filter: &PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        r#"{DETAIL_SELECT}
        WHERE ($1::uuid IS NULL OR p.category_id = $1)
          AND ($2::uuid IS NULL OR p.author_id = $2)
          AND ($3::text IS NULL OR p.language = $3)
        ORDER BY p.created_at DESC
        LIMIT $4 OFFSET $5
        "#
    ))
    .bind(filter.category_id)
    .bind(filter.author_id)
    .bind(&filter.language)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(detail_from_row).collect())
}

/// Count posts matching the filter.
pub async fn count_posts(pool: &PgPool, filter: &PostFilter) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count FROM posts
        WHERE ($1::uuid IS NULL OR category_id = $1)
          AND ($2::uuid IS NULL OR author_id = $2)
          AND ($3::text IS NULL OR language = $3)
        "#,
    )
    .bind(filter.category_id)
    .bind(filter.author_id)
    .bind(&filter.language)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Case-insensitive title/content search, newest first.
pub async fn search_details(
    pool: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let pattern = format!("%{}%", query);
    let rows = sqlx::query(&format!(
        r#"{DETAIL_SELECT}
        WHERE p.title ILIKE $1 OR p.content ILIKE $1
        ORDER BY p.created_at DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(detail_from_row).collect())
}

/// Count posts matching a search query.
pub async fn count_search(pool: &PgPool, query: &str) -> Result<i64, sqlx::Error> {
    let pattern = format!("%{}%", query);
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE title ILIKE $1 OR content ILIKE $1")
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Current lead post, optionally restricted to one language. Most recently
/// updated wins if the invariant was ever violated out-of-band.
pub async fn find_lead_detail(
    pool: &PgPool,
    language: Option<&str>,
) -> Result<Option<PostDetail>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r#"{DETAIL_SELECT}
        WHERE p.is_lead = TRUE AND ($1::text IS NULL OR p.language = $1)
        ORDER BY p.updated_at DESC
        LIMIT 1
        "#
    ))
    .bind(language)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(detail_from_row))
}

/// Clear the lead flag on every post of a language except `keep_id`.
/// Part of the clear-then-set sequence; must run in the same transaction
/// as the write that sets the new lead.
pub async fn clear_leads_for_language(
    tx: &mut Transaction<'_, Postgres>,
    language: &str,
    keep_id: Option<Uuid>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET is_lead = FALSE, updated_at = NOW()
        WHERE language = $1 AND is_lead = TRUE AND ($2::uuid IS NULL OR id <> $2)
        "#,
    )
    .bind(language)
    .bind(keep_id)
    .execute(tx.as_mut())
    .await?;

    Ok(result.rows_affected())
}

/// Set or clear the lead flag on exactly one post.
pub async fn set_lead_flag(
    tx: &mut Transaction<'_, Postgres>,
    post_id: Uuid,
    is_lead: bool,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(&format!(
        r#"
        UPDATE posts
        SET is_lead = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(post_id)
    .bind(is_lead)
    .fetch_one(tx.as_mut())
    .await?;

    Ok(post)
}

/// Delete a post.
pub async fn delete_post(pool: &PgPool, post_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Select due scheduled posts with row locks, ready for batch promotion.
/// `SKIP LOCKED` keeps concurrent sweeps from promoting the same rows.
pub async fn lock_due_scheduled(
    tx: &mut Transaction<'_, Postgres>,
    now: DateTime<Utc>,
) -> Result<Vec<PromotedPost>, sqlx::Error> {
    let due = sqlx::query_as::<_, PromotedPost>(
        r#"
        SELECT id, title, scheduled_date
        FROM posts
        WHERE status = 'scheduled' AND scheduled_date <= $1
        ORDER BY scheduled_date ASC
        FOR UPDATE SKIP LOCKED
        "#,
    )
    .bind(now)
    .fetch_all(tx.as_mut())
    .await?;

    Ok(due)
}

/// Flip a batch of posts to published. Status is the only column touched
/// besides updated_at; ordering semantics stay creation-time driven.
pub async fn promote_to_published(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET status = 'published', updated_at = NOW()
        WHERE id = ANY($1) AND status = 'scheduled'
        "#,
    )
    .bind(ids)
    .execute(tx.as_mut())
    .await?;

    Ok(result.rows_affected())
}

/// All scheduled posts ordered by due date, for the diagnostic endpoint.
pub async fn list_scheduled(pool: &PgPool) -> Result<Vec<Post>, sqlx::Error> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE status = 'scheduled'
        ORDER BY scheduled_date ASC NULLS LAST
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count posts referencing a category (delete guard).
pub async fn count_by_category(pool: &PgPool, category_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE category_id = $1")
        .bind(category_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Count posts referencing a subcategory (delete guard).
pub async fn count_by_subcategory(pool: &PgPool, subcategory_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE subcategory_id = $1")
        .bind(subcategory_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}
