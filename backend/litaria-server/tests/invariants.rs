//! Database-backed tests for the rules the service layer enforces:
//! lead-post exclusivity per language, subcategory scoping, the category
//! delete guard, and the scheduled-publish sweep.
//!
//! These run against a real Postgres via DATABASE_URL and skip quietly when
//! it is not set. Each test isolates itself with throwaway language tags and
//! names, so a shared database stays usable.

use chrono::{Duration, Utc};
use litaria_server::db::user_repo;
use litaria_server::error::AppError;
use litaria_server::models::PostStatus;
use litaria_server::security::password;
use litaria_server::services::posts::{CreatePost, UpdatePost};
use litaria_server::services::{publisher, CategoryService, PostService};
use sqlx::PgPool;
use uuid::Uuid;

async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: DATABASE_URL not set");
            return None;
        }
    };

    let pool = PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

/// Eight hex chars, short enough to double as a unique `language` value.
fn tag() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

async fn register_author(pool: &PgPool, tag: &str) -> Uuid {
    let hash = password::hash_password("Passw0rd9").expect("hash password");
    let email = format!("author-{tag}@example.com");
    let user = user_repo::insert(pool, "Test Author", &email, &hash)
        .await
        .expect("insert author");
    user.id
}

fn draft(category_id: Uuid, language: &str, title: &str) -> CreatePost {
    CreatePost {
        title: title.to_string(),
        content: "Body".to_string(),
        language: language.to_string(),
        image_url: None,
        video_url: None,
        is_lead: false,
        status: PostStatus::Draft,
        scheduled_date: None,
        category_id,
        subcategory_id: None,
    }
}

async fn count_leads(pool: &PgPool, language: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE language = $1 AND is_lead")
        .bind(language)
        .fetch_one(pool)
        .await
        .expect("count leads")
}

async fn lead_id(pool: &PgPool, language: &str) -> Option<Uuid> {
    sqlx::query_scalar("SELECT id FROM posts WHERE language = $1 AND is_lead")
        .bind(language)
        .fetch_optional(pool)
        .await
        .expect("fetch lead id")
}

async fn post_status(pool: &PgPool, post_id: Uuid) -> PostStatus {
    sqlx::query_scalar("SELECT status FROM posts WHERE id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
        .expect("fetch post status")
}

#[tokio::test]
async fn at_most_one_lead_per_language() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let author = register_author(&pool, &tag).await;
    let categories = CategoryService::new(pool.clone());
    let posts = PostService::new(pool.clone());

    let category = categories
        .create(&format!("Leads {tag}"), &tag)
        .await
        .expect("create category");

    let mut first = draft(category.id, &tag, "First lead");
    first.is_lead = true;
    let first = posts.create_post(author, first).await.expect("create first");

    let mut second = draft(category.id, &tag, "Second lead");
    second.is_lead = true;
    let second = posts
        .create_post(author, second)
        .await
        .expect("create second");

    // The second lead displaces the first.
    assert_eq!(count_leads(&pool, &tag).await, 1);
    assert_eq!(lead_id(&pool, &tag).await, Some(second.post.id));

    let restored = posts
        .set_lead(first.post.id, author)
        .await
        .expect("set first as lead");

    assert!(restored.post.is_lead);
    assert_eq!(count_leads(&pool, &tag).await, 1);
    assert_eq!(lead_id(&pool, &tag).await, Some(first.post.id));
}

#[tokio::test]
async fn lead_changing_language_claims_the_target_slot() {
    let Some(pool) = test_pool().await else { return };
    let tag_a = tag();
    let tag_b = tag();
    let author = register_author(&pool, &tag_a).await;
    let categories = CategoryService::new(pool.clone());
    let posts = PostService::new(pool.clone());

    let category = categories
        .create(&format!("Moves {tag_a}"), &tag_a)
        .await
        .expect("create category");

    let mut lead_a = draft(category.id, &tag_a, "Lead A");
    lead_a.is_lead = true;
    let lead_a = posts.create_post(author, lead_a).await.expect("lead A");

    let mut lead_b = draft(category.id, &tag_b, "Lead B");
    lead_b.is_lead = true;
    let lead_b = posts.create_post(author, lead_b).await.expect("lead B");

    // Move B into A's language without touching is_lead. B stays a lead, so
    // it must displace A instead of tripping the partial unique index.
    let moved = posts
        .update_post(
            lead_b.post.id,
            author,
            UpdatePost {
                language: Some(tag_a.clone()),
                ..Default::default()
            },
        )
        .await
        .expect("move lead B into language A");

    assert!(moved.post.is_lead);
    assert_eq!(moved.post.language, tag_a);
    assert_eq!(count_leads(&pool, &tag_a).await, 1);
    assert_eq!(lead_id(&pool, &tag_a).await, Some(lead_b.post.id));
    assert_eq!(count_leads(&pool, &tag_b).await, 0);
}

#[tokio::test]
async fn mismatched_subcategory_persists_nothing() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let author = register_author(&pool, &tag).await;
    let categories = CategoryService::new(pool.clone());
    let posts = PostService::new(pool.clone());

    let parent = categories
        .create(&format!("Parent {tag}"), &tag)
        .await
        .expect("create parent");
    let other = categories
        .create(&format!("Other {tag}"), &tag)
        .await
        .expect("create other");
    let subcategory = categories
        .create_subcategory(parent.id, &format!("Nested {tag}"))
        .await
        .expect("create subcategory");

    let mut input = draft(other.id, &tag, "Crossed wires");
    input.subcategory_id = Some(subcategory.id);
    let result = posts.create_post(author, input).await;

    assert!(matches!(result, Err(AppError::Validation(_))));

    let written: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
        .bind(author)
        .fetch_one(&pool)
        .await
        .expect("count author posts");
    assert_eq!(written, 0);
}

#[tokio::test]
async fn category_with_posts_cannot_be_deleted() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let author = register_author(&pool, &tag).await;
    let categories = CategoryService::new(pool.clone());
    let posts = PostService::new(pool.clone());

    let category = categories
        .create(&format!("Guarded {tag}"), &tag)
        .await
        .expect("create category");
    let post = posts
        .create_post(author, draft(category.id, &tag, "Attached"))
        .await
        .expect("create post");

    assert!(matches!(
        categories.delete(category.id).await,
        Err(AppError::Conflict(_))
    ));

    // The category survived the refused delete.
    let fetched = categories.get(category.id).await.expect("category remains");
    assert_eq!(fetched.id, category.id);
    assert_eq!(fetched.post_count, 1);

    // Once the last post is gone the delete goes through.
    posts
        .delete_post(post.post.id, author)
        .await
        .expect("delete post");
    categories
        .delete(category.id)
        .await
        .expect("delete empty category");
}

#[tokio::test]
async fn sweep_promotes_only_due_posts_and_is_idempotent() {
    let Some(pool) = test_pool().await else { return };
    let tag = tag();
    let author = register_author(&pool, &tag).await;
    let categories = CategoryService::new(pool.clone());
    let posts = PostService::new(pool.clone());

    let category = categories
        .create(&format!("Queue {tag}"), &tag)
        .await
        .expect("create category");

    let mut due = draft(category.id, &tag, "Due post");
    due.status = PostStatus::Scheduled;
    due.scheduled_date = Some(Utc::now() + Duration::hours(1));
    let due = posts.create_post(author, due).await.expect("create due");

    let mut future = draft(category.id, &tag, "Future post");
    future.status = PostStatus::Scheduled;
    future.scheduled_date = Some(Utc::now() + Duration::days(7));
    let future = posts.create_post(author, future).await.expect("create future");

    // Creation refuses past dates, so backdate the due post directly.
    sqlx::query("UPDATE posts SET scheduled_date = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(due.post.id)
        .execute(&pool)
        .await
        .expect("backdate due post");

    let report = publisher::sweep_due_posts(&pool).await.expect("first sweep");
    let promoted: Vec<Uuid> = report.published_posts.iter().map(|post| post.id).collect();

    assert!(promoted.contains(&due.post.id));
    assert!(!promoted.contains(&future.post.id));
    assert_eq!(post_status(&pool, due.post.id).await, PostStatus::Published);
    assert_eq!(post_status(&pool, future.post.id).await, PostStatus::Scheduled);

    // Nothing newly due, so a second sweep leaves both posts alone.
    let report = publisher::sweep_due_posts(&pool).await.expect("second sweep");
    let promoted: Vec<Uuid> = report.published_posts.iter().map(|post| post.id).collect();
    assert!(!promoted.contains(&due.post.id));
    assert!(!promoted.contains(&future.post.id));
}
