/// Scheduled-publish sweeper
///
/// Finds posts with `status = scheduled` whose scheduled date has passed
/// and promotes them to `published` in one batch transaction, so the
/// promoted count and the promoted list can never disagree. The sweep is
/// idempotent: a second run with no newly due posts promotes nothing.
use crate::db::post_repo;
use crate::error::Result;
use crate::models::PromotedPost;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Outcome of one sweep cycle.
#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub message: String,
    pub published_count: u64,
    pub published_posts: Vec<PromotedPost>,
}

/// Promote every due scheduled post. Safe to call concurrently: due rows
/// are locked with SKIP LOCKED, so two sweeps split the batch instead of
/// double-promoting.
pub async fn sweep_due_posts(pool: &PgPool) -> Result<SweepReport> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let due = post_repo::lock_due_scheduled(&mut tx, now).await?;

    if due.is_empty() {
        tx.commit().await?;
        return Ok(SweepReport {
            message: "No scheduled posts due for publishing".to_string(),
            published_count: 0,
            published_posts: Vec::new(),
        });
    }

    let ids: Vec<_> = due.iter().map(|post| post.id).collect();
    let promoted = post_repo::promote_to_published(&mut tx, &ids).await?;

    tx.commit().await?;

    tracing::info!(published_count = promoted, "promoted due scheduled posts");

    Ok(SweepReport {
        message: format!("Successfully published {} scheduled posts", promoted),
        published_count: promoted,
        published_posts: due,
    })
}

/// One scheduled post in the diagnostic listing.
#[derive(Debug, Serialize)]
pub struct ScheduledEntry {
    pub id: uuid::Uuid,
    pub title: String,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub is_due: bool,
}

/// Non-mutating view of the scheduled queue.
#[derive(Debug, Serialize)]
pub struct ScheduledOverview {
    pub current_time: DateTime<Utc>,
    pub total_scheduled: usize,
    pub due_posts: usize,
    pub future_posts: usize,
    pub scheduled_posts: Vec<ScheduledEntry>,
}

/// List all scheduled posts with a computed due flag, without mutating
/// anything.
pub async fn scheduled_overview(pool: &PgPool) -> Result<ScheduledOverview> {
    let now = Utc::now();
    let scheduled = post_repo::list_scheduled(pool).await?;

    let entries: Vec<ScheduledEntry> = scheduled
        .into_iter()
        .map(|post| ScheduledEntry {
            is_due: post.status.is_due(post.scheduled_date, now),
            id: post.id,
            title: post.title,
            scheduled_date: post.scheduled_date,
            created_at: post.created_at,
        })
        .collect();

    let due_posts = entries.iter().filter(|entry| entry.is_due).count();

    Ok(ScheduledOverview {
        current_time: now,
        total_scheduled: entries.len(),
        due_posts,
        future_posts: entries.len() - due_posts,
        scheduled_posts: entries,
    })
}
