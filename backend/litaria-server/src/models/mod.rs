/// Data models for litaria-server
///
/// Defines the persistent entities (Post, Category, Subcategory, User), the
/// post publication state machine, and the response shapes shared between
/// handlers.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Publication state of a post.
///
/// Transitions are forward-only: authors set `draft`, `scheduled`, or
/// `published` directly; the sweeper performs the single automated
/// transition `scheduled -> published` once the scheduled date is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Scheduled => "scheduled",
            PostStatus::Published => "published",
        }
    }

    /// Whether a post in this state with the given scheduled date is
    /// eligible for automated promotion to `published`.
    pub fn is_due(&self, scheduled_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        matches!(self, PostStatus::Scheduled)
            && scheduled_date.map(|date| date <= now).unwrap_or(false)
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "scheduled" => Ok(PostStatus::Scheduled),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status: {}", other)),
        }
    }
}

/// A content unit authored by a user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub language: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_lead: bool,
    pub status: PostStatus,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
}

/// A named grouping scoped to one language.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

/// A named grouping nested under exactly one category.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// An author. The password hash never leaves the service.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user for API responses.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategorySummary {
    pub id: Uuid,
    pub name: String,
}

/// Post together with its author/category/subcategory summaries, the shape
/// all read endpoints return.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub author: AuthorSummary,
    pub category: CategorySummary,
    pub subcategory: Option<SubcategorySummary>,
}

/// Category with the number of posts attached to it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryWithCount {
    pub id: Uuid,
    pub name: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
    pub post_count: i64,
}

/// Subcategory with the number of posts attached to it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SubcategoryWithCount {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub post_count: i64,
}

/// Pagination envelope shared by all list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub total_posts: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total_posts: i64) -> Self {
        let total_pages = if limit > 0 {
            (total_posts + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total_pages,
            total_posts,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

/// A post promoted by the sweeper.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PromotedPost {
    pub id: Uuid,
    pub title: String,
    pub scheduled_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [PostStatus::Draft, PostStatus::Scheduled, PostStatus::Published] {
            assert_eq!(status.as_str().parse::<PostStatus>().unwrap(), status);
        }
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn only_scheduled_posts_with_past_dates_are_due() {
        let now = Utc::now();
        let past = Some(now - Duration::hours(1));
        let future = Some(now + Duration::hours(1));

        assert!(PostStatus::Scheduled.is_due(past, now));
        assert!(PostStatus::Scheduled.is_due(Some(now), now));
        assert!(!PostStatus::Scheduled.is_due(future, now));
        assert!(!PostStatus::Scheduled.is_due(None, now));
        // Promotion is idempotent: published posts are never selected again.
        assert!(!PostStatus::Published.is_due(past, now));
        assert!(!PostStatus::Draft.is_due(past, now));
    }

    #[test]
    fn pagination_math_handles_partial_pages() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next_page);
        assert!(!p.has_prev_page);

        let last = Pagination::new(3, 10, 25);
        assert!(!last.has_next_page);
        assert!(last.has_prev_page);

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);
    }
}
