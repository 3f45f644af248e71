/// Post service - creation, retrieval, mutation, and the lead-post invariant
///
/// Invariants enforced here:
/// - at most one lead post per language (clear-then-set, single transaction,
///   backed by a partial unique index)
/// - a subcategory on a post must belong to the post's category
/// - a scheduled post must carry a future scheduled date
use crate::db::post_repo::{self, NewPost, PostChanges, PostFilter};
use crate::db::{category_repo, subcategory_repo};
use crate::error::{AppError, Result};
use crate::middleware::permissions::check_post_ownership;
use crate::models::{Pagination, Post, PostDetail, PostStatus, Subcategory};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostService {
    pool: PgPool,
}

/// Validated input for post creation.
#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub language: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_lead: bool,
    pub status: PostStatus,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
}

/// Partial update input; `None` means "leave unchanged".
#[derive(Debug, Default, Clone)]
pub struct UpdatePost {
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

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a post. If it claims the lead slot, other leads of the same
    /// language are cleared in the same transaction as the insert.
    pub async fn create_post(&self, author_id: Uuid, input: CreatePost) -> Result<PostDetail> {
        let category = category_repo::find_by_id(&self.pool, input.category_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The selected category does not exist".into()))?;

        self.check_subcategory_scope(input.subcategory_id, category.id)
            .await?;
        check_schedule(input.status, input.scheduled_date, Utc::now())?;

        let mut tx = self.pool.begin().await?;

        if input.is_lead {
            post_repo::clear_leads_for_language(&mut tx, &input.language, None).await?;
        }

        let post = post_repo::insert_post(
            &mut tx,
            &NewPost {
                title: input.title,
                content: input.content,
                language: input.language,
                image_url: input.image_url,
                video_url: input.video_url,
                is_lead: input.is_lead,
                status: input.status,
                scheduled_date: input.scheduled_date,
                author_id,
                category_id: input.category_id,
                subcategory_id: input.subcategory_id,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");

        self.detail(post.id).await
    }

    /// Update a post. Only the owner may mutate it; lead claiming follows
    /// the same clear-then-set rule as creation.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        input: UpdatePost,
    ) -> Result<PostDetail> {
        let existing = self.owned_post(post_id, user_id).await?;

        // Effective values after the patch, for cross-field validation.
        let category_id = input.category_id.unwrap_or(existing.category_id);
        let language = input
            .language
            .clone()
            .unwrap_or_else(|| existing.language.clone());
        let status = input.status.unwrap_or(existing.status);
        let scheduled_date = input.scheduled_date.unwrap_or(existing.scheduled_date);
        let subcategory_id = input.subcategory_id.unwrap_or(existing.subcategory_id);
        let is_lead = input.is_lead.unwrap_or(existing.is_lead);

        if input.category_id.is_some() {
            category_repo::find_by_id(&self.pool, category_id)
                .await?
                .ok_or_else(|| AppError::NotFound("The selected category does not exist".into()))?;
        }

        // Re-check scoping whenever either side of the pair may have moved.
        if input.subcategory_id.is_some() || input.category_id.is_some() {
            self.check_subcategory_scope(subcategory_id, category_id)
                .await?;
        }

        if input.status.is_some() || input.scheduled_date.is_some() {
            check_schedule(status, scheduled_date, Utc::now())?;
        }

        let mut tx = self.pool.begin().await?;

        // The effective lead flag decides, not just the payload: a lead post
        // moving to another language must also claim that language's slot,
        // or the partial unique index rejects the update.
        if is_lead {
            post_repo::clear_leads_for_language(&mut tx, &language, Some(post_id)).await?;
        }

        let changes = PostChanges {
            title: input.title,
            content: input.content,
            language: input.language,
            image_url: input.image_url,
            video_url: input.video_url,
            is_lead: input.is_lead,
            status: input.status,
            scheduled_date: input.scheduled_date,
            category_id: input.category_id,
            subcategory_id: input.subcategory_id,
        };
        let post = post_repo::update_post(&mut tx, post_id, &changes).await?;

        tx.commit().await?;

        tracing::info!(post_id = %post.id, user_id = %user_id, "post updated");

        self.detail(post.id).await
    }

    /// Delete a post. Owner only.
    pub async fn delete_post(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        self.owned_post(post_id, user_id).await?;
        post_repo::delete_post(&self.pool, post_id).await?;
        tracing::info!(post_id = %post_id, user_id = %user_id, "post deleted");
        Ok(())
    }

    /// Fetch one post with relations.
    pub async fn get_post(&self, post_id: Uuid) -> Result<PostDetail> {
        self.detail(post_id).await
    }

    /// Paginated listing with optional filters.
    pub async fn list_posts(
        &self,
        filter: PostFilter,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<PostDetail>, Pagination)> {
        let offset = (page - 1) * limit;
        let posts = post_repo::list_details(&self.pool, &filter, limit, offset).await?;
        let total = post_repo::count_posts(&self.pool, &filter).await?;
        Ok((posts, Pagination::new(page, limit, total)))
    }

    /// Case-insensitive search over title and content.
    pub async fn search_posts(
        &self,
        query: &str,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<PostDetail>, Pagination)> {
        let offset = (page - 1) * limit;
        let posts = post_repo::search_details(&self.pool, query, limit, offset).await?;
        let total = post_repo::count_search(&self.pool, query).await?;
        Ok((posts, Pagination::new(page, limit, total)))
    }

    /// Current lead post for a language (or any language).
    pub async fn get_lead(&self, language: Option<&str>) -> Result<Option<PostDetail>> {
        Ok(post_repo::find_lead_detail(&self.pool, language).await?)
    }

    /// Make a post the lead for its language. One transaction: lock the
    /// target, clear every other lead of that language, set the flag.
    pub async fn set_lead(&self, post_id: Uuid, user_id: Uuid) -> Result<PostDetail> {
        let mut tx = self.pool.begin().await?;

        let post = post_repo::find_post_for_update(&mut tx, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The requested post does not exist".into()))?;

        check_post_ownership(user_id, &post)?;

        post_repo::clear_leads_for_language(&mut tx, &post.language, Some(post_id)).await?;
        post_repo::set_lead_flag(&mut tx, post_id, true).await?;

        tx.commit().await?;

        tracing::info!(post_id = %post_id, language = %post.language, "lead post set");

        self.detail(post_id).await
    }

    /// Clear the lead flag on exactly one post. No side effects on others.
    pub async fn clear_lead(&self, post_id: Uuid, user_id: Uuid) -> Result<PostDetail> {
        let mut tx = self.pool.begin().await?;

        let post = post_repo::find_post_for_update(&mut tx, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The requested post does not exist".into()))?;

        check_post_ownership(user_id, &post)?;

        post_repo::set_lead_flag(&mut tx, post_id, false).await?;

        tx.commit().await?;

        self.detail(post_id).await
    }

    async fn detail(&self, post_id: Uuid) -> Result<PostDetail> {
        post_repo::find_detail_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The requested post does not exist".into()))
    }

    async fn owned_post(&self, post_id: Uuid, user_id: Uuid) -> Result<Post> {
        let post = post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("The requested post does not exist".into()))?;

        check_post_ownership(user_id, &post)?;

        Ok(post)
    }

    async fn check_subcategory_scope(
        &self,
        subcategory_id: Option<Uuid>,
        category_id: Uuid,
    ) -> Result<()> {
        let Some(subcategory_id) = subcategory_id else {
            return Ok(());
        };

        let subcategory = subcategory_repo::find_by_id(&self.pool, subcategory_id)
            .await?
            .ok_or_else(|| {
                AppError::Validation("The selected subcategory does not exist".into())
            })?;

        check_subcategory_parent(&subcategory, category_id)
    }
}

/// Scoping rule: a subcategory may only be attached to a post whose
/// category is the subcategory's own parent.
fn check_subcategory_parent(subcategory: &Subcategory, category_id: Uuid) -> Result<()> {
    if subcategory.category_id != category_id {
        return Err(AppError::Validation(
            "The selected subcategory does not belong to the selected category".into(),
        ));
    }

    Ok(())
}

/// Scheduling rule: `scheduled` requires a scheduled date in the future;
/// other states carry the date unchecked (it is informational there).
fn check_schedule(
    status: PostStatus,
    scheduled_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<()> {
    if status != PostStatus::Scheduled {
        return Ok(());
    }

    match scheduled_date {
        None => Err(AppError::Validation(
            "A scheduled post requires a scheduled date".into(),
        )),
        Some(date) if date <= now => Err(AppError::Validation(
            "The scheduled date must be in the future".into(),
        )),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn scheduled_posts_need_a_future_date() {
        let now = Utc::now();

        assert!(check_schedule(PostStatus::Scheduled, Some(now + Duration::hours(1)), now).is_ok());
        assert!(check_schedule(PostStatus::Scheduled, None, now).is_err());
        assert!(check_schedule(PostStatus::Scheduled, Some(now - Duration::hours(1)), now).is_err());
        assert!(check_schedule(PostStatus::Scheduled, Some(now), now).is_err());
    }

    #[test]
    fn drafts_and_published_posts_ignore_the_date() {
        let now = Utc::now();
        let past = Some(now - Duration::hours(1));

        assert!(check_schedule(PostStatus::Draft, past, now).is_ok());
        assert!(check_schedule(PostStatus::Published, None, now).is_ok());
    }

    #[test]
    fn subcategories_must_belong_to_the_posts_category() {
        let parent = Uuid::new_v4();
        let subcategory = Subcategory {
            id: Uuid::new_v4(),
            name: "Poetry".into(),
            category_id: parent,
            created_at: Utc::now(),
        };

        assert!(check_subcategory_parent(&subcategory, parent).is_ok());
        assert!(matches!(
            check_subcategory_parent(&subcategory, Uuid::new_v4()),
            Err(AppError::Validation(_))
        ));
    }
}
