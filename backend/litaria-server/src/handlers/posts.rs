/// Post handlers - CRUD, search, lead management, scheduled publishing
use crate::db::post_repo::PostFilter;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::PostStatus;
use crate::services::posts::{CreatePost, UpdatePost};
use crate::services::{publisher, PostService};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::{Validate, ValidateUrl, ValidationError};

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Distinguishes "field absent" (outer None) from "field set to null"
/// (Some(None)) in partial updates.
fn double_option<'de, T, D>(de: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

fn page_params(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(custom(function = "not_blank", message = "Search query cannot be empty"))]
    pub q: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Whitespace-only queries would turn into an empty ILIKE pattern that
/// matches every post.
fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct LeadQuery {
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,
    #[validate(length(min = 2, max = 10, message = "Language must be 2-10 characters"))]
    pub language: String,
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
    #[validate(url(message = "video_url must be a valid URL"))]
    pub video_url: Option<String>,
    #[serde(default)]
    pub is_lead: bool,
    #[serde(default = "default_status")]
    pub status: PostStatus,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
}

fn default_status() -> PostStatus {
    PostStatus::Draft
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: Option<String>,
    #[validate(length(min = 2, max = 10, message = "Language must be 2-10 characters"))]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub video_url: Option<Option<String>>,
    pub is_lead: Option<bool>,
    pub status: Option<PostStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_date: Option<Option<DateTime<Utc>>>,
    pub category_id: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    pub subcategory_id: Option<Option<Uuid>>,
}

/// The derive's `url` check does not reach through the double-Option
/// wrappers, so patched URLs are checked by hand. `Some(None)` (explicit
/// null, clearing the field) is always fine.
fn check_patch_urls(req: &UpdatePostRequest) -> Result<()> {
    for (field, value) in [("image_url", &req.image_url), ("video_url", &req.video_url)] {
        if let Some(Some(url)) = value {
            if !url.validate_url() {
                return Err(AppError::Validation(format!(
                    "{field} must be a valid URL"
                )));
            }
        }
    }
    Ok(())
}

/// GET /api/v1/posts
pub async fn list_posts(
    service: web::Data<PostService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let (page, limit) = page_params(query.page, query.limit);
    let filter = PostFilter {
        category_id: query.category_id,
        author_id: query.author_id,
        language: query.language.clone(),
    };

    let (posts, pagination) = service.list_posts(filter, page, limit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": pagination,
    })))
}

/// GET /api/v1/posts/search
pub async fn search_posts(
    service: web::Data<PostService>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    query.validate()?;
    let (page, limit) = page_params(query.page, query.limit);

    let (posts, pagination) = service.search_posts(query.q.trim(), page, limit).await?;

    Ok(HttpResponse::Ok().json(json!({
        "posts": posts,
        "pagination": pagination,
    })))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    service: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "post": post })))
}

/// POST /api/v1/posts
pub async fn create_post(
    service: web::Data<PostService>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let post = service
        .create_post(
            user_id.0,
            CreatePost {
                title: req.title,
                content: req.content,
                language: req.language,
                image_url: req.image_url,
                video_url: req.video_url,
                is_lead: req.is_lead,
                status: req.status,
                scheduled_date: req.scheduled_date,
                category_id: req.category_id,
                subcategory_id: req.subcategory_id,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Post created successfully",
        "post": post,
    })))
}

/// PUT /api/v1/posts/{id}
pub async fn update_post(
    service: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    check_patch_urls(&req)?;
    let req = req.into_inner();

    let post = service
        .update_post(
            path.into_inner(),
            user_id.0,
            UpdatePost {
                title: req.title,
                content: req.content,
                language: req.language,
                image_url: req.image_url,
                video_url: req.video_url,
                is_lead: req.is_lead,
                status: req.status,
                scheduled_date: req.scheduled_date,
                category_id: req.category_id,
                subcategory_id: req.subcategory_id,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Post updated successfully",
        "post": post,
    })))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    service: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete_post(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Post deleted successfully" })))
}

/// GET /api/v1/posts/lead
pub async fn get_lead(
    service: web::Data<PostService>,
    query: web::Query<LeadQuery>,
) -> Result<HttpResponse> {
    let post = service.get_lead(query.language.as_deref()).await?;
    Ok(HttpResponse::Ok().json(json!({ "post": post })))
}

/// POST /api/v1/posts/{id}/set-lead
pub async fn set_lead(
    service: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.set_lead(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Post set as lead successfully",
        "post": post,
    })))
}

/// DELETE /api/v1/posts/{id}/set-lead
pub async fn clear_lead(
    service: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.clear_lead(path.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Lead flag removed successfully",
        "post": post,
    })))
}

/// POST /api/v1/posts/publish-scheduled
pub async fn publish_scheduled(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let report = publisher::sweep_due_posts(&pool).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /api/v1/posts/publish-scheduled
pub async fn scheduled_status(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let overview = publisher::scheduled_overview(&pool).await?;
    Ok(HttpResponse::Ok().json(overview))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_are_clamped() {
        assert_eq!(page_params(None, None), (1, 10));
        assert_eq!(page_params(Some(0), Some(0)), (1, 1));
        assert_eq!(page_params(Some(-3), Some(500)), (1, 100));
        assert_eq!(page_params(Some(4), Some(25)), (4, 25));
    }

    #[test]
    fn update_payload_distinguishes_null_from_absent() {
        let req: UpdatePostRequest =
            serde_json::from_str(r#"{"subcategory_id": null, "title": "New"}"#).unwrap();
        assert_eq!(req.subcategory_id, Some(None));
        assert_eq!(req.title.as_deref(), Some("New"));
        assert_eq!(req.image_url, None);

        let req: UpdatePostRequest = serde_json::from_str(r#"{"image_url": "https://x/y.png"}"#)
            .unwrap();
        assert_eq!(req.image_url, Some(Some("https://x/y.png".to_string())));
    }

    #[test]
    fn create_payload_defaults_to_draft() {
        let req: CreatePostRequest = serde_json::from_str(
            r#"{
                "title": "Hello",
                "content": "Body",
                "language": "en",
                "category_id": "7f8a6f2e-9e8b-4f0c-9d58-2f6a9b1c3d4e"
            }"#,
        )
        .unwrap();
        assert_eq!(req.status, PostStatus::Draft);
        assert!(!req.is_lead);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_payload_rejects_malformed_media_urls() {
        let req: CreatePostRequest = serde_json::from_str(
            r#"{
                "title": "Hello",
                "content": "Body",
                "language": "en",
                "image_url": "not a url",
                "category_id": "7f8a6f2e-9e8b-4f0c-9d58-2f6a9b1c3d4e"
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_err());

        let req: CreatePostRequest = serde_json::from_str(
            r#"{
                "title": "Hello",
                "content": "Body",
                "language": "en",
                "image_url": "https://res.cloudinary.com/demo/image/upload/cover.jpg",
                "video_url": "https://www.youtube.com/watch?v=abc",
                "category_id": "7f8a6f2e-9e8b-4f0c-9d58-2f6a9b1c3d4e"
            }"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn patched_media_urls_are_checked() {
        let bad = UpdatePostRequest {
            image_url: Some(Some("just-text".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            check_patch_urls(&bad),
            Err(AppError::Validation(_))
        ));

        let good = UpdatePostRequest {
            image_url: Some(Some("https://res.cloudinary.com/demo/cover.jpg".to_string())),
            video_url: Some(None),
            ..Default::default()
        };
        assert!(check_patch_urls(&good).is_ok());

        assert!(check_patch_urls(&UpdatePostRequest::default()).is_ok());
    }

    #[test]
    fn blank_search_queries_are_rejected() {
        let query = SearchQuery {
            q: "   ".to_string(),
            page: None,
            limit: None,
        };
        assert!(query.validate().is_err());

        let query = SearchQuery {
            q: " poetry ".to_string(),
            page: None,
            limit: None,
        };
        assert!(query.validate().is_ok());
    }
}
