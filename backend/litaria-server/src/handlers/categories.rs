/// Category handlers - listing, CRUD, and nested subcategory routes
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::CategoryService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
    #[validate(length(min = 2, max = 10, message = "Language must be 2-10 characters"))]
    pub language: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RenameRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
}

/// GET /api/v1/categories
pub async fn list_categories(
    service: web::Data<CategoryService>,
    query: web::Query<CategoryListQuery>,
) -> Result<HttpResponse> {
    let language = query.language.as_deref().unwrap_or("en");
    let categories = service.list(language).await?;
    Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    service: web::Data<CategoryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let category = service.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "category": category })))
}

/// POST /api/v1/categories
pub async fn create_category(
    service: web::Data<CategoryService>,
    _user_id: UserId,
    req: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let category = service.create(req.name.trim(), req.language.trim()).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Category created successfully",
        "category": category,
    })))
}

/// PUT /api/v1/categories/{id}
pub async fn rename_category(
    service: web::Data<CategoryService>,
    _user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<RenameRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let category = service.rename(path.into_inner(), req.name.trim()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Category updated successfully",
        "category": category,
    })))
}

/// DELETE /api/v1/categories/{id}
pub async fn delete_category(
    service: web::Data<CategoryService>,
    _user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Category deleted successfully" })))
}

/// GET /api/v1/categories/{id}/subcategories
pub async fn list_subcategories(
    service: web::Data<CategoryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let subcategories = service.list_subcategories(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "subcategories": subcategories })))
}

/// POST /api/v1/categories/{id}/subcategories
pub async fn create_subcategory(
    service: web::Data<CategoryService>,
    _user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<RenameRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let subcategory = service
        .create_subcategory(path.into_inner(), req.name.trim())
        .await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Subcategory created successfully",
        "subcategory": subcategory,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_are_length_checked() {
        let ok = CreateCategoryRequest {
            name: "Culture".into(),
            language: "en".into(),
        };
        assert!(ok.validate().is_ok());

        let empty = CreateCategoryRequest {
            name: "".into(),
            language: "en".into(),
        };
        assert!(empty.validate().is_err());

        let bad_language = CreateCategoryRequest {
            name: "Culture".into(),
            language: "x".into(),
        };
        assert!(bad_language.validate().is_err());

        let too_long = CreateCategoryRequest {
            name: "x".repeat(51),
            language: "en".into(),
        };
        assert!(too_long.validate().is_err());

        let rename_too_long = RenameRequest {
            name: "x".repeat(51),
        };
        assert!(rename_too_long.validate().is_err());
    }
}
