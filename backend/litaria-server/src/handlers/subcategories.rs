/// Subcategory handlers - rename and delete (creation is nested under
/// /categories/{id}/subcategories)
use crate::error::Result;
use crate::handlers::categories::RenameRequest;
use crate::middleware::UserId;
use crate::services::CategoryService;
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// PUT /api/v1/subcategories/{id}
pub async fn rename_subcategory(
    service: web::Data<CategoryService>,
    _user_id: UserId,
    path: web::Path<Uuid>,
    req: web::Json<RenameRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let subcategory = service
        .rename_subcategory(path.into_inner(), req.name.trim())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Subcategory updated successfully",
        "subcategory": subcategory,
    })))
}

/// DELETE /api/v1/subcategories/{id}
pub async fn delete_subcategory(
    service: web::Data<CategoryService>,
    _user_id: UserId,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete_subcategory(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Subcategory deleted successfully" })))
}
