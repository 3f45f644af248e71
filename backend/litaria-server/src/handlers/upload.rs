/// Image upload handler - multipart form with a single `file` field
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::uploads::ImageUploader;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;

/// POST /api/v1/upload
pub async fn upload_image(
    uploader: web::Data<Arc<ImageUploader>>,
    user_id: UserId,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let mut file: Option<(Vec<u8>, String)> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::Validation(format!("Invalid multipart payload: {}", e)))?;

        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().map(|mime| mime.to_string());
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload")
            .to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?;
            bytes.extend_from_slice(&chunk);
            // Check as we read so an oversized body is rejected early.
            uploader.validate(content_type.as_deref(), bytes.len())?;
        }

        file = Some((bytes, filename));
        break;
    }

    let (bytes, filename) =
        file.ok_or_else(|| AppError::Validation("No file field in upload".into()))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }

    let image = uploader.upload(bytes, &filename).await?;

    tracing::info!(user_id = %user_id.0, public_id = %image.public_id, "image uploaded");

    Ok(HttpResponse::Created().json(json!({
        "message": "Image uploaded successfully",
        "image": image,
    })))
}
