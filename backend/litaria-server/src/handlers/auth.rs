/// Auth handlers - registration and login
use crate::error::Result;
use crate::services::AccountService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /api/v1/auth/register
pub async fn register(
    service: web::Data<AccountService>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let user = service
        .register(req.name.trim(), req.email.trim(), &req.password)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully",
        "user": user,
    })))
}

/// POST /api/v1/auth/login
pub async fn login(
    service: web::Data<AccountService>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let (token, user) = service.login(req.email.trim(), &req.password).await?;

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": user,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_payload_is_validated() {
        let ok = RegisterRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "Sup3rSecret".into(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = RegisterRequest {
            email: "not-an-email".into(),
            ..ok_clone(&ok)
        };
        assert!(bad_email.validate().is_err());

        let short_password = RegisterRequest {
            password: "short".into(),
            ..ok_clone(&ok)
        };
        assert!(short_password.validate().is_err());
    }

    fn ok_clone(req: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            name: req.name.clone(),
            email: req.email.clone(),
            password: req.password.clone(),
        }
    }
}
