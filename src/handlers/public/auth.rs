use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, verify_password, Claims};
use crate::config;
use crate::database::models::user::AppUser;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - authenticate and receive a JWT for the protected API
pub async fn login(Json(body): Json<LoginRequest>) -> ApiResult<Value> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query_as::<_, AppUser>(
        "SELECT * FROM app_user WHERE email = $1 AND enabled = TRUE",
    )
    .bind(body.email.trim())
    .fetch_optional(&pool)
    .await?;

    // Same message for unknown email and wrong password
    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid login credentials"))?;
    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid login credentials"));
    }

    let claims = Claims::new(user.email.clone(), user.full_name.clone(), user.id);
    let token = generate_jwt(claims)?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "full_name": user.full_name,
        },
        "expires_in": expires_in,
    })))
}
