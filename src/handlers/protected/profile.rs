use axum::Extension;
use serde_json::Value;

use crate::database::models::crm::Lead;
use crate::database::DatabaseManager;
use crate::handlers::{status_error, status_message};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::resolve_employee;

/// GET /api/me/profile - the employee record linked to the caller
pub async fn get_my_profile(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    match resolve_employee(&pool, &user.email).await? {
        Some(employee) => Ok(ApiResponse::success(
            serde_json::to_value(&employee).unwrap_or(Value::Null),
        )),
        None => Ok(ApiResponse::success(status_error(
            "No Employee record found linked to this user.",
        ))),
    }
}

/// GET /api/me/lead - the lead assigned to the caller
pub async fn get_my_lead(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let lead = sqlx::query_as::<_, Lead>("SELECT * FROM lead WHERE lead_owner = $1")
        .bind(&user.email)
        .fetch_optional(&pool)
        .await?;

    match lead {
        Some(lead) => Ok(ApiResponse::success(
            serde_json::to_value(&lead).unwrap_or(Value::Null),
        )),
        None => Ok(ApiResponse::success(status_message(format!(
            "No Lead found assigned to user {}",
            user.email
        )))),
    }
}
