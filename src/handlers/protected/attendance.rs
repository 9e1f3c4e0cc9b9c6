use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::hrms::EmployeeCheckin;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::status_error;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::resolve_employee;

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub log_type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device_id: Option<String>,
    pub device_type: Option<String>,
}

/// POST /api/attendance/checkin - record an IN/OUT punch stamped with the
/// server clock
pub async fn employee_checkin(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CheckinRequest>,
) -> ApiResult<Value> {
    match body.log_type.as_str() {
        "IN" | "OUT" => {}
        other => {
            return Err(ApiError::bad_request(format!(
                "log_type must be IN or OUT, got '{}'",
                other
            )))
        }
    }

    let pool = DatabaseManager::pool().await?;
    let employee = resolve_employee(&pool, &user.email)
        .await?
        .ok_or_else(|| ApiError::forbidden("No Employee record found linked to this user."))?;

    let inserted = sqlx::query_as::<_, EmployeeCheckin>(
        "INSERT INTO employee_checkin (employee, log_type, time, latitude, longitude, device_id, device_type) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(employee.id)
    .bind(&body.log_type)
    .bind(Utc::now())
    .bind(body.latitude)
    .bind(body.longitude)
    .bind(&body.device_id)
    .bind(&body.device_type)
    .fetch_one(&pool)
    .await;

    match inserted {
        Ok(checkin) => Ok(ApiResponse::success(json!({
            "status": "success",
            "message": format!("Successfully marked {}", body.log_type),
            "data": checkin,
        }))),
        Err(e) => {
            tracing::error!("Checkin error: {}", e);
            Ok(ApiResponse::success(status_error(e.to_string())))
        }
    }
}
