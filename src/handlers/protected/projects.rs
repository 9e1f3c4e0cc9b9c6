use axum::{extract::Path, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::crm::PropertyProject;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::hooks;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ProjectRequest {
    pub project_name: String,
    pub developer: Option<Uuid>,
    pub mandate: Option<Uuid>,
    pub location: Option<String>,
    pub project_type: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
}

fn default_status() -> String {
    "Active".to_string()
}

/// POST /api/projects - create a project, then run the save hook that keeps
/// developer/mandate child lists in sync
pub async fn create_project(Json(body): Json<ProjectRequest>) -> ApiResult<PropertyProject> {
    if body.project_name.trim().is_empty() {
        return Err(ApiError::bad_request("project_name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    let project = sqlx::query_as::<_, PropertyProject>(
        "INSERT INTO property_project \
         (project_name, developer, mandate, location, project_type, status, price_min, price_max) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(body.project_name.trim())
    .bind(body.developer)
    .bind(body.mandate)
    .bind(&body.location)
    .bind(&body.project_type)
    .bind(&body.status)
    .bind(body.price_min)
    .bind(body.price_max)
    .fetch_one(&pool)
    .await?;

    hooks::sync_project_links(&pool, &project).await;

    Ok(ApiResponse::created(project))
}

/// PUT /api/projects/:id - update a project and re-run the sync hook
pub async fn update_project(
    Path(id): Path<Uuid>,
    Json(body): Json<ProjectRequest>,
) -> ApiResult<PropertyProject> {
    if body.project_name.trim().is_empty() {
        return Err(ApiError::bad_request("project_name is required"));
    }

    let pool = DatabaseManager::pool().await?;
    let project = sqlx::query_as::<_, PropertyProject>(
        "UPDATE property_project SET \
         project_name = $2, developer = $3, mandate = $4, location = $5, \
         project_type = $6, status = $7, price_min = $8, price_max = $9, updated_at = NOW() \
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(body.project_name.trim())
    .bind(body.developer)
    .bind(body.mandate)
    .bind(&body.location)
    .bind(&body.project_type)
    .bind(&body.status)
    .bind(body.price_min)
    .bind(body.price_max)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Project not found"))?;

    hooks::sync_project_links(&pool, &project).await;

    Ok(ApiResponse::success(project))
}
