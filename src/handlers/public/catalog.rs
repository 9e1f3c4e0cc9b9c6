//! Guest-allowed catalog reads: full-record listings for the browse screens
//! the app shows before sign-in, so no auth middleware sits in front of
//! them.

use serde_json::{json, Value};

use crate::database::models::crm::{
    ChannelPartner, Developer, DeveloperProjectRow, Mandate, MandateProjectRow, PropertyProject,
    SalesTeamMember, SiteVisit,
};
use crate::database::models::hrms::{Holiday, HolidayList, ShiftType};
use crate::database::DatabaseManager;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/projects - all property projects
pub async fn get_all_projects() -> ApiResult<Vec<PropertyProject>> {
    let pool = DatabaseManager::pool().await?;
    let projects =
        sqlx::query_as::<_, PropertyProject>("SELECT * FROM property_project ORDER BY project_name")
            .fetch_all(&pool)
            .await?;
    Ok(ApiResponse::success(projects))
}

/// GET /api/developers - all developers with their project child rows
pub async fn get_all_developers() -> ApiResult<Vec<Value>> {
    let pool = DatabaseManager::pool().await?;
    let developers = sqlx::query_as::<_, Developer>("SELECT * FROM developer ORDER BY developer_name")
        .fetch_all(&pool)
        .await?;

    let mut full_data = Vec::with_capacity(developers.len());
    for dev in developers {
        let projects_list = sqlx::query_as::<_, DeveloperProjectRow>(
            "SELECT * FROM developer_project WHERE developer = $1 ORDER BY start_date",
        )
        .bind(dev.id)
        .fetch_all(&pool)
        .await?;

        let mut doc = serde_json::to_value(&dev).unwrap_or(Value::Null);
        doc["projects_list"] = json!(projects_list);
        full_data.push(doc);
    }
    Ok(ApiResponse::success(full_data))
}

/// GET /api/mandates - all mandates with their assigned-project child rows
pub async fn get_all_mandates() -> ApiResult<Vec<Value>> {
    let pool = DatabaseManager::pool().await?;
    let mandates = sqlx::query_as::<_, Mandate>("SELECT * FROM mandate ORDER BY mandate_name")
        .fetch_all(&pool)
        .await?;

    let mut full_data = Vec::with_capacity(mandates.len());
    for mandate in mandates {
        let projects = sqlx::query_as::<_, MandateProjectRow>(
            "SELECT * FROM mandate_project WHERE mandate = $1 ORDER BY start_date",
        )
        .bind(mandate.id)
        .fetch_all(&pool)
        .await?;

        let mut doc = serde_json::to_value(&mandate).unwrap_or(Value::Null);
        doc["projects"] = json!(projects);
        full_data.push(doc);
    }
    Ok(ApiResponse::success(full_data))
}

/// GET /api/site-visits - all site visits
pub async fn get_all_site_visits() -> ApiResult<Vec<SiteVisit>> {
    let pool = DatabaseManager::pool().await?;
    let visits =
        sqlx::query_as::<_, SiteVisit>("SELECT * FROM site_visit ORDER BY created_at DESC")
            .fetch_all(&pool)
            .await?;
    Ok(ApiResponse::success(visits))
}

/// GET /api/channel-partners - all channel partners
pub async fn get_all_channel_partners() -> ApiResult<Vec<ChannelPartner>> {
    let pool = DatabaseManager::pool().await?;
    let partners =
        sqlx::query_as::<_, ChannelPartner>("SELECT * FROM channel_partner ORDER BY partner_name")
            .fetch_all(&pool)
            .await?;
    Ok(ApiResponse::success(partners))
}

/// GET /api/sales-team - all sales-team members
pub async fn get_all_sales_team() -> ApiResult<Vec<SalesTeamMember>> {
    let pool = DatabaseManager::pool().await?;
    let team =
        sqlx::query_as::<_, SalesTeamMember>("SELECT * FROM sales_team ORDER BY member_name")
            .fetch_all(&pool)
            .await?;
    Ok(ApiResponse::success(team))
}

/// GET /api/shift-types - shift names and timings
pub async fn get_shift_types() -> ApiResult<Vec<ShiftType>> {
    let pool = DatabaseManager::pool().await?;
    let shifts = sqlx::query_as::<_, ShiftType>(
        "SELECT id, shift_name, start_time, end_time, holiday_list FROM shift_type ORDER BY shift_name",
    )
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(shifts))
}

/// GET /api/holiday-lists - all holiday lists with their holiday child rows
pub async fn get_all_holiday_lists() -> ApiResult<Vec<Value>> {
    let pool = DatabaseManager::pool().await?;
    let lists = sqlx::query_as::<_, HolidayList>("SELECT * FROM holiday_list ORDER BY from_date")
        .fetch_all(&pool)
        .await?;

    let mut full_data = Vec::with_capacity(lists.len());
    for list in lists {
        let holidays = sqlx::query_as::<_, Holiday>(
            "SELECT * FROM holiday WHERE holiday_list = $1 ORDER BY holiday_date",
        )
        .bind(list.id)
        .fetch_all(&pool)
        .await?;

        let mut doc = serde_json::to_value(&list).unwrap_or(Value::Null);
        doc["holidays"] = json!(holidays);
        full_data.push(doc);
    }
    Ok(ApiResponse::success(full_data))
}
