use axum::Extension;
use serde_json::{json, Value};

use crate::database::models::employee::Company;
use crate::database::models::hrms::{Holiday, HolidayList};
use crate::database::DatabaseManager;
use crate::handlers::status_message;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::resolve_employee;

/// GET /api/me/holidays - the caller's holiday list, falling back to the
/// company default when the employee has none assigned
pub async fn get_my_holidays(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let employee = match resolve_employee(&pool, &user.email).await? {
        Some(e) => e,
        None => {
            return Ok(ApiResponse::success(status_message(
                "No Employee found for this user",
            )))
        }
    };

    let mut holiday_list_id = employee.holiday_list;
    if holiday_list_id.is_none() {
        if let Some(company_name) = &employee.company {
            let company =
                sqlx::query_as::<_, Company>("SELECT * FROM company WHERE company_name = $1")
                    .bind(company_name)
                    .fetch_optional(&pool)
                    .await?;
            holiday_list_id = company.and_then(|c| c.default_holiday_list);
        }
    }

    let Some(list_id) = holiday_list_id else {
        return Ok(ApiResponse::success(status_message(
            "No Holiday List assigned",
        )));
    };

    let list = sqlx::query_as::<_, HolidayList>("SELECT * FROM holiday_list WHERE id = $1")
        .bind(list_id)
        .fetch_optional(&pool)
        .await?;

    match list {
        Some(list) => {
            let holidays = sqlx::query_as::<_, Holiday>(
                "SELECT * FROM holiday WHERE holiday_list = $1 ORDER BY holiday_date",
            )
            .bind(list.id)
            .fetch_all(&pool)
            .await?;

            let mut doc = serde_json::to_value(&list).unwrap_or(Value::Null);
            doc["holidays"] = json!(holidays);
            Ok(ApiResponse::success(doc))
        }
        None => Ok(ApiResponse::success(status_message(
            "No Holiday List assigned",
        ))),
    }
}
