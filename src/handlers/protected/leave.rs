use axum::{Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::hrms::{LeaveAllocation, LeaveApplication};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::status_error;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::resolve_employee;

/// GET /api/leave/balance - allocated / used / remaining per leave type,
/// for allocations still in force
pub async fn get_my_leave_balance(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let employee = match resolve_employee(&pool, &user.email).await? {
        Some(e) => e,
        None => {
            return Ok(ApiResponse::success(status_error(
                "No Employee linked to this user.",
            )))
        }
    };

    let today = Utc::now().date_naive();
    let allocations = sqlx::query_as::<_, LeaveAllocation>(
        "SELECT * FROM leave_allocation \
         WHERE employee = $1 AND to_date >= $2 AND docstatus = 1 \
         ORDER BY leave_type",
    )
    .bind(employee.id)
    .bind(today)
    .fetch_all(&pool)
    .await?;

    let mut data = Vec::with_capacity(allocations.len());
    for alloc in allocations {
        let used: f64 = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT SUM(total_leave_days) FROM leave_application \
             WHERE employee = $1 AND leave_type = $2 AND status = 'Approved' AND docstatus = 1",
        )
        .bind(employee.id)
        .bind(&alloc.leave_type)
        .fetch_one(&pool)
        .await?
        .unwrap_or(0.0);

        data.push(allocation_summary(&alloc, used));
    }

    Ok(ApiResponse::success(json!({
        "status": "success",
        "employee": employee.id,
        "leaves": data,
    })))
}

/// Per-type balance line: remaining is what the allocation grants
/// (total + new) minus the approved days already taken
pub(crate) fn allocation_summary(alloc: &LeaveAllocation, used: f64) -> Value {
    let allocated = alloc.total_leaves_allocated + alloc.new_leaves_allocated;
    json!({
        "leave_type": alloc.leave_type,
        "allocated": allocated,
        "used": used,
        "remaining": allocated - used,
    })
}

#[derive(Debug, Deserialize)]
pub struct ApplyLeaveRequest {
    pub leave_type: String,
    pub from_date: String,
    pub to_date: String,
    pub reason: String,
    #[serde(default)]
    pub is_half_day: bool,
    pub half_day_period: Option<String>,
}

/// Dates and day count for an application. Half-day applications collapse
/// to a single half-counted day on the from date.
pub(crate) fn leave_span(
    from_date: NaiveDate,
    to_date: NaiveDate,
    is_half_day: bool,
) -> Result<(NaiveDate, Option<NaiveDate>, f64), ApiError> {
    if is_half_day {
        return Ok((from_date, Some(from_date), 0.5));
    }
    if to_date < from_date {
        return Err(ApiError::bad_request("to_date must not precede from_date"));
    }
    let days = (to_date - from_date).num_days() as f64 + 1.0;
    Ok((to_date, None, days))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(format!("{} must be a YYYY-MM-DD date", field)))
}

/// POST /api/leave/apply - create and submit a leave application in one step
pub async fn apply_leave(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ApplyLeaveRequest>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let employee = resolve_employee(&pool, &user.email)
        .await?
        .ok_or_else(|| ApiError::forbidden("No Employee linked to this user."))?;

    let from_date = parse_date("from_date", &body.from_date)?;
    let to_date = if body.is_half_day {
        from_date
    } else {
        parse_date("to_date", &body.to_date)?
    };

    // half_day_period is accepted for client compatibility; the stored
    // application only carries the half-day date
    tracing::debug!(half_day_period = ?body.half_day_period, "apply_leave");

    let (to_date, half_day_date, total_days) = leave_span(from_date, to_date, body.is_half_day)?;
    let today = Utc::now().date_naive();

    let inserted = sqlx::query_as::<_, LeaveApplication>(
        "INSERT INTO leave_application \
         (employee, leave_type, from_date, to_date, half_day, half_day_date, description, \
          status, docstatus, posting_date, total_leave_days) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, 'Open', 1, $8, $9) RETURNING *",
    )
    .bind(employee.id)
    .bind(&body.leave_type)
    .bind(from_date)
    .bind(to_date)
    .bind(body.is_half_day)
    .bind(half_day_date)
    .bind(&body.reason)
    .bind(today)
    .bind(total_days)
    .fetch_one(&pool)
    .await;

    match inserted {
        Ok(application) => Ok(ApiResponse::success(json!({
            "status": "success",
            "message": "Leave Application Submitted",
            "id": application.id,
        }))),
        Err(e) => {
            tracing::error!("Leave application error: {}", e);
            Ok(ApiResponse::success(status_error(e.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn half_day_collapses_to_from_date() {
        let (to, half, days) = leave_span(d("2026-03-10"), d("2026-03-14"), true).unwrap();
        assert_eq!(to, d("2026-03-10"));
        assert_eq!(half, Some(d("2026-03-10")));
        assert_eq!(days, 0.5);
    }

    #[test]
    fn full_day_span_is_inclusive() {
        let (to, half, days) = leave_span(d("2026-03-10"), d("2026-03-12"), false).unwrap();
        assert_eq!(to, d("2026-03-12"));
        assert_eq!(half, None);
        assert_eq!(days, 3.0);
    }

    #[test]
    fn single_day_counts_one() {
        let (_, _, days) = leave_span(d("2026-03-10"), d("2026-03-10"), false).unwrap();
        assert_eq!(days, 1.0);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(leave_span(d("2026-03-12"), d("2026-03-10"), false).is_err());
    }

    fn allocation(total: f64, new: f64) -> LeaveAllocation {
        LeaveAllocation {
            id: uuid::Uuid::new_v4(),
            employee: uuid::Uuid::new_v4(),
            leave_type: "Casual Leave".to_string(),
            from_date: d("2026-01-01"),
            to_date: d("2026-12-31"),
            total_leaves_allocated: total,
            new_leaves_allocated: new,
            docstatus: 1,
        }
    }

    #[test]
    fn remaining_is_allocated_minus_used() {
        let summary = allocation_summary(&allocation(10.0, 2.0), 4.5);
        assert_eq!(summary["allocated"], 12.0);
        assert_eq!(summary["used"], 4.5);
        assert_eq!(summary["remaining"], 7.5);
        assert_eq!(summary["leave_type"], "Casual Leave");
    }

    #[test]
    fn unused_allocation_keeps_full_balance() {
        let summary = allocation_summary(&allocation(8.0, 0.0), 0.0);
        assert_eq!(summary["remaining"], 8.0);
    }
}
