use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShiftType {
    pub id: Uuid,
    pub shift_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub holiday_list: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HolidayList {
    pub id: Uuid,
    pub list_name: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Child row of a holiday list
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Holiday {
    pub id: Uuid,
    pub holiday_list: Uuid,
    pub holiday_date: NaiveDate,
    pub description: Option<String>,
}

/// Submitted allocation granting an employee leave of one type
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaveAllocation {
    pub id: Uuid,
    pub employee: Uuid,
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub total_leaves_allocated: f64,
    pub new_leaves_allocated: f64,
    pub docstatus: i16,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeaveApplication {
    pub id: Uuid,
    pub employee: Uuid,
    pub leave_type: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub half_day: bool,
    pub half_day_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub status: String,
    pub docstatus: i16,
    pub posting_date: NaiveDate,
    pub total_leave_days: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeCheckin {
    pub id: Uuid,
    pub employee: Uuid,
    pub log_type: String,
    pub time: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub device_id: Option<String>,
    pub device_type: Option<String>,
}
