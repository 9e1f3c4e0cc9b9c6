use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// HR master record, linked one-to-one with a login account via `user_email`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: Uuid,
    pub user_email: Option<String>,
    pub employee_name: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub company: Option<String>,
    pub date_of_joining: Option<NaiveDate>,
    pub mobile: Option<String>,
    pub holiday_list: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub company_name: String,
    pub default_holiday_list: Option<Uuid>,
}
