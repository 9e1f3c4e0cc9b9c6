use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lead {
    pub id: Uuid,
    pub lead_name: String,
    /// Email of the app user this lead is assigned to
    pub lead_owner: Option<String>,
    pub mobile_no: Option<String>,
    pub email_id: Option<String>,
    pub status: String,
    pub source: Option<String>,
    pub interested_project: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PropertyProject {
    pub id: Uuid,
    pub project_name: String,
    pub developer: Option<Uuid>,
    pub mandate: Option<Uuid>,
    pub location: Option<String>,
    pub project_type: Option<String>,
    pub status: String,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Developer {
    pub id: Uuid,
    pub developer_name: String,
    pub contact_person: Option<String>,
    pub mobile_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Child row in a developer's `projects_list` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeveloperProjectRow {
    pub id: Uuid,
    pub developer: Uuid,
    pub project: Uuid,
    pub project_name: String,
    pub start_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Mandate {
    pub id: Uuid,
    pub mandate_name: String,
    pub owner_name: Option<String>,
    pub valid_till: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Child row in a mandate's assigned-projects table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MandateProjectRow {
    pub id: Uuid,
    pub mandate: Uuid,
    pub project: Uuid,
    pub project_name: String,
    pub start_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteVisit {
    pub id: Uuid,
    pub lead: Option<Uuid>,
    pub project: Option<Uuid>,
    pub visit_date: Option<NaiveDate>,
    pub status: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChannelPartner {
    pub id: Uuid,
    pub partner_name: String,
    pub firm_name: Option<String>,
    pub mobile_number: Option<String>,
    pub rera_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalesTeamMember {
    pub id: Uuid,
    pub member_name: String,
    pub employee: Option<Uuid>,
    pub role: Option<String>,
    pub mobile: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
