use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalarySlip {
    pub id: Uuid,
    pub employee: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub posting_date: NaiveDate,
    pub gross_pay: Decimal,
    pub total_deduction: Decimal,
    pub net_pay: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Earning or deduction child row of a salary slip
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalarySlipRow {
    pub id: Uuid,
    pub salary_slip: Uuid,
    pub salary_component: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalaryStructureAssignment {
    pub id: Uuid,
    pub employee: Uuid,
    pub salary_structure: String,
    pub from_date: NaiveDate,
    pub base: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PayrollPeriod {
    pub id: Uuid,
    pub period_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaxExemptionCategory {
    pub id: Uuid,
    pub category_name: String,
    pub max_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaxDeclaration {
    pub id: Uuid,
    pub employee: Uuid,
    pub payroll_period: Uuid,
    pub total_declared_amount: Decimal,
    pub docstatus: i16,
    pub created_at: DateTime<Utc>,
}

/// Per-category declared amount under a tax declaration
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaxDeclarationItem {
    pub id: Uuid,
    pub tax_declaration: Uuid,
    pub exemption_category: Uuid,
    pub amount: Decimal,
}
