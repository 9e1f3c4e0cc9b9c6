use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config;
use crate::database::models::payroll::{
    PayrollPeriod, SalarySlip, SalarySlipRow, SalaryStructureAssignment, TaxDeclaration,
    TaxDeclarationItem, TaxExemptionCategory,
};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

use super::resolve_employee;

/// GET /api/payroll/periods
pub async fn get_payroll_periods() -> ApiResult<Vec<PayrollPeriod>> {
    let pool = DatabaseManager::pool().await?;
    let periods =
        sqlx::query_as::<_, PayrollPeriod>("SELECT * FROM payroll_period ORDER BY start_date DESC")
            .fetch_all(&pool)
            .await?;
    Ok(ApiResponse::success(periods))
}

/// GET /api/payroll/exemption-categories
pub async fn get_exemption_categories() -> ApiResult<Vec<TaxExemptionCategory>> {
    let pool = DatabaseManager::pool().await?;
    let categories = sqlx::query_as::<_, TaxExemptionCategory>(
        "SELECT * FROM tax_exemption_category ORDER BY category_name",
    )
    .fetch_all(&pool)
    .await?;
    Ok(ApiResponse::success(categories))
}

#[derive(Debug, Deserialize)]
pub struct SlipRangeQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

/// GET /api/payroll/salary-slips - the caller's slips, optionally limited to
/// those overlapping [from_date, to_date]
pub async fn get_my_salary_slips(
    Extension(user): Extension<AuthUser>,
    Query(range): Query<SlipRangeQuery>,
) -> ApiResult<Vec<SalarySlip>> {
    let pool = DatabaseManager::pool().await?;
    let employee = resolve_employee(&pool, &user.email)
        .await?
        .ok_or_else(|| ApiError::forbidden("No Employee linked to this user."))?;

    let slips = sqlx::query_as::<_, SalarySlip>(
        "SELECT * FROM salary_slip \
         WHERE employee = $1 \
           AND ($2::date IS NULL OR end_date >= $2) \
           AND ($3::date IS NULL OR start_date <= $3) \
         ORDER BY start_date DESC",
    )
    .bind(employee.id)
    .bind(range.from_date)
    .bind(range.to_date)
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(slips))
}

/// GET /api/payroll/salary-slips/:id - one slip with earning/deduction child
/// rows and a URL into the print/PDF subsystem
pub async fn get_salary_slip(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let employee = resolve_employee(&pool, &user.email)
        .await?
        .ok_or_else(|| ApiError::forbidden("No Employee linked to this user."))?;

    let slip = sqlx::query_as::<_, SalarySlip>("SELECT * FROM salary_slip WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Salary slip not found"))?;

    if slip.employee != employee.id {
        return Err(ApiError::forbidden("This salary slip belongs to another employee"));
    }

    let (earnings, deductions) = tokio::try_join!(
        sqlx::query_as::<_, SalarySlipRow>(
            "SELECT * FROM salary_slip_earning WHERE salary_slip = $1 ORDER BY salary_component",
        )
        .bind(slip.id)
        .fetch_all(&pool),
        sqlx::query_as::<_, SalarySlipRow>(
            "SELECT * FROM salary_slip_deduction WHERE salary_slip = $1 ORDER BY salary_component",
        )
        .bind(slip.id)
        .fetch_all(&pool),
    )?;

    // Structure assignment in force at the start of the slip period, if any
    let assignment = sqlx::query_as::<_, SalaryStructureAssignment>(
        "SELECT * FROM salary_structure_assignment \
         WHERE employee = $1 AND from_date <= $2 \
         ORDER BY from_date DESC LIMIT 1",
    )
    .bind(employee.id)
    .bind(slip.start_date)
    .fetch_optional(&pool)
    .await?;

    let mut doc = serde_json::to_value(&slip).unwrap_or(Value::Null);
    doc["earnings"] = json!(earnings);
    doc["deductions"] = json!(deductions);
    doc["salary_structure_assignment"] = json!(assignment);
    doc["pdf_url"] = json!(salary_slip_pdf_url(slip.id));

    Ok(ApiResponse::success(doc))
}

/// The print subsystem renders slips; this service only references it
pub(crate) fn salary_slip_pdf_url(slip_id: Uuid) -> String {
    format!(
        "{}/print/salary-slip/{}.pdf",
        config::config().print.base_url.trim_end_matches('/'),
        slip_id
    )
}

/// GET /api/payroll/tax-declarations - the caller's declarations with items
pub async fn get_my_tax_declarations(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Value>> {
    let pool = DatabaseManager::pool().await?;
    let employee = resolve_employee(&pool, &user.email)
        .await?
        .ok_or_else(|| ApiError::forbidden("No Employee linked to this user."))?;

    let declarations = sqlx::query_as::<_, TaxDeclaration>(
        "SELECT * FROM tax_declaration WHERE employee = $1 ORDER BY created_at DESC",
    )
    .bind(employee.id)
    .fetch_all(&pool)
    .await?;

    let mut full_data = Vec::with_capacity(declarations.len());
    for declaration in declarations {
        let items = sqlx::query_as::<_, TaxDeclarationItem>(
            "SELECT * FROM tax_declaration_item WHERE tax_declaration = $1",
        )
        .bind(declaration.id)
        .fetch_all(&pool)
        .await?;

        let mut doc = serde_json::to_value(&declaration).unwrap_or(Value::Null);
        doc["declarations"] = json!(items);
        full_data.push(doc);
    }
    Ok(ApiResponse::success(full_data))
}

#[derive(Debug, Deserialize)]
pub struct DeclarationItemRequest {
    pub exemption_category: String,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct TaxDeclarationRequest {
    pub payroll_period: String,
    pub declarations: Vec<DeclarationItemRequest>,
}

/// Check every declared amount against its category cap and total them up.
/// `categories` maps category name to (id, max_amount).
pub(crate) fn validate_declarations(
    items: &[DeclarationItemRequest],
    categories: &HashMap<String, (Uuid, Decimal)>,
) -> Result<(Decimal, Vec<(Uuid, Decimal)>), ApiError> {
    let mut field_errors = HashMap::new();
    let mut total = Decimal::ZERO;
    let mut resolved = Vec::with_capacity(items.len());

    for item in items {
        match categories.get(&item.exemption_category) {
            None => {
                field_errors.insert(
                    item.exemption_category.clone(),
                    "Unknown exemption category".to_string(),
                );
            }
            Some((id, max_amount)) => {
                if item.amount < Decimal::ZERO {
                    field_errors.insert(
                        item.exemption_category.clone(),
                        "Amount must not be negative".to_string(),
                    );
                } else if item.amount > *max_amount {
                    field_errors.insert(
                        item.exemption_category.clone(),
                        format!("Amount exceeds category maximum of {}", max_amount),
                    );
                } else {
                    total += item.amount;
                    resolved.push((*id, item.amount));
                }
            }
        }
    }

    if !field_errors.is_empty() {
        return Err(ApiError::unprocessable_entity(
            "Invalid tax declaration",
            field_errors,
        ));
    }
    Ok((total, resolved))
}

/// POST /api/payroll/tax-declaration - replace the caller's declaration for
/// a payroll period
pub async fn submit_tax_declaration(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<TaxDeclarationRequest>,
) -> ApiResult<Value> {
    if body.declarations.is_empty() {
        return Err(ApiError::bad_request("declarations must not be empty"));
    }

    let pool = DatabaseManager::pool().await?;
    let employee = resolve_employee(&pool, &user.email)
        .await?
        .ok_or_else(|| ApiError::forbidden("No Employee linked to this user."))?;

    let period = sqlx::query_as::<_, PayrollPeriod>(
        "SELECT * FROM payroll_period WHERE period_name = $1",
    )
    .bind(&body.payroll_period)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| {
        ApiError::bad_request(format!("Unknown payroll period '{}'", body.payroll_period))
    })?;

    let categories: HashMap<String, (Uuid, Decimal)> = sqlx::query_as::<_, TaxExemptionCategory>(
        "SELECT * FROM tax_exemption_category",
    )
    .fetch_all(&pool)
    .await?
    .into_iter()
    .map(|c| (c.category_name, (c.id, c.max_amount)))
    .collect();

    let (total, resolved) = validate_declarations(&body.declarations, &categories)?;

    // Replace any previous declaration for this (employee, period)
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM tax_declaration_item WHERE tax_declaration IN \
         (SELECT id FROM tax_declaration WHERE employee = $1 AND payroll_period = $2)",
    )
    .bind(employee.id)
    .bind(period.id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM tax_declaration WHERE employee = $1 AND payroll_period = $2")
        .bind(employee.id)
        .bind(period.id)
        .execute(&mut *tx)
        .await?;

    let declaration_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO tax_declaration (employee, payroll_period, total_declared_amount, docstatus) \
         VALUES ($1, $2, $3, 1) RETURNING id",
    )
    .bind(employee.id)
    .bind(period.id)
    .bind(total)
    .fetch_one(&mut *tx)
    .await?;

    for (category_id, amount) in &resolved {
        sqlx::query(
            "INSERT INTO tax_declaration_item (tax_declaration, exemption_category, amount) \
             VALUES ($1, $2, $3)",
        )
        .bind(declaration_id)
        .bind(category_id)
        .bind(amount)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(ApiResponse::success(json!({
        "status": "success",
        "message": "Tax Declaration Submitted",
        "id": declaration_id,
        "total_declared_amount": total,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> HashMap<String, (Uuid, Decimal)> {
        let mut map = HashMap::new();
        map.insert("80C".to_string(), (Uuid::new_v4(), Decimal::new(150_000, 0)));
        map.insert("80D".to_string(), (Uuid::new_v4(), Decimal::new(25_000, 0)));
        map
    }

    fn item(category: &str, amount: i64) -> DeclarationItemRequest {
        DeclarationItemRequest {
            exemption_category: category.to_string(),
            amount: Decimal::new(amount, 0),
        }
    }

    #[test]
    fn total_is_sum_of_item_amounts() {
        let (total, resolved) =
            validate_declarations(&[item("80C", 100_000), item("80D", 20_000)], &categories())
                .unwrap();
        assert_eq!(total, Decimal::new(120_000, 0));
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn amount_above_category_max_is_rejected() {
        let err = validate_declarations(&[item("80D", 30_000)], &categories()).unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = validate_declarations(&[item("80X", 1_000)], &categories()).unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let err = validate_declarations(&[item("80C", -1)], &categories()).unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn amount_equal_to_max_is_allowed() {
        let (total, _) = validate_declarations(&[item("80C", 150_000)], &categories()).unwrap();
        assert_eq!(total, Decimal::new(150_000, 0));
    }
}
