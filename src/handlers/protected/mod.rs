pub mod attendance;
pub mod holidays;
pub mod leave;
pub mod otp;
pub mod payroll;
pub mod profile;
pub mod projects;

use sqlx::PgPool;

use crate::database::models::employee::Employee;
use crate::error::ApiError;

/// Resolve the employee record linked to a login email. Most protected
/// endpoints operate on the caller's employee, not the login account itself.
pub(crate) async fn resolve_employee(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Employee>, ApiError> {
    let employee =
        sqlx::query_as::<_, Employee>("SELECT * FROM employee WHERE user_email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
    Ok(employee)
}
