pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod hooks;
pub mod middleware;
pub mod otp;
pub mod sms;

use axum::{middleware::from_fn, routing::get, routing::post, routing::put, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Assemble the full application router
pub fn app() -> Router {
    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API (JWT required, guests rejected)
        .merge(protected_routes())
        .layer(TraceLayer::new_for_http());

    if config::config().security.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Guest-allowed surface: login plus the catalog listings the app shows
/// before sign-in
fn public_routes() -> Router {
    use handlers::public::{auth, catalog};

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/api/projects", get(catalog::get_all_projects))
        .route("/api/developers", get(catalog::get_all_developers))
        .route("/api/mandates", get(catalog::get_all_mandates))
        .route("/api/site-visits", get(catalog::get_all_site_visits))
        .route("/api/channel-partners", get(catalog::get_all_channel_partners))
        .route("/api/sales-team", get(catalog::get_all_sales_team))
        .route("/api/shift-types", get(catalog::get_shift_types))
        .route("/api/holiday-lists", get(catalog::get_all_holiday_lists))
}

fn protected_routes() -> Router {
    use handlers::protected::{attendance, holidays, leave, otp, payroll, profile, projects};

    Router::new()
        // Caller-scoped reads
        .route("/api/me/profile", get(profile::get_my_profile))
        .route("/api/me/lead", get(profile::get_my_lead))
        .route("/api/me/holidays", get(holidays::get_my_holidays))
        // Attendance & leave
        .route("/api/attendance/checkin", post(attendance::employee_checkin))
        .route("/api/leave/balance", get(leave::get_my_leave_balance))
        .route("/api/leave/apply", post(leave::apply_leave))
        // Payroll
        .route("/api/payroll/periods", get(payroll::get_payroll_periods))
        .route("/api/payroll/salary-slips", get(payroll::get_my_salary_slips))
        .route("/api/payroll/salary-slips/:id", get(payroll::get_salary_slip))
        .route("/api/payroll/exemption-categories", get(payroll::get_exemption_categories))
        .route("/api/payroll/tax-declarations", get(payroll::get_my_tax_declarations))
        .route("/api/payroll/tax-declaration", post(payroll::submit_tax_declaration))
        // Project save (runs the child-list sync hook)
        .route("/api/projects", post(projects::create_project))
        .route("/api/projects/:id", put(projects::update_project))
        // OTP flows
        .route("/api/otp/lead/trigger", post(otp::trigger_otp_lead))
        .route("/api/otp/lead/verify", post(otp::verify_otp_lead))
        .route("/api/otp/site-visit/trigger", post(otp::trigger_otp_site_visit))
        .route("/api/otp/site-visit/verify", post(otp::verify_otp_site_visit))
        .route("/api/otp/channel-partner/trigger", post(otp::trigger_otp_channel_partner))
        .route("/api/otp/channel-partner/verify", post(otp::verify_otp_channel_partner))
        .layer(from_fn(middleware::auth::jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "HomeSol API",
            "version": version,
            "description": "Backend API for the HomeSol field-sales app",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/login (public - token acquisition)",
                "catalog": "/api/projects, /api/developers, /api/mandates, /api/site-visits, /api/channel-partners, /api/sales-team, /api/shift-types, /api/holiday-lists (public)",
                "me": "/api/me/* (protected)",
                "attendance": "/api/attendance/checkin (protected)",
                "leave": "/api/leave/* (protected)",
                "payroll": "/api/payroll/* (protected)",
                "projects": "/api/projects [POST], /api/projects/:id [PUT] (protected)",
                "otp": "/api/otp/{lead,site-visit,channel-partner}/{trigger,verify} (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
