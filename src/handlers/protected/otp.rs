//! Visit-confirmation OTP endpoints. Three subjects share the same
//! trigger/verify life cycle with distinct cache-key families: leads
//! addressed by name + mobile, site visits keyed by their lead, and channel
//! partners keyed by id.

use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::crm::{ChannelPartner, SiteVisit};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::otp::{self, OtpService};
use crate::sms;

#[derive(Debug, Deserialize)]
pub struct LeadOtpTrigger {
    pub lead_name: String,
    pub mobile_no: String,
}

/// POST /api/otp/lead/trigger
pub async fn trigger_otp_lead(Json(body): Json<LeadOtpTrigger>) -> ApiResult<Value> {
    if body.lead_name.trim().is_empty() || body.mobile_no.trim().is_empty() {
        return Err(ApiError::bad_request("lead_name and mobile_no are required"));
    }

    let key = otp::lead_key(body.lead_name.trim(), body.mobile_no.trim());
    let code = OtpService::global().trigger(&key).await;

    // Delivery is fire-and-forget; the trigger reports success regardless
    sms::send_async(
        body.mobile_no.trim().to_string(),
        format!("Hello! Your Verification Code is {}. Valid for 10 mins.", code),
    );

    Ok(ApiResponse::success(json!({ "status": "success" })))
}

#[derive(Debug, Deserialize)]
pub struct LeadOtpVerify {
    pub lead_name: String,
    pub mobile_no: String,
    pub user_otp: String,
}

/// POST /api/otp/lead/verify
pub async fn verify_otp_lead(Json(body): Json<LeadOtpVerify>) -> ApiResult<Value> {
    let key = otp::lead_key(body.lead_name.trim(), body.mobile_no.trim());
    let verified = OtpService::global().verify(&key, &body.user_otp).await;
    Ok(ApiResponse::success(json!({ "verified": verified })))
}

#[derive(Debug, Deserialize)]
pub struct SiteVisitOtpTrigger {
    pub site_visit: Uuid,
}

/// POST /api/otp/site-visit/trigger - resolve the visit's lead and send the
/// code to that lead's mobile number
pub async fn trigger_otp_site_visit(Json(body): Json<SiteVisitOtpTrigger>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let visit = sqlx::query_as::<_, SiteVisit>("SELECT * FROM site_visit WHERE id = $1")
        .bind(body.site_visit)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Site Visit not found"))?;

    let lead = visit
        .lead
        .ok_or_else(|| ApiError::bad_request("Please select a Lead first to send OTP."))?;

    let mobile_number = sqlx::query_scalar::<_, Option<String>>(
        "SELECT mobile_no FROM lead WHERE id = $1",
    )
    .bind(lead)
    .fetch_optional(&pool)
    .await?
    .flatten()
    .ok_or_else(|| {
        ApiError::bad_request("The selected Lead does not have a Mobile Number saved.")
    })?;

    let key = otp::site_visit_key(lead);
    let code = OtpService::global().trigger(&key).await;

    sms::send_async(
        mobile_number,
        format!(
            "Hello! Your Verification Code for the Site Visit is {}. Valid for 10 mins.",
            code
        ),
    );

    Ok(ApiResponse::success(json!("success")))
}

#[derive(Debug, Deserialize)]
pub struct SiteVisitOtpVerify {
    pub site_visit: Uuid,
    pub user_otp: String,
}

/// POST /api/otp/site-visit/verify - a match marks the visit verified.
/// Returns the literal "success"/"failed" strings the mobile client expects.
pub async fn verify_otp_site_visit(Json(body): Json<SiteVisitOtpVerify>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let visit = sqlx::query_as::<_, SiteVisit>("SELECT * FROM site_visit WHERE id = $1")
        .bind(body.site_visit)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Site Visit not found"))?;

    let lead = visit
        .lead
        .ok_or_else(|| ApiError::bad_request("Lead information is missing."))?;

    let key = otp::site_visit_key(lead);
    if OtpService::global().verify(&key, &body.user_otp).await {
        sqlx::query("UPDATE site_visit SET is_verified = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(visit.id)
            .execute(&pool)
            .await?;
        Ok(ApiResponse::success(json!("success")))
    } else {
        Ok(ApiResponse::success(json!("failed")))
    }
}

#[derive(Debug, Deserialize)]
pub struct ChannelPartnerOtpTrigger {
    pub channel_partner: Uuid,
}

/// POST /api/otp/channel-partner/trigger
pub async fn trigger_otp_channel_partner(
    Json(body): Json<ChannelPartnerOtpTrigger>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let partner =
        sqlx::query_as::<_, ChannelPartner>("SELECT * FROM channel_partner WHERE id = $1")
            .bind(body.channel_partner)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Channel Partner not found"))?;

    let mobile_number = partner.mobile_number.ok_or_else(|| {
        ApiError::bad_request("The selected Channel Partner does not have a Mobile Number saved.")
    })?;

    let key = otp::channel_partner_key(partner.id);
    let code = OtpService::global().trigger(&key).await;

    sms::send_async(
        mobile_number,
        format!(
            "Hello! Your Verification Code for the CP Visit is {}. Valid for 10 mins.",
            code
        ),
    );

    Ok(ApiResponse::success(json!({ "status": "success" })))
}

#[derive(Debug, Deserialize)]
pub struct ChannelPartnerOtpVerify {
    pub channel_partner: Uuid,
    pub user_otp: String,
}

/// POST /api/otp/channel-partner/verify
pub async fn verify_otp_channel_partner(
    Json(body): Json<ChannelPartnerOtpVerify>,
) -> ApiResult<Value> {
    let key = otp::channel_partner_key(body.channel_partner);
    let verified = OtpService::global().verify(&key, &body.user_otp).await;
    Ok(ApiResponse::success(json!({ "verified": verified })))
}
