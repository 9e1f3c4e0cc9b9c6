use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("gateway request failed: {0}")]
    Gateway(#[from] reqwest::Error),
}

/// Outbound SMS seam. Delivery is fire-and-forget: OTP triggers report
/// success to the client whether or not the gateway accepted the message.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, mobile_number: &str, message: &str) -> Result<(), SmsError>;
}

/// POSTs messages to a configured HTTP gateway
pub struct HttpSmsGateway {
    client: reqwest::Client,
    gateway_url: String,
    sender_id: String,
}

impl HttpSmsGateway {
    pub fn new(gateway_url: String, sender_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            gateway_url,
            sender_id,
        }
    }
}

#[async_trait]
impl SmsSender for HttpSmsGateway {
    async fn send(&self, mobile_number: &str, message: &str) -> Result<(), SmsError> {
        self.client
            .post(&self.gateway_url)
            .json(&json!({
                "to": mobile_number,
                "message": message,
                "sender_id": self.sender_id,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Logs the message instead of sending it. Used when no gateway is
/// configured, so the OTP flow can be exercised without SMS credits.
pub struct DebugSms;

#[async_trait]
impl SmsSender for DebugSms {
    async fn send(&self, mobile_number: &str, message: &str) -> Result<(), SmsError> {
        tracing::info!(to = mobile_number, %message, "DEBUG SMS (no gateway configured)");
        Ok(())
    }
}

/// Pick the sender implied by config: HTTP gateway if one is set, debug
/// logger otherwise
pub fn sender() -> Box<dyn SmsSender> {
    let sms = &config::config().sms;
    match &sms.gateway_url {
        Some(url) => Box::new(HttpSmsGateway::new(url.clone(), sms.sender_id.clone())),
        None => Box::new(DebugSms),
    }
}

/// Deliver without blocking the caller on the gateway; failures are logged
pub fn send_async(mobile_number: String, message: String) {
    tokio::spawn(async move {
        if let Err(e) = sender().send(&mobile_number, &message).await {
            tracing::error!("SMS send failed for {}: {}", mobile_number, e);
        }
    });
}
