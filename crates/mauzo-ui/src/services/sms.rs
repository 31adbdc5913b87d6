//! SMS relay integration.
//!
//! Messages go straight from the browser to the relay; the backend is not
//! involved. Credentials live on the signed-in user's branch settings, and
//! every payload carries a fresh UUID reference for delivery tracing.

use mauzo_api_models::Document;
use serde_json::{Value, json};
use uuid::Uuid;

/// The relay's send endpoint.
pub const SMS_ENDPOINT: &str = "https://emessage.co.tz/api/messages/send-sms";

/// Per-branch relay credentials.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmsSettings {
    /// Registered sender name shown to recipients.
    pub sender_id: String,
    /// Relay API key.
    pub api_key: String,
}

/// Errors raised while sending a message.
#[derive(Debug, thiserror::Error)]
pub enum SmsError {
    /// The branch has no relay credentials configured.
    #[error("branch has no SMS settings")]
    MissingSettings,
    /// The relay rejected or never received the message.
    #[error("sms relay error: {0}")]
    Relay(String),
}

/// Extract the relay credentials from the signed-in user's branch settings.
#[must_use]
pub fn settings_from_user(user: &Document) -> Option<SmsSettings> {
    let settings = user.get("branch")?.get("settings")?;
    Some(SmsSettings {
        sender_id: settings.get("sms_sender_id")?.as_str()?.to_string(),
        api_key: settings.get("sms_api_key")?.as_str()?.to_string(),
    })
}

/// The relay request body. Each call mints a new reference.
#[must_use]
pub fn build_payload(settings: &SmsSettings, recipient: &str, text: &str) -> Value {
    json!({
        "sender_id": settings.sender_id,
        "recipients": recipient,
        "message": text,
        "reference": Uuid::new_v4().to_string(),
    })
}

/// Send one message through the relay.
///
/// # Errors
/// Returns [`SmsError::Relay`] when the relay is unreachable or answers
/// with a non-success status.
#[cfg(target_arch = "wasm32")]
pub async fn send_message(
    settings: &SmsSettings,
    recipient: &str,
    text: &str,
) -> Result<(), SmsError> {
    let response = gloo_net::http::Request::post(SMS_ENDPOINT)
        .header("authorization", &format!("Bearer {}", settings.api_key))
        .header("content-type", "application/json")
        .body(build_payload(settings, recipient, text).to_string())
        .send()
        .await
        .map_err(|err| SmsError::Relay(err.to_string()))?;
    if response.ok() {
        Ok(())
    } else {
        Err(SmsError::Relay(format!(
            "relay answered {}",
            response.status()
        )))
    }
}
