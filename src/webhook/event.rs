use serde::Deserialize;

/// Decoded webhook body.
///
/// Only `event` is required; `data` holds the event-specific object untouched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl WebhookEvent {
    pub fn kind(&self) -> WebhookEventKind {
        WebhookEventKind::from_name(&self.event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum WebhookEventKind {
    SmsQueued,
    SmsSent,
    SmsDelivered,
    SmsFailed,
    VerificationVerified,
    VerificationExpired,
    Other(String),
}

impl WebhookEventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "sms.queued" => Self::SmsQueued,
            "sms.sent" => Self::SmsSent,
            "sms.delivered" => Self::SmsDelivered,
            "sms.failed" => Self::SmsFailed,
            "verification.verified" => Self::VerificationVerified,
            "verification.expired" => Self::VerificationExpired,
            other => Self::Other(other.to_owned()),
        }
    }
}
