use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::domain::{Message, MessageId, MessageStatus, Price, RawPhoneNumber, SendSms, SenderId};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains invalid message id: {value:?}")]
    InvalidMessageId { value: String },

    #[error("response contains invalid recipient: {value:?}")]
    InvalidRecipient { value: String },

    #[error("response contains invalid price: {value}")]
    InvalidPrice { value: String },
}

#[derive(Debug, Serialize)]
struct SendSmsJsonBody<'a> {
    to: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageJsonResponse {
    id: String,
    to: String,
    status: String,
    #[serde(default)]
    segments: Option<u32>,
    #[serde(default)]
    price: Option<Box<RawValue>>,
    #[serde(default)]
    created_at: Option<String>,
}

pub fn encode_send_sms_body(request: &SendSms) -> Result<String, TransportError> {
    let body = SendSmsJsonBody {
        to: request.to().raw(),
        text: request.text().as_str(),
        from: request.options().from.as_ref().map(SenderId::as_str),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn decode_message_json_response(json: &str) -> Result<Message, TransportError> {
    let parsed: MessageJsonResponse = serde_json::from_str(json)?;

    let id = MessageId::new(parsed.id.clone())
        .map_err(|_| TransportError::InvalidMessageId { value: parsed.id })?;
    let to = RawPhoneNumber::new(parsed.to.clone())
        .map_err(|_| TransportError::InvalidRecipient { value: parsed.to })?;

    let price = parsed.price.as_deref().map(decode_price).transpose()?;

    Ok(Message {
        id,
        to,
        status: MessageStatus::from_wire(&parsed.status),
        segments: parsed.segments,
        price,
        created_at: parsed.created_at,
    })
}

// Prices arrive as `"0.0150"` or `0.0150`. Numbers are read from the raw token so
// trailing zeros survive.
fn decode_price(raw: &RawValue) -> Result<Price, TransportError> {
    let token = raw.get();
    let text = if token.starts_with('"') {
        serde_json::from_str::<String>(token)?
    } else {
        token.to_owned()
    };
    Price::new(text).map_err(|_| TransportError::InvalidPrice {
        value: token.to_owned(),
    })
}
