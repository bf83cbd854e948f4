use serde::{Deserialize, Serialize};

use crate::domain::{
    AppName, CheckVerification, RawPhoneNumber, SendVerification, Verification,
    VerificationCheck, VerificationId, VerificationStatus,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contains invalid verification id: {value:?}")]
    InvalidVerificationId { value: String },

    #[error("response contains invalid recipient: {value:?}")]
    InvalidRecipient { value: String },
}

#[derive(Debug, Serialize)]
struct SendVerificationJsonBody<'a> {
    to: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_length: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CheckVerificationJsonBody<'a> {
    code: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct VerificationJsonResponse {
    id: String,
    to: String,
    status: String,
    #[serde(default)]
    expires_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct VerificationCheckJsonResponse {
    id: String,
    status: String,
    #[serde(default)]
    remaining_attempts: Option<u32>,
}

pub fn encode_send_verification_body(request: &SendVerification) -> Result<String, TransportError> {
    let options = request.options();
    let body = SendVerificationJsonBody {
        to: request.to().raw(),
        code_length: options.code_length.map(|len| len.value()),
        app_name: options.app_name.as_ref().map(AppName::as_str),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn encode_check_verification_body(
    request: &CheckVerification,
) -> Result<String, TransportError> {
    let body = CheckVerificationJsonBody {
        code: request.code().as_str(),
    };
    Ok(serde_json::to_string(&body)?)
}

pub fn decode_verification_json_response(json: &str) -> Result<Verification, TransportError> {
    let parsed: VerificationJsonResponse = serde_json::from_str(json)?;

    Ok(Verification {
        id: parse_verification_id(parsed.id)?,
        to: RawPhoneNumber::new(parsed.to.clone())
            .map_err(|_| TransportError::InvalidRecipient { value: parsed.to })?,
        status: VerificationStatus::from_wire(&parsed.status),
        expires_at: parsed.expires_at,
    })
}

pub fn decode_verification_check_json_response(
    json: &str,
) -> Result<VerificationCheck, TransportError> {
    let parsed: VerificationCheckJsonResponse = serde_json::from_str(json)?;

    Ok(VerificationCheck {
        id: parse_verification_id(parsed.id)?,
        status: VerificationStatus::from_wire(&parsed.status),
        remaining_attempts: parsed.remaining_attempts,
    })
}

fn parse_verification_id(value: String) -> Result<VerificationId, TransportError> {
    VerificationId::new(value.clone()).map_err(|_| TransportError::InvalidVerificationId { value })
}
