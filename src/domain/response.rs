use crate::domain::value::{MessageId, Price, RawPhoneNumber, VerificationId};

/// Delivery state of an outbound message.
///
/// States the crate does not know are preserved in [`MessageStatus::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    Queued,
    Sending,
    Sent,
    Delivered,
    Failed,
    Unknown(String),
}

impl MessageStatus {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "queued" => Self::Queued,
            "sending" => Self::Sending,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "failed" => Self::Failed,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Whether no further status transitions are expected.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub to: RawPhoneNumber,
    pub status: MessageStatus,
    pub segments: Option<u32>,
    pub price: Option<Price>,
    pub created_at: Option<String>,
}

/// State of a phone-number verification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VerificationStatus {
    Pending,
    Verified,
    Expired,
    InvalidCode,
    MaxAttemptsExceeded,
    Unknown(String),
}

impl VerificationStatus {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "verified" => Self::Verified,
            "expired" => Self::Expired,
            "invalid_code" => Self::InvalidCode,
            "max_attempts_exceeded" => Self::MaxAttemptsExceeded,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub id: VerificationId,
    pub to: RawPhoneNumber,
    pub status: VerificationStatus,
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCheck {
    pub id: VerificationId,
    pub status: VerificationStatus,
    pub remaining_attempts: Option<u32>,
}

impl VerificationCheck {
    pub fn is_verified(&self) -> bool {
        self.status == VerificationStatus::Verified
    }
}

/// Decoded body of a non-2xx API response.
///
/// `code` and `message` are filled when the body follows the documented error shape;
/// `raw` always holds the body as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub raw: String,
}
