//! Typed Rust client for the TextGate SMS and phone verification API.
//!
//! The crate is split into a domain layer of strong types, a transport layer for
//! wire-format details, a small client layer orchestrating requests, and a
//! [`webhook`] module that authenticates incoming webhook requests.
//!
//! ```rust,no_run
//! use textgate::{ApiKey, MessageText, RawPhoneNumber, SendOptions, SendSms, TextGateClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), textgate::TextGateError> {
//!     let client = TextGateClient::new(ApiKey::new("...")?);
//!     let phone = RawPhoneNumber::new("+14155550123")?;
//!     let text = MessageText::new("hello")?;
//!     let message = client
//!         .send_sms(SendSms::new(phone, text, SendOptions::default()))
//!         .await?;
//!     println!("{:?}", message.status);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;
pub mod webhook;

pub use client::{TextGateClient, TextGateClientBuilder, TextGateError};
pub use domain::{
    ApiKey, AppName, CheckVerification, CodeLength, ErrorBody, IdempotencyKey, Message,
    MessageId, MessageStatus, MessageText, PhoneNumber, Price, RawPhoneNumber, SendOptions,
    SendSms, SendVerification, SenderId, ValidationError, Verification, VerificationCheck,
    VerificationCode, VerificationId, VerificationOptions, VerificationStatus,
};
pub use webhook::{WebhookError, WebhookEvent, WebhookEventKind, WebhookSecret, WebhookVerifier};
