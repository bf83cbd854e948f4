//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    CheckVerification, SendOptions, SendSms, SendVerification, VerificationOptions,
};
pub use response::{
    ErrorBody, Message, MessageStatus, Verification, VerificationCheck, VerificationStatus,
};
pub use validation::ValidationError;
pub use value::{
    ApiKey, AppName, CodeLength, IdempotencyKey, MessageId, MessageText, PhoneNumber,
    Price, RawPhoneNumber, SenderId, VerificationCode, VerificationId,
};
