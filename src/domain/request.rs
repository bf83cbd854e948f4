use crate::domain::value::{
    AppName, CodeLength, IdempotencyKey, MessageText, RawPhoneNumber, SenderId, VerificationCode,
    VerificationId,
};

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub from: Option<SenderId>,
    pub idempotency_key: Option<IdempotencyKey>,
}

#[derive(Debug, Clone)]
pub struct SendSms {
    to: RawPhoneNumber,
    text: MessageText,
    options: SendOptions,
}

impl SendSms {
    pub fn new(to: RawPhoneNumber, text: MessageText, options: SendOptions) -> Self {
        Self { to, text, options }
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default)]
pub struct VerificationOptions {
    pub code_length: Option<CodeLength>,
    pub app_name: Option<AppName>,
    pub idempotency_key: Option<IdempotencyKey>,
}

#[derive(Debug, Clone)]
pub struct SendVerification {
    to: RawPhoneNumber,
    options: VerificationOptions,
}

impl SendVerification {
    pub fn new(to: RawPhoneNumber, options: VerificationOptions) -> Self {
        Self { to, options }
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn options(&self) -> &VerificationOptions {
        &self.options
    }
}

#[derive(Debug, Clone)]
pub struct CheckVerification {
    id: VerificationId,
    code: VerificationCode,
}

impl CheckVerification {
    pub fn new(id: VerificationId, code: VerificationCode) -> Self {
        Self { id, code }
    }

    pub fn id(&self) -> &VerificationId {
        &self.id
    }

    pub fn code(&self) -> &VerificationCode {
        &self.code
    }
}
