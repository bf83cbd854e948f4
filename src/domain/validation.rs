use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    TooLong { field: &'static str, max: usize, actual: usize },
    InvalidPhoneNumber { input: String },
    InvalidVerificationCode { input: String },
    CodeLengthOutOfRange { min: u8, max: u8, actual: u8 },
    InvalidPrice { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} is too long: {actual} characters (max {max})")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidVerificationCode { input } => {
                write!(f, "verification code must contain only digits: {input}")
            }
            Self::CodeLengthOutOfRange { min, max, actual } => {
                write!(
                    f,
                    "code length out of range: {actual} (expected {min}..={max})"
                )
            }
            Self::InvalidPrice { input } => {
                write!(f, "price must be a non-negative decimal: {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
