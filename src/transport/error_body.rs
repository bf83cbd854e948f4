use serde::Deserialize;

use crate::domain::ErrorBody;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorJson {
    Nested { error: ErrorDetailJson },
    Flat {
        error: String,
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ErrorDetailJson {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decode a non-2xx response body.
///
/// Never fails: bodies that do not match either error shape keep only `raw`.
pub fn decode_error_body(raw: String) -> ErrorBody {
    let (code, message) = match serde_json::from_str::<ErrorJson>(&raw) {
        Ok(ErrorJson::Nested { error }) => (error.code, error.message),
        Ok(ErrorJson::Flat { error, message }) => (Some(error), message),
        Err(_) => (None, None),
    };
    ErrorBody { code, message, raw }
}
