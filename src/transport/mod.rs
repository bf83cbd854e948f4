//! Transport layer: wire-format details (JSON bodies in, JSON bodies out).

mod error_body;
mod messages;
mod verify;

pub use error_body::decode_error_body;
pub use messages::{decode_message_json_response, encode_send_sms_body};
pub use verify::{
    decode_verification_check_json_response, decode_verification_json_response,
    encode_check_verification_body, encode_send_verification_body,
};
