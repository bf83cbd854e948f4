//! Webhook signature verification.
//!
//! Every webhook request carries a [`SIGNATURE_HEADER`] of the form
//!
//! ```text
//! X-TextGate-Signature: t=<unix_seconds>,v1=<hex_hmac_sha256>
//! ```
//!
//! where `v1 = HMAC-SHA256("{t}.{raw_body}", key)` and `key` is the base64 payload of a
//! signing secret that starts with [`SECRET_PREFIX`]. Fields may come in any order and
//! unrecognised fields are ignored.
//!
//! A request is accepted when the signature matches and the timestamp is at most
//! [`REPLAY_WINDOW_SECS`] old. Timestamps in the future are accepted without bound.
//!
//! Verification must run on the body bytes exactly as received. Parsing and
//! re-serializing the JSON first changes the bytes and the signature will not match.
//!
//! ```rust
//! use textgate::webhook::{self, WebhookVerifier};
//!
//! # fn main() -> Result<(), textgate::webhook::WebhookError> {
//! let secret = "whsec_ZGVhZGJlZWY=";
//! let body = br#"{"event":"sms.delivered"}"#;
//! let header = webhook::sign(body, secret, 1_700_000_000)?;
//!
//! let verifier = WebhookVerifier::new(secret)?;
//! assert!(verifier.verify_at(body, &header, 1_700_000_060));
//! assert!(!verifier.verify_at(body, &header, 1_700_000_301));
//! # Ok(())
//! # }
//! ```

mod event;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

pub use event::{WebhookEvent, WebhookEventKind};

type HmacSha256 = Hmac<Sha256>;

/// Name of the HTTP header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "X-TextGate-Signature";

/// Marker every webhook signing secret starts with.
pub const SECRET_PREFIX: &str = "whsec_";

/// Maximum accepted age of a signed timestamp, in seconds.
pub const REPLAY_WINDOW_SECS: i64 = 300;

/// Length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Errors produced by webhook operations.
///
/// A forged or stale request is not an error for [`verify`]: it returns `Ok(false)`.
/// The secret variants signal a misconfigured integration.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook secret must start with \"whsec_\"")]
    MissingSecretPrefix,

    #[error("webhook secret is not valid base64: {0}")]
    InvalidSecretEncoding(#[source] base64::DecodeError),

    #[error("webhook secret decodes to an unusable key")]
    InvalidSecretKey,

    #[error("webhook signature verification failed")]
    InvalidSignature,

    #[error("invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl WebhookError {
    /// Whether the error comes from the signing secret rather than the request.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingSecretPrefix | Self::InvalidSecretEncoding(_) | Self::InvalidSecretKey
        )
    }
}

/// Decoded webhook signing secret.
///
/// `Debug` output never contains key material.
#[derive(Clone)]
pub struct WebhookSecret {
    mac: HmacSha256,
}

impl WebhookSecret {
    /// Strip [`SECRET_PREFIX`] and base64-decode the remainder into the HMAC key.
    pub fn parse(secret: &str) -> Result<Self, WebhookError> {
        let encoded = secret
            .strip_prefix(SECRET_PREFIX)
            .ok_or(WebhookError::MissingSecretPrefix)?;
        let key = STANDARD
            .decode(encoded)
            .map_err(WebhookError::InvalidSecretEncoding)?;
        if key.is_empty() {
            return Err(WebhookError::InvalidSecretKey);
        }
        let mac = HmacSha256::new_from_slice(&key).map_err(|_| WebhookError::InvalidSecretKey)?;
        Ok(Self { mac })
    }

    /// Produce a signature header value for `raw_body` signed at `timestamp`.
    pub fn sign(&self, raw_body: &[u8], timestamp: i64) -> String {
        let timestamp = timestamp.to_string();
        let signature = self.signature_hex(&timestamp, raw_body);
        format!("t={timestamp},v1={signature}")
    }

    fn signature_hex(&self, timestamp: &str, raw_body: &[u8]) -> String {
        let mut mac = self.mac.clone();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(raw_body);
        hex::encode(mac.finalize().into_bytes())
    }

    fn matches(&self, signed: &SignedHeader<'_>, raw_body: &[u8]) -> bool {
        let expected = self.signature_hex(signed.timestamp, raw_body);
        let matched = digests_match(&expected, signed.signature);
        if !matched {
            debug!("webhook rejected: signature mismatch");
        }
        matched
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(<redacted>)")
    }
}

/// Verifier bound to one signing secret.
///
/// The secret is validated once in [`WebhookVerifier::new`], so verification itself cannot
/// fail with a configuration error. The verifier is immutable and can be shared freely
/// (for example behind an `Arc` in web-framework state).
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secret: WebhookSecret,
}

impl WebhookVerifier {
    /// Create a verifier from a `whsec_`-prefixed secret.
    pub fn new(secret: &str) -> Result<Self, WebhookError> {
        Ok(Self {
            secret: WebhookSecret::parse(secret)?,
        })
    }

    /// Verify a request against the current wall-clock time.
    pub fn verify(&self, raw_body: &[u8], header_value: &str) -> bool {
        self.verify_at(raw_body, header_value, unix_now())
    }

    /// Verify a request against an explicit `now` (unix seconds).
    pub fn verify_at(&self, raw_body: &[u8], header_value: &str, now: i64) -> bool {
        match fresh_signed_header(header_value, now) {
            Some(signed) => self.secret.matches(&signed, raw_body),
            None => false,
        }
    }

    /// Verify a request and decode its body into a [`WebhookEvent`].
    ///
    /// Returns [`WebhookError::InvalidSignature`] when verification fails.
    pub fn construct_event(
        &self,
        raw_body: &[u8],
        header_value: &str,
    ) -> Result<WebhookEvent, WebhookError> {
        self.construct_event_at(raw_body, header_value, unix_now())
    }

    /// Same as [`WebhookVerifier::construct_event`] with an explicit `now` (unix seconds).
    pub fn construct_event_at(
        &self,
        raw_body: &[u8],
        header_value: &str,
        now: i64,
    ) -> Result<WebhookEvent, WebhookError> {
        if !self.verify_at(raw_body, header_value, now) {
            return Err(WebhookError::InvalidSignature);
        }
        Ok(serde_json::from_slice(raw_body)?)
    }
}

/// Verify a webhook request against the current wall-clock time.
///
/// Returns `Ok(false)` for missing fields, a non-numeric or expired timestamp, or a
/// signature mismatch. Returns an error only when `secret` is malformed.
pub fn verify(raw_body: &[u8], header_value: &str, secret: &str) -> Result<bool, WebhookError> {
    verify_at(raw_body, header_value, secret, unix_now())
}

/// Same as [`verify`] with an explicit `now` (unix seconds).
pub fn verify_at(
    raw_body: &[u8],
    header_value: &str,
    secret: &str,
    now: i64,
) -> Result<bool, WebhookError> {
    let Some(signed) = fresh_signed_header(header_value, now) else {
        return Ok(false);
    };
    let secret = WebhookSecret::parse(secret)?;
    Ok(secret.matches(&signed, raw_body))
}

/// Produce a signature header value for `raw_body`, as the server would send it.
///
/// Useful for exercising webhook handlers locally.
pub fn sign(raw_body: &[u8], secret: &str, timestamp: i64) -> Result<String, WebhookError> {
    Ok(WebhookSecret::parse(secret)?.sign(raw_body, timestamp))
}

#[derive(Debug, Clone, Copy)]
struct SignedHeader<'a> {
    /// Timestamp exactly as it appeared in the header; it is part of the signed payload.
    timestamp: &'a str,
    signature: &'a str,
}

/// Parse the header and apply the replay window. `None` means "reject".
fn fresh_signed_header(header_value: &str, now: i64) -> Option<SignedHeader<'_>> {
    let mut timestamp = None;
    let mut signature = None;
    for token in header_value.split(',') {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        match key.trim() {
            "t" => timestamp = Some(value.trim()),
            "v1" => signature = Some(value.trim()),
            _ => {}
        }
    }

    let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
        debug!("webhook rejected: signature header is missing t or v1");
        return None;
    };

    let Ok(signed_at) = timestamp.parse::<i64>() else {
        debug!("webhook rejected: timestamp is not numeric");
        return None;
    };

    // Negative age (timestamp ahead of our clock) is accepted.
    let age = now.saturating_sub(signed_at);
    if age > REPLAY_WINDOW_SECS {
        debug!(age, "webhook rejected: timestamp outside replay window");
        return None;
    }

    Some(SignedHeader {
        timestamp,
        signature,
    })
}

/// Constant-time digest comparison.
///
/// `provided` is copied into a fixed-size buffer so the comparison always scans
/// [`DIGEST_HEX_LEN`] bytes; a length mismatch is folded into the result rather than
/// returned early.
fn digests_match(expected: &str, provided: &str) -> bool {
    let provided = provided.as_bytes();
    let mut candidate = [0u8; DIGEST_HEX_LEN];
    let copied = provided.len().min(DIGEST_HEX_LEN);
    candidate[..copied].copy_from_slice(&provided[..copied]);

    let same_len = (provided.len() as u64).ct_eq(&(DIGEST_HEX_LEN as u64));
    let same_bytes = expected.as_bytes().ct_eq(&candidate[..]);
    (same_len & same_bytes).into()
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    // base64("deadbeef")
    const SECRET: &str = "whsec_ZGVhZGJlZWY=";
    const OTHER_SECRET: &str = "whsec_Y2FmZWJhYmU=";
    const BODY: &[u8] = br#"{"event":"sms.delivered"}"#;
    const NOW: i64 = 1_700_000_000;

    fn reference_signature(key: &[u8], timestamp: i64, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(key).unwrap();
        mac.update(format!("{timestamp}.").as_bytes());
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn delivered_event_signed_with_raw_key_verifies() {
        let now = unix_now();
        let header = format!("t={now},v1={}", reference_signature(b"deadbeef", now, BODY));

        assert!(verify(BODY, &header, SECRET).unwrap());

        let tampered = br#"{"event":"sms.delivereD"}"#;
        assert!(!verify(tampered, &header, SECRET).unwrap());
    }

    #[test]
    fn known_answer_vector_verifies() {
        let header =
            "t=1700000000,v1=e23e5dda4c02d1eda7eb64302c6330ad26c19ffaaa884f1af1884d3acccfeab3";

        assert_eq!(sign(BODY, SECRET, NOW).unwrap(), header);
        assert!(verify_at(BODY, header, SECRET, NOW).unwrap());
        assert!(verify_at(BODY, header, SECRET, NOW + REPLAY_WINDOW_SECS).unwrap());
        assert!(!verify_at(BODY, header, SECRET, NOW + REPLAY_WINDOW_SECS + 1).unwrap());
    }

    #[test]
    fn sign_matches_reference_hmac() {
        let header = sign(BODY, SECRET, NOW).unwrap();
        let expected = format!("t={NOW},v1={}", reference_signature(b"deadbeef", NOW, BODY));
        assert_eq!(header, expected);

        let digest = header.split_once("v1=").unwrap().1;
        assert_eq!(digest.len(), DIGEST_HEX_LEN);
    }

    #[test]
    fn signature_from_other_secret_is_rejected() {
        let header = sign(BODY, OTHER_SECRET, NOW).unwrap();
        assert!(!verify_at(BODY, &header, SECRET, NOW).unwrap());
    }

    #[test]
    fn replay_window_is_inclusive_of_300_seconds() {
        let header = sign(BODY, SECRET, NOW).unwrap();
        assert!(verify_at(BODY, &header, SECRET, NOW + REPLAY_WINDOW_SECS).unwrap());
        assert!(!verify_at(BODY, &header, SECRET, NOW + REPLAY_WINDOW_SECS + 1).unwrap());
        assert!(!verify_at(BODY, &header, SECRET, NOW + 86_400).unwrap());
    }

    #[test]
    fn future_timestamps_are_accepted() {
        let header = sign(BODY, SECRET, NOW + 3_600).unwrap();
        assert!(verify_at(BODY, &header, SECRET, NOW).unwrap());

        let far_future = sign(BODY, SECRET, i64::MAX).unwrap();
        assert!(verify_at(BODY, &far_future, SECRET, NOW).unwrap());
    }

    #[test]
    fn extreme_past_timestamp_does_not_overflow() {
        let header = sign(BODY, SECRET, i64::MIN).unwrap();
        assert!(!verify_at(BODY, &header, SECRET, NOW).unwrap());
    }

    #[test]
    fn missing_fields_are_rejected_not_errors() {
        let signature = reference_signature(b"deadbeef", NOW, BODY);

        assert!(!verify_at(BODY, &format!("v1={signature}"), SECRET, NOW).unwrap());
        assert!(!verify_at(BODY, &format!("t={NOW}"), SECRET, NOW).unwrap());
        assert!(!verify_at(BODY, "", SECRET, NOW).unwrap());
        assert!(!verify_at(BODY, "garbage", SECRET, NOW).unwrap());
    }

    #[test]
    fn non_numeric_timestamp_is_rejected() {
        let signature = reference_signature(b"deadbeef", NOW, BODY);
        let header = format!("t=soon,v1={signature}");
        assert!(!verify_at(BODY, &header, SECRET, NOW).unwrap());

        let header = format!("t=17000000.5,v1={signature}");
        assert!(!verify_at(BODY, &header, SECRET, NOW).unwrap());
    }

    #[test]
    fn header_parsing_is_lenient() {
        let signature = reference_signature(b"deadbeef", NOW, BODY);

        let reordered = format!("v1={signature},t={NOW}");
        assert!(verify_at(BODY, &reordered, SECRET, NOW).unwrap());

        let with_extras = format!("t={NOW}, v0=legacy, v1={signature}, scheme=hmac");
        assert!(verify_at(BODY, &with_extras, SECRET, NOW).unwrap());

        let with_malformed = format!("junk,t={NOW},,=,v1={signature}");
        assert!(verify_at(BODY, &with_malformed, SECRET, NOW).unwrap());
    }

    #[test]
    fn repeated_key_uses_last_value() {
        let signature = reference_signature(b"deadbeef", NOW, BODY);
        let header = format!("t={NOW},v1={},v1={signature}", "0".repeat(DIGEST_HEX_LEN));
        assert!(verify_at(BODY, &header, SECRET, NOW).unwrap());

        let header = format!("t={NOW},v1={signature},v1={}", "0".repeat(DIGEST_HEX_LEN));
        assert!(!verify_at(BODY, &header, SECRET, NOW).unwrap());
    }

    #[test]
    fn tampered_body_byte_is_rejected() {
        let header = sign(BODY, SECRET, NOW).unwrap();
        for idx in 0..BODY.len() {
            let mut tampered = BODY.to_vec();
            tampered[idx] ^= 0x01;
            assert!(
                !verify_at(&tampered, &header, SECRET, NOW).unwrap(),
                "tampering byte {idx} should fail"
            );
        }
    }

    #[test]
    fn tampered_signature_character_is_rejected() {
        let signature = reference_signature(b"deadbeef", NOW, BODY);
        for idx in [0, 31, DIGEST_HEX_LEN - 1] {
            let mut chars: Vec<char> = signature.chars().collect();
            chars[idx] = if chars[idx] == 'a' { 'b' } else { 'a' };
            let tampered: String = chars.into_iter().collect();
            let header = format!("t={NOW},v1={tampered}");
            assert!(!verify_at(BODY, &header, SECRET, NOW).unwrap());
        }
    }

    #[test]
    fn wrong_length_signatures_are_rejected() {
        let signature = reference_signature(b"deadbeef", NOW, BODY);

        let truncated = format!("t={NOW},v1={}", &signature[..DIGEST_HEX_LEN - 1]);
        assert!(!verify_at(BODY, &truncated, SECRET, NOW).unwrap());

        let extended = format!("t={NOW},v1={signature}0");
        assert!(!verify_at(BODY, &extended, SECRET, NOW).unwrap());

        let empty = format!("t={NOW},v1=");
        assert!(!verify_at(BODY, &empty, SECRET, NOW).unwrap());
    }

    #[test]
    fn uppercase_hex_signature_is_rejected() {
        let signature = reference_signature(b"deadbeef", NOW, BODY).to_uppercase();
        let header = format!("t={NOW},v1={signature}");
        assert!(!verify_at(BODY, &header, SECRET, NOW).unwrap());
    }

    #[test]
    fn signed_timestamp_is_used_verbatim() {
        // Leading zeros parse to the same number but change the signed payload.
        let signature = reference_signature(b"deadbeef", NOW, BODY);
        let header = format!("t=0{NOW},v1={signature}");
        assert!(!verify_at(BODY, &header, SECRET, NOW).unwrap());
    }

    #[test]
    fn malformed_secret_is_a_distinct_error() {
        let header = sign(BODY, SECRET, NOW).unwrap();

        let err = verify_at(BODY, &header, "ZGVhZGJlZWY=", NOW).unwrap_err();
        assert!(matches!(err, WebhookError::MissingSecretPrefix));
        assert!(err.is_configuration_error());

        let err = verify_at(BODY, &header, "whsec_not*base64!", NOW).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSecretEncoding(_)));

        let err = verify_at(BODY, &header, "whsec_", NOW).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSecretKey));
    }

    #[test]
    fn header_rejection_happens_before_secret_decoding() {
        assert!(!verify_at(BODY, "v1=abc", "not-a-secret", NOW).unwrap());
    }

    #[test]
    fn digests_match_compares_full_width() {
        let a = "a".repeat(DIGEST_HEX_LEN);
        assert!(digests_match(&a, &a));
        assert!(!digests_match(&a, &"a".repeat(DIGEST_HEX_LEN - 1)));
        assert!(!digests_match(&a, &"a".repeat(DIGEST_HEX_LEN + 1)));
        assert!(!digests_match(&a, ""));

        let mut last_differs = a.clone();
        last_differs.replace_range(DIGEST_HEX_LEN - 1.., "b");
        assert!(!digests_match(&a, &last_differs));
    }

    #[test]
    fn verifier_reuses_parsed_secret() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let header = sign(BODY, SECRET, NOW).unwrap();

        assert!(verifier.verify_at(BODY, &header, NOW + 10));
        assert!(!verifier.verify_at(BODY, &header, NOW + REPLAY_WINDOW_SECS + 1));
        assert!(!verifier.verify_at(b"{}", &header, NOW));

        assert!(matches!(
            WebhookVerifier::new("whsec_@@@").unwrap_err(),
            WebhookError::InvalidSecretEncoding(_)
        ));
    }

    #[test]
    fn verifier_debug_hides_key_material() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let debug = format!("{verifier:?}");
        assert!(!debug.contains("ZGVhZGJlZWY"));
        assert!(!debug.contains("deadbeef"));
    }

    #[test]
    fn verifier_is_shareable_across_threads() {
        let verifier = Arc::new(WebhookVerifier::new(SECRET).unwrap());
        let now = unix_now();
        let header = sign(BODY, SECRET, now).unwrap();

        let handles = (0..4)
            .map(|_| {
                let verifier = Arc::clone(&verifier);
                let header = header.clone();
                std::thread::spawn(move || verifier.verify(BODY, &header))
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    #[test]
    fn construct_event_verifies_then_decodes() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let body = br#"{"event":"sms.delivered","id":"evt_1","data":{"message_id":"msg_1"}}"#;
        let header = sign(body, SECRET, unix_now()).unwrap();

        let event = verifier.construct_event(body, &header).unwrap();
        assert_eq!(event.kind(), WebhookEventKind::SmsDelivered);
        assert_eq!(event.id.as_deref(), Some("evt_1"));
        assert_eq!(event.data["message_id"], "msg_1");

        let err = verifier.construct_event(b"{}", &header).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature));
        assert!(!err.is_configuration_error());

        let not_json = b"not json";
        let header = sign(not_json, SECRET, unix_now()).unwrap();
        let err = verifier.construct_event(not_json, &header).unwrap_err();
        assert!(matches!(err, WebhookError::Payload(_)));
    }

    #[test]
    fn construct_event_at_decodes_against_given_clock() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let body = br#"{"event":"verification.verified","id":"evt_2","created_at":1700000000}"#;
        let header = sign(body, SECRET, NOW).unwrap();

        let event = verifier.construct_event_at(body, &header, NOW + 60).unwrap();
        assert_eq!(event.kind(), WebhookEventKind::VerificationVerified);
        assert_eq!(event.created_at, Some(NOW));

        let err = verifier
            .construct_event_at(body, &header, NOW + REPLAY_WINDOW_SECS + 1)
            .unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature));
    }
}
