//! Reads a webhook body from stdin and checks it against `TEXTGATE_SIGNATURE`.
//!
//! Without `TEXTGATE_SIGNATURE` the body is signed with the current time instead, which
//! prints a header value usable for testing a local handler.

use std::io::{self, Read};
use std::time::{SystemTime, UNIX_EPOCH};

use textgate::webhook::{self, SIGNATURE_HEADER, WebhookVerifier};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let secret = std::env::var("TEXTGATE_WEBHOOK_SECRET").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TEXTGATE_WEBHOOK_SECRET environment variable is required",
        )
    })?;

    let mut body = Vec::new();
    io::stdin().read_to_end(&mut body)?;

    let Ok(header) = std::env::var("TEXTGATE_SIGNATURE") else {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let signed = webhook::sign(&body, &secret, i64::try_from(now)?)?;
        println!("{SIGNATURE_HEADER}: {signed}");
        return Ok(());
    };

    let verifier = WebhookVerifier::new(&secret)?;
    match verifier.construct_event(&body, &header) {
        Ok(event) => println!("accepted: {:?} {:?}", event.kind(), event.id),
        Err(err) if err.is_configuration_error() => return Err(err.into()),
        Err(err) => println!("rejected: {err}"),
    }

    Ok(())
}
