use std::io;

use textgate::{
    ApiKey, IdempotencyKey, MessageText, RawPhoneNumber, SendOptions, SendSms, TextGateClient,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let api_key = std::env::var("TEXTGATE_API_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TEXTGATE_API_KEY environment variable is required",
        )
    })?;
    let phone_raw = std::env::var("TEXTGATE_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TEXTGATE_PHONE environment variable is required",
        )
    })?;
    let message = std::env::var("TEXTGATE_MESSAGE")
        .unwrap_or_else(|_| "Hello from the textgate demo.".to_owned());

    let client = TextGateClient::new(ApiKey::new(api_key)?);
    let options = SendOptions {
        idempotency_key: std::env::var("TEXTGATE_IDEMPOTENCY_KEY")
            .ok()
            .map(IdempotencyKey::new)
            .transpose()?,
        ..Default::default()
    };
    let request = SendSms::new(
        RawPhoneNumber::new(phone_raw)?,
        MessageText::new(message)?,
        options,
    );

    let sent = client.send_sms(request).await?;
    println!(
        "id: {}, status: {:?}, segments: {:?}, price: {:?}",
        sent.id.as_str(),
        sent.status,
        sent.segments,
        sent.price.as_ref().map(|price| price.as_str())
    );

    Ok(())
}
