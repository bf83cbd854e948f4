use std::io;

use textgate::{ApiKey, MessageId, TextGateClient};
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
    let message_id = std::env::var("TEXTGATE_MESSAGE_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TEXTGATE_MESSAGE_ID environment variable is required",
        )
    })?;

    let client = TextGateClient::new(ApiKey::new(api_key)?);
    let message = client.get_message(&MessageId::new(message_id)?).await?;
    println!(
        "id: {}, to: {}, status: {:?}, final: {}",
        message.id.as_str(),
        message.to.raw(),
        message.status,
        message.status.is_final()
    );

    Ok(())
}
