use std::io;

use textgate::{
    ApiKey, CheckVerification, RawPhoneNumber, SendVerification, TextGateClient,
    VerificationCode, VerificationId, VerificationOptions,
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

    let client = TextGateClient::new(ApiKey::new(api_key)?);

    if let Ok(existing_id) = std::env::var("TEXTGATE_VERIFICATION_ID") {
        let code = std::env::var("TEXTGATE_CODE").map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "TEXTGATE_CODE environment variable is required with TEXTGATE_VERIFICATION_ID",
            )
        })?;
        let request = CheckVerification::new(
            VerificationId::new(existing_id)?,
            VerificationCode::new(code)?,
        );
        let check = client.check_verification(request).await?;
        println!(
            "status: {:?}, verified: {}, remaining_attempts: {:?}",
            check.status,
            check.is_verified(),
            check.remaining_attempts
        );
        return Ok(());
    }

    let phone_raw = std::env::var("TEXTGATE_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TEXTGATE_PHONE environment variable is required when TEXTGATE_VERIFICATION_ID is not set",
        )
    })?;

    let request = SendVerification::new(
        RawPhoneNumber::new(phone_raw)?,
        VerificationOptions::default(),
    );
    let started = client.send_verification(request).await?;
    println!(
        "id: {}, status: {:?}, expires_at: {:?}",
        started.id.as_str(),
        started.status,
        started.expires_at
    );

    Ok(())
}
