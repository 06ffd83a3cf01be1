use std::io;

use twilio::{Credential, PageSize, TwilioClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let account_sid = std::env::var("TWILIO_ACCOUNT_SID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TWILIO_ACCOUNT_SID environment variable is required",
        )
    })?;
    let auth_token = std::env::var("TWILIO_AUTH_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TWILIO_AUTH_TOKEN environment variable is required",
        )
    })?;

    let client = TwilioClient::new(Credential::new(account_sid, auth_token)?);
    let mut messages = client.messages().list(PageSize::new(20)?);
    while let Some(message) = messages.next().await? {
        println!(
            "{} {} -> {} [{}]",
            message.sid, message.from, message.to, message.status
        );
    }

    Ok(())
}
