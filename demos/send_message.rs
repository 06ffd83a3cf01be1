use std::io;

use twilio::{Credential, MessageBody, RawPhoneNumber, SendMessage, TwilioClient};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let account_sid = required_env("TWILIO_ACCOUNT_SID")?;
    let auth_token = required_env("TWILIO_AUTH_TOKEN")?;
    let from = required_env("TWILIO_FROM")?;
    let to = required_env("TWILIO_TO")?;
    let body = std::env::var("TWILIO_BODY")
        .unwrap_or_else(|_| "Hello from the twilio example.".to_owned());

    let client = TwilioClient::new(Credential::new(account_sid, auth_token)?);
    let mut request = SendMessage::new(
        RawPhoneNumber::new(from)?,
        RawPhoneNumber::new(to)?,
        MessageBody::new(body)?,
    );
    if let Ok(media_url) = std::env::var("TWILIO_MEDIA_URL") {
        request = request.media_url(&media_url)?;
    }

    let message = client.messages().send(&request).await?;
    println!("sid: {}, status: {}", message.sid, message.status);

    Ok(())
}
