use std::io;

use twilio::{Credential, PhoneNumber, TwilioClient};

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
    let number = std::env::var("TWILIO_LOOKUP_NUMBER").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TWILIO_LOOKUP_NUMBER environment variable is required",
        )
    })?;

    let number = PhoneNumber::parse(Some(phonenumber::country::Id::US), &number)?;

    let client = TwilioClient::new(Credential::new(account_sid, auth_token)?);
    let lookup = client.lookup().phone_number(&number).await?;
    println!(
        "{} ({}) carrier: {:?}",
        lookup.phone_number, lookup.national_format, lookup.carrier
    );

    Ok(())
}
