use std::io;

use tokio::sync::oneshot;
use websms::{BinaryMessage, Credentials, SendOptions, SendResult, WebSmsClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let username = std::env::var("WEBSMS_USERNAME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "WEBSMS_USERNAME environment variable is required",
        )
    })?;
    let password = std::env::var("WEBSMS_PASSWORD").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "WEBSMS_PASSWORD environment variable is required",
        )
    })?;
    let recipient = std::env::var("WEBSMS_RECIPIENT").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "WEBSMS_RECIPIENT environment variable is required",
        )
    })?;

    let client = WebSmsClient::new(Credentials::new(username, password)?);
    // Two concatenated segments, each starting with its user data header.
    let message = BinaryMessage::new(
        ["BQAD/AIBWnVzYW1tZW4=", "BQAD/AICZ2Vmw7xndC4="],
        [recipient],
        true,
    );

    let (tx, rx) = oneshot::channel::<SendResult>();
    client.send_with_callback(
        &message,
        SendOptions::test(),
        Some(move |result: SendResult| {
            let _ = tx.send(result);
        }),
    );

    match rx.await? {
        Ok(response) => println!("accepted: {:?}", response.status_code),
        Err(err) => println!("failed ({}): {err}", err.cause()),
    }
    Ok(())
}
