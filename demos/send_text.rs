use std::io;

use websms::{Credentials, Message, SendOptions, TextMessage, WebSmsClient};

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
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let username = required_env("WEBSMS_USERNAME")?;
    let password = required_env("WEBSMS_PASSWORD")?;
    let recipient = required_env("WEBSMS_RECIPIENT")?;
    let text = std::env::var("WEBSMS_MESSAGE")
        .unwrap_or_else(|_| "Hello from the websms demo.".to_owned());
    // Real delivery only when explicitly asked for.
    let test = std::env::var("WEBSMS_DELIVER").is_err();

    let client = WebSmsClient::new(Credentials::new(username, password)?);
    let mut message = TextMessage::new(text, [recipient]);
    if let Some(err) = message.error() {
        return Err(err.clone().into());
    }
    message.set_client_message_id(Some("websms-demo".to_owned()));

    let options = SendOptions {
        max_sms_per_message: Some(1),
        test: Some(test),
    };
    let response = client.send(&message, options).await?;
    println!(
        "status_code: {:?}, status_message: {:?}, transfer_id: {:?}",
        response.status_code, response.status_message, response.transfer_id
    );

    Ok(())
}
