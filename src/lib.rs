//! Typed Rust client for the websms.com JSON SMS gateway.
//!
//! The crate is split into a domain layer of validated message types, a transport
//! layer for the JSON wire format, and a small client layer that issues one HTTPS
//! `POST` per message and classifies the reply.
//!
//! ```rust,no_run
//! use websms::{Credentials, Message, SendOptions, TextMessage, WebSmsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), websms::WebSmsError> {
//!     let client = WebSmsClient::new(Credentials::new("username", "password")?);
//!     let mut message = TextMessage::new("Hello from websms", ["4367612345678"]);
//!     message.set_client_message_id(Some("greeting-1".to_owned()));
//!
//!     let response = client.send(&message, SendOptions::test()).await?;
//!     println!("accepted with status {:?}", response.status_code);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    ClientConfig, Credentials, SendResult, WebSmsClient, WebSmsClientBuilder, WebSmsError,
};
pub use domain::{
    ApiResponse, BinaryMessage, ErrorCause, MaxSmsPerMessage, Message, MessageContent,
    MessageData, MessageFields, MessageOptions, SendOptions, SenderAddressType, StatusCode,
    TextMessage, ValidationError,
};
