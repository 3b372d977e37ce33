//! Domain layer: messages, strong types and their invariants (no I/O).

mod message;
mod request;
mod response;
mod validation;
mod value;

pub use message::{
    BinaryMessage, Message, MessageContent, MessageData, MessageFields, MessageOptions,
    TextMessage, is_valid_recipient_address,
};
pub use request::SendOptions;
pub use response::ApiResponse;
pub use validation::{ErrorCause, ValidationError};
pub use value::{MaxSmsPerMessage, Password, SenderAddressType, StatusCode, Username};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rejects_empty() {
        assert!(matches!(
            Username::new("   "),
            Err(ValidationError::Empty {
                field: Username::FIELD
            })
        ));
    }

    #[test]
    fn text_message_payload_has_only_defined_fields() {
        let message = TextMessage::new("Hi", ["491701234567"]);
        assert_eq!(message.error(), None);
        assert_eq!(
            message.data(),
            MessageData {
                recipient_address_list: vec!["491701234567".to_owned()],
                message_content: Some(MessageContent::Text("Hi".to_owned())),
                user_data_header_present: None,
                sender_address: None,
                sender_address_type: None,
                send_as_flash_sms: None,
                notification_callback_url: None,
                client_message_id: None,
                priority: None,
            }
        );
    }

    #[test]
    fn invalid_messages_expose_cause_codes() {
        let cases: [(&dyn Message, &str); 4] = [
            (&TextMessage::new("Hey", ["12-34"]), "invalidNumber"),
            (&TextMessage::new("Hey", Vec::<String>::new()), "missingAddresses"),
            (&TextMessage::new("", ["1234"]), "invalidMessage"),
            (
                &BinaryMessage::new(Vec::<String>::new(), ["1234"], false),
                "invalidMessage",
            ),
        ];

        for (message, cause) in cases {
            assert_eq!(message.error().map(|err| err.cause().as_str()), Some(cause));
        }
    }

    #[test]
    fn test_send_options_only_set_test_flag() {
        let options = SendOptions::test();
        assert_eq!(options.test, Some(true));
        assert_eq!(options.max_sms_per_message, None);
    }
}
