use std::sync::LazyLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use crate::domain::validation::ValidationError;
use crate::domain::value::SenderAddressType;

/// ASCII digits only; `\d` would also accept other Unicode decimal digits.
static RECIPIENT_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[0-9]{1,15}$").expect("recipient address pattern is valid"));

/// Whether `address` is a valid recipient: 1 to 15 decimal digits, no `+` or separators.
pub fn is_valid_recipient_address(address: &str) -> bool {
    RECIPIENT_ADDRESS.is_match(address)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Optional fields accepted when a message is constructed.
///
/// Values are copied as given; unset fields stay absent from [`MessageData`].
pub struct MessageOptions {
    pub sender_address: Option<String>,
    pub sender_address_type: Option<SenderAddressType>,
    pub send_as_flash_sms: Option<bool>,
    pub notification_callback_url: Option<String>,
    pub client_message_id: Option<String>,
    /// Message priority, typically `1..=9` as supported by the account.
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fields shared by every message kind, plus the construction-time validation result.
///
/// The error slot is written at most once and never cleared: a message that failed
/// validation stays unusable.
pub struct MessageFields {
    recipient_address_list: Vec<String>,
    sender_address: Option<String>,
    sender_address_type: Option<SenderAddressType>,
    send_as_flash_sms: Option<bool>,
    notification_callback_url: Option<String>,
    client_message_id: Option<String>,
    priority: Option<i32>,
    error: Option<ValidationError>,
}

impl MessageFields {
    /// Validate `recipients` and take over `options`.
    ///
    /// On failure the recipient list is left empty and [`MessageFields::error`] is set:
    /// [`ValidationError::MissingAddresses`] for an empty list, otherwise
    /// [`ValidationError::InvalidNumber`] for the first entry that is not 1-15 digits.
    pub fn new<I, S>(recipients: I, options: MessageOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = Self {
            recipient_address_list: Vec::new(),
            sender_address: options.sender_address,
            sender_address_type: options.sender_address_type,
            send_as_flash_sms: options.send_as_flash_sms,
            notification_callback_url: options.notification_callback_url,
            client_message_id: options.client_message_id,
            priority: options.priority,
            error: None,
        };

        let recipients = recipients.into_iter().map(Into::into).collect::<Vec<_>>();
        match check_recipients(&recipients) {
            Ok(()) => fields.recipient_address_list = recipients,
            Err(err) => fields.fail(err),
        }
        fields
    }

    /// Validation failure recorded at construction, if any.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub(crate) fn fail(&mut self, err: ValidationError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn data_with(&self, message_content: Option<MessageContent>) -> MessageData {
        MessageData {
            recipient_address_list: self.recipient_address_list.clone(),
            message_content,
            user_data_header_present: None,
            sender_address: self.sender_address.clone(),
            sender_address_type: self.sender_address_type,
            send_as_flash_sms: self.send_as_flash_sms,
            notification_callback_url: self.notification_callback_url.clone(),
            client_message_id: self.client_message_id.clone(),
            priority: self.priority,
        }
    }
}

fn check_recipients(recipients: &[String]) -> Result<(), ValidationError> {
    if recipients.is_empty() {
        return Err(ValidationError::MissingAddresses);
    }
    match recipients
        .iter()
        .find(|address| !is_valid_recipient_address(address))
    {
        Some(bad) => Err(ValidationError::InvalidNumber { input: bad.clone() }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Variant-specific `messageContent`.
pub enum MessageContent {
    Text(String),
    /// Base64-encoded segments.
    Binary(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Snapshot of every field of a message that currently has a value.
///
/// This is the payload sent to the gateway; `None` fields are left out of the wire
/// representation entirely.
pub struct MessageData {
    pub recipient_address_list: Vec<String>,
    pub message_content: Option<MessageContent>,
    pub user_data_header_present: Option<bool>,
    pub sender_address: Option<String>,
    pub sender_address_type: Option<SenderAddressType>,
    pub send_as_flash_sms: Option<bool>,
    pub notification_callback_url: Option<String>,
    pub client_message_id: Option<String>,
    pub priority: Option<i32>,
}

impl MessageData {
    /// Wire keys present in this snapshot, in payload order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let optional = [
            ("messageContent", self.message_content.is_some()),
            ("userDataHeaderPresent", self.user_data_header_present.is_some()),
            ("senderAddress", self.sender_address.is_some()),
            (SenderAddressType::FIELD, self.sender_address_type.is_some()),
            ("sendAsFlashSms", self.send_as_flash_sms.is_some()),
            (
                "notificationCallbackUrl",
                self.notification_callback_url.is_some(),
            ),
            ("clientMessageId", self.client_message_id.is_some()),
            ("priority", self.priority.is_some()),
        ];

        std::iter::once("recipientAddressList")
            .chain(
                optional
                    .into_iter()
                    .filter_map(|(name, present)| present.then_some(name)),
            )
            .collect()
    }
}

/// Shared capability of every sendable message.
///
/// Implemented by [`TextMessage`] and [`BinaryMessage`]. Other implementations can be
/// built on [`MessageFields`], but the client only knows how to send the two built-in
/// kinds and rejects anything else.
pub trait Message {
    fn fields(&self) -> &MessageFields;

    fn fields_mut(&mut self) -> &mut MessageFields;

    /// Every field that currently has a value (the request payload).
    fn data(&self) -> MessageData;

    /// Validation failure recorded at construction; such a message can never be sent.
    fn error(&self) -> Option<&ValidationError> {
        self.fields().error()
    }

    fn as_text(&self) -> Option<&TextMessage> {
        None
    }

    fn as_binary(&self) -> Option<&BinaryMessage> {
        None
    }

    fn recipient_address_list(&self) -> &[String] {
        &self.fields().recipient_address_list
    }

    fn sender_address(&self) -> Option<&str> {
        self.fields().sender_address.as_deref()
    }

    /// Available sender addresses depend on the account.
    fn set_sender_address(&mut self, sender_address: Option<String>) {
        self.fields_mut().sender_address = sender_address;
    }

    fn sender_address_type(&self) -> Option<SenderAddressType> {
        self.fields().sender_address_type
    }

    /// Set the sender address type from its wire name or a [`SenderAddressType`].
    ///
    /// Unknown names are rejected and leave the current value unchanged.
    fn set_sender_address_type(
        &mut self,
        sender_address_type: impl AsRef<str>,
    ) -> Result<SenderAddressType, ValidationError>
    where
        Self: Sized,
    {
        let kind = sender_address_type.as_ref().parse::<SenderAddressType>()?;
        self.fields_mut().sender_address_type = Some(kind);
        Ok(kind)
    }

    fn send_as_flash_sms(&self) -> Option<bool> {
        self.fields().send_as_flash_sms
    }

    fn set_send_as_flash_sms(&mut self, send_as_flash_sms: Option<bool>) {
        self.fields_mut().send_as_flash_sms = send_as_flash_sms;
    }

    fn notification_callback_url(&self) -> Option<&str> {
        self.fields().notification_callback_url.as_deref()
    }

    fn set_notification_callback_url(&mut self, notification_callback_url: Option<String>) {
        self.fields_mut().notification_callback_url = notification_callback_url;
    }

    fn client_message_id(&self) -> Option<&str> {
        self.fields().client_message_id.as_deref()
    }

    /// The id is echoed in the send response and in delivery notifications.
    fn set_client_message_id(&mut self, client_message_id: Option<String>) {
        self.fields_mut().client_message_id = client_message_id;
    }

    fn priority(&self) -> Option<i32> {
        self.fields().priority
    }

    fn set_priority(&mut self, priority: Option<i32>) {
        self.fields_mut().priority = priority;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Plain text SMS.
pub struct TextMessage {
    fields: MessageFields,
    message_content: Option<String>,
}

impl TextMessage {
    pub fn new<I, S>(message_content: impl Into<String>, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_options(message_content, recipients, MessageOptions::default())
    }

    /// Build a text message; an empty text is recorded as [`ValidationError::InvalidMessage`]
    /// unless the recipients were already rejected.
    pub fn with_options<I, S>(
        message_content: impl Into<String>,
        recipients: I,
        options: MessageOptions,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = MessageFields::new(recipients, options);
        let mut content = None;

        if fields.error().is_none() {
            let text = message_content.into();
            if text.is_empty() {
                fields.fail(ValidationError::InvalidMessage);
            } else {
                content = Some(text);
            }
        }

        Self {
            fields,
            message_content: content,
        }
    }

    /// `None` when the message failed validation.
    pub fn message_content(&self) -> Option<&str> {
        self.message_content.as_deref()
    }
}

impl Message for TextMessage {
    fn fields(&self) -> &MessageFields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut MessageFields {
        &mut self.fields
    }

    fn data(&self) -> MessageData {
        self.fields
            .data_with(self.message_content.clone().map(MessageContent::Text))
    }

    fn as_text(&self) -> Option<&TextMessage> {
        Some(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Binary SMS made of base64-encoded segments.
///
/// Example segments: `["BQAD/AIBWnVzYW1tZW4=", "BQAD/AICZ2Vmw7xndC4="]`.
pub struct BinaryMessage {
    fields: MessageFields,
    message_content: Option<Vec<String>>,
    user_data_header_present: bool,
}

impl BinaryMessage {
    pub fn new<C, T, I, S>(segments: C, recipients: I, user_data_header_present: bool) -> Self
    where
        C: IntoIterator<Item = T>,
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_options(
            segments,
            recipients,
            user_data_header_present,
            MessageOptions::default(),
        )
    }

    /// Build a binary message; an empty segment list is recorded as
    /// [`ValidationError::InvalidMessage`] unless the recipients were already rejected.
    pub fn with_options<C, T, I, S>(
        segments: C,
        recipients: I,
        user_data_header_present: bool,
        options: MessageOptions,
    ) -> Self
    where
        C: IntoIterator<Item = T>,
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = MessageFields::new(recipients, options);
        let mut content = None;

        if fields.error().is_none() {
            let segments = segments.into_iter().map(Into::into).collect::<Vec<_>>();
            if segments.is_empty() {
                fields.fail(ValidationError::InvalidMessage);
            } else {
                content = Some(segments);
            }
        }

        Self {
            fields,
            message_content: content,
            user_data_header_present,
        }
    }

    /// Build a binary message from raw segment bytes, base64-encoding each segment.
    pub fn from_bytes<C, B, I, S>(
        segments: C,
        recipients: I,
        user_data_header_present: bool,
        options: MessageOptions,
    ) -> Self
    where
        C: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let encoded = segments
            .into_iter()
            .map(|segment| STANDARD.encode(segment))
            .collect::<Vec<_>>();
        Self::with_options(encoded, recipients, user_data_header_present, options)
    }

    /// `None` when the message failed validation.
    pub fn message_content(&self) -> Option<&[String]> {
        self.message_content.as_deref()
    }

    pub fn user_data_header_present(&self) -> bool {
        self.user_data_header_present
    }

    pub fn set_user_data_header_present(&mut self, user_data_header_present: bool) {
        self.user_data_header_present = user_data_header_present;
    }
}

impl Message for BinaryMessage {
    fn fields(&self) -> &MessageFields {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut MessageFields {
        &mut self.fields
    }

    fn data(&self) -> MessageData {
        let mut data = self
            .fields
            .data_with(self.message_content.clone().map(MessageContent::Binary));
        data.user_data_header_present = Some(self.user_data_header_present);
        data
    }

    fn as_binary(&self) -> Option<&BinaryMessage> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEGMENTS: [&str; 2] = ["BQAD/AIBWnVzYW1tZW4=", "BQAD/AICZ2Vmw7xndC4="];

    #[test]
    fn recipient_address_pattern() {
        assert!(is_valid_recipient_address("1"));
        assert!(is_valid_recipient_address("123456789012345"));
        assert!(!is_valid_recipient_address(""));
        assert!(!is_valid_recipient_address("1234567890123456"));
        assert!(!is_valid_recipient_address("+491701234567"));
        assert!(!is_valid_recipient_address("0170 1234567"));
        assert!(!is_valid_recipient_address("١٢٣"));
    }

    #[test]
    fn text_message_valid() {
        let message = TextMessage::new("Hi", ["491701234567"]);
        assert_eq!(message.error(), None);
        assert_eq!(message.message_content(), Some("Hi"));
        assert_eq!(message.recipient_address_list(), ["491701234567"]);
        assert_eq!(message.sender_address(), None);
        assert_eq!(message.sender_address_type(), None);
        assert_eq!(message.send_as_flash_sms(), None);
        assert_eq!(message.notification_callback_url(), None);
        assert_eq!(message.client_message_id(), None);
        assert_eq!(message.priority(), None);

        let data = message.data();
        assert_eq!(
            data.field_names(),
            ["recipientAddressList", "messageContent"]
        );
        assert_eq!(
            data.message_content,
            Some(MessageContent::Text("Hi".to_owned()))
        );
    }

    #[test]
    fn too_long_number_is_invalid() {
        let message = TextMessage::new("Hey", ["1234567891234567"]);
        let err = message.error().unwrap();
        assert_eq!(err.cause().as_str(), "invalidNumber");
        assert_eq!(err.to_string(), "phone numbers should contain max. 15 digits");
        assert!(message.recipient_address_list().is_empty());
        assert_eq!(message.message_content(), None);
    }

    #[test]
    fn first_bad_number_short_circuits() {
        let message = TextMessage::new("Hey", ["123", "abc", "1234567891234567"]);
        assert_eq!(
            message.error(),
            Some(&ValidationError::InvalidNumber {
                input: "abc".to_owned()
            })
        );
    }

    #[test]
    fn empty_recipients_are_missing() {
        let message = TextMessage::new("Hey", Vec::<String>::new());
        assert_eq!(message.error(), Some(&ValidationError::MissingAddresses));
    }

    #[test]
    fn empty_text_is_invalid_message() {
        let message = TextMessage::new("", ["12345"]);
        let err = message.error().unwrap();
        assert_eq!(err, &ValidationError::InvalidMessage);
        assert_eq!(err.to_string(), "empty message or not of type string");
    }

    #[test]
    fn recipient_error_wins_over_content_error() {
        let message = TextMessage::new("", Vec::<&str>::new());
        assert_eq!(message.error(), Some(&ValidationError::MissingAddresses));

        let message = BinaryMessage::new(Vec::<String>::new(), ["x"], false);
        assert_eq!(
            message.error().map(|err| err.cause().as_str()),
            Some("invalidNumber")
        );
    }

    #[test]
    fn options_round_trip_through_getters() {
        let options = MessageOptions {
            sender_address: Some("01234".to_owned()),
            sender_address_type: Some(SenderAddressType::National),
            send_as_flash_sms: Some(false),
            notification_callback_url: Some("https://example.invalid/notify".to_owned()),
            client_message_id: Some("1".to_owned()),
            priority: Some(1),
        };
        let message = TextMessage::with_options("Hey", ["1234"], options);

        assert_eq!(message.error(), None);
        assert_eq!(message.sender_address(), Some("01234"));
        assert_eq!(
            message.sender_address_type(),
            Some(SenderAddressType::National)
        );
        assert_eq!(message.send_as_flash_sms(), Some(false));
        assert_eq!(
            message.notification_callback_url(),
            Some("https://example.invalid/notify")
        );
        assert_eq!(message.client_message_id(), Some("1"));
        assert_eq!(message.priority(), Some(1));
        assert_eq!(message.data().field_names().len(), 8);
    }

    #[test]
    fn setters_assign_and_unset() {
        let mut message = TextMessage::new("Hey", ["1234"]);

        message.set_sender_address(Some("01234".to_owned()));
        message.set_send_as_flash_sms(Some(true));
        message.set_notification_callback_url(Some("hallo".to_owned()));
        message.set_priority(Some(1));
        message.set_client_message_id(Some("1".to_owned()));

        assert_eq!(message.sender_address(), Some("01234"));
        assert_eq!(message.send_as_flash_sms(), Some(true));
        assert_eq!(message.notification_callback_url(), Some("hallo"));
        assert_eq!(message.priority(), Some(1));
        assert_eq!(message.client_message_id(), Some("1"));

        message.set_priority(None);
        assert_eq!(message.priority(), None);
        assert!(!message.data().field_names().contains(&"priority"));
    }

    #[test]
    fn sender_address_type_setter_rejects_unknown_without_effect() {
        let mut message = TextMessage::new("Hey", ["1234"]);

        assert_eq!(
            message.set_sender_address_type("shortcode"),
            Ok(SenderAddressType::Shortcode)
        );
        assert!(message.set_sender_address_type("premium").is_err());
        assert_eq!(
            message.sender_address_type(),
            Some(SenderAddressType::Shortcode)
        );

        assert_eq!(
            message.set_sender_address_type(SenderAddressType::Alphanumeric),
            Ok(SenderAddressType::Alphanumeric)
        );
        assert_eq!(
            message.sender_address_type(),
            Some(SenderAddressType::Alphanumeric)
        );
    }

    #[test]
    fn setters_do_not_clear_validation_error() {
        let mut message = TextMessage::new("Hey", ["12a"]);
        message.set_priority(Some(5));
        assert!(message.error().is_some());
    }

    #[test]
    fn binary_message_valid() {
        let message = BinaryMessage::new(SEGMENTS, ["1234"], false);
        assert_eq!(message.error(), None);
        assert_eq!(message.message_content().map(<[String]>::len), Some(2));
        assert!(!message.user_data_header_present());

        let data = message.data();
        assert_eq!(data.user_data_header_present, Some(false));
        assert_eq!(
            data.field_names(),
            [
                "recipientAddressList",
                "messageContent",
                "userDataHeaderPresent"
            ]
        );
    }

    #[test]
    fn binary_message_invalid_inputs() {
        let message = BinaryMessage::new(["Hey"], ["1234567891234567"], false);
        assert_eq!(
            message.error().map(ValidationError::cause),
            Some(crate::domain::ErrorCause::InvalidNumber)
        );

        let message = BinaryMessage::new(["Hey"], Vec::<String>::new(), false);
        assert_eq!(message.error(), Some(&ValidationError::MissingAddresses));

        let message = BinaryMessage::new(Vec::<String>::new(), ["12345"], true);
        assert_eq!(message.error(), Some(&ValidationError::InvalidMessage));
        assert!(message.user_data_header_present());
    }

    #[test]
    fn binary_message_header_flag_is_mutable() {
        let mut message = BinaryMessage::new(SEGMENTS, ["1234"], true);
        assert_eq!(message.data().user_data_header_present, Some(true));
        message.set_user_data_header_present(false);
        assert!(!message.user_data_header_present());
    }

    #[test]
    fn binary_message_from_bytes_encodes_segments() {
        let message = BinaryMessage::from_bytes(
            [b"Zusammen".as_slice()],
            ["1234"],
            false,
            MessageOptions::default(),
        );
        assert_eq!(message.error(), None);
        assert_eq!(
            message.message_content(),
            Some(["WnVzYW1tZW4=".to_owned()].as_slice())
        );
    }

    #[test]
    fn variant_probes() {
        let text = TextMessage::new("Hey", ["1234"]);
        assert!(text.as_text().is_some());
        assert!(text.as_binary().is_none());

        let binary = BinaryMessage::new(SEGMENTS, ["1234"], false);
        assert!(binary.as_binary().is_some());
        assert!(binary.as_text().is_none());
    }
}
