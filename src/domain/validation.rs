use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Machine-checkable failure category shared by message validation and sending.
///
/// The first three variants are produced when a message is built; the rest come
/// from [`crate::WebSmsClient`] while sending.
pub enum ErrorCause {
    MissingAddresses,
    InvalidNumber,
    InvalidMessage,
    Parameter,
    Authorization,
    Connection,
    Api,
    JsonParse,
    Unknown,
}

impl ErrorCause {
    /// Cause code as used by the websms SDKs (`invalidNumber`, `api`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingAddresses => "missingAddresses",
            Self::InvalidNumber => "invalidNumber",
            Self::InvalidMessage => "invalidMessage",
            Self::Parameter => "parameter",
            Self::Authorization => "authorization",
            Self::Connection => "connection",
            Self::Api => "api",
            Self::JsonParse => "jsonParse",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingAddresses,
    InvalidNumber { input: String },
    InvalidMessage,
    UnknownSenderAddressType { input: String },
    MaxSmsPerMessageOutOfRange { actual: i32 },
    Empty { field: &'static str },
}

impl ValidationError {
    /// Category of this validation failure.
    pub fn cause(&self) -> ErrorCause {
        match self {
            Self::MissingAddresses => ErrorCause::MissingAddresses,
            Self::InvalidNumber { .. } => ErrorCause::InvalidNumber,
            Self::InvalidMessage => ErrorCause::InvalidMessage,
            Self::UnknownSenderAddressType { .. }
            | Self::MaxSmsPerMessageOutOfRange { .. }
            | Self::Empty { .. } => ErrorCause::Parameter,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAddresses => {
                f.write_str("there has to be at least one recipient phone number")
            }
            Self::InvalidNumber { .. } => f.write_str("phone numbers should contain max. 15 digits"),
            Self::InvalidMessage => f.write_str("empty message or not of type string"),
            Self::UnknownSenderAddressType { input } => write!(
                f,
                "unknown sender address type: {input} (expected national, international, alphanumeric or shortcode)"
            ),
            // The accepted range is 1..=256; the wording is kept as the gateway SDKs report it.
            Self::MaxSmsPerMessageOutOfRange { .. } => {
                f.write_str("Number of maxSmsPerMessage has to be between 0 and 256")
            }
            Self::Empty { field } => write!(f, "{field} must not be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::{ErrorCause, ValidationError};

    #[test]
    fn display_messages_match_gateway_wording() {
        assert_eq!(
            ValidationError::MissingAddresses.to_string(),
            "there has to be at least one recipient phone number"
        );
        assert_eq!(
            ValidationError::InvalidNumber {
                input: "12ab".to_owned()
            }
            .to_string(),
            "phone numbers should contain max. 15 digits"
        );
        assert_eq!(
            ValidationError::InvalidMessage.to_string(),
            "empty message or not of type string"
        );
        assert_eq!(
            ValidationError::MaxSmsPerMessageOutOfRange { actual: 0 }.to_string(),
            "Number of maxSmsPerMessage has to be between 0 and 256"
        );
        assert_eq!(
            ValidationError::Empty { field: "username" }.to_string(),
            "username must not be empty"
        );
    }

    #[test]
    fn causes_map_to_camel_case_codes() {
        assert_eq!(
            ValidationError::MissingAddresses.cause().as_str(),
            "missingAddresses"
        );
        assert_eq!(
            ValidationError::InvalidNumber {
                input: String::new()
            }
            .cause(),
            ErrorCause::InvalidNumber
        );
        assert_eq!(
            ValidationError::UnknownSenderAddressType {
                input: "x".to_owned()
            }
            .cause(),
            ErrorCause::Parameter
        );
        assert_eq!(ErrorCause::JsonParse.to_string(), "jsonParse");
    }
}
