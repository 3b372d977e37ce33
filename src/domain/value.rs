use std::fmt;
use std::str::FromStr;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// websms account username used for Basic authentication.
///
/// Invariant: non-empty after trimming.
pub struct Username(String);

impl Username {
    pub const FIELD: &'static str = "username";

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// websms account password used for Basic authentication.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct Password(String);

impl Password {
    pub const FIELD: &'static str = "password";

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Kind of sender address (`senderAddressType`).
///
/// Which kinds are usable depends on the account settings.
pub enum SenderAddressType {
    National,
    International,
    Alphanumeric,
    Shortcode,
}

impl SenderAddressType {
    pub const FIELD: &'static str = "senderAddressType";

    pub const ALL: [Self; 4] = [
        Self::National,
        Self::International,
        Self::Alphanumeric,
        Self::Shortcode,
    ];

    /// Wire value (`national`, `international`, `alphanumeric`, `shortcode`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::National => "national",
            Self::International => "international",
            Self::Alphanumeric => "alphanumeric",
            Self::Shortcode => "shortcode",
        }
    }
}

impl AsRef<str> for SenderAddressType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for SenderAddressType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSenderAddressType {
                input: s.to_owned(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Upper bound of SMS segments a long text message may be split into (`maxSmsPerMessage`).
///
/// Invariant: `1..=256`. Zero is rejected even though the rejection message reads
/// "between 0 and 256".
pub struct MaxSmsPerMessage(i32);

impl MaxSmsPerMessage {
    pub const FIELD: &'static str = "maxSmsPerMessage";

    /// Smallest accepted value.
    pub const MIN: i32 = 1;
    /// Largest accepted value.
    pub const MAX: i32 = 256;

    /// Create a validated segment limit.
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::MaxSmsPerMessageOutOfRange { actual: value });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// API status code from the gateway's JSON reply (`statusCode`).
///
/// Distinct from the HTTP status. Unknown codes are preserved as-is.
pub struct StatusCode(i32);

impl StatusCode {
    /// Lowest code the gateway uses for an accepted message.
    pub const SUCCESS_MIN: i32 = 2000;
    /// Highest code the gateway uses for an accepted message (queued).
    pub const SUCCESS_MAX: i32 = 2001;

    pub fn new(code: i32) -> Self {
        Self(code)
    }

    pub fn as_i32(self) -> i32 {
        self.0
    }

    /// `true` for `2000` (ok) and `2001` (ok, queued).
    pub fn is_success(self) -> bool {
        (Self::SUCCESS_MIN..=Self::SUCCESS_MAX).contains(&self.0)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
