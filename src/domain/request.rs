#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Per-send parameters that are not part of the message itself.
pub struct SendOptions {
    /// Segment limit for text messages, validated against
    /// [`MaxSmsPerMessage`](crate::domain::MaxSmsPerMessage) bounds. Ignored for binary messages.
    pub max_sms_per_message: Option<i32>,
    /// `Some(true)` asks the gateway to validate without delivering. `None` leaves the
    /// field out of the request.
    pub test: Option<bool>,
}

impl SendOptions {
    /// Options for a dry run: the gateway validates the request but sends nothing.
    pub fn test() -> Self {
        Self {
            test: Some(true),
            ..Default::default()
        }
    }
}
