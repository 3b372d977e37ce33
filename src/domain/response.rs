use crate::domain::value::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parsed JSON reply of the gateway for an accepted message.
pub struct ApiResponse {
    /// `None` when the reply carried no usable `statusCode`.
    pub status_code: Option<StatusCode>,
    pub status_message: Option<String>,
    /// Gateway-assigned id of the transfer.
    pub transfer_id: Option<String>,
    /// Echo of the `clientMessageId` set on the message.
    pub client_message_id: Option<String>,
}
