use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::{
    ApiResponse, MaxSmsPerMessage, MessageContent, MessageData, SenderAddressType, StatusCode,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageJsonRequest<'a> {
    recipient_address_list: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    message_content: Option<TransportContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_data_header_present: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender_address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sender_address_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_as_flash_sms: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_callback_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_message_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_sms_per_message: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum TransportContent<'a> {
    Text(&'a str),
    Binary(&'a [String]),
}

impl<'a> From<&'a MessageContent> for TransportContent<'a> {
    fn from(value: &'a MessageContent) -> Self {
        match value {
            MessageContent::Text(text) => Self::Text(text),
            MessageContent::Binary(segments) => Self::Binary(segments),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageJsonResponse {
    #[serde(default, deserialize_with = "loose_status_code")]
    status_code: Option<i32>,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    transfer_id: Option<String>,
    #[serde(default)]
    client_message_id: Option<String>,
}

/// Reads `statusCode` the way the gateway's loosely typed clients compare it.
///
/// Numbers and numeric strings are codes; `null`, `false` and `""` count as `0`
/// and `true` as `1`. Anything else is treated as an absent code. Fractional codes
/// are rounded away from the success window.
fn loose_status_code<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let numeric = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) if text.trim().is_empty() => Some(0.0),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if flag { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    };
    Ok(numeric
        .filter(|code| !code.is_nan())
        .map(|code| {
            if code > f64::from(StatusCode::SUCCESS_MAX) {
                code.ceil() as i32
            } else {
                code.floor() as i32
            }
        }))
}

/// JSON request body: the message's defined fields plus the per-send stamps.
pub fn encode_send_message_json(
    data: &MessageData,
    test: Option<bool>,
    max_sms_per_message: Option<MaxSmsPerMessage>,
) -> Result<String, TransportError> {
    let request = SendMessageJsonRequest {
        recipient_address_list: &data.recipient_address_list,
        message_content: data.message_content.as_ref().map(TransportContent::from),
        user_data_header_present: data.user_data_header_present,
        sender_address: data.sender_address.as_deref(),
        sender_address_type: data.sender_address_type.map(SenderAddressType::as_str),
        send_as_flash_sms: data.send_as_flash_sms,
        notification_callback_url: data.notification_callback_url.as_deref(),
        client_message_id: data.client_message_id.as_deref(),
        priority: data.priority,
        test,
        max_sms_per_message: max_sms_per_message.map(MaxSmsPerMessage::value),
    };
    Ok(serde_json::to_string(&request)?)
}

pub fn decode_send_message_json_response(json: &str) -> Result<ApiResponse, TransportError> {
    let parsed: SendMessageJsonResponse = serde_json::from_str(json)?;
    Ok(ApiResponse {
        status_code: parsed.status_code.map(StatusCode::new),
        status_message: parsed.status_message,
        transfer_id: parsed.transfer_id,
        client_message_id: parsed.client_message_id,
    })
}
