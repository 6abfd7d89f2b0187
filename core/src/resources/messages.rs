//! Messaging: send SMS/MMS and look up sent or received messages.

use serde_json::Value;
use uuid::Uuid;

use crate::client::{Endpoint, TelnyxClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::{wire_enum, wire_model};

const SEND: Endpoint = Endpoint::new(HttpMethod::Post, "messages");
const RETRIEVE: Endpoint = Endpoint::new(HttpMethod::Get, "messages/{id}");

wire_enum! {
    pub enum MessageType {
        Sms => "SMS",
        Mms => "MMS",
    }
}

wire_enum! {
    pub enum MessageDirection {
        Inbound => "inbound",
        Outbound => "outbound",
    }
}

wire_enum! {
    /// Per-recipient delivery state.
    pub enum DeliveryStatus {
        Queued => "queued",
        Sending => "sending",
        Sent => "sent",
        Delivered => "delivered",
        SendingFailed => "sending_failed",
        DeliveryFailed => "delivery_failed",
        DeliveryUnconfirmed => "delivery_unconfirmed",
        Expired => "expired",
        WebhookDelivered => "webhook_delivered",
    }
}

impl DeliveryStatus {
    /// Whether no further status change will be reported for the recipient.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            DeliveryStatus::Delivered
                | DeliveryStatus::SendingFailed
                | DeliveryStatus::DeliveryFailed
                | DeliveryStatus::DeliveryUnconfirmed
                | DeliveryStatus::Expired
                | DeliveryStatus::WebhookDelivered
        )
    }
}

wire_model! {
    pub struct MessageEndpoint {
        required phone_number: String => "phone_number", with_phone_number;
        optional carrier: String => "carrier", with_carrier;
        optional line_type: String => "line_type", with_line_type;
    }
}

wire_model! {
    pub struct MessageRecipient {
        required phone_number: String => "phone_number", with_phone_number;
        required status: DeliveryStatus => "status", with_status;
        optional carrier: String => "carrier", with_carrier;
        optional line_type: String => "line_type", with_line_type;
    }
}

wire_model! {
    pub struct MediaItem {
        required url: String => "url", with_url;
        nullable content_type: String => "content_type", with_content_type;
        nullable sha256: String => "sha256", with_sha256;
        nullable size: i64 => "size", with_size;
    }
}

wire_model! {
    pub struct Cost {
        required amount: String => "amount", with_amount;
        required currency: String => "currency", with_currency;
    }
}

wire_model! {
    pub struct Message {
        required id: Uuid => "id", with_id;
        required record_type: String => "record_type", with_record_type;
        required direction: MessageDirection => "direction", with_direction;
        required message_type: MessageType => "type", with_message_type;
        required from: MessageEndpoint => "from", with_from;
        required to: Vec<MessageRecipient> => "to", with_to;
        optional text: String => "text", with_text;
        nullable subject: String => "subject", with_subject;
        optional media: Vec<MediaItem> => "media", with_media;
        nullable messaging_profile_id: String => "messaging_profile_id", with_messaging_profile_id;
        nullable webhook_url: String => "webhook_url", with_webhook_url;
        optional encoding: String => "encoding", with_encoding;
        optional parts: u32 => "parts", with_parts;
        optional tags: Vec<String> => "tags", with_tags;
        nullable cost: Cost => "cost", with_cost;
        nullable received_at: String => "received_at", with_received_at;
        nullable sent_at: String => "sent_at", with_sent_at;
        nullable completed_at: String => "completed_at", with_completed_at;
        optional errors: Vec<Value> => "errors", with_errors;
    }
}

wire_model! {
    pub struct MessageSendParams {
        required to: String => "to", with_to;
        optional from: String => "from", with_from;
        optional messaging_profile_id: String => "messaging_profile_id", with_messaging_profile_id;
        optional text: String => "text", with_text;
        optional subject: String => "subject", with_subject;
        optional media_urls: Vec<String> => "media_urls", with_media_urls;
        optional message_type: MessageType => "type", with_message_type;
        optional webhook_url: String => "webhook_url", with_webhook_url;
        optional webhook_failover_url: String => "webhook_failover_url", with_webhook_failover_url;
        optional use_profile_webhooks: bool => "use_profile_webhooks", with_use_profile_webhooks;
        optional auto_detect: bool => "auto_detect", with_auto_detect;
    }
}

wire_model! {
    pub struct MessageResponse {
        required data: Message => "data", with_data;
    }
}

impl Message {
    /// Total cost when the API has priced the message.
    pub fn priced(&self) -> Option<&Cost> {
        self.cost.as_value()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Messages<'a> {
    client: &'a TelnyxClient,
}

impl<'a> Messages<'a> {
    pub(crate) fn new(client: &'a TelnyxClient) -> Self {
        Self { client }
    }

    pub fn build_send(&self, params: &MessageSendParams) -> Result<HttpRequest, ApiError> {
        self.client.build_json(&SEND, &[], params)
    }

    /// Queue a message for delivery.
    pub fn send(&self, params: &MessageSendParams) -> Result<MessageResponse, ApiError> {
        self.client.execute(&SEND, self.build_send(params)?)
    }

    pub fn build_retrieve(&self, id: &str) -> Result<HttpRequest, ApiError> {
        self.client.build(&RETRIEVE, &[id])
    }

    pub fn retrieve(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.client.execute(&RETRIEVE, self.build_retrieve(id)?)
    }
}
