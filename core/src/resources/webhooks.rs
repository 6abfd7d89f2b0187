//! Webhook payloads pushed by Telnyx.
//!
//! Webhooks arrive as an envelope whose `data.event_type` names the event.
//! `WebhookEvent` resolves on that tag, so each event decodes into the
//! payload shape registered for it and unknown event types fail loudly
//! instead of matching a random variant.

use serde_json::Value;

use crate::error::ApiError;
use crate::model;
use crate::resources::messages::Message;
use crate::{wire_enum, wire_model, wire_union};

wire_enum! {
    pub enum CallDirection {
        Incoming => "incoming",
        Outgoing => "outgoing",
    }
}

wire_enum! {
    pub enum HangupCause {
        CallRejected => "call_rejected",
        NormalClearing => "normal_clearing",
        OriginatorCancel => "originator_cancel",
        Timeout => "timeout",
        TimeLimit => "time_limit",
        UserBusy => "user_busy",
        NotFound => "not_found",
        Unspecified => "unspecified",
    }
}

wire_model! {
    pub struct CallEventPayload {
        required call_control_id: String => "call_control_id", with_call_control_id;
        required connection_id: String => "connection_id", with_connection_id;
        required call_leg_id: String => "call_leg_id", with_call_leg_id;
        required call_session_id: String => "call_session_id", with_call_session_id;
        optional from: String => "from", with_from;
        optional to: String => "to", with_to;
        optional direction: CallDirection => "direction", with_direction;
        optional state: String => "state", with_state;
        nullable client_state: String => "client_state", with_client_state;
        optional start_time: String => "start_time", with_start_time;
        optional end_time: String => "end_time", with_end_time;
        optional hangup_cause: HangupCause => "hangup_cause", with_hangup_cause;
        optional hangup_source: String => "hangup_source", with_hangup_source;
    }
}

wire_model! {
    pub struct CallWebhook {
        required id: String => "id", with_id;
        required record_type: String => "record_type", with_record_type;
        required occurred_at: String => "occurred_at", with_occurred_at;
        required payload: CallEventPayload => "payload", with_payload;
    }
}

wire_model! {
    pub struct MessageWebhook {
        required id: String => "id", with_id;
        required record_type: String => "record_type", with_record_type;
        required occurred_at: String => "occurred_at", with_occurred_at;
        required payload: Message => "payload", with_payload;
    }
}

wire_union! {
    /// Event carried by a webhook, keyed by `event_type`.
    pub enum WebhookEvent discriminator "event_type" {
        "call.initiated" => CallInitiated(CallWebhook),
        "call.answered" => CallAnswered(CallWebhook),
        "call.hangup" => CallHangup(CallWebhook),
        "message.sent" => MessageSent(MessageWebhook),
        "message.finalized" => MessageFinalized(MessageWebhook),
        "message.received" => MessageReceived(MessageWebhook),
    }
}

impl WebhookEvent {
    /// Call Control id of call events.
    pub fn call_control_id(&self) -> Option<&str> {
        match self {
            WebhookEvent::CallInitiated(event)
            | WebhookEvent::CallAnswered(event)
            | WebhookEvent::CallHangup(event) => Some(&event.payload.call_control_id),
            _ => None,
        }
    }
}

wire_model! {
    pub struct WebhookMeta {
        optional attempt: u32 => "attempt", with_attempt;
        optional delivered_to: String => "delivered_to", with_delivered_to;
    }
}

wire_model! {
    pub struct WebhookEnvelope {
        required data: WebhookEvent => "data", with_data;
        optional meta: WebhookMeta => "meta", with_meta;
    }
}

/// Parses webhook bodies. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct Webhooks;

impl Webhooks {
    /// Decode a raw webhook body. Signature verification is left to the
    /// caller.
    pub fn unwrap(&self, body: &str) -> Result<WebhookEnvelope, ApiError> {
        let raw: Value = serde_json::from_str(body)?;
        let envelope: WebhookEnvelope = model::decode(&raw)?;
        tracing::debug!(event_type = envelope.data.tag(), "decoded webhook");
        Ok(envelope)
    }
}
