//! Call Control: dial, inspect and command live calls.

use crate::client::{Endpoint, TelnyxClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::resources::shared::CustomHeader;
use crate::{wire_enum, wire_model};

const DIAL: Endpoint = Endpoint::new(HttpMethod::Post, "calls");
const RETRIEVE_STATUS: Endpoint = Endpoint::new(HttpMethod::Get, "calls/{call_control_id}");
const ANSWER: Endpoint = Endpoint::new(HttpMethod::Post, "calls/{call_control_id}/actions/answer");
const HANGUP: Endpoint = Endpoint::new(HttpMethod::Post, "calls/{call_control_id}/actions/hangup");
const RING_GROUP: Endpoint =
    Endpoint::new(HttpMethod::Post, "calls/{call_control_id}/actions/ring_group");

wire_enum! {
    pub enum AnsweringMachineDetection {
        Premium => "premium",
        Detect => "detect",
        DetectBeep => "detect_beep",
        DetectWords => "detect_words",
        GreetingEnd => "greeting_end",
        Disabled => "disabled",
    }
}

wire_enum! {
    /// Method Telnyx uses when calling the webhook URL.
    pub enum WebhookUrlMethod {
        Post => "POST",
        Get => "GET",
    }
}

wire_model! {
    pub struct CallDialParams {
        required connection_id: String => "connection_id", with_connection_id;
        required to: String => "to", with_to;
        required from: String => "from", with_from;
        optional from_display_name: String => "from_display_name", with_from_display_name;
        optional answering_machine_detection: AnsweringMachineDetection => "answering_machine_detection", with_answering_machine_detection;
        nullable custom_headers: Vec<CustomHeader> => "custom_headers", with_custom_headers;
        optional timeout_secs: u32 => "timeout_secs", with_timeout_secs;
        optional client_state: String => "client_state", with_client_state;
        optional command_id: String => "command_id", with_command_id;
        optional webhook_url: String => "webhook_url", with_webhook_url;
        optional webhook_url_method: WebhookUrlMethod => "webhook_url_method", with_webhook_url_method;
    }
}

wire_model! {
    pub struct Call {
        required call_control_id: String => "call_control_id", with_call_control_id;
        required call_leg_id: String => "call_leg_id", with_call_leg_id;
        required call_session_id: String => "call_session_id", with_call_session_id;
        required is_alive: bool => "is_alive", with_is_alive;
        required record_type: String => "record_type", with_record_type;
        optional call_duration: i64 => "call_duration", with_call_duration;
        nullable client_state: String => "client_state", with_client_state;
    }
}

wire_model! {
    pub struct CallResponse {
        required data: Call => "data", with_data;
    }
}

wire_model! {
    pub struct CallAnswerParams {
        optional client_state: String => "client_state", with_client_state;
        optional command_id: String => "command_id", with_command_id;
        optional webhook_url: String => "webhook_url", with_webhook_url;
        optional webhook_url_method: WebhookUrlMethod => "webhook_url_method", with_webhook_url_method;
    }
}

wire_model! {
    pub struct CallHangupParams {
        optional client_state: String => "client_state", with_client_state;
        optional command_id: String => "command_id", with_command_id;
    }
}

wire_model! {
    /// Destination rung in parallel by `ring_group`.
    pub struct RingTarget {
        required name: String => "name", with_name;
        required to: String => "to", with_to;
    }
}

wire_model! {
    pub struct RingGroupParams {
        required targets: Vec<RingTarget> => "targets", with_targets;
        nullable custom_headers: Vec<CustomHeader> => "custom_headers", with_custom_headers;
        optional timeout_secs: u32 => "timeout_secs", with_timeout_secs;
        optional client_state: String => "client_state", with_client_state;
    }
}

wire_model! {
    pub struct CallActionResult {
        required result: String => "result", with_result;
    }
}

wire_model! {
    pub struct CallActionResponse {
        required data: CallActionResult => "data", with_data;
    }
}

/// Call Control operations.
#[derive(Debug, Clone, Copy)]
pub struct Calls<'a> {
    client: &'a TelnyxClient,
}

impl<'a> Calls<'a> {
    pub(crate) fn new(client: &'a TelnyxClient) -> Self {
        Self { client }
    }

    pub fn build_dial(&self, params: &CallDialParams) -> Result<HttpRequest, ApiError> {
        self.client.build_json(&DIAL, &[], params)
    }

    /// Start an outbound call.
    pub fn dial(&self, params: &CallDialParams) -> Result<CallResponse, ApiError> {
        self.client.execute(&DIAL, self.build_dial(params)?)
    }

    pub fn build_retrieve_status(&self, call_control_id: &str) -> Result<HttpRequest, ApiError> {
        self.client.build(&RETRIEVE_STATUS, &[call_control_id])
    }

    pub fn retrieve_status(&self, call_control_id: &str) -> Result<CallResponse, ApiError> {
        self.client
            .execute(&RETRIEVE_STATUS, self.build_retrieve_status(call_control_id)?)
    }

    pub fn build_answer(
        &self,
        call_control_id: &str,
        params: &CallAnswerParams,
    ) -> Result<HttpRequest, ApiError> {
        self.client.build_json(&ANSWER, &[call_control_id], params)
    }

    pub fn answer(
        &self,
        call_control_id: &str,
        params: &CallAnswerParams,
    ) -> Result<CallActionResponse, ApiError> {
        self.client
            .execute(&ANSWER, self.build_answer(call_control_id, params)?)
    }

    pub fn build_hangup(
        &self,
        call_control_id: &str,
        params: &CallHangupParams,
    ) -> Result<HttpRequest, ApiError> {
        self.client.build_json(&HANGUP, &[call_control_id], params)
    }

    pub fn hangup(
        &self,
        call_control_id: &str,
        params: &CallHangupParams,
    ) -> Result<CallActionResponse, ApiError> {
        self.client
            .execute(&HANGUP, self.build_hangup(call_control_id, params)?)
    }

    pub fn build_ring_group(
        &self,
        call_control_id: &str,
        params: &RingGroupParams,
    ) -> Result<HttpRequest, ApiError> {
        self.client.build_json(&RING_GROUP, &[call_control_id], params)
    }

    /// Ring several destinations at once from a live call.
    pub fn ring_group(
        &self,
        call_control_id: &str,
        params: &RingGroupParams,
    ) -> Result<CallActionResponse, ApiError> {
        self.client
            .execute(&RING_GROUP, self.build_ring_group(call_control_id, params)?)
    }
}
