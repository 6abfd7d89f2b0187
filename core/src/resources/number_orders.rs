//! Number orders: purchase new numbers and follow the order to completion.

use crate::client::{Endpoint, TelnyxClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::{wire_enum, wire_model};

const CREATE: Endpoint = Endpoint::new(HttpMethod::Post, "number_orders");
const RETRIEVE: Endpoint = Endpoint::new(HttpMethod::Get, "number_orders/{id}");

wire_enum! {
    pub enum NumberOrderStatus {
        Pending => "pending",
        Success => "success",
        Failure => "failure",
    }
}

wire_enum! {
    pub enum RequirementsStatus {
        RequirementInfoUnderReview => "requirement-info-under-review",
        RequirementInfoException => "requirement-info-exception",
        RequirementInfoPending => "requirement-info-pending",
        Approved => "approved",
    }
}

wire_model! {
    pub struct OrderedNumberRequest {
        required phone_number: String => "phone_number", with_phone_number;
        optional bundle_id: String => "bundle_id", with_bundle_id;
    }
}

wire_model! {
    pub struct NumberOrderCreateParams {
        required phone_numbers: Vec<OrderedNumberRequest> => "phone_numbers", with_phone_numbers;
        optional connection_id: String => "connection_id", with_connection_id;
        optional messaging_profile_id: String => "messaging_profile_id", with_messaging_profile_id;
        optional billing_group_id: String => "billing_group_id", with_billing_group_id;
        optional customer_reference: String => "customer_reference", with_customer_reference;
    }
}

wire_model! {
    pub struct OrderedNumber {
        required id: String => "id", with_id;
        required record_type: String => "record_type", with_record_type;
        required phone_number: String => "phone_number", with_phone_number;
        required status: NumberOrderStatus => "status", with_status;
        optional requirements_status: RequirementsStatus => "requirements_status", with_requirements_status;
        optional requirements_met: bool => "requirements_met", with_requirements_met;
        nullable bundle_id: String => "bundle_id", with_bundle_id;
    }
}

wire_model! {
    pub struct NumberOrder {
        required id: String => "id", with_id;
        required record_type: String => "record_type", with_record_type;
        required status: NumberOrderStatus => "status", with_status;
        required phone_numbers: Vec<OrderedNumber> => "phone_numbers", with_phone_numbers;
        optional phone_numbers_count: u32 => "phone_numbers_count", with_phone_numbers_count;
        nullable connection_id: String => "connection_id", with_connection_id;
        nullable messaging_profile_id: String => "messaging_profile_id", with_messaging_profile_id;
        nullable billing_group_id: String => "billing_group_id", with_billing_group_id;
        nullable customer_reference: String => "customer_reference", with_customer_reference;
        optional requirements_met: bool => "requirements_met", with_requirements_met;
        optional created_at: String => "created_at", with_created_at;
        optional updated_at: String => "updated_at", with_updated_at;
    }
}

impl NumberOrder {
    /// Whether the order has left the `pending` state.
    pub fn is_settled(&self) -> bool {
        self.status != NumberOrderStatus::Pending
    }
}

wire_model! {
    pub struct NumberOrderResponse {
        required data: NumberOrder => "data", with_data;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NumberOrders<'a> {
    client: &'a TelnyxClient,
}

impl<'a> NumberOrders<'a> {
    pub(crate) fn new(client: &'a TelnyxClient) -> Self {
        Self { client }
    }

    pub fn build_create(&self, params: &NumberOrderCreateParams) -> Result<HttpRequest, ApiError> {
        self.client.build_json(&CREATE, &[], params)
    }

    /// Place an order. Orders start out `pending`; poll `retrieve` until the
    /// order settles.
    pub fn create(&self, params: &NumberOrderCreateParams) -> Result<NumberOrderResponse, ApiError> {
        self.client.execute(&CREATE, self.build_create(params)?)
    }

    pub fn build_retrieve(&self, id: &str) -> Result<HttpRequest, ApiError> {
        self.client.build(&RETRIEVE, &[id])
    }

    pub fn retrieve(&self, id: &str) -> Result<NumberOrderResponse, ApiError> {
        self.client.execute(&RETRIEVE, self.build_retrieve(id)?)
    }
}
