//! Phone number inventory: list, inspect, reconfigure and release numbers.

use crate::client::{Endpoint, TelnyxClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::resources::shared::{FilterValue, PageParams, PaginationMeta};
use crate::{wire_enum, wire_model};

const LIST: Endpoint = Endpoint::new(HttpMethod::Get, "phone_numbers");
const RETRIEVE: Endpoint = Endpoint::new(HttpMethod::Get, "phone_numbers/{id}");
const UPDATE: Endpoint = Endpoint::new(HttpMethod::Patch, "phone_numbers/{id}");
const DELETE: Endpoint = Endpoint::new(HttpMethod::Delete, "phone_numbers/{id}");

wire_enum! {
    pub enum PhoneNumberStatus {
        PurchasePending => "purchase-pending",
        PurchaseFailed => "purchase-failed",
        PortPending => "port-pending",
        PortFailed => "port-failed",
        Active => "active",
        Deleted => "deleted",
        EmergencyOnly => "emergency-only",
        PortedOut => "ported-out",
        PortOutPending => "port-out-pending",
    }
}

wire_enum! {
    /// Number class as reported by the inventory. Both spellings of long
    /// code occur in live payloads.
    pub enum PhoneNumberType {
        Local => "local",
        TollFree => "toll-free",
        Mobile => "mobile",
        National => "national",
        ShortCode => "short-code",
        LongCode => "long-code",
        Longcode => "longcode",
    }
}

wire_enum! {
    /// Sort key for `list`; a leading `-` sorts descending.
    pub enum PhoneNumberSort {
        PurchasedAt => "purchased_at",
        PurchasedAtDesc => "-purchased_at",
        PhoneNumber => "phone_number",
        PhoneNumberDesc => "-phone_number",
        ConnectionName => "connection_name",
        ConnectionNameDesc => "-connection_name",
    }
}

wire_model! {
    pub struct PhoneNumber {
        required id: String => "id", with_id;
        required record_type: String => "record_type", with_record_type;
        required phone_number: String => "phone_number", with_phone_number;
        required status: PhoneNumberStatus => "status", with_status;
        optional tags: Vec<String> => "tags", with_tags;
        optional phone_number_type: PhoneNumberType => "phone_number_type", with_phone_number_type;
        nullable connection_id: String => "connection_id", with_connection_id;
        nullable connection_name: String => "connection_name", with_connection_name;
        nullable customer_reference: String => "customer_reference", with_customer_reference;
        nullable external_pin: String => "external_pin", with_external_pin;
        nullable messaging_profile_id: String => "messaging_profile_id", with_messaging_profile_id;
        nullable billing_group_id: String => "billing_group_id", with_billing_group_id;
        optional emergency_enabled: bool => "emergency_enabled", with_emergency_enabled;
        optional call_forwarding_enabled: bool => "call_forwarding_enabled", with_call_forwarding_enabled;
        optional purchased_at: String => "purchased_at", with_purchased_at;
        optional created_at: String => "created_at", with_created_at;
        optional updated_at: String => "updated_at", with_updated_at;
    }
}

wire_model! {
    /// Filters accepted by `list`, sent as `filter[...]` query parameters.
    pub struct PhoneNumberFilter {
        optional phone_number: FilterValue => "phone_number", with_phone_number;
        optional status: PhoneNumberStatus => "status", with_status;
        optional tag: String => "tag", with_tag;
        optional connection_id: String => "connection_id", with_connection_id;
        optional customer_reference: String => "customer_reference", with_customer_reference;
    }
}

wire_model! {
    pub struct PhoneNumberListParams {
        optional filter: PhoneNumberFilter => "filter", with_filter;
        optional page: PageParams => "page", with_page;
        optional sort: PhoneNumberSort => "sort", with_sort;
    }
}

wire_model! {
    pub struct PhoneNumberListResponse {
        required data: Vec<PhoneNumber> => "data", with_data;
        required meta: PaginationMeta => "meta", with_meta;
    }
}

wire_model! {
    /// Fields that `update` changes; unset fields are left as they are and
    /// an explicit null clears the value.
    pub struct PhoneNumberUpdateParams {
        optional tags: Vec<String> => "tags", with_tags;
        optional external_pin: String => "external_pin", with_external_pin;
        nullable customer_reference: String => "customer_reference", with_customer_reference;
        nullable connection_id: String => "connection_id", with_connection_id;
        nullable billing_group_id: String => "billing_group_id", with_billing_group_id;
    }
}

wire_model! {
    pub struct PhoneNumberResponse {
        required data: PhoneNumber => "data", with_data;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PhoneNumbers<'a> {
    client: &'a TelnyxClient,
}

impl<'a> PhoneNumbers<'a> {
    pub(crate) fn new(client: &'a TelnyxClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, params: &PhoneNumberListParams) -> Result<HttpRequest, ApiError> {
        self.client.build_query(&LIST, &[], params)
    }

    /// One page of owned numbers. Follow `meta.next_page()` for more.
    pub fn list(&self, params: &PhoneNumberListParams) -> Result<PhoneNumberListResponse, ApiError> {
        self.client.execute(&LIST, self.build_list(params)?)
    }

    pub fn build_retrieve(&self, id: &str) -> Result<HttpRequest, ApiError> {
        self.client.build(&RETRIEVE, &[id])
    }

    pub fn retrieve(&self, id: &str) -> Result<PhoneNumberResponse, ApiError> {
        self.client.execute(&RETRIEVE, self.build_retrieve(id)?)
    }

    pub fn build_update(
        &self,
        id: &str,
        params: &PhoneNumberUpdateParams,
    ) -> Result<HttpRequest, ApiError> {
        self.client.build_json(&UPDATE, &[id], params)
    }

    pub fn update(
        &self,
        id: &str,
        params: &PhoneNumberUpdateParams,
    ) -> Result<PhoneNumberResponse, ApiError> {
        self.client.execute(&UPDATE, self.build_update(id, params)?)
    }

    pub fn build_delete(&self, id: &str) -> Result<HttpRequest, ApiError> {
        self.client.build(&DELETE, &[id])
    }

    /// Release a number. The response carries the number in its final state.
    pub fn delete(&self, id: &str) -> Result<PhoneNumberResponse, ApiError> {
        self.client.execute(&DELETE, self.build_delete(id)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use url::Url;

    use super::*;
    use crate::error::{ModelError, TransportError};
    use crate::http::{HttpResponse, Transport};
    use crate::model::{decode, encode, Nullable};
    use crate::resources::shared::StringFilter;

    struct Fixed(HttpResponse);

    impl Transport for Fixed {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(self.0.clone())
        }
    }

    fn client(body: Value) -> TelnyxClient {
        TelnyxClient::with_transport(
            "https://api.telnyx.com/v2",
            Fixed(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: body.to_string(),
            }),
        )
        .unwrap()
    }

    fn number_json() -> Value {
        json!({
            "id": "1293384261075731499",
            "record_type": "phone_number",
            "phone_number": "+19705555098",
            "status": "active",
            "tags": ["tag_1"],
            "phone_number_type": "longcode",
            "connection_id": "1293384261075731499",
            "connection_name": "connection-name",
            "customer_reference": null,
            "external_pin": null,
            "emergency_enabled": false,
            "purchased_at": "2019-10-23T18:10:00.000Z"
        })
    }

    fn sorted_query(request: &HttpRequest) -> Vec<(String, String)> {
        let url = Url::parse(&request.url).unwrap();
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn list_flattens_filter_and_page_into_query() {
        let filter = PhoneNumberFilter::builder()
            .phone_number(StringFilter::builder().contains("555").build().unwrap())
            .status(PhoneNumberStatus::Active)
            .build()
            .unwrap();
        let params = PhoneNumberListParams::builder()
            .filter(filter)
            .page(PageParams::builder().number(2u32).size(20u32).build().unwrap())
            .sort(PhoneNumberSort::PurchasedAtDesc)
            .build()
            .unwrap();
        let req = client(json!({})).phone_numbers().build_list(&params).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert!(req.url.starts_with("https://api.telnyx.com/v2/phone_numbers?"));
        assert!(req.body.is_none());
        assert_eq!(
            sorted_query(&req),
            vec![
                ("filter[phone_number][contains]".to_string(), "555".to_string()),
                ("filter[status]".to_string(), "active".to_string()),
                ("page[number]".to_string(), "2".to_string()),
                ("page[size]".to_string(), "20".to_string()),
                ("sort".to_string(), "-purchased_at".to_string()),
            ]
        );
    }

    #[test]
    fn exact_filter_is_sent_as_plain_value() {
        let params = PhoneNumberListParams::builder()
            .filter(
                PhoneNumberFilter::builder()
                    .phone_number(FilterValue::from("+19705555098"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let req = client(json!({})).phone_numbers().build_list(&params).unwrap();
        assert_eq!(
            sorted_query(&req),
            vec![("filter[phone_number]".to_string(), "+19705555098".to_string())]
        );
    }

    #[test]
    fn list_without_params_has_no_query() {
        let params = PhoneNumberListParams::builder().build().unwrap();
        let req = client(json!({})).phone_numbers().build_list(&params).unwrap();
        assert_eq!(req.url, "https://api.telnyx.com/v2/phone_numbers");
    }

    #[test]
    fn list_decodes_page_and_meta() {
        let body = json!({
            "data": [number_json()],
            "meta": {"page_number": 1, "page_size": 20, "total_pages": 1, "total_results": 1}
        });
        let page = client(body)
            .phone_numbers()
            .list(&PhoneNumberListParams::builder().build().unwrap())
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].status, PhoneNumberStatus::Active);
        assert_eq!(page.data[0].phone_number_type, Some(PhoneNumberType::Longcode));
        assert!(page.data[0].customer_reference.is_null());
        assert!(page.data[0].messaging_profile_id.is_absent());
        assert_eq!(page.meta.next_page(), None);
    }

    #[test]
    fn update_sends_only_touched_fields() {
        let params = PhoneNumberUpdateParams::builder()
            .tags(vec!["vip".to_string()])
            .customer_reference(Nullable::Null)
            .build()
            .unwrap();
        let req = client(json!({}))
            .phone_numbers()
            .build_update("1293384261075731499", &params)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "https://api.telnyx.com/v2/phone_numbers/1293384261075731499");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"tags": ["vip"], "customer_reference": null}));
    }

    #[test]
    fn delete_has_no_body() {
        let req = client(json!({})).phone_numbers().build_delete("42").unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn both_long_code_spellings_are_distinct_literals() {
        assert_eq!(PhoneNumberType::from_literal("long-code"), Some(PhoneNumberType::LongCode));
        assert_eq!(PhoneNumberType::from_literal("longcode"), Some(PhoneNumberType::Longcode));
        assert_eq!(PhoneNumberType::Longcode.as_str(), "longcode");
    }

    #[test]
    fn null_phone_number_filter_is_a_mismatch() {
        let err = decode::<PhoneNumberFilter>(&json!({"phone_number": null})).unwrap_err();
        match err {
            ModelError::TypeMismatch { path, found, .. } => {
                assert_eq!(path, "PhoneNumberFilter.phone_number");
                assert_eq!(found, "null");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_status_literal_is_rejected() {
        let mut raw = number_json();
        raw["status"] = json!("suspended");
        let err = decode::<PhoneNumber>(&raw).unwrap_err();
        match err {
            ModelError::TypeMismatch { path, expected, .. } => {
                assert_eq!(path, "PhoneNumber.status");
                assert!(expected.contains("purchase-pending"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn number_round_trip() {
        let number: PhoneNumber = decode(&number_json()).unwrap();
        assert_eq!(encode(&number), number_json());
    }
}
