//! Models shared across resources: pagination, filters, error documents.

use serde_json::Value;

use crate::{wire_model, wire_union};

wire_model! {
    /// Pagination block of list responses. The caller asks for the next page
    /// explicitly; nothing here fetches it.
    pub struct PaginationMeta {
        required page_number: u32 => "page_number", with_page_number;
        required page_size: u32 => "page_size", with_page_size;
        required total_pages: u32 => "total_pages", with_total_pages;
        required total_results: u32 => "total_results", with_total_results;
    }
}

impl PaginationMeta {
    /// Number of the page after this one, if there is one.
    pub fn next_page(&self) -> Option<u32> {
        (self.page_number < self.total_pages).then(|| self.page_number + 1)
    }
}

wire_model! {
    /// Page selection for list operations, sent as `page[number]` and
    /// `page[size]`.
    pub struct PageParams {
        optional number: u32 => "number", with_number;
        optional size: u32 => "size", with_size;
    }
}

wire_model! {
    /// String matching operators accepted by list filters.
    pub struct StringFilter {
        optional eq: String => "eq", with_eq;
        optional contains: String => "contains", with_contains;
        optional starts_with: String => "starts_with", with_starts_with;
        optional ends_with: String => "ends_with", with_ends_with;
    }
}

wire_union! {
    /// A filter given either as an exact string or as operator object.
    pub enum FilterValue ordered {
        Exact(String),
        Match(StringFilter),
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Exact(value.to_string())
    }
}

impl From<StringFilter> for FilterValue {
    fn from(filter: StringFilter) -> Self {
        FilterValue::Match(filter)
    }
}

wire_model! {
    /// SIP header attached to a call.
    pub struct CustomHeader {
        required name: String => "name", with_name;
        required value: String => "value", with_value;
    }
}

wire_model! {
    pub struct ErrorSource {
        optional pointer: String => "pointer", with_pointer;
        optional parameter: String => "parameter", with_parameter;
    }
}

wire_model! {
    /// One entry of the `errors` array in a failed response.
    pub struct ErrorDetail {
        required code: String => "code", with_code;
        required title: String => "title", with_title;
        optional detail: String => "detail", with_detail;
        optional source: ErrorSource => "source", with_source;
        optional meta: Value => "meta", with_meta;
    }
}

wire_model! {
    pub struct ErrorResponse {
        required errors: Vec<ErrorDetail> => "errors", with_errors;
    }
}
