//! Records API Data Transfer Objects
//!
//! These types match what the REST API returns.
//! DO NOT use these types outside the records module - convert via the adapter.
//!
//! Query endpoints answer `{ items: [...], pageDetails: {...} }`, single-record
//! endpoints answer `{ item: {...} }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paged query response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub page_details: Option<PageDetails>,
}

/// Paging metadata attached to query responses
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDetails {
    pub count: Option<u32>,
    pub request_count: Option<u32>,
    pub prev_page_url: Option<String>,
    pub next_page_url: Option<String>,
}

/// Single-record response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemResponse<T> {
    pub item: Option<T>,
}

/// Create/update response (`{ itemId: 123 }`)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResponse {
    pub item_id: Option<i64>,
}

/// Company record (only the fields used for name mapping are typed)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Option<i64>,
    pub company_name: Option<String>,
    pub is_active: Option<bool>,
}

/// Resource (staff member) record
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

/// Error body returned on non-2xx responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<Value>,
}
