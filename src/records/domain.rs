//! Internal types for talking to the remote records service.
//!
//! These are OUR types. Wire shapes live in `dto.rs` and are converted
//! by the adapter before anything outside this module sees them.

use serde_json::{Value, json};

/// Remote entity collections addressable by the records API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Companies,
    Contacts,
    Tickets,
    TicketNotes,
    Projects,
    Tasks,
    Resources,
    Contracts,
    Invoices,
}

impl Entity {
    /// Path segment used by the REST API (`/Companies/query`, `/Resources/7`).
    pub fn path(&self) -> &'static str {
        match self {
            Entity::Companies => "Companies",
            Entity::Contacts => "Contacts",
            Entity::Tickets => "Tickets",
            Entity::TicketNotes => "TicketNotes",
            Entity::Projects => "Projects",
            Entity::Tasks => "Tasks",
            Entity::Resources => "Resources",
            Entity::Contracts => "Contracts",
            Entity::Invoices => "Invoices",
        }
    }

    /// Field matched by a free-text `search_term`, if the entity has one.
    pub fn search_field(&self) -> Option<&'static str> {
        match self {
            Entity::Companies => Some("companyName"),
            Entity::Contacts => Some("lastName"),
            Entity::Tickets | Entity::Projects | Entity::Tasks => Some("title"),
            Entity::Resources => Some("lastName"),
            Entity::Contracts => Some("contractName"),
            Entity::TicketNotes => Some("description"),
            Entity::Invoices => None,
        }
    }
}

/// Filter options accepted by the search operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    /// Maximum number of records to collect across pages (None = service default)
    pub page_size: Option<u32>,
    /// Free-text match against the entity's search field
    pub search_term: Option<String>,
    /// Filter by active status
    pub is_active: Option<bool>,
    /// Extra equality conditions (`field == value`)
    pub equals: Vec<(String, Value)>,
}

impl SearchFilter {
    /// Filter that only caps the number of returned records.
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    /// Build a filter from loosely-typed tool arguments.
    ///
    /// Recognised keys: `pageSize`, `searchTerm`, `isActive`; any other
    /// scalar argument becomes an equality condition.
    pub fn from_args(args: &Value) -> Self {
        let mut filter = SearchFilter::default();
        let Some(map) = args.as_object() else {
            return filter;
        };

        for (key, value) in map {
            match key.as_str() {
                "pageSize" => {
                    filter.page_size = value.as_u64().map(|n| u32::try_from(n).unwrap_or(u32::MAX));
                }
                "searchTerm" => filter.search_term = value.as_str().map(str::to_string),
                "isActive" => filter.is_active = value.as_bool(),
                _ if value.is_number() || value.is_string() || value.is_boolean() => {
                    filter.equals.push((key.clone(), value.clone()));
                }
                _ => {}
            }
        }
        filter
    }

    /// Render the query body understood by the `/{Entity}/query` endpoint.
    pub fn to_query_body(&self, entity: Entity, max_records: u32) -> Value {
        let mut conditions = Vec::new();

        if let (Some(term), Some(field)) = (&self.search_term, entity.search_field()) {
            conditions.push(json!({ "op": "contains", "field": field, "value": term }));
        }
        if let Some(active) = self.is_active {
            conditions.push(json!({ "op": "eq", "field": "isActive", "value": active }));
        }
        for (field, value) in &self.equals {
            conditions.push(json!({ "op": "eq", "field": field, "value": value }));
        }
        if conditions.is_empty() {
            conditions.push(json!({ "op": "exist", "field": "id" }));
        }

        json!({ "filter": conditions, "MaxRecords": max_records })
    }
}

/// Errors returned by the records API client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Method not allowed for {0}")]
    MethodNotAllowed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("Unauthorized: check API credentials")]
    Unauthorized,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("API client not configured: {0}")]
    NotConfigured(String),
}

impl ApiError {
    /// True when the service signals the operation will never succeed here.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ApiError::MethodNotAllowed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_queries_existing_ids() {
        let body = SearchFilter::default().to_query_body(Entity::Companies, 500);
        assert_eq!(body["filter"][0]["op"], "exist");
        assert_eq!(body["filter"][0]["field"], "id");
        assert_eq!(body["MaxRecords"], 500);
    }

    #[test]
    fn test_filter_from_args() {
        let args = json!({
            "searchTerm": "acme",
            "isActive": true,
            "pageSize": 25,
            "companyID": 42,
            "nested": { "ignored": true }
        });
        let filter = SearchFilter::from_args(&args);
        assert_eq!(filter.search_term.as_deref(), Some("acme"));
        assert_eq!(filter.is_active, Some(true));
        assert_eq!(filter.page_size, Some(25));
        assert_eq!(filter.equals, vec![("companyID".to_string(), json!(42))]);
    }

    #[test]
    fn test_oversized_page_size_saturates() {
        let filter = SearchFilter::from_args(&json!({ "pageSize": 4294967301u64 }));
        assert_eq!(filter.page_size, Some(u32::MAX));

        let negative = SearchFilter::from_args(&json!({ "pageSize": -5 }));
        assert_eq!(negative.page_size, None);
    }

    #[test]
    fn test_search_term_uses_entity_field() {
        let filter = SearchFilter {
            search_term: Some("printer".to_string()),
            ..Default::default()
        };
        let body = filter.to_query_body(Entity::Tickets, 10);
        assert_eq!(body["filter"][0]["field"], "title");
        assert_eq!(body["filter"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_only_method_not_allowed_is_unsupported() {
        assert!(ApiError::MethodNotAllowed("Resources".into()).is_unsupported());
        assert!(!ApiError::RateLimited.is_unsupported());
        assert!(!ApiError::Http { status: 500, body: String::new() }.is_unsupported());
    }
}
