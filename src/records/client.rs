//! Records API HTTP client
//!
//! Handles communication with the REST records service.
//!
//! ## Authentication
//! Every request carries three headers: `ApiIntegrationcode`, `UserName` and
//! `Secret`. There is no token exchange.
//!
//! ## Paging
//! Query endpoints return at most 500 records per page. When more are wanted
//! the response carries `pageDetails.nextPageUrl`, a ready-made GET URL for
//! the next page. We follow it until the requested cap is reached or the
//! service stops handing out pages.
//!
//! ## Unsupported endpoints
//! Some tenants answer `405 Method Not Allowed` for whole entity collections
//! (Resources is the usual one). That maps to [`ApiError::MethodNotAllowed`]
//! so callers can tell "never going to work" apart from transient failures.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::adapter;
use super::domain::{ApiError, Entity, SearchFilter};
use super::dto;
use super::NamedRecord;
use crate::config::Credentials;

/// Largest page the service hands out.
const MAX_PAGE_SIZE: u32 = 500;

/// Records API client
pub struct AutotaskClient {
    http_client: reqwest::Client,
    base_url: String,
    username: String,
    secret: String,
    integration_code: String,
}

impl AutotaskClient {
    /// Create a new client from stored credentials.
    pub fn new(credentials: &Credentials) -> Result<Self, ApiError> {
        let missing: Vec<&str> = [
            ("username", &credentials.username),
            ("secret", &credentials.secret),
            ("integration_code", &credentials.integration_code),
            ("api_url", &credentials.api_url),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(ApiError::NotConfigured(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: credentials
                .api_url
                .clone()
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            username: credentials.username.clone().unwrap_or_default(),
            secret: credentials.secret.clone().unwrap_or_default(),
            integration_code: credentials.integration_code.clone().unwrap_or_default(),
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query an entity collection, following pages up to the filter's cap.
    pub async fn query(&self, entity: Entity, filter: &SearchFilter) -> Result<Vec<Value>, ApiError> {
        self.query_typed(entity, filter).await
    }

    /// Fetch one record by id. `Ok(None)` when the service returns an empty item.
    pub async fn get(&self, entity: Entity, id: i64) -> Result<Option<Value>, ApiError> {
        let url = format!("{}/{}/{}", self.base_url, entity.path(), id);
        let response: dto::ItemResponse<Value> =
            self.send(entity, self.authorized(self.http_client.get(&url))).await?;
        Ok(response.item.filter(|item| !item.is_null()))
    }

    /// Create a record, returning the new id.
    pub async fn create(&self, entity: Entity, body: &Value) -> Result<i64, ApiError> {
        let url = format!("{}/{}", self.base_url, entity.path());
        let request = self.authorized(self.http_client.post(&url)).json(body);
        let response: dto::WriteResponse = self.send(entity, request).await?;
        response
            .item_id
            .ok_or_else(|| ApiError::Parse("create response without itemId".to_string()))
    }

    /// Update a record (the body carries the id), returning the affected id.
    pub async fn update(&self, entity: Entity, body: &Value) -> Result<i64, ApiError> {
        let url = format!("{}/{}", self.base_url, entity.path());
        let request = self.authorized(self.http_client.patch(&url)).json(body);
        let response: dto::WriteResponse = self.send(entity, request).await?;
        response
            .item_id
            .ok_or_else(|| ApiError::Parse("update response without itemId".to_string()))
    }

    /// Company id -> name pairs for the mapping cache.
    pub async fn search_companies(&self, filter: &SearchFilter) -> Result<Vec<NamedRecord>, ApiError> {
        let companies: Vec<dto::Company> = self.query_typed(Entity::Companies, filter).await?;
        Ok(companies
            .iter()
            .filter_map(adapter::company_entry)
            .map(NamedRecord::from)
            .collect())
    }

    /// Resource id -> name pairs for the mapping cache.
    pub async fn search_resources(&self, filter: &SearchFilter) -> Result<Vec<NamedRecord>, ApiError> {
        let resources: Vec<dto::Resource> = self.query_typed(Entity::Resources, filter).await?;
        Ok(resources
            .iter()
            .filter_map(adapter::resource_entry)
            .map(NamedRecord::from)
            .collect())
    }

    /// Look up a single resource's display name.
    pub async fn get_resource(&self, id: i64) -> Result<Option<NamedRecord>, ApiError> {
        let url = format!("{}/{}/{}", self.base_url, Entity::Resources.path(), id);
        let response: dto::ItemResponse<dto::Resource> = self
            .send(Entity::Resources, self.authorized(self.http_client.get(&url)))
            .await?;
        Ok(response
            .item
            .as_ref()
            .and_then(adapter::resource_name)
            .map(|name| NamedRecord { id, name }))
    }

    async fn query_typed<T: DeserializeOwned>(
        &self,
        entity: Entity,
        filter: &SearchFilter,
    ) -> Result<Vec<T>, ApiError> {
        let wanted = filter.page_size.filter(|n| *n > 0).unwrap_or(MAX_PAGE_SIZE) as usize;
        let url = format!("{}/{}/query", self.base_url, entity.path());
        let body = filter.to_query_body(entity, (wanted as u32).min(MAX_PAGE_SIZE));

        let request = self.authorized(self.http_client.post(&url)).json(&body);
        let mut page: dto::QueryResponse<T> = self.send(entity, request).await?;
        let mut items = std::mem::take(&mut page.items);

        while items.len() < wanted {
            let Some(next_url) = page.page_details.and_then(|d| d.next_page_url) else {
                break;
            };
            tracing::debug!("Following next page for {}: {}", entity.path(), next_url);
            page = self
                .send(entity, self.authorized(self.http_client.get(&next_url)))
                .await?;
            if page.items.is_empty() {
                break;
            }
            items.append(&mut page.items);
        }

        items.truncate(wanted);
        Ok(items)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("ApiIntegrationcode", &self.integration_code)
            .header("UserName", &self.username)
            .header("Secret", &self.secret)
    }

    /// Send a request and decode the JSON body, mapping status codes to errors
    async fn send<T: DeserializeOwned>(
        &self,
        entity: Entity,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(ApiError::NotFound(entity.path().to_string())),
            StatusCode::METHOD_NOT_ALLOWED => {
                return Err(ApiError::MethodNotAllowed(entity.path().to_string()));
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(ApiError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(ApiError::Unauthorized),
            _ => {}
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = match serde_json::from_str::<dto::ApiErrorBody>(&body) {
                Ok(parsed) if !parsed.errors.is_empty() => parsed
                    .errors
                    .iter()
                    .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
                    .collect::<Vec<_>>()
                    .join("; "),
                _ => body.chars().take(200).collect(),
            };
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}
