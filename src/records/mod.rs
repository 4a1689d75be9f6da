//! Remote records service integration.
//!
//! # Architecture
//!
//! Same split as every external API we talk to:
//! - **Domain types** (`domain.rs`) - entities, filters and the error taxonomy
//! - **DTOs** (`dto.rs`) - exact wire shapes
//! - **Adapter** (`adapter.rs`) - DTO -> display-name conversion
//! - **Client** (`client.rs`) - reqwest-based HTTP client
//! - **Traits** (`traits.rs`) - the [`RecordsApi`] seam, plus mocks for tests
//!
//! The rest of the crate only ever sees [`RecordsApi`], [`NamedRecord`] and
//! plain `serde_json::Value` records.

pub mod domain;
pub mod dto;
mod adapter;
mod client;
pub mod traits;

pub use client::AutotaskClient;
pub use domain::{ApiError, Entity, SearchFilter};
pub use traits::RecordsApi;

/// An id together with its human-readable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRecord {
    pub id: i64,
    pub name: String,
}

impl NamedRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl From<(i64, String)> for NamedRecord {
    fn from((id, name): (i64, String)) -> Self {
        Self { id, name }
    }
}
