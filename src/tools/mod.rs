//! Tool dispatch: the catalog of operations callers can run, plain and with
//! name enrichment.
//!
//! - [`catalog`] - tool names, descriptions and what each one does
//! - [`ToolHandler`] - runs a tool against the records API
//! - [`EnhancedToolHandler`] - the same, with `_enhanced` names added

pub mod catalog;
mod enhanced;
mod handler;

pub use catalog::{ToolKind, ToolSpec};
pub use enhanced::EnhancedToolHandler;
pub use handler::{ContentBlock, ToolHandler, ToolResult};
