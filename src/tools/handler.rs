//! Tool execution against the records API.
//!
//! [`ToolHandler::execute`] produces the `{message, data, timestamp}`
//! envelope; [`ToolHandler::call_tool`] wraps it (or the error envelope) as
//! text content for callers.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error};

use super::catalog::{self, DEFAULT_PAGE_SIZE, ToolKind, ToolSpec};
use crate::error::{Error, Result, ResultExt};
use crate::records::{Entity, RecordsApi, SearchFilter};

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// What a tool call returns to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    /// Pretty-printed JSON as the single text block.
    pub fn json(value: &Value, is_error: bool) -> Self {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self {
            content: vec![ContentBlock { kind: "text", text }],
            is_error,
        }
    }

    /// Text of the first content block.
    pub fn text(&self) -> &str {
        self.content.first().map(|block| block.text.as_str()).unwrap_or("")
    }
}

/// RFC 3339 with millisecond precision, UTC.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `{error, tool, arguments, timestamp}` for a failed call.
pub fn error_envelope(tool: &str, args: &Value, err: &Error) -> Value {
    json!({
        "error": err.to_string(),
        "tool": tool,
        "arguments": args,
        "timestamp": timestamp(),
    })
}

/// Integer argument, or a descriptive error.
fn int_arg(args: &Value, name: &str) -> Result<i64> {
    args.get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::invalid_arguments(format!("'{}' must be an integer", name)))
}

fn object_args(args: &Value) -> Result<&Value> {
    if args.is_object() {
        Ok(args)
    } else {
        Err(Error::invalid_arguments("arguments must be a JSON object"))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Runs catalog tools against a [`RecordsApi`].
#[derive(Clone)]
pub struct ToolHandler {
    api: Arc<dyn RecordsApi>,
}

impl ToolHandler {
    pub fn new(api: Arc<dyn RecordsApi>) -> Self {
        Self { api }
    }

    pub fn list_tools(&self) -> &'static [ToolSpec] {
        catalog::all()
    }

    /// Run a tool and return its success envelope.
    pub async fn execute(&self, name: &str, args: &Value) -> Result<Value> {
        let spec = catalog::find(name).ok_or_else(|| Error::UnknownTool(name.to_string()))?;
        debug!("Calling tool: {}", name);

        let (message, data) = match spec.kind {
            ToolKind::TestConnection => {
                let connected = self
                    .api
                    .query(Entity::Companies, &SearchFilter::with_page_size(1))
                    .await
                    .is_ok();
                let message = if connected {
                    "Successfully connected to the records API".to_string()
                } else {
                    "Connection failed: Unable to connect to the records API".to_string()
                };
                (message, json!({ "success": connected }))
            }
            ToolKind::Search(entity) => {
                let mut filter = SearchFilter::from_args(args);
                filter.page_size.get_or_insert(DEFAULT_PAGE_SIZE);
                let records = self.api.query(entity, &filter).await?;
                (format!("Found {} {}", records.len(), spec.plural), Value::Array(records))
            }
            ToolKind::Get(entity) => {
                let id = int_arg(args, spec.id_arg.unwrap_or("id"))?;
                let record = self
                    .api
                    .get(entity, id)
                    .await
                    .with_context(format!("fetching {} {}", spec.noun, id))?
                    .ok_or_else(|| Error::not_found(format!("{}/{}", entity.path(), id)))?;
                (format!("{} details retrieved successfully", capitalize(spec.noun)), record)
            }
            ToolKind::Create(entity) => {
                let id = self.api.create(entity, object_args(args)?).await?;
                (format!("Successfully created {} with ID: {}", spec.noun, id), json!(id))
            }
            ToolKind::Update(entity) => {
                let id = int_arg(object_args(args)?, spec.id_arg.unwrap_or("id"))?;
                self.api.update(entity, args).await?;
                (format!("Successfully updated {} ID: {}", spec.noun, id), json!(id))
            }
        };

        debug!("Successfully executed tool: {}", name);
        Ok(json!({
            "message": message,
            "data": data,
            "timestamp": timestamp(),
        }))
    }

    /// Run a tool, folding failures into an error result.
    pub async fn call_tool(&self, name: &str, args: &Value) -> ToolResult {
        match self.execute(name, args).await {
            Ok(envelope) => ToolResult::json(&envelope, false),
            Err(e) => self.failure(name, args, &e),
        }
    }

    pub(crate) fn failure(&self, name: &str, args: &Value, err: &Error) -> ToolResult {
        error!("Tool execution failed for {}: {}", name, err);
        ToolResult::json(&error_envelope(name, args, err), true)
    }
}
