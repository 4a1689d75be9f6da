//! Enrichment pipeline - annotates result records with company and
//! resource names.
//!
//! 1. Classify the payload and move its records out
//! 2. Spawn one job per record for the first [`MAX_ENHANCE_ITEMS`]
//! 3. Join all jobs in input order; a failed job yields the original record
//! 4. Put the annotated head and untouched tail back into the same shape
//!
//! Nothing in here fails the caller. Unknown shapes, undecodable text and
//! broken lookups all degrade to "fewer names", never to an error or a lost
//! record.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use super::shape::{PayloadShape, classify, put_records, take_records};
use crate::mapping::{CacheDomain, NameLookup};

/// Records per payload that get name lookups; the rest pass through.
pub const MAX_ENHANCE_ITEMS: usize = 10;

/// Field carrying the company id on records.
const COMPANY_ID_FIELD: &str = "companyID";
/// Field carrying the assigned resource id on records.
const RESOURCE_ID_FIELD: &str = "assignedResourceID";
/// Key of the annotation object added to each enriched record.
pub const ENHANCED_FIELD: &str = "_enhanced";
/// Informational key added to enriched envelopes.
pub const NOTE_FIELD: &str = "_enhanced_note";

/// Why one record could not be enriched.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record is {0}, not an object")]
    NotAnObject(&'static str),

    #[error("record already carries a non-object `_enhanced` field")]
    AnnotationTaken,
}

/// Result of [`Enhancer::try_enrich`].
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    /// Nothing to do; this is the input as given
    Unchanged(Value),
    /// Head records annotated
    Annotated { payload: Value, enhanced: usize },
}

impl Enrichment {
    pub fn into_value(self) -> Value {
        match self {
            Enrichment::Unchanged(payload) | Enrichment::Annotated { payload, .. } => payload,
        }
    }
}

/// Outcome of enriching the head of a record list.
struct HeadReport {
    records: Vec<Value>,
    succeeded: usize,
    failed: usize,
}

/// Adds `_enhanced` name annotations to operation results.
#[derive(Clone)]
pub struct Enhancer {
    lookup: Arc<dyn NameLookup>,
}

impl Enhancer {
    pub fn new(lookup: Arc<dyn NameLookup>) -> Self {
        Self { lookup }
    }

    /// Enrich a decoded payload, returning it in the same shape.
    pub async fn enrich(&self, payload: Value) -> Value {
        self.try_enrich(payload).await.into_value()
    }

    /// Enrich a JSON text payload. Text that doesn't decode, or has nothing
    /// to enrich, comes back byte-for-byte.
    pub async fn enrich_text(&self, text: &str) -> String {
        let parsed: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                debug!("Result is not JSON ({}), returning unchanged", e);
                return text.to_string();
            }
        };

        match self.try_enrich(parsed).await {
            Enrichment::Unchanged(_) => text.to_string(),
            Enrichment::Annotated { payload, .. } => match serde_json::to_string_pretty(&payload) {
                Ok(encoded) => encoded,
                Err(e) => {
                    warn!("Failed to encode enriched result: {}", e);
                    text.to_string()
                }
            },
        }
    }

    /// Enrich a payload, reporting whether anything was done.
    pub async fn try_enrich(&self, mut payload: Value) -> Enrichment {
        let Some(shape) = classify(&payload) else {
            debug!("Result shape not enrichable, returning unchanged");
            return Enrichment::Unchanged(payload);
        };

        let mut records = take_records(&mut payload, shape);
        if records.is_empty() {
            debug!("No items found to enhance");
            put_records(&mut payload, shape, records);
            return Enrichment::Unchanged(payload);
        }

        if records.len() > MAX_ENHANCE_ITEMS {
            info!(
                "Limiting enhancement to first {} of {} items to prevent rate limiting",
                MAX_ENHANCE_ITEMS,
                records.len()
            );
        }
        let tail = records.split_off(records.len().min(MAX_ENHANCE_ITEMS));

        let report = self.enrich_head(records).await;
        if report.failed > 0 {
            debug!(
                "{} items had mapping failures but processing continued",
                report.failed
            );
        }

        let mut all = report.records;
        all.extend(tail);
        put_records(&mut payload, shape, all);
        annotate_envelope(&mut payload, shape, report.succeeded);

        Enrichment::Annotated {
            payload,
            enhanced: report.succeeded,
        }
    }

    /// Run one job per record and join them in input order.
    async fn enrich_head(&self, head: Vec<Value>) -> HeadReport {
        let jobs = head.iter().cloned().map(|record| {
            let lookup = Arc::clone(&self.lookup);
            tokio::spawn(enhance_record(lookup, record))
        });
        let outcomes = futures::future::join_all(jobs).await;

        let mut report = HeadReport {
            records: Vec::with_capacity(head.len()),
            succeeded: 0,
            failed: 0,
        };

        for (original, outcome) in head.into_iter().zip(outcomes) {
            match outcome {
                Ok(Ok(record)) => {
                    report.succeeded += 1;
                    report.records.push(record);
                }
                Ok(Err(e)) => {
                    debug!("Record left unenhanced: {}", e);
                    report.failed += 1;
                    report.records.push(original);
                }
                Err(e) => {
                    warn!("Enhancement job failed, keeping original record: {}", e);
                    report.failed += 1;
                    report.records.push(original);
                }
            }
        }

        report
    }
}

fn annotate_envelope(payload: &mut Value, shape: PayloadShape, enhanced: usize) {
    if !shape.is_envelope() {
        return;
    }
    if let Some(map) = payload.as_object_mut() {
        map.insert(
            NOTE_FIELD.to_string(),
            json!(format!(
                "Added company/resource name mappings to {} items",
                enhanced
            )),
        );
    }
}

/// Integer id in a record field. Integral floats count; strings don't.
fn id_field(record: &Map<String, Value>, field: &str) -> Option<i64> {
    let value = record.get(field)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Resolve one record's ids and attach `_enhanced`.
///
/// A lookup that finds nothing writes `null`; a lookup that errors leaves its
/// key out. Either way the record comes back.
///
/// An `_enhanced` object already on the record is extended; keys it already
/// has keep their values.
async fn enhance_record(lookup: Arc<dyn NameLookup>, record: Value) -> Result<Value, RecordError> {
    let mut record = match record {
        Value::Object(map) => map,
        other => return Err(RecordError::NotAnObject(kind_of(&other))),
    };
    let mut enhanced = match record.get(ENHANCED_FIELD) {
        None => Map::new(),
        Some(Value::Object(existing)) => existing.clone(),
        Some(_) => return Err(RecordError::AnnotationTaken),
    };

    let company_id = id_field(&record, COMPANY_ID_FIELD);
    let resource_id = id_field(&record, RESOURCE_ID_FIELD);

    let company = async {
        match company_id {
            Some(id) => Some((id, lookup.lookup_name(CacheDomain::Company, id).await)),
            None => None,
        }
    };
    let resource = async {
        match resource_id {
            Some(id) => Some((id, lookup.lookup_name(CacheDomain::Resource, id).await)),
            None => None,
        }
    };
    let (company, resource) = futures::join!(company, resource);

    match company {
        Some((_, Ok(name))) => {
            enhanced
                .entry("companyName")
                .or_insert_with(|| name.map_or(Value::Null, Value::String));
        }
        Some((id, Err(e))) => debug!("Failed to map company ID {}: {}", id, e),
        None => {}
    }
    match resource {
        Some((_, Ok(name))) => {
            enhanced
                .entry("assignedResourceName")
                .or_insert_with(|| name.map_or(Value::Null, Value::String));
        }
        Some((id, Err(e))) => debug!("Failed to map resource ID {}: {}", id, e),
        None => {}
    }

    record.insert(ENHANCED_FIELD.to_string(), Value::Object(enhanced));
    Ok(Value::Object(record))
}
