//! Recognised payload shapes and how to pull records out of them and put
//! them back.
//!
//! | Shape           | Input                               | Records live in   |
//! |-----------------|-------------------------------------|-------------------|
//! | `List`          | `[r, ...]`                          | the array         |
//! | `Items`         | `{..., items: [r, ...]}`            | `items`           |
//! | `Single`        | `{...}`                             | the object itself |
//! | `EnvelopeList`  | `{message, data: [r, ...], ...}`    | `data`            |
//! | `EnvelopeItems` | `{message, data: {items: [...]}}`   | `data.items`      |
//! | `EnvelopeSingle`| `{message, data: {...}, ...}`       | `data`            |
//!
//! Error envelopes (`{error, tool, arguments, timestamp}`), scalars, and
//! envelopes whose `data` is a scalar or null are not enrichable.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    List,
    Items,
    Single,
    EnvelopeList,
    EnvelopeItems,
    EnvelopeSingle,
}

impl PayloadShape {
    /// Whether the records sit inside a `{message, data, timestamp}` envelope.
    pub fn is_envelope(&self) -> bool {
        matches!(
            self,
            PayloadShape::EnvelopeList | PayloadShape::EnvelopeItems | PayloadShape::EnvelopeSingle
        )
    }

    /// Whether the shape holds one record rather than a list.
    pub fn is_single(&self) -> bool {
        matches!(self, PayloadShape::Single | PayloadShape::EnvelopeSingle)
    }
}

/// `{error, tool, ...}` as produced for failed operations.
pub fn is_error_envelope(payload: &Value) -> bool {
    payload
        .as_object()
        .is_some_and(|map| map.contains_key("error") && map.contains_key("tool"))
}

fn has_items_list(value: &Value) -> bool {
    value.get("items").is_some_and(Value::is_array)
}

/// Work out which shape a payload has. `None` means "leave it alone".
pub fn classify(payload: &Value) -> Option<PayloadShape> {
    if is_error_envelope(payload) {
        return None;
    }

    match payload {
        Value::Array(_) => Some(PayloadShape::List),
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(_)) => Some(PayloadShape::EnvelopeList),
            Some(data @ Value::Object(_)) if has_items_list(data) => Some(PayloadShape::EnvelopeItems),
            Some(Value::Object(_)) => Some(PayloadShape::EnvelopeSingle),
            Some(_) => None,
            None if has_items_list(payload) => Some(PayloadShape::Items),
            None => Some(PayloadShape::Single),
        },
        _ => None,
    }
}

/// The value holding the records for `shape`.
fn record_slot(payload: &mut Value, shape: PayloadShape) -> Option<&mut Value> {
    match shape {
        PayloadShape::List | PayloadShape::Single => Some(payload),
        PayloadShape::Items => payload.get_mut("items"),
        PayloadShape::EnvelopeList | PayloadShape::EnvelopeSingle => payload.get_mut("data"),
        PayloadShape::EnvelopeItems => payload.get_mut("data")?.get_mut("items"),
    }
}

/// Move the records out of `payload`, leaving a hole for [`put_records`].
pub fn take_records(payload: &mut Value, shape: PayloadShape) -> Vec<Value> {
    let Some(slot) = record_slot(payload, shape) else {
        return Vec::new();
    };

    if shape.is_single() {
        return vec![slot.take()];
    }

    match slot.take() {
        Value::Array(records) => records,
        other => {
            *slot = other;
            Vec::new()
        }
    }
}

/// Put records back where [`take_records`] found them.
///
/// Single shapes take the first record.
pub fn put_records(payload: &mut Value, shape: PayloadShape, records: Vec<Value>) {
    let Some(slot) = record_slot(payload, shape) else {
        return;
    };

    *slot = if shape.is_single() {
        records.into_iter().next().unwrap_or(Value::Null)
    } else {
        Value::Array(records)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_shapes() {
        assert_eq!(classify(&json!([{ "id": 1 }])), Some(PayloadShape::List));
        assert_eq!(classify(&json!({ "items": [] })), Some(PayloadShape::Items));
        assert_eq!(classify(&json!({ "id": 1 })), Some(PayloadShape::Single));
        assert_eq!(
            classify(&json!({ "message": "m", "data": [] })),
            Some(PayloadShape::EnvelopeList)
        );
        assert_eq!(
            classify(&json!({ "message": "m", "data": { "items": [] } })),
            Some(PayloadShape::EnvelopeItems)
        );
        assert_eq!(
            classify(&json!({ "message": "m", "data": { "id": 5 } })),
            Some(PayloadShape::EnvelopeSingle)
        );
    }

    #[test]
    fn test_classify_rejects_unenrichable() {
        assert_eq!(classify(&json!("text")), None);
        assert_eq!(classify(&json!(42)), None);
        assert_eq!(classify(&json!({ "message": "Created", "data": 9001 })), None);
        assert_eq!(classify(&json!({ "message": "m", "data": null })), None);
        assert_eq!(
            classify(&json!({
                "error": "boom",
                "tool": "search_tickets",
                "arguments": {},
                "timestamp": "2026-01-01T00:00:00Z"
            })),
            None
        );
    }

    #[test]
    fn test_data_items_must_be_a_list() {
        let payload = json!({ "message": "m", "data": { "items": "nope" } });
        assert_eq!(classify(&payload), Some(PayloadShape::EnvelopeSingle));
    }

    #[test]
    fn test_take_and_put_envelope_items() {
        let mut payload = json!({
            "message": "Found 2 tickets",
            "data": { "items": [{ "id": 1 }, { "id": 2 }], "pageDetails": { "count": 2 } },
            "timestamp": "t"
        });
        let shape = classify(&payload).unwrap();
        let mut records = take_records(&mut payload, shape);
        assert_eq!(records.len(), 2);

        records.reverse();
        put_records(&mut payload, shape, records);

        assert_eq!(payload["data"]["items"][0]["id"], 2);
        assert_eq!(payload["data"]["pageDetails"]["count"], 2);
        assert_eq!(payload["message"], "Found 2 tickets");
    }

    #[test]
    fn test_take_and_put_single() {
        let mut payload = json!({ "id": 1, "companyID": 100 });
        let records = take_records(&mut payload, PayloadShape::Single);
        assert_eq!(records, vec![json!({ "id": 1, "companyID": 100 })]);
        assert!(payload.is_null());

        put_records(&mut payload, PayloadShape::Single, records);
        assert_eq!(payload["companyID"], 100);
    }
}
