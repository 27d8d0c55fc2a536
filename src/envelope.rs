//! Backend response envelopes
//!
//! List endpoints answer `{"code": 200, "data": {"list": [...], "total": n}}`
//! and detail endpoints `{"code": 200, "data": <any>}`. Unlike the mapping
//! core, envelope decoding can fail: a response without a usable payload
//! is reported to the caller.

use crate::detail::DetailRecord;
use crate::error::{MapperError, Result};
use crate::types::FieldMapping;
use crate::value::{self, JsonValue};
use serde_json::Value;
use tracing::debug;

const SUCCESS_CODE: i64 = 200;

/// One page of raw list records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPage {
    pub items: Vec<Value>,
    pub total: u64,
}

impl ListPage {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    pub fn from_value(mut envelope: Value) -> Result<Self> {
        check_code(&envelope)?;

        let data = match envelope.get_mut("data") {
            None => return Err(reject("data missing")),
            Some(Value::Object(data)) => data,
            Some(_) => return Ok(ListPage::default()),
        };

        let items = match data.remove("list") {
            Some(Value::Array(items)) if items.iter().all(Value::is_object) => items,
            _ => return Err(reject("data.list is not an array of objects")),
        };

        let total = data
            .get("total")
            .and_then(Value::as_u64)
            .unwrap_or(items.len() as u64);

        Ok(ListPage { items, total })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Unwrap a detail envelope into a record read through `mapping`.
pub fn parse_detail(bytes: &[u8], mapping: FieldMapping) -> Result<DetailRecord> {
    let envelope: Value = serde_json::from_slice(bytes)?;
    detail_from_value(envelope, mapping)
}

pub fn detail_from_value(mut envelope: Value, mapping: FieldMapping) -> Result<DetailRecord> {
    check_code(&envelope)?;
    match envelope.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => Err(reject("data empty")),
        Some(data) => Ok(DetailRecord::new(JsonValue::from(data), mapping)),
    }
}

fn check_code(envelope: &Value) -> Result<()> {
    match envelope.get("code") {
        Some(code) if code.as_i64() == Some(SUCCESS_CODE) => Ok(()),
        Some(code) => {
            debug!(code = %code, "rejected envelope status");
            Err(MapperError::Status(value::render(code)))
        }
        None => Err(MapperError::Status("missing".to_string())),
    }
}

fn reject(reason: &'static str) -> MapperError {
    debug!(reason, "rejected response envelope");
    MapperError::Envelope(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_page() {
        let page = ListPage::from_value(json!({
            "code": 200,
            "data": {"list": [{"id": 1}, {"id": 2}], "total": 40}
        }))
        .unwrap();

        assert_eq!(page.items, vec![json!({"id": 1}), json!({"id": 2})]);
        assert_eq!(page.total, 40);
    }

    #[test]
    fn test_total_defaults_to_item_count() {
        let page = ListPage::parse(br#"{"code": 200, "data": {"list": [{"id": 1}]}}"#).unwrap();
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_non_object_data_is_an_empty_page() {
        for data in [json!([]), json!(null), json!("none")] {
            let page = ListPage::from_value(json!({"code": 200, "data": data})).unwrap();
            assert!(page.is_empty());
            assert_eq!(page.total, 0);
        }
    }

    #[test]
    fn test_envelope_failures() {
        assert!(matches!(
            ListPage::from_value(json!({"code": 500, "data": {"list": []}})),
            Err(MapperError::Status(code)) if code == "500"
        ));
        assert!(matches!(
            ListPage::from_value(json!({"data": {"list": []}})),
            Err(MapperError::Status(_))
        ));
        assert!(matches!(
            ListPage::from_value(json!({"code": 200})),
            Err(MapperError::Envelope(_))
        ));
        assert!(matches!(
            ListPage::from_value(json!({"code": 200, "data": {"list": "nope"}})),
            Err(MapperError::Envelope(_))
        ));
        assert!(matches!(
            ListPage::parse(b"not json"),
            Err(MapperError::Parse(_))
        ));
    }

    #[test]
    fn test_detail_envelope() {
        let detail = detail_from_value(
            json!({"code": 200, "data": {"title": "T"}}),
            FieldMapping::new(),
        )
        .unwrap();
        assert_eq!(detail.title(), "T");

        assert!(matches!(
            parse_detail(br#"{"code": 200, "data": null}"#, FieldMapping::new()),
            Err(MapperError::Envelope(_))
        ));
    }
}
