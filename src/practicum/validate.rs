//! Shape checks for the homework status payload.
//!
//! The API answers 200 even for some failures, so an `error` or `code` key is
//! checked before anything else.

use serde_json::Value;

use crate::error::PollError;

/// Keys the API uses to report a failure, in lookup order.
const ERROR_KEYS: [&str; 2] = ["code", "error"];

/// A structurally valid response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Raw homework records, newest first.
    pub homeworks: Vec<Value>,
    /// Server time of the answer; the next `from_date`.
    pub current_date: i64,
}

impl ApiResponse {
    /// Only the first record is reported per poll; the rest are dropped.
    pub fn latest(&self) -> Option<&Value> {
        self.homeworks.first()
    }
}

pub fn validate(raw: &Value) -> Result<ApiResponse, PollError> {
    if let Value::Object(map) = raw {
        for key in ERROR_KEYS {
            if let Some(value) = map.get(key) {
                return Err(PollError::ApiData {
                    key: key.to_string(),
                    value: render(value),
                });
            }
        }
    }

    let map = raw
        .as_object()
        .ok_or_else(|| PollError::Shape(format!("not a mapping (got {})", type_name(raw))))?;

    let homeworks = map
        .get("homeworks")
        .ok_or_else(|| PollError::Shape("missing homeworks".to_string()))?;
    let homeworks = homeworks.as_array().ok_or_else(|| {
        PollError::Shape(format!("homeworks not a list (got {})", type_name(homeworks)))
    })?;

    let current_date = map
        .get("current_date")
        .ok_or_else(|| PollError::Shape("missing current_date".to_string()))?;
    let current_date = current_date.as_i64().ok_or_else(|| {
        PollError::Shape(format!(
            "current_date not an integer timestamp (got {current_date})"
        ))
    })?;

    Ok(ApiResponse {
        homeworks: homeworks.clone(),
        current_date,
    })
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_homeworks_is_not_an_error() {
        let parsed = validate(&json!({"homeworks": [], "current_date": 1700000000})).unwrap();
        assert!(parsed.homeworks.is_empty());
        assert_eq!(parsed.current_date, 1700000000);
        assert!(parsed.latest().is_none());
    }

    #[test]
    fn error_key_wins_over_valid_shape() {
        let err = validate(&json!({
            "error": "bad_request",
            "homeworks": [],
            "current_date": 1
        }))
        .unwrap_err();
        assert_eq!(
            err,
            PollError::ApiData {
                key: "error".into(),
                value: "bad_request".into()
            }
        );
    }

    #[test]
    fn bare_error_payload_is_api_data() {
        let err = validate(&json!({"error": "bad_request"})).unwrap_err();
        assert!(matches!(err, PollError::ApiData { key, .. } if key == "error"));
    }

    #[test]
    fn code_is_checked_before_error() {
        let err = validate(&json!({
            "code": "not_authenticated",
            "error": {"error": "Wrong from_date format"}
        }))
        .unwrap_err();
        assert_eq!(
            err,
            PollError::ApiData {
                key: "code".into(),
                value: "not_authenticated".into()
            }
        );
    }

    #[test]
    fn structured_error_value_is_rendered_as_json() {
        let err = validate(&json!({"error": {"error": "Wrong from_date format"}})).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"API reported an error (error): {"error":"Wrong from_date format"}"#
        );
    }

    #[test]
    fn list_payload_is_not_a_mapping() {
        let err = validate(&json!([{"homeworks": []}])).unwrap_err();
        assert_eq!(err, PollError::Shape("not a mapping (got list)".into()));
    }

    #[test]
    fn missing_homeworks_key() {
        let err = validate(&json!({"current_date": 1})).unwrap_err();
        assert_eq!(err, PollError::Shape("missing homeworks".into()));
    }

    #[test]
    fn homeworks_must_be_a_list() {
        let err = validate(&json!({"homeworks": {"a": 1}, "current_date": 1})).unwrap_err();
        assert_eq!(err, PollError::Shape("homeworks not a list (got mapping)".into()));
    }

    #[test]
    fn current_date_is_required() {
        let err = validate(&json!({"homeworks": []})).unwrap_err();
        assert_eq!(err, PollError::Shape("missing current_date".into()));
    }

    #[test]
    fn current_date_must_be_an_integer() {
        let err = validate(&json!({"homeworks": [], "current_date": "yesterday"})).unwrap_err();
        assert!(matches!(err, PollError::Shape(msg) if msg.starts_with("current_date not an integer")));
    }

    #[test]
    fn only_first_homework_is_latest() {
        let parsed = validate(&json!({
            "homeworks": [
                {"homework_name": "hw2", "status": "approved"},
                {"homework_name": "hw1", "status": "rejected"}
            ],
            "current_date": 5
        }))
        .unwrap();
        assert_eq!(parsed.homeworks.len(), 2);
        assert_eq!(parsed.latest().unwrap()["homework_name"], "hw2");
    }
}
