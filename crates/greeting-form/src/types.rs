//! Wire payloads, display-text rendering, and error types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Key the greeting is read from in the server's reply.
pub const MESSAGE_KEY: &str = "message";

/// Body sent to the submit endpoint: `{"name": <value>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamePayload {
    pub name: String,
}

impl NamePayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Serialize to the exact JSON text placed on the wire.
    pub fn to_body(&self) -> FormResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parsed reply from the submit endpoint.
///
/// Only `message` is read; the value is kept untyped so a missing or
/// non-string message still renders the way a browser would show it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GreetingReply {
    pub message: Option<Value>,
}

impl GreetingReply {
    /// Parse a response body. Fails only when the body is not JSON.
    pub fn parse(body: &str) -> FormResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        let message = match value {
            Value::Object(mut map) => map.remove(MESSAGE_KEY),
            _ => None,
        };
        Ok(Self { message })
    }

    /// Text written into the display element.
    pub fn display_text(&self) -> String {
        render_display_text(self.message.as_ref())
    }
}

/// Stringify a JSON value the way assigning it to `innerText` would.
///
/// A missing value renders as `"undefined"`; `null` clears the text.
/// Nested values in arrays follow `Array.prototype.join`, where `null`
/// also becomes empty.
pub fn render_display_text(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => render_number(n),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| render_display_text(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Format like `Number.prototype.toString`: every number is an f64, so
/// integers past 2^53 round, and magnitudes outside `[1e-6, 1e21)` switch
/// to exponent form (`1e+21`, `1.5e-7`).
fn render_number(n: &serde_json::Number) -> String {
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };
    if f == 0.0 {
        return "0".to_string();
    }

    let abs = f.abs();
    if !(1e-6..1e21).contains(&abs) {
        let exp = format!("{f:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{mantissa}e+{power}")
            }
            _ => exp,
        };
    }
    // Display prints the shortest round-trip digits and drops a trailing ".0".
    f.to_string()
}

/// Errors that can occur while handling a submission.
#[derive(thiserror::Error, Debug)]
pub enum FormError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Submission task failed: {0}")]
    TaskFailed(String),
}

/// Convenience result type.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_body_is_compact_json() {
        assert_eq!(NamePayload::new("Alice").to_body().unwrap(), r#"{"name":"Alice"}"#);
        assert_eq!(NamePayload::new("").to_body().unwrap(), r#"{"name":""}"#);
    }

    #[test]
    fn test_payload_escapes_quotes() {
        let body = NamePayload::new("O\"Brien").to_body().unwrap();
        assert_eq!(body, r#"{"name":"O\"Brien"}"#);
    }

    #[test]
    fn test_reply_reads_message() {
        let reply = GreetingReply::parse(r#"{"message":"Hello, Alice!","extra":1}"#).unwrap();
        assert_eq!(reply.display_text(), "Hello, Alice!");
    }

    #[test]
    fn test_reply_missing_message_is_undefined() {
        let reply = GreetingReply::parse(r#"{"greeting":"hi"}"#).unwrap();
        assert!(reply.message.is_none());
        assert_eq!(reply.display_text(), "undefined");
    }

    #[test]
    fn test_reply_non_object_body_is_undefined() {
        assert_eq!(GreetingReply::parse("42").unwrap().display_text(), "undefined");
        assert_eq!(GreetingReply::parse(r#""hi""#).unwrap().display_text(), "undefined");
    }

    #[test]
    fn test_reply_rejects_non_json() {
        let err = GreetingReply::parse("<html>oops</html>").unwrap_err();
        assert!(matches!(err, FormError::Json(_)));
    }

    #[test]
    fn test_render_non_string_values() {
        assert_eq!(render_display_text(Some(&Value::Null)), "");
        assert_eq!(render_display_text(Some(&json!(true))), "true");
        assert_eq!(render_display_text(Some(&json!(42))), "42");
        assert_eq!(render_display_text(Some(&json!(3.0))), "3");
        assert_eq!(render_display_text(Some(&json!(1.5))), "1.5");
        assert_eq!(render_display_text(Some(&json!(["a", 1, null]))), "a,1,");
        assert_eq!(render_display_text(Some(&json!({"a": 1}))), "[object Object]");
    }

    #[test]
    fn test_null_message_clears_display() {
        let reply = GreetingReply::parse(r#"{"message":null}"#).unwrap();
        assert_eq!(reply.message, Some(Value::Null));
        assert_eq!(reply.display_text(), "");
    }

    #[test]
    fn test_render_number_extremes() {
        assert_eq!(render_display_text(Some(&json!(0))), "0");
        assert_eq!(render_display_text(Some(&json!(-0.0))), "0");
        assert_eq!(render_display_text(Some(&json!(1e21))), "1e+21");
        assert_eq!(render_display_text(Some(&json!(-2.5e22))), "-2.5e+22");
        assert_eq!(render_display_text(Some(&json!(1e-7))), "1e-7");
        assert_eq!(render_display_text(Some(&json!(0.000001))), "0.000001");
        assert_eq!(render_display_text(Some(&json!(123456789012345680000.0))), "123456789012345680000");
        assert_eq!(render_display_text(Some(&json!(9007199254740993u64))), "9007199254740992");
    }
}
