use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform response wrapper returned by every tool.
///
/// `success == false` implies `error` is present and `data` is absent;
/// `success == true` implies `error` is absent. The constructors below are
/// the only way the rest of the workspace builds one, so the invariant holds
/// everywhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ToolResponse {
    /// Successful response carrying a payload and an affected/returned count.
    #[must_use]
    pub fn ok(data: Value, count: u64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            count: Some(count),
            message: None,
        }
    }

    /// Successful response with a supplementary status message.
    #[must_use]
    pub fn ok_with_message(data: Value, count: u64, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data, count)
        }
    }

    /// Failed response with a human-readable cause.
    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            count: None,
            message: None,
        }
    }

    /// Failed response with a supplementary status message.
    #[must_use]
    pub fn fail_with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::fail(error)
        }
    }
}
