use atlas_model::ToolResponse;
use rmcp::model::{CallToolResult, Content};

const ENCODE_FAILURE_JSON: &str = r#"{"success":false,"error":"failed to encode tool response"}"#;

/// Renders an operation envelope as a tool result.
///
/// The envelope is returned on the success side of the protocol even when it
/// reports a failure; a JSON encoding fault is downgraded to a plain-text
/// failure envelope so no fault escapes to the transport.
pub(crate) fn envelope(response: ToolResponse) -> CallToolResult {
    match Content::json(response) {
        Ok(content) => CallToolResult::success(vec![content]),
        Err(err) => {
            let fallback = ToolResponse::fail(format!(
                "failed to encode tool response: {}",
                err.message
            ));
            let text = serde_json::to_string(&fallback)
                .unwrap_or_else(|_| ENCODE_FAILURE_JSON.to_string());
            CallToolResult::success(vec![Content::text(text)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_envelope_still_renders_as_a_successful_call() {
        let result = envelope(ToolResponse::fail("bad filter"));
        assert_ne!(result.is_error, Some(true));
    }
}
