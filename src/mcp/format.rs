// Text payloads for MCP responses.
//
// Success: the upstream JSON, pretty-printed with two-space indentation.
// Failure: a single line starting with `Error: `.

use serde::Serialize;

use crate::error::{AtlassianError, Result};

/// Prefix every failed tool call's text starts with.
pub const ERROR_PREFIX: &str = "Error: ";

/// Pretty-print a result for the protocol payload.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a failure as the text of an otherwise successful response.
pub fn render_error(err: &AtlassianError) -> String {
    format!("{ERROR_PREFIX}{err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_uses_two_space_indent() {
        let text = render_json(&json!({"id": "1", "tags": ["a"]})).unwrap();
        assert_eq!(text, "{\n  \"id\": \"1\",\n  \"tags\": [\n    \"a\"\n  ]\n}");
    }

    #[test]
    fn empty_list_renders_as_brackets() {
        let empty: Vec<serde_json::Value> = Vec::new();
        assert_eq!(render_json(&empty).unwrap(), "[]");
    }

    #[test]
    fn errors_carry_the_prefix() {
        let text = render_error(&AtlassianError::UnknownTool("nope".into()));
        assert_eq!(text, "Error: Unknown tool: nope");
    }
}
