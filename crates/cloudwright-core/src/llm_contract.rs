//! Tolerant extraction of an [`ArchSpec`] from an LLM's free-form reply.
//!
//! An Architect prompt asks a model to answer with nothing but JSON, but
//! real replies wrap it in prose or a markdown code fence. [`extract_json`]
//! recovers the JSON object the same way `architect.py::_extract_json`
//! does: strip a ```` ```json ```` fence if present, then scan for the
//! first balanced `{...}` span, tracking string and escape state so braces
//! inside string values don't confuse the count.

use thiserror::Error;

use cloudwright_spec::ArchSpec;
use cloudwright_validator::post_validate;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("no JSON object found in model output")]
    NoJsonFound,
    #[error("unterminated JSON object (unbalanced braces)")]
    Unterminated,
    #[error("model output did not parse as an architecture spec: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Strips a leading ```` ```json ```` / ```` ``` ```` fence and trailing
/// ```` ``` ````, if present, leaving the interior untouched.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else { return trimmed };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\n', '\r']);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Scans `text` for the first balanced top-level `{...}` object, treating
/// characters inside JSON string literals (honoring `\"` escapes) as inert.
/// Returns the slice from the opening brace through the matching closing
/// brace, inclusive.
fn find_json_object(text: &str) -> Result<&str, ContractError> {
    let bytes = text.as_bytes();
    let start = text.find('{').ok_or(ContractError::NoJsonFound)?;

    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + 1;
                    return Ok(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Err(ContractError::Unterminated)
}

/// Extracts the JSON object embedded in a model's reply, tolerating a
/// surrounding markdown fence and leading/trailing prose.
pub fn extract_json(text: &str) -> Result<serde_json::Value, ContractError> {
    let fenced = strip_code_fence(text);
    let candidate = if fenced.trim_start().starts_with('{') { fenced } else { text };
    let object = find_json_object(candidate)?;
    Ok(serde_json::from_str(object)?)
}

/// Parses an LLM reply directly into a validated, post-validated
/// [`ArchSpec`]: extract the embedded JSON, deserialize with field
/// defaults (missing `tier`/`region`/`provider` fall back the same way a
/// hand-authored spec does), then run the safe-default hardening pass.
///
/// Structural validation ([`ArchSpec::validate`]) is the caller's
/// responsibility — this function returns whatever the model produced,
/// hardened but not necessarily structurally valid, so the caller can
/// decide how to report a bad id or dangling connection.
pub fn parse_arch_spec(text: &str) -> Result<ArchSpec, ContractError> {
    let value = extract_json(text)?;
    let spec: ArchSpec = serde_json::from_value(value)?;
    Ok(post_validate(&spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"name": "web-app", "provider": "aws", "region": "us-east-1", "components": []}"#;

    #[test]
    fn extracts_bare_json() {
        let value = extract_json(MINIMAL).unwrap();
        assert_eq!(value["name"], "web-app");
    }

    #[test]
    fn extracts_fenced_json() {
        let wrapped = format!("Here is the architecture:\n```json\n{MINIMAL}\n```\n");
        let value = extract_json(&wrapped).unwrap();
        assert_eq!(value["name"], "web-app");
    }

    #[test]
    fn extracts_json_with_surrounding_prose() {
        let wrapped = format!("Sure, here you go: {MINIMAL} Let me know if you need changes.");
        let value = extract_json(&wrapped).unwrap();
        assert_eq!(value["region"], "us-east-1");
    }

    #[test]
    fn tolerates_braces_inside_strings() {
        let text = r#"{"name": "a {weird} name", "provider": "aws", "region": "us-east-1", "components": []}"#;
        let value = extract_json(text).unwrap();
        assert_eq!(value["name"], "a {weird} name");
    }

    #[test]
    fn rejects_unterminated_json() {
        let text = r#"{"name": "web-app", "provider": "aws""#;
        assert!(matches!(extract_json(text), Err(ContractError::Unterminated)));
    }

    #[test]
    fn rejects_text_with_no_json() {
        let text = "I cannot generate an architecture for that request.";
        assert!(matches!(extract_json(text), Err(ContractError::NoJsonFound)));
    }

    #[test]
    fn parse_arch_spec_hardens_defaults() {
        let text = r#"{
            "name": "db-app",
            "provider": "aws",
            "region": "us-east-1",
            "components": [
                {"id": "db1", "service": "rds", "provider": "aws"}
            ]
        }"#;
        let spec = parse_arch_spec(text).unwrap();
        let comp = spec.component("db1").unwrap();
        assert_eq!(comp.config_bool("encryption"), Some(true));
        assert_eq!(comp.config_bool("backup"), Some(true));
    }
}
