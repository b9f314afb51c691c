//! Finding extraction from raw model payloads.
//!
//! Payload shape is caller-defined; the detector only needs
//! (issue_type, description, confidence) tuples. Extraction is tolerant
//! by design: a missing or unparseable payload yields zero findings from
//! that model, never an error.

use super::issue::ModelFinding;
use serde_json::Value;

/// Confidence assumed when a finding omits one
const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Extract findings from one model's raw payload text.
///
/// # Supported Shapes
///
/// 1. A JSON array of finding objects
/// 2. A JSON object with an `issues` (or `findings`) array
/// 3. Either of the above embedded in surrounding prose
///
/// Finding objects may use `issue_type`, `type`, or `category` for the
/// grouping key and `description` or `detail` for the text. Anything that
/// doesn't parse contributes nothing.
///
/// # Examples
///
/// ```
/// use conclave_domain::consensus::extract_findings;
///
/// let findings = extract_findings(
///     r#"[{"issue_type": "pacing", "description": "slow middle", "confidence": 0.9}]"#,
/// );
/// assert_eq!(findings.len(), 1);
/// assert_eq!(findings[0].issue_type, "pacing");
///
/// assert!(extract_findings("no structure here").is_empty());
/// ```
pub fn extract_findings(payload: &str) -> Vec<ModelFinding> {
    if let Ok(value) = serde_json::from_str::<Value>(payload) {
        return findings_from_value(&value);
    }

    // The payload may wrap JSON in prose; try the outermost bracketed span
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let Some(start) = payload.find(open)
            && let Some(end) = payload[start..].rfind(close)
        {
            let span = &payload[start..start + end + 1];
            if let Ok(value) = serde_json::from_str::<Value>(span) {
                let findings = findings_from_value(&value);
                if !findings.is_empty() {
                    return findings;
                }
            }
        }
    }

    Vec::new()
}

fn findings_from_value(value: &Value) -> Vec<ModelFinding> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("issues").or_else(|| map.get("findings")) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items.iter().filter_map(finding_from_item).collect()
}

fn finding_from_item(item: &Value) -> Option<ModelFinding> {
    let obj = item.as_object()?;
    let issue_type = obj
        .get("issue_type")
        .or_else(|| obj.get("type"))
        .or_else(|| obj.get("category"))?
        .as_str()?;
    let description = obj
        .get("description")
        .or_else(|| obj.get("detail"))
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let confidence = obj
        .get("confidence")
        .and_then(|v| v.as_f64())
        .unwrap_or(DEFAULT_CONFIDENCE);

    Some(ModelFinding::new(issue_type, description, confidence))
}
