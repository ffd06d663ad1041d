use serde_json::Value;

use crate::models::DiagnosticLabel;
use crate::pipeline::classifier::ClassifierResponse;

/// Older classifier builds name the viral class `VIRAL`.
pub const LEGACY_VIRUS_ALIAS: &str = "VIRAL";

/// Map a raw classifier label onto the closed label set.
///
/// Case and surrounding whitespace are ignored. Returns `None` for anything
/// outside the three classes and the legacy alias.
pub fn canonicalize_label(raw: &str) -> Option<DiagnosticLabel> {
    let token = raw.trim().to_uppercase();
    if token == LEGACY_VIRUS_ALIAS {
        return Some(DiagnosticLabel::Virus);
    }
    token.parse().ok()
}

/// The `label` field as text. Missing or null labels read as empty.
pub fn raw_label(response: &ClassifierResponse) -> String {
    match response.get("label") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
