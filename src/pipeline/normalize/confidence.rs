use serde_json::{Map, Value};

use super::label::LEGACY_VIRUS_ALIAS;
use crate::models::{ConfidenceMap, DiagnosticLabel};
use crate::pipeline::classifier::ClassifierResponse;

/// Fields that may carry per-class probabilities, in priority order.
pub const CONFIDENCE_FIELDS: &[&str] = &["confidence_per_class", "probs"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfidence {
    pub per_class: ConfidenceMap,
    pub top: f64,
}

pub fn resolve_confidence(response: &ClassifierResponse) -> ResolvedConfidence {
    let empty = Map::new();
    let table = class_table(response).unwrap_or(&empty);

    let mut per_class = ConfidenceMap::default();
    for label in DiagnosticLabel::ALL {
        per_class.set(label, coerce_probability(class_value(table, label)));
    }

    let top = response
        .get("top_confidence")
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or_else(|| per_class.max());

    ResolvedConfidence { per_class, top }
}

/// First candidate field that holds an object.
fn class_table(response: &ClassifierResponse) -> Option<&Map<String, Value>> {
    CONFIDENCE_FIELDS
        .iter()
        .find_map(|field| response.get(field).and_then(Value::as_object))
}

fn class_value(table: &Map<String, Value>, label: DiagnosticLabel) -> Option<&Value> {
    let canonical = table.get(label.as_str()).filter(|v| !v.is_null());
    match label {
        DiagnosticLabel::Virus => canonical.or_else(|| table.get(LEGACY_VIRUS_ALIAS)),
        _ => canonical,
    }
}

/// Numbers and numeric strings are accepted; anything else reads as zero.
fn coerce_probability(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(payload: serde_json::Value) -> ResolvedConfidence {
        resolve_confidence(&ClassifierResponse::from_value(payload).unwrap())
    }

    #[test]
    fn reads_confidence_per_class() {
        let resolved = resolve(json!({
            "top_confidence": 0.93,
            "confidence_per_class": {"NORMAL": 0.93, "BACTERIAL": 0.04, "VIRUS": 0.03}
        }));
        assert_eq!(resolved.per_class.normal, 0.93);
        assert_eq!(resolved.per_class.bacterial, 0.04);
        assert_eq!(resolved.per_class.virus, 0.03);
        assert_eq!(resolved.top, 0.93);
    }

    #[test]
    fn falls_back_to_probs_and_computes_top() {
        let resolved = resolve(json!({
            "probs": {"NORMAL": 0.1, "BACTERIAL": 0.85, "VIRUS": 0.05}
        }));
        assert_eq!(resolved.per_class.bacterial, 0.85);
        assert_eq!(resolved.top, 0.85);
    }

    #[test]
    fn confidence_per_class_wins_over_probs() {
        let resolved = resolve(json!({
            "confidence_per_class": {"NORMAL": 0.7},
            "probs": {"NORMAL": 0.2}
        }));
        assert_eq!(resolved.per_class.normal, 0.7);
    }

    #[test]
    fn non_object_candidate_is_skipped() {
        let resolved = resolve(json!({
            "confidence_per_class": [0.7, 0.2, 0.1],
            "probs": {"BACTERIAL": 0.6}
        }));
        assert_eq!(resolved.per_class.bacterial, 0.6);
    }

    #[test]
    fn viral_alias_fills_virus_slot() {
        let resolved = resolve(json!({
            "confidence_per_class": {"NORMAL": 0.2, "BACTERIAL": 0.1, "VIRAL": 0.7}
        }));
        assert_eq!(resolved.per_class.virus, 0.7);
        assert_eq!(resolved.top, 0.7);
    }

    #[test]
    fn canonical_virus_key_takes_precedence() {
        let resolved = resolve(json!({
            "probs": {"VIRUS": 0.4, "VIRAL": 0.9}
        }));
        assert_eq!(resolved.per_class.virus, 0.4);

        let null_canonical = resolve(json!({
            "probs": {"VIRUS": null, "VIRAL": 0.9}
        }));
        assert_eq!(null_canonical.per_class.virus, 0.9);
    }

    #[test]
    fn missing_or_invalid_entries_become_zero() {
        let resolved = resolve(json!({
            "probs": {"NORMAL": "abc", "BACTERIAL": true}
        }));
        assert_eq!(resolved.per_class, ConfidenceMap::default());
        assert_eq!(resolved.top, 0.0);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let resolved = resolve(json!({"probs": {"NORMAL": " 0.25 "}}));
        assert_eq!(resolved.per_class.normal, 0.25);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let resolved = resolve(json!({
            "top_confidence": 1.7,
            "probs": {"NORMAL": -0.2, "BACTERIAL": 3.0}
        }));
        assert_eq!(resolved.per_class.normal, 0.0);
        assert_eq!(resolved.per_class.bacterial, 1.0);
        assert_eq!(resolved.top, 1.0);
    }

    #[test]
    fn non_numeric_top_confidence_uses_max() {
        let resolved = resolve(json!({
            "top_confidence": "0.99",
            "probs": {"NORMAL": 0.3, "BACTERIAL": 0.2, "VIRUS": 0.5}
        }));
        assert_eq!(resolved.top, 0.5);
    }

    #[test]
    fn no_confidence_data_resolves_to_zero() {
        let resolved = resolve(json!({"label": "NORMAL"}));
        assert_eq!(resolved.per_class, ConfidenceMap::default());
        assert_eq!(resolved.top, 0.0);
    }
}
