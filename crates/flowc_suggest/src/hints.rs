//! Per-error-kind contextual suggestions (`spec.md` §4.9). Each function
//! takes the pieces of context a particular `CheckError` variant carries —
//! the crate that owns the error type attaches these to its own error,
//! keeping `flowc-check` free of a dependency on this crate.

use crate::levenshtein::find_similar_default;
use flowc_types::SemanticType;

pub fn undefined_variable(name: &str, candidates: &[String]) -> Vec<String> {
    let near = find_similar_default(name, candidates);
    if near.is_empty() {
        vec![format!("'{}' is not declared; add an `in {}: <type>` or a binding for it", name, name)]
    } else {
        near.into_iter().map(|c| format!("Did you mean '{}'?", c)).collect()
    }
}

pub fn undefined_function(name: &str, candidates: &[String], namespaces: &[String]) -> Vec<String> {
    let mut hints: Vec<String> = find_similar_default(name, candidates).into_iter().map(|c| format!("Did you mean '{}'?", c)).collect();
    let name_lower = name.to_lowercase();
    for namespace in namespaces {
        if namespace.to_lowercase().contains(&name_lower) || name_lower.contains(&namespace.to_lowercase()) {
            hints.push(format!("Try adding: use {}", namespace));
        }
    }
    hints
}

pub fn undefined_type(name: &str, builtins: &[String], defined: &[String]) -> Vec<String> {
    let mut candidates = builtins.to_vec();
    candidates.extend(defined.iter().cloned());
    find_similar_default(name, &candidates).into_iter().map(|c| format!("Did you mean '{}'?", c)).collect()
}

pub fn undefined_namespace(name: &str, namespaces: &[String]) -> Vec<String> {
    let mut hints: Vec<String> = find_similar_default(name, namespaces).into_iter().map(|c| format!("Did you mean '{}'?", c)).collect();
    if !namespaces.is_empty() {
        hints.push(format!("Available namespaces: {}", namespaces.join(", ")));
    }
    hints
}

pub fn invalid_field(field: &str, available: &[String]) -> Vec<String> {
    let mut hints: Vec<String> = find_similar_default(field, available).into_iter().map(|c| format!("Did you mean '{}'?", c)).collect();
    hints.push(format!("Available fields: {}", available.join(", ")));
    hints
}

pub fn ambiguous_function(candidates: &[String]) -> Vec<String> {
    candidates.iter().take(3).map(|c| format!("Candidate: {}", c)).collect()
}

fn is_stringlike(ty: &SemanticType) -> bool {
    matches!(ty, SemanticType::SString)
}

fn is_numeric_or_bool(ty: &SemanticType) -> bool {
    matches!(ty, SemanticType::SInt | SemanticType::SFloat | SemanticType::SBoolean)
}

/// Conversion hints for a type mismatch: to-string/to-int across
/// numeric/boolean/string pairs, and `Optional` wrapping/unwrapping.
pub fn type_mismatch(expected: &SemanticType, actual: &SemanticType) -> Vec<String> {
    let mut hints = Vec::new();

    if is_stringlike(expected) && is_numeric_or_bool(actual) {
        hints.push(format!("Convert with to_string(): {} -> {}", actual, expected));
    }
    if is_numeric_or_bool(expected) && is_stringlike(actual) {
        hints.push(format!("Convert with to_int(): {} -> {}", actual, expected));
    }

    match (expected, actual) {
        (SemanticType::SOptional(inner), other) if inner.as_ref() == other => {
            hints.push(format!("Wrap in Optional: expected {}, found bare {}", expected, other));
        }
        (other, SemanticType::SOptional(inner)) if inner.as_ref() == other => {
            hints.push(format!("Unwrap the Optional, or guard against missing values: found {}, expected {}", actual, expected));
        }
        _ => {}
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_declaration_hint_when_no_near_match() {
        let hints = undefined_variable("zzzzz", &["customer".to_string()]);
        assert_eq!(hints.len(), 1);
        assert!(hints[0].contains("not declared"));
    }

    #[test]
    fn suggests_near_match_for_undefined_variable() {
        let hints = undefined_variable("custmer", &["customer".to_string()]);
        assert_eq!(hints, vec!["Did you mean 'customer'?".to_string()]);
    }

    #[test]
    fn suggests_namespace_import_for_undefined_function() {
        let hints = undefined_function("parse_json", &[], &["json".to_string(), "csv".to_string()]);
        assert!(hints.iter().any(|h| h == "Try adding: use json"));
    }

    #[test]
    fn suggests_to_string_for_numeric_to_string_mismatch() {
        let hints = type_mismatch(&SemanticType::SString, &SemanticType::SInt);
        assert!(hints.iter().any(|h| h.contains("to_string()")));
    }

    #[test]
    fn suggests_optional_wrapping() {
        let hints = type_mismatch(&SemanticType::optional(SemanticType::SInt), &SemanticType::SInt);
        assert!(hints.iter().any(|h| h.contains("Wrap in Optional")));
    }
}
