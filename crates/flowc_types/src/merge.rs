//! The `+` merge operator over types (`spec.md` §4.1 `mergeTypes`).

use crate::types::SemanticType;
use flowc_base::Span;
use std::fmt;

/// Error produced when two types cannot be merged with `+`.
#[derive(Debug, Clone)]
pub struct IncompatibleMergeError {
    pub left: SemanticType,
    pub right: SemanticType,
    pub span: Span,
}

impl fmt::Display for IncompatibleMergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot merge {} with {} at {}..{}",
            self.left, self.right, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for IncompatibleMergeError {}

/// Right-biased merge of two types, per `spec.md` §4.1:
///
/// - `(record, record)` → right-biased field union
/// - `(Candidates(record), Candidates(record))` → `Candidates(union)`
/// - `(Candidates(e), record)` / `(record, Candidates(e))` → recurse inside `Candidates`
/// - otherwise → `IncompatibleMergeError`
pub fn merge_types(l: &SemanticType, r: &SemanticType, span: Span) -> Result<SemanticType, IncompatibleMergeError> {
    match (l, r) {
        (SemanticType::SRecord(_), SemanticType::SRecord(_)) => Ok(merge_records(l, r)),
        (SemanticType::SCandidates(le), SemanticType::SCandidates(re)) if le.is_record() && re.is_record() => {
            Ok(SemanticType::candidates(merge_records(le, re)))
        }
        (SemanticType::SCandidates(le), SemanticType::SRecord(_)) if le.is_record() => {
            Ok(SemanticType::candidates(merge_records(le, r)))
        }
        (SemanticType::SRecord(_), SemanticType::SCandidates(re)) if re.is_record() => {
            Ok(SemanticType::candidates(merge_records(l, re)))
        }
        _ => Err(IncompatibleMergeError {
            left: l.clone(),
            right: r.clone(),
            span,
        }),
    }
}

fn merge_records(l: &SemanticType, r: &SemanticType) -> SemanticType {
    let l_fields = l.as_record_fields().unwrap_or(&[]);
    let r_fields = r.as_record_fields().unwrap_or(&[]);
    let mut fields: Vec<(String, SemanticType)> = l_fields.to_vec();
    for (name, ty) in r_fields {
        if let Some(existing) = fields.iter_mut().find(|(n, _)| n == name) {
            existing.1 = ty.clone();
        } else {
            fields.push((name.clone(), ty.clone()));
        }
    }
    SemanticType::record(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_base::Span;

    fn span() -> Span {
        Span::new(0, 0)
    }

    #[test]
    fn merge_is_right_biased() {
        let l = SemanticType::record(vec![("a".into(), SemanticType::SInt), ("b".into(), SemanticType::SString)]);
        let r = SemanticType::record(vec![("b".into(), SemanticType::SInt)]);
        let merged = merge_types(&l, &r, span()).unwrap();
        assert_eq!(
            merged,
            SemanticType::record(vec![("a".into(), SemanticType::SInt), ("b".into(), SemanticType::SInt)])
        );
    }

    #[test]
    fn merge_incompatible_types_errors() {
        let err = merge_types(&SemanticType::SInt, &SemanticType::SString, span());
        assert!(err.is_err());
    }

    #[test]
    fn merge_candidates_of_records_recurses() {
        let l = SemanticType::candidates(SemanticType::record(vec![("a".into(), SemanticType::SInt)]));
        let r = SemanticType::candidates(SemanticType::record(vec![("b".into(), SemanticType::SString)]));
        let merged = merge_types(&l, &r, span()).unwrap();
        let expected = SemanticType::candidates(SemanticType::record(vec![
            ("a".into(), SemanticType::SInt),
            ("b".into(), SemanticType::SString),
        ]));
        assert_eq!(merged, expected);
    }
}
