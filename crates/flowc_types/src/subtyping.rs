//! Structural subtyping, LUB/GLB, and failure explanations (`spec.md` §4.1).

use crate::types::SemanticType;

/// Returns `true` when `a` is assignable to `b`.
///
/// Rules are applied in the declaration order from the spec; the first
/// matching rule wins:
///
/// 1. reflexive identity
/// 2. `a == SNothing`
/// 3. both records: width+depth covariant
/// 4. both lists/optionals: covariant element
/// 5. both maps: invariant keys, covariant values
/// 6. both functions: contravariant params, covariant return
/// 7. `a` is a subtype of some member of `SUnion b`
/// 8. every member of `SUnion a` is a subtype of `b`
/// 9. otherwise false
pub fn is_subtype(a: &SemanticType, b: &SemanticType) -> bool {
    let a = a.desugared();
    let b = b.desugared();

    if a == b {
        return true;
    }
    if matches!(a, SemanticType::SNothing) {
        return true;
    }

    match (a, b) {
        (SemanticType::SRecord(sub_fields), SemanticType::SRecord(super_fields)) => {
            super_fields.iter().all(|(name, super_ty)| {
                sub_fields
                    .iter()
                    .find(|(n, _)| n == name)
                    .map(|(_, sub_ty)| is_subtype(sub_ty, super_ty))
                    .unwrap_or(false)
            })
        }
        (SemanticType::SList(ae), SemanticType::SList(be)) => is_subtype(ae, be),
        (SemanticType::SOptional(ae), SemanticType::SOptional(be)) => is_subtype(ae, be),
        (SemanticType::SMap(ak, av), SemanticType::SMap(bk, bv)) => ak == bk && is_subtype(av, bv),
        (SemanticType::SFunction(aparams, aret), SemanticType::SFunction(bparams, bret)) => {
            aparams.len() == bparams.len()
                && aparams.iter().zip(bparams.iter()).all(|(ap, bp)| is_subtype(bp, ap))
                && is_subtype(aret, bret)
        }
        (_, SemanticType::SUnion(members)) => members.iter().any(|m| is_subtype(a, m)),
        (SemanticType::SUnion(members), _) => members.iter().all(|m| is_subtype(m, b)),
        _ => false,
    }
}

/// Explains why `is_subtype(a, b)` returned `false`, for diagnostics.
/// Returns `None` if `a` actually is a subtype of `b`.
pub fn explain_failure(a: &SemanticType, b: &SemanticType) -> Option<String> {
    if is_subtype(a, b) {
        return None;
    }
    let a_d = a.desugared();
    let b_d = b.desugared();
    let msg = match (a_d, b_d) {
        (SemanticType::SRecord(sub_fields), SemanticType::SRecord(super_fields)) => {
            let missing: Vec<&str> = super_fields
                .iter()
                .filter(|(name, _)| !sub_fields.iter().any(|(n, _)| n == name))
                .map(|(name, _)| name.as_str())
                .collect();
            if !missing.is_empty() {
                format!("record is missing required field(s): {}", missing.join(", "))
            } else {
                let mismatched: Vec<String> = super_fields
                    .iter()
                    .filter_map(|(name, super_ty)| {
                        let sub_ty = sub_fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)?;
                        if is_subtype(sub_ty, super_ty) {
                            None
                        } else {
                            Some(format!("field '{}' has type {} but {} is required", name, sub_ty, super_ty))
                        }
                    })
                    .collect();
                mismatched.join("; ")
            }
        }
        (SemanticType::SFunction(aparams, _), SemanticType::SFunction(bparams, _)) if aparams.len() != bparams.len() => {
            format!("function arity mismatch: {} vs {} parameters", aparams.len(), bparams.len())
        }
        (_, SemanticType::SUnion(members)) => {
            let names: Vec<String> = members.iter().map(|m| m.to_string()).collect();
            format!("{} is not a member of union {{{}}}", a, names.join(" | "))
        }
        (SemanticType::SUnion(members), _) => {
            let failing: Vec<String> = members
                .iter()
                .filter(|m| !is_subtype(m, b))
                .map(|m| m.to_string())
                .collect();
            format!("union member(s) {} are not assignable to {}", failing.join(", "), b)
        }
        _ => format!("{} is not assignable to {}", a, b),
    };
    Some(msg)
}

/// Least upper bound. If one type is a subtype of the other, returns the
/// supertype; otherwise flattens both into a union.
pub fn lub(a: &SemanticType, b: &SemanticType) -> SemanticType {
    if is_subtype(a, b) {
        return b.normalize();
    }
    if is_subtype(b, a) {
        return a.normalize();
    }
    SemanticType::SUnion(vec![a.normalize(), b.normalize()]).normalize()
}

/// Greatest lower bound. `SNothing` if neither is a subtype of the other.
pub fn glb(a: &SemanticType, b: &SemanticType) -> SemanticType {
    if is_subtype(a, b) {
        return a.normalize();
    }
    if is_subtype(b, a) {
        return b.normalize();
    }
    SemanticType::SNothing
}

/// Left-fold `lub` over a non-empty list of types.
pub fn common_type(types: &[SemanticType]) -> SemanticType {
    let mut iter = types.iter();
    let first = iter
        .next()
        .cloned()
        .unwrap_or(SemanticType::SNothing);
    iter.fold(first, |acc, t| lub(&acc, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SemanticType::*;

    #[test]
    fn subtyping_is_reflexive() {
        let types = vec![
            SInt,
            SString,
            SemanticType::list(SInt),
            SemanticType::record(vec![("a".into(), SInt)]),
        ];
        for t in &types {
            assert!(is_subtype(t, t));
        }
    }

    #[test]
    fn subtyping_is_transitive_for_records() {
        let a = SemanticType::record(vec![("a".into(), SInt), ("b".into(), SString), ("c".into(), SBoolean)]);
        let b = SemanticType::record(vec![("a".into(), SInt), ("b".into(), SString)]);
        let c = SemanticType::record(vec![("a".into(), SInt)]);
        assert!(is_subtype(&a, &b));
        assert!(is_subtype(&b, &c));
        assert!(is_subtype(&a, &c));
    }

    #[test]
    fn nothing_is_bottom() {
        assert!(is_subtype(&SNothing, &SInt));
        assert!(is_subtype(&SNothing, &SemanticType::record(vec![])));
        assert!(!is_subtype(&SInt, &SNothing));
    }

    #[test]
    fn record_width_and_depth_subtyping() {
        let wide = SemanticType::record(vec![("a".into(), SInt), ("b".into(), SString)]);
        let narrow = SemanticType::record(vec![("a".into(), SInt)]);
        assert!(is_subtype(&wide, &narrow));
        assert!(!is_subtype(&narrow, &wide));
    }

    #[test]
    fn function_is_contravariant_in_params_covariant_in_return() {
        let wide_param = SemanticType::record(vec![("a".into(), SInt)]);
        let narrow_param = SemanticType::record(vec![("a".into(), SInt), ("b".into(), SString)]);
        // f: (narrow) -> narrow  is a subtype of  g: (wide) -> wide
        // because g's param (wide) is a subtype of f's param (narrow)... wait we need f accepting wide.
        let f = SemanticType::function(vec![wide_param.clone()], narrow_param.clone());
        let g = SemanticType::function(vec![narrow_param], wide_param);
        assert!(is_subtype(&f, &g));
    }

    #[test]
    fn lub_of_subtype_pair_is_supertype() {
        let wide = SemanticType::record(vec![("a".into(), SInt), ("b".into(), SString)]);
        let narrow = SemanticType::record(vec![("a".into(), SInt)]);
        assert_eq!(lub(&wide, &narrow), narrow);
    }

    #[test]
    fn lub_of_unrelated_types_is_union() {
        let u = lub(&SInt, &SString);
        assert_eq!(u, SUnion(vec![SInt, SString]));
    }

    #[test]
    fn glb_of_unrelated_types_is_nothing() {
        assert_eq!(glb(&SInt, &SString), SNothing);
    }

    #[test]
    fn common_type_folds_lub_across_list() {
        let t = common_type(&[SInt, SInt, SInt]);
        assert_eq!(t, SInt);
    }

    #[test]
    fn explain_failure_reports_missing_field() {
        let sub = SemanticType::record(vec![("a".into(), SInt)]);
        let sup = SemanticType::record(vec![("a".into(), SInt), ("b".into(), SString)]);
        let msg = explain_failure(&sub, &sup).expect("should fail");
        assert!(msg.contains("b"));
    }
}
