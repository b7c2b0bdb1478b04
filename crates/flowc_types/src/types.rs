//! The semantic type algebra (`spec.md` §3).
//!
//! Replaces ad-hoc string-based type tracking with a proper algebraic data
//! type, the same role `LogosType` plays for the teacher compiler's codegen
//! pass, generalized here with structural records, unions, and functions.

use std::fmt;

/// A semantic type: the compiler's internal type language.
///
/// `SCandidates` is kept as a distinct variant purely so the pipeline
/// language's `Candidates<T>` keyword round-trips through pretty-printing;
/// every structural operation (subtyping, LUB/GLB, merge) treats it
/// identically to `SList` via [`SemanticType::desugared`].
#[derive(Debug, Clone)]
pub enum SemanticType {
    SString,
    SInt,
    SFloat,
    SBoolean,
    /// Bottom type: subtype of everything.
    SNothing,
    /// An ordered (declaration-order) record of named fields.
    SRecord(Vec<(String, SemanticType)>),
    SList(Box<SemanticType>),
    SMap(Box<SemanticType>, Box<SemanticType>),
    SOptional(Box<SemanticType>),
    /// A union of alternatives. Order is not semantically significant;
    /// equality and subtyping treat it as a set.
    SUnion(Vec<SemanticType>),
    SFunction(Vec<SemanticType>, Box<SemanticType>),
    /// Source-level alias for `SList`; see the type-level docs above.
    SCandidates(Box<SemanticType>),
}

impl SemanticType {
    pub fn list(elem: SemanticType) -> Self {
        SemanticType::SList(Box::new(elem))
    }

    pub fn optional(inner: SemanticType) -> Self {
        SemanticType::SOptional(Box::new(inner))
    }

    pub fn candidates(elem: SemanticType) -> Self {
        SemanticType::SCandidates(Box::new(elem))
    }

    pub fn record(fields: Vec<(String, SemanticType)>) -> Self {
        SemanticType::SRecord(fields)
    }

    pub fn function(params: Vec<SemanticType>, returns: SemanticType) -> Self {
        SemanticType::SFunction(params, Box::new(returns))
    }

    /// Collapses the `SCandidates` source alias to its underlying `SList`,
    /// one level at a time. All structural algorithms call this before
    /// matching so `Candidates<T>` and `List<T>` are interchangeable.
    pub fn desugared(&self) -> &SemanticType {
        match self {
            SemanticType::SCandidates(inner) => inner.desugared(),
            other => other,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.desugared(), SemanticType::SRecord(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self.desugared(),
            SemanticType::SString | SemanticType::SInt | SemanticType::SFloat | SemanticType::SBoolean
        )
    }

    pub fn as_record_fields(&self) -> Option<&[(String, SemanticType)]> {
        match self.desugared() {
            SemanticType::SRecord(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up a field's type by name in a record (or `Candidates<Record>`,
    /// recursed into per §4.4 `Projection`/`FieldAccess` rules).
    pub fn field_type(&self, name: &str) -> Option<&SemanticType> {
        self.as_record_fields()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// Recursively flattens nested unions and collapses `SCandidates`,
    /// producing the canonical form used for equality and hashing.
    pub fn normalize(&self) -> SemanticType {
        match self.desugared() {
            SemanticType::SString => SemanticType::SString,
            SemanticType::SInt => SemanticType::SInt,
            SemanticType::SFloat => SemanticType::SFloat,
            SemanticType::SBoolean => SemanticType::SBoolean,
            SemanticType::SNothing => SemanticType::SNothing,
            SemanticType::SRecord(fields) => SemanticType::SRecord(
                fields.iter().map(|(n, t)| (n.clone(), t.normalize())).collect(),
            ),
            SemanticType::SList(elem) => SemanticType::list(elem.normalize()),
            SemanticType::SMap(k, v) => SemanticType::SMap(Box::new(k.normalize()), Box::new(v.normalize())),
            SemanticType::SOptional(inner) => SemanticType::optional(inner.normalize()),
            SemanticType::SUnion(members) => {
                let mut flat = Vec::new();
                flatten_union(members, &mut flat);
                dedup_by_struct_eq(&mut flat);
                if flat.len() == 1 {
                    flat.into_iter().next().unwrap()
                } else {
                    SemanticType::SUnion(flat)
                }
            }
            SemanticType::SFunction(params, ret) => SemanticType::function(
                params.iter().map(|p| p.normalize()).collect(),
                ret.normalize(),
            ),
            SemanticType::SCandidates(_) => unreachable!("desugared() strips SCandidates"),
        }
    }

    /// Depth-first structural equality after normalization (invariant vi).
    fn struct_eq(&self, other: &SemanticType) -> bool {
        use SemanticType::*;
        match (self, other) {
            (SString, SString) | (SInt, SInt) | (SFloat, SFloat) | (SBoolean, SBoolean) | (SNothing, SNothing) => true,
            (SRecord(a), SRecord(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((an, at), (bn, bt))| an == bn && at.struct_eq(bt))
            }
            (SList(a), SList(b)) => a.struct_eq(b),
            (SMap(ak, av), SMap(bk, bv)) => ak.struct_eq(bk) && av.struct_eq(bv),
            (SOptional(a), SOptional(b)) => a.struct_eq(b),
            (SUnion(a), SUnion(b)) => {
                a.len() == b.len()
                    && a.iter().all(|x| b.iter().any(|y| x.struct_eq(y)))
                    && b.iter().all(|y| a.iter().any(|x| x.struct_eq(y)))
            }
            (SFunction(ap, ar), SFunction(bp, br)) => {
                ap.len() == bp.len() && ap.iter().zip(bp.iter()).all(|(x, y)| x.struct_eq(y)) && ar.struct_eq(br)
            }
            _ => false,
        }
    }
}

fn flatten_union(members: &[SemanticType], out: &mut Vec<SemanticType>) {
    for m in members {
        match m.desugared() {
            SemanticType::SUnion(inner) => flatten_union(inner, out),
            other => out.push(other.normalize()),
        }
    }
}

fn dedup_by_struct_eq(items: &mut Vec<SemanticType>) {
    let mut i = 0;
    while i < items.len() {
        let mut j = i + 1;
        while j < items.len() {
            if items[i].struct_eq(&items[j]) {
                items.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
}

impl PartialEq for SemanticType {
    fn eq(&self, other: &Self) -> bool {
        self.normalize().struct_eq(&other.normalize())
    }
}

impl Eq for SemanticType {}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::SString => write!(f, "String"),
            SemanticType::SInt => write!(f, "Int"),
            SemanticType::SFloat => write!(f, "Float"),
            SemanticType::SBoolean => write!(f, "Boolean"),
            SemanticType::SNothing => write!(f, "Nothing"),
            SemanticType::SRecord(fields) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, ty)?;
                }
                write!(f, "}}")
            }
            SemanticType::SList(elem) => write!(f, "List<{}>", elem),
            SemanticType::SCandidates(elem) => write!(f, "Candidates<{}>", elem),
            SemanticType::SMap(k, v) => write!(f, "Map<{}, {}>", k, v),
            SemanticType::SOptional(inner) => write!(f, "Optional<{}>", inner),
            SemanticType::SUnion(members) => {
                let parts: Vec<String> = members.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", parts.join(" | "))
            }
            SemanticType::SFunction(params, ret) => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}", ret)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_normalizes_to_list() {
        let c = SemanticType::candidates(SemanticType::SInt);
        assert_eq!(c.normalize(), SemanticType::list(SemanticType::SInt));
    }

    #[test]
    fn nested_unions_flatten() {
        let a = SemanticType::SUnion(vec![
            SemanticType::SInt,
            SemanticType::SUnion(vec![SemanticType::SString, SemanticType::SInt]),
        ]);
        let b = SemanticType::SUnion(vec![SemanticType::SInt, SemanticType::SString]);
        assert_eq!(a, b);
    }

    #[test]
    fn union_equality_is_order_independent() {
        let a = SemanticType::SUnion(vec![SemanticType::SInt, SemanticType::SString]);
        let b = SemanticType::SUnion(vec![SemanticType::SString, SemanticType::SInt]);
        assert_eq!(a, b);
    }

    #[test]
    fn record_field_lookup() {
        let r = SemanticType::record(vec![
            ("id".into(), SemanticType::SInt),
            ("name".into(), SemanticType::SString),
        ]);
        assert_eq!(r.field_type("name"), Some(&SemanticType::SString));
        assert_eq!(r.field_type("missing"), None);
    }

    #[test]
    fn display_renders_records_and_functions() {
        let r = SemanticType::record(vec![("id".into(), SemanticType::SInt)]);
        assert_eq!(r.to_string(), "{id: Int}");
        let f = SemanticType::function(vec![SemanticType::SInt], SemanticType::SBoolean);
        assert_eq!(f.to_string(), "(Int) -> Boolean");
    }
}
