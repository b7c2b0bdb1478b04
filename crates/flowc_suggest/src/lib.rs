//! "Did you mean" suggestion engine (`spec.md` §4.9): Levenshtein-based
//! near-match lookup plus per-error-kind contextual hints. Consumed by
//! `flowc-compile`'s error taxonomy to attach suggestions to compile errors.

mod hints;
mod levenshtein;

pub use hints::{ambiguous_function, invalid_field, type_mismatch, undefined_function, undefined_namespace, undefined_type, undefined_variable};
pub use levenshtein::{find_similar, find_similar_default, levenshtein_distance};
