//! # flowc-types
//!
//! The semantic type algebra shared by the type checker, the IR builder, and
//! the DAG builder's inline transforms: [`SemanticType`], structural
//! subtyping, LUB/GLB, and the `+` merge operator.

pub mod merge;
pub mod subtyping;
pub mod types;

pub use merge::{merge_types, IncompatibleMergeError};
pub use subtyping::{common_type, explain_failure, glb, is_subtype, lub};
pub use types::SemanticType;
