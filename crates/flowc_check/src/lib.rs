//! # flowc-check
//!
//! The type checker (`spec.md` §4.4): turns a parsed [`Pipeline`] into a
//! [`TypedPipeline`], resolving every name against a [`FunctionRegistry`]
//! and a local [`TypeEnvironment`]. Collects every [`CheckError`] it finds
//! rather than stopping at the first one.

pub mod check;
pub mod env;
pub mod error;
pub mod typed_ast;

pub use check::check_pipeline;
pub use env::TypeEnvironment;
pub use error::CheckError;
pub use typed_ast::*;
