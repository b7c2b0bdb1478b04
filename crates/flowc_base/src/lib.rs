//! # flowc-base
//!
//! Pure structural atoms for the flowc compiler workspace.
//!
//! This crate provides the foundational types used by every later phase:
//!
//! - [`Arena`] — bump allocation for stable AST references
//! - [`Interner`]/[`Symbol`] — string interning for O(1) equality
//! - [`Span`] — source location tracking
//! - [`SpannedError`]/[`Result`] — errors with source positions
//!
//! # Design principles
//!
//! This crate has **no knowledge of the pipeline language's grammar or
//! semantics**. It provides only generic, reusable infrastructure that
//! higher-level crates (`flowc-parser`, `flowc-check`, `flowc-ir`, ...)
//! build upon.

pub mod arena;
pub mod error;
pub mod intern;
pub mod span;

pub use arena::Arena;
pub use error::{Result, SpannedError};
pub use intern::{Interner, Symbol};
pub use span::Span;
