//! This crate exists only to host the integration tests under `tests/`.
//!
//! Each phase crate (`flowc-parser`, `flowc-check`, `flowc-ir`, `flowc-dag`,
//! ...) carries its own unit tests at the bottom of the module they cover.
//! What lives here instead is the cross-crate material: the end-to-end
//! scenarios (`spec.md` §8 A–F) and the testable properties that span more
//! than one crate, neither of which belongs inside any single phase crate's
//! own `#[cfg(test)]` block.
//!
//! # Running
//!
//! ```text
//! cargo test -p flowc-tests
//! cargo test -p flowc-tests --test scenarios
//! cargo test -p flowc-tests --test properties
//! ```
