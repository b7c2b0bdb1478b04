//! # flowc-compile
//!
//! The compiler facade (`spec.md` §2, §6): orchestrates
//!
//! ```text
//! source ─▶ parse ─▶ check ─▶ ir-build ─▶ optimize ─▶ dag-build ─▶ CompilationOutput
//! ```
//!
//! wrapping the whole chain in an optional compilation cache. This is the
//! only crate in the workspace collaborators outside it need to depend on —
//! `flowc-base`/`-types`/`-registry`/`-parser`/`-check`/`-ir`/`-dag`/
//! `-suggest`/`-cache` are implementation-sharing internal dependencies, the
//! same relationship `logicaffeine-compile` has to `logicaffeine-base`/
//! `-language`/`-kernel`.
//!
//! ## Entry point
//!
//! ```
//! use flowc_compile::{Compiler, FunctionSignature};
//! use flowc_types::SemanticType;
//!
//! let compiler = Compiler::builder()
//!     .with_function(FunctionSignature::new(
//!         "add",
//!         vec![("a".to_string(), SemanticType::SInt), ("b".to_string(), SemanticType::SInt)],
//!         SemanticType::SInt,
//!         "Add",
//!     ))
//!     .build();
//!
//! let output = compiler.compile("a = 2\nb = 3\nc = add(a, b)\nout c", "example").unwrap();
//! assert!(output.pipeline.dag.output_bindings.contains_key("c"));
//! ```
//!
//! ## Modules
//!
//! - [`compile`]: the `Compiler`/`CompilerBuilder` facade itself
//! - [`error`]: the unified [`CompileError`] taxonomy (`spec.md` §7)
//! - [`warning`]: [`CompileWarning`]s collected alongside a successful output
//! - [`image`]: [`CompilationOutput`]/[`PipelineImage`], what `compile` returns
//! - [`hashing`]: the three content hashes carried on a `PipelineImage`
//! - `convert`: phase-error → `CompileError` lifting (internal; see `compile`)

pub mod compile;
mod convert;
pub mod error;
pub mod hashing;
pub mod image;
pub mod warning;

pub use compile::{Compiler, CompilerBuilder};
pub use error::{CodeSpan, CompileError, ErrorCategory};
pub use image::{CompilationOutput, PipelineImage};
pub use warning::{CompileWarning, WarningKind};

// Re-exported so collaborators configuring a `Compiler` don't need a direct
// dependency on every phase crate just to name a `FunctionSignature`, an
// `OptimizerConfig` preset, or a registered-module descriptor.
pub use flowc_cache::{CacheConfig, CacheStats};
pub use flowc_dag::{RegisteredModules, UninitializedModule};
pub use flowc_ir::{IRPipeline, OptimizerConfig};
pub use flowc_registry::{FunctionRegistry, FunctionSignature};
