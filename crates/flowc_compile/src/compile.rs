//! The facade (`spec.md` §2, §6): `parse -> check -> ir-build -> optimize ->
//! dag-build`, optionally wrapped in the compilation cache. This is the one
//! entry point collaborators outside this workspace use.

use crate::error::CompileError;
use crate::hashing::{registry_hash, source_hash};
use crate::image::{CompilationOutput, PipelineImage};
use crate::{convert, warning};
use flowc_cache::{CacheConfig, CacheKey, CompilationCache};
use flowc_check::check_pipeline;
use flowc_dag::{build_dag, RegisteredModules, UninitializedModule};
use flowc_ir::{IRPipeline, OptimizerConfig};
use flowc_registry::{FunctionRegistry, FunctionSignature};

/// Builder for a [`Compiler`] (`spec.md` §6): registers function signatures
/// and registered-module descriptors, picks an optimizer preset, and
/// optionally turns on the compilation cache.
pub struct CompilerBuilder {
    registry: FunctionRegistry,
    modules: RegisteredModules,
    optimizer: OptimizerConfig,
    cache_config: Option<CacheConfig>,
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self {
            registry: FunctionRegistry::new(),
            modules: RegisteredModules::new(),
            optimizer: OptimizerConfig::default_preset(),
            cache_config: None,
        }
    }

    /// Registers a single function signature (`spec.md` §6 `withFunction`).
    pub fn with_function(self, sig: FunctionSignature) -> Self {
        self.registry.register(sig);
        self
    }

    /// Registers many function signatures at once (`spec.md` §6 `withFunctions`).
    pub fn with_functions(self, sigs: impl IntoIterator<Item = FunctionSignature>) -> Self {
        self.registry.register_all(sigs);
        self
    }

    /// Supplies a registered-module descriptor the DAG builder needs to wire
    /// a `ModuleCall` (`spec.md` §6 "registered-module map"). Named
    /// separately from `with_function` because a function signature and its
    /// module's consume/produce shape are registered through independent
    /// external mechanisms in the source system.
    pub fn with_module(mut self, name: impl Into<String>, module: UninitializedModule) -> Self {
        self.modules.insert(name.into(), module);
        self
    }

    pub fn with_modules(mut self, modules: impl IntoIterator<Item = (String, UninitializedModule)>) -> Self {
        self.modules.extend(modules);
        self
    }

    pub fn with_optimizer(mut self, config: OptimizerConfig) -> Self {
        self.optimizer = config;
        self
    }

    /// Turns on caching with the default [`CacheConfig`] (`spec.md` §6
    /// `withCaching()`; an explicit config is `with_caching_config`).
    pub fn with_caching(mut self) -> Self {
        self.cache_config = Some(CacheConfig::default());
        self
    }

    pub fn with_caching_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = Some(config);
        self
    }

    /// `spec.md` §6 `withoutCaching`.
    pub fn without_caching(mut self) -> Self {
        self.cache_config = None;
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            registry: self.registry,
            modules: self.modules,
            optimizer: self.optimizer,
            cache: self.cache_config.map(|c| CompilationCache::new(c)),
        }
    }
}

/// `spec.md` §6's `Compiler`: orchestrates `parse -> check -> ir-build ->
/// optimize -> dag-build`, short-circuiting with the accumulated error list
/// from whichever phase failed first.
pub struct Compiler {
    registry: FunctionRegistry,
    modules: RegisteredModules,
    optimizer: OptimizerConfig,
    cache: Option<CompilationCache<CompilationOutput>>,
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    /// An empty compiler with no registered functions, no caching — the
    /// "empty" configuration in `spec.md` §2's facade summary.
    pub fn empty() -> Self {
        CompilerBuilder::new().build()
    }

    pub fn function_registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// `spec.md` §6 `compile`. On a cache hit, returns the stored output
    /// without re-running any phase.
    pub fn compile(&self, source: &str, dag_name: &str) -> Result<CompilationOutput, Vec<CompileError>> {
        let Some(cache) = &self.cache else {
            return self.compile_uncached(source, dag_name);
        };

        let key = CacheKey::new(dag_name, source_hash(source), registry_hash(&self.registry));
        if let Some(hit) = cache.get(&key) {
            log::debug!("cache hit for dag '{}'", dag_name);
            return Ok(hit);
        }

        log::debug!("cache miss for dag '{}', compiling", dag_name);
        let output = self.compile_uncached(source, dag_name)?;
        cache.put(key, output.clone());
        Ok(output)
    }

    /// `spec.md` §6 `compileToIR`: runs the pipeline only as far as the
    /// (optimized) IR graph, for collaborators that need to inspect it
    /// directly rather than the compiled DAG.
    pub fn compile_to_ir(&self, source: &str, _dag_name: &str) -> Result<IRPipeline, Vec<CompileError>> {
        let pipeline = flowc_parser::parse(source).map_err(|errors| convert::parser_errors(errors, source))?;
        let (typed, errors) = check_pipeline(&pipeline, &self.registry);
        if !errors.is_empty() {
            return Err(convert::check_errors(errors, source, &pipeline, &self.registry));
        }
        let ir = flowc_ir::build(&typed).map_err(|e| vec![convert::ir_error(e)])?;
        let (optimized, _stats) = flowc_ir::optimize(ir, &self.optimizer);
        Ok(optimized)
    }

    fn compile_uncached(&self, source: &str, dag_name: &str) -> Result<CompilationOutput, Vec<CompileError>> {
        log::debug!("compiling dag '{}' ({} bytes)", dag_name, source.len());

        let pipeline = flowc_parser::parse(source).map_err(|errors| convert::parser_errors(errors, source))?;

        let (typed, errors) = check_pipeline(&pipeline, &self.registry);
        if !errors.is_empty() {
            return Err(convert::check_errors(errors, source, &pipeline, &self.registry));
        }

        let ir = flowc_ir::build(&typed).map_err(|e| vec![convert::ir_error(e)])?;
        let warnings = warning::collect(&pipeline, &ir, source);

        let (optimized, stats) = flowc_ir::optimize(ir, &self.optimizer);
        log::debug!(
            "optimizer: {} -> {} nodes over {} iteration(s) ({:.1}% eliminated)",
            stats.nodes_before,
            stats.nodes_after,
            stats.iterations,
            stats.elimination_percentage()
        );

        let dag_result = build_dag(&optimized, dag_name, &self.modules).map_err(|e| vec![convert::dag_error(e)])?;
        let image = PipelineImage::build(dag_result.dag, source);
        log::info!(
            "compiled dag '{}': {} data node(s), {} module node(s), {} warning(s)",
            dag_name,
            image.dag.data_nodes.len(),
            image.dag.module_nodes.len(),
            warnings.len()
        );

        Ok(CompilationOutput { pipeline: image, warnings, synthetic_modules: dag_result.synthetic_modules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_types::SemanticType;
    use std::collections::HashMap;

    fn add_registry() -> Compiler {
        Compiler::builder()
            .with_function(FunctionSignature::new(
                "add",
                vec![("a".to_string(), SemanticType::SInt), ("b".to_string(), SemanticType::SInt)],
                SemanticType::SInt,
                "Add",
            ))
            .build()
    }

    fn test_module_compiler() -> Compiler {
        let mut modules = HashMap::new();
        modules.insert(
            "TestModule".to_string(),
            UninitializedModule {
                consumes: vec![("x".to_string(), SemanticType::SInt)],
                produces: SemanticType::SInt,
                output_field: "value".to_string(),
            },
        );
        Compiler::builder()
            .with_function(FunctionSignature::new("TestModule", vec![("x".to_string(), SemanticType::SInt)], SemanticType::SInt, "TestModule"))
            .with_modules(modules)
            .build()
    }

    #[test]
    fn scenario_a_happy_path() {
        let compiler = test_module_compiler();
        let source = "in x: Int\nresult = TestModule(x) with retry: 3, timeout: 30s, cache: 5min\nout result";
        let output = compiler.compile(source, "test").expect("compiles");
        assert_eq!(output.pipeline.dag.module_nodes.len(), 1);
        assert!(output.pipeline.dag.output_bindings.contains_key("result"));
        let (_, options) = output.pipeline.dag.module_options.iter().next().expect("module has options");
        assert_eq!(options.retries, Some(3));
        assert_eq!(options.timeout_ms, Some(30_000));
        assert_eq!(options.cache_ttl_ms, Some(300_000));
    }

    #[test]
    fn scenario_b_constant_folding() {
        let compiler = add_registry();
        let source = "a = 2\nb = 3\nc = add(a, b)\nout c";
        let output = compiler.compile(source, "fold").expect("compiles");
        assert_eq!(output.pipeline.dag.module_nodes.len(), 0, "add(2, 3) should have folded to a literal");
    }

    #[test]
    fn scenario_c_undefined_variable_suggestion() {
        let compiler = Compiler::empty();
        let source = "in customer: String\nout custmer";
        let errors = compiler.compile(source, "typo").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].suggestions.iter().any(|s| s.contains("customer")));
    }

    #[test]
    fn scenario_f_cache_hit_increments_stats() {
        let compiler = Compiler::builder().with_caching().build();
        let source = "a = 1\nout a";
        let first = compiler.compile(source, "cached").expect("compiles");
        let second = compiler.compile(source, "cached").expect("compiles");
        assert_eq!(first.pipeline.source_hash, second.pipeline.source_hash);
        let stats = compiler.cache.as_ref().unwrap().stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn errors_are_never_cached() {
        let compiler = Compiler::builder().with_caching().build();
        let bad = "out missing";
        assert!(compiler.compile(bad, "bad").is_err());
        assert!(compiler.compile(bad, "bad").is_err());
        let stats = compiler.cache.as_ref().unwrap().stats();
        assert_eq!(stats.hits, 0);
    }
}
