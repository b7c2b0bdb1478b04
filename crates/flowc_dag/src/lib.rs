//! Optimized IR → executable DAG spec (`spec.md` §4.7, §4.8).
//!
//! [`build_dag`] walks an [`flowc_ir::IRPipeline`] in topological order,
//! producing a [`DagSpec`] of data nodes and module nodes plus any synthetic
//! modules (currently just `branch`) the caller must supply an
//! implementation for.

mod builder;
mod error;
mod lambda;
mod spec;
mod transform;

pub use builder::{build_dag, DagBuildResult};
pub use error::DagError;
pub use lambda::{LambdaEvaluator, LambdaValue};
pub use spec::{CType, DagSpec, DataId, DataNodeSpec, ModuleId, ModuleMetadata, ModuleNodeSpec, RegisteredModules, UninitializedModule};
pub use transform::{HigherOrderOp, InlineTransform, MatchArm, PatternMatcher};

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_check::check_pipeline;
    use flowc_ir::{build as build_ir, optimize, OptimizerConfig};
    use flowc_parser::parse;
    use flowc_registry::{FunctionRegistry, FunctionSignature};
    use flowc_types::SemanticType;
    use std::collections::HashMap;

    fn registry_with_add() -> FunctionRegistry {
        let registry = FunctionRegistry::new();
        registry.register(FunctionSignature::new(
            "add",
            vec![("a".to_string(), SemanticType::SInt), ("b".to_string(), SemanticType::SInt)],
            SemanticType::SInt,
            "Add",
        ));
        registry
    }

    fn registered_modules() -> RegisteredModules {
        let mut modules = HashMap::new();
        modules.insert(
            "Add".to_string(),
            UninitializedModule {
                consumes: vec![("a".to_string(), SemanticType::SInt), ("b".to_string(), SemanticType::SInt)],
                produces: SemanticType::SInt,
                output_field: "result".to_string(),
            },
        );
        modules
    }

    #[test]
    fn builds_a_dag_for_a_constant_folded_pipeline() {
        let source = "a = 2\nb = 3\nc = add(a, b)\nout c";
        let pipeline = parse(source).expect("parses");
        let registry = registry_with_add();
        let (typed, errors) = check_pipeline(&pipeline, &registry);
        assert!(errors.is_empty(), "unexpected check errors: {:?}", errors);

        let ir = build_ir(&typed).expect("builds ir");
        let (optimized, _stats) = optimize(ir, &OptimizerConfig::default_preset());

        let result = build_dag(&optimized, "p", &registered_modules()).expect("builds dag");
        assert_eq!(result.dag.module_nodes.len(), 0, "folded to a literal, no module call should remain");
        assert!(result.dag.output_bindings.contains_key("c"));
    }

    #[test]
    fn rejects_a_module_call_with_no_registration() {
        let source = "in a: int\nin b: int\nc = mystery(a, b)\nout c";
        let pipeline = parse(source).expect("parses");
        let registry = FunctionRegistry::new();
        registry.register(FunctionSignature::new(
            "mystery",
            vec![("a".to_string(), SemanticType::SInt), ("b".to_string(), SemanticType::SInt)],
            SemanticType::SInt,
            "Mystery",
        ));
        let (typed, errors) = check_pipeline(&pipeline, &registry);
        assert!(errors.is_empty(), "unexpected check errors: {:?}", errors);
        let ir = build_ir(&typed).expect("builds ir");

        let result = build_dag(&ir, "p", &RegisteredModules::new());
        assert!(matches!(result, Err(DagError::UnsupportedFunction { .. })));
    }
}
