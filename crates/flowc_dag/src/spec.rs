//! The DAG spec data model (`spec.md` §3): data nodes, module nodes, edges,
//! and output bindings.

use crate::transform::InlineTransform;
use flowc_ir::IRModuleCallOptions;
use flowc_types::SemanticType;
use std::collections::{HashMap, HashSet};
use std::fmt;

macro_rules! uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            pub fn new() -> Self {
                $name(uuid::Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(DataId);
uuid_id!(ModuleId);

#[derive(Debug, Clone)]
pub struct ModuleMetadata {
    pub id: ModuleId,
    /// The module's DAG-local name, `"{dag_name}.{module_name}"`.
    pub name: String,
}

/// `CType` is the runtime's type representation, derived 1:1 from
/// `SemanticType` (`spec.md` Glossary); the compiler core has no separate
/// runtime type language to project into, so it's reused directly.
pub type CType = SemanticType;

#[derive(Debug, Clone)]
pub struct ModuleNodeSpec {
    pub metadata: ModuleMetadata,
    pub consumes: HashMap<String, CType>,
    pub produces: HashMap<String, CType>,
}

/// A data node. `nicknames` lets one data node be consumed by several
/// module nodes under different local parameter names (Glossary: Nickname).
#[derive(Debug, Clone)]
pub struct DataNodeSpec {
    pub name: String,
    pub nicknames: HashMap<ModuleId, String>,
    pub ty: CType,
    pub inline_transform: Option<InlineTransform>,
    pub transform_inputs: HashMap<String, DataId>,
}

#[derive(Debug, Clone)]
pub struct DagSpec {
    pub name: String,
    pub module_nodes: HashMap<ModuleId, ModuleNodeSpec>,
    pub data_nodes: HashMap<DataId, DataNodeSpec>,
    pub in_edges: HashSet<(DataId, ModuleId)>,
    pub out_edges: HashSet<(ModuleId, DataId)>,
    pub outputs: Vec<String>,
    pub output_bindings: HashMap<String, DataId>,
    /// Non-empty per-call options, keyed by the module they were attached
    /// to (`spec.md` §4.7 "Options table").
    pub module_options: HashMap<ModuleId, IRModuleCallOptions>,
}

/// An externally supplied module description (`spec.md` §6 "registered-module
/// map"): everything the DAG builder needs to wire a `ModuleCall` IR node
/// without knowing how the module actually runs.
#[derive(Debug, Clone)]
pub struct UninitializedModule {
    pub consumes: Vec<(String, CType)>,
    pub produces: CType,
    /// The field name under which `produces`'s single value is exposed,
    /// e.g. `"result"` — distinct from the module's own name.
    pub output_field: String,
}

pub type RegisteredModules = HashMap<String, UninitializedModule>;
