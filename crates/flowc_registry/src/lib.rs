//! # flowc-registry
//!
//! The function registry (`spec.md` §4.2): a thread-safe map from names to
//! [`FunctionSignature`]s, indexed by simple name, qualified name, and
//! namespace. Standard-library, user-module, and external (RPC) module
//! signatures are all registered through this single mechanism — the
//! compiler never distinguishes their origin.
//!
//! # Concurrency
//!
//! The registry is read during every compilation and mutated between
//! compilations (`spec.md` §5). Following the teacher workspace's own
//! choice of a read-write lock over a shared map for cross-thread state
//! (see `logicaffeine_system`'s `Persistent<T>`), all state lives behind a
//! single [`parking_lot::RwLock`]; writers always hold it for the whole
//! mutation, so concurrent `lookup` calls never observe a torn state.

use flowc_types::SemanticType;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An externally registered function's signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    /// The simple (unqualified) name, e.g. `"map"`.
    pub name: String,
    /// Ordered parameter `(name, type)` pairs.
    pub params: Vec<(String, SemanticType)>,
    pub returns: SemanticType,
    /// The implementing module's name, used by the DAG builder to locate
    /// its runtime implementation.
    pub module_name: String,
    /// The namespace this signature was registered under, if any.
    pub namespace: Option<String>,
}

impl FunctionSignature {
    pub fn new(
        name: impl Into<String>,
        params: Vec<(String, SemanticType)>,
        returns: SemanticType,
        module_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            returns,
            module_name: module_name.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// `"namespace.name"` when namespaced, otherwise just `"name"`.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    /// Qualified name (or bare simple name for unnamespaced signatures) → signature.
    by_qualified: HashMap<String, FunctionSignature>,
    /// Simple name → every signature sharing that simple name, across namespaces.
    by_simple: HashMap<String, Vec<String>>,
}

/// Thread-safe registry of function signatures.
pub struct FunctionRegistry {
    state: RwLock<RegistryState>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Registers a signature, overwriting any previous signature with the
    /// same qualified name.
    pub fn register(&self, sig: FunctionSignature) {
        log::trace!("registering function '{}'", sig.qualified_name());
        let qualified = sig.qualified_name();
        let simple = sig.name.clone();
        let mut state = self.state.write();
        state.by_qualified.insert(qualified.clone(), sig);
        let group = state.by_simple.entry(simple).or_default();
        if !group.contains(&qualified) {
            group.push(qualified);
        }
    }

    pub fn register_all(&self, sigs: impl IntoIterator<Item = FunctionSignature>) {
        for sig in sigs {
            self.register(sig);
        }
    }

    /// Removes the signature with the given qualified name. No-op if unknown.
    pub fn deregister(&self, qualified_name: &str) {
        log::trace!("deregistering function '{}'", qualified_name);
        let mut state = self.state.write();
        let Some(removed) = state.by_qualified.remove(qualified_name) else {
            return;
        };
        if let Some(group) = state.by_simple.get_mut(&removed.name) {
            group.retain(|q| q != qualified_name);
            if group.is_empty() {
                state.by_simple.remove(&removed.name);
            }
        }
    }

    /// Unqualified lookup: resolves a bare name registered without a namespace.
    pub fn lookup(&self, name: &str) -> Option<FunctionSignature> {
        self.state.read().by_qualified.get(name).cloned()
    }

    /// Looks up by fully qualified name (`"namespace.name"` or bare name).
    pub fn lookup_qualified(&self, qualified_name: &str) -> Option<FunctionSignature> {
        self.state.read().by_qualified.get(qualified_name).cloned()
    }

    /// Returns every signature sharing the given simple name, across all namespaces.
    pub fn lookup_simple(&self, name: &str) -> Vec<FunctionSignature> {
        let state = self.state.read();
        state
            .by_simple
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|q| state.by_qualified.get(q).cloned())
            .collect()
    }

    /// All registered signatures, in unspecified order.
    pub fn all(&self) -> Vec<FunctionSignature> {
        self.state.read().by_qualified.values().cloned().collect()
    }

    /// Every distinct namespace with at least one registered signature.
    pub fn namespaces(&self) -> Vec<String> {
        let state = self.state.read();
        let mut namespaces: Vec<String> = state
            .by_qualified
            .values()
            .filter_map(|sig| sig.namespace.clone())
            .collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowc_types::SemanticType;
    use std::sync::Arc;
    use std::thread;

    fn sig(name: &str) -> FunctionSignature {
        FunctionSignature::new(name, vec![("x".into(), SemanticType::SInt)], SemanticType::SInt, "TestModule")
    }

    #[test]
    fn register_then_lookup() {
        let reg = FunctionRegistry::new();
        reg.register(sig("add"));
        assert!(reg.lookup("add").is_some());
    }

    #[test]
    fn deregister_unknown_is_noop() {
        let reg = FunctionRegistry::new();
        reg.deregister("nonexistent");
        assert!(reg.all().is_empty());
    }

    #[test]
    fn deregister_empties_namespace() {
        let reg = FunctionRegistry::new();
        reg.register(sig("add").with_namespace("math"));
        assert_eq!(reg.namespaces(), vec!["math".to_string()]);
        reg.deregister("math.add");
        assert!(reg.namespaces().is_empty());
    }

    #[test]
    fn lookup_simple_spans_namespaces() {
        let reg = FunctionRegistry::new();
        reg.register(sig("round").with_namespace("math"));
        reg.register(sig("round").with_namespace("currency"));
        let all = reg.lookup_simple("round");
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn concurrent_registration_loses_nothing() {
        let reg = Arc::new(FunctionRegistry::new());
        let mut handles = Vec::new();
        for t in 0..8 {
            let reg = Arc::clone(&reg);
            handles.push(thread::spawn(move || {
                for i in 0..25 {
                    reg.register(sig(&format!("fn_{}_{}", t, i)));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(reg.all().len(), 200);
    }
}
