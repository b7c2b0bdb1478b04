//! Checker-local symbol tables (`spec.md` §4.4 `TypeEnvironment`).

use flowc_registry::FunctionRegistry;
use flowc_types::SemanticType;
use std::collections::{HashMap, HashSet};

pub struct TypeEnvironment<'a> {
    pub types: HashMap<String, SemanticType>,
    pub variables: HashMap<String, SemanticType>,
    pub imported_namespaces: HashSet<String>,
    pub registry: &'a FunctionRegistry,
}

impl<'a> TypeEnvironment<'a> {
    pub fn new(registry: &'a FunctionRegistry) -> Self {
        Self {
            types: HashMap::new(),
            variables: HashMap::new(),
            imported_namespaces: HashSet::new(),
            registry,
        }
    }

    pub fn define_type(&mut self, name: String, ty: SemanticType) {
        self.types.insert(name, ty);
    }

    pub fn lookup_type(&self, name: &str) -> Option<&SemanticType> {
        self.types.get(name)
    }

    pub fn bind_variable(&mut self, name: String, ty: SemanticType) {
        self.variables.insert(name, ty);
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&SemanticType> {
        self.variables.get(name)
    }

    pub fn import_namespace(&mut self, namespace: String) {
        self.imported_namespaces.insert(namespace);
    }

    /// Saves the current bindings shadowed by `bindings`, installs the new
    /// ones, and returns a token to restore the previous state with
    /// [`Self::pop_bindings`].
    pub fn push_bindings(&mut self, bindings: &[(String, SemanticType)]) -> Vec<(String, Option<SemanticType>)> {
        let mut saved = Vec::with_capacity(bindings.len());
        for (name, ty) in bindings {
            saved.push((name.clone(), self.variables.insert(name.clone(), ty.clone())));
        }
        saved
    }

    pub fn pop_bindings(&mut self, saved: Vec<(String, Option<SemanticType>)>) {
        for (name, prev) in saved {
            match prev {
                Some(ty) => {
                    self.variables.insert(name, ty);
                }
                None => {
                    self.variables.remove(&name);
                }
            }
        }
    }
}
