use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Program;

/// A user-defined function as registered by a `function` definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub body: Program,
}

/// Function namespace for one run, separate from the variable namespace.
///
/// Entries are reference-counted so a call keeps executing the body it
/// started with even if the function is redefined mid-call.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Rc<Function>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function`, replacing any previous definition with the same name.
    pub fn define(&mut self, function: Function) -> Option<Rc<Function>> {
        self.functions
            .insert(function.name.clone(), Rc::new(function))
    }

    pub fn get(&self, name: &str) -> Option<Rc<Function>> {
        self.functions.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, params: &[&str]) -> Function {
        Function {
            name: name.to_string(),
            params: params.iter().map(|param| param.to_string()).collect(),
            body: Program::default(),
        }
    }

    #[test]
    fn redefinition_replaces_previous_entry() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.define(function("f", &["a"])).is_none());
        let held = registry.get("f").expect("registered");

        let previous = registry.define(function("f", &["a", "b"]));
        assert_eq!(previous.map(|f| f.params.len()), Some(1));
        assert_eq!(registry.get("f").map(|f| f.params.len()), Some(2));
        // A handle taken before the redefinition still sees the old body.
        assert_eq!(held.params, vec!["a".to_string()]);
    }

    #[test]
    fn unknown_names_are_absent() {
        assert!(FunctionRegistry::new().get("missing").is_none());
    }
}
