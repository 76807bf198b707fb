use std::collections::HashMap;

use super::{Diagnostic, Function, Value};

/// Flat name-to-value store shared by the whole run.
///
/// There is no scope chain. Function calls get local-looking names through
/// [`Environment::enter_call`] and [`Environment::leave_call`], which save
/// what a call would clobber and put it back afterwards.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

/// Bookkeeping captured on call entry and consumed on call exit.
#[derive(Debug)]
#[must_use = "a call frame must be passed to `leave_call`"]
pub struct CallFrame {
    function: String,
    params: Vec<String>,
    /// Outer bindings shadowed by a parameter or a `var` in the callee.
    to_restore: Vec<(String, Value)>,
    /// Names declared by the callee that did not exist before the call.
    to_delete: Vec<String>,
}

impl CallFrame {
    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn shadowed(&self) -> impl Iterator<Item = &str> {
        self.to_restore.iter().map(|(name, _)| name.as_str())
    }

    pub fn locals(&self) -> impl Iterator<Item = &str> {
        self.to_delete.iter().map(String::as_str)
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<&Value, Diagnostic> {
        self.bindings
            .get(name)
            .ok_or_else(|| Diagnostic::UndefinedVariable {
                name: name.to_string(),
            })
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn delete(&mut self, name: &str) -> Option<Value> {
        self.bindings.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Prepares the store for a call to `function` with already-evaluated `args`.
    ///
    /// Existing bindings for the callee's `var` names and parameters are
    /// saved; `var` names that do not exist yet are marked for deletion.
    /// Parameters are then bound positionally. Surplus arguments are dropped
    /// and surplus parameters stay unbound.
    pub fn enter_call(&mut self, function: &Function, args: Vec<Value>) -> CallFrame {
        let mut to_restore: Vec<(String, Value)> = Vec::new();
        let mut to_delete = Vec::new();

        for name in function.body.declared_names() {
            match self.bindings.get(name) {
                Some(value) => to_restore.push((name.to_string(), value.clone())),
                None => to_delete.push(name.to_string()),
            }
        }

        for param in &function.params {
            if to_restore.iter().any(|(name, _)| name == param) {
                continue;
            }
            if let Some(value) = self.bindings.get(param) {
                to_restore.push((param.clone(), value.clone()));
            }
        }

        for (param, value) in function.params.iter().zip(args) {
            self.bindings.insert(param.clone(), value);
        }

        tracing::debug!(
            function = %function.name,
            shadowed = to_restore.len(),
            locals = to_delete.len(),
            "entered call"
        );

        CallFrame {
            function: function.name.clone(),
            params: function.params.clone(),
            to_restore,
            to_delete,
        }
    }

    /// Undoes [`Environment::enter_call`]: parameters and call-local names are
    /// removed first, then shadowed outer bindings are put back.
    pub fn leave_call(&mut self, frame: CallFrame) {
        tracing::debug!(
            function = frame.function(),
            restored = frame.to_restore.len(),
            "leaving call"
        );
        for param in &frame.params {
            self.bindings.remove(param);
        }
        for name in &frame.to_delete {
            self.bindings.remove(name);
        }
        for (name, value) in frame.to_restore {
            self.bindings.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Literal, Node, Program};

    fn num(value: f64) -> Value {
        Value::Number(value)
    }

    fn function(params: &[&str], declared: &[&str]) -> Function {
        Function {
            name: "f".to_string(),
            params: params.iter().map(|param| param.to_string()).collect(),
            body: Program::new(
                declared
                    .iter()
                    .map(|name| Node::Declare {
                        name: name.to_string(),
                        init: Some(Box::new(Node::Literal(Literal::Number(0.0)))),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn get_reports_undefined_variable() {
        let environment = Environment::new();
        assert_eq!(
            environment.get("x"),
            Err(Diagnostic::UndefinedVariable {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn set_overwrites_and_delete_removes() {
        let mut environment = Environment::new();
        environment.set("x", num(1.0));
        environment.set("x", num(2.0));
        assert_eq!(environment.get("x"), Ok(&num(2.0)));
        assert_eq!(environment.delete("x"), Some(num(2.0)));
        assert!(!environment.contains("x"));
        assert_eq!(environment.delete("x"), None);
    }

    #[test]
    fn parameters_shadow_and_restore_globals() {
        let mut environment = Environment::new();
        environment.set("x", num(10.0));

        let frame = environment.enter_call(&function(&["x"], &[]), vec![num(5.0)]);
        assert_eq!(frame.function(), "f");
        assert_eq!(environment.get("x"), Ok(&num(5.0)));
        assert_eq!(frame.shadowed().collect::<Vec<_>>(), vec!["x"]);

        environment.set("x", num(6.0));
        environment.leave_call(frame);
        assert_eq!(environment.get("x"), Ok(&num(10.0)));
    }

    #[test]
    fn call_locals_leave_no_trace() {
        let mut environment = Environment::new();
        let frame = environment.enter_call(&function(&[], &["y"]), vec![]);
        assert_eq!(frame.locals().collect::<Vec<_>>(), vec!["y"]);

        environment.set("y", num(1.0));
        environment.leave_call(frame);
        assert!(!environment.contains("y"));
    }

    #[test]
    fn declared_names_that_exist_are_restored() {
        let mut environment = Environment::new();
        environment.set("a", num(1.0));

        let frame = environment.enter_call(&function(&[], &["a"]), vec![]);
        environment.set("a", num(2.0));
        environment.leave_call(frame);
        assert_eq!(environment.get("a"), Ok(&num(1.0)));
    }

    #[test]
    fn arity_mismatches_bind_positionally() {
        let mut environment = Environment::new();
        let frame = environment.enter_call(&function(&["a", "b"], &[]), vec![num(1.0)]);
        assert_eq!(environment.get("a"), Ok(&num(1.0)));
        assert!(!environment.contains("b"));
        environment.leave_call(frame);

        let frame = environment.enter_call(&function(&["a"], &[]), vec![num(1.0), num(2.0)]);
        assert_eq!(environment.get("a"), Ok(&num(1.0)));
        environment.leave_call(frame);
        assert!(!environment.contains("a"));
    }

    #[test]
    fn nested_frames_unwind_in_order() {
        let mut environment = Environment::new();
        let f = function(&["n"], &[]);

        let outer = environment.enter_call(&f, vec![num(3.0)]);
        let inner = environment.enter_call(&f, vec![num(2.0)]);
        assert_eq!(environment.get("n"), Ok(&num(2.0)));

        environment.leave_call(inner);
        assert_eq!(environment.get("n"), Ok(&num(3.0)));
        environment.leave_call(outer);
        assert!(!environment.contains("n"));
    }
}
