use crate::ast::{Literal, Node, Program};

use super::environment::Environment;
use super::operators;
use super::output::OutputSink;
use super::registry::{Function, FunctionRegistry};
use super::{Diagnostic, DiagnosticsTarget, InterpreterOptions, RuntimeError, Value};

/// Control-flow marker for statement execution.
pub(super) enum ExecResult {
    Continue,
    Return(Value),
}

/// Execution context for one run: the variable store, the function
/// namespace, and the two output streams.
pub(super) struct InterpreterRuntime<'a> {
    pub(super) options: &'a InterpreterOptions,
    pub(super) environment: Environment,
    pub(super) functions: FunctionRegistry,
    pub(super) output: OutputSink,
    pub(super) diagnostics: OutputSink,
}

impl<'a> InterpreterRuntime<'a> {
    pub(super) fn new(
        options: &'a InterpreterOptions,
        output: OutputSink,
        diagnostics: OutputSink,
    ) -> Self {
        Self {
            options,
            environment: Environment::new(),
            functions: FunctionRegistry::new(),
            output,
            diagnostics,
        }
    }

    pub(super) fn exec_block(&mut self, body: &Program) -> Result<ExecResult, RuntimeError> {
        // Execute statements in order until one returns, then bubble that up.
        for statement in &body.statements {
            match self.exec_statement(statement)? {
                ExecResult::Continue => {}
                ExecResult::Return(value) => return Ok(ExecResult::Return(value)),
            }
        }
        Ok(ExecResult::Continue)
    }

    fn exec_statement(&mut self, statement: &Node) -> Result<ExecResult, RuntimeError> {
        tracing::trace!(kind = statement.kind_name(), "exec");
        match statement {
            Node::Declare { name, init } => {
                let value = match init {
                    Some(init) => self.eval_expression(init)?,
                    None => Value::Null,
                };
                self.environment.set(name.as_str(), value);
                Ok(ExecResult::Continue)
            }
            Node::Assign { target, value } => {
                let value = self.eval_expression(value)?;
                self.environment.set(target.as_str(), value);
                Ok(ExecResult::Continue)
            }
            Node::IncDec { op, target } => {
                match self.environment.get(target).cloned() {
                    Ok(current) => {
                        let updated = operators::inc_dec(*op, &current)?;
                        self.environment.set(target.as_str(), updated);
                    }
                    Err(diagnostic) => self.report(diagnostic),
                }
                Ok(ExecResult::Continue)
            }
            Node::Print(value) => {
                let value = self.eval_expression(value)?;
                self.output.write_line(&value.to_output());
                Ok(ExecResult::Continue)
            }
            Node::While { condition, body } => {
                loop {
                    let condition = self.eval_expression(condition)?;
                    if !condition.is_truthy() {
                        break;
                    }
                    if let ExecResult::Return(value) = self.exec_block(body)? {
                        return Ok(ExecResult::Return(value));
                    }
                }
                Ok(ExecResult::Continue)
            }
            Node::FunctionDef { name, params, body } => {
                tracing::debug!(function = %name, params = params.len(), "registered function");
                self.functions.define(Function {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                });
                Ok(ExecResult::Continue)
            }
            Node::Return(value) => {
                let value = match value {
                    Some(value) => self.eval_expression(value)?,
                    None => Value::Null,
                };
                Ok(ExecResult::Return(value))
            }
            Node::NoOp => Ok(ExecResult::Continue),
            Node::Literal(_)
            | Node::Identifier(_)
            | Node::BinaryOp { .. }
            | Node::Compare { .. }
            | Node::FunctionCall { .. } => {
                self.eval_expression(statement)?;
                Ok(ExecResult::Continue)
            }
        }
    }

    fn eval_expression(&mut self, expr: &Node) -> Result<Value, RuntimeError> {
        match expr {
            Node::Literal(Literal::Number(value)) => Ok(Value::Number(*value)),
            Node::Literal(Literal::String(raw)) => Ok(Value::from_string_literal(raw)),
            Node::Literal(Literal::Bool(value)) => Ok(Value::Bool(*value)),
            Node::Identifier(name) => match self.environment.get(name).cloned() {
                Ok(value) => Ok(value),
                Err(diagnostic) => {
                    self.report(diagnostic);
                    Ok(Value::Null)
                }
            },
            Node::BinaryOp { op, left, right } => {
                let left = match left {
                    Some(left) => self.eval_expression(left)?,
                    None => Value::Number(0.0),
                };
                let right = self.eval_expression(right)?;
                operators::binary(*op, &left, &right)
            }
            Node::Compare { op, left, right } => {
                let left = self.eval_expression(left)?;
                let right = self.eval_expression(right)?;
                operators::compare(*op, &left, &right).map(Value::Bool)
            }
            Node::FunctionCall { name, args } => self.eval_call(name, args),
            Node::IncDec { .. }
            | Node::Declare { .. }
            | Node::Assign { .. }
            | Node::Print(_)
            | Node::While { .. }
            | Node::FunctionDef { .. }
            | Node::Return(_)
            | Node::NoOp => Err(RuntimeError::MalformedTree {
                expected: "expression",
                found: expr.kind_name(),
            }),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, args), fields(argc = args.len()))]
    fn eval_call(&mut self, name: &str, args: &[Node]) -> Result<Value, RuntimeError> {
        let Some(function) = self.functions.get(name) else {
            self.report(Diagnostic::UndefinedFunction {
                name: name.to_string(),
            });
            return Ok(Value::Null);
        };

        let mut evaluated_args = Vec::with_capacity(args.len());
        for arg in args {
            evaluated_args.push(self.eval_expression(arg)?);
        }
        if self.options.strict_arity && evaluated_args.len() != function.params.len() {
            self.report(Diagnostic::ArityMismatch {
                name: name.to_string(),
                expected: function.params.len(),
                found: evaluated_args.len(),
            });
        }

        let frame = self.environment.enter_call(&function, evaluated_args);
        let result = self.exec_block(&function.body);
        self.environment.leave_call(frame);

        match result? {
            ExecResult::Continue => Ok(Value::Null),
            ExecResult::Return(value) => Ok(value),
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(%diagnostic, "reported diagnostic");
        let line = diagnostic.to_string();
        match self.options.diagnostics {
            DiagnosticsTarget::Output => self.output.write_line(&line),
            DiagnosticsTarget::Separate => self.diagnostics.write_line(&line),
        }
    }
}
