use crate::ast::Program;

mod diagnostic;
mod environment;
mod error;
mod operators;
mod output;
mod registry;
mod runtime;
mod value;

pub use diagnostic::Diagnostic;
pub use environment::{CallFrame, Environment};
pub use error::{RunFailure, RuntimeError};
pub use output::OutputSink;
pub use registry::{Function, FunctionRegistry};
pub use value::Value;

use runtime::{ExecResult, InterpreterRuntime};

/// Where undefined-name and arity diagnostics are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticsTarget {
    /// Interleaved with printed values, in evaluation order.
    #[default]
    Output,
    /// A stream of their own (stderr, or a second buffer when captured).
    Separate,
}

#[derive(Debug, Clone, Default)]
pub struct InterpreterOptions {
    pub diagnostics: DiagnosticsTarget,
    /// Report calls whose argument count differs from the parameter count.
    /// Binding stays positional either way.
    pub strict_arity: bool,
}

/// Everything a captured run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Value of a top-level `return`, or [`Value::Null`].
    pub value: Value,
    pub output: Vec<String>,
    /// Empty unless diagnostics go to [`DiagnosticsTarget::Separate`].
    pub diagnostics: Vec<String>,
}

/// AST-walking evaluator.
///
/// Every run starts from an empty environment and function registry, so one
/// `Interpreter` can execute any number of programs independently.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    options: InterpreterOptions,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: InterpreterOptions) -> Self {
        Self { options }
    }

    /// Runs `program` and returns its printed lines joined with `\n`.
    pub fn run(&self, program: &Program) -> Result<String, RuntimeError> {
        self.run_captured(program)
            .map(|outcome| outcome.output.join("\n"))
            .map_err(|failure| failure.error)
    }

    /// Runs `program` into buffers. On a fatal error the lines written so far
    /// are returned with it.
    pub fn run_captured(&self, program: &Program) -> Result<RunOutcome, RunFailure> {
        let (result, output, diagnostics) =
            self.execute(program, OutputSink::buffer(), OutputSink::buffer());
        let output = output.into_lines();
        let diagnostics = diagnostics.into_lines();
        match result {
            Ok(value) => Ok(RunOutcome {
                value,
                output,
                diagnostics,
            }),
            Err(error) => Err(RunFailure {
                error,
                output,
                diagnostics,
            }),
        }
    }

    /// Runs `program` writing to stdout, with separate diagnostics on stderr.
    pub fn run_streaming(&self, program: &Program) -> Result<Value, RuntimeError> {
        let (result, _, _) = self.execute(program, OutputSink::Stdout, OutputSink::Stderr);
        result
    }

    fn execute(
        &self,
        program: &Program,
        output: OutputSink,
        diagnostics: OutputSink,
    ) -> (Result<Value, RuntimeError>, OutputSink, OutputSink) {
        // Execution pipeline:
        // execute -> exec_block (top-level statements) -> exec_statement
        // -> eval_expression -> eval_call -> exec_block (function body).
        let mut runtime = InterpreterRuntime::new(&self.options, output, diagnostics);
        let result = runtime.exec_block(program).map(|flow| match flow {
            ExecResult::Continue => Value::Null,
            ExecResult::Return(value) => value,
        });
        (result, runtime.output, runtime.diagnostics)
    }
}
