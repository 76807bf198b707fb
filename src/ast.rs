//! Program tree consumed by the evaluator.
//!
//! The parser builds these nodes once; evaluation only reads them. Names are
//! kept as plain strings and resolved against the environment at run time.

use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(f64),
    /// Source text between the quotes, escape-decoded on evaluation.
    String(String),
    Bool(bool),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum IncDecOperator {
    Increment,
    Decrement,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CompareOperator {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    Literal(Literal),
    Identifier(String),
    /// Arithmetic. A missing `left` folds as `0 op right`, which is how
    /// unary `-x` and `+x` are represented.
    BinaryOp {
        op: BinaryOperator,
        left: Option<Box<Node>>,
        right: Box<Node>,
    },
    IncDec {
        op: IncDecOperator,
        target: String,
    },
    Compare {
        op: CompareOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    Declare {
        name: String,
        init: Option<Box<Node>>,
    },
    Assign {
        target: String,
        value: Box<Node>,
    },
    Print(Box<Node>),
    While {
        condition: Box<Node>,
        body: Program,
    },
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Program,
    },
    FunctionCall {
        name: String,
        args: Vec<Node>,
    },
    Return(Option<Box<Node>>),
    NoOp,
}

impl Node {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Literal(_) => "literal",
            Node::Identifier(_) => "identifier",
            Node::BinaryOp { .. } => "arithmetic operation",
            Node::IncDec { .. } => "increment",
            Node::Compare { .. } => "comparison",
            Node::Declare { .. } => "declaration",
            Node::Assign { .. } => "assignment",
            Node::Print(_) => "print statement",
            Node::While { .. } => "while loop",
            Node::FunctionDef { .. } => "function definition",
            Node::FunctionCall { .. } => "function call",
            Node::Return(_) => "return statement",
            Node::NoOp => "empty statement",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Program {
    pub statements: Vec<Node>,
}

impl Program {
    pub fn new(statements: Vec<Node>) -> Self {
        Self { statements }
    }

    /// Names introduced by `var` anywhere in this block, including loop
    /// bodies but not nested function definitions. First occurrence order,
    /// without duplicates.
    pub fn declared_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_declared_names(&self.statements, &mut names);
        names
    }
}

fn collect_declared_names<'a>(statements: &'a [Node], names: &mut Vec<&'a str>) {
    for statement in statements {
        match statement {
            Node::Declare { name, .. } => {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
            Node::While { body, .. } => collect_declared_names(&body.statements, names),
            _ => {}
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for IncDecOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncDecOperator::Increment => f.write_str("++"),
            IncDecOperator::Decrement => f.write_str("--"),
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOperator::Equal => "==",
            CompareOperator::NotEqual => "!=",
            CompareOperator::Less => "<",
            CompareOperator::Greater => ">",
            CompareOperator::LessEqual => "<=",
            CompareOperator::GreaterEqual => ">=",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declare(name: &str) -> Node {
        Node::Declare {
            name: name.to_string(),
            init: None,
        }
    }

    #[test]
    fn declared_names_include_loop_bodies_once() {
        let body = Program::new(vec![
            declare("a"),
            Node::While {
                condition: Box::new(Node::Literal(Literal::Bool(false))),
                body: Program::new(vec![declare("b"), declare("a")]),
            },
            Node::FunctionDef {
                name: "inner".to_string(),
                params: vec![],
                body: Program::new(vec![declare("c")]),
            },
        ]);
        assert_eq!(body.declared_names(), vec!["a", "b"]);
    }
}
