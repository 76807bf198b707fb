//! Operator tables for arithmetic, increment/decrement and comparison.

use std::cmp::Ordering;

use crate::ast::{BinaryOperator, CompareOperator, IncDecOperator};

use super::{RuntimeError, Value};

/// Applies an arithmetic operator. Division by zero yields IEEE infinity or NaN.
pub(super) fn binary(
    op: BinaryOperator,
    left: &Value,
    right: &Value,
) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(match op {
            BinaryOperator::Add => a + b,
            BinaryOperator::Sub => a - b,
            BinaryOperator::Mul => a * b,
            BinaryOperator::Div => a / b,
        })),
        (Value::String(a), Value::String(b)) if op == BinaryOperator::Add => {
            Ok(Value::String(format!("{a}{b}")))
        }
        _ => Err(RuntimeError::UnsupportedOperands {
            operator: op.to_string(),
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

pub(super) fn inc_dec(op: IncDecOperator, value: &Value) -> Result<Value, RuntimeError> {
    match value {
        Value::Number(n) => Ok(Value::Number(match op {
            IncDecOperator::Increment => n + 1.0,
            IncDecOperator::Decrement => n - 1.0,
        })),
        other => Err(RuntimeError::UnsupportedOperand {
            operator: op.to_string(),
            operand: other.type_name(),
        }),
    }
}

pub(super) fn compare(
    op: CompareOperator,
    left: &Value,
    right: &Value,
) -> Result<bool, RuntimeError> {
    match op {
        CompareOperator::Equal => Ok(left == right),
        CompareOperator::NotEqual => Ok(left != right),
        CompareOperator::Less => Ok(ordering(op, left, right)? == Some(Ordering::Less)),
        CompareOperator::Greater => Ok(ordering(op, left, right)? == Some(Ordering::Greater)),
        CompareOperator::LessEqual => Ok(matches!(
            ordering(op, left, right)?,
            Some(Ordering::Less | Ordering::Equal)
        )),
        CompareOperator::GreaterEqual => Ok(matches!(
            ordering(op, left, right)?,
            Some(Ordering::Greater | Ordering::Equal)
        )),
    }
}

/// `None` means unordered (a NaN operand), which makes every ordering test false.
fn ordering(
    op: CompareOperator,
    left: &Value,
    right: &Value,
) -> Result<Option<Ordering>, RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(a.partial_cmp(b)),
        (Value::String(a), Value::String(b)) => Ok(Some(a.cmp(b))),
        (Value::Bool(a), Value::Bool(b)) => Ok(Some(a.cmp(b))),
        _ => Err(RuntimeError::UnsupportedOperands {
            operator: op.to_string(),
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}
