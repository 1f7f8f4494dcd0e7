//! Row-at-a-time evaluation of a type-checked expression tree.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::column::ColumnKind;
use crate::error::EvalError;

use super::parser::{wildcard_regex, BinaryOp, Expr, Pattern, UnaryOp};

/// Relative tolerance for number equality.
pub const EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Number(f64),
    Text(Cow<'a, str>),
    Bool(bool),
}

impl Value<'_> {
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(t) => !t.is_empty(),
        }
    }

    fn number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Text(t) => t.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

/// The data a single evaluation reads from.
pub struct Row<'a> {
    pub index: usize,
    pub cells: &'a [String],
}

pub fn evaluate<'a>(expr: &'a Expr, row: &Row<'a>) -> Result<Value<'a>, EvalError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Text(t) => Ok(Value::Text(Cow::Borrowed(t.as_str()))),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::Column { index, name, kind } => column(row, *index, name, *kind),
        Expr::Unary { op, operand } => {
            let value = evaluate(operand, row)?;
            Ok(match op {
                UnaryOp::Neg => Value::Number(-value.number()),
                UnaryOp::Not => Value::Bool(!value.truthy()),
            })
        }
        Expr::Binary { op, lhs, rhs } => binary(*op, lhs, rhs, row),
        Expr::Like {
            subject,
            pattern,
            case_insensitive,
        } => {
            let subject = evaluate(subject, row)?;
            let subject = text(&subject);
            let matched = match pattern {
                Pattern::Compiled(regex) => regex.is_match(&subject),
                Pattern::Dynamic(expr) => {
                    let pattern = evaluate(expr, row)?;
                    let pattern = text(&pattern);
                    wildcard_regex(&pattern, *case_insensitive)
                        .map_err(|e| EvalError::Pattern {
                            row: row.index,
                            pattern: pattern.to_string(),
                            message: e.to_string(),
                        })?
                        .is_match(&subject)
                }
            };
            Ok(Value::Bool(matched))
        }
    }
}

fn column<'a>(
    row: &Row<'a>,
    index: usize,
    name: &str,
    kind: ColumnKind,
) -> Result<Value<'a>, EvalError> {
    let cell = row
        .cells
        .get(index)
        .map(String::as_str)
        .unwrap_or_default();

    match kind {
        ColumnKind::Number => cell
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| EvalError::InvalidNumber {
                row: row.index,
                column: name.to_string(),
                value: cell.to_string(),
            }),
        ColumnKind::String | ColumnKind::Unknown => Ok(Value::Text(Cow::Borrowed(cell))),
    }
}

fn binary<'a>(
    op: BinaryOp,
    lhs: &'a Expr,
    rhs: &'a Expr,
    row: &Row<'a>,
) -> Result<Value<'a>, EvalError> {
    // Logical operators short-circuit.
    let value = match op {
        BinaryOp::And => Value::Bool(evaluate(lhs, row)?.truthy() && evaluate(rhs, row)?.truthy()),
        BinaryOp::Or => Value::Bool(evaluate(lhs, row)?.truthy() || evaluate(rhs, row)?.truthy()),
        strict => {
            let left = evaluate(lhs, row)?;
            let right = evaluate(rhs, row)?;
            apply(strict, &left, &right)
        }
    };
    Ok(value)
}

/// Apply `op` to two evaluated operands.
fn apply<'a>(op: BinaryOp, left: &Value<'a>, right: &Value<'a>) -> Value<'a> {
    match op {
        BinaryOp::And => Value::Bool(left.truthy() && right.truthy()),
        BinaryOp::Or => Value::Bool(left.truthy() || right.truthy()),
        BinaryOp::Xor => Value::Bool(left.truthy() ^ right.truthy()),
        BinaryOp::Eq => Value::Bool(equal(left, right)),
        BinaryOp::Ne => Value::Bool(!equal(left, right)),
        BinaryOp::Lt => Value::Bool(compare(left, right) == Some(Ordering::Less)),
        BinaryOp::Le => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinaryOp::Gt => Value::Bool(compare(left, right) == Some(Ordering::Greater)),
        BinaryOp::Ge => Value::Bool(matches!(
            compare(left, right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        BinaryOp::In => Value::Bool(text(right).contains(text(left).as_ref())),
        BinaryOp::Add => match (left, right) {
            (Value::Text(a), Value::Text(b)) => Value::Text(Cow::Owned(format!("{}{}", a, b))),
            _ => Value::Number(left.number() + right.number()),
        },
        BinaryOp::Sub => Value::Number(left.number() - right.number()),
        BinaryOp::Mul => Value::Number(left.number() * right.number()),
        BinaryOp::Div => Value::Number(left.number() / right.number()),
        BinaryOp::Rem => Value::Number(left.number() % right.number()),
        BinaryOp::Pow => Value::Number(left.number().powf(right.number())),
    }
}

fn text<'v>(value: &'v Value<'_>) -> Cow<'v, str> {
    match value {
        Value::Text(t) => Cow::Borrowed(t.as_ref()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(b) => Cow::Owned(b.to_string()),
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = 1f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= EPSILON * scale
}

fn equal(left: &Value<'_>, right: &Value<'_>) -> bool {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => approx_eq(left.number(), right.number()),
    }
}

fn compare(left: &Value<'_>, right: &Value<'_>) -> Option<Ordering> {
    match (left, right) {
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => {
            let (a, b) = (left.number(), right.number());
            if approx_eq(a, b) {
                Some(Ordering::Equal)
            } else {
                a.partial_cmp(&b)
            }
        }
    }
}
