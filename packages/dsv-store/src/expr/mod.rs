//! Filter expressions.
//!
//! A filter is compiled once against the loaded schema and then evaluated
//! for every row. Compilation resolves column names, precompiles literal
//! `like` patterns and checks operand types, so evaluation only fails on
//! bad data (a number column cell that does not parse).
//!
//! ```text
//! qty > 3 and name like 'gr*'
//! 'apple' in name or not (price * qty >= 100)
//! ```

mod eval;
mod lexer;
mod parser;

use crate::column::{ColumnDescriptor, ColumnKind};
use crate::error::{EvalError, FilterError};

pub use eval::EPSILON;
pub use parser::{BinaryOp, Expr, Pattern, UnaryOp};

/// Static type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Number,
    Text,
    Bool,
}

impl ValueType {
    fn name(self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::Text => "string",
            ValueType::Bool => "boolean",
        }
    }
}

/// A compiled filter expression.
#[derive(Debug, Clone)]
pub struct Filter {
    source: String,
    root: Expr,
}

impl Filter {
    /// Parse and type-check `source` against `columns`.
    pub fn compile(source: &str, columns: &[ColumnDescriptor]) -> Result<Self, FilterError> {
        let tokens = lexer::tokenize(source)?;
        let root = parser::Parser::new(tokens, columns).parse()?;

        match type_of(&root)? {
            ValueType::Bool | ValueType::Number => Ok(Self {
                source: source.trim().to_string(),
                root,
            }),
            ValueType::Text => Err(FilterError::Type {
                message: "filter must evaluate to a boolean or number, not a string".to_string(),
            }),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.root
    }

    /// Evaluate against one row's cells.
    pub fn matches(&self, row: usize, cells: &[String]) -> Result<bool, EvalError> {
        let row = eval::Row { index: row, cells };
        eval::evaluate(&self.root, &row).map(|value| value.truthy())
    }
}

fn type_of(expr: &Expr) -> Result<ValueType, FilterError> {
    match expr {
        Expr::Number(_) => Ok(ValueType::Number),
        Expr::Text(_) => Ok(ValueType::Text),
        Expr::Bool(_) => Ok(ValueType::Bool),
        Expr::Column { kind, name, .. } => match kind {
            ColumnKind::Number => Ok(ValueType::Number),
            ColumnKind::String => Ok(ValueType::Text),
            ColumnKind::Unknown => Err(FilterError::UntypedColumn { name: name.clone() }),
        },
        Expr::Unary { op, operand } => {
            let operand = type_of(operand)?;
            match op {
                UnaryOp::Neg => expect(operand, &[ValueType::Number], "unary '-'"),
                UnaryOp::Not => {
                    expect(operand, &[ValueType::Bool, ValueType::Number], "'not'")?;
                    Ok(ValueType::Bool)
                }
            }
        }
        Expr::Binary { op, lhs, rhs } => {
            let (left, right) = (type_of(lhs)?, type_of(rhs)?);
            binary_type(*op, left, right)
        }
        Expr::Like {
            subject, pattern, ..
        } => {
            expect(type_of(subject)?, &[ValueType::Text], "like")?;
            if let Pattern::Dynamic(pattern) = pattern {
                expect(type_of(pattern)?, &[ValueType::Text], "like")?;
            }
            Ok(ValueType::Bool)
        }
    }
}

fn binary_type(op: BinaryOp, left: ValueType, right: ValueType) -> Result<ValueType, FilterError> {
    let mismatch = || FilterError::Type {
        message: format!(
            "'{}' cannot combine {} and {}",
            op.symbol(),
            left.name(),
            right.name()
        ),
    };

    match op {
        BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => {
            let logical = [ValueType::Bool, ValueType::Number];
            if logical.contains(&left) && logical.contains(&right) {
                Ok(ValueType::Bool)
            } else {
                Err(mismatch())
            }
        }
        BinaryOp::Eq
        | BinaryOp::Ne
        | BinaryOp::Lt
        | BinaryOp::Le
        | BinaryOp::Gt
        | BinaryOp::Ge => {
            if left == right {
                Ok(ValueType::Bool)
            } else {
                Err(mismatch())
            }
        }
        BinaryOp::In => {
            if left == ValueType::Text && right == ValueType::Text {
                Ok(ValueType::Bool)
            } else {
                Err(mismatch())
            }
        }
        BinaryOp::Add if left == ValueType::Text && right == ValueType::Text => Ok(ValueType::Text),
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Rem
        | BinaryOp::Pow => {
            if left == ValueType::Number && right == ValueType::Number {
                Ok(ValueType::Number)
            } else {
                Err(mismatch())
            }
        }
    }
}

fn expect(actual: ValueType, allowed: &[ValueType], context: &str) -> Result<ValueType, FilterError> {
    if allowed.contains(&actual) {
        Ok(actual)
    } else {
        Err(FilterError::Type {
            message: format!("{} does not accept a {}", context, actual.name()),
        })
    }
}
