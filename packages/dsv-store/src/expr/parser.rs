//! Precedence-climbing parser producing a resolved expression tree.
//!
//! Column references are resolved against the schema while parsing, so a
//! tree that comes out of here only refers to typed columns that exist.

use regex::{Regex, RegexBuilder};

use crate::column::{self, ColumnDescriptor, ColumnKind};
use crate::error::FilterError;

use super::lexer::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    Xor,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::And => "and",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::In => "in",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "^",
        }
    }
}

/// Right-hand side of a `like`/`ilike`.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Literal pattern, compiled once.
    Compiled(Regex),
    /// Pattern read from a column or computed per row.
    Dynamic(Box<Expr>),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Number(f64),
    Text(String),
    Bool(bool),
    Column {
        index: usize,
        name: String,
        kind: ColumnKind,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Like {
        subject: Box<Expr>,
        pattern: Pattern,
        case_insensitive: bool,
    },
}

/// Infix operators, including the two pattern operators that build
/// `Expr::Like` instead of `Expr::Binary`.
#[derive(Debug, Clone, Copy)]
enum Infix {
    Binary(BinaryOp),
    Like { case_insensitive: bool },
}

const PREFIX_NOT_BP: u8 = 5;

/// Deepest expression tree (and deepest parenthesis nesting) accepted.
/// Parsing, type checking and evaluation all recurse on the tree.
pub const MAX_DEPTH: usize = 256;
const PREFIX_NEG_BP: u8 = 13;

impl Infix {
    /// Left and right binding power. Right-associative operators bind
    /// tighter on the left.
    fn binding_power(self) -> (u8, u8) {
        match self {
            Infix::Binary(BinaryOp::Or | BinaryOp::Xor) => (1, 2),
            Infix::Binary(BinaryOp::And) => (3, 4),
            Infix::Binary(
                BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::In,
            )
            | Infix::Like { .. } => (7, 8),
            Infix::Binary(BinaryOp::Add | BinaryOp::Sub) => (9, 10),
            Infix::Binary(BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem) => (11, 12),
            Infix::Binary(BinaryOp::Pow) => (16, 15),
        }
    }
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    cursor: usize,
    nesting: usize,
    columns: &'a [ColumnDescriptor],
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, columns: &'a [ColumnDescriptor]) -> Self {
        Self {
            tokens,
            cursor: 0,
            nesting: 0,
            columns,
        }
    }

    /// Parse a complete expression; trailing tokens are an error.
    pub fn parse(mut self) -> Result<Expr, FilterError> {
        if matches!(self.peek().kind, TokenKind::Eof) {
            return Err(FilterError::Empty);
        }

        let (expr, _) = self.expr_bp(0)?;
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            return Err(FilterError::Syntax {
                position: token.position,
                message: format!("unexpected {}", describe(&token.kind)),
            });
        }
        Ok(expr)
    }

    /// Parse at binding power `min_bp`, returning the tree and its depth.
    fn expr_bp(&mut self, min_bp: u8) -> Result<(Expr, usize), FilterError> {
        if self.nesting >= MAX_DEPTH {
            return Err(too_deep(self.peek().position));
        }
        self.nesting += 1;
        let result = self.climb(min_bp);
        self.nesting -= 1;
        result
    }

    fn climb(&mut self, min_bp: u8) -> Result<(Expr, usize), FilterError> {
        let (mut lhs, mut depth) = self.prefix()?;

        loop {
            let infix = match self.infix() {
                Some(infix) => infix,
                None => break,
            };
            let (l_bp, r_bp) = infix.binding_power();
            if l_bp < min_bp {
                break;
            }
            let position = self.advance().position;
            let (rhs, rhs_depth) = self.expr_bp(r_bp)?;
            depth = deeper(depth.max(rhs_depth), position)?;

            lhs = match infix {
                Infix::Binary(op) => Expr::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                Infix::Like { case_insensitive } => Expr::Like {
                    subject: Box::new(lhs),
                    pattern: pattern(rhs, case_insensitive, position)?,
                    case_insensitive,
                },
            };
        }

        Ok((lhs, depth))
    }

    fn prefix(&mut self) -> Result<(Expr, usize), FilterError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(value) => Ok((Expr::Number(value), 1)),
            TokenKind::Text(value) => Ok((Expr::Text(value), 1)),
            TokenKind::Minus => self.unary(UnaryOp::Neg, PREFIX_NEG_BP, token.position),
            TokenKind::Bang => self.unary(UnaryOp::Not, PREFIX_NOT_BP, token.position),
            TokenKind::LParen => {
                let inner = self.expr_bp(0)?;
                let close = self.advance();
                if close.kind != TokenKind::RParen {
                    return Err(FilterError::Syntax {
                        position: close.position,
                        message: format!("expected ')' but found {}", describe(&close.kind)),
                    });
                }
                Ok(inner)
            }
            TokenKind::Ident(name) => self.identifier(name, token.position),
            other => Err(FilterError::Syntax {
                position: token.position,
                message: format!("expected a value but found {}", describe(&other)),
            }),
        }
    }

    fn unary(
        &mut self,
        op: UnaryOp,
        bp: u8,
        position: usize,
    ) -> Result<(Expr, usize), FilterError> {
        let (operand, depth) = self.expr_bp(bp)?;
        Ok((
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            deeper(depth, position)?,
        ))
    }

    fn identifier(&mut self, name: String, position: usize) -> Result<(Expr, usize), FilterError> {
        match name.to_ascii_lowercase().as_str() {
            "true" => return Ok((Expr::Bool(true), 1)),
            "false" => return Ok((Expr::Bool(false), 1)),
            "not" => return self.unary(UnaryOp::Not, PREFIX_NOT_BP, position),
            _ => {}
        }

        let index = column::resolve(self.columns, &name)
            .ok_or_else(|| FilterError::UnknownColumn {
                name: name.clone(),
                position,
            })?;
        let descriptor = &self.columns[index];
        if descriptor.kind == ColumnKind::Unknown {
            return Err(FilterError::UntypedColumn {
                name: descriptor.name.clone(),
            });
        }

        Ok((
            Expr::Column {
                index,
                name: descriptor.name.clone(),
                kind: descriptor.kind,
            },
            1,
        ))
    }

    fn infix(&self) -> Option<Infix> {
        let op = match &self.peek().kind {
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::Ne => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            TokenKind::Caret => BinaryOp::Pow,
            TokenKind::Amp => BinaryOp::And,
            TokenKind::Ident(word) => match word.to_ascii_lowercase().as_str() {
                "and" => BinaryOp::And,
                "or" => BinaryOp::Or,
                "xor" => BinaryOp::Xor,
                "in" => BinaryOp::In,
                "like" => {
                    return Some(Infix::Like {
                        case_insensitive: false,
                    })
                }
                "ilike" => {
                    return Some(Infix::Like {
                        case_insensitive: true,
                    })
                }
                _ => return None,
            },
            _ => return None,
        };
        Some(Infix::Binary(op))
    }

    fn peek(&self) -> &Token {
        // The token stream always ends with Eof and the cursor never moves past it.
        &self.tokens[self.cursor.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.cursor < self.tokens.len() - 1 {
            self.cursor += 1;
        }
        token
    }
}

/// Depth of a node whose deepest child is `child` levels deep.
fn deeper(child: usize, position: usize) -> Result<usize, FilterError> {
    if child >= MAX_DEPTH {
        Err(too_deep(position))
    } else {
        Ok(child + 1)
    }
}

fn too_deep(position: usize) -> FilterError {
    FilterError::Syntax {
        position,
        message: "expression nested too deeply".to_string(),
    }
}

fn pattern(rhs: Expr, case_insensitive: bool, position: usize) -> Result<Pattern, FilterError> {
    match rhs {
        Expr::Text(text) => wildcard_regex(&text, case_insensitive)
            .map(Pattern::Compiled)
            .map_err(|e| FilterError::Pattern {
                pattern: text,
                message: e.to_string(),
            }),
        Expr::Number(_) | Expr::Bool(_) => Err(FilterError::Syntax {
            position,
            message: "like/ilike expects a string pattern".to_string(),
        }),
        other => Ok(Pattern::Dynamic(Box::new(other))),
    }
}

/// Translate a `*`/`?` wildcard pattern into an anchored regex.
pub fn wildcard_regex(pattern: &str, case_insensitive: bool) -> Result<Regex, regex::Error> {
    let mut source = String::with_capacity(pattern.len() + 2);
    source.push('^');
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            other => source.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    source.push('$');

    RegexBuilder::new(&source)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(true)
        .build()
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => format!("number {}", n),
        TokenKind::Text(s) => format!("string '{}'", s),
        TokenKind::Ident(s) => format!("'{}'", s),
        TokenKind::Eof => "end of expression".to_string(),
        other => format!("{:?}", other).to_lowercase(),
    }
}
