//! Tokenizer for filter expressions.
//!
//! Positions are byte offsets into the source so errors can point at the
//! offending character.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::FilterError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Text(String),
    Ident(String),
    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Bang,
    Amp,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, FilterError> {
    Lexer {
        source,
        chars: source.char_indices().peekable(),
    }
    .run()
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn run(mut self) -> Result<Vec<Token>, FilterError> {
        let mut tokens = Vec::new();

        while let Some(&(position, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
                continue;
            }

            let kind = match c {
                '0'..='9' | '.' => self.number(position)?,
                '\'' | '"' => self.text(position, c)?,
                c if c.is_alphabetic() || c == '_' => self.ident(position),
                _ => self.operator(position, c)?,
            };
            tokens.push(Token { kind, position });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            position: self.source.len(),
        });
        Ok(tokens)
    }

    fn operator(&mut self, position: usize, c: char) -> Result<TokenKind, FilterError> {
        self.chars.next();
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '^' => TokenKind::Caret,
            '=' => {
                self.eat('=');
                TokenKind::Eq
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::Ne
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::Le
                } else if self.eat('>') {
                    TokenKind::Ne
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                self.eat('&');
                TokenKind::Amp
            }
            other => {
                return Err(FilterError::Syntax {
                    position,
                    message: format!("unexpected character '{}'", other),
                })
            }
        };
        Ok(kind)
    }

    fn number(&mut self, start: usize) -> Result<TokenKind, FilterError> {
        let mut end = start;
        let mut seen_exponent = false;
        let mut previous = '\0';

        while let Some(&(i, c)) = self.chars.peek() {
            let accept = match c {
                '0'..='9' | '.' => true,
                'e' | 'E' if !seen_exponent => {
                    seen_exponent = true;
                    true
                }
                '+' | '-' => matches!(previous, 'e' | 'E'),
                _ => false,
            };
            if !accept {
                break;
            }
            previous = c;
            end = i + c.len_utf8();
            self.chars.next();
        }

        let literal = &self.source[start..end];
        literal
            .parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| FilterError::Syntax {
                position: start,
                message: format!("invalid number '{}'", literal),
            })
    }

    fn text(&mut self, start: usize, quote: char) -> Result<TokenKind, FilterError> {
        self.chars.next();
        let mut value = String::new();

        loop {
            match self.chars.next() {
                Some((_, c)) if c == quote => {
                    // A doubled quote stands for itself.
                    if self.eat(quote) {
                        value.push(quote);
                    } else {
                        return Ok(TokenKind::Text(value));
                    }
                }
                Some((_, c)) => value.push(c),
                None => {
                    return Err(FilterError::Syntax {
                        position: start,
                        message: "unterminated string literal".to_string(),
                    })
                }
            }
        }
    }

    fn ident(&mut self, start: usize) -> TokenKind {
        let mut end = start;
        while let Some(&(i, c)) = self.chars.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            end = i + c.len_utf8();
            self.chars.next();
        }
        TokenKind::Ident(self.source[start..end].to_string())
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.chars.peek() {
            Some(&(_, c)) if c == expected => {
                self.chars.next();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_numbers_and_identifiers() {
        assert_eq!(
            kinds("qty >= 1.5e2"),
            vec![
                TokenKind::Ident("qty".to_string()),
                TokenKind::Ge,
                TokenKind::Number(150.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_character_operators() {
        assert_eq!(
            kinds("a == b != c <> d <= e"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::Eq,
                TokenKind::Ident("b".to_string()),
                TokenKind::Ne,
                TokenKind::Ident("c".to_string()),
                TokenKind::Ne,
                TokenKind::Ident("d".to_string()),
                TokenKind::Le,
                TokenKind::Ident("e".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            kinds(r#"'it''s' "x""#),
            vec![
                TokenKind::Text("it's".to_string()),
                TokenKind::Text("x".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("name == 'abc").unwrap_err();
        assert_eq!(
            err,
            FilterError::Syntax {
                position: 8,
                message: "unterminated string literal".to_string(),
            }
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a # b").unwrap_err();
        assert!(matches!(err, FilterError::Syntax { position: 2, .. }));
    }

    #[test]
    fn test_bad_number() {
        assert!(tokenize("1.2.3").is_err());
    }
}
