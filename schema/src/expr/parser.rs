//! @ai:module:intent Parse constraint expression tokens into an expression tree
//! @ai:module:layer domain
//! @ai:module:public_api Expr, BinaryOp, CompareOp, LogicalOp, parse
//! @ai:module:depends_on lexer
//! @ai:module:stateless true

use super::lexer::{tokenize, Spanned, Token};
use super::ParseError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// @ai:intent Expression tree of the constraint language
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Name(String),
    /// Positional read from a sequence-valued binding: `name[index]`.
    Index {
        name: String,
        index: Box<Expr>,
    },
    Neg(Box<Expr>),
    Not(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// @ai:intent Collect every binding name the expression reads
    /// @ai:effects pure
    pub fn names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut BTreeSet<String>) {
        match self {
            Expr::Int(_) | Expr::Real(_) | Expr::Text(_) | Expr::Bool(_) => {}
            Expr::Name(name) => {
                names.insert(name.clone());
            }
            Expr::Index { name, index } => {
                names.insert(name.clone());
                index.collect_names(names);
            }
            Expr::Neg(inner) | Expr::Not(inner) => inner.collect_names(names),
            Expr::Binary { lhs, rhs, .. }
            | Expr::Compare { lhs, rhs, .. }
            | Expr::Logical { lhs, rhs, .. } => {
                lhs.collect_names(names);
                rhs.collect_names(names);
            }
        }
    }
}

/// @ai:intent Parse an expression string into a tree
/// @ai:post the whole input is consumed
/// @ai:effects pure
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        end: source.len(),
    };

    let expr = parser.parse_or()?;
    if let Some(extra) = parser.peek_spanned() {
        return Err(ParseError::new(
            extra.offset,
            format!("unexpected {}", describe(&extra.token)),
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn peek_spanned(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.peek_spanned().map(|s| &s.token)
    }

    fn offset(&self) -> usize {
        self.peek_spanned().map(|s| s.offset).unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        match self.peek() {
            Some(token) if *token == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(token) => Err(ParseError::new(
                self.offset(),
                format!("expected {}, found {}", describe(&expected), describe(token)),
            )),
            None => Err(ParseError::new(
                self.end,
                format!("expected {}, found end of expression", describe(&expected)),
            )),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.parse_and()?;
            lhs = Expr::Logical {
                op: LogicalOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_not()?;
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.parse_not()?;
            lhs = Expr::Logical {
                op: LogicalOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Some(&Token::Not) {
            self.pos += 1;
            let inner = self.parse_not()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let lhs = self.parse_additive()?;
        let Some(op) = self.peek().and_then(compare_op) else {
            return Ok(lhs);
        };
        self.pos += 1;
        let rhs = self.parse_additive()?;

        if self.peek().and_then(compare_op).is_some() {
            return Err(ParseError::new(
                self.offset(),
                "chained comparisons are not supported",
            ));
        }

        Ok(Expr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.peek() == Some(&Token::Minus) {
            self.pos += 1;
            let inner = self.parse_unary()?;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let offset = self.offset();
        let Some(token) = self.advance() else {
            return Err(ParseError::new(self.end, "unexpected end of expression"));
        };

        match token {
            Token::Int(v) => Ok(Expr::Int(*v)),
            Token::Real(v) => Ok(Expr::Real(*v)),
            Token::Str(s) => Ok(Expr::Text(s.clone())),
            Token::True => Ok(Expr::Bool(true)),
            Token::False => Ok(Expr::Bool(false)),
            Token::Ident(name) => {
                if self.peek() == Some(&Token::LBracket) {
                    self.pos += 1;
                    let index = self.parse_or()?;
                    self.expect(Token::RBracket)?;
                    if self.peek() == Some(&Token::LBracket) {
                        return Err(ParseError::new(
                            self.offset(),
                            "only a single level of indexing is supported",
                        ));
                    }
                    Ok(Expr::Index {
                        name: name.clone(),
                        index: Box::new(index),
                    })
                } else {
                    Ok(Expr::Name(name.clone()))
                }
            }
            Token::LParen => {
                let inner = self.parse_or()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            other => Err(ParseError::new(offset, format!("unexpected {}", describe(other)))),
        }
    }
}

fn compare_op(token: &Token) -> Option<CompareOp> {
    match token {
        Token::Eq => Some(CompareOp::Eq),
        Token::Ne => Some(CompareOp::Ne),
        Token::Lt => Some(CompareOp::Lt),
        Token::Le => Some(CompareOp::Le),
        Token::Gt => Some(CompareOp::Gt),
        Token::Ge => Some(CompareOp::Ge),
        _ => None,
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Int(v) => format!("number `{}`", v),
        Token::Real(v) => format!("number `{}`", v),
        Token::Str(s) => format!("string {:?}", s),
        Token::Ident(name) => format!("name `{}`", name),
        Token::True => "`true`".to_string(),
        Token::False => "`false`".to_string(),
        Token::And => "`and`".to_string(),
        Token::Or => "`or`".to_string(),
        Token::Not => "`not`".to_string(),
        Token::Plus => "`+`".to_string(),
        Token::Minus => "`-`".to_string(),
        Token::Star => "`*`".to_string(),
        Token::Slash => "`/`".to_string(),
        Token::Percent => "`%`".to_string(),
        Token::Eq => "`==`".to_string(),
        Token::Ne => "`!=`".to_string(),
        Token::Lt => "`<`".to_string(),
        Token::Le => "`<=`".to_string(),
        Token::Gt => "`>`".to_string(),
        Token::Ge => "`>=`".to_string(),
        Token::LParen => "`(`".to_string(),
        Token::RParen => "`)`".to_string(),
        Token::LBracket => "`[`".to_string(),
        Token::RBracket => "`]`".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> Box<Expr> {
        Box::new(Expr::Name(n.to_string()))
    }

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        let expr = parse("a + b * c").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                lhs: name("a"),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    lhs: name("b"),
                    rhs: name("c"),
                }),
            }
        );
    }

    #[test]
    fn test_modulo_left_associative_with_product() {
        // a * b % c parses as (a * b) % c
        let expr = parse("a * b % c").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Mod,
                lhs: Box::new(Expr::Binary {
                    op: BinaryOp::Mul,
                    lhs: name("a"),
                    rhs: name("b"),
                }),
                rhs: name("c"),
            }
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let expr = parse("a == 1 or b == 2 and c == 3").unwrap();
        match expr {
            Expr::Logical {
                op: LogicalOp::Or,
                rhs,
                ..
            } => assert!(matches!(
                *rhs,
                Expr::Logical {
                    op: LogicalOp::And,
                    ..
                }
            )),
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn test_index_expression() {
        let expr = parse("permutation[4] == 4").unwrap();
        assert_eq!(
            expr,
            Expr::Compare {
                op: CompareOp::Eq,
                lhs: Box::new(Expr::Index {
                    name: "permutation".to_string(),
                    index: Box::new(Expr::Int(4)),
                }),
                rhs: Box::new(Expr::Int(4)),
            }
        );
    }

    #[test]
    fn test_names_collected() {
        let expr = parse("(tuned_tileX + 4) % tuned_vec == 0 and p[k] < 2").unwrap();
        let names: Vec<String> = expr.names().into_iter().collect();
        assert_eq!(names, vec!["k", "p", "tuned_tileX", "tuned_vec"]);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("").is_err());
        assert!(parse("(a == 1").is_err());
        assert!(parse("a == 1)").is_err());
        assert!(parse("a < b < c").is_err());
        assert!(parse("p[0][1] == 2").is_err());
        assert!(parse("a ==").is_err());
    }
}
