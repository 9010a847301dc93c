//! @ai:module:intent Tokenize constraint expressions
//! @ai:module:layer domain
//! @ai:module:public_api Token, Spanned, tokenize
//! @ai:module:stateless true

use super::ParseError;

/// @ai:intent A lexical token of the constraint language
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    Real(f64),
    Str(String),
    Ident(String),
    True,
    False,
    And,
    Or,
    Not,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LParen,
    RParen,
    LBracket,
    RBracket,
}

/// @ai:intent A token with its byte offset in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// @ai:intent Split an expression into tokens
/// @ai:post every byte of the input is consumed by a token or whitespace
/// @ai:effects pure
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        // Line continuation: a backslash must be followed by a newline.
        if c == b'\\' {
            pos += match &bytes[pos + 1..] {
                [b'\n', ..] => 2,
                [b'\r', b'\n', ..] => 3,
                _ => return Err(ParseError::new(pos, "`\\` is only allowed before a line break")),
            };
            continue;
        }

        let token = match c {
            b'0'..=b'9' | b'.' => {
                let (token, end) = lex_number(source, pos)?;
                pos = end;
                token
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while pos < bytes.len()
                    && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                keyword_or_ident(&source[start..pos])
            }
            b'\'' | b'"' => {
                let (text, end) = lex_string(source, pos)?;
                pos = end;
                Token::Str(text)
            }
            _ => {
                let next = bytes.get(pos + 1).copied();
                let (token, width) = match (c, next) {
                    (b'=', Some(b'=')) => (Token::Eq, 2),
                    (b'!', Some(b'=')) => (Token::Ne, 2),
                    (b'<', Some(b'=')) => (Token::Le, 2),
                    (b'>', Some(b'=')) => (Token::Ge, 2),
                    (b'<', _) => (Token::Lt, 1),
                    (b'>', _) => (Token::Gt, 1),
                    (b'+', _) => (Token::Plus, 1),
                    (b'-', _) => (Token::Minus, 1),
                    (b'*', _) => (Token::Star, 1),
                    (b'/', _) => (Token::Slash, 1),
                    (b'%', _) => (Token::Percent, 1),
                    (b'&', _) => (Token::And, 1),
                    (b'|', _) => (Token::Or, 1),
                    (b'(', _) => (Token::LParen, 1),
                    (b')', _) => (Token::RParen, 1),
                    (b'[', _) => (Token::LBracket, 1),
                    (b']', _) => (Token::RBracket, 1),
                    (b'=', _) => return Err(ParseError::new(pos, "expected `==`")),
                    (b'!', _) => return Err(ParseError::new(pos, "expected `!=`")),
                    _ => {
                        let ch = source[pos..].chars().next().unwrap_or('?');
                        return Err(ParseError::new(pos, format!("unexpected character `{}`", ch)));
                    }
                };
                pos += width;
                token
            }
        };

        tokens.push(Spanned {
            token,
            offset: start,
        });
    }

    Ok(tokens)
}

fn keyword_or_ident(word: &str) -> Token {
    match word {
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "true" => Token::True,
        "false" => Token::False,
        _ => Token::Ident(word.to_string()),
    }
}

fn lex_number(source: &str, start: usize) -> Result<(Token, usize), ParseError> {
    let bytes = source.as_bytes();
    let mut pos = start;
    let mut is_real = false;

    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos < bytes.len() && bytes[pos] == b'.' {
        is_real = true;
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            is_real = true;
            pos = exp;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
        }
    }

    let text = &source[start..pos];
    if text == "." {
        return Err(ParseError::new(start, "expected a number"));
    }

    let token = if is_real {
        text.parse::<f64>()
            .map(Token::Real)
            .map_err(|_| ParseError::new(start, format!("invalid number `{}`", text)))?
    } else {
        text.parse::<i64>()
            .map(Token::Int)
            .map_err(|_| ParseError::new(start, format!("integer `{}` out of range", text)))?
    };

    Ok((token, pos))
}

fn lex_string(source: &str, start: usize) -> Result<(String, usize), ParseError> {
    let mut chars = source[start..].char_indices();
    let quote = match chars.next() {
        Some((_, q)) => q,
        None => return Err(ParseError::new(start, "expected a string")),
    };

    let mut text = String::new();
    let mut escaped = false;
    for (i, ch) in chars {
        if escaped {
            text.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            return Ok((text, start + i + ch.len_utf8()));
        } else {
            text.push(ch);
        }
    }

    Err(ParseError::new(start, "unterminated string literal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_tokenize_modulo_comparison() {
        assert_eq!(
            kinds("tuned_gs0 % tuned_ls0 == 0"),
            vec![
                Token::Ident("tuned_gs0".to_string()),
                Token::Percent,
                Token::Ident("tuned_ls0".to_string()),
                Token::Eq,
                Token::Int(0),
            ]
        );
    }

    #[test]
    fn test_tokenize_symbolic_connectives_and_index() {
        assert_eq!(
            kinds("(p[0] == 4) | (p[1] != 2) & not x"),
            vec![
                Token::LParen,
                Token::Ident("p".to_string()),
                Token::LBracket,
                Token::Int(0),
                Token::RBracket,
                Token::Eq,
                Token::Int(4),
                Token::RParen,
                Token::Or,
                Token::LParen,
                Token::Ident("p".to_string()),
                Token::LBracket,
                Token::Int(1),
                Token::RBracket,
                Token::Ne,
                Token::Int(2),
                Token::RParen,
                Token::And,
                Token::Not,
                Token::Ident("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            kinds("1.5 2 3e2 .5"),
            vec![
                Token::Real(1.5),
                Token::Int(2),
                Token::Real(300.0),
                Token::Real(0.5),
            ]
        );
    }

    #[test]
    fn test_tokenize_strings() {
        assert_eq!(
            kinds(r#"'csr' "a\"b""#),
            vec![
                Token::Str("csr".to_string()),
                Token::Str("a\"b".to_string()),
            ]
        );
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(
            kinds("a \\\n == \\\r\nb"),
            vec![
                Token::Ident("a".to_string()),
                Token::Eq,
                Token::Ident("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_stray_backslash_rejected() {
        assert_eq!(tokenize("a \\ == b").unwrap_err().offset, 2);
        assert!(tokenize("a == b \\").is_err());
        assert!(tokenize("a \\\t== b").is_err());
    }

    #[test]
    fn test_tokenize_errors() {
        assert_eq!(tokenize("a = b").unwrap_err().offset, 2);
        assert!(tokenize("a $ b").is_err());
        assert!(tokenize("'open").is_err());
        assert!(tokenize("99999999999999999999").is_err());
    }
}
