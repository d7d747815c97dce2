use super::CalcError;
use super::parser::Function;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Pi,
    Func(Function),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

/// A token and the byte offset it starts at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: usize,
}

impl TokenKind {
    /// Human-readable form for error messages
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::Pi => "'pi'".to_string(),
            TokenKind::Func(f) => format!("'{f}'"),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Caret => "'^'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        let kind = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => {
                let mut end = pos;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &input[pos..end];
                let value = text.parse::<f64>().map_err(|_| CalcError::InvalidNumber {
                    text: text.to_string(),
                    pos,
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    pos,
                });
                continue;
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = pos;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphabetic() {
                        end = i + 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                let name = &input[pos..end];
                let kind = match name {
                    "pi" => TokenKind::Pi,
                    _ => match Function::from_name(name) {
                        Some(f) => TokenKind::Func(f),
                        None => {
                            return Err(CalcError::UnknownIdentifier {
                                name: name.to_string(),
                                pos,
                            });
                        }
                    },
                };
                tokens.push(Token { kind, pos });
                continue;
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            other => return Err(CalcError::UnexpectedChar { ch: other, pos }),
        };
        chars.next();
        tokens.push(Token { kind, pos });
    }

    Ok(tokens)
}
