//! Lexer (tokenizer) for rule-table files
//!
//! Converts raw rule-table text into a flat [`Token`] stream consumed by the parser.
//! `//` and `#` start line comments; `/* ... */` block comments are also skipped.

use super::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    CharLiteral(u8, SourceLocation),

    // Identifiers (state names, move letters, `start`, `blank`)
    Ident(String, SourceLocation),

    // Wildcard
    Star(SourceLocation), // *

    // Punctuation
    Arrow(SourceLocation),     // ->
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    Comma(SourceLocation),     // ,
    Semicolon(SourceLocation), // ;

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::CharLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Star(loc)
            | Token::Arrow(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::Comma(loc)
            | Token::Semicolon(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::CharLiteral(b, _) => {
                if b.is_ascii_graphic() || *b == b' ' {
                    write!(f, "char literal '{}'", *b as char)
                } else {
                    write!(f, "char literal '\\x{:02x}'", b)
                }
            }
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Star(_) => write!(f, "'*'"),
            Token::Arrow(_) => write!(f, "'->'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for rule-table source
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '\'' => self.char_literal(loc),

            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier(ch, loc)),

            '-' => {
                if self.peek() == Some('>') {
                    self.advance();
                    Ok(Token::Arrow(loc))
                } else {
                    Err(LexError {
                        message: "Expected '>' after '-'".to_string(),
                        location: loc,
                    })
                }
            }
            '*' => Ok(Token::Star(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            ',' => Ok(Token::Comma(loc)),
            ';' => Ok(Token::Semicolon(loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse character literal (opening quote already consumed)
    fn char_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file in character literal".to_string(),
            location: self.current_location(),
        })?;

        let value = if ch == '\\' {
            let escaped = self.advance().ok_or_else(|| LexError {
                message: "Unexpected end of file in character literal".to_string(),
                location: self.current_location(),
            })?;

            match escaped {
                'n' => b'\n',
                't' => b'\t',
                'r' => b'\r',
                '\\' => b'\\',
                '\'' => b'\'',
                '0' => 0,
                'x' => {
                    // Hex escape: \xHH
                    let hex: String = [self.advance(), self.advance()]
                        .into_iter()
                        .flatten()
                        .collect();
                    u8::from_str_radix(&hex, 16).map_err(|_| LexError {
                        message: format!("Invalid hex escape sequence: \\x{}", hex),
                        location: self.current_location(),
                    })?
                }
                _ => {
                    return Err(LexError {
                        message: format!("Unknown escape sequence: \\{}", escaped),
                        location: self.current_location(),
                    });
                }
            }
        } else if ch.is_ascii() && ch != '\'' {
            ch as u8
        } else {
            return Err(LexError {
                message: format!("Symbol must be a single ASCII character, found '{}'", ch),
                location: loc,
            });
        };

        // Expect closing quote
        if self.advance() != Some('\'') {
            return Err(LexError {
                message: "Expected closing quote in character literal".to_string(),
                location: self.current_location(),
            });
        }

        Ok(Token::CharLiteral(value, loc))
    }

    fn identifier(&mut self, first: char, loc: SourceLocation) -> Token {
        let mut name = String::from(first);
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::Ident(name, loc)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('#') => self.skip_line_comment(),
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip to the end of the line
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_tokens() {
        let mut lexer = Lexer::new("(BEGIN, *) -> ('b', R, A);");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::LParen(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "BEGIN"));
        assert!(matches!(tokens[2], Token::Comma(_)));
        assert!(matches!(tokens[3], Token::Star(_)));
        assert!(matches!(tokens[4], Token::RParen(_)));
        assert!(matches!(tokens[5], Token::Arrow(_)));
        assert!(matches!(tokens[6], Token::LParen(_)));
        assert!(matches!(tokens[7], Token::CharLiteral(b'b', _)));
        assert!(matches!(tokens[8], Token::Comma(_)));
        assert!(matches!(tokens[9], Token::Ident(ref s, _) if s == "R"));
        assert!(matches!(tokens[12], Token::RParen(_)));
        assert!(matches!(tokens[13], Token::Semicolon(_)));
        assert!(matches!(tokens[14], Token::Eof(_)));
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("# hash\nstart // slash\nA /* block\n */ ;");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "start"));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "A"));
        assert!(matches!(tokens[2], Token::Semicolon(_)));
        assert_eq!(tokens[1].location(), SourceLocation::new(3, 1));
    }

    #[test]
    fn test_escapes() {
        let mut lexer = Lexer::new(r"'\0' '\n' '\x41' '\''");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::CharLiteral(0, _)));
        assert!(matches!(tokens[1], Token::CharLiteral(b'\n', _)));
        assert!(matches!(tokens[2], Token::CharLiteral(b'A', _)));
        assert!(matches!(tokens[3], Token::CharLiteral(b'\'', _)));
    }

    #[test]
    fn test_errors() {
        assert!(Lexer::new("- >").tokenize().is_err());
        assert!(Lexer::new("'ab'").tokenize().is_err());
        assert!(Lexer::new("/* open").tokenize().is_err());
        let err = Lexer::new("\n  @").tokenize().unwrap_err();
        assert_eq!(err.location, SourceLocation::new(2, 3));
    }
}
