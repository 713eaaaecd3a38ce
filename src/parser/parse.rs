//! Rule-table parser
//!
//! This module provides the [`Parser`] struct, which turns a token stream into a
//! [`RuleTable`].
//!
//! # Grammar
//!
//! ```text
//! table   := (start | rule)*
//! start   := 'start' IDENT ';'
//! rule    := '(' state ',' symbol ')' '->' '(' symbol ',' move ',' state ')' ';'
//! state   := IDENT | '*'
//! symbol  := CHAR | 'blank' | '*'
//! move    := 'L' | 'R' | 'S' | '*'
//! ```
//!
//! A `*` move means "stay", matching how wildcard directions behave elsewhere.

use super::lexer::{LexError, Lexer, Token};
use super::SourceLocation;
use crate::machine::rules::{HeadMove, Pattern, Rule, RuleTable, RuleTableBuilder, StateId};
use crate::tape::{Symbol, BLANK};
use thiserror::Error;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for rule tables
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the whole file
    pub fn parse_rule_table(&mut self) -> Result<RuleTable, ParseError> {
        let mut builder = RuleTable::builder();
        let mut start: Option<String> = None;

        while !self.is_at_end() {
            if matches!(self.peek(), Token::Ident(word, _) if word == "start") {
                let location = self.current_location();
                self.advance();
                let name = self.expect_identifier()?;
                if start.is_some() {
                    return Err(ParseError {
                        message: "Start state declared more than once".to_string(),
                        location,
                    });
                }
                self.expect(
                    |t| matches!(t, Token::Semicolon(_)),
                    "Expected ';' after start state",
                )?;
                // Intern now so state ids follow declaration order
                builder.state(&name);
                start = Some(name);
            } else {
                let rule = self.parse_rule(&mut builder)?;
                builder.push(rule);
            }
        }

        if let Some(name) = start {
            builder = builder.start(&name);
        }
        Ok(builder.build())
    }

    fn parse_rule(&mut self, builder: &mut RuleTableBuilder) -> Result<Rule, ParseError> {
        self.expect(|t| matches!(t, Token::LParen(_)), "Expected '(' to start a rule")?;
        let state_in = self.parse_state(builder)?;
        self.expect_comma("after input state")?;
        let symbol_in = self.parse_symbol()?;
        self.expect(|t| matches!(t, Token::RParen(_)), "Expected ')' after input symbol")?;

        self.expect(|t| matches!(t, Token::Arrow(_)), "Expected '->' between rule sides")?;

        self.expect(|t| matches!(t, Token::LParen(_)), "Expected '(' to start rule output")?;
        let symbol_out = self.parse_symbol()?;
        self.expect_comma("after output symbol")?;
        let head_move = self.parse_move()?;
        self.expect_comma("after head move")?;
        let state_out = self.parse_state(builder)?;
        self.expect(|t| matches!(t, Token::RParen(_)), "Expected ')' after output state")?;
        self.expect(|t| matches!(t, Token::Semicolon(_)), "Expected ';' after rule")?;

        Ok(Rule {
            state_in,
            symbol_in,
            symbol_out,
            head_move,
            state_out,
        })
    }

    fn parse_state(
        &mut self,
        builder: &mut RuleTableBuilder,
    ) -> Result<Pattern<StateId>, ParseError> {
        match self.peek().clone() {
            Token::Star(_) => {
                self.advance();
                Ok(Pattern::Any)
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(Pattern::Exact(builder.state(&name)))
            }
            other => Err(ParseError {
                message: format!("Expected state name or '*', found {}", other),
                location: other.location(),
            }),
        }
    }

    fn parse_symbol(&mut self) -> Result<Pattern<Symbol>, ParseError> {
        match self.peek().clone() {
            Token::Star(_) => {
                self.advance();
                Ok(Pattern::Any)
            }
            Token::CharLiteral(symbol, _) => {
                self.advance();
                Ok(Pattern::Exact(symbol))
            }
            Token::Ident(word, _) if word == "blank" => {
                self.advance();
                Ok(Pattern::Exact(BLANK))
            }
            other => Err(ParseError {
                message: format!("Expected symbol, 'blank' or '*', found {}", other),
                location: other.location(),
            }),
        }
    }

    fn parse_move(&mut self) -> Result<HeadMove, ParseError> {
        let head_move = match self.peek() {
            Token::Star(_) => HeadMove::Stay,
            Token::Ident(word, _) if word == "L" => HeadMove::Left,
            Token::Ident(word, _) if word == "R" => HeadMove::Right,
            Token::Ident(word, _) if word == "S" => HeadMove::Stay,
            other => {
                return Err(ParseError {
                    message: format!("Expected head move L, R, S or '*', found {}", other),
                    location: other.location(),
                })
            }
        };
        self.advance();
        Ok(head_move)
    }

    // ===== Helper methods =====

    fn expect(&mut self, accept: impl Fn(&Token) -> bool, message: &str) -> Result<(), ParseError> {
        if accept(self.peek()) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    fn expect_comma(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect(|t| matches!(t, Token::Comma(_)), &format!("Expected ',' {ctx}"))
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek().clone() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_rule() {
        let source = "start BEGIN;\n(BEGIN, *) -> ('b', *, A);";
        let mut parser = Parser::new(source).unwrap();
        let table = parser.parse_rule_table().unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.states().name(table.start()), "BEGIN");
        let rule = &table.rules()[0];
        assert_eq!(rule.symbol_in, Pattern::Any);
        assert_eq!(rule.symbol_out, Pattern::Exact(b'b'));
        assert_eq!(rule.head_move, HeadMove::Stay);
        assert_eq!(
            rule.state_out,
            Pattern::Exact(table.states().get("A").unwrap())
        );
    }

    #[test]
    fn test_start_declared_after_rules() {
        let source = "(A, blank) -> (*, R, *);\nstart B;";
        let table = Parser::new(source).unwrap().parse_rule_table().unwrap();
        assert_eq!(table.states().name(table.start()), "B");
        assert_eq!(table.rules()[0].symbol_in, Pattern::Exact(BLANK));
        assert_eq!(table.rules()[0].state_out, Pattern::Any);
    }

    #[test]
    fn test_empty_table() {
        let table = Parser::new("// nothing here\n").unwrap().parse_rule_table().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.states().name(table.start()), "START");
    }

    #[test]
    fn test_error_locations() {
        let err = Parser::new("(A, *) -> ('b', X, A);")
            .unwrap()
            .parse_rule_table()
            .unwrap_err();
        assert_eq!(err.location, SourceLocation::new(1, 17));
        assert!(err.message.contains("head move"));

        let err = Parser::new("(A, *) -> ('b', R, A)")
            .unwrap()
            .parse_rule_table()
            .unwrap_err();
        assert!(err.message.starts_with("Expected ';' after rule"));

        let err = Parser::new("start A;\nstart B;")
            .unwrap()
            .parse_rule_table()
            .unwrap_err();
        assert_eq!(err.location.line, 2);
    }
}
