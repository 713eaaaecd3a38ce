//! Rule-table parsing
//!
//! - [`lexer`]: tokenizes rule-table text
//! - [`parse`]: recursive descent [`Parser`](parse::Parser) producing a
//!   [`RuleTable`](crate::machine::rules::RuleTable)
//!
//! Loading is a front end only; the machine itself takes a ready-made table.

pub mod lexer;
pub mod parse;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Parse a rule table from source text
pub fn parse_rule_table(
    source: &str,
) -> Result<crate::machine::rules::RuleTable, parse::ParseError> {
    parse::Parser::new(source)?.parse_rule_table()
}
