//! Transition rules and the rule table
//!
//! A [`Rule`] maps `(state, symbol)` to `(symbol, move, state)`. Every field
//! except the move may be a wildcard ([`Pattern::Any`]):
//! - on the input side a wildcard matches anything
//! - on the output side a wildcard leaves the current value unchanged
//!
//! Rules are tried in table order and the first match wins.

use crate::tape::{display_symbol, Direction, Symbol};
use rustc_hash::FxHashMap;
use std::fmt;

/// Interned control state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub u32);

/// A field that is either a concrete value or a wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern<T> {
    Any,
    Exact(T),
}

impl<T: Copy + PartialEq> Pattern<T> {
    /// Input-side semantics: does this pattern accept `value`?
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Exact(expected) => expected == value,
        }
    }

    /// Output-side semantics: the value to store, given the current one
    pub fn resolve(&self, current: T) -> T {
        match self {
            Pattern::Any => current,
            Pattern::Exact(value) => *value,
        }
    }
}

/// Virtual head movement after a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadMove {
    Left,
    Right,
    Stay,
}

impl HeadMove {
    pub fn direction(self) -> Option<Direction> {
        match self {
            HeadMove::Left => Some(Direction::Left),
            HeadMove::Right => Some(Direction::Right),
            HeadMove::Stay => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub state_in: Pattern<StateId>,
    pub symbol_in: Pattern<Symbol>,
    pub symbol_out: Pattern<Symbol>,
    pub head_move: HeadMove,
    pub state_out: Pattern<StateId>,
}

impl Rule {
    pub fn matches(&self, state: StateId, symbol: Symbol) -> bool {
        self.state_in.matches(&state) && self.symbol_in.matches(&symbol)
    }
}

/// Bidirectional map between state names and [`StateId`]s
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    names: Vec<String>,
    ids: FxHashMap<String, StateId>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id for `name`, registering it if unseen
    pub fn intern(&mut self, name: &str) -> StateId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = StateId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<StateId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: StateId) -> &str {
        self.names
            .get(id.0 as usize)
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Immutable, ordered rule set together with its states and start state
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    states: StateTable,
    start: StateId,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// First rule matching `(state, symbol)`, with its index in the table
    pub fn find_match(&self, state: StateId, symbol: Symbol) -> Option<(usize, &Rule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(state, symbol))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn states(&self) -> &StateTable {
        &self.states
    }

    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Render a rule with state names resolved
    pub fn describe(&self, rule: &Rule) -> String {
        let state = |p: &Pattern<StateId>| match p {
            Pattern::Any => "*".to_string(),
            Pattern::Exact(id) => self.states.name(*id).to_string(),
        };
        let symbol = |p: &Pattern<Symbol>| match p {
            Pattern::Any => "*".to_string(),
            Pattern::Exact(s) => format!("'{}'", display_symbol(*s)),
        };
        format!(
            "({}, {}) -> ({}, {}, {})",
            state(&rule.state_in),
            symbol(&rule.symbol_in),
            symbol(&rule.symbol_out),
            rule.head_move,
            state(&rule.state_out)
        )
    }
}

impl fmt::Display for HeadMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadMove::Left => write!(f, "L"),
            HeadMove::Right => write!(f, "R"),
            HeadMove::Stay => write!(f, "S"),
        }
    }
}

/// Incremental construction of a [`RuleTable`] by state name
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    rules: Vec<Rule>,
    states: StateTable,
    start: Option<String>,
}

impl RuleTableBuilder {
    /// Set the start state; defaults to the first named state
    pub fn start(mut self, name: &str) -> Self {
        self.start = Some(name.to_string());
        self
    }

    /// Register a state name without attaching a rule to it
    pub fn state(&mut self, name: &str) -> StateId {
        self.states.intern(name)
    }

    /// Append a rule. `None` means wildcard for every optional field.
    pub fn rule(
        mut self,
        state_in: Option<&str>,
        symbol_in: Option<Symbol>,
        symbol_out: Option<Symbol>,
        head_move: HeadMove,
        state_out: Option<&str>,
    ) -> Self {
        let state_in = self.state_pattern(state_in);
        let state_out = self.state_pattern(state_out);
        self.rules.push(Rule {
            state_in,
            symbol_in: symbol_in.map_or(Pattern::Any, Pattern::Exact),
            symbol_out: symbol_out.map_or(Pattern::Any, Pattern::Exact),
            head_move,
            state_out,
        });
        self
    }

    /// Append an already-resolved rule
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn build(mut self) -> RuleTable {
        let start = match self.start.take() {
            Some(name) => self.states.intern(&name),
            None if !self.states.is_empty() => StateId(0),
            None => self
                .states
                .intern(super::constants::DEFAULT_START_STATE),
        };

        RuleTable {
            rules: self.rules,
            states: self.states,
            start,
        }
    }

    fn state_pattern(&mut self, name: Option<&str>) -> Pattern<StateId> {
        match name {
            Some(name) => Pattern::Exact(self.states.intern(name)),
            None => Pattern::Any,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let table = RuleTable::builder()
            .rule(Some("A"), Some(b'x'), Some(b'1'), HeadMove::Stay, None)
            .rule(Some("A"), None, Some(b'2'), HeadMove::Stay, None)
            .rule(None, None, Some(b'3'), HeadMove::Stay, None)
            .build();
        let a = table.states().get("A").unwrap();

        let (index, _) = table.find_match(a, b'x').unwrap();
        assert_eq!(index, 0);
        let (index, _) = table.find_match(a, b'y').unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn test_no_match_when_state_differs() {
        let table = RuleTable::builder()
            .rule(Some("A"), None, None, HeadMove::Right, Some("B"))
            .build();
        let b = table.states().get("B").unwrap();
        assert!(table.find_match(b, 0).is_none());
    }

    #[test]
    fn test_wildcard_output_leaves_value() {
        assert_eq!(Pattern::<u8>::Any.resolve(b'q'), b'q');
        assert_eq!(Pattern::Exact(b'r').resolve(b'q'), b'r');
    }

    #[test]
    fn test_start_state_defaults() {
        let table = RuleTable::builder()
            .rule(Some("BEGIN"), None, Some(b'b'), HeadMove::Stay, Some("A"))
            .build();
        assert_eq!(table.states().name(table.start()), "BEGIN");

        let table = RuleTable::builder()
            .rule(None, None, Some(b'b'), HeadMove::Stay, None)
            .build();
        assert_eq!(table.states().name(table.start()), "START");

        let table = RuleTable::builder()
            .start("Q0")
            .rule(Some("A"), None, None, HeadMove::Stay, None)
            .build();
        assert_eq!(table.states().name(table.start()), "Q0");
    }

    #[test]
    fn test_describe() {
        let table = RuleTable::builder()
            .rule(Some("BEGIN"), None, Some(b'b'), HeadMove::Right, Some("A"))
            .build();
        assert_eq!(table.describe(&table.rules()[0]), "(BEGIN, *) -> ('b', R, A)");
    }
}
