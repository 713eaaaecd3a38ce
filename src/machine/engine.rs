// Transition engine for the write-once machine

use crate::machine::config::MachineConfig;
use crate::machine::errors::MachineError;
use crate::machine::mediator::WormTape;
use crate::machine::rules::{Pattern, RuleTable, StateId};
use crate::snapshot::{Snapshot, SnapshotManager};
use crate::tape::virtual_tape::VirtualHead;
use crate::tape::{display_symbol, Symbol};
use std::fmt;
use tracing::{debug, info, warn};

/// Result of a single transition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Fired { rule_index: usize },
    /// No rule matched the current state and symbol
    Halted,
}

/// Why [`Machine::run`] stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Halted { steps: usize },
    StepLimitReached { steps: usize },
}

/// The observable result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub final_state: StateId,
    pub final_state_name: String,
    pub head_position: usize,
    pub final_symbol: Symbol,
    pub cells_consumed: usize,
    pub steps: usize,
    pub head_travel: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Final state: {} ({})",
            self.final_state_name, self.final_state.0
        )?;
        writeln!(
            f,
            "Final position on the (virtual) tape: {}",
            self.head_position
        )?;
        writeln!(
            f,
            "Final symbol on the tape: {} ({})",
            self.final_symbol,
            display_symbol(self.final_symbol)
        )?;
        writeln!(f, "-----")?;
        writeln!(f, "Statistics")?;
        writeln!(f, "Physical tape length: {}", self.cells_consumed)?;
        writeln!(f, "Steps: {}", self.steps)?;
        write!(f, "Physical head travel: {}", self.head_travel)
    }
}

/// The machine: rule table, control state, virtual head and the write-once tape
pub struct Machine {
    /// Transition rules, tried in order
    rules: RuleTable,

    /// Both tapes behind the read/write mediator
    tape: WormTape,

    /// Current control state
    state: StateId,

    /// Current logical position
    virtual_head: VirtualHead,

    config: MachineConfig,

    /// Transitions fired so far
    steps_taken: usize,

    /// Index of the last rule that fired
    last_rule: Option<usize>,

    /// Whether a step found no matching rule
    halted: bool,

    /// Snapshot manager for time-travel navigation
    snapshot_manager: SnapshotManager,

    /// Current position in recorded history
    history_position: usize,

    /// Set once the snapshot budget runs out; recording stops, the run does not
    history_overflow: Option<MachineError>,
}

impl Machine {
    /// Create a machine in the table's start state with both heads at 0
    pub fn new(rules: RuleTable, config: MachineConfig) -> Result<Self, MachineError> {
        let tape = WormTape::new(config.physical_capacity, config.virtual_capacity)?;

        Ok(Machine {
            state: rules.start(),
            rules,
            tape,
            virtual_head: VirtualHead::new(config.virtual_capacity),
            config,
            steps_taken: 0,
            last_rule: None,
            halted: false,
            snapshot_manager: SnapshotManager::new(config.snapshot_limit),
            history_position: 0,
            history_overflow: None,
        })
    }

    /// Write `input` at logical positions `0..input.len()`, one fresh cell each
    pub fn load_input(&mut self, input: &[u8]) -> Result<(), MachineError> {
        for (position, &symbol) in input.iter().enumerate() {
            self.tape.logical_write(position, symbol)?;
        }
        Ok(())
    }

    /// Apply the transition function once
    pub fn step(&mut self) -> Result<StepOutcome, MachineError> {
        let position = self.virtual_head.position();
        let symbol = self.tape.logical_read(position)?;

        let (rule_index, rule) = match self.rules.find_match(self.state, symbol) {
            Some((index, rule)) => (index, *rule),
            None => {
                self.halted = true;
                info!(
                    state = self.rules.states().name(self.state),
                    position, symbol, "no rule matches, halting"
                );
                return Ok(StepOutcome::Halted);
            }
        };

        debug!(
            rule = rule_index,
            state = self.rules.states().name(self.state),
            position,
            symbol,
            "rule fired"
        );

        self.state = rule.state_out.resolve(self.state);
        if let Pattern::Exact(symbol_out) = rule.symbol_out {
            self.tape.logical_write(position, symbol_out)?;
        }
        if let Some(direction) = rule.head_move.direction() {
            self.virtual_head.move_by(direction)?;
        }

        self.steps_taken += 1;
        self.last_rule = Some(rule_index);
        Ok(StepOutcome::Fired { rule_index })
    }

    /// Step according to the configured policy, recording history as it goes.
    ///
    /// On a fatal error the history recorded so far is kept; the tape is not rolled back.
    /// Running out of history budget only stops recording (see [`Machine::history_overflow`]).
    /// Running from an earlier point of history discards the snapshots after it.
    pub fn run(&mut self) -> Result<RunOutcome, MachineError> {
        if self.snapshot_manager.is_empty() {
            self.take_snapshot();
        } else if self.history_overflow.is_none() {
            self.snapshot_manager.truncate(self.history_position + 1);
        }

        let max_steps = self.config.policy.max_steps();
        let mut fired = 0;

        while fired < max_steps {
            match self.step() {
                Ok(StepOutcome::Fired { .. }) => {
                    fired += 1;
                    self.take_snapshot();
                }
                Ok(StepOutcome::Halted) => {
                    // Only when the last snapshot is the state that halted
                    if self.history_overflow.is_none() {
                        if let Some(last) = self.snapshot_manager.last_mut() {
                            last.halted = true;
                        }
                    }
                    return Ok(RunOutcome::Halted {
                        steps: self.steps_taken,
                    });
                }
                Err(e) => {
                    warn!(step = self.steps_taken, "run aborted: {}", e);
                    return Err(e);
                }
            }
        }

        info!(steps = self.steps_taken, "step limit reached");
        Ok(RunOutcome::StepLimitReached {
            steps: self.steps_taken,
        })
    }

    /// Collect the final observables. Reads the symbol under the head through the
    /// tape, so the physical head moves.
    pub fn report(&mut self) -> Result<RunReport, MachineError> {
        let head_position = self.virtual_head.position();
        let final_symbol = self.tape.logical_read(head_position)?;

        Ok(RunReport {
            final_state: self.state,
            final_state_name: self.rules.states().name(self.state).to_string(),
            head_position,
            final_symbol,
            cells_consumed: self.tape.cells_consumed(),
            steps: self.steps_taken,
            head_travel: self.tape.head().travelled(),
        })
    }

    /// Take a snapshot of the current machine state, unless the budget already ran out
    fn take_snapshot(&mut self) {
        if self.history_overflow.is_some() {
            return;
        }

        let snapshot = Snapshot {
            tape: self.tape.checkpoint(),
            state: self.state,
            virtual_head: self.virtual_head,
            steps_taken: self.steps_taken,
            last_rule: self.last_rule,
            halted: self.halted,
        };

        match self.snapshot_manager.push(snapshot) {
            Ok(()) => self.history_position = self.snapshot_manager.len() - 1,
            Err(needed) => {
                let err = MachineError::SnapshotLimitExceeded {
                    current: needed,
                    limit: self.snapshot_manager.memory_limit(),
                };
                warn!(step = self.steps_taken, "{}; history recording stopped", err);
                self.history_overflow = Some(err);
            }
        }
    }

    /// Step backward in recorded history
    pub fn step_backward(&mut self) -> Result<(), MachineError> {
        if self.history_position == 0 {
            return Err(MachineError::HistoryUnavailable {
                message: "Already at the beginning of execution".to_string(),
            });
        }
        self.goto_snapshot(self.history_position - 1)
    }

    /// Step forward in recorded history
    pub fn step_forward(&mut self) -> Result<(), MachineError> {
        if self.history_position + 1 >= self.snapshot_manager.len() {
            return Err(MachineError::HistoryUnavailable {
                message: "No more snapshots available (execution finished)".to_string(),
            });
        }
        self.goto_snapshot(self.history_position + 1)
    }

    /// Rewind to the beginning of recorded history
    pub fn rewind_to_start(&mut self) -> Result<(), MachineError> {
        self.goto_snapshot(0)
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), MachineError> {
        let last = self.snapshot_manager.len().saturating_sub(1);
        self.goto_snapshot(last)
    }

    /// Restore machine state from a recorded snapshot
    fn goto_snapshot(&mut self, index: usize) -> Result<(), MachineError> {
        let snapshot = self.snapshot_manager.get(index).ok_or_else(|| {
            MachineError::HistoryUnavailable {
                message: format!("Snapshot {} not found in history", index),
            }
        })?;

        self.tape.restore(&snapshot.tape);
        self.state = snapshot.state;
        self.virtual_head = snapshot.virtual_head;
        self.steps_taken = snapshot.steps_taken;
        self.last_rule = snapshot.last_rule;
        self.halted = snapshot.halted;
        self.history_position = index;
        Ok(())
    }

    // ========== Getter methods for UI ==========

    pub fn state(&self) -> StateId {
        self.state
    }

    pub fn state_name(&self) -> &str {
        self.rules.states().name(self.state)
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn tape(&self) -> &WormTape {
        &self.tape
    }

    pub fn head_position(&self) -> usize {
        self.virtual_head.position()
    }

    /// Symbol under the virtual head, without moving the physical head
    pub fn current_symbol(&self) -> Result<Symbol, MachineError> {
        self.tape.peek(self.virtual_head.position())
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn last_rule(&self) -> Option<usize> {
        self.last_rule
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.len()
    }

    /// Why recorded history stops short of the end of the run, if it does
    pub fn history_overflow(&self) -> Option<&MachineError> {
        self.history_overflow.as_ref()
    }

    pub fn history_memory(&self) -> usize {
        self.snapshot_manager.memory_usage()
    }
}
