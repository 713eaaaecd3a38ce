//! Main TUI application state and logic

use super::panes::{
    self, RulesRenderData, StatusRenderData, TapeScrollState, VirtualTapeRenderData,
};
use crate::machine::engine::Machine;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Rules,
    Motion,
    VirtualTape,
    PhysicalTape,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: rules -> motion -> virtual -> physical)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Rules => FocusedPane::Motion,
            FocusedPane::Motion => FocusedPane::VirtualTape,
            FocusedPane::VirtualTape => FocusedPane::PhysicalTape,
            FocusedPane::PhysicalTape => FocusedPane::Rules,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Rules => FocusedPane::PhysicalTape,
            FocusedPane::Motion => FocusedPane::Rules,
            FocusedPane::VirtualTape => FocusedPane::Motion,
            FocusedPane::PhysicalTape => FocusedPane::VirtualTape,
        }
    }
}

/// The main application state
pub struct App {
    /// The machine, with its run already recorded
    pub machine: Machine,

    /// Fatal error that ended the run, shown at the end of history
    pub run_error: Option<String>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub rules_scroll: usize,
    pub motion_scroll: usize,
    pub virtual_scroll: TapeScrollState,
    pub physical_scroll: TapeScrollState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app over a recorded machine run
    pub fn new(machine: Machine, run_error: Option<String>) -> Self {
        let status_message = match machine.history_overflow() {
            Some(e) => format!("{}; later steps were not recorded", e),
            None => String::from("Ready!"),
        };
        App {
            machine,
            run_error,
            focused_pane: FocusedPane::VirtualTape,
            rules_scroll: 0,
            motion_scroll: usize::MAX,
            virtual_scroll: TapeScrollState::default(),
            physical_scroll: TapeScrollState::default(),
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.machine.step_forward().is_ok() {
                    self.status_message = "Playing...".to_string();
                    self.motion_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        // Left column: Rules (top) | Motion log (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        // Right column: Virtual tape (top) | Physical tape (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        panes::render_rules_pane(
            frame,
            left_rows[0],
            RulesRenderData {
                rules: self.machine.rules(),
                state_name: self.machine.state_name(),
                last_rule: self.machine.last_rule(),
                halted: self.machine.is_halted(),
            },
            self.focused_pane == FocusedPane::Rules,
            &mut self.rules_scroll,
        );

        panes::render_motion_pane(
            frame,
            left_rows[1],
            self.machine.tape().head().log(),
            self.focused_pane == FocusedPane::Motion,
            &mut self.motion_scroll,
        );

        panes::render_virtual_tape_pane(
            frame,
            right_rows[0],
            VirtualTapeRenderData {
                tape: self.machine.tape(),
                head_position: self.machine.head_position(),
            },
            self.focused_pane == FocusedPane::VirtualTape,
            &mut self.virtual_scroll,
        );

        panes::render_physical_pane(
            frame,
            right_rows[1],
            self.machine.tape(),
            self.focused_pane == FocusedPane::PhysicalTape,
            &mut self.physical_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_snapshot: self.machine.history_position(),
                total_snapshots: self.machine.total_snapshots(),
                run_error: self.run_error.as_deref(),
                halted: self.machine.is_halted(),
                is_playing: self.is_playing,
                cells_used: (
                    self.machine.tape().cells_consumed(),
                    self.machine.tape().store().capacity(),
                ),
                history_truncated: self.machine.history_overflow().is_some(),
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let stepped = (0..n)
                    .take_while(|_| self.machine.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.motion_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Rules => {
                    self.rules_scroll = self.rules_scroll.saturating_sub(1);
                }
                FocusedPane::Motion => {
                    self.motion_scroll = self.motion_scroll.saturating_sub(1);
                }
                FocusedPane::VirtualTape => {
                    self.virtual_scroll.offset = self.virtual_scroll.offset.saturating_sub(1);
                }
                FocusedPane::PhysicalTape => {
                    self.physical_scroll.offset = self.physical_scroll.offset.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Rules => {
                    self.rules_scroll = self.rules_scroll.saturating_add(1);
                }
                FocusedPane::Motion => {
                    self.motion_scroll = self.motion_scroll.saturating_add(1);
                }
                FocusedPane::VirtualTape => {
                    self.virtual_scroll.offset = self.virtual_scroll.offset.saturating_add(1);
                }
                FocusedPane::PhysicalTape => {
                    self.physical_scroll.offset = self.physical_scroll.offset.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.status_message = match self.machine.jump_to_end() {
                    Ok(()) => "Jumped to end".to_string(),
                    Err(e) => e.to_string(),
                };
                self.motion_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.status_message = match self.machine.rewind_to_start() {
                    Ok(()) => "Jumped to start".to_string(),
                    Err(e) => e.to_string(),
                };
                self.motion_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    /// Step forward in recorded history
    fn step_forward(&mut self) {
        match self.machine.step_forward() {
            Ok(()) => {
                self.status_message = "Stepped forward".to_string();
                // Auto-scroll motion log to bottom
                self.motion_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step forward: {}", e);
            }
        }
    }

    /// Step backward in recorded history
    fn step_backward(&mut self) {
        match self.machine.step_backward() {
            Ok(()) => {
                self.status_message = "Stepped backward".to_string();
                self.motion_scroll = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Cannot step backward: {}", e);
            }
        }
    }
}
