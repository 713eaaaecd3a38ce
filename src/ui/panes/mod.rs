//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`rules`]: Rule table with the last fired rule highlighted
//! - [`tape`]: Virtual tape with slot → physical cell mapping
//! - [`physical`]: Physical store with live/stale/fresh cells
//! - [`motion`]: Physical head motion log
//! - [`status`]: Status bar with keybindings and run state
//! - `utils`: Shared block and scrolling helpers
//!
//! Each pane module exports a primary `render_*` function plus any state or
//! render-data types it needs.

mod utils;

pub mod motion;
pub mod physical;
pub mod rules;
pub mod status;
pub mod tape;

// Re-export render functions for convenience
pub use motion::render_motion_pane;
pub use physical::render_physical_pane;
pub use rules::{render_rules_pane, RulesRenderData};
pub use status::{render_status_bar, StatusRenderData};
pub use tape::{render_virtual_tape_pane, TapeScrollState, VirtualTapeRenderData};
