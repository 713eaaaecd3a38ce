//! Write-once machine execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The [`Machine`](engine::Machine) and its transition loop
//! - [`mediator`]: [`WormTape`](mediator::WormTape), the only bridge between the two tapes
//! - [`rules`]: Rule, pattern and rule table types
//! - [`config`]: Capacities and step policy
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! Each step reads the symbol under the virtual head, finds the first matching
//! rule, then applies its state change, its write and its head move in that
//! order. A snapshot is taken after every step to enable time-travel viewing.

pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod mediator;
pub mod rules;
