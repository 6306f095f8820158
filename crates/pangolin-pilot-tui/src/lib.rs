//! pangolin-pilot-tui: Terminal UI for pangolin-pilot
//!
//! This crate provides a Ratatui-based TUI using the Component pattern:
//! one wizard component driving the whole setup flow, with async call
//! results delivered back to the event loop over a channel.

pub mod action;
pub mod app;
pub mod clipboard;
pub mod components;
pub mod persist;
pub mod tui;

pub use app::App;
