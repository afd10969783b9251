//! TUI module - cliclack-based interactive prompts
//!
//! This module is only available when the `tui` feature is enabled.

pub mod prompts;

pub use prompts::{run, CliclackPrompter};
