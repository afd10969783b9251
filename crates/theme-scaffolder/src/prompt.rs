//! User interaction seam
//!
//! The workflow never talks to the terminal directly. Questions and progress
//! messages go through a [`Prompter`], which the `tui` feature implements with
//! cliclack and tests implement with a scripted list of answers.

use crate::error::Result;

/// Interactive questions plus progress reporting
pub trait Prompter {
    /// Ask a free-text question and return the raw answer
    fn input(&mut self, question: &str) -> Result<String>;

    /// Ask a yes/no question
    fn confirm(&mut self, question: &str) -> Result<bool>;

    fn info(&mut self, message: &str) -> Result<()>;

    fn success(&mut self, message: &str) -> Result<()>;

    fn warning(&mut self, message: &str) -> Result<()>;

    fn error(&mut self, message: &str) -> Result<()>;
}
