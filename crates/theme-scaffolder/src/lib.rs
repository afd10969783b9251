//! Theme Scaffolder - WordPress theme scaffolding for Composer projects
//!
//! This library creates a new WordPress theme from the Be API frontend
//! framework boilerplate: it downloads (or reuses) the boilerplate archive,
//! copies it into the theme directory Composer would install a
//! `wordpress-theme` package to, rewrites the boilerplate's namespace, theme
//! name and text domain, and registers the new namespace in composer.json.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - template download/caching, tree copy,
//!   placeholder rewriting, composer.json patching
//! - **Layer 2: Workflow Orchestration** - [`Scaffolder`], driven through the
//!   [`Prompter`], [`InstallPathResolver`] and [`ArchiveFetcher`] seams
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use theme_scaffolder::{ComposerProject, HttpArchiveFetcher, Scaffolder, ThemeConfig};
//!
//! let config = ThemeConfig::from_env()?;
//! let project = ComposerProject::discover(&std::env::current_dir()?)?;
//! let fetcher = HttpArchiveFetcher::new(&config.user_agent);
//! let scaffolder = Scaffolder::new(config, project.paths().clone(), project, fetcher);
//! let outcome = scaffolder.run(&args, &mut my_prompter).await?;
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod manifest;
pub mod prompt;
pub mod request;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::ThemeConfig;
pub use error::ScaffoldError;
pub use host::{ArchiveFetcher, ComposerProject, InstallPathResolver, ProjectPaths};
pub use prompt::Prompter;
pub use request::{ScaffoldArgs, ScaffoldRequest};
pub use scaffold::{ScaffoldOutcome, Scaffolder};
pub use templates::{HttpArchiveFetcher, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
