//! Boilerplate fetching, copying, and customization
//!
//! This module provides:
//! - Template source resolution and download caching
//! - Zip extraction of the boilerplate archive
//! - Recursive copy into the theme directory
//! - Placeholder rewriting in the copied files

pub mod copier;
pub mod fetcher;
pub mod rewrite;

pub use copier::{copy_tree, CopySummary};
pub use fetcher::{extract_archive, fetch_template, HttpArchiveFetcher, TemplateSource};
pub use rewrite::{rewrite_file, rewrite_tokens, FileFilter};
