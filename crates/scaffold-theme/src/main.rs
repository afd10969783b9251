//! scaffold-theme - Bootstrap a WordPress theme from the Be API frontend framework

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use theme_scaffolder::{ScaffoldArgs, ThemeConfig};

#[derive(Parser, Debug)]
#[command(name = "scaffold-theme")]
#[command(about = "Bootstrap a new WordPress theme using Be API's frontend framework")]
#[command(version)]
pub struct Args {
    /// Your theme's folder name
    pub folder: Option<String>,

    /// Which boilerplate version to use ("latest" or a release tag)
    #[arg(long = "boilerplate-version", default_value = "latest")]
    pub boilerplate_version: String,

    /// Do not add the theme namespace to the composer.json autoload section
    #[arg(long = "no-autoload")]
    pub no_autoload: bool,

    /// Use the given directory as the Composer project root
    #[arg(short = 'd', long = "working-dir")]
    pub working_dir: Option<PathBuf>,
}

impl From<&Args> for ScaffoldArgs {
    fn from(args: &Args) -> Self {
        ScaffoldArgs {
            folder: args.folder.clone(),
            boilerplate_version: args.boilerplate_version.clone(),
            no_autoload: args.no_autoload,
        }
    }
}

async fn scaffold(args: Args) -> Result<()> {
    let config = ThemeConfig::from_env()?;
    let working_dir = match &args.working_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    theme_scaffolder::run(config, (&args).into(), &working_dir).await
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let result = scaffold(Args::parse()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        eprintln!();
        eprintln!("  {} {:#}", console::style("oops!").red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["scaffold-theme", "my-theme"]).unwrap();
        let scaffold_args = ScaffoldArgs::from(&args);

        assert_eq!(scaffold_args.folder.as_deref(), Some("my-theme"));
        assert_eq!(scaffold_args.boilerplate_version, "latest");
        assert!(!scaffold_args.no_autoload);
        assert!(args.working_dir.is_none());
    }

    #[test]
    fn test_parse_all_options() {
        let args = Args::try_parse_from([
            "scaffold-theme",
            "shop",
            "--boilerplate-version=2.1.0",
            "--no-autoload",
            "-d",
            "/srv/site",
        ])
        .unwrap();

        assert_eq!(args.boilerplate_version, "2.1.0");
        assert!(args.no_autoload);
        assert_eq!(args.working_dir, Some(PathBuf::from("/srv/site")));
    }

    #[test]
    fn test_folder_is_optional() {
        let args = Args::try_parse_from(["scaffold-theme"]).unwrap();
        assert!(ScaffoldArgs::from(&args).folder.is_none());
    }
}
