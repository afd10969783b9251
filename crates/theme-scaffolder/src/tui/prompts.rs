//! Charm-style CLI prompts using cliclack

use crate::config::ThemeConfig;
use crate::error::{Result as ScaffoldResult, ScaffoldError};
use crate::host::ComposerProject;
use crate::prompt::Prompter;
use crate::request::ScaffoldArgs;
use crate::scaffold::{ScaffoldOutcome, Scaffolder};
use crate::templates::HttpArchiveFetcher;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

/// [`Prompter`] rendering questions and log lines with cliclack
#[derive(Debug, Default, Clone, Copy)]
pub struct CliclackPrompter;

impl Prompter for CliclackPrompter {
    fn input(&mut self, question: &str) -> ScaffoldResult<String> {
        cliclack::input(question)
            .required(false)
            .interact()
            .map_err(ScaffoldError::Prompt)
    }

    fn confirm(&mut self, question: &str) -> ScaffoldResult<bool> {
        cliclack::confirm(question)
            .initial_value(true)
            .interact()
            .map_err(ScaffoldError::Prompt)
    }

    fn info(&mut self, message: &str) -> ScaffoldResult<()> {
        cliclack::log::info(message).map_err(ScaffoldError::Prompt)
    }

    fn success(&mut self, message: &str) -> ScaffoldResult<()> {
        cliclack::log::success(message).map_err(ScaffoldError::Prompt)
    }

    fn warning(&mut self, message: &str) -> ScaffoldResult<()> {
        cliclack::log::warning(message).map_err(ScaffoldError::Prompt)
    }

    fn error(&mut self, message: &str) -> ScaffoldResult<()> {
        cliclack::log::error(message).map_err(ScaffoldError::Prompt)
    }
}

/// Run the `scaffold-theme` command with interactive prompts
pub async fn run(config: ThemeConfig, args: ScaffoldArgs, working_dir: &Path) -> Result<()> {
    cliclack::intro("scaffold-theme")?;
    cliclack::log::info("Start a new theme with the Be API frontend framework.")?;

    // Step 1: Locate the Composer project
    let project = ComposerProject::discover(working_dir)?;
    let paths = project.paths().clone();

    // Step 2: Scaffold
    let fetcher = HttpArchiveFetcher::new(&config.user_agent);
    let scaffolder = Scaffolder::new(config, paths, project, fetcher);
    let outcome = scaffolder.run(&args, &mut CliclackPrompter).await?;

    // Step 3: Show next steps
    print_next_steps(&outcome)?;

    Ok(())
}

fn print_next_steps(outcome: &ScaffoldOutcome) -> Result<()> {
    let mut steps = Vec::new();
    if outcome.autoload_entry.is_some() {
        steps.push(format!(
            "Run {} to make the autoloading work",
            "composer dump-autoload".cyan()
        ));
    }
    steps.push(format!(
        "Activate the {} theme in WordPress",
        outcome.request.display_name.bold()
    ));

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro(format!(
        "Your theme is ready in {} :)",
        outcome.theme_path.display()
    ))?;

    Ok(())
}
