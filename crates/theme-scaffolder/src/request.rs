//! Building the scaffold request from CLI arguments and prompts

use crate::config::{ThemeConfig, LATEST_VERSION};
use crate::error::{Result, ScaffoldError};
use crate::prompt::Prompter;

/// Arguments accepted by the `scaffold-theme` command
#[derive(Debug, Clone)]
pub struct ScaffoldArgs {
    /// Theme folder name; prompted for when absent
    pub folder: Option<String>,

    /// Boilerplate version ("latest" or a git tag)
    pub boilerplate_version: String,

    /// Skip registering the namespace in composer.json
    pub no_autoload: bool,
}

impl Default for ScaffoldArgs {
    fn default() -> Self {
        Self {
            folder: None,
            boilerplate_version: LATEST_VERSION.to_string(),
            no_autoload: false,
        }
    }
}

/// Everything collected from the user for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    pub folder_name: String,
    pub display_name: String,
    /// Filled in by [`collect_namespace`] once the template is in place
    pub namespace: String,
    pub boilerplate_version: String,
    pub autoload_enabled: bool,
}

/// Normalize a theme folder name: trimmed, with every run of spaces and
/// dashes collapsed into a single dash
pub fn normalize_folder_name(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn validate_folder_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScaffoldError::Validation(
            "Your theme's folder name is invalid".to_string(),
        ));
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ScaffoldError::Validation(format!(
            "Your theme's folder name '{}' must not be a path",
            name
        )));
    }
    Ok(())
}

/// Resolve folder and display name; the namespace is asked for later
pub fn resolve_request(args: &ScaffoldArgs, prompter: &mut dyn Prompter) -> Result<ScaffoldRequest> {
    let raw_folder = match args.folder.as_deref().map(str::trim) {
        Some(folder) if !folder.is_empty() => folder.to_string(),
        _ => prompter.input("What is your theme's folder name?")?,
    };

    let folder_name = normalize_folder_name(&raw_folder);
    validate_folder_name(&folder_name)?;
    prompter.info(&format!("Scaffolding theme {}", folder_name))?;

    let display_name = prompter
        .input("What is your theme's real name? (for headers in style.css)")?
        .trim()
        .to_string();
    let display_name = if display_name.is_empty() {
        prompter.info("You did not provide any real name, using the folder name instead.")?;
        folder_name.clone()
    } else {
        display_name
    };

    Ok(ScaffoldRequest {
        folder_name,
        display_name,
        namespace: String::new(),
        boilerplate_version: args.boilerplate_version.trim().to_string(),
        autoload_enabled: !args.no_autoload,
    })
}

/// Ask for the theme namespace until the user confirms a non-reserved value
pub fn collect_namespace(config: &ThemeConfig, prompter: &mut dyn Prompter) -> Result<String> {
    let question = "What is your theme's namespace? (e.g: 'ClientName\\Theme\\MyThemeName')";

    loop {
        let value = prompter.input(question)?;
        let value = value.trim().trim_matches('\\').trim();
        if value.is_empty() {
            continue;
        }

        if !prompter.confirm(&format!("You have entered {}. Is that OK?", value))? {
            continue;
        }

        if config.is_reserved_namespace(value) {
            prompter.error("The namespace you chose is not allowed.")?;
            prompter.error(
                "Please choose a namespace matching your project like ClientName\\Theme\\MyThemeName.",
            )?;
            continue;
        }

        return Ok(value.to_string());
    }
}
