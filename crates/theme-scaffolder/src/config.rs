//! Scaffolding configuration
//!
//! Everything the workflow needs to know about the boilerplate lives here:
//! where to download it from, which placeholder strings it ships with, and
//! which namespaces are reserved. The caller builds a [`ThemeConfig`] once and
//! hands it to the [`Scaffolder`](crate::Scaffolder).

use crate::error::{Result, ScaffoldError};
use url::Url;

/// Environment variable overriding the boilerplate repository URL
pub const ARCHIVE_URL_ENV: &str = "SCAFFOLD_THEME_ARCHIVE_URL";

/// Boilerplate repository the archives are downloaded from
pub const DEFAULT_ARCHIVE_BASE_URL: &str = "https://github.com/BeAPI/beapi-frontend-framework";

/// Composer package type used to resolve the theme's install path
pub const WP_THEME_PACKAGE_TYPE: &str = "wordpress-theme";

/// Boilerplate version meaning "whatever is on the default branch"
pub const LATEST_VERSION: &str = "latest";

/// Configuration for a scaffolding run
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    /// Repository URL; archives are fetched from `<base>/archive/<ref>.zip`
    pub archive_base_url: String,

    /// Git ref downloaded when the requested version is "latest"
    pub default_branch: String,

    /// Theme name in the boilerplate's stylesheet header
    pub header_search_token: String,

    /// PHP namespace used throughout the boilerplate
    pub namespace_placeholder: String,

    /// Text domain used in translations and stylesheets
    pub text_domain_placeholder: String,

    /// File carrying the WordPress theme header
    pub header_file: String,

    /// File whose presence marks a complete boilerplate download
    pub marker_file: String,

    /// Substring identifying code files for token rewriting
    pub code_extension: String,

    /// Theme subdirectory registered in the autoload map
    pub code_subdir: String,

    /// Composer package type of the generated theme
    pub theme_package_type: String,

    /// Name of the download cache directory inside the vendor directory
    pub cache_dir_name: String,

    /// Namespaces the user may not pick (compared lowercase)
    pub reserved_namespaces: Vec<String>,

    /// User agent string for HTTP requests
    pub user_agent: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            default_branch: "master".to_string(),
            header_search_token: "Be API Frontend Framework".to_string(),
            namespace_placeholder: "BEA\\Theme\\Framework".to_string(),
            text_domain_placeholder: "beapi-frontend-framework".to_string(),
            header_file: "style.css".to_string(),
            marker_file: "index.php".to_string(),
            code_extension: "php".to_string(),
            code_subdir: "inc".to_string(),
            theme_package_type: WP_THEME_PACKAGE_TYPE.to_string(),
            cache_dir_name: "starter-theme".to_string(),
            reserved_namespaces: vec![
                "bea\\theme\\framework".to_string(),
                "beapi\\theme\\framework".to_string(),
            ],
            user_agent: concat!("scaffold-theme/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ThemeConfig {
    /// Default configuration with the archive URL taken from the environment
    /// when [`ARCHIVE_URL_ENV`] is set
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url_str) = std::env::var(ARCHIVE_URL_ENV) {
            config.archive_base_url = url_str;
        }
        config.base_url()?;
        Ok(config)
    }

    /// Parsed repository URL
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.archive_base_url).map_err(|e| {
            ScaffoldError::Validation(format!(
                "Invalid archive URL '{}': {}",
                self.archive_base_url, e
            ))
        })
    }

    /// Whether a namespace is on the reserved list (case-insensitive, trimmed)
    pub fn is_reserved_namespace(&self, namespace: &str) -> bool {
        let candidate = namespace.trim().to_lowercase();
        self.reserved_namespaces
            .iter()
            .any(|reserved| reserved.to_lowercase() == candidate)
    }
}

/// Whether a requested boilerplate version means the default branch
pub fn is_latest(version: &str) -> bool {
    let version = version.trim();
    version.is_empty() || version.eq_ignore_ascii_case(LATEST_VERSION)
}
