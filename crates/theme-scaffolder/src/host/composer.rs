//! Composer project discovery and installer-path resolution

use super::{InstallPathResolver, ProjectPaths};
use crate::error::{Result, ScaffoldError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Environment variable Composer reads the manifest file name from
const COMPOSER_ENV: &str = "COMPOSER";

/// Environment variable overriding `config.vendor-dir`
const VENDOR_DIR_ENV: &str = "COMPOSER_VENDOR_DIR";

const DEFAULT_MANIFEST: &str = "composer.json";
const DEFAULT_VENDOR_DIR: &str = "vendor";

/// The subset of composer.json the scaffolder reads
#[derive(Debug, Default, Deserialize)]
struct ComposerJson {
    #[serde(default)]
    config: ComposerConfig,
    #[serde(default)]
    extra: ComposerExtra,
}

#[derive(Debug, Default, Deserialize)]
struct ComposerConfig {
    #[serde(rename = "vendor-dir")]
    vendor_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ComposerExtra {
    /// composer/installers mapping of path pattern to package selectors
    #[serde(rename = "installer-paths", default)]
    installer_paths: Map<String, Value>,
}

/// A Composer project on disk
#[derive(Debug, Clone)]
pub struct ComposerProject {
    paths: ProjectPaths,
    /// Path patterns in declaration order, each with its selectors
    installer_paths: Vec<(String, Vec<String>)>,
}

impl ComposerProject {
    /// Locate composer.json in `working_dir`, honouring `COMPOSER` and
    /// `COMPOSER_VENDOR_DIR`
    pub fn discover(working_dir: &Path) -> Result<Self> {
        let file_name =
            std::env::var(COMPOSER_ENV).unwrap_or_else(|_| DEFAULT_MANIFEST.to_string());
        let mut project = Self::load(&working_dir.join(file_name))?;

        if let Ok(vendor_dir) = std::env::var(VENDOR_DIR_ENV) {
            project.paths.vendor_dir = project.paths.root.join(vendor_dir);
        }

        Ok(project)
    }

    /// Load a project from an explicit manifest path
    pub fn load(manifest: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(manifest).map_err(|e| {
            ScaffoldError::Host(format!(
                "Could not read {}: {}. Run this command from your Composer project root.",
                manifest.display(),
                e
            ))
        })?;
        Self::from_manifest(manifest, &content)
    }

    fn from_manifest(manifest: &Path, content: &str) -> Result<Self> {
        let parsed: ComposerJson = serde_json::from_str(content).map_err(|e| {
            ScaffoldError::Host(format!("Could not parse {}: {}", manifest.display(), e))
        })?;

        let root = manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let vendor_dir = root.join(
            parsed
                .config
                .vendor_dir
                .as_deref()
                .unwrap_or(DEFAULT_VENDOR_DIR),
        );

        let installer_paths = parsed
            .extra
            .installer_paths
            .into_iter()
            .map(|(pattern, selectors)| {
                let selectors = selectors
                    .as_array()
                    .map(|list| {
                        list.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                (pattern, selectors)
            })
            .collect();

        Ok(Self {
            paths: ProjectPaths {
                root,
                manifest: manifest.to_path_buf(),
                vendor_dir,
            },
            installer_paths,
        })
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// Install path pattern for a package, following composer/installers:
    /// the first `installer-paths` entry naming the package or its type wins
    fn install_pattern(&self, name: &str, type_tag: &str) -> Option<String> {
        let type_selector = format!("type:{}", type_tag);
        self.installer_paths
            .iter()
            .find(|(_, selectors)| {
                selectors
                    .iter()
                    .any(|selector| selector == &type_selector || selector == name)
            })
            .map(|(pattern, _)| pattern.clone())
            .or_else(|| default_pattern(type_tag).map(str::to_string))
    }
}

/// composer/installers defaults for the WordPress package types
fn default_pattern(type_tag: &str) -> Option<&'static str> {
    match type_tag {
        "wordpress-theme" => Some("wp-content/themes/{$name}/"),
        "wordpress-plugin" => Some("wp-content/plugins/{$name}/"),
        "wordpress-muplugin" => Some("wp-content/mu-plugins/{$name}/"),
        _ => None,
    }
}

impl InstallPathResolver for ComposerProject {
    fn resolve_install_path(&self, name: &str, type_tag: &str) -> Result<PathBuf> {
        let path = match self.install_pattern(name, type_tag) {
            Some(pattern) => {
                let expanded = pattern.replace("{$name}", name).replace("{$vendor}", "");
                self.paths.root.join(expanded.trim_end_matches('/'))
            }
            None => self.paths.vendor_dir.join(name),
        };
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(content: &str) -> ComposerProject {
        ComposerProject::from_manifest(Path::new("/srv/site/composer.json"), content).unwrap()
    }

    #[test]
    fn test_defaults_without_config() {
        let project = project(r#"{"name": "acme/site"}"#);

        assert_eq!(project.paths().root, PathBuf::from("/srv/site"));
        assert_eq!(project.paths().vendor_dir, PathBuf::from("/srv/site/vendor"));
        assert_eq!(
            project
                .resolve_install_path("my-theme", "wordpress-theme")
                .unwrap(),
            PathBuf::from("/srv/site/wp-content/themes/my-theme")
        );
    }

    #[test]
    fn test_installer_paths_by_type() {
        let project = project(
            r#"{
                "config": {"vendor-dir": "web/vendor"},
                "extra": {
                    "installer-paths": {
                        "web/app/mu-plugins/{$name}/": ["type:wordpress-muplugin"],
                        "web/app/themes/{$name}/": ["type:wordpress-theme"]
                    }
                }
            }"#,
        );

        assert_eq!(project.paths().vendor_dir, PathBuf::from("/srv/site/web/vendor"));
        assert_eq!(
            project
                .resolve_install_path("acme", "wordpress-theme")
                .unwrap(),
            PathBuf::from("/srv/site/web/app/themes/acme")
        );
    }

    #[test]
    fn test_installer_paths_by_name_takes_declaration_order() {
        let project = project(
            r#"{
                "extra": {
                    "installer-paths": {
                        "custom/{$name}/": ["acme"],
                        "web/app/themes/{$name}/": ["type:wordpress-theme"]
                    }
                }
            }"#,
        );

        assert_eq!(
            project
                .resolve_install_path("acme", "wordpress-theme")
                .unwrap(),
            PathBuf::from("/srv/site/custom/acme")
        );
        assert_eq!(
            project
                .resolve_install_path("other", "wordpress-theme")
                .unwrap(),
            PathBuf::from("/srv/site/web/app/themes/other")
        );
    }

    #[test]
    fn test_unknown_type_installs_into_vendor() {
        let project = project("{}");
        assert_eq!(
            project.resolve_install_path("thing", "library").unwrap(),
            PathBuf::from("/srv/site/vendor/thing")
        );
    }

    #[test]
    fn test_invalid_manifest_is_host_error() {
        let err =
            ComposerProject::from_manifest(Path::new("/srv/site/composer.json"), "{ nope").unwrap_err();
        assert!(matches!(err, ScaffoldError::Host(_)));
    }

    #[test]
    fn test_missing_manifest_is_host_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ComposerProject::load(&dir.path().join("composer.json")).unwrap_err();
        assert!(matches!(err, ScaffoldError::Host(_)));
    }
}
