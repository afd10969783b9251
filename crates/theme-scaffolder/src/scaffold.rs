//! The scaffolding workflow
//!
//! One linear run per invocation:
//!
//! ```text
//! resolve request -> compute destination -> fetch template -> copy tree
//!   -> collect namespace -> rewrite placeholders -> patch composer.json
//! ```
//!
//! Nothing is rolled back. If rewriting or the manifest patch fails, the theme
//! directory is left as far as it got and the error says where it is.

use crate::config::ThemeConfig;
use crate::error::{Result, ScaffoldError};
use crate::host::{ArchiveFetcher, InstallPathResolver, ProjectPaths};
use crate::manifest::{autoload_path, patch_manifest, NAMESPACE_SEPARATOR};
use crate::prompt::Prompter;
use crate::request::{collect_namespace, resolve_request, ScaffoldArgs, ScaffoldRequest};
use crate::templates::{self, copy_tree, rewrite_file, rewrite_tokens, FileFilter, TemplateSource};
use std::path::{Path, PathBuf};

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    pub request: ScaffoldRequest,
    pub theme_path: PathBuf,
    /// Autoload entry added to composer.json, if any
    pub autoload_entry: Option<(String, String)>,
}

/// Drives a scaffolding run against a host project
pub struct Scaffolder<R, F> {
    config: ThemeConfig,
    paths: ProjectPaths,
    resolver: R,
    fetcher: F,
}

impl<R: InstallPathResolver, F: ArchiveFetcher> Scaffolder<R, F> {
    pub fn new(config: ThemeConfig, paths: ProjectPaths, resolver: R, fetcher: F) -> Self {
        Self {
            config,
            paths,
            resolver,
            fetcher,
        }
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// Install directory of the new theme; refuses to reuse an existing one
    pub fn compute_destination(&self, folder_name: &str) -> Result<PathBuf> {
        let path = self
            .resolver
            .resolve_install_path(folder_name, &self.config.theme_package_type)?;
        if path.is_dir() {
            return Err(ScaffoldError::AlreadyExists(path));
        }
        Ok(path)
    }

    /// Download URL and cache directory of a boilerplate version
    pub fn template_source(&self, version: &str) -> Result<TemplateSource> {
        TemplateSource::for_version(&self.config, version, &self.paths.vendor_dir)
    }

    /// Cached boilerplate directory for `version`, downloading it if needed
    pub async fn fetch_template(&self, version: &str) -> Result<PathBuf> {
        let source = self.template_source(version)?;
        templates::fetch_template(&self.fetcher, &source, &self.config.marker_file).await
    }

    /// Run the whole workflow
    pub async fn run(&self, args: &ScaffoldArgs, prompter: &mut dyn Prompter) -> Result<ScaffoldOutcome> {
        let mut request = resolve_request(args, prompter)?;
        let theme_path = self.compute_destination(&request.folder_name)?;

        let source = self.template_source(&request.boilerplate_version)?;
        if source.is_cached(&self.config.marker_file) {
            prompter.info(&format!(
                "Using cached boilerplate from {}",
                source.cached_path.display()
            ))?;
        } else {
            prompter.info(&format!("Downloading boilerplate from {}", source.archive_url))?;
        }
        let template_path = self.fetch_template(&request.boilerplate_version).await?;

        let summary = copy_tree(&template_path, &theme_path)?;
        prompter.success(&format!(
            "Copied {} files into {}",
            summary.files,
            theme_path.display()
        ))?;

        match self.customize(&mut request, &theme_path, prompter) {
            Ok(autoload_entry) => Ok(ScaffoldOutcome {
                request,
                theme_path,
                autoload_entry,
            }),
            Err(e) => {
                let _ = prompter.warning(&format!(
                    "{} was left partially customized",
                    theme_path.display()
                ));
                Err(e)
            }
        }
    }

    /// Everything after the copy: namespace, placeholders, autoload entry
    fn customize(
        &self,
        request: &mut ScaffoldRequest,
        theme_path: &Path,
        prompter: &mut dyn Prompter,
    ) -> Result<Option<(String, String)>> {
        let config = &self.config;
        request.namespace = collect_namespace(config, prompter)?;

        let code_and_style = FileFilter::code_and(&config.code_extension, &[&config.header_file]);
        let header = theme_path.join(&config.header_file);

        rewrite_tokens(
            theme_path,
            &config.namespace_placeholder,
            &request.namespace,
            &code_and_style,
        )?;
        if header.is_file() {
            rewrite_file(&header, &config.header_search_token, &request.display_name)?;
        }
        // Text domain in translations and stylesheets
        rewrite_tokens(
            theme_path,
            &config.text_domain_placeholder,
            &request.folder_name,
            &code_and_style,
        )?;
        if header.is_file() {
            rewrite_file(&header, &config.text_domain_placeholder, &request.folder_name)?;
        }

        if !request.autoload_enabled {
            return Ok(None);
        }

        let key = format!("{}{}", request.namespace, NAMESPACE_SEPARATOR);
        let value = format!(
            "{}/{}/",
            autoload_path(theme_path, &self.paths.root),
            config.code_subdir
        );
        patch_manifest(&self.paths.manifest, &request.namespace, &value)?;
        prompter.success(&format!(
            "The namespace has been added to {}",
            self.paths.manifest.display()
        ))?;

        Ok(Some((key, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::scripted::{text, yes, ScriptedPrompter};
    use std::cell::Cell;
    use std::fs;
    use url::Url;

    struct ThemesDir(PathBuf);

    impl InstallPathResolver for ThemesDir {
        fn resolve_install_path(&self, name: &str, type_tag: &str) -> Result<PathBuf> {
            assert_eq!(type_tag, "wordpress-theme");
            Ok(self.0.join(name))
        }
    }

    /// Writes a miniature boilerplate and counts downloads
    #[derive(Default)]
    struct FixtureFetcher {
        calls: Cell<usize>,
    }

    impl ArchiveFetcher for FixtureFetcher {
        async fn fetch_archive(&self, url: &Url, destination: &Path) -> Result<()> {
            self.calls.set(self.calls.get() + 1);
            assert!(url.as_str().ends_with("/archive/master.zip"));

            let files = [
                ("index.php", "<?php get_header();"),
                (
                    "style.css",
                    "/*\nTheme Name: Be API Frontend Framework\nText Domain: beapi-frontend-framework\n*/",
                ),
                (
                    "inc/Framework.php",
                    "<?php\nnamespace BEA\\Theme\\Framework;\n__( 'Hi', 'beapi-frontend-framework' );",
                ),
                ("package.json", "{\"name\": \"beapi-frontend-framework\"}"),
            ];
            for (name, content) in files {
                let path = destination.join(name);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, content).unwrap();
            }
            Ok(())
        }
    }

    struct FailingFetcher;

    impl ArchiveFetcher for FailingFetcher {
        async fn fetch_archive(&self, url: &Url, _destination: &Path) -> Result<()> {
            Err(ScaffoldError::download(url, "HTTP 404 Not Found"))
        }
    }

    struct Project {
        _dir: tempfile::TempDir,
        paths: ProjectPaths,
        themes: PathBuf,
    }

    fn project() -> Project {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let manifest = root.join("composer.json");
        fs::write(
            &manifest,
            "{\n    \"name\": \"acme/site\",\n    \"autoload\": {\n        \"psr-4\": {\n            \"Existing\\\\\": \"src/\"\n        }\n    }\n}\n",
        )
        .unwrap();
        Project {
            paths: ProjectPaths {
                manifest,
                vendor_dir: root.join("vendor"),
                root: root.clone(),
            },
            themes: root.join("web/app/themes"),
            _dir: dir,
        }
    }

    fn scaffolder<F: ArchiveFetcher>(project: &Project, fetcher: F) -> Scaffolder<ThemesDir, F> {
        Scaffolder::new(
            ThemeConfig::default(),
            project.paths.clone(),
            ThemesDir(project.themes.clone()),
            fetcher,
        )
    }

    fn args(folder: &str, no_autoload: bool) -> ScaffoldArgs {
        ScaffoldArgs {
            folder: Some(folder.to_string()),
            no_autoload,
            ..Default::default()
        }
    }

    #[test]
    fn test_compute_destination_refuses_existing_directory() {
        let project = project();
        let scaffolder = scaffolder(&project, FixtureFetcher::default());

        let path = scaffolder.compute_destination("acme").unwrap();
        assert_eq!(path, project.themes.join("acme"));

        fs::create_dir_all(project.themes.join("acme")).unwrap();
        let err = scaffolder.compute_destination("acme").unwrap_err();
        assert!(matches!(err, ScaffoldError::AlreadyExists(p) if p == project.themes.join("acme")));
    }

    #[tokio::test]
    async fn test_fetch_template_uses_vendor_cache() {
        let project = project();
        let scaffolder = scaffolder(&project, FixtureFetcher::default());

        let path = scaffolder.fetch_template("latest").await.unwrap();

        assert_eq!(path, project.paths.vendor_dir.join("starter-theme"));
        assert!(path.join("index.php").is_file());
        scaffolder.fetch_template("Latest").await.unwrap();
        assert_eq!(scaffolder.fetcher.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_run_end_to_end() {
        let project = project();
        let fetcher = FixtureFetcher::default();
        let scaffolder = scaffolder(&project, fetcher);
        let mut prompter = ScriptedPrompter::new(vec![
            text("My Theme"),
            text("Acme\\Theme\\MyTheme"),
            yes(),
        ]);

        let outcome = scaffolder
            .run(&args("my-theme", false), &mut prompter)
            .await
            .unwrap();

        let theme = project.themes.join("my-theme");
        assert_eq!(outcome.theme_path, theme);
        assert_eq!(outcome.request.namespace, "Acme\\Theme\\MyTheme");

        let code = fs::read_to_string(theme.join("inc/Framework.php")).unwrap();
        assert!(code.contains("namespace Acme\\Theme\\MyTheme;"));
        assert!(code.contains("'my-theme'"));
        assert!(!code.contains("BEA\\Theme\\Framework"));

        let style = fs::read_to_string(theme.join("style.css")).unwrap();
        assert!(style.contains("Theme Name: My Theme"));
        assert!(style.contains("Text Domain: my-theme"));

        // Not a code or style file
        let package = fs::read_to_string(theme.join("package.json")).unwrap();
        assert!(package.contains("beapi-frontend-framework"));

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&project.paths.manifest).unwrap()).unwrap();
        assert_eq!(manifest["autoload"]["psr-4"]["Existing\\"], "src/");
        assert_eq!(
            manifest["autoload"]["psr-4"]["Acme\\Theme\\MyTheme\\"],
            "web/app/themes/my-theme/inc/"
        );
        assert_eq!(
            outcome.autoload_entry,
            Some((
                "Acme\\Theme\\MyTheme\\".to_string(),
                "web/app/themes/my-theme/inc/".to_string()
            ))
        );
        assert_eq!(scaffolder.fetcher.calls.get(), 1);
    }

    #[tokio::test]
    async fn test_second_run_reuses_cached_template() {
        let project = project();
        let scaffolder = scaffolder(&project, FixtureFetcher::default());

        for folder in ["first", "second"] {
            let mut prompter =
                ScriptedPrompter::new(vec![text(""), text("Acme\\Theme\\Shop"), yes()]);
            scaffolder
                .run(&args(folder, true), &mut prompter)
                .await
                .unwrap();
        }

        assert_eq!(scaffolder.fetcher.calls.get(), 1);
        assert!(project.themes.join("second/index.php").is_file());
    }

    #[tokio::test]
    async fn test_run_without_autoload_leaves_manifest_alone() {
        let project = project();
        let before = fs::read_to_string(&project.paths.manifest).unwrap();
        let scaffolder = scaffolder(&project, FixtureFetcher::default());
        let mut prompter = ScriptedPrompter::new(vec![text(""), text("Acme\\Theme\\Shop"), yes()]);

        let outcome = scaffolder
            .run(&args("shop", true), &mut prompter)
            .await
            .unwrap();

        assert_eq!(outcome.autoload_entry, None);
        assert_eq!(outcome.request.display_name, "shop");
        assert_eq!(fs::read_to_string(&project.paths.manifest).unwrap(), before);
        let style = fs::read_to_string(project.themes.join("shop/style.css")).unwrap();
        assert!(style.contains("Theme Name: shop"));
    }

    #[tokio::test]
    async fn test_run_fails_when_theme_exists() {
        let project = project();
        fs::create_dir_all(project.themes.join("shop")).unwrap();
        let scaffolder = scaffolder(&project, FixtureFetcher::default());
        let mut prompter = ScriptedPrompter::new(vec![text("Shop")]);

        let err = scaffolder
            .run(&args("shop", false), &mut prompter)
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::AlreadyExists(_)));
        assert_eq!(scaffolder.fetcher.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_run_fails_on_download_error() {
        let project = project();
        let scaffolder = scaffolder(&project, FailingFetcher);
        let mut prompter = ScriptedPrompter::new(vec![text("Shop")]);

        let err = scaffolder
            .run(&args("shop", false), &mut prompter)
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::Download { .. }));
        assert!(!project.themes.join("shop").exists());
        assert!(!project.paths.vendor_dir.join("starter-theme").exists());
    }

    #[tokio::test]
    async fn test_run_fetches_requested_version() {
        let project = project();
        let scaffolder = scaffolder(&project, FailingFetcher);
        let mut prompter = ScriptedPrompter::new(vec![text("Shop")]);
        let args = ScaffoldArgs {
            boilerplate_version: "2.1.0".to_string(),
            ..args("shop", false)
        };

        let err = scaffolder.run(&args, &mut prompter).await.unwrap_err();

        match err {
            ScaffoldError::Download { url, .. } => assert_eq!(
                url,
                "https://github.com/BeAPI/beapi-frontend-framework/archive/2.1.0.zip"
            ),
            other => panic!("unexpected error: {}", other),
        }
        assert!(!project.paths.vendor_dir.join("starter-theme-2.1.0").exists());
    }

    #[tokio::test]
    async fn test_manifest_failure_reports_partial_theme() {
        let project = project();
        fs::write(&project.paths.manifest, "not json").unwrap();
        let scaffolder = scaffolder(&project, FixtureFetcher::default());
        let mut prompter = ScriptedPrompter::new(vec![text(""), text("Acme\\Theme\\Shop"), yes()]);

        let err = scaffolder
            .run(&args("shop", false), &mut prompter)
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::ManifestWrite { .. }));
        assert!(prompter
            .messages
            .iter()
            .any(|m| m.contains("partially customized")));
        // Rewrites before the failure stay in place
        let code = fs::read_to_string(project.themes.join("shop/inc/Framework.php")).unwrap();
        assert!(code.contains("Acme\\Theme\\Shop"));
    }
}
