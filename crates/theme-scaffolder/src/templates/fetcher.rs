//! Boilerplate download and caching
//!
//! The boilerplate is a GitHub archive zip. It is unpacked once into a cache
//! directory inside the Composer vendor directory and reused by later runs
//! until the marker file disappears.

use crate::config::{is_latest, ThemeConfig};
use crate::error::{Result, ScaffoldError};
use crate::host::ArchiveFetcher;
use anyhow::Context;
use std::ffi::OsString;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use url::Url;
use zip::ZipArchive;

/// Where a boilerplate version is downloaded from and cached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub archive_url: Url,
    pub cached_path: PathBuf,
}

impl TemplateSource {
    /// Source for `version`: "latest" maps to the default branch archive,
    /// anything else to the archive of that tag
    pub fn for_version(config: &ThemeConfig, version: &str, vendor_dir: &Path) -> Result<Self> {
        let (git_ref, cache_dir) = if is_latest(version) {
            (config.default_branch.clone(), config.cache_dir_name.clone())
        } else {
            let version = version.trim();
            (
                version.to_string(),
                format!("{}-{}", config.cache_dir_name, cache_suffix(version)),
            )
        };

        let archive_url = Self::build_url(&config.base_url()?, &git_ref)?;
        Ok(Self {
            archive_url,
            cached_path: vendor_dir.join(cache_dir),
        })
    }

    /// `<base>/archive/<ref>.zip`, preserving query parameters
    fn build_url(base: &Url, git_ref: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ScaffoldError::Validation(format!("URL cannot have path segments: {}", base))
            })?
            .pop_if_empty()
            .push("archive")
            .push(&format!("{}.zip", git_ref));
        Ok(url)
    }

    /// Whether the cache already holds a complete download
    pub fn is_cached(&self, marker_file: &str) -> bool {
        self.cached_path.join(marker_file).is_file()
    }
}

/// Directory-safe rendering of a version string
fn cache_suffix(version: &str) -> String {
    version
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Make sure the boilerplate is in the cache, downloading it when the marker
/// file is missing, and return the cache directory
pub async fn fetch_template<F: ArchiveFetcher>(
    fetcher: &F,
    source: &TemplateSource,
    marker_file: &str,
) -> Result<PathBuf> {
    if source.is_cached(marker_file) {
        return Ok(source.cached_path.clone());
    }

    if let Err(e) = fetcher
        .fetch_archive(&source.archive_url, &source.cached_path)
        .await
    {
        discard_cache(&source.cached_path);
        return Err(e);
    }

    if !source.is_cached(marker_file) {
        discard_cache(&source.cached_path);
        return Err(ScaffoldError::download(
            &source.archive_url,
            format!(
                "{} is missing from {}",
                marker_file,
                source.cached_path.display()
            ),
        ));
    }

    Ok(source.cached_path.clone())
}

/// Drop an incomplete download so the next run fetches it again
fn discard_cache(cached_path: &Path) {
    if cached_path.exists() {
        let _ = std::fs::remove_dir_all(cached_path);
    }
}

/// [`ArchiveFetcher`] downloading over HTTP and unpacking zip archives
pub struct HttpArchiveFetcher {
    client: reqwest::Client,
}

impl HttpArchiveFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(user_agent: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl ArchiveFetcher for HttpArchiveFetcher {
    async fn fetch_archive(&self, url: &Url, destination: &Path) -> Result<()> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScaffoldError::download(url, e))?;

        if !response.status().is_success() {
            return Err(ScaffoldError::download(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ScaffoldError::download(url, e))?;

        extract_archive(&bytes, destination)
            .map_err(|e| ScaffoldError::download(url, format!("{:#}", e)))?;
        Ok(())
    }
}

/// Unpack a zip into `destination`, returning the number of files written.
///
/// When every entry sits under a single top-level directory (as in GitHub
/// archives) that directory is stripped. Entries whose names would escape the
/// destination are skipped. The archive is unpacked into a sibling staging
/// directory which replaces `destination` only once every entry is written.
pub fn extract_archive(zip_bytes: &[u8], destination: &Path) -> anyhow::Result<usize> {
    let mut archive =
        ZipArchive::new(Cursor::new(zip_bytes)).context("Failed to read zip archive")?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        if let Some(path) = file.enclosed_name() {
            entries.push((path, file.is_dir()));
        }
    }
    let prefix = common_root(&entries);

    let staging = staging_dir(destination)?;
    if staging.exists() {
        std::fs::remove_dir_all(&staging)
            .with_context(|| format!("Failed to clear {}", staging.display()))?;
    }

    let written = match unpack(&mut archive, prefix.as_deref(), &staging) {
        Ok(written) => written,
        Err(e) => {
            let _ = std::fs::remove_dir_all(&staging);
            return Err(e);
        }
    };

    if destination.exists() {
        std::fs::remove_dir_all(destination)
            .with_context(|| format!("Failed to replace {}", destination.display()))?;
    }
    std::fs::rename(&staging, destination)
        .with_context(|| format!("Failed to move archive into {}", destination.display()))?;

    Ok(written)
}

/// `<destination>.partial`, next to the destination
fn staging_dir(destination: &Path) -> anyhow::Result<PathBuf> {
    let name = destination
        .file_name()
        .with_context(|| format!("Invalid extraction target {}", destination.display()))?;
    let mut staged = name.to_os_string();
    staged.push(".partial");
    Ok(destination.with_file_name(staged))
}

fn unpack(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    prefix: Option<&Path>,
    target_root: &Path,
) -> anyhow::Result<usize> {
    std::fs::create_dir_all(target_root)
        .with_context(|| format!("Failed to create {}", target_root.display()))?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let Some(path) = file.enclosed_name() else {
            continue;
        };

        let relative = match prefix {
            Some(prefix) => path.strip_prefix(prefix).unwrap_or(path.as_path()).to_path_buf(),
            None => path.clone(),
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let target = target_root.join(&relative);
        if file.is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut out = std::fs::File::create(&target)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        std::io::copy(&mut file, &mut out)
            .with_context(|| format!("Failed to extract {}", relative.display()))?;
        written += 1;
    }

    Ok(written)
}

/// Top-level directory shared by every entry, if there is exactly one
fn common_root(entries: &[(PathBuf, bool)]) -> Option<PathBuf> {
    let mut root: Option<OsString> = None;

    for (path, is_dir) in entries {
        let mut components = path.components();
        let first = match components.next() {
            Some(Component::Normal(first)) => first,
            _ => return None,
        };
        // A file sitting at the archive root rules out stripping
        if components.next().is_none() && !is_dir {
            return None;
        }
        match &root {
            Some(existing) if existing.as_os_str() != first => return None,
            Some(_) => {}
            None => root = Some(first.to_os_string()),
        }
    }

    root.map(PathBuf::from)
}
