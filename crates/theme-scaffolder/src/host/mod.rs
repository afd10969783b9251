//! Capabilities borrowed from the host Composer project
//!
//! The scaffolder only needs two things from the package manager: where a
//! package of a given type gets installed, and a way to download and unpack an
//! archive. Both are traits so the workflow can run against a fake host in
//! tests.

pub mod composer;

use crate::error::Result;
use std::path::{Path, PathBuf};
use url::Url;

pub use composer::ComposerProject;

/// Install directory lookup for a synthetic package
pub trait InstallPathResolver {
    /// Directory a package called `name` of type `type_tag` would be installed to
    fn resolve_install_path(&self, name: &str, type_tag: &str) -> Result<PathBuf>;
}

/// Download-and-unpack of a distribution archive
#[allow(async_fn_in_trait)]
pub trait ArchiveFetcher {
    /// Fetch the archive at `url` and extract it into `destination`
    async fn fetch_archive(&self, url: &Url, destination: &Path) -> Result<()>;
}

/// Locations inside the host project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Directory holding composer.json
    pub root: PathBuf,
    /// composer.json itself
    pub manifest: PathBuf,
    /// Composer vendor directory, also home of the boilerplate cache
    pub vendor_dir: PathBuf,
}
