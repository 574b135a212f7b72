//! Project templates
//!
//! This module provides:
//! - Template metadata types (RootManifest, TemplateManifest)
//! - Discovery of on-disk template directories
//! - Downloading remote template archives into the global cache
//! - Template copying with TypeScript/JavaScript filtering
//! - Version compatibility checking

pub mod copier;
pub mod fetcher;
pub mod manifest;
pub mod registry;
pub mod version;

use crate::paths;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use copier::copy_template;
pub use fetcher::TemplateFetcher;
pub use manifest::{Complexity, LanguageFiles, RootManifest, TemplateManifest};
pub use registry::{TemplateInfo, TemplateRegistry};
pub use version::check_compatibility;

/// Templates shipped alongside the sources, used by source checkouts
const BUNDLED_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");

/// Where templates will be read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// `--template-dir` or `EXPO_GENIE_TEMPLATE_DIR`
    Local(PathBuf),
    /// Previously downloaded archives in the global cache
    Cache(PathBuf),
    /// Templates next to the workspace sources
    Bundled(PathBuf),
    /// Nothing on disk; download into the cache
    Remote(PathBuf),
}

impl TemplateSource {
    /// Pick a source without touching the network.
    ///
    /// Precedence: explicit directory, `EXPO_GENIE_TEMPLATE_DIR`, a non-empty
    /// cache, bundled templates, then a remote download into the cache.
    pub fn select(explicit: Option<&Path>, home: &Path) -> Self {
        if let Some(dir) = explicit {
            return TemplateSource::Local(dir.to_path_buf());
        }
        if let Ok(dir) = std::env::var(paths::TEMPLATE_DIR_ENV) {
            if !dir.is_empty() {
                return TemplateSource::Local(PathBuf::from(dir));
            }
        }
        let cache = paths::template_cache(home);
        if cache.join(registry::TEMPLATE_FILE).is_file() {
            return TemplateSource::Cache(cache);
        }
        let bundled = PathBuf::from(BUNDLED_DIR);
        if bundled.join(registry::TEMPLATE_FILE).is_file() {
            return TemplateSource::Bundled(bundled);
        }
        TemplateSource::Remote(cache)
    }

    pub fn dir(&self) -> &Path {
        match self {
            TemplateSource::Local(dir)
            | TemplateSource::Cache(dir)
            | TemplateSource::Bundled(dir)
            | TemplateSource::Remote(dir) => dir,
        }
    }
}

/// Locate templates, downloading them when nothing is available locally
pub async fn resolve(explicit: Option<&Path>, home: &Path) -> Result<TemplateRegistry> {
    let source = TemplateSource::select(explicit, home);
    tracing::debug!(?source, "resolving templates");
    if let TemplateSource::Remote(cache) = &source {
        refresh_cache(cache).await?;
    }
    let registry = TemplateRegistry::discover(source.dir())?;
    if registry.is_empty() {
        anyhow::bail!("No templates found in {}", source.dir().display());
    }
    Ok(registry)
}

/// Download the remote templates into `cache`, replacing older copies
pub async fn refresh_cache(cache: &Path) -> Result<Vec<String>> {
    let fetcher = TemplateFetcher::from_env()?;
    let names = fetcher
        .download_all(cache)
        .await
        .with_context(|| format!("Failed to download templates from {}", fetcher.base()))?;
    tracing::info!(count = names.len(), cache = %cache.display(), "downloaded templates");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::registry::tests::write_template;

    #[test]
    fn test_explicit_dir_wins() {
        let home = tempfile::tempdir().unwrap();
        let source = TemplateSource::select(Some(Path::new("/tmp/mine")), home.path());
        assert_eq!(source, TemplateSource::Local(PathBuf::from("/tmp/mine")));
    }

    #[test]
    fn test_populated_cache_is_used() {
        let home = tempfile::tempdir().unwrap();
        let cache = paths::template_cache(home.path());
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache.join(registry::TEMPLATE_FILE), "templates: []\n").unwrap();

        // Only meaningful when the env override is not set in the test environment
        if std::env::var(paths::TEMPLATE_DIR_ENV).is_err() {
            assert_eq!(TemplateSource::select(None, home.path()), TemplateSource::Cache(cache));
        }
    }

    #[tokio::test]
    async fn test_resolve_local_directory() {
        let home = tempfile::tempdir().unwrap();
        let templates = tempfile::tempdir().unwrap();
        write_template(templates.path(), "blank", "description: Blank\nversion: 0.1.0\n", &[]);

        let registry = resolve(Some(templates.path()), home.path()).await.unwrap();
        assert!(registry.lookup("blank").is_some());
    }

    #[tokio::test]
    async fn test_resolve_empty_directory_fails() {
        let home = tempfile::tempdir().unwrap();
        let templates = tempfile::tempdir().unwrap();
        let err = resolve(Some(templates.path()), home.path()).await.unwrap_err();
        assert!(err.to_string().contains("No templates found"));
    }
}
