//! npm registry lookups for packages outside the built-in registries

use crate::templates::fetcher::http_client;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

/// Public npm registry
pub const REGISTRY_URL: &str = "https://registry.npmjs.org/";

#[derive(Debug, Deserialize)]
struct LatestManifest {
    version: String,
}

/// Package name of an install spec: `lodash@4` -> `lodash`, `@scope/pkg@1` -> `@scope/pkg`
pub fn package_name(spec: &str) -> &str {
    let spec = spec.trim();
    let search_from = usize::from(spec.starts_with('@'));
    match spec[search_from..].find('@') {
        Some(idx) => &spec[..search_from + idx],
        None => spec,
    }
}

/// `<registry>/<name>/latest`, with a scoped name kept as one path segment
fn latest_url(registry: &Url, name: &str) -> Result<Url> {
    let mut url = registry.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", registry))?
        .pop_if_empty()
        .push(name)
        .push("latest");
    Ok(url)
}

/// Latest published version of a package, `None` when the registry does not know it
pub async fn latest_version(spec: &str) -> Result<Option<String>> {
    let registry = Url::parse(REGISTRY_URL)?;
    let url = latest_url(&registry, package_name(spec))?;
    tracing::debug!(%url, "checking npm registry");

    let response = http_client()
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !response.status().is_success() {
        anyhow::bail!("npm registry returned HTTP {} for {}", response.status(), url);
    }
    let manifest: LatestManifest = response.json().await.context("Unexpected npm registry response")?;
    Ok(Some(manifest.version))
}
