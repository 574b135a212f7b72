//! Remote template archives
//!
//! A template host serves a root `template.yaml` index plus one
//! `<name>.zip` per template. Archives are unpacked into the global template
//! cache, which is then discovered like any local template directory.

use super::manifest::RootManifest;
use super::registry::TEMPLATE_FILE;
use crate::paths;
use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};
use url::Url;
use zip::ZipArchive;

/// Where templates are published when no override is set
pub const DEFAULT_TEMPLATE_URL: &str =
    "https://raw.githubusercontent.com/expo-genie/templates/main/dist/";

/// User agent sent with template and registry requests
pub const USER_AGENT: &str = concat!("expo-genie/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with the CLI user agent
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Downloads template archives from a base URL
pub struct TemplateFetcher {
    base: Url,
    client: reqwest::Client,
}

impl TemplateFetcher {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            client: http_client(),
        }
    }

    /// Base URL from `EXPO_GENIE_TEMPLATE_URL`, or the default host
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var(paths::TEMPLATE_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE_URL.to_string());
        let url = Url::parse(&url_str).with_context(|| format!("Invalid template URL: {}", url_str))?;
        Ok(Self::new(url))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    async fn get(&self, segment: &str) -> Result<reqwest::Response> {
        let url = Self::build_url(&self.base, segment)?;
        tracing::debug!(%url, "fetching");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;
        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
        }
        Ok(response)
    }

    /// Fetch the root index listing available templates
    pub async fn fetch_root_manifest(&self) -> Result<(RootManifest, String)> {
        let content = self.get(TEMPLATE_FILE).await?.text().await?;
        let manifest = RootManifest::parse(&content).context("Failed to parse root template manifest")?;
        Ok((manifest, content))
    }

    /// Fetch one template archive
    pub async fn fetch_archive(&self, template_name: &str) -> Result<Vec<u8>> {
        let bytes = self
            .get(&format!("{}.zip", template_name))
            .await
            .with_context(|| format!("Failed to fetch template '{}'", template_name))?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    /// Download every listed template into `cache`, replacing what was there.
    /// Returns the template names unpacked.
    pub async fn download_all(&self, cache: &Path) -> Result<Vec<String>> {
        let (root, index) = self.fetch_root_manifest().await?;
        std::fs::create_dir_all(cache)
            .with_context(|| format!("Failed to create {}", cache.display()))?;

        let mut unpacked = Vec::new();
        for name in &root.templates {
            let archive = match self.fetch_archive(name).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(template = %name, error = %e, "skipping template");
                    continue;
                }
            };
            let target = cache.join(name);
            if target.exists() {
                std::fs::remove_dir_all(&target)
                    .with_context(|| format!("Failed to clear {}", target.display()))?;
            }
            extract_zip(&archive, name, &target)?;
            unpacked.push(name.clone());
        }

        // Written last so a partial download is not mistaken for a complete cache
        std::fs::write(cache.join(TEMPLATE_FILE), index)
            .with_context(|| format!("Failed to write index in {}", cache.display()))?;
        Ok(unpacked)
    }
}

/// Unpack a template archive into `target`.
///
/// Entries are expected under a `<template_name>/` prefix, which is stripped.
/// Entries escaping the target directory are rejected.
pub fn extract_zip(zip_bytes: &[u8], template_name: &str, target: &Path) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(Cursor::new(zip_bytes))
        .with_context(|| format!("Failed to read zip archive for template '{}'", template_name))?;

    let prefix = format!("{}/", template_name);
    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let full_path = file.name().to_string();
        let relative = full_path.strip_prefix(&prefix).unwrap_or(&full_path).to_string();
        let relative_path = PathBuf::from(&relative);
        if relative.is_empty()
            || relative_path
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            anyhow::bail!(
                "Template '{}' archive contains an unsafe path: {}",
                template_name,
                full_path
            );
        }

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;

        let out = target.join(&relative_path);
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&out, &contents)
            .with_context(|| format!("Failed to write file: {}", out.display()))?;
        written.push(relative);
    }

    if !target.join(TEMPLATE_FILE).exists() {
        anyhow::bail!("Template '{}' archive is missing {}", template_name, TEMPLATE_FILE);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
            for (path, contents) in entries {
                zip.start_file(*path, options).unwrap();
                zip.write_all(contents.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_build_url_preserves_query() {
        let base = Url::parse("https://example.com/templates/?ref=main").unwrap();
        let url = TemplateFetcher::build_url(&base, "blank.zip").unwrap();
        assert_eq!(url.as_str(), "https://example.com/templates/blank.zip?ref=main");
    }

    #[test]
    fn test_extract_strips_prefix() {
        let zip = build_zip(&[
            ("blank/template.yaml", "description: Blank\nversion: 0.1.0\n"),
            ("blank/app/index.tsx", "export default function Index() {}\n"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("blank");

        let written = extract_zip(&zip, "blank", &target).unwrap();
        assert_eq!(written, vec!["template.yaml", "app/index.tsx"]);
        assert!(target.join("app/index.tsx").exists());
    }

    #[test]
    fn test_extract_rejects_traversal() {
        let zip = build_zip(&[
            ("evil/template.yaml", "description: x\nversion: 0.1.0\n"),
            ("evil/../../outside.txt", "nope"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        assert!(extract_zip(&zip, "evil", &dir.path().join("evil")).is_err());
        assert!(!dir.path().join("outside.txt").exists());
    }

    /// Serve `body` for every request on a local port
    async fn serve(body: &'static str) -> Url {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 2048];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        Url::parse(&format!("http://{}/", addr)).unwrap()
    }

    #[tokio::test]
    async fn test_download_leaves_directories_outside_cache_alone() {
        let base = serve("templates:\n  - ../victim\n").await;
        let dir = tempfile::tempdir().unwrap();
        let victim = dir.path().join("victim/important.txt");
        std::fs::create_dir_all(victim.parent().unwrap()).unwrap();
        std::fs::write(&victim, "keep").unwrap();

        let result = TemplateFetcher::new(base).download_all(&dir.path().join("cache")).await;
        assert!(result.is_err());
        assert!(victim.exists());
        assert!(!dir.path().join("cache").join(TEMPLATE_FILE).exists());
    }

    #[test]
    fn test_extract_requires_metadata() {
        let zip = build_zip(&[("blank/app/index.tsx", "")]);
        let dir = tempfile::tempdir().unwrap();
        let err = extract_zip(&zip, "blank", &dir.path().join("blank")).unwrap_err();
        assert!(err.to_string().contains("missing template.yaml"));
    }
}
