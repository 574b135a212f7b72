//! Thin async wrappers over the filesystem calls the CLI needs

use anyhow::{Context, Result};
use std::path::{Component, Path};
use tokio::fs;
use walkdir::WalkDir;

/// True when `path` is relative and made only of plain segments (no `..`, root or drive)
pub fn is_contained(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// True when `name` is exactly one plain path segment
pub fn is_single_segment(name: &str) -> bool {
    is_contained(name) && Path::new(name).components().count() == 1
}

/// Check whether a path exists (errors count as "does not exist")
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// Create a directory and all of its parents
pub async fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Write a file, creating parent directories as needed. Existing content is replaced.
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote file");
    Ok(())
}

/// Copy a single file byte for byte, creating parent directories of the destination
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent).await?;
    }
    fs::copy(from, to)
        .await
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    Ok(())
}

/// Remove a single file. Returns false when nothing was there; directories are refused.
pub async fn remove_file(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", path.display()));
        }
    };
    if metadata.is_dir() {
        anyhow::bail!("Refusing to remove directory {}", path.display());
    }
    fs::remove_file(path)
        .await
        .with_context(|| format!("Failed to remove file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "removed");
    Ok(true)
}

/// Remove a file or directory tree. Returns false when nothing was there.
pub async fn remove_path(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", path.display()));
        }
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
            .await
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    } else {
        fs::remove_file(path)
            .await
            .with_context(|| format!("Failed to remove file: {}", path.display()))?;
    }
    tracing::debug!(path = %path.display(), "removed");
    Ok(true)
}

/// Number of entries directly inside a directory (0 when it does not exist)
pub async fn entry_count(path: &Path) -> Result<usize> {
    if !exists(path).await {
        return Ok(0);
    }
    let mut entries = fs::read_dir(path)
        .await
        .with_context(|| format!("Failed to read directory: {}", path.display()))?;
    let mut count = 0;
    while entries.next_entry().await?.is_some() {
        count += 1;
    }
    Ok(count)
}

/// Total size in bytes of every file under a path
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}
