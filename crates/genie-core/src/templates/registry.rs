//! On-disk template discovery

use super::manifest::{LanguageFiles, RootManifest, TemplateManifest};
use crate::error::GenieError;
use crate::registry::{Registry, RegistryEntry};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Per-template and root metadata file name
pub const TEMPLATE_FILE: &str = "template.yaml";

/// A discovered template directory
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub dir: PathBuf,
    pub manifest: TemplateManifest,
}

impl RegistryEntry for TemplateInfo {
    fn key(&self) -> &str {
        &self.manifest.name
    }

    fn name(&self) -> &str {
        self.manifest.title()
    }

    fn description(&self) -> &str {
        &self.manifest.description
    }
}

/// Templates found under one root directory
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    root: PathBuf,
    language_files: LanguageFiles,
    templates: Registry<TemplateInfo>,
}

impl TemplateRegistry {
    /// Scan `root` for `<name>/template.yaml`.
    ///
    /// A root `template.yaml` index, when present, supplies the language file
    /// patterns and the listing order. Templates whose metadata fails to parse
    /// are skipped with a warning.
    pub fn discover(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            anyhow::bail!("Template directory not found: {}", root.display());
        }

        let index_path = root.join(TEMPLATE_FILE);
        let index: Option<RootManifest> = if index_path.exists() {
            let content = std::fs::read_to_string(&index_path)
                .with_context(|| format!("Failed to read {}", index_path.display()))?;
            Some(
                RootManifest::parse(&content)
                    .with_context(|| format!("Failed to parse {}", index_path.display()))?,
            )
        } else {
            None
        };

        let mut found = Vec::new();
        for entry in WalkDir::new(root).min_depth(2).max_depth(2) {
            let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
            if !entry.file_type().is_file() || entry.file_name() != TEMPLATE_FILE {
                continue;
            }
            let Some(dir) = entry.path().parent() else {
                continue;
            };
            match read_template(dir) {
                Ok(info) => found.push(info),
                Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "skipping template"),
            }
        }

        let order = |info: &TemplateInfo| {
            index
                .as_ref()
                .and_then(|idx| idx.templates.iter().position(|t| *t == info.manifest.name))
                .unwrap_or(usize::MAX)
        };
        found.sort_by(|a, b| order(a).cmp(&order(b)).then_with(|| a.manifest.name.cmp(&b.manifest.name)));

        let language_files = match index {
            Some(idx) if !idx.language_files.is_empty() => idx.language_files,
            _ => LanguageFiles::expo_defaults(),
        };

        tracing::debug!(root = %root.display(), count = found.len(), "discovered templates");
        Ok(Self {
            root: root.to_path_buf(),
            language_files,
            templates: Registry::new("template", found),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Root language file patterns
    pub fn language_files(&self) -> &LanguageFiles {
        &self.language_files
    }

    pub fn lookup(&self, name: &str) -> Option<&TemplateInfo> {
        self.templates.lookup(name)
    }

    pub fn require(&self, name: &str) -> Result<&TemplateInfo, GenieError> {
        self.templates.require(name)
    }

    pub fn list_all(&self) -> &[TemplateInfo] {
        self.templates.list_all()
    }

    /// Templates in `category`, in listing order
    pub fn by_category(&self, category: &str) -> Vec<&TemplateInfo> {
        self.list_all()
            .iter()
            .filter(|t| t.manifest.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for template in self.list_all() {
            if !categories.contains(&template.manifest.category.as_str()) {
                categories.push(&template.manifest.category);
            }
        }
        categories
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn read_template(dir: &Path) -> Result<TemplateInfo> {
    let path = dir.join(TEMPLATE_FILE);
    let content =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut manifest: TemplateManifest =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    if manifest.name.is_empty() {
        manifest.name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(TemplateInfo {
        dir: dir.to_path_buf(),
        manifest,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Write a template directory with the given metadata and files
    pub(crate) fn write_template(root: &Path, dir: &str, yaml: &str, files: &[(&str, &str)]) {
        let template = root.join(dir);
        std::fs::create_dir_all(&template).unwrap();
        std::fs::write(template.join(TEMPLATE_FILE), yaml).unwrap();
        for (path, contents) in files {
            let target = template.join(path);
            std::fs::create_dir_all(target.parent().unwrap()).unwrap();
            std::fs::write(target, contents).unwrap();
        }
    }

    #[test]
    fn test_discover_and_lookup() {
        let root = tempfile::tempdir().unwrap();
        write_template(
            root.path(),
            "tabs",
            "displayName: Tabs\ndescription: Tab bar\ncategory: navigation\nversion: 0.1.0\n",
            &[],
        );
        write_template(root.path(), "blank", "description: Empty app\nversion: 0.1.0\n", &[]);

        let registry = TemplateRegistry::discover(root.path()).unwrap();
        let names: Vec<&str> = registry.list_all().iter().map(|t| t.key()).collect();
        assert_eq!(names, vec!["blank", "tabs"]);
        assert_eq!(registry.lookup("TABS").unwrap().name(), "Tabs");
        assert_eq!(registry.by_category("navigation").len(), 1);
        assert_eq!(registry.categories(), vec!["starter", "navigation"]);

        let err = registry.require("drawer").unwrap_err();
        assert!(err.to_string().contains("Available: blank, tabs"));
    }

    #[test]
    fn test_root_index_controls_order() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(TEMPLATE_FILE), "templates:\n  - tabs\n  - blank\n").unwrap();
        write_template(root.path(), "blank", "description: a\nversion: 0.1.0\n", &[]);
        write_template(root.path(), "tabs", "description: b\nversion: 0.1.0\n", &[]);

        let registry = TemplateRegistry::discover(root.path()).unwrap();
        let names: Vec<&str> = registry.list_all().iter().map(|t| t.key()).collect();
        assert_eq!(names, vec!["tabs", "blank"]);
        assert_eq!(registry.language_files(), &LanguageFiles::expo_defaults());
    }

    #[test]
    fn test_root_index_with_escaping_name_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(TEMPLATE_FILE), "templates:\n  - ../x\n").unwrap();
        write_template(root.path(), "blank", "description: a\nversion: 0.1.0\n", &[]);

        let err = TemplateRegistry::discover(root.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("../x"));
    }

    #[test]
    fn test_broken_template_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        write_template(root.path(), "good", "description: ok\nversion: 0.1.0\n", &[]);
        write_template(root.path(), "bad", "description: [unclosed\n", &[]);

        let registry = TemplateRegistry::discover(root.path()).unwrap();
        assert_eq!(registry.list_all().len(), 1);
        assert!(registry.lookup("bad").is_none());
    }

    #[test]
    fn test_missing_root() {
        assert!(TemplateRegistry::discover(Path::new("/nonexistent/expo-genie/templates")).is_err());
    }
}
