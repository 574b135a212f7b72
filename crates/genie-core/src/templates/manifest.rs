//! Template manifest types and parsing

use crate::error::GenieError;
use crate::fsutil;
use serde::{Deserialize, Serialize};
use std::fmt;

/// File patterns associated with each language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageFiles {
    /// Files always included regardless of language selection
    #[serde(default)]
    pub common: Vec<String>,

    /// Files only copied into TypeScript projects
    #[serde(default)]
    pub typescript: Vec<String>,

    /// Files only copied into JavaScript projects
    #[serde(default)]
    pub javascript: Vec<String>,
}

impl LanguageFiles {
    /// Patterns used when a template root has no index of its own
    pub fn expo_defaults() -> Self {
        fn strings(patterns: &[&str]) -> Vec<String> {
            patterns.iter().map(|p| p.to_string()).collect()
        }
        Self {
            common: strings(&[
                "package.json",
                "app.json",
                "babel.config.js",
                "metro.config.js",
                ".gitignore",
                "*.md",
                "*.png",
            ]),
            typescript: strings(&["*.ts", "*.tsx", "tsconfig.json"]),
            javascript: strings(&["*.js", "*.jsx", "jsconfig.json"]),
        }
    }

    /// Merge another LanguageFiles into this one
    pub fn merge(&mut self, other: &LanguageFiles) {
        self.common.extend(other.common.iter().cloned());
        self.typescript.extend(other.typescript.iter().cloned());
        self.javascript.extend(other.javascript.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.typescript.is_empty() && self.javascript.is_empty()
    }

    /// Check if a filename matches any pattern in a list
    fn matches_any(filename: &str, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                // Suffix match: *.ts matches foo.ts
                filename.ends_with(suffix)
            } else if let Some(prefix) = pattern.strip_suffix('*') {
                // Prefix match: .env* matches .env.local
                filename.starts_with(prefix)
            } else {
                filename == pattern
            }
        })
    }

    /// Which language a file belongs to; None when it is in no list (excluded)
    pub fn get_language_for_file(&self, file_path: &str) -> Option<FileLanguage> {
        let filename = file_path.rsplit('/').next().unwrap_or(file_path);

        // Common first, so e.g. babel.config.js survives in TypeScript projects
        if Self::matches_any(filename, &self.common) {
            return Some(FileLanguage::Common);
        }
        if Self::matches_any(filename, &self.typescript) {
            return Some(FileLanguage::TypeScript);
        }
        if Self::matches_any(filename, &self.javascript) {
            return Some(FileLanguage::JavaScript);
        }
        None
    }
}

/// Which language a file is associated with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLanguage {
    Common,
    TypeScript,
    JavaScript,
}

/// How much a template sets up for you
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Complexity::Beginner => "beginner",
            Complexity::Intermediate => "intermediate",
            Complexity::Advanced => "advanced",
        })
    }
}

/// Root template manifest (`templates/template.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootManifest {
    /// Template directory names
    pub templates: Vec<String>,

    /// Global language-specific file patterns
    #[serde(default)]
    pub language_files: LanguageFiles,
}

impl RootManifest {
    /// Parse an index. Every listed template must be a single directory name,
    /// since each one is joined onto the template cache.
    pub fn parse(yaml: &str) -> Result<Self, GenieError> {
        let manifest: RootManifest = serde_yaml::from_str(yaml)?;
        if let Some(name) = manifest
            .templates
            .iter()
            .find(|name| !fsutil::is_single_segment(name))
        {
            return Err(GenieError::InvalidName {
                name: name.clone(),
                reason: "template names must be a single directory name",
            });
        }
        Ok(manifest)
    }
}

/// Per-template manifest (`templates/<name>/template.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateManifest {
    /// Identifier used on the command line (defaults to the directory name)
    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "display_name")]
    pub display_name: String,

    pub description: String,

    #[serde(default = "default_category")]
    pub category: String,

    #[serde(default)]
    pub complexity: Complexity,

    /// Minimum CLI version, checked with semver
    pub version: String,

    /// Files to copy; every file in the directory when empty
    #[serde(default)]
    pub files: Vec<String>,

    /// Template-specific language file overrides (merged with root)
    #[serde(default, alias = "language_files")]
    pub language_files: LanguageFiles,
}

fn default_category() -> String {
    "starter".to_string()
}

impl TemplateManifest {
    /// Display name, falling back to the identifier
    pub fn title(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template_manifest() {
        let yaml = r#"
name: tabs
displayName: Tab Navigation
description: Expo Router app with a bottom tab bar
category: navigation
complexity: intermediate
version: 0.1.0
files:
  - package.json
  - app/_layout.tsx
"#;
        let manifest: TemplateManifest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(manifest.title(), "Tab Navigation");
        assert_eq!(manifest.category, "navigation");
        assert_eq!(manifest.complexity, Complexity::Intermediate);
        assert_eq!(manifest.files.len(), 2);
        assert!(manifest.language_files.is_empty());
    }

    #[test]
    fn test_manifest_defaults() {
        let yaml = "description: Minimal\nversion: 0.1.0\n";
        let manifest: TemplateManifest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(manifest.category, "starter");
        assert_eq!(manifest.complexity, Complexity::Beginner);
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn test_common_takes_precedence() {
        let lf = LanguageFiles::expo_defaults();
        assert_eq!(lf.get_language_for_file("babel.config.js"), Some(FileLanguage::Common));
        assert_eq!(lf.get_language_for_file("app/index.tsx"), Some(FileLanguage::TypeScript));
        assert_eq!(lf.get_language_for_file("app/index.jsx"), Some(FileLanguage::JavaScript));
        assert_eq!(lf.get_language_for_file("notes.txt"), None);
    }

    #[test]
    fn test_root_index_rejects_escaping_names() {
        let index = RootManifest::parse("templates:\n  - blank\n  - tabs\n").unwrap();
        assert_eq!(index.templates, vec!["blank", "tabs"]);

        for bad in ["../x", "/tmp/x", "a/b", ".."] {
            let yaml = format!("templates:\n  - blank\n  - \"{}\"\n", bad);
            let err = RootManifest::parse(&yaml).unwrap_err();
            assert!(
                matches!(&err, GenieError::InvalidName { name, .. } if name == bad),
                "{} accepted: {}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_prefix_patterns() {
        let lf = LanguageFiles {
            common: vec![".env*".to_string()],
            ..LanguageFiles::default()
        };
        assert_eq!(lf.get_language_for_file(".env.local"), Some(FileLanguage::Common));
    }
}
