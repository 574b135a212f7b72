//! Template file copying with language filtering

use super::manifest::{FileLanguage, LanguageFiles};
use super::registry::{TemplateInfo, TEMPLATE_FILE};
use crate::fsutil;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

/// Placeholder replaced with the project name in text files
pub const PROJECT_NAME_PLACEHOLDER: &str = "{{projectName}}";

/// Copy a template into `target_dir`, keeping only the files for the chosen
/// language. Returns the copied project-relative paths.
pub async fn copy_template(
    template: &TemplateInfo,
    root_language_files: &LanguageFiles,
    target_dir: &Path,
    project_name: &str,
    typescript: bool,
) -> Result<Vec<String>> {
    fsutil::ensure_dir(target_dir).await?;

    let mut language_files = root_language_files.clone();
    language_files.merge(&template.manifest.language_files);

    let candidates = if template.manifest.files.is_empty() {
        list_files(&template.dir)?
    } else {
        template.manifest.files.clone()
    };

    let mut copied_files = Vec::new();
    for file_path in candidates {
        if !should_include_file(&file_path, typescript, &language_files) {
            tracing::debug!(file = %file_path, "skipped by language filter");
            continue;
        }

        let source = template.dir.join(&file_path);
        let target_path = target_dir.join(&file_path);
        match fs::read_to_string(&source).await {
            Ok(text) => {
                fsutil::write_file(&target_path, text.replace(PROJECT_NAME_PLACEHOLDER, project_name)).await?
            }
            // Not UTF-8: images, fonts
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                fsutil::copy_file(&source, &target_path).await?
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Template file missing: {}", source.display()));
            }
        }

        copied_files.push(file_path);
    }

    tracing::info!(
        template = %template.manifest.name,
        count = copied_files.len(),
        "copied template"
    );
    Ok(copied_files)
}

/// Every file under a template directory except its metadata, `/`-separated
fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(dir)?;
        if relative == Path::new(TEMPLATE_FILE) {
            continue;
        }
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        files.push(parts.join("/"));
    }
    Ok(files)
}

/// Determine if a file should be included for the selected language
fn should_include_file(file_path: &str, typescript: bool, language_files: &LanguageFiles) -> bool {
    match language_files.get_language_for_file(file_path) {
        Some(FileLanguage::Common) => true,
        Some(FileLanguage::TypeScript) => typescript,
        Some(FileLanguage::JavaScript) => !typescript,
        None => false, // File not in any list, exclude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::registry::tests::write_template;
    use crate::templates::TemplateRegistry;

    fn test_language_files() -> LanguageFiles {
        LanguageFiles {
            common: vec![
                ".env".to_string(),
                ".env.*".to_string(),
                ".gitignore".to_string(),
                "package.json".to_string(),
                "babel.config.js".to_string(),
            ],
            typescript: vec!["*.ts".to_string(), "*.tsx".to_string(), "tsconfig.json".to_string()],
            javascript: vec!["*.js".to_string(), "*.jsx".to_string()],
        }
    }

    #[test]
    fn test_should_include_typescript_files() {
        let lf = test_language_files();

        assert!(should_include_file("app/index.tsx", true, &lf));
        assert!(should_include_file("src/api.ts", true, &lf));
        assert!(should_include_file("tsconfig.json", true, &lf));
        assert!(!should_include_file("app/index.jsx", true, &lf));
    }

    #[test]
    fn test_should_include_javascript_files() {
        let lf = test_language_files();

        assert!(should_include_file("app/index.jsx", false, &lf));
        assert!(!should_include_file("app/index.tsx", false, &lf));
        assert!(!should_include_file("tsconfig.json", false, &lf));
    }

    #[test]
    fn test_common_files_always_included() {
        let lf = test_language_files();

        for typescript in [true, false] {
            assert!(should_include_file(".env", typescript, &lf));
            assert!(should_include_file(".env.local", typescript, &lf));
            assert!(should_include_file("package.json", typescript, &lf));
            // listed as common even though it matches *.js
            assert!(should_include_file("babel.config.js", typescript, &lf));
        }
    }

    #[test]
    fn test_unlisted_files_excluded() {
        let lf = test_language_files();

        assert!(!should_include_file("random.txt", true, &lf));
        assert!(!should_include_file("unknown.file", false, &lf));
    }

    #[tokio::test]
    async fn test_copy_substitutes_and_filters() {
        let templates = tempfile::tempdir().unwrap();
        write_template(
            templates.path(),
            "blank",
            "description: Blank\nversion: 0.1.0\n",
            &[
                ("package.json", "{\"name\": \"{{projectName}}\"}\n"),
                ("app/index.tsx", "export default function Index() {}\n"),
                ("app/index.jsx", "export default function Index() {}\n"),
                ("assets/icon.png", "\u{89}PNG"),
            ],
        );
        let registry = TemplateRegistry::discover(templates.path()).unwrap();
        let blank = registry.require("blank").unwrap();

        let project = tempfile::tempdir().unwrap();
        let copied = copy_template(blank, registry.language_files(), project.path(), "demo", true)
            .await
            .unwrap();

        assert_eq!(copied, vec!["app/index.tsx", "assets/icon.png", "package.json"]);
        let package = std::fs::read_to_string(project.path().join("package.json")).unwrap();
        assert_eq!(package, "{\"name\": \"demo\"}\n");
        assert!(!project.path().join("app/index.jsx").exists());
        assert!(!project.path().join(TEMPLATE_FILE).exists());
    }

    #[tokio::test]
    async fn test_copy_uses_explicit_file_list() {
        let templates = tempfile::tempdir().unwrap();
        write_template(
            templates.path(),
            "tabs",
            "description: Tabs\nversion: 0.1.0\nfiles:\n  - package.json\n",
            &[("package.json", "{}"), ("app/index.tsx", "")],
        );
        let registry = TemplateRegistry::discover(templates.path()).unwrap();

        let project = tempfile::tempdir().unwrap();
        let copied = copy_template(
            registry.require("tabs").unwrap(),
            registry.language_files(),
            project.path(),
            "demo",
            true,
        )
        .await
        .unwrap();
        assert_eq!(copied, vec!["package.json"]);
    }

    #[tokio::test]
    async fn test_copy_fails_on_missing_listed_file() {
        let templates = tempfile::tempdir().unwrap();
        write_template(
            templates.path(),
            "broken",
            "description: x\nversion: 0.1.0\nfiles:\n  - app.json\n",
            &[],
        );
        let registry = TemplateRegistry::discover(templates.path()).unwrap();

        let project = tempfile::tempdir().unwrap();
        let err = copy_template(
            registry.require("broken").unwrap(),
            registry.language_files(),
            project.path(),
            "demo",
            true,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Template file missing"));
    }
}
