//! Code generators
//!
//! Generators are pure: they render [`GeneratedFile`]s with project-relative
//! paths. [`generate`] and [`write_files`] put them on disk, replacing any
//! existing content.

pub mod api;
pub mod component;
pub mod features;
pub mod hook;
pub mod model;
pub mod screen;
pub mod store;
pub mod ui;

use crate::error::GenieError;
use crate::fsutil;
use crate::stack::{StateManagement, UiLibrary};
use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use component::ComponentType;
pub use screen::ScreenType;

/// A rendered file, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Project-relative path with `/` separators
    pub path: String,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Screen,
    Component,
    Hook,
    Api,
    Store,
    Model,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 6] = [
        GeneratorKind::Screen,
        GeneratorKind::Component,
        GeneratorKind::Hook,
        GeneratorKind::Api,
        GeneratorKind::Store,
        GeneratorKind::Model,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Screen => "screen",
            GeneratorKind::Component => "component",
            GeneratorKind::Hook => "hook",
            GeneratorKind::Api => "api",
            GeneratorKind::Store => "store",
            GeneratorKind::Model => "model",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GeneratorKind::Screen => "Screen component",
            GeneratorKind::Component => "Reusable UI component",
            GeneratorKind::Hook => "Custom React hook",
            GeneratorKind::Api => "REST API service",
            GeneratorKind::Store => "State store for the project's state library",
            GeneratorKind::Model => "Data model type",
        }
    }

    /// Sub-types accepted by `--type`, first one is the default
    pub fn sub_types(&self) -> Vec<&'static str> {
        match self {
            GeneratorKind::Screen => ScreenType::ALL.iter().map(|t| t.as_str()).collect(),
            GeneratorKind::Component => ComponentType::ALL.iter().map(|t| t.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorKind {
    type Err = GenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "screen" | "s" => Ok(GeneratorKind::Screen),
            "component" | "c" => Ok(GeneratorKind::Component),
            "hook" | "h" => Ok(GeneratorKind::Hook),
            "api" | "service" => Ok(GeneratorKind::Api),
            "store" => Ok(GeneratorKind::Store),
            "model" | "m" => Ok(GeneratorKind::Model),
            _ => Err(GenieError::not_found(
                "generator",
                s,
                GeneratorKind::ALL.iter().map(|k| k.as_str()),
            )),
        }
    }
}

/// Inputs shared by all generators
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Free-form name, normalized by each generator
    pub name: String,
    /// Project-relative output directory overriding the generator default
    pub directory: Option<String>,
    pub typescript: bool,
    /// Screen or component variant
    pub sub_type: Option<String>,
    pub with_loading: bool,
    pub with_navigation: bool,
    pub with_props: bool,
    pub ui_library: UiLibrary,
    pub state_management: StateManagement,
}

impl GenerateOptions {
    /// TypeScript output, default directory and variant, no extras
    pub fn new(name: impl Into<String>, ui_library: UiLibrary, state_management: StateManagement) -> Self {
        Self {
            name: name.into(),
            directory: None,
            typescript: true,
            sub_type: None,
            with_loading: false,
            with_navigation: false,
            with_props: false,
            ui_library,
            state_management,
        }
    }
}

/// Render one file without touching the disk
///
/// A leading `./` on the output path is dropped; paths leaving the project are rejected.
pub fn render(kind: GeneratorKind, opts: &GenerateOptions) -> Result<GeneratedFile, GenieError> {
    let mut file = match kind {
        GeneratorKind::Screen => screen::render(opts),
        GeneratorKind::Component => component::render(opts),
        GeneratorKind::Hook => hook::render(opts),
        GeneratorKind::Api => api::render(opts),
        GeneratorKind::Store => store::render(opts),
        GeneratorKind::Model => model::render(opts),
    }?;
    let relative = file.path.trim_start_matches("./");
    if !fsutil::is_contained(relative) {
        return Err(GenieError::InvalidName {
            name: file.path,
            reason: "output must stay inside the project",
        });
    }
    file.path = relative.to_string();
    Ok(file)
}

/// Render and write one file under `project`. Returns the absolute path written.
pub async fn generate(project: &Path, kind: GeneratorKind, opts: &GenerateOptions) -> Result<PathBuf> {
    let file = render(kind, opts)?;
    let path = project.join(&file.path);
    fsutil::write_file(&path, &file.contents).await?;
    tracing::info!(kind = %kind, path = %file.path, "generated file");
    Ok(path)
}

/// Write every file under `project`, in order. Returns the project-relative paths.
pub async fn write_files(project: &Path, files: &[GeneratedFile]) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        fsutil::write_file(&project.join(&file.path), &file.contents).await?;
        written.push(file.path.clone());
    }
    Ok(written)
}

pub(crate) fn jsx_ext(typescript: bool) -> &'static str {
    if typescript {
        "tsx"
    } else {
        "jsx"
    }
}

pub(crate) fn script_ext(typescript: bool) -> &'static str {
    if typescript {
        "ts"
    } else {
        "js"
    }
}

pub(crate) fn push_unique<'a>(items: &mut Vec<&'a str>, item: &'a str) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// Replace `{{key}}` placeholders
pub(crate) fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

/// Resolve `«…»` type annotations: kept (without markers) for TypeScript, dropped otherwise
pub(crate) fn typed(template: &str, typescript: bool) -> String {
    let mut out = String::with_capacity(template.len());
    let mut in_annotation = false;
    for c in template.chars() {
        match c {
            '«' => in_annotation = true,
            '»' => in_annotation = false,
            _ if in_annotation && !typescript => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_aliases() {
        assert_eq!("S".parse::<GeneratorKind>().unwrap(), GeneratorKind::Screen);
        assert_eq!("service".parse::<GeneratorKind>().unwrap(), GeneratorKind::Api);
        assert!("widget".parse::<GeneratorKind>().is_err());
    }

    #[test]
    fn test_typed_markers() {
        let template = "const x«: number» = 1;«\ntype T = string;»";
        assert_eq!(typed(template, true), "const x: number = 1;\ntype T = string;");
        assert_eq!(typed(template, false), "const x = 1;");
    }

    #[test]
    fn test_fill() {
        assert_eq!(
            fill("{{a}} and {{b}} and {{a}}", &[("a", "x"), ("b", "y")]),
            "x and y and x"
        );
    }

    #[test]
    fn test_sub_types() {
        assert_eq!(GeneratorKind::Screen.sub_types()[0], "blank");
        assert!(GeneratorKind::Component.sub_types().contains(&"list-item"));
        assert!(GeneratorKind::Hook.sub_types().is_empty());
    }

    #[tokio::test]
    async fn test_generate_writes_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let opts = GenerateOptions::new("profile", UiLibrary::Nativewind, StateManagement::Zustand);

        let path = generate(dir.path(), GeneratorKind::Screen, &opts).await.unwrap();
        assert_eq!(path, dir.path().join("src/screens/Profile.tsx"));
        assert!(path.exists());

        let mut js = opts.clone();
        js.typescript = false;
        let path = generate(dir.path(), GeneratorKind::Screen, &js).await.unwrap();
        assert!(path.ends_with("src/screens/Profile.jsx"));
    }

    #[tokio::test]
    async fn test_output_directory_stays_in_project() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("app");
        let mut opts = GenerateOptions::new("profile", UiLibrary::None, StateManagement::None);

        opts.directory = Some("./src/pages/".into());
        assert_eq!(render(GeneratorKind::Screen, &opts).unwrap().path, "src/pages/Profile.tsx");

        for bad in ["../", "/tmp", "src/../../"] {
            opts.directory = Some(bad.into());
            assert!(matches!(
                generate(&project, GeneratorKind::Screen, &opts).await,
                Err(e) if e.downcast_ref::<GenieError>().is_some()
            ));
        }
        assert!(!dir.path().join("Profile.tsx").exists());
    }

    #[tokio::test]
    async fn test_generate_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("src/models/User.ts");
        fsutil::write_file(&target, "old").await.unwrap();

        let opts = GenerateOptions::new("user", UiLibrary::None, StateManagement::None);
        generate(dir.path(), GeneratorKind::Model, &opts).await.unwrap();
        let contents = std::fs::read_to_string(&target).unwrap();
        assert!(contents.contains("export interface User"));
    }

    #[tokio::test]
    async fn test_store_without_state_library_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let opts = GenerateOptions::new("cart", UiLibrary::None, StateManagement::None);
        assert!(generate(dir.path(), GeneratorKind::Store, &opts).await.is_err());
        assert!(!dir.path().join("src").exists());
    }
}
