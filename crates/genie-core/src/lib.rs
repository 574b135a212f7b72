//! genie-core - scaffolding and extending Expo projects
//!
//! The library is organized into layers:
//!
//! - **Storage** - the per-project manifest ([`manifest`]), the user-scoped
//!   config and lock ([`global`]), filesystem helpers ([`fsutil`])
//! - **Reference data** - library and feature registries ([`registry`]),
//!   project templates ([`templates`])
//! - **Generation** - pure string generators ([`generators`])
//! - **Commands** - cliclack-driven CLI verbs (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the interactive command layer
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use genie_core::{generators, manifest};
//!
//! let project = manifest::require(&root).await?;
//! let mut opts = generators::GenerateOptions::new("profile", project.ui_library, project.state_management);
//! opts.typescript = project.preferences.typescript;
//! let path = generators::generate(&root, generators::GeneratorKind::Screen, &opts).await?;
//! ```

pub mod error;
pub mod fsutil;
pub mod generators;
pub mod global;
pub mod manifest;
pub mod naming;
pub mod npm;
pub mod package_manager;
pub mod paths;
pub mod registry;
pub mod runtime;
pub mod stack;
pub mod templates;

#[cfg(feature = "tui")]
pub mod commands;

// Re-export main types for convenience
pub use error::GenieError;
pub use global::{GlobalConfig, GlobalStore};
pub use manifest::{FeatureRecord, ProjectManifest};
pub use package_manager::PackageManager;
pub use registry::Registries;
pub use stack::{StateManagement, UiLibrary};

#[cfg(feature = "tui")]
pub use commands::{run, Command, Context};

/// Version compared against template minimum versions
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");
