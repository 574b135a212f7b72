//! Data model generator

use super::{fill, script_ext, typed, GenerateOptions, GeneratedFile};
use crate::error::GenieError;
use crate::naming;

pub const DEFAULT_DIR: &str = "src/models";

const MODEL: &str = r#"«export interface {{name}} {
  id: string;
  createdAt: string;
  updatedAt: string;
}

»export function create{{name}}(data«: Partial<{{name}}>» = {})«: {{name}}» {
  const now = new Date().toISOString();
  return {
    id: '',
    createdAt: now,
    updatedAt: now,
    ...data,
  };
}

export function is{{name}}(value«: unknown»)«: value is {{name}}» {
  return typeof value === 'object' && value !== null && 'id' in value;
}
"#;

/// Render `<dir>/<Pascal>.<ts|js>`
pub fn render(opts: &GenerateOptions) -> Result<GeneratedFile, GenieError> {
    let name = naming::validate_identifier(&opts.name)?;
    let dir = opts.directory.as_deref().unwrap_or(DEFAULT_DIR);
    Ok(GeneratedFile::new(
        format!("{}/{}.{}", dir.trim_end_matches('/'), name, script_ext(opts.typescript)),
        fill(&typed(MODEL, opts.typescript), &[("name", &name)]),
    ))
}
