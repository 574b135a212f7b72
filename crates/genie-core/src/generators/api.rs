//! REST service generator

use super::{fill, script_ext, typed, GenerateOptions, GeneratedFile};
use crate::error::GenieError;
use crate::naming;

pub const DEFAULT_DIR: &str = "src/services";

const SERVICE: &str = r#"const BASE_URL = process.env.EXPO_PUBLIC_API_URL ?? 'https://api.example.com';
const RESOURCE = '/{{resource}}';

«export type {{name}} = {
  id: string;
  [key: string]: unknown;
};

»async function request«<T>»(path«: string», init«?: RequestInit»)«: Promise<T>» {
  const response = await fetch(`${BASE_URL}${path}`, {
    headers: { 'Content-Type': 'application/json' },
    ...init,
  });
  if (!response.ok) {
    throw new Error(`Request to ${path} failed with status ${response.status}`);
  }
  if (response.status === 204) {
    return undefined« as T»;
  }
  return response.json();
}

export const {{camel}}Api = {
  list: () => request«<{{name}}[]>»(RESOURCE),
  get: (id«: string») => request«<{{name}}>»(`${RESOURCE}/${id}`),
  create: (data«: Omit<{{name}}, 'id'>») =>
    request«<{{name}}>»(RESOURCE, { method: 'POST', body: JSON.stringify(data) }),
  update: (id«: string», data«: Partial<{{name}}>») =>
    request«<{{name}}>»(`${RESOURCE}/${id}`, { method: 'PUT', body: JSON.stringify(data) }),
  remove: (id«: string») => request«<void>»(`${RESOURCE}/${id}`, { method: 'DELETE' }),
};

export default {{camel}}Api;
"#;

/// Render `<dir>/<camel>Api.<ts|js>`
pub fn render(opts: &GenerateOptions) -> Result<GeneratedFile, GenieError> {
    let name = naming::validate_identifier(&opts.name)?;
    let camel = naming::format_camel_name(&opts.name);
    let dir = opts.directory.as_deref().unwrap_or(DEFAULT_DIR);
    let resource = camel.to_lowercase();
    Ok(GeneratedFile::new(
        format!("{}/{}Api.{}", dir.trim_end_matches('/'), camel, script_ext(opts.typescript)),
        fill(
            &typed(SERVICE, opts.typescript),
            &[("name", &name), ("camel", &camel), ("resource", &resource)],
        ),
    ))
}
