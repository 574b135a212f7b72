//! Custom hook generator

use super::{fill, script_ext, typed, GenerateOptions, GeneratedFile};
use crate::error::GenieError;
use crate::naming;

pub const DEFAULT_DIR: &str = "src/hooks";

const HOOK: &str = r#"import { useCallback, useState } from 'react';

export function {{hook}}() {
  const [value, setValue] = useState«<unknown>»(null);

  const reset = useCallback(() => setValue(null), []);

  return { value, setValue, reset };
}

export default {{hook}};
"#;

const HOOK_WITH_LOADING: &str = r#"import { useCallback, useState } from 'react';

export function {{hook}}«<T = unknown>»() {
  const [value, setValue] = useState«<T | null>»(null);
  const [loading, setLoading] = useState(false);
  const [error, setError] = useState«<Error | null>»(null);

  const run = useCallback(async (task«: () => Promise<T>») => {
    setLoading(true);
    setError(null);
    try {
      const result = await task();
      setValue(result);
      return result;
    } catch (e) {
      setError(e instanceof Error ? e : new Error(String(e)));
      return null;
    } finally {
      setLoading(false);
    }
  }, []);

  return { value, loading, error, run };
}

export default {{hook}};
"#;

/// Render `<dir>/use<Pascal>.<ts|js>`
pub fn render(opts: &GenerateOptions) -> Result<GeneratedFile, GenieError> {
    naming::validate_identifier(&opts.name)?;
    let hook = naming::format_hook_name(&opts.name);
    let dir = opts.directory.as_deref().unwrap_or(DEFAULT_DIR);
    let template = if opts.with_loading { HOOK_WITH_LOADING } else { HOOK };
    Ok(GeneratedFile::new(
        format!("{}/{}.{}", dir.trim_end_matches('/'), hook, script_ext(opts.typescript)),
        fill(&typed(template, opts.typescript), &[("hook", &hook)]),
    ))
}
