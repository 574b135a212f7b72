//! State store generator, one body per state management library

use super::{fill, script_ext, typed, GenerateOptions, GeneratedFile};
use crate::error::GenieError;
use crate::naming;
use crate::stack::StateManagement;

pub const DEFAULT_DIR: &str = "src/store";

const ZUSTAND: &str = r#"import { create } from 'zustand';

«type {{name}}State = {
  items: unknown[];
  loading: boolean;
  setItems: (items: unknown[]) => void;
  setLoading: (loading: boolean) => void;
  reset: () => void;
};

»export const use{{name}}Store = create«<{{name}}State>()»((set) => ({
  items: [],
  loading: false,
  setItems: (items) => set({ items }),
  setLoading: (loading) => set({ loading }),
  reset: () => set({ items: [], loading: false }),
}));
"#;

const REDUX: &str = r#"import { createSlice } from '@reduxjs/toolkit';
«import type { PayloadAction } from '@reduxjs/toolkit';

type {{name}}State = {
  items: unknown[];
  loading: boolean;
};
»
const initialState«: {{name}}State» = {
  items: [],
  loading: false,
};

export const {{camel}}Slice = createSlice({
  name: '{{camel}}',
  initialState,
  reducers: {
    setItems(state, action«: PayloadAction<unknown[]>») {
      state.items = action.payload;
    },
    setLoading(state, action«: PayloadAction<boolean>») {
      state.loading = action.payload;
    },
    reset: () => initialState,
  },
});

export const { setItems, setLoading, reset } = {{camel}}Slice.actions;
export default {{camel}}Slice.reducer;
"#;

const MOBX: &str = r#"import { makeAutoObservable } from 'mobx';

export class {{name}}Store {
  items«: unknown[]» = [];
  loading = false;

  constructor() {
    makeAutoObservable(this);
  }

  setItems(items«: unknown[]») {
    this.items = items;
  }

  setLoading(loading«: boolean») {
    this.loading = loading;
  }

  reset() {
    this.items = [];
    this.loading = false;
  }
}

export const {{camel}}Store = new {{name}}Store();
"#;

const JOTAI: &str = r#"import { atom } from 'jotai';

export const {{camel}}ItemsAtom = atom«<unknown[]>»([]);
export const {{camel}}LoadingAtom = atom(false);
export const {{camel}}CountAtom = atom((get) => get({{camel}}ItemsAtom).length);
"#;

const CONTEXT: &str = r#"import { createContext, createElement, useContext, useState } from 'react';
«import type { ReactNode } from 'react';

type {{name}}Value = {
  items: unknown[];
  setItems: (items: unknown[]) => void;
  loading: boolean;
  setLoading: (loading: boolean) => void;
};
»
const {{name}}Context = createContext«<{{name}}Value | null>»(null);

export function {{name}}Provider({ children }«: { children: ReactNode }») {
  const [items, setItems] = useState«<unknown[]>»([]);
  const [loading, setLoading] = useState(false);
  return createElement(
    {{name}}Context.Provider,
    { value: { items, setItems, loading, setLoading } },
    children,
  );
}

export function use{{name}}Store() {
  const value = useContext({{name}}Context);
  if (!value) {
    throw new Error('use{{name}}Store must be used inside {{name}}Provider');
  }
  return value;
}
"#;

/// Store source for `name` (any case) in the given library
pub fn source(name: &str, state: StateManagement, typescript: bool) -> Result<String, GenieError> {
    let template = match state {
        StateManagement::Zustand => ZUSTAND,
        StateManagement::Redux => REDUX,
        StateManagement::Mobx => MOBX,
        StateManagement::Jotai => JOTAI,
        StateManagement::Context => CONTEXT,
        StateManagement::None => {
            return Err(GenieError::Unsupported(
                "This project has no state management library. Run `expo-genie migrate state` to pick one before generating stores."
                    .to_string(),
            ))
        }
    };
    let pascal = naming::format_component_name(name);
    let camel = naming::format_camel_name(name);
    Ok(fill(&typed(template, typescript), &[("name", &pascal), ("camel", &camel)]))
}

/// `<dir>/<camel>Store.<ts|js>` path for `name`
pub fn path(dir: &str, name: &str, typescript: bool) -> String {
    format!(
        "{}/{}Store.{}",
        dir.trim_end_matches('/'),
        naming::format_camel_name(name),
        script_ext(typescript)
    )
}

/// Render `<dir>/<camel>Store.<ts|js>` for the project's state library
pub fn render(opts: &GenerateOptions) -> Result<GeneratedFile, GenieError> {
    naming::validate_identifier(&opts.name)?;
    let dir = opts.directory.as_deref().unwrap_or(DEFAULT_DIR);
    let contents = source(&opts.name, opts.state_management, opts.typescript)?;
    Ok(GeneratedFile::new(path(dir, &opts.name, opts.typescript), contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::UiLibrary;

    fn options(name: &str, state: StateManagement) -> GenerateOptions {
        GenerateOptions::new(name, UiLibrary::Nativewind, state)
    }

    #[test]
    fn test_store_path() {
        let file = render(&options("shopping-cart", StateManagement::Zustand)).unwrap();
        assert_eq!(file.path, "src/store/shoppingCartStore.ts");
        assert!(file.contents.contains("export const useShoppingCartStore = create<ShoppingCartState>()"));
    }

    #[test]
    fn test_body_follows_state_library() {
        let redux = render(&options("cart", StateManagement::Redux)).unwrap();
        assert!(redux.contents.contains("createSlice"));
        assert!(redux.contents.contains("name: 'cart',"));

        let mobx = render(&options("cart", StateManagement::Mobx)).unwrap();
        assert!(mobx.contents.contains("export class CartStore {"));

        let jotai = render(&options("cart", StateManagement::Jotai)).unwrap();
        assert!(jotai.contents.contains("export const cartItemsAtom = atom<unknown[]>([]);"));

        let context = render(&options("cart", StateManagement::Context)).unwrap();
        assert!(context.contents.contains("export function CartProvider("));
    }

    #[test]
    fn test_no_state_library_is_a_user_error() {
        let err = render(&options("cart", StateManagement::None)).unwrap_err();
        assert!(matches!(err, GenieError::Unsupported(_)));
        assert!(err.to_string().contains("migrate state"));
    }

    #[test]
    fn test_javascript_redux() {
        let mut opts = options("cart", StateManagement::Redux);
        opts.typescript = false;
        let file = render(&opts).unwrap();
        assert_eq!(file.path, "src/store/cartStore.js");
        assert!(!file.contents.contains("PayloadAction"));
        assert!(file.contents.contains("setItems(state, action) {"));
    }
}
