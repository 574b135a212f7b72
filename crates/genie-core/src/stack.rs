//! Typed project stack choices stored in the manifest

use crate::error::GenieError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Component/styling library family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiLibrary {
    Nativewind,
    Paper,
    Nativebase,
    Elements,
    Tamagui,
    None,
}

impl UiLibrary {
    pub const ALL: [UiLibrary; 6] = [
        UiLibrary::Nativewind,
        UiLibrary::Paper,
        UiLibrary::Nativebase,
        UiLibrary::Elements,
        UiLibrary::Tamagui,
        UiLibrary::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UiLibrary::Nativewind => "nativewind",
            UiLibrary::Paper => "paper",
            UiLibrary::Nativebase => "nativebase",
            UiLibrary::Elements => "elements",
            UiLibrary::Tamagui => "tamagui",
            UiLibrary::None => "none",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            UiLibrary::Nativewind => "NativeWind",
            UiLibrary::Paper => "React Native Paper",
            UiLibrary::Nativebase => "NativeBase",
            UiLibrary::Elements => "React Native Elements",
            UiLibrary::Tamagui => "Tamagui",
            UiLibrary::None => "None (StyleSheet)",
        }
    }
}

impl fmt::Display for UiLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UiLibrary {
    type Err = GenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UiLibrary::ALL
            .into_iter()
            .find(|lib| lib.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                GenieError::not_found("UI library", s, UiLibrary::ALL.iter().map(|l| l.as_str()))
            })
    }
}

/// State-management library family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateManagement {
    Zustand,
    Redux,
    Mobx,
    Jotai,
    Context,
    None,
}

impl StateManagement {
    pub const ALL: [StateManagement; 6] = [
        StateManagement::Zustand,
        StateManagement::Redux,
        StateManagement::Mobx,
        StateManagement::Jotai,
        StateManagement::Context,
        StateManagement::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StateManagement::Zustand => "zustand",
            StateManagement::Redux => "redux",
            StateManagement::Mobx => "mobx",
            StateManagement::Jotai => "jotai",
            StateManagement::Context => "context",
            StateManagement::None => "none",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StateManagement::Zustand => "Zustand",
            StateManagement::Redux => "Redux Toolkit",
            StateManagement::Mobx => "MobX",
            StateManagement::Jotai => "Jotai",
            StateManagement::Context => "React Context",
            StateManagement::None => "None",
        }
    }
}

impl fmt::Display for StateManagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateManagement {
    type Err = GenieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateManagement::ALL
            .into_iter()
            .find(|lib| lib.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                GenieError::not_found(
                    "state management library",
                    s,
                    StateManagement::ALL.iter().map(|l| l.as_str()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("NativeWind".parse::<UiLibrary>().unwrap(), UiLibrary::Nativewind);
        assert_eq!("redux".parse::<StateManagement>().unwrap(), StateManagement::Redux);
    }

    #[test]
    fn test_unknown_value_lists_choices() {
        let err = "bootstrap".parse::<UiLibrary>().unwrap_err();
        assert!(err.to_string().contains("nativewind, paper"));
    }

    #[test]
    fn test_serde_uses_lowercase_ids() {
        let json = serde_json::to_string(&UiLibrary::Tamagui).unwrap();
        assert_eq!(json, "\"tamagui\"");
        let state: StateManagement = serde_json::from_str("\"mobx\"").unwrap();
        assert_eq!(state, StateManagement::Mobx);
    }
}
