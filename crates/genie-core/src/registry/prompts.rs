//! Declarative prompt specifications attached to registry entries
//!
//! Registries describe *what* to ask; the command layer decides *how* (cliclack
//! prompts interactively, [`PromptAnswers::defaults`] with `--yes`).

use crate::error::GenieError;

/// One choice of a select or multi-select prompt
#[derive(Debug, Clone, Copy)]
pub struct PromptOption {
    pub value: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub enum PromptKind {
    Select {
        options: &'static [PromptOption],
        default: &'static str,
    },
    MultiSelect {
        options: &'static [PromptOption],
        defaults: &'static [&'static str],
    },
    Confirm {
        default: bool,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct PromptSpec {
    /// Answer key
    pub key: &'static str,
    pub message: &'static str,
    pub kind: PromptKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    Choice(String),
    Choices(Vec<String>),
    Flag(bool),
}

/// Answers collected for a prompt set, in prompt order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptAnswers {
    answers: Vec<(String, PromptAnswer)>,
}

impl PromptAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default answer for every prompt
    pub fn defaults(prompts: &[PromptSpec]) -> Self {
        let mut answers = Self::new();
        for prompt in prompts {
            let answer = match prompt.kind {
                PromptKind::Select { default, .. } => PromptAnswer::Choice(default.to_string()),
                PromptKind::MultiSelect { defaults, .. } => {
                    PromptAnswer::Choices(defaults.iter().map(|d| d.to_string()).collect())
                }
                PromptKind::Confirm { default } => PromptAnswer::Flag(default),
            };
            answers.insert(prompt.key, answer);
        }
        answers
    }

    /// Set an answer, replacing a previous one for the same key
    pub fn insert(&mut self, key: &str, answer: PromptAnswer) {
        match self.answers.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = answer,
            None => self.answers.push((key.to_string(), answer)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&PromptAnswer> {
        self.answers.iter().find(|(k, _)| k == key).map(|(_, a)| a)
    }

    pub fn choice(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(PromptAnswer::Choice(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn choices(&self, key: &str) -> &[String] {
        match self.get(key) {
            Some(PromptAnswer::Choices(values)) => values.as_slice(),
            _ => &[],
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key) {
            Some(PromptAnswer::Flag(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Validate `value` against a select prompt's options
pub fn check_option(prompt: &PromptSpec, value: &str) -> Result<(), GenieError> {
    let options = match prompt.kind {
        PromptKind::Select { options, .. } | PromptKind::MultiSelect { options, .. } => options,
        PromptKind::Confirm { .. } => return Ok(()),
    };
    if options.iter().any(|o| o.value == value) {
        Ok(())
    } else {
        Err(GenieError::not_found(
            prompt.key,
            value,
            options.iter().map(|o| o.value),
        ))
    }
}
