//! Interactive prompts.
//!
//! Workflows only see the [`Prompter`] trait; the terminal implementation is
//! wired in by the binary and tests script answers instead.
use crate::error::{Error, Result};

/// A labeled text question with an optional default and required constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub label: String,
    pub default: Option<String>,
    pub required: bool,
}

impl Question {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            default: None,
            required: false,
        }
    }

    pub fn default_answer(mut self, answer: impl Into<String>) -> Self {
        self.default = Some(answer.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Source of human answers.
pub trait Prompter {
    /// Ask a yes/no question. `false` means the user declined.
    fn confirm(&self, label: &str) -> Result<bool>;

    /// Ask one question and return the raw answer, which may be empty.
    fn ask(&self, question: &Question) -> Result<String>;
}

/// Ask every question in order, applying defaults and required checks.
pub fn ask_all(prompter: &dyn Prompter, questions: &[Question]) -> Result<Vec<String>> {
    let mut answers = Vec::with_capacity(questions.len());
    for question in questions {
        let raw = prompter.ask(question)?;
        let answer = match raw.trim() {
            "" => question.default.clone().unwrap_or_default(),
            trimmed => trimmed.to_string(),
        };
        if question.required && answer.is_empty() {
            return Err(Error::IncompleteInput {
                field: question.label.clone(),
            });
        }
        answers.push(answer);
    }
    Ok(answers)
}

/// Prompter backed by the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, label: &str) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(label)
            .default(false)
            .interact()
            .map_err(|err| Error::Prompt(err.to_string()))
    }

    fn ask(&self, question: &Question) -> Result<String> {
        let mut input = dialoguer::Input::<String>::new()
            .with_prompt(question.label.as_str())
            .allow_empty(true);
        if let Some(default) = &question.default {
            input = input.default(default.clone());
        }
        input
            .interact_text()
            .map_err(|err| Error::Prompt(err.to_string()))
    }
}
