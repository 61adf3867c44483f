//! Interactive completion of answer sets.
//! Asks, in a fixed order, for every known answer the caller did not supply.

use crate::answers::Answers;
use crate::constants::{DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_ICON, DEFAULT_PYTHON_VERSION};
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;
use dialoguer::{Confirm, Input, Select};
use log::debug;

pub enum QuestionKind {
    /// Free text. The default is a template rendered against earlier answers.
    Text { default: &'static str },
    YesNo { default: bool },
    Choice { choices: &'static [&'static str], default: &'static str },
}

pub struct Question {
    pub key: &'static str,
    pub help: &'static str,
    pub kind: QuestionKind,
}

pub const QUESTIONS: &[Question] = &[
    Question {
        key: "plugin_name",
        help: "Plugin name",
        kind: QuestionKind::Text { default: "My Plugin" },
    },
    Question {
        key: "plugin_slug",
        help: "Python package name",
        kind: QuestionKind::Text { default: "{{ plugin_name | slugify }}" },
    },
    Question {
        key: "plugin_class_name",
        help: "Plugin class name",
        kind: QuestionKind::Text { default: "{{ plugin_name | classify }}" },
    },
    Question {
        key: "plugin_short_description",
        help: "Short description",
        kind: QuestionKind::Text { default: DEFAULT_DESCRIPTION },
    },
    Question { key: "author_name", help: "Author name", kind: QuestionKind::Text { default: "" } },
    Question { key: "author_email", help: "Author email", kind: QuestionKind::Text { default: "" } },
    Question {
        key: "github_username",
        help: "GitHub username (leave empty to skip repository links)",
        kind: QuestionKind::Text { default: "" },
    },
    Question { key: "version", help: "Initial version", kind: QuestionKind::Text { default: "0.1.0" } },
    Question {
        key: "python_version",
        help: "Minimum Python version",
        kind: QuestionKind::Choice {
            choices: &["3.11", "3.12", "3.13"],
            default: DEFAULT_PYTHON_VERSION,
        },
    },
    Question {
        key: "license",
        help: "License",
        kind: QuestionKind::Choice {
            choices: &["MIT", "BSD-3-Clause", "Apache-2.0", "GPL-3.0"],
            default: "MIT",
        },
    },
    Question {
        key: "register_to_models.project",
        help: "Register to Project?",
        kind: QuestionKind::YesNo { default: true },
    },
    Question {
        key: "register_to_models.dataset",
        help: "Register to Dataset?",
        kind: QuestionKind::YesNo { default: false },
    },
    Question {
        key: "register_to_models.sample",
        help: "Register to Sample?",
        kind: QuestionKind::YesNo { default: false },
    },
    Question {
        key: "register_to_models.measurement",
        help: "Register to Measurement?",
        kind: QuestionKind::YesNo { default: false },
    },
    Question {
        key: "plugin_category",
        help: "Menu category",
        kind: QuestionKind::Choice {
            choices: &["EXPLORE", "ACTIONS", "MANAGEMENT"],
            default: DEFAULT_CATEGORY,
        },
    },
    Question { key: "icon_name", help: "Menu icon", kind: QuestionKind::Text { default: DEFAULT_ICON } },
    Question {
        key: "include_settings",
        help: "Include a settings.py with plugin defaults?",
        kind: QuestionKind::YesNo { default: false },
    },
    Question {
        key: "use_waffle",
        help: "Hide the plugin behind a waffle switch?",
        kind: QuestionKind::YesNo { default: false },
    },
];

/// Source of interactive answers.
pub trait Prompter {
    fn text(&self, help: &str, default: &str) -> Result<String>;
    fn confirm(&self, help: &str, default: bool) -> Result<bool>;
    /// Returns the index of the selected choice.
    fn select(&self, help: &str, choices: &[&str], default: usize) -> Result<usize>;
}

/// Terminal prompts backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&self, help: &str, default: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(help)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::PromptError(e.to_string()))
    }

    fn confirm(&self, help: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(help)
            .default(default)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }

    fn select(&self, help: &str, choices: &[&str], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(help)
            .default(default)
            .items(choices)
            .interact()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}

/// Asks for every question `answers` has no value for. Answers given up front
/// are kept as they are and never asked.
pub fn fill_missing(
    renderer: &dyn TemplateRenderer,
    prompter: &dyn Prompter,
    mut answers: Answers,
) -> Result<Answers> {
    for question in QUESTIONS {
        if answers.contains(question.key) {
            debug!("Using provided answer for '{}'", question.key);
            continue;
        }

        let value = match &question.kind {
            QuestionKind::Text { default } => {
                let default = renderer.render(question.key, default, &answers.to_value())?;
                serde_json::Value::String(prompter.text(question.help, &default)?)
            }
            QuestionKind::YesNo { default } => {
                let answer = prompter.confirm(question.help, *default)?;
                serde_json::Value::String(if answer { "yes" } else { "no" }.to_string())
            }
            QuestionKind::Choice { choices, default } => {
                let default = choices.iter().position(|choice| choice == default).unwrap_or(0);
                let selection = prompter.select(question.help, choices, default)?;
                let choice = choices.get(selection).ok_or_else(|| {
                    Error::PromptError(format!("no choice at index {selection} for '{}'", question.key))
                })?;
                serde_json::Value::String((*choice).to_string())
            }
        };
        answers.insert(question.key, value);
    }
    Ok(answers)
}
