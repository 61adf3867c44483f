//! Normalized generation context.
//!
//! [`normalize`] is the only place answers are interpreted: it checks required
//! keys, coerces yes/no flags, validates closed choice sets and derives the
//! identifiers every generated file shares. Everything downstream reads typed
//! fields and never re-validates.

use crate::answers::Answers;
use crate::constants::{
    DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_ICON, DEFAULT_PYTHON_VERSION, MODELS_GROUP,
};
use crate::error::{Error, Result};
use crate::naming;
use chrono::Datelike;
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$")
        .expect("version pattern is valid")
});
static PYTHON_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^3\.\d{1,2}$").expect("python version pattern is valid"));
static ICON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("icon pattern is valid"));
static GITHUB_USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]*$").expect("username pattern is valid"));
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}$").expect("year pattern is valid"));

/// Supported license choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum License {
    #[serde(rename = "MIT")]
    Mit,
    #[serde(rename = "BSD-3-Clause")]
    Bsd3Clause,
    #[serde(rename = "Apache-2.0")]
    Apache2,
    #[serde(rename = "GPL-3.0")]
    Gpl3,
}

impl License {
    pub const ALL: [License; 4] =
        [License::Mit, License::Bsd3Clause, License::Apache2, License::Gpl3];

    /// SPDX identifier.
    pub fn id(self) -> &'static str {
        match self {
            License::Mit => "MIT",
            License::Bsd3Clause => "BSD-3-Clause",
            License::Apache2 => "Apache-2.0",
            License::Gpl3 => "GPL-3.0",
        }
    }
}

impl FromStr for License {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        License::ALL.into_iter().find(|license| license.id() == s).ok_or_else(|| {
            Error::validation("license", format!("'{s}' is not one of {}", ids(&License::ALL)))
        })
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Menu category the host shows the plugin under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    Explore,
    Actions,
    Management,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Explore, Category::Actions, Category::Management];

    pub fn id(self) -> &'static str {
        match self {
            Category::Explore => "EXPLORE",
            Category::Actions => "ACTIONS",
            Category::Management => "MANAGEMENT",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL.into_iter().find(|category| category.id() == s).ok_or_else(|| {
            Error::validation(
                "plugin_category",
                format!("'{s}' is not one of {}", ids(&Category::ALL)),
            )
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Host models a plugin can register to, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Model {
    Project,
    Dataset,
    Sample,
    Measurement,
}

impl Model {
    /// Declared order. Registration arguments always follow it.
    pub const ALL: [Model; 4] = [Model::Project, Model::Dataset, Model::Sample, Model::Measurement];

    /// Key inside the `register_to_models` group, also the host module name.
    pub fn key(self) -> &'static str {
        match self {
            Model::Project => "project",
            Model::Dataset => "dataset",
            Model::Sample => "sample",
            Model::Measurement => "measurement",
        }
    }

    /// Class name of the host model.
    pub fn name(self) -> &'static str {
        match self {
            Model::Project => "Project",
            Model::Dataset => "Dataset",
            Model::Sample => "Sample",
            Model::Measurement => "Measurement",
        }
    }

    /// The model as seen by templates: `{{ model.key }}` and `{{ model.name }}`.
    pub fn to_value(self) -> serde_json::Value {
        serde_json::json!({ "key": self.key(), "name": self.name() })
    }
}

impl Serialize for Model {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Which models the plugin registers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModelSelection {
    pub project: bool,
    pub dataset: bool,
    pub sample: bool,
    pub measurement: bool,
}

impl ModelSelection {
    pub fn contains(&self, model: Model) -> bool {
        match model {
            Model::Project => self.project,
            Model::Dataset => self.dataset,
            Model::Sample => self.sample,
            Model::Measurement => self.measurement,
        }
    }

    fn set(&mut self, model: Model, selected: bool) {
        match model {
            Model::Project => self.project = selected,
            Model::Dataset => self.dataset = selected,
            Model::Sample => self.sample = selected,
            Model::Measurement => self.measurement = selected,
        }
    }

    /// Selected models in declared order.
    pub fn models(&self) -> Vec<Model> {
        Model::ALL.into_iter().filter(|model| self.contains(*model)).collect()
    }
}

/// Boolean features that gate files and regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    IncludeSettings,
    UseWaffle,
    /// A GitHub username was given, so repository links can be rendered.
    GithubLinks,
}

/// A validated answer set plus everything derived from it.
///
/// Serialized as-is into the template context, so field names are the
/// placeholder names templates use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Context {
    pub plugin_name: String,
    pub plugin_slug: String,
    pub plugin_class_name: String,
    pub package_name: String,
    pub env_prefix: String,
    pub plugin_short_description: String,
    pub author_name: String,
    pub author_email: String,
    pub github_username: String,
    pub version: String,
    pub python_version: String,
    pub license: License,
    pub plugin_category: Category,
    pub icon_name: String,
    pub register_to_models: ModelSelection,
    pub registered_models: Vec<Model>,
    pub include_settings: bool,
    pub use_waffle: bool,
    pub copyright_year: String,
}

impl Context {
    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::IncludeSettings => self.include_settings,
            Flag::UseWaffle => self.use_waffle,
            Flag::GithubLinks => !self.github_username.is_empty(),
        }
    }
}

/// Validates a raw answer set and derives the generation context.
///
/// # Errors
/// * `Error::ValidationError` naming the first offending field
pub fn normalize(answers: &Answers) -> Result<Context> {
    let plugin_name = required(answers, "plugin_name")?;
    check_literal("plugin_name", &plugin_name)?;

    let plugin_slug = match optional(answers, "plugin_slug")? {
        Some(slug) if !naming::is_valid_slug(&slug) => {
            return Err(Error::validation(
                "plugin_slug",
                format!("'{slug}' must be lowercase words of [a-z0-9] joined by single underscores, starting with a letter"),
            ));
        }
        Some(slug) => slug,
        None => naming::slugify(&plugin_name),
    };

    let plugin_class_name = match optional(answers, "plugin_class_name")? {
        Some(class_name) if !naming::is_valid_class_name(&class_name) => {
            return Err(Error::validation(
                "plugin_class_name",
                format!("'{class_name}' must be an upper camel case identifier"),
            ));
        }
        Some(class_name) => class_name,
        None => naming::classify(&plugin_name),
    };

    let author_name = required(answers, "author_name")?;
    check_literal("author_name", &author_name)?;
    let author_email = required(answers, "author_email")?;
    check_literal("author_email", &author_email)?;
    if author_email.split('@').count() != 2 || author_email.split('@').any(str::is_empty) {
        return Err(Error::validation("author_email", format!("'{author_email}' is not an email address")));
    }

    let version = required(answers, "version")?;
    check(&VERSION, "version", &version, "is not a MAJOR.MINOR.PATCH version")?;

    let license: License = required(answers, "license")?.parse()?;

    let plugin_category: Category = optional(answers, "plugin_category")?
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
        .parse()?;

    let python_version = optional(answers, "python_version")?
        .unwrap_or_else(|| DEFAULT_PYTHON_VERSION.to_string());
    check(&PYTHON_VERSION, "python_version", &python_version, "is not a Python 3 version like 3.11")?;

    let icon_name = optional(answers, "icon_name")?.unwrap_or_else(|| DEFAULT_ICON.to_string());
    check(&ICON, "icon_name", &icon_name, "must be a lowercase, hyphenated icon name")?;

    let github_username = optional(answers, "github_username")?.unwrap_or_default();
    check(&GITHUB_USERNAME, "github_username", &github_username, "is not a GitHub username")?;

    let copyright_year = optional(answers, "copyright_year")?
        .unwrap_or_else(|| chrono::Local::now().year().to_string());
    check(&YEAR, "copyright_year", &copyright_year, "is not a four digit year")?;

    let plugin_short_description = optional(answers, "plugin_short_description")?
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    check_literal("plugin_short_description", &plugin_short_description)?;

    let mut register_to_models = ModelSelection::default();
    match answers.get(MODELS_GROUP) {
        None | Some(serde_json::Value::Null) => {}
        Some(serde_json::Value::Object(_)) => {
            for model in Model::ALL {
                let field = format!("{MODELS_GROUP}.{}", model.key());
                register_to_models.set(model, yes_no(answers, &field, false)?);
            }
        }
        Some(_) => {
            return Err(Error::validation(MODELS_GROUP, "must be a group of yes/no answers"));
        }
    }
    let registered_models = register_to_models.models();
    if registered_models.is_empty() {
        return Err(Error::validation(MODELS_GROUP, "must select at least one model"));
    }

    let context = Context {
        package_name: naming::package_name(&plugin_slug),
        env_prefix: naming::env_prefix(&plugin_slug),
        plugin_short_description,
        include_settings: yes_no(answers, "include_settings", false)?,
        use_waffle: yes_no(answers, "use_waffle", false)?,
        plugin_name,
        plugin_slug,
        plugin_class_name,
        author_name,
        author_email,
        github_username,
        version,
        python_version,
        license,
        plugin_category,
        icon_name,
        register_to_models,
        registered_models,
        copyright_year,
    };
    debug!("Normalized context: {context:?}");
    Ok(context)
}

fn required(answers: &Answers, field: &str) -> Result<String> {
    optional(answers, field)?
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::validation(field, "is required"))
}

fn optional(answers: &Answers, field: &str) -> Result<Option<String>> {
    match answers.get(field) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(value)) => Ok(Some(value.trim().to_string())),
        // `3.10` parses as the float 3.1, so its digits cannot be trusted.
        Some(serde_json::Value::Number(value)) if value.is_f64() => Err(Error::validation(
            field,
            format!("must be quoted text, got the number {value}"),
        )),
        Some(serde_json::Value::Number(value)) => Ok(Some(value.to_string())),
        Some(other) => Err(Error::validation(field, format!("must be text, got {other}"))),
    }
}

/// Coerces a yes/no answer. JSON booleans are accepted as well.
fn yes_no(answers: &Answers, field: &str, default: bool) -> Result<bool> {
    match answers.get(field) {
        None | Some(serde_json::Value::Null) => Ok(default),
        Some(serde_json::Value::Bool(value)) => Ok(*value),
        Some(serde_json::Value::String(value)) if value == "yes" => Ok(true),
        Some(serde_json::Value::String(value)) if value == "no" => Ok(false),
        Some(other) => Err(Error::validation(field, format!("must be \"yes\" or \"no\", got {other}"))),
    }
}

fn check(pattern: &Regex, field: &str, value: &str, reason: &str) -> Result<()> {
    if pattern.is_match(value) {
        Ok(())
    } else {
        Err(Error::validation(field, format!("'{value}' {reason}")))
    }
}

/// Free text is emitted inside Python and TOML string literals.
fn check_literal(field: &str, value: &str) -> Result<()> {
    match value.chars().find(|c| *c == '"' || *c == '\\' || c.is_control()) {
        Some(c) => Err(Error::validation(field, format!("must not contain {c:?}"))),
        None => Ok(()),
    }
}

fn ids<T: fmt::Display>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
