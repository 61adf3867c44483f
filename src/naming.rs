//! Identifier derivation for generated plugins.
//!
//! Turns a free-form display name into the identifiers every generated file
//! agrees on: the module slug, the class name and the distribution name.
//! All derivations are total. Input with nothing usable left after
//! normalization falls back to a minimal valid identifier (`x` / `X`), and
//! identifiers that would start with a digit or collide with a Python keyword
//! are prefixed the same way.

use cruet::Inflector;
use regex::Regex;
use std::sync::LazyLock;

/// Slug used when nothing in the name survives normalization.
pub const FALLBACK_SLUG: &str = "x";

/// Class name used when nothing in the name survives normalization.
pub const FALLBACK_CLASS_NAME: &str = "X";

/// Python keywords, as they would appear in a slug.
const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// Capitalized keywords a class name could collide with.
const PYTHON_CLASS_KEYWORDS: &[&str] = &["False", "None", "True"];

/// Word boundaries: runs of whitespace, hyphens and underscores.
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("separator pattern is valid"));

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$").expect("slug pattern is valid"));

static CLASS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").expect("class pattern is valid"));

/// Derives a lowercase, underscore separated module name from `name`.
///
/// Runs of whitespace, hyphens and underscores collapse into a single `_`,
/// everything outside `[a-z0-9]` is dropped after lower-casing. The result is
/// idempotent: `slugify(&slugify(x)) == slugify(x)`.
///
/// ```
/// use plugsmith::naming::slugify;
/// assert_eq!(slugify("CSV-Exporter"), "csv_exporter");
/// assert_eq!(slugify("  My   Plugin "), "my_plugin");
/// ```
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = SEPARATORS
        .split(&lowered)
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    match slug.chars().next() {
        None => FALLBACK_SLUG.to_string(),
        Some(first) if first.is_ascii_digit() => format!("{FALLBACK_SLUG}_{slug}"),
        Some(_) if PYTHON_KEYWORDS.contains(&slug.as_str()) => format!("{FALLBACK_SLUG}_{slug}"),
        Some(_) => slug,
    }
}

/// Derives an upper-camel type name from `name`.
///
/// Words are split like [`slugify`] splits them. Only the first letter of each
/// word is forced upper, so acronyms (`API`) and intentional camelCase
/// (`dataViz` -> `DataViz`) pass through unchanged. Digits are kept, which
/// widens the letters-only class name pattern to `^[A-Z][A-Za-z0-9]*$`.
///
/// ```
/// use plugsmith::naming::classify;
/// assert_eq!(classify("CSV Exporter"), "CSVExporter");
/// assert_eq!(classify("API-Integration"), "APIIntegration");
/// ```
pub fn classify(name: &str) -> String {
    let class_name: String = SEPARATORS
        .split(name)
        .map(|word| word.chars().filter(char::is_ascii_alphanumeric).collect::<String>())
        .filter(|word| !word.is_empty())
        .map(|word| capitalize(&word))
        .collect();

    match class_name.chars().next() {
        None => FALLBACK_CLASS_NAME.to_string(),
        Some(first) if first.is_ascii_digit() => format!("{FALLBACK_CLASS_NAME}{class_name}"),
        Some(_) if PYTHON_CLASS_KEYWORDS.contains(&class_name.as_str()) => {
            format!("{FALLBACK_CLASS_NAME}{class_name}")
        }
        Some(_) => class_name,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Distribution name of the package: the slug in kebab-case.
pub fn package_name(slug: &str) -> String {
    slug.to_kebab_case()
}

/// Prefix for settings names, e.g. `MY_PLUGIN` for `MY_PLUGIN_ENABLED`.
pub fn env_prefix(slug: &str) -> String {
    slug.to_ascii_uppercase()
}

/// Whether `slug` is something [`slugify`] could have produced.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG.is_match(slug) && !PYTHON_KEYWORDS.contains(&slug)
}

/// Whether `class_name` is a valid upper-camel type name.
pub fn is_valid_class_name(class_name: &str) -> bool {
    CLASS_NAME.is_match(class_name) && !PYTHON_CLASS_KEYWORDS.contains(&class_name)
}
