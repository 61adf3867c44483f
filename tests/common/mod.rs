#![allow(dead_code)]

use plugsmith::answers::Answers;
use plugsmith::context::{normalize, Context};
use serde_json::{json, Value};

pub fn answers(value: Value) -> Answers {
    Answers::parse(&value.to_string()).unwrap()
}

pub fn context(value: Value) -> Context {
    normalize(&answers(value)).unwrap()
}

pub fn default_json() -> Value {
    json!({
        "plugin_name": "Test Plugin",
        "plugin_slug": "test_plugin",
        "plugin_short_description": "A test plugin for validation",
        "plugin_class_name": "TestPlugin",
        "author_name": "Test Author",
        "author_email": "test@example.com",
        "github_username": "testuser",
        "version": "0.1.0",
        "python_version": "3.11",
        "license": "MIT",
        "register_to_models__project": "yes",
        "register_to_models__dataset": "yes",
        "register_to_models__sample": "no",
        "register_to_models__measurement": "no",
        "plugin_category": "EXPLORE",
        "icon_name": "puzzle-piece",
        "copyright_year": "2025"
    })
}

pub fn minimal_json() -> Value {
    json!({
        "plugin_name": "Minimal Plugin",
        "author_name": "Test Author",
        "author_email": "test@example.com",
        "version": "0.1.0",
        "license": "MIT",
        "register_to_models": {"project": "yes"},
        "plugin_category": "ACTIONS",
        "icon_name": "cog",
        "copyright_year": "2025"
    })
}

pub fn full_features_json() -> Value {
    json!({
        "plugin_name": "Full Features Plugin",
        "plugin_short_description": "Plugin with all features enabled",
        "author_name": "Test Author",
        "author_email": "test@example.com",
        "github_username": "testuser",
        "version": "0.1.0",
        "python_version": "3.12",
        "license": "Apache-2.0",
        "register_to_models": {
            "project": "yes",
            "dataset": "yes",
            "sample": "yes",
            "measurement": "yes"
        },
        "plugin_category": "MANAGEMENT",
        "icon_name": "shield",
        "include_settings": "yes",
        "use_waffle": "yes",
        "copyright_year": "2025"
    })
}

/// Sets `key` on a JSON answer set.
pub fn with(mut value: Value, key: &str, new: Value) -> Value {
    value.as_object_mut().unwrap().insert(key.to_string(), new);
    value
}

/// Removes `key` from a JSON answer set.
pub fn without(mut value: Value, key: &str) -> Value {
    value.as_object_mut().unwrap().remove(key);
    value
}

/// Replaces the model selection with `[project, dataset, sample, measurement]`.
pub fn with_models(value: Value, selected: [bool; 4]) -> Value {
    let yes_no = |selected: bool| if selected { "yes" } else { "no" };
    let mut value = value;
    for key in [
        "register_to_models__project",
        "register_to_models__dataset",
        "register_to_models__sample",
        "register_to_models__measurement",
    ] {
        value = without(value, key);
    }
    with(
        value,
        "register_to_models",
        json!({
            "project": yes_no(selected[0]),
            "dataset": yes_no(selected[1]),
            "sample": yes_no(selected[2]),
            "measurement": yes_no(selected[3]),
        }),
    )
}

/// Every non-empty model selection.
pub fn model_selections() -> Vec<[bool; 4]> {
    (1u8..16)
        .map(|mask| [mask & 1 != 0, mask & 2 != 0, mask & 4 != 0, mask & 8 != 0])
        .collect()
}
