//! Template rendering for plugsmith.
//! Turns a [`Plan`] into a [`RenderedTree`]: path placeholders are substituted and
//! each included region is emitted in order, all from one context snapshot.
use crate::context::Context;
use crate::error::{Error, Result};
use crate::naming;
use crate::plan::{Body, ConditionalPath, FileDecision, Plan};
use cruet::Inflector;
use log::debug;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use std::collections::BTreeMap;
use std::path::{Component, Path};

/// Relative path to final file content. Sorted, so iteration order is stable.
pub type RenderedTree = BTreeMap<String, String>;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `name` - Name reported in errors, usually the output path
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Errors
    /// * `Error::RenderError` for syntax errors and undefined variables
    fn render(&self, name: &str, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer that fails on undefined variables, keeps trailing
    /// newlines, never escapes output, and exposes the identifier filters
    /// `slugify`, `classify` and `kebab_case`.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("slugify", |value: String| naming::slugify(&value));
        env.add_filter("classify", |value: String| naming::classify(&value));
        env.add_filter("kebab_case", |value: String| value.to_kebab_case());
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, name: &str, template: &str, context: &serde_json::Value) -> Result<String> {
        self.env.render_named_str(name, template, context).map_err(|e| Error::RenderError {
            path: name.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Serializes the context once; every path and region of a run renders from this value.
pub fn snapshot(context: &Context) -> Result<serde_json::Value> {
    serde_json::to_value(context).map_err(|e| Error::RenderError {
        path: "<context>".to_string(),
        reason: e.to_string(),
    })
}

/// Renders every included file of `plan`.
///
/// # Errors
/// * `Error::RenderError` if a template fails, a path renders to something
///   unusable, or two entries render to the same path
pub fn render_tree(
    renderer: &dyn TemplateRenderer,
    context: &Context,
    plan: &Plan,
) -> Result<RenderedTree> {
    let snapshot = snapshot(context)?;
    let mut tree = RenderedTree::new();

    for file in plan.included() {
        let path = render_path(renderer, file.entry.path, &snapshot)?;
        let content = render_file(renderer, &path, file, &snapshot)?;
        debug!("Rendered {} ({} bytes)", path, content.len());
        if tree.insert(path.clone(), content).is_some() {
            return Err(Error::RenderError {
                path,
                reason: "more than one file entry renders to this path".to_string(),
            });
        }
    }
    Ok(tree)
}

/// A registry path with its placeholders resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub path: String,
    /// Whether the gate allows the path to exist for this context.
    pub allowed: bool,
}

/// Resolves the conditional registry against the same context as the tree.
pub fn render_conditional(
    renderer: &dyn TemplateRenderer,
    context: &Context,
    registry: &[ConditionalPath],
) -> Result<Vec<ResolvedPath>> {
    let snapshot = snapshot(context)?;
    registry
        .iter()
        .map(|entry| {
            Ok(ResolvedPath {
                path: render_path(renderer, entry.path, &snapshot)?,
                allowed: entry.gate.eval(context),
            })
        })
        .collect()
}

fn render_path(
    renderer: &dyn TemplateRenderer,
    template: &str,
    snapshot: &serde_json::Value,
) -> Result<String> {
    let path = renderer.render(template, template, snapshot)?;
    if !is_rendered_path_valid(&path) {
        return Err(Error::RenderError {
            path: template.to_string(),
            reason: format!("rendered path '{path}' is not a relative file path"),
        });
    }
    Ok(path)
}

fn render_file(
    renderer: &dyn TemplateRenderer,
    path: &str,
    file: &FileDecision,
    snapshot: &serde_json::Value,
) -> Result<String> {
    let mut content = String::new();

    for decision in file.regions.iter().filter(|decision| decision.included) {
        let region = decision.region;
        let name = format!("{path}#{}", region.id);
        let scope = with_locals(snapshot, &region.locals);

        match &region.body {
            Body::Template(template) => content.push_str(&renderer.render(&name, template, &scope)?),
            Body::Verbatim(text) => content.push_str(text),
            Body::List { items, separator } => {
                let rendered = items
                    .iter()
                    .zip(&decision.items)
                    .filter(|(_, included)| **included)
                    .map(|((_, item), _)| renderer.render(&name, item, &scope))
                    .collect::<Result<Vec<_>>>()?;
                content.push_str(&rendered.join(separator));
            }
        }
    }
    Ok(content)
}

fn with_locals(
    snapshot: &serde_json::Value,
    locals: &[(&'static str, serde_json::Value)],
) -> serde_json::Value {
    if locals.is_empty() {
        return snapshot.clone();
    }
    let mut scope = snapshot.clone();
    if let serde_json::Value::Object(map) = &mut scope {
        for (name, value) in locals {
            map.insert((*name).to_string(), value.clone());
        }
    }
    scope
}

/// A rendered path must be non-empty, relative, and made only of normal components.
pub fn is_rendered_path_valid(path: &str) -> bool {
    if path.trim().is_empty() || path.contains("//") || path.trim() != path {
        return false;
    }
    Path::new(path).components().all(|component| matches!(component, Component::Normal(_)))
}
