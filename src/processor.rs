//! Generation pipeline: answers -> context -> plan -> rendered tree -> disk.

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::{
    answers::Answers,
    blueprint::Blueprint,
    context::{normalize, Context},
    error::Result,
    materializer::{converge, ensure_project_dir, write_tree},
    plan::{plan, Plan},
    renderer::{render_conditional, render_tree, RenderedTree, TemplateRenderer},
};

/// What a generation run left on disk.
#[derive(Debug)]
pub struct Outcome {
    /// `<output_dir>/<plugin_slug>`
    pub project_dir: PathBuf,
    pub written: Vec<PathBuf>,
    /// Stale conditional artifacts deleted by the convergence pass.
    pub removed: Vec<PathBuf>,
}

/// Runs the pipeline for one blueprint. Holds no per-run state, so one
/// processor can serve any number of runs.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    blueprint: &'a Blueprint,
}

impl<'a> Processor<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, blueprint: &'a Blueprint) -> Self {
        Self { renderer, blueprint }
    }

    pub fn plan(&self, context: &Context) -> Plan<'a> {
        plan(&self.blueprint.files, context)
    }

    /// Plans and renders without touching the filesystem.
    pub fn render(&self, context: &Context) -> Result<RenderedTree> {
        let plan = self.plan(context);
        render_tree(self.renderer, context, &plan)
    }

    /// Generates a plugin package into `<output_dir>/<plugin_slug>`.
    ///
    /// Nothing is written unless normalization and rendering both succeed.
    ///
    /// # Errors
    /// * `Error::ValidationError` for an invalid answer set
    /// * `Error::RenderError` for template failures
    /// * `Error::OutputDirectoryExistsError` if the project directory exists and `force` is false
    /// * `Error::MaterializationError` for filesystem failures, naming the path
    pub fn generate<P: AsRef<Path>>(
        &self,
        answers: &Answers,
        output_dir: P,
        force: bool,
    ) -> Result<Outcome> {
        let context = normalize(answers)?;
        info!(
            "Generating '{}' ({}, {})",
            context.plugin_name, context.plugin_slug, context.plugin_class_name
        );

        let tree = self.render(&context)?;
        let registry = render_conditional(self.renderer, &context, &self.blueprint.conditional)?;
        debug!("Rendered {} files", tree.len());

        let project_dir = ensure_project_dir(output_dir.as_ref().join(&context.plugin_slug), force)?;
        let written = write_tree(&project_dir, &tree)?;
        let removed = converge(&project_dir, &tree, &registry)?;

        Ok(Outcome { project_dir, written, removed })
    }
}
