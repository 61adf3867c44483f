//! Inclusion planning.
//!
//! A [`FileEntry`] describes one output file: a path template, the predicate
//! deciding whether the file exists, and the ordered [`Region`]s making up its
//! content. [`plan`] evaluates every predicate against one [`Context`] and
//! records the outcome; it never touches template text.

use crate::context::{Context, Flag, License, Model};

/// Boolean expression over the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Always,
    Never,
    Flag(Flag),
    Model(Model),
    License(License),
}

impl Predicate {
    pub fn eval(&self, context: &Context) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Never => false,
            Predicate::Flag(flag) => context.flag(*flag),
            Predicate::Model(model) => context.register_to_models.contains(*model),
            Predicate::License(license) => context.license == *license,
        }
    }
}

/// Content of a region.
#[derive(Debug, Clone)]
pub enum Body {
    /// Rendered through the template engine.
    Template(&'static str),
    /// Emitted byte for byte, for text carrying its own `{{ }}` syntax.
    Verbatim(&'static str),
    /// Independently gated items joined by `separator`, e.g. an argument list.
    List { items: Vec<(Predicate, &'static str)>, separator: &'static str },
}

/// Independently gated block of a file.
#[derive(Debug, Clone)]
pub struct Region {
    pub id: String,
    pub when: Predicate,
    pub body: Body,
    /// Extra variables visible only while rendering this region.
    pub locals: Vec<(&'static str, serde_json::Value)>,
}

impl Region {
    pub fn new<S: Into<String>>(id: S, when: Predicate, body: Body) -> Self {
        Self { id: id.into(), when, body, locals: Vec::new() }
    }

    /// Region that is always part of its file.
    pub fn always<S: Into<String>>(id: S, body: Body) -> Self {
        Self::new(id, Predicate::Always, body)
    }

    pub fn with_local(mut self, name: &'static str, value: serde_json::Value) -> Self {
        self.locals.push((name, value));
        self
    }
}

/// One file of the generated tree.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path relative to the project directory, may contain placeholders.
    pub path: &'static str,
    pub when: Predicate,
    pub regions: Vec<Region>,
}

impl FileEntry {
    pub fn new(path: &'static str, when: Predicate, regions: Vec<Region>) -> Self {
        Self { path, when, regions }
    }

    /// File made of a single template body.
    pub fn template(path: &'static str, when: Predicate, template: &'static str) -> Self {
        Self::new(path, when, vec![Region::always("body", Body::Template(template))])
    }

    /// File copied without substitution.
    pub fn verbatim(path: &'static str, text: &'static str) -> Self {
        Self::new(path, Predicate::Always, vec![Region::always("body", Body::Verbatim(text))])
    }
}

/// A path the convergence pass may delete, with the predicate under which
/// it legitimately exists.
#[derive(Debug, Clone)]
pub struct ConditionalPath {
    pub path: &'static str,
    pub gate: Predicate,
}

/// Decision for one region of an included file.
#[derive(Debug)]
pub struct RegionDecision<'a> {
    pub region: &'a Region,
    pub included: bool,
    /// Per-item decisions for [`Body::List`], empty otherwise.
    pub items: Vec<bool>,
}

/// Decision for one file entry.
#[derive(Debug)]
pub struct FileDecision<'a> {
    pub entry: &'a FileEntry,
    pub included: bool,
    /// Region decisions, empty when the file is excluded.
    pub regions: Vec<RegionDecision<'a>>,
}

/// Every inclusion decision of a run, in blueprint order.
#[derive(Debug)]
pub struct Plan<'a> {
    pub files: Vec<FileDecision<'a>>,
}

impl<'a> Plan<'a> {
    pub fn included(&self) -> impl Iterator<Item = &FileDecision<'a>> {
        self.files.iter().filter(|file| file.included)
    }

    /// Looks up the decision for a path template, e.g. `"{{ plugin_slug }}/plugins.py"`.
    /// When several entries share the template (`LICENSE`), the included one wins.
    pub fn file(&self, path: &str) -> Option<&FileDecision<'a>> {
        let mut matching = self.files.iter().filter(|file| file.entry.path == path);
        let first = matching.clone().next();
        matching.find(|file| file.included).or(first)
    }
}

impl FileDecision<'_> {
    pub fn region(&self, id: &str) -> Option<&RegionDecision<'_>> {
        self.regions.iter().find(|decision| decision.region.id == id)
    }
}

/// Evaluates every file, region and list item predicate against `context`.
pub fn plan<'a>(entries: &'a [FileEntry], context: &Context) -> Plan<'a> {
    let files = entries
        .iter()
        .map(|entry| {
            let included = entry.when.eval(context);
            let regions = if included {
                entry.regions.iter().map(|region| decide_region(region, context)).collect()
            } else {
                Vec::new()
            };
            FileDecision { entry, included, regions }
        })
        .collect();
    Plan { files }
}

fn decide_region<'a>(region: &'a Region, context: &Context) -> RegionDecision<'a> {
    let included = region.when.eval(context);
    let items = match &region.body {
        Body::List { items, .. } if included => {
            items.iter().map(|(when, _)| when.eval(context)).collect()
        }
        _ => Vec::new(),
    };
    RegionDecision { region, included, items }
}
