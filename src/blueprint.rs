//! The generated plugin package: every file it can contain, the regions of each
//! file and the registry of paths the convergence pass may delete.
//! Template bodies live under `templates/` and are embedded at compile time.

use crate::context::{Flag, License, Model};
use crate::plan::{Body, ConditionalPath, FileEntry, Predicate, Region};

macro_rules! template {
    ($path:literal) => {
        include_str!(concat!("../templates/", $path))
    };
}

const IMPORT_MODEL: &str = template!("shared/import_model.py.j2");
const MODEL_BULLET: &str = template!("shared/model_bullet.md.j2");

/// File entries and conditional registry for a FairDM plugin package.
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub files: Vec<FileEntry>,
    pub conditional: Vec<ConditionalPath>,
}

impl Default for Blueprint {
    fn default() -> Self {
        Blueprint::plugin()
    }
}

impl Blueprint {
    pub fn plugin() -> Self {
        let mut files = vec![
            FileEntry::template(
                "{{ plugin_slug }}/__init__.py",
                Predicate::Always,
                template!("package/__init__.py.j2"),
            ),
            FileEntry::template(
                "{{ plugin_slug }}/apps.py",
                Predicate::Always,
                template!("package/apps.py.j2"),
            ),
            FileEntry::new("{{ plugin_slug }}/plugins.py", Predicate::Always, plugins_py()),
            FileEntry::template(
                "{{ plugin_slug }}/settings.py",
                Predicate::Flag(Flag::IncludeSettings),
                template!("package/settings.py.j2"),
            ),
            FileEntry::new(
                "{{ plugin_slug }}/templates/{{ plugin_slug }}/{{ plugin_slug }}.html",
                Predicate::Always,
                vec![
                    Region::always("head", Body::Verbatim(template!("package/html/head.html"))),
                    Region::always("title", Body::Template(template!("package/html/title.html.j2"))),
                    Region::always("body", Body::Verbatim(template!("package/html/body.html"))),
                ],
            ),
            FileEntry::verbatim("tests/__init__.py", ""),
            FileEntry::template("tests/conftest.py", Predicate::Always, template!("tests/conftest.py.j2")),
            FileEntry::template("tests/test_apps.py", Predicate::Always, template!("tests/test_apps.py.j2")),
            FileEntry::new("tests/test_plugins.py", Predicate::Always, test_plugins_py()),
            FileEntry::template("tests/README.md", Predicate::Always, template!("tests/README.md.j2")),
            FileEntry::template(
                ".github/instructions/copilot.instructions.md",
                Predicate::Always,
                template!("github/instructions/copilot.instructions.md.j2"),
            ),
            FileEntry::template(
                ".github/instructions/testing.instructions.md",
                Predicate::Always,
                template!("github/instructions/testing.instructions.md.j2"),
            ),
            FileEntry::verbatim(".github/workflows/tests.yml", template!("github/workflows/tests.yml")),
            FileEntry::template(
                ".github/ISSUE_TEMPLATE/bug_report.yml",
                Predicate::Always,
                template!("github/issue_template/bug_report.yml.j2"),
            ),
            FileEntry::template(
                ".github/ISSUE_TEMPLATE/feature_request.yml",
                Predicate::Always,
                template!("github/issue_template/feature_request.yml.j2"),
            ),
            FileEntry::verbatim(
                ".github/pull_request_template.md",
                template!("github/pull_request_template.md"),
            ),
            FileEntry::verbatim(".github/dependabot.yml", template!("github/dependabot.yml")),
            FileEntry::new("pyproject.toml", Predicate::Always, pyproject_toml()),
            FileEntry::verbatim(".gitignore", template!("root/gitignore")),
            FileEntry::verbatim(".pre-commit-config.yaml", template!("root/pre-commit-config.yaml")),
            FileEntry::verbatim("codecov.yml", template!("root/codecov.yml")),
            FileEntry::new("README.md", Predicate::Always, readme_md()),
            FileEntry::template("CHANGELOG.md", Predicate::Always, template!("root/CHANGELOG.md.j2")),
            FileEntry::template("CONTRIBUTING.md", Predicate::Always, template!("root/CONTRIBUTING.md.j2")),
            FileEntry::template(
                "{{ plugin_slug }}.code-workspace",
                Predicate::Always,
                template!("root/workspace.code-workspace.j2"),
            ),
        ];
        files.extend(licenses());

        let conditional = vec![
            ConditionalPath {
                path: "{{ plugin_slug }}/settings.py",
                gate: Predicate::Flag(Flag::IncludeSettings),
            },
            // Retired layout, never produced by any answer set.
            ConditionalPath { path: "{{ plugin_slug }}/urls.py", gate: Predicate::Never },
            ConditionalPath { path: "{{ plugin_slug }}/templatetags", gate: Predicate::Never },
            ConditionalPath { path: "{{ plugin_slug }}/templates/cotton", gate: Predicate::Never },
            ConditionalPath {
                path: "{{ plugin_slug }}/templates/{{ plugin_slug }}/plugin.html",
                gate: Predicate::Never,
            },
        ];

        Self { files, conditional }
    }
}

fn licenses() -> Vec<FileEntry> {
    License::ALL
        .into_iter()
        .map(|license| {
            let body = match license {
                License::Mit => template!("licenses/MIT.j2"),
                License::Bsd3Clause => template!("licenses/BSD-3-Clause.j2"),
                License::Apache2 => template!("licenses/Apache-2.0.j2"),
                License::Gpl3 => template!("licenses/GPL-3.0.j2"),
            };
            FileEntry::template("LICENSE", Predicate::License(license), body)
        })
        .collect()
}

/// One region per model, in declared order.
fn per_model<'a>(prefix: &'a str, body: &'static str) -> impl Iterator<Item = Region> + 'a {
    Model::ALL.into_iter().map(move |model| {
        Region::new(format!("{prefix}_{}", model.key()), Predicate::Model(model), Body::Template(body))
            .with_local("model", model.to_value())
    })
}

fn model_arguments() -> Body {
    Body::List {
        items: Model::ALL.into_iter().map(|model| (Predicate::Model(model), model.name())).collect(),
        separator: ", ",
    }
}

fn plugins_py() -> Vec<Region> {
    let mut regions =
        vec![Region::always("imports", Body::Template(template!("package/plugins/imports.py.j2")))];
    regions.extend(per_model("import", IMPORT_MODEL));
    regions.push(Region::new(
        "import_waffle",
        Predicate::Flag(Flag::UseWaffle),
        Body::Template(template!("package/plugins/import_waffle.py.j2")),
    ));
    regions.push(Region::always("register_open", Body::Verbatim("\n\n@plugins.register(")));
    regions.push(Region::always("register_models", model_arguments()));
    regions.push(Region::always(
        "class_head",
        Body::Template(template!("package/plugins/class_head.py.j2")),
    ));
    regions.extend(per_model("doc", "    - {{ model.name }}\n"));
    regions.push(Region::always(
        "class_body",
        Body::Template(template!("package/plugins/class_body.py.j2")),
    ));
    regions.push(Region::new(
        "waffle_switch",
        Predicate::Flag(Flag::UseWaffle),
        Body::Template(template!("package/plugins/waffle_switch.py.j2")),
    ));
    regions.push(Region::always(
        "class_tail",
        Body::Template(template!("package/plugins/class_tail.py.j2")),
    ));
    regions
}

fn test_plugins_py() -> Vec<Region> {
    let mut regions =
        vec![Region::always("header", Body::Template(template!("tests/test_plugins/header.py.j2")))];
    regions.extend(per_model("import", IMPORT_MODEL));
    regions.push(Region::always(
        "registered_open",
        Body::Template(template!("tests/test_plugins/registered_open.py.j2")),
    ));
    regions.push(Region::always("registered_models", model_arguments()));
    regions.push(Region::always(
        "classes",
        Body::Template(template!("tests/test_plugins/classes.py.j2")),
    ));
    regions.extend(per_model("view", template!("tests/test_plugins/view_test.py.j2")));
    regions
}

fn pyproject_toml() -> Vec<Region> {
    vec![
        Region::always("poetry", Body::Template(template!("root/pyproject/head.toml.j2"))),
        Region::new(
            "links",
            Predicate::Flag(Flag::GithubLinks),
            Body::Template(template!("root/pyproject/links.toml.j2")),
        ),
        Region::always(
            "dependencies",
            Body::Template(template!("root/pyproject/dependencies.toml.j2")),
        ),
        Region::new(
            "waffle",
            Predicate::Flag(Flag::UseWaffle),
            Body::Template(template!("root/pyproject/waffle.toml.j2")),
        ),
        Region::always("tail", Body::Template(template!("root/pyproject/tail.toml.j2"))),
    ]
}

fn readme_md() -> Vec<Region> {
    let mut regions =
        vec![Region::always("head", Body::Template(template!("root/readme/head.md.j2")))];
    regions.extend(per_model("model", MODEL_BULLET));
    regions.extend([
        Region::new(
            "settings",
            Predicate::Flag(Flag::IncludeSettings),
            Body::Template(template!("root/readme/settings.md.j2")),
        ),
        Region::new(
            "waffle",
            Predicate::Flag(Flag::UseWaffle),
            Body::Template(template!("root/readme/waffle.md.j2")),
        ),
        Region::always("development", Body::Template(template!("root/readme/development.md.j2"))),
        Region::new(
            "links",
            Predicate::Flag(Flag::GithubLinks),
            Body::Template(template!("root/readme/links.md.j2")),
        ),
        Region::always("license", Body::Template(template!("root/readme/license.md.j2"))),
    ]);
    regions
}
