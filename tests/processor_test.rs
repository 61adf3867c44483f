mod common;

use std::fs;
use std::path::Path;

use common::{
    answers, context, default_json, full_features_json, minimal_json, model_selections, with,
    with_models,
};
use plugsmith::blueprint::Blueprint;
use plugsmith::context::Model;
use plugsmith::error::{Error, Stage};
use plugsmith::materializer::ensure_project_dir;
use plugsmith::processor::Processor;
use plugsmith::renderer::MiniJinjaRenderer;
use serde_json::json;
use tempfile::TempDir;

const DEFAULT_FILES: &[&str] = &[
    "test_plugin/__init__.py",
    "test_plugin/apps.py",
    "test_plugin/plugins.py",
    "test_plugin/templates/test_plugin/test_plugin.html",
    "tests/__init__.py",
    "tests/conftest.py",
    "tests/test_apps.py",
    "tests/test_plugins.py",
    "tests/README.md",
    ".github/instructions/copilot.instructions.md",
    ".github/instructions/testing.instructions.md",
    ".github/workflows/tests.yml",
    ".github/ISSUE_TEMPLATE/bug_report.yml",
    ".github/ISSUE_TEMPLATE/feature_request.yml",
    ".github/pull_request_template.md",
    ".github/dependabot.yml",
    "pyproject.toml",
    ".gitignore",
    ".pre-commit-config.yaml",
    "codecov.yml",
    "README.md",
    "CHANGELOG.md",
    "CONTRIBUTING.md",
    "test_plugin.code-workspace",
    "LICENSE",
];

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap_or_else(|e| panic!("reading {path}: {e}"))
}

fn expected_arguments(selected: [bool; 4]) -> String {
    Model::ALL
        .into_iter()
        .zip(selected)
        .filter(|(_, selected)| *selected)
        .map(|(model, _)| model.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[test_log::test]
fn test_generate_default_layout() {
    let temp_dir = TempDir::new().unwrap();
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let processor = Processor::new(&renderer, &blueprint);

    let outcome = processor.generate(&answers(default_json()), temp_dir.path(), false).unwrap();

    assert_eq!(outcome.project_dir, temp_dir.path().join("test_plugin"));
    assert_eq!(outcome.written.len(), DEFAULT_FILES.len());
    assert!(outcome.removed.is_empty());
    for path in DEFAULT_FILES {
        assert!(outcome.project_dir.join(path).is_file(), "missing {path}");
    }
    assert!(!outcome.project_dir.join("test_plugin/settings.py").exists());
    assert!(!outcome.project_dir.join("test_plugin/urls.py").exists());
    assert!(!outcome.project_dir.join("test_plugin/templatetags").exists());
    assert_eq!(read(&outcome.project_dir, "tests/__init__.py"), "");
}

#[test]
fn test_minimal_plugin_registers_project_only() {
    let ctx = context(minimal_json());
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let tree = Processor::new(&renderer, &blueprint).render(&ctx).unwrap();

    let plugins = &tree["minimal_plugin/plugins.py"];
    assert!(plugins.contains("from fairdm.core.project.models import Project\n"));
    assert!(!plugins.contains("fairdm.core.dataset"));
    assert!(plugins.contains("\n\n@plugins.register(Project)\nclass MinimalPlugin("));
    assert!(plugins.contains("category=plugins.ACTIONS,"));
    assert!(plugins.contains("icon=\"cog\","));
    assert!(!plugins.contains("waffle"));
    assert!(!tree.contains_key("minimal_plugin/settings.py"));
}

#[test]
fn test_full_features_plugin() {
    let ctx = context(full_features_json());
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let tree = Processor::new(&renderer, &blueprint).render(&ctx).unwrap();

    let plugins = &tree["full_features_plugin/plugins.py"];
    assert!(plugins.contains("@plugins.register(Project, Dataset, Sample, Measurement)\n"));
    assert!(plugins.contains("import waffle\n"));
    assert!(plugins.contains("waffle.switch_is_active(\"enable_full_features_plugin\")"));
    assert!(plugins.contains("    - Measurement\n"));

    let settings = &tree["full_features_plugin/settings.py"];
    assert!(settings.contains("FULL_FEATURES_PLUGIN_SETTING_NAME"));

    let pyproject = &tree["pyproject.toml"];
    assert!(pyproject.contains("name = \"full-features-plugin\""));
    assert!(pyproject.contains("django-waffle"));
    assert!(pyproject.contains("license = \"Apache-2.0\""));
    assert!(tree["LICENSE"].contains("Apache License"));

    let readme = &tree["README.md"];
    assert!(readme.contains("## Settings"));
    assert!(readme.contains("testuser"));
}

#[test]
fn test_registration_for_every_model_selection() {
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let processor = Processor::new(&renderer, &blueprint);

    for selected in model_selections() {
        let tree = processor.render(&context(with_models(default_json(), selected))).unwrap();
        let arguments = expected_arguments(selected);
        let plugins = &tree["test_plugin/plugins.py"];
        let tests = &tree["tests/test_plugins.py"];

        assert!(
            plugins.contains(&format!("@plugins.register({arguments})\nclass TestPlugin(")),
            "{selected:?}"
        );
        assert!(tests.contains(&format!("REGISTERED_MODELS = [{arguments}]\n")), "{selected:?}");
        for (model, selected) in Model::ALL.into_iter().zip(selected) {
            let import = format!("from fairdm.core.{}.models import {}\n", model.key(), model.name());
            assert_eq!(plugins.contains(&import), selected, "{import}");
            assert_eq!(tests.contains(&import), selected, "{import}");
            let view_test = format!("def test_plugin_view_with_{}(", model.key());
            assert_eq!(tests.contains(&view_test), selected, "{view_test}");
        }
    }
}

#[test]
fn test_registration_order_ignores_answer_order() {
    let value = with(
        with_models(default_json(), [false; 4]),
        "register_to_models",
        json!({"measurement": "yes", "dataset": "yes", "sample": "yes", "project": "yes"}),
    );
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let tree = Processor::new(&renderer, &blueprint).render(&context(value)).unwrap();

    assert!(tree["test_plugin/plugins.py"]
        .contains("@plugins.register(Project, Dataset, Sample, Measurement)"));
}

#[test]
fn test_settings_file_follows_answer() {
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let processor = Processor::new(&renderer, &blueprint);

    let with_settings =
        processor.render(&context(with(default_json(), "include_settings", json!("yes")))).unwrap();
    let without_settings =
        processor.render(&context(with(default_json(), "include_settings", json!("no")))).unwrap();

    assert!(with_settings.contains_key("test_plugin/settings.py"));
    assert!(!without_settings.contains_key("test_plugin/settings.py"));
    assert_eq!(with_settings.len(), without_settings.len() + 1);
}

#[test]
fn test_each_license_renders_its_own_text() {
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let processor = Processor::new(&renderer, &blueprint);

    let mit = processor.render(&context(default_json())).unwrap();
    let apache =
        processor.render(&context(with(default_json(), "license", json!("Apache-2.0")))).unwrap();

    assert!(mit["LICENSE"].starts_with("MIT License\n"));
    assert!(mit["LICENSE"].contains("Copyright (c) 2025 Test Author"));
    assert!(!mit["LICENSE"].contains("Apache"));
    assert!(apache["LICENSE"].contains("Apache License"));
    assert!(!apache["LICENSE"].contains("MIT License"));
    assert!(mit["pyproject.toml"].contains("license = \"MIT\""));
}

#[test]
fn test_identifiers_consistent_across_files() {
    let value = with(default_json(), "plugin_name", json!("CSV-Exporter"));
    let value = common::without(common::without(value, "plugin_slug"), "plugin_class_name");
    let value = with(value, "include_settings", json!("yes"));
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let tree = Processor::new(&renderer, &blueprint).render(&context(value)).unwrap();

    assert!(tree["csv_exporter/apps.py"].contains("name = \"csv_exporter\""));
    assert!(tree["csv_exporter/apps.py"].contains("class CSVExporterConfig(AppConfig):"));
    assert!(tree["csv_exporter/plugins.py"].contains("class CSVExporter("));
    assert!(tree["csv_exporter/plugins.py"]
        .contains("template_name = \"csv_exporter/csv_exporter.html\""));
    assert!(tree.contains_key("csv_exporter/templates/csv_exporter/csv_exporter.html"));
    assert!(tree["csv_exporter/settings.py"].contains("CSV_EXPORTER_"));
    assert!(tree["tests/test_plugins.py"].contains("from csv_exporter.plugins import CSVExporter"));
    assert!(tree["pyproject.toml"].contains("name = \"csv-exporter\""));
    assert!(tree.contains_key("csv_exporter.code-workspace"));
}

#[test]
fn test_no_placeholders_left_behind() {
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let tree = Processor::new(&renderer, &blueprint).render(&context(full_features_json())).unwrap();

    for (path, content) in &tree {
        for leftover in ["{{ plugin_", "{{ author_", "{{ model", "{{ env_prefix"] {
            assert!(!content.contains(leftover), "{path} contains {leftover}");
        }
    }
    assert!(tree[".github/workflows/tests.yml"].contains("${{"));
}

#[test]
fn test_generation_is_deterministic() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let processor = Processor::new(&renderer, &blueprint);
    let answers = answers(full_features_json());

    let a = processor.generate(&answers, first.path(), false).unwrap();
    let b = processor.generate(&answers, second.path(), false).unwrap();

    assert!(!dir_diff::is_different(&a.project_dir, &b.project_dir).unwrap());

    // Regenerating over the same directory is a no-op.
    processor.generate(&answers, first.path(), true).unwrap();
    assert!(!dir_diff::is_different(&a.project_dir, &b.project_dir).unwrap());
}

#[test_log::test]
fn test_regeneration_removes_stale_settings() {
    let temp_dir = TempDir::new().unwrap();
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let processor = Processor::new(&renderer, &blueprint);

    let first = with(default_json(), "include_settings", json!("yes"));
    let outcome = processor.generate(&answers(first), temp_dir.path(), false).unwrap();
    let settings = outcome.project_dir.join("test_plugin/settings.py");
    assert!(settings.is_file());

    let second = with(default_json(), "include_settings", json!("no"));
    let outcome = processor.generate(&answers(second), temp_dir.path(), true).unwrap();

    assert!(!settings.exists());
    assert_eq!(outcome.removed, vec![settings]);
}

#[test]
fn test_regeneration_removes_retired_artifacts_only() {
    let temp_dir = TempDir::new().unwrap();
    let project_dir = temp_dir.path().join("test_plugin");
    fs::create_dir_all(project_dir.join("test_plugin/templatetags")).unwrap();
    fs::create_dir_all(project_dir.join("test_plugin/templates/cotton")).unwrap();
    fs::write(project_dir.join("test_plugin/templatetags/__init__.py"), "").unwrap();
    fs::write(project_dir.join("test_plugin/templates/cotton/card.html"), "").unwrap();
    fs::write(project_dir.join("test_plugin/urls.py"), "urlpatterns = []\n").unwrap();
    fs::write(project_dir.join("test_plugin/models.py"), "# user code\n").unwrap();

    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let outcome = Processor::new(&renderer, &blueprint)
        .generate(&answers(default_json()), temp_dir.path(), true)
        .unwrap();

    assert_eq!(outcome.removed.len(), 3);
    assert!(!project_dir.join("test_plugin/urls.py").exists());
    assert!(!project_dir.join("test_plugin/templatetags").exists());
    assert!(!project_dir.join("test_plugin/templates/cotton").exists());
    assert!(project_dir.join("test_plugin/templates/test_plugin/test_plugin.html").is_file());
    assert_eq!(read(&project_dir, "test_plugin/models.py"), "# user code\n");
}

#[test]
fn test_existing_project_dir_requires_force() {
    let temp_dir = TempDir::new().unwrap();
    let project_dir = temp_dir.path().join("test_plugin");
    fs::create_dir_all(&project_dir).unwrap();
    fs::write(project_dir.join("keep.txt"), "keep").unwrap();

    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let err = Processor::new(&renderer, &blueprint)
        .generate(&answers(default_json()), temp_dir.path(), false)
        .unwrap_err();

    assert!(matches!(err, Error::OutputDirectoryExistsError { .. }));
    assert_eq!(err.stage(), Stage::Materialize);
    assert_eq!(fs::read_dir(&project_dir).unwrap().count(), 1);
}

#[test]
fn test_ensure_project_dir() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    assert!(ensure_project_dir(path.join("new_dir"), false).is_ok());
    assert!(ensure_project_dir(path, false).is_err());
    assert!(ensure_project_dir(path, true).is_ok());
}

#[test]
fn test_invalid_answers_write_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let processor = Processor::new(&renderer, &blueprint);

    for value in [
        with(default_json(), "license", json!("WTFPL")),
        with_models(default_json(), [false; 4]),
        common::without(default_json(), "author_email"),
    ] {
        let err = processor.generate(&answers(value), temp_dir.path(), false).unwrap_err();
        assert_eq!(err.stage(), Stage::Normalize);
    }
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_concurrent_runs_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    let names = ["Alpha Viewer", "Beta Exporter", "Gamma Tools", "Delta Maps"];

    std::thread::scope(|scope| {
        for name in names {
            let output = temp_dir.path();
            scope.spawn(move || {
                let renderer = MiniJinjaRenderer::new();
                let blueprint = Blueprint::plugin();
                let value = common::without(
                    common::without(with(default_json(), "plugin_name", json!(name)), "plugin_slug"),
                    "plugin_class_name",
                );
                Processor::new(&renderer, &blueprint).generate(&answers(value), output, false).unwrap();
            });
        }
    });

    for name in names {
        let slug = plugsmith::naming::slugify(name);
        let apps = read(&temp_dir.path().join(&slug), &format!("{slug}/apps.py"));
        assert!(apps.contains(&format!("name = \"{slug}\"")));
        assert!(apps.contains(&format!("verbose_name = \"{name}\"")));
    }
}

#[test]
fn test_python_version_keeps_its_digits() {
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let value = with(default_json(), "python_version", json!("3.10"));
    let tree = Processor::new(&renderer, &blueprint).render(&context(value)).unwrap();

    assert!(tree["pyproject.toml"].contains("python = \"^3.10\""));
    assert!(tree["pyproject.toml"].contains("target-version = \"py310\""));
}

#[test]
fn test_text_breaking_string_literals_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let value = with(default_json(), "plugin_name", json!("My \"Quoted\" Plugin"));

    let err = Processor::new(&renderer, &blueprint)
        .generate(&answers(value), temp_dir.path(), false)
        .unwrap_err();

    assert!(matches!(err, Error::ValidationError { ref field, .. } if field == "plugin_name"));
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_keyword_name_generates_importable_package() {
    let renderer = MiniJinjaRenderer::new();
    let blueprint = Blueprint::plugin();
    let value = common::without(
        common::without(with(default_json(), "plugin_name", json!("Class")), "plugin_slug"),
        "plugin_class_name",
    );
    let tree = Processor::new(&renderer, &blueprint).render(&context(value)).unwrap();

    assert!(tree.contains_key("x_class/apps.py"));
    assert!(tree["tests/test_plugins.py"].contains("from x_class.plugins import Class\n"));
}
