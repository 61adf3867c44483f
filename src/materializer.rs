//! Writes a rendered tree to disk and converges the project directory to it.
//!
//! Writing never deletes. The convergence pass afterwards removes registry
//! paths that this run did not produce and whose gate is closed, so a tree
//! regenerated over an older one loses files the new answers no longer imply.
//! Paths outside the registry are never touched.

use crate::error::{Error, Result};
use crate::renderer::{RenderedTree, ResolvedPath};
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

fn materialization_error(path: &Path, source: io::Error) -> Error {
    Error::MaterializationError { path: path.to_path_buf(), source }
}

/// Ensures the project directory is safe to write to.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and `force` is false
pub fn ensure_project_dir<P: AsRef<Path>>(project_dir: P, force: bool) -> Result<PathBuf> {
    let project_dir = project_dir.as_ref();
    if project_dir.exists() {
        if !force {
            return Err(Error::OutputDirectoryExistsError {
                output_dir: project_dir.display().to_string(),
            });
        }
        warn!("Project directory '{}' exists, overwriting", project_dir.display());
    }
    Ok(project_dir.to_path_buf())
}

/// Writes every entry of `tree` below `root`, creating parent directories.
/// Returns the written paths in tree order.
pub fn write_tree<P: AsRef<Path>>(root: P, tree: &RenderedTree) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    tree.iter()
        .map(|(relative, content)| {
            let target = root.join(relative);
            write_file(&target, content)?;
            debug!("Wrote {}", target.display());
            Ok(target)
        })
        .collect()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| materialization_error(parent, e))?;
    }
    let file = File::create(path).map_err(|e| materialization_error(path, e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).map_err(|e| materialization_error(path, e))?;
    writer.flush().map_err(|e| materialization_error(path, e))
}

/// Removes registry paths below `root` that `tree` does not contain and whose
/// gate is closed. Directories are removed recursively. Returns what was removed.
pub fn converge<P: AsRef<Path>>(
    root: P,
    tree: &RenderedTree,
    registry: &[ResolvedPath],
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut removed = Vec::new();

    for entry in registry {
        if entry.allowed || produced(tree, &entry.path) {
            continue;
        }
        let target = root.join(&entry.path);
        let metadata = match fs::symlink_metadata(&target) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(materialization_error(&target, e)),
        };

        let removal =
            if metadata.is_dir() { fs::remove_dir_all(&target) } else { fs::remove_file(&target) };
        removal.map_err(|e| materialization_error(&target, e))?;

        info!("Removed '{}'", target.display());
        removed.push(target);
    }
    Ok(removed)
}

/// Whether `path` is a file of `tree` or a directory containing one.
fn produced(tree: &RenderedTree, path: &str) -> bool {
    let prefix = format!("{}/", path.trim_end_matches('/'));
    tree.contains_key(path) || tree.keys().any(|key| key.starts_with(&prefix))
}
