//! # Package Loader
//!
//! Reads the Go files of one directory and builds the [`Package`] model the
//! analyses run on. This is a declaration-level front end: only top-level
//! `type` declarations are modelled and nothing is type-checked.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, ensure};
use rayon::prelude::*;
use tagscope_common::config::LoaderConfig;
use tagscope_common::model::Package;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod lexer;
mod lower;
pub mod parser;

use parser::SourceFile;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("no Go files in {}", .0.display())]
    NoGoFiles(PathBuf),
}

/// Loads the package whose sources live directly in `dir`.
pub fn load_package(dir: &Path, cfg: &LoaderConfig) -> anyhow::Result<Package> {
    ensure!(dir.is_dir(), LoadError::NotADirectory(dir.to_path_buf()));

    let paths: Vec<PathBuf> = go_files(dir, cfg.include_tests)?;
    ensure!(!paths.is_empty(), LoadError::NoGoFiles(dir.to_path_buf()));
    debug!("parsing {} files in {}", paths.len(), dir.display());

    let parsed: Vec<(PathBuf, SourceFile)> = paths
        .par_iter()
        .map(|path| -> anyhow::Result<Option<(PathBuf, SourceFile)>> {
            let src = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            if build_ignored(&src) {
                debug!("skipping {}: excluded by //go:build ignore", path.display());
                return Ok(None);
            }
            let file = parser::parse_file(&src)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(Some((path.clone(), file)))
        })
        .collect::<anyhow::Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();
    ensure!(!parsed.is_empty(), LoadError::NoGoFiles(dir.to_path_buf()));

    let name: String = package_name(&parsed);
    let files: Vec<SourceFile> = parsed
        .into_iter()
        .filter_map(|(path, file)| {
            if file.package == name {
                Some(file)
            } else {
                warn!(
                    "skipping {}: package {} is not {}",
                    path.display(),
                    file.package,
                    name
                );
                None
            }
        })
        .collect();

    let import_path: String = match &cfg.package_path {
        Some(path) => path.clone(),
        None => import_path(dir)?,
    };

    let pkg = lower::build_package(import_path, name, &files);
    info!(
        "loaded package {} ({} declarations from {} files)",
        pkg.path(),
        pkg.len(),
        files.len()
    );
    Ok(pkg)
}

/// `.go` files of `dir`, sorted, leaving out those the go tool ignores.
fn go_files(dir: &Path, include_tests: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if !file_name.ends_with(".go") || file_name.starts_with('.') || file_name.starts_with('_') {
            continue;
        }
        if file_name.ends_with("_test.go") && !include_tests {
            continue;
        }
        if entry.file_type()?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Package clause declared by most non-test files. Ties go to the file that
/// sorts first; test files only count when there is nothing else.
fn package_name(parsed: &[(PathBuf, SourceFile)]) -> String {
    let is_test = |path: &Path| path.to_string_lossy().ends_with("_test.go");
    let mut sources: Vec<&SourceFile> = parsed
        .iter()
        .filter(|(path, _)| !is_test(path))
        .map(|(_, file)| file)
        .collect();
    if sources.is_empty() {
        sources = parsed.iter().map(|(_, file)| file).collect();
    }

    let mut counts: Vec<(&str, usize)> = Vec::new();
    for file in sources {
        match counts.iter_mut().find(|(name, _)| *name == file.package) {
            Some((_, count)) => *count += 1,
            None => counts.push((file.package.as_str(), 1)),
        }
    }

    // `max_by_key` keeps the last maximum, so walk backwards to favour the first.
    counts
        .iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| name.to_string())
        .unwrap_or_default()
}

/// Whether the file header carries a `//go:build ignore` constraint.
///
/// Only the `ignore` tag is recognised; other constraints are not evaluated.
fn build_ignored(src: &str) -> bool {
    let src = src.strip_prefix('\u{feff}').unwrap_or(src);
    for line in src.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }
        let Some(comment) = line.strip_prefix("//") else {
            return false;
        };
        let expr = comment
            .strip_prefix("go:build")
            .or_else(|| comment.trim_start().strip_prefix("+build"));
        if let Some(expr) = expr {
            return expr.trim() == "ignore";
        }
    }
    false
}

/// Derives the import path from the closest `go.mod` above `dir`.
pub fn import_path(dir: &Path) -> anyhow::Result<String> {
    let dir = dir
        .canonicalize()
        .with_context(|| format!("resolving {}", dir.display()))?;

    for root in dir.ancestors() {
        let go_mod = root.join("go.mod");
        if !go_mod.is_file() {
            continue;
        }

        let contents = fs::read_to_string(&go_mod)
            .with_context(|| format!("reading {}", go_mod.display()))?;
        let module = module_path(&contents)
            .with_context(|| format!("no module directive in {}", go_mod.display()))?;

        let mut path = module;
        if let Ok(relative) = dir.strip_prefix(root) {
            for component in relative.components() {
                path.push('/');
                path.push_str(&component.as_os_str().to_string_lossy());
            }
        }
        debug!("import path {path} from {}", go_mod.display());
        return Ok(path);
    }

    let fallback = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    warn!(
        "no go.mod above {}, using {fallback:?} as the import path",
        dir.display()
    );
    Ok(fallback)
}

/// Module path from the `module` directive of a go.mod file.
fn module_path(go_mod: &str) -> Option<String> {
    go_mod.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or_default().trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with([' ', '\t']) {
            return None;
        }
        let module = rest.trim().trim_matches(|c: char| c == '"' || c == '`');
        (!module.is_empty()).then(|| module.to_string())
    })
}
