//! Template registry: a directory of HTML templates compiled into one
//! minijinja environment that can be swapped out at runtime.
//!
//! Renders clone the active `Arc` under a read lock and then work lock-free,
//! so a render never sees a half-built set. A reload compiles a complete new
//! environment first and takes the write lock only to swap the pointer; if
//! compilation fails the previous set keeps serving.

pub mod functions;
pub mod views;

use crate::error::TemplateError;
use minijinja::Environment;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extensions picked up from the template root.
pub const TEMPLATE_EXTENSIONS: &[&str] = &["html"];

pub struct TemplateRegistry {
    root: PathBuf,
    active: RwLock<Arc<Environment<'static>>>,
}

impl TemplateRegistry {
    /// Build the initial set. A missing root is only a warning and yields an
    /// empty registry; a template that fails to parse is an error.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let root = root.into();
        let env = if root.is_dir() {
            build_environment(&root)?
        } else {
            warn!(path = %root.display(), "template root not found; starting with no templates");
            base_environment()
        };
        info!(
            path = %root.display(),
            count = env.templates().count(),
            "templates loaded"
        );
        Ok(Self {
            root,
            active: RwLock::new(Arc::new(env)),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rebuild from disk and swap in the new set. Returns the template count.
    pub fn reload(&self) -> Result<usize, TemplateError> {
        if !self.root.is_dir() {
            return Err(TemplateError::MissingRoot(self.root.display().to_string()));
        }
        let fresh = build_environment(&self.root)
            .inspect_err(|e| warn!(error = %e, "template reload failed; keeping previous set"))?;
        let count = fresh.templates().count();
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(fresh);
        info!(count, "templates reloaded");
        Ok(count)
    }

    /// The set currently serving renders.
    pub fn snapshot(&self) -> Arc<Environment<'static>> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn template_names(&self) -> Vec<String> {
        let env = self.snapshot();
        let mut names: Vec<String> = env.templates().map(|(name, _)| name.to_string()).collect();
        names.sort();
        names
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: &S) -> Result<String, TemplateError> {
        let env = self.snapshot();
        let tmpl = env.get_template(name)?;
        Ok(tmpl.render(ctx)?)
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    functions::register(&mut env);
    env
}

/// Compile every template under `root` into a fresh environment.
pub fn build_environment(root: &Path) -> Result<Environment<'static>, TemplateError> {
    let mut env = base_environment();
    for path in discover(root)? {
        let name = template_name(root, &path);
        let source = fs::read_to_string(&path).map_err(|source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        })?;
        env.add_template_owned(name.clone(), source)
            .map_err(|source| TemplateError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        debug!(template = %name, "template registered");
    }
    Ok(env)
}

/// All template files below `root`, sorted for a stable registration order.
/// Symlinks are not followed.
fn discover(root: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| TemplateError::Io {
            path: e
                .path()
                .unwrap_or(root)
                .display()
                .to_string(),
            source: e.into(),
        })?;
        if entry.file_type().is_file() && is_template_file(entry.path()) {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

fn is_template_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| {
            TEMPLATE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Path relative to the root, always `/`-separated.
pub fn template_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
