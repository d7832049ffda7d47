//! File watching: change events feed a queue consumed by a single
//! dispatch loop that re-runs only the matching render sub-pipeline.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{EventKind, RecursiveMode, Watcher};

use crate::domain::{AppError, BuildConfig, BuildPaths};
use crate::pipeline::render;
use crate::ports::ReloadNotifier;

/// The two render sub-pipelines a change can re-trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchGroup {
    Html,
    Text,
}

/// Canonicalized source roots used to classify change events.
///
/// Watch events carry absolute paths, so the relative source directories
/// are resolved once at setup.
#[derive(Debug, Clone)]
pub struct WatchRoots {
    templates_html: PathBuf,
    templates_text: PathBuf,
    assets: PathBuf,
    locales: PathBuf,
}

impl WatchRoots {
    pub fn resolve(paths: &BuildPaths) -> Result<Self, AppError> {
        Ok(Self {
            templates_html: canonical_or_asis(&paths.templates_html),
            templates_text: canonical_or_asis(&paths.templates_text),
            assets: canonical_or_asis(&paths.assets),
            locales: canonical_or_asis(&paths.locales),
        })
    }

    /// Map a changed path to the sub-pipelines it invalidates.
    ///
    /// HTML templates and assets invalidate the HTML pipeline; text
    /// templates invalidate the text pipeline; a locale change invalidates
    /// both, since both pipelines substitute from the same catalog.
    pub fn groups_for(&self, path: &Path) -> Vec<WatchGroup> {
        if under(path, &self.locales) && has_ext(path, "yaml") {
            return vec![WatchGroup::Html, WatchGroup::Text];
        }
        if under(path, &self.templates_html) && has_ext(path, "mjml") {
            return vec![WatchGroup::Html];
        }
        if under(path, &self.assets) {
            return vec![WatchGroup::Html];
        }
        if under(path, &self.templates_text) && has_ext(path, "txt") {
            return vec![WatchGroup::Text];
        }
        Vec::new()
    }
}

fn canonical_or_asis(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn under(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

fn has_ext(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

/// Watch the source trees and re-render on change. Blocks until the
/// watcher channel closes.
///
/// Rebuilds run inline on this thread, so a rebuild can never overlap
/// another; events arriving mid-rebuild queue up in the channel. A failed
/// rebuild is logged and watching continues.
pub fn run<N: ReloadNotifier>(
    config: &BuildConfig,
    paths: &BuildPaths,
    notifier: &N,
) -> Result<(), AppError> {
    let (tx, rx) = mpsc::channel();
    let mut watcher =
        notify::recommended_watcher(tx).map_err(|err| AppError::Watch(err.to_string()))?;

    let roots = WatchRoots::resolve(paths)?;
    for dir in [
        &paths.templates_html,
        &paths.templates_text,
        &paths.assets,
        &paths.locales,
    ] {
        if dir.exists() {
            watcher
                .watch(dir, RecursiveMode::Recursive)
                .map_err(|err| AppError::Watch(err.to_string()))?;
            tracing::info!(dir = %dir.display(), "watching");
        }
    }

    for result in rx {
        let event = match result {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "watch event error");
                continue;
            }
        };
        if !is_mutation(&event.kind) {
            continue;
        }

        let mut html = false;
        let mut text = false;
        for path in &event.paths {
            for group in roots.groups_for(path) {
                match group {
                    WatchGroup::Html => html = true,
                    WatchGroup::Text => text = true,
                }
            }
        }

        if text {
            if let Err(err) = render::render_text(config, paths, notifier) {
                tracing::error!(error = %err, "text re-render failed");
            }
        }
        if html {
            if let Err(err) = render::render_html(config, paths, notifier) {
                tracing::error!(error = %err, "html re-render failed");
            }
        }
    }

    Ok(())
}

fn is_mutation(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> WatchRoots {
        WatchRoots {
            templates_html: PathBuf::from("/proj/src/templates/html"),
            templates_text: PathBuf::from("/proj/src/templates/text"),
            assets: PathBuf::from("/proj/src/assets"),
            locales: PathBuf::from("/proj/src/locales"),
        }
    }

    #[test]
    fn html_template_change_triggers_html_only() {
        let groups = roots().groups_for(Path::new("/proj/src/templates/html/welcome.mjml"));
        assert_eq!(groups, vec![WatchGroup::Html]);
    }

    #[test]
    fn nested_partial_change_triggers_html() {
        let groups = roots().groups_for(Path::new("/proj/src/templates/html/partials/a.mjml"));
        assert_eq!(groups, vec![WatchGroup::Html]);
    }

    #[test]
    fn text_template_change_triggers_text_only() {
        let groups = roots().groups_for(Path::new("/proj/src/templates/text/welcome.txt"));
        assert_eq!(groups, vec![WatchGroup::Text]);
    }

    #[test]
    fn asset_change_triggers_html_only() {
        let groups = roots().groups_for(Path::new("/proj/src/assets/img/logo.png"));
        assert_eq!(groups, vec![WatchGroup::Html]);
    }

    #[test]
    fn locale_change_triggers_both() {
        let groups = roots().groups_for(Path::new("/proj/src/locales/es.yaml"));
        assert_eq!(groups, vec![WatchGroup::Html, WatchGroup::Text]);
    }

    #[test]
    fn unrelated_paths_trigger_nothing() {
        assert!(roots().groups_for(Path::new("/proj/output/welcome.html")).is_empty());
        assert!(roots().groups_for(Path::new("/proj/src/templates/html/notes.org")).is_empty());
        assert!(roots().groups_for(Path::new("/proj/src/locales/readme.md")).is_empty());
    }
}
