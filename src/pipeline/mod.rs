//! Build pipeline: stage functions and the sequential orchestrator.

pub mod assets;
pub mod clean;
pub mod localize;
pub mod markup;
pub mod render;
pub mod template;

use crate::domain::{AppError, BuildConfig, BuildPaths};
use crate::ports::ReloadNotifier;

/// One step of the build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Clean,
    CopyAssets,
    RenderText,
    RenderHtml,
}

impl Stage {
    /// The one and only stage ordering; later stages rely on earlier ones
    /// having completed.
    pub const SEQUENCE: [Stage; 4] =
        [Stage::Clean, Stage::CopyAssets, Stage::RenderText, Stage::RenderHtml];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Clean => "clean",
            Stage::CopyAssets => "copy:assets",
            Stage::RenderText => "build:text",
            Stage::RenderHtml => "build:html",
        }
    }
}

/// Orchestrator state. A build is exactly one traversal
/// Idle → Cleaning → CopyingAssets → RenderingText → RenderingHtml → Done,
/// with any stage failure ending the traversal in Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Cleaning,
    CopyingAssets,
    RenderingText,
    RenderingHtml,
    Done,
    Failed,
}

impl BuildState {
    fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Clean => BuildState::Cleaning,
            Stage::CopyAssets => BuildState::CopyingAssets,
            Stage::RenderText => BuildState::RenderingText,
            Stage::RenderHtml => BuildState::RenderingHtml,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            BuildState::Idle => "idle",
            BuildState::Cleaning => "cleaning",
            BuildState::CopyingAssets => "copying-assets",
            BuildState::RenderingText => "rendering-text",
            BuildState::RenderingHtml => "rendering-html",
            BuildState::Done => "done",
            BuildState::Failed => "failed",
        }
    }
}

/// Run one full build: every stage of [`Stage::SEQUENCE`] in order.
pub fn run_build<N: ReloadNotifier>(
    config: &BuildConfig,
    paths: &BuildPaths,
    notifier: &N,
) -> Result<(), AppError> {
    let (_, result) = run_stages(&Stage::SEQUENCE, |stage| match stage {
        Stage::Clean => clean::clean(paths),
        Stage::CopyAssets => assets::copy_assets(paths).map(|_| ()),
        Stage::RenderText => render::render_text(config, paths, notifier).map(|_| ()),
        Stage::RenderHtml => render::render_html(config, paths, notifier).map(|_| ()),
    });
    result
}

/// Drive a stage sequence through the state machine, strictly in order.
///
/// Returns the full state traversal (for inspection) and the first error,
/// if any. A failing stage halts the remaining stages; partially-written
/// output is left as-is.
fn run_stages(
    stages: &[Stage],
    mut run: impl FnMut(Stage) -> Result<(), AppError>,
) -> (Vec<BuildState>, Result<(), AppError>) {
    let mut traversal = vec![BuildState::Idle];
    for &stage in stages {
        let state = BuildState::for_stage(stage);
        tracing::info!(state = state.name(), "pipeline");
        traversal.push(state);
        if let Err(err) = run(stage) {
            tracing::error!(stage = stage.name(), error = %err, "pipeline failed");
            traversal.push(BuildState::Failed);
            return (traversal, Err(err));
        }
    }
    traversal.push(BuildState::Done);
    (traversal, Ok(()))
}
