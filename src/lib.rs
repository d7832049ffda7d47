//! mailforge: build localized email templates from MJML and text sources.
//!
//! The pipeline expands templates (minijinja), compiles MJML to email-safe
//! HTML (mrml), substitutes `_(key)` placeholders from YAML locale files,
//! and copies static assets into an output tree. A dev server serves that
//! tree with SSE live reload, re-rendering on source changes.

pub mod domain;
pub mod pipeline;
pub mod ports;
pub mod server;
pub mod watch;

use std::path::{Path, PathBuf};

use domain::{BuildConfig, BuildPaths, FileConfig};
use ports::NoopReload;

pub use domain::AppError;
pub use domain::config::ENV_MODE_VAR;

/// Options shared by every subcommand, resolved once from the CLI.
#[derive(Debug, Default, Clone)]
pub struct BuildOptions {
    /// Output root override (`--out`); default `./output`.
    pub out: Option<PathBuf>,
    /// Production mode: use the configured asset base URL.
    pub production: bool,
}

fn resolve(options: &BuildOptions) -> Result<(BuildConfig, BuildPaths), AppError> {
    let file = FileConfig::load(Path::new("."))?;
    let config = BuildConfig::resolve(options.production, &file)?;
    let paths = BuildPaths::new(options.out.as_deref());
    Ok((config, paths))
}

/// Run the full pipeline: clean, copy assets, render text, render HTML.
pub fn build(options: &BuildOptions) -> Result<(), AppError> {
    let (config, paths) = resolve(options)?;
    pipeline::run_build(&config, &paths, &NoopReload)?;
    println!("✅ Build complete: {}", paths.output.display());
    Ok(())
}

/// Render HTML (MJML) templates only.
pub fn build_html(options: &BuildOptions) -> Result<(), AppError> {
    let (config, paths) = resolve(options)?;
    let written = pipeline::render::render_html(&config, &paths, &NoopReload)?;
    println!("✅ Rendered {written} HTML file(s)");
    Ok(())
}

/// Render text templates only.
pub fn build_text(options: &BuildOptions) -> Result<(), AppError> {
    let (config, paths) = resolve(options)?;
    let written = pipeline::render::render_text(&config, &paths, &NoopReload)?;
    println!("✅ Rendered {written} text file(s)");
    Ok(())
}

/// Copy static assets into the output tree.
pub fn copy_assets(options: &BuildOptions) -> Result<(), AppError> {
    let (_, paths) = resolve(options)?;
    let copied = pipeline::assets::copy_assets(&paths)?;
    println!("✅ Copied {copied} asset(s) to {}", paths.output_assets.display());
    Ok(())
}

/// Remove the output tree. Succeeds when there is nothing to remove.
pub fn clean(options: &BuildOptions) -> Result<(), AppError> {
    let (_, paths) = resolve(options)?;
    pipeline::clean::clean(&paths)?;
    println!("✅ Cleaned {}", paths.output.display());
    Ok(())
}

/// Build once, then block re-rendering on source changes.
pub fn watch(options: &BuildOptions) -> Result<(), AppError> {
    let (config, paths) = resolve(options)?;
    pipeline::run_build(&config, &paths, &NoopReload)?;
    println!("👀 Watching for changes (Ctrl-C to stop)");
    watch::run(&config, &paths, &NoopReload)
}

/// Build, watch, and serve the output tree with live reload.
pub fn server(options: &BuildOptions) -> Result<(), AppError> {
    let (config, paths) = resolve(options)?;
    let (reload_tx, _) = tokio::sync::broadcast::channel(16);
    let notifier = server::BroadcastReload::new(reload_tx.clone());

    pipeline::run_build(&config, &paths, &notifier)?;

    {
        let config = config.clone();
        let paths = paths.clone();
        let notifier = notifier.clone();
        std::thread::spawn(move || {
            if let Err(err) = watch::run(&config, &paths, &notifier) {
                tracing::error!(error = %err, "watcher stopped");
            }
        });
    }

    println!(
        "✅ Serving {} at http://127.0.0.1:{} (live reload on {})",
        paths.output.display(),
        server::PORT,
        server::RELOAD_PATH
    );
    server::serve(&paths.output, reload_tx)
}
