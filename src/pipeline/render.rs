use std::fs;
use std::path::PathBuf;

use crate::domain::{AppError, BuildConfig, BuildPaths, FileGroup};
use crate::pipeline::localize::LocaleCatalog;
use crate::pipeline::markup;
use crate::pipeline::template::TemplateExpander;
use crate::ports::ReloadNotifier;

/// Render every top-level text template: expand, localize, write.
///
/// Output lands directly under the output root, one file per locale
/// variant. Returns the number of files written.
pub fn render_text<N: ReloadNotifier>(
    config: &BuildConfig,
    paths: &BuildPaths,
    notifier: &N,
) -> Result<usize, AppError> {
    let expander = TemplateExpander::new(&paths.templates_text, &config.asset_base_url);
    let catalog = LocaleCatalog::load(&paths.locales)?;
    let mut written = 0;
    for file in list_files(&paths.templates_text_group())? {
        let name = template_name(&file)?;
        let expanded = expander.expand(&name)?;
        written += write_variants(paths, &name, &catalog.localize(&expanded, &name))?;
    }
    tracing::info!(count = written, "rendered text templates");
    notifier.notify("text");
    Ok(written)
}

/// Render every top-level HTML template: expand, compile MJML to HTML,
/// localize, write. The `.mjml` extension becomes `.html` on the way out.
pub fn render_html<N: ReloadNotifier>(
    config: &BuildConfig,
    paths: &BuildPaths,
    notifier: &N,
) -> Result<usize, AppError> {
    let expander = TemplateExpander::new(&paths.templates_html, &config.asset_base_url);
    let catalog = LocaleCatalog::load(&paths.locales)?;
    let mut written = 0;
    for file in list_files(&paths.templates_html_group())? {
        let name = template_name(&file)?;
        let expanded = expander.expand(&name)?;
        let html = markup::compile(&expanded, &paths.templates_html, &name)?;
        let out_name = replace_extension(&name, "html");
        written += write_variants(paths, &out_name, &catalog.localize(&html, &name))?;
    }
    tracing::info!(count = written, "rendered html templates");
    notifier.notify("html");
    Ok(written)
}

/// Enumerate the files a selector covers, in sorted order.
fn list_files(group: &FileGroup) -> Result<Vec<PathBuf>, AppError> {
    if !group.dir.exists() {
        return Ok(Vec::new());
    }
    let max_depth = if group.recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(&group.dir)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| AppError::Io(err.into()))?;
        if entry.file_type().is_file() && group.matches(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

fn template_name(file: &std::path::Path) -> Result<String, AppError> {
    file.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| AppError::InvalidPath(file.to_path_buf()))
}

fn replace_extension(name: &str, ext: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.{ext}"),
        None => format!("{name}.{ext}"),
    }
}

/// `welcome.html` + locale `es` ⇒ `welcome.es.html`; the unsuffixed
/// variant keeps the name as-is.
fn variant_name(name: &str, code: Option<&str>) -> String {
    match code {
        None => name.to_string(),
        Some(code) => match name.rsplit_once('.') {
            Some((stem, ext)) => format!("{stem}.{code}.{ext}"),
            None => format!("{name}.{code}"),
        },
    }
}

fn write_variants(
    paths: &BuildPaths,
    name: &str,
    variants: &[(Option<&str>, String)],
) -> Result<usize, AppError> {
    fs::create_dir_all(&paths.output)?;
    for (code, content) in variants {
        fs::write(paths.output.join(variant_name(name, *code)), content)?;
    }
    Ok(variants.len())
}
