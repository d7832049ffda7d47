use std::path::{Path, PathBuf};

/// Default output root when `--out` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

/// Source subdirectory for locale definition files.
pub const LOCALES_DIR: &str = "./src/locales";

/// Source subdirectory for HTML (MJML) templates.
pub const TEMPLATES_HTML_DIR: &str = "./src/templates/html";

/// Source subdirectory for plain-text templates.
pub const TEMPLATES_TEXT_DIR: &str = "./src/templates/text";

/// Source subdirectory for static assets.
pub const ASSETS_DIR: &str = "./src/assets";

/// The fixed set of input and output directories for one build.
///
/// Derived once at startup from the optional output-root override; the
/// source-side paths never move. Every output-derived path is prefixed by
/// the resolved output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    pub output: PathBuf,
    pub output_assets: PathBuf,
    pub locales: PathBuf,
    pub templates_html: PathBuf,
    pub templates_text: PathBuf,
    pub assets: PathBuf,
}

impl BuildPaths {
    /// Derive the path set. Pure computation, no I/O.
    pub fn new(out_override: Option<&Path>) -> Self {
        let output = out_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let output_assets = output.join("assets");
        Self {
            output,
            output_assets,
            locales: PathBuf::from(LOCALES_DIR),
            templates_html: PathBuf::from(TEMPLATES_HTML_DIR),
            templates_text: PathBuf::from(TEMPLATES_TEXT_DIR),
            assets: PathBuf::from(ASSETS_DIR),
        }
    }

    /// Selector for top-level HTML templates (the ones that render).
    pub fn templates_html_group(&self) -> FileGroup {
        FileGroup::new(&self.templates_html, Some("mjml"), false)
    }

    /// Selector for the whole HTML template tree (watch only; subdirectories
    /// hold partials pulled in via includes).
    pub fn templates_html_all_group(&self) -> FileGroup {
        FileGroup::new(&self.templates_html, Some("mjml"), true)
    }

    /// Selector for top-level text templates.
    pub fn templates_text_group(&self) -> FileGroup {
        FileGroup::new(&self.templates_text, Some("txt"), false)
    }

    /// Selector for the whole text template tree (watch only).
    pub fn templates_text_all_group(&self) -> FileGroup {
        FileGroup::new(&self.templates_text, Some("txt"), true)
    }

    /// Selector for every file under the asset tree.
    pub fn assets_group(&self) -> FileGroup {
        FileGroup::new(&self.assets, None, true)
    }

    /// Selector for locale definition files.
    pub fn locales_group(&self) -> FileGroup {
        FileGroup::new(&self.locales, Some("yaml"), true)
    }
}

/// A directory-scoped file selector: a root directory, an optional
/// extension filter, and a recursion switch.
///
/// This is the glob set of the pipeline; each selector is scoped under its
/// corresponding `BuildPaths` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    pub dir: PathBuf,
    pub extension: Option<String>,
    pub recursive: bool,
}

impl FileGroup {
    fn new(dir: &Path, extension: Option<&str>, recursive: bool) -> Self {
        Self {
            dir: dir.to_path_buf(),
            extension: extension.map(str::to_string),
            recursive,
        }
    }

    /// Whether `path` falls inside this group.
    pub fn matches(&self, path: &Path) -> bool {
        let Ok(rel) = path.strip_prefix(&self.dir) else {
            return false;
        };
        if !self.recursive && rel.components().count() != 1 {
            return false;
        }
        match &self.extension {
            Some(ext) => path.extension().and_then(|e| e.to_str()) == Some(ext.as_str()),
            None => true,
        }
    }

    /// Equivalent glob pattern, for logging.
    pub fn pattern(&self) -> String {
        let star = match (&self.extension, self.recursive) {
            (Some(ext), true) => format!("**/*.{ext}"),
            (Some(ext), false) => format!("*.{ext}"),
            (None, true) => "**/*".to_string(),
            (None, false) => "*".to_string(),
        };
        format!("{}/{star}", self.dir.display())
    }
}
