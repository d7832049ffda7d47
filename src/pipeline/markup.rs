use std::path::Path;

use mrml::prelude::parser::ParserOptions;
use mrml::prelude::parser::local_loader::LocalIncludeLoader;
use mrml::prelude::render::RenderOptions;

use crate::domain::AppError;

/// Compile expanded MJML markup into email-safe HTML.
///
/// `include_root` is the base directory for resolving `mj-include`
/// references. Output is not minified (mrml's default).
pub fn compile(source: &str, include_root: &Path, template: &str) -> Result<String, AppError> {
    let options = ParserOptions {
        include_loader: Box::new(LocalIncludeLoader::new(include_root.to_path_buf())),
    };
    let root = mrml::parse_with_options(source, &options)
        .map_err(|err| markup_error(template, err))?;
    root.render(&RenderOptions::default())
        .map_err(|err| markup_error(template, err))
}

fn markup_error(template: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Markup { template: template.to_string(), reason: err.to_string() }
}
