use std::path::Path;

use minijinja::{Environment, UndefinedBehavior, context, path_loader};

use crate::domain::AppError;

/// Generic template expansion over one template directory.
///
/// The directory doubles as the loader search path, so templates can
/// include or extend siblings (including partials in subdirectories). The
/// asset base URL is the only variable bound during rendering.
pub struct TemplateExpander {
    env: Environment<'static>,
    asset_base_url: String,
}

impl TemplateExpander {
    pub fn new(search_path: &Path, asset_base_url: &str) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_loader(path_loader(search_path));
        Self { env, asset_base_url: asset_base_url.to_string() }
    }

    /// Expand the template registered under `name` (path relative to the
    /// search directory).
    pub fn expand(&self, name: &str) -> Result<String, AppError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|err| template_error(name, err))?;
        template
            .render(context! { asset_base_url => self.asset_base_url })
            .map_err(|err| template_error(name, err))
    }
}

fn template_error(name: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Template { template: name.to_string(), reason: err.to_string() }
}
