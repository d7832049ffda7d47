use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use walkdir::WalkDir;

use crate::domain::AppError;

/// Placeholder tokens look like `_(greeting.hello)`: an identifier of word
/// characters, hyphens, dots, and plus signs in a call-like wrapper.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"_\(([\w\-.+]+)\)").expect("placeholder pattern is valid"))
}

/// Translations for one locale, keyed by dot-joined placeholder key.
#[derive(Debug, Clone)]
pub struct Locale {
    pub code: String,
    pub entries: BTreeMap<String, String>,
}

/// All locales found under the locales directory, in sorted order.
///
/// Each `<code>.yaml` file defines one locale; nested mappings are
/// flattened to dot-joined keys, so `greeting: {hello: Hola}` serves the
/// `_(greeting.hello)` token. Ordering is deterministic (sorted file walk,
/// ordered maps), which keeps localized output byte-identical across runs.
#[derive(Debug, Clone, Default)]
pub struct LocaleCatalog {
    locales: Vec<Locale>,
}

impl LocaleCatalog {
    pub fn load(locales_dir: &Path) -> Result<Self, AppError> {
        let mut by_code: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        if locales_dir.exists() {
            for entry in WalkDir::new(locales_dir).sort_by_file_name() {
                let entry = entry.map_err(|err| AppError::Io(err.into()))?;
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.extension().and_then(|e| e.to_str()) != Some("yaml")
                {
                    continue;
                }
                let code = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .ok_or_else(|| AppError::InvalidPath(path.to_path_buf()))?
                    .to_string();
                let content = fs::read_to_string(path)?;
                let value: serde_yaml::Value =
                    serde_yaml::from_str(&content).map_err(|err| AppError::MalformedLocale {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    })?;
                flatten("", &value, by_code.entry(code).or_default());
            }
        }
        let locales = by_code
            .into_iter()
            .map(|(code, entries)| Locale { code, entries })
            .collect();
        Ok(Self { locales })
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(|locale| locale.code.as_str())
    }

    /// Produce one localized variant per locale.
    ///
    /// With no locales loaded the content passes through once, unsuffixed
    /// (`None` variant). Unknown keys are left verbatim and logged; the
    /// lookup policy is intentionally lenient so adding a key to one
    /// template does not require touching every locale at once.
    pub fn localize(&self, content: &str, origin: &str) -> Vec<(Option<&str>, String)> {
        if self.locales.is_empty() {
            return vec![(None, content.to_string())];
        }
        self.locales
            .iter()
            .map(|locale| {
                let replaced = token_pattern().replace_all(content, |caps: &Captures| {
                    let key = &caps[1];
                    match locale.entries.get(key) {
                        Some(value) => value.clone(),
                        None => {
                            tracing::warn!(
                                locale = %locale.code,
                                key,
                                template = origin,
                                "missing translation"
                            );
                            caps[0].to_string()
                        }
                    }
                });
                (Some(locale.code.as_str()), replaced.into_owned())
            })
            .collect()
    }
}

fn flatten(prefix: &str, value: &serde_yaml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, child) in map {
                let Some(key) = key.as_str() else {
                    continue;
                };
                let joined = if prefix.is_empty() {
                    key.to_string()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&joined, child, out);
            }
        }
        serde_yaml::Value::String(s) => {
            out.insert(prefix.to_string(), s.clone());
        }
        serde_yaml::Value::Number(n) => {
            out.insert(prefix.to_string(), n.to_string());
        }
        serde_yaml::Value::Bool(b) => {
            out.insert(prefix.to_string(), b.to_string());
        }
        // Nulls and sequences have no placeholder representation.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with(files: &[(&str, &str)]) -> LocaleCatalog {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        LocaleCatalog::load(dir.path()).expect("catalog should load")
    }

    #[test]
    fn substitutes_tokens_per_locale() {
        let catalog = catalog_with(&[
            ("es.yaml", "greeting:\n  hello: Hola\n"),
            ("en.yaml", "greeting:\n  hello: Hello\n"),
        ]);

        let variants = catalog.localize("Say: _(greeting.hello)!", "welcome.txt");
        assert_eq!(variants.len(), 2);
        // Sorted by locale code.
        assert_eq!(variants[0], (Some("en"), "Say: Hello!".to_string()));
        assert_eq!(variants[1], (Some("es"), "Say: Hola!".to_string()));
    }

    #[test]
    fn no_residual_tokens_after_substitution() {
        let catalog = catalog_with(&[("es.yaml", "greeting:\n  hello: Hola\n")]);
        let variants = catalog.localize("_(greeting.hello)", "welcome.txt");
        assert!(!variants[0].1.contains("_("));
        assert_eq!(variants[0].1, "Hola");
    }

    #[test]
    fn keys_may_contain_hyphens_dots_and_plus() {
        let catalog = catalog_with(&[("en.yaml", "cta:\n  sign-up.now+free: Join\n")]);
        let variants = catalog.localize("_(cta.sign-up.now+free)", "cta.txt");
        assert_eq!(variants[0].1, "Join");
    }

    #[test]
    fn unknown_keys_are_left_verbatim() {
        let catalog = catalog_with(&[("en.yaml", "greeting:\n  hello: Hello\n")]);
        let variants = catalog.localize("_(greeting.bye)", "welcome.txt");
        assert_eq!(variants[0].1, "_(greeting.bye)");
    }

    #[test]
    fn empty_catalog_passes_content_through_once() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let catalog = LocaleCatalog::load(dir.path()).expect("catalog should load");
        let variants = catalog.localize("_(greeting.hello)", "welcome.txt");
        assert_eq!(variants, vec![(None, "_(greeting.hello)".to_string())]);
    }

    #[test]
    fn localization_is_deterministic() {
        let catalog = catalog_with(&[
            ("es.yaml", "a: uno\nb: dos\n"),
            ("en.yaml", "a: one\nb: two\n"),
        ]);
        let first = catalog.localize("_(a) _(b)", "t.txt");
        let second = catalog.localize("_(a) _(b)", "t.txt");
        assert_eq!(first, second);
    }
}
