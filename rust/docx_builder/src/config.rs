//! Conversion settings, read from a TOML file.
//!
//! ```toml
//! [template]
//! list_levels = 3
//! extra_styles = ["List Bullet 5"]
//! fallback = "nearest"
//!
//! [document]
//! title = "Test Strategy Document"
//! input = "markdown"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::frontend::InputFormat;
use crate::styles::{FallbackPolicy, StyleRegistry, DEFAULT_LIST_LEVELS, MAX_LIST_LEVELS};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertConfig {
    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub document: DocumentConfig,
}

/// `[template]`: the styles the generated package defines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// List styles exist for levels `1..=list_levels` of both kinds; at most 9.
    #[serde(default = "default_list_levels")]
    pub list_levels: u32,

    /// Additional style names the template provides.
    #[serde(default)]
    pub extra_styles: Vec<String>,

    #[serde(default)]
    pub fallback: FallbackPolicy,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            list_levels: default_list_levels(),
            extra_styles: Vec::new(),
            fallback: FallbackPolicy::default(),
        }
    }
}

fn default_list_levels() -> u32 {
    DEFAULT_LIST_LEVELS
}

/// `[document]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Written as a "Title" paragraph ahead of the converted content.
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub input: InputFormat,
}

impl TemplateConfig {
    pub fn registry(&self) -> StyleRegistry {
        self.extra_styles
            .iter()
            .fold(StyleRegistry::with_list_levels(self.list_levels), |reg, s| {
                reg.with_style(s.clone())
            })
            .with_fallback(self.fallback)
    }
}

impl ConvertConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        debug!(?path, "loaded config");
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let levels = self.template.list_levels;
        if !(1..=MAX_LIST_LEVELS).contains(&levels) {
            return Err(Error::config(format!(
                "template.list_levels must be between 1 and {MAX_LIST_LEVELS}, got {levels}"
            )));
        }
        Ok(())
    }

    pub fn registry(&self) -> StyleRegistry {
        self.template.registry()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::ListKind;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ConvertConfig::from_toml_str("").unwrap();
        assert_eq!(config, ConvertConfig::default());
        assert_eq!(config.template.list_levels, 3);
        assert_eq!(config.template.fallback, FallbackPolicy::Base);
        assert_eq!(config.document.input, InputFormat::Auto);
    }

    #[test]
    fn parses_all_sections() {
        let config = ConvertConfig::from_toml_str(
            r#"
[template]
list_levels = 2
extra_styles = ["List Number 4"]
fallback = "nearest"

[document]
title = "Test Strategy Document"
input = "html"
"#,
        )
        .unwrap();
        assert_eq!(config.document.title.as_deref(), Some("Test Strategy Document"));
        assert_eq!(config.document.input, InputFormat::Html);

        let reg = config.registry();
        assert!(reg.contains("List Number 4"));
        assert!(!reg.contains("List Number 3"));
        assert_eq!(reg.resolve(ListKind::Number, 3).name, "List Number 2");
        assert_eq!(reg.resolve(ListKind::Number, 4).name, "List Number 4");
    }

    #[test]
    fn rejects_zero_levels_and_unknown_policy() {
        let err = ConvertConfig::from_toml_str("[template]\nlist_levels = 0").unwrap_err();
        assert!(err.to_string().contains("list_levels"));

        assert!(ConvertConfig::from_toml_str("[template]\nfallback = \"sideways\"").is_err());
    }

    #[test]
    fn list_levels_are_capped() {
        assert!(ConvertConfig::from_toml_str("[template]\nlist_levels = 9").is_ok());
        let err = ConvertConfig::from_toml_str("[template]\nlist_levels = 4000000000").unwrap_err();
        assert!(err.to_string().contains("between 1 and 9"));
    }

    #[test]
    fn load_reports_parse_errors_once() {
        let path = std::env::temp_dir().join(format!("docx_builder_bad_{}.toml", std::process::id()));
        std::fs::write(&path, "[template]\nlist_levels = \"three\"").unwrap();
        let err = ConvertConfig::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        let msg = err.to_string();
        assert!(msg.starts_with("config error: failed to parse"), "{msg}");
        assert_eq!(msg.matches("config error").count(), 1, "{msg}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ConvertConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
