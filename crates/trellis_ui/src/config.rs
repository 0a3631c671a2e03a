//! Scene configuration, loadable from TOML.
//!
//! ```toml
//! accepts_input = true
//! animate_during_paint = true
//! default_easing = "cubic_out"
//! initial_capacity = 512
//!
//! [broadcast_bindings]
//! "ctrl+s" = "save"
//! "escape" = "close"
//! "pad start" = "pause"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::animation::Easing;
use crate::error::{SceneError, SceneResult};
use crate::input::KeyStroke;

/// Default node store capacity.
pub const DEFAULT_CAPACITY: usize = 256;

/// Scene settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Route device input at all.
    pub accepts_input: bool,
    /// Advance animations inside [`Scene::paint_pass`](crate::Scene::paint_pass).
    pub animate_during_paint: bool,
    /// Easing for animations queued without one.
    pub default_easing: Easing,
    /// Node store capacity reserved up front.
    pub initial_capacity: usize,
    /// Keystroke descriptor → command name, for [`Scene::bind_command`](crate::Scene::bind_command).
    pub broadcast_bindings: BTreeMap<String, String>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            accepts_input: true,
            animate_during_paint: true,
            default_easing: Easing::Linear,
            initial_capacity: DEFAULT_CAPACITY,
            broadcast_bindings: BTreeMap::new(),
        }
    }
}

impl SceneConfig {
    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`] for malformed TOML or a binding
    /// whose descriptor does not parse.
    pub fn from_toml_str(source: &str) -> SceneResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| SceneError::InvalidConfig(e.to_string()))?;
        for descriptor in config.broadcast_bindings.keys() {
            KeyStroke::parse(descriptor).map_err(|e| SceneError::InvalidConfig(e.to_string()))?;
        }
        Ok(config)
    }

    /// Reads a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Io`] if the file cannot be read, otherwise as
    /// [`SceneConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| SceneError::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), bindings = config.broadcast_bindings.len(), "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = SceneConfig::from_toml_str("accepts_input = false").unwrap();
        assert!(!config.accepts_input);
        assert!(config.animate_during_paint);
        assert_eq!(config.default_easing, Easing::Linear);
        assert_eq!(config.initial_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_full_document() {
        let config = SceneConfig::from_toml_str(
            r#"
            default_easing = "exponential_out"
            initial_capacity = 8

            [broadcast_bindings]
            "ctrl+s" = "save"
            "pad X+" = "next"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_easing, Easing::ExponentialOut);
        assert_eq!(config.initial_capacity, 8);
        assert_eq!(config.broadcast_bindings.get("ctrl+s").map(String::as_str), Some("save"));
    }

    #[test]
    fn test_rejects_bad_descriptor() {
        let err = SceneConfig::from_toml_str("[broadcast_bindings]\n\"hyper+q\" = \"quit\"").unwrap_err();
        assert!(matches!(err, SceneError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            SceneConfig::from_toml_str("accepts_input = "),
            Err(SceneError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SceneConfig::from_path("/nonexistent/trellis.toml"),
            Err(SceneError::Io(_))
        ));
    }
}
