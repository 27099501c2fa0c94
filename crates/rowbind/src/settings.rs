//! Adapter configuration.
//!
//! [`AdapterSettings`] holds the knobs that are not part of the type-to-layout
//! mapping: what the status surface shows during selection mode and the key
//! under which the selection is saved. Settings can be built in code or
//! loaded from TOML or JSON.
//!
//! ```toml
//! state_key = "inbox-selection"
//!
//! [selection]
//! subtitle_template = "{count} chosen"
//! active_icon = "ic_close_white"
//! inactive_icon = "ic_arrow_back_white"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, Result};
use crate::host::IconRef;
use crate::state::STATE_SELECTED_ITEMS;

/// What the status surface shows while selection mode is engaged or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionChrome {
    /// Subtitle while active; `{count}` is replaced by the number of selected items.
    pub subtitle_template: String,
    /// Navigation icon while selection mode is active.
    pub active_icon: IconRef,
    /// Navigation icon while selection mode is inactive.
    pub inactive_icon: IconRef,
}

impl Default for SelectionChrome {
    fn default() -> Self {
        Self {
            subtitle_template: "{count} Selected".to_string(),
            active_icon: IconRef::new("close"),
            inactive_icon: IconRef::new("back"),
        }
    }
}

impl SelectionChrome {
    /// Formats the subtitle for `count` selected items.
    pub fn subtitle(&self, count: usize) -> String {
        self.subtitle_template.replace("{count}", &count.to_string())
    }
}

/// Adapter-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// Status surface text and icons.
    pub selection: SelectionChrome,
    /// Key used when saving the selection into a `StateBundle`.
    pub state_key: String,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            selection: SelectionChrome::default(),
            state_key: STATE_SELECTED_ITEMS.to_string(),
        }
    }
}

impl AdapterSettings {
    /// Parses settings from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Parses settings from JSON text. Missing keys take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| AdapterError::settings(e.to_string()))
    }

    /// Loads settings from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AdapterError::settings(format!("failed to read {}: {e}", path.display())))?;

        let settings = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text)?,
            Some("toml") => Self::from_toml_str(&text)?,
            other => {
                return Err(AdapterError::settings(format!(
                    "unsupported settings format {other:?} for {}",
                    path.display()
                )));
            }
        };
        tracing::debug!(target: "rowbind::adapter", path = %path.display(), "loaded adapter settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = AdapterSettings::default();
        assert_eq!(settings.state_key, "state-selected-items");
        assert_eq!(settings.selection.subtitle(3), "3 Selected");
        assert_eq!(settings.selection.active_icon.as_str(), "close");
        assert_eq!(settings.selection.inactive_icon.as_str(), "back");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = AdapterSettings::from_toml_str(
            r#"
            [selection]
            subtitle_template = "{count} chosen"
            "#,
        )
        .unwrap();

        assert_eq!(settings.selection.subtitle(2), "2 chosen");
        assert_eq!(settings.selection.active_icon.as_str(), "close");
        assert_eq!(settings.state_key, "state-selected-items");
    }

    #[test]
    fn test_json_settings() {
        let settings =
            AdapterSettings::from_json_str(r#"{"state_key": "inbox", "selection": {"active_icon": "x"}}"#)
                .unwrap();
        assert_eq!(settings.state_key, "inbox");
        assert_eq!(settings.selection.active_icon.as_str(), "x");
    }

    #[test]
    fn test_invalid_toml_is_settings_error() {
        let err = AdapterSettings::from_toml_str("state_key = [").unwrap_err();
        assert!(matches!(err, AdapterError::Settings(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "state_key = \"from-file\"").unwrap();

        let settings = AdapterSettings::load(file.path()).unwrap();
        assert_eq!(settings.state_key, "from-file");
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(
            AdapterSettings::load(file.path()),
            Err(AdapterError::Settings(_))
        ));
    }
}
