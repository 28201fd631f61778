// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowpage and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Application settings.
//!
//! Settings are plain JSON. Every field has a default, so a settings file only needs the keys it
//! overrides; unknown keys are rejected so typos surface early.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::DEFAULT_MAX_UNDO;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid settings {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid settings: {source}")]
    Parse { source: serde_json::Error },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AppSettings {
    pub edit: EditSettings,
    pub view: ViewSettings,
    pub validation: ValidationSettings,
    pub publisher: PublisherKind,
    pub recovery: RecoverySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct EditSettings {
    pub clipboard: ClipboardSettings,
    pub history: HistorySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ClipboardSettings {
    /// Offset applied to pasted objects so they do not cover the originals.
    pub paste_offset: Offset,
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self {
            paste_offset: Offset { x: 20, y: 20 },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct HistorySettings {
    /// Maximum number of undo steps kept per page. `0` disables undo history (and therefore
    /// recovery snapshots, which follow recorded commands).
    pub max_undo_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_undo_depth: DEFAULT_MAX_UNDO,
        }
    }
}

/// Display preferences for the diagram view.
///
/// The editing core does not read these; they are persisted and handed to the UI as-is, so a
/// settings file round-trips them unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ViewSettings {
    pub diagram: DiagramViewSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramViewSettings {
    pub display_grid: bool,
    pub display_shadows: bool,
    pub display_debug_info: bool,
}

impl Default for DiagramViewSettings {
    fn default() -> Self {
        Self {
            display_grid: true,
            display_shadows: true,
            display_debug_info: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationSettings {
    pub enabled: bool,
    /// Template name -> property keys that must be present and non-blank.
    pub required_properties: BTreeMap<String, Vec<String>>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            required_properties: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PublisherKind {
    #[default]
    None,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RecoverySettings {
    pub enabled: bool,
    /// Folder for on-disk recovery files. Without it the recovery bank lives in memory only.
    pub directory: Option<PathBuf>,
    /// Opt into slower, best-effort durable writes (fsync where supported).
    pub durable_writes: bool,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
            durable_writes: false,
        }
    }
}

impl AppSettings {
    pub fn parse(input: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(input).map_err(|source| SettingsError::Parse { source })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        match Self::load(path) {
            Err(SettingsError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, format!("{json}\n")).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// JSON schema of the settings file, for editor tooling.
    pub fn schema_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&schemars::schema_for!(AppSettings))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppSettings, PublisherKind, SettingsError};
    use crate::editor::DEFAULT_MAX_UNDO;

    #[test]
    fn empty_object_yields_defaults() {
        let settings = AppSettings::parse("{}").expect("parse");
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.edit.history.max_undo_depth, DEFAULT_MAX_UNDO);
        assert_eq!(settings.edit.clipboard.paste_offset.x, 20);
        assert!(settings.recovery.enabled);
        assert_eq!(settings.publisher, PublisherKind::None);
    }

    #[test]
    fn view_settings_round_trip_untouched() {
        let settings = AppSettings::parse(
            r#"{ "view": { "diagram": { "display_grid": false, "display_debug_info": true } } }"#,
        )
        .expect("parse");
        assert!(!settings.view.diagram.display_grid);
        assert!(settings.view.diagram.display_shadows);

        let json = serde_json::to_string(&settings).expect("serialize");
        assert_eq!(AppSettings::parse(&json).expect("reparse"), settings);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let settings = AppSettings::parse(
            r#"{
                "edit": { "history": { "max_undo_depth": 3 } },
                "publisher": "json",
                "validation": { "required_properties": { "action": ["name"] } }
            }"#,
        )
        .expect("parse");

        assert_eq!(settings.edit.history.max_undo_depth, 3);
        assert_eq!(settings.edit.clipboard.paste_offset.y, 20);
        assert_eq!(settings.publisher, PublisherKind::Json);
        assert!(settings.validation.enabled);
        assert_eq!(
            settings.validation.required_properties.get("action"),
            Some(&vec!["name".to_owned()])
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = AppSettings::parse(r#"{ "edit": { "histroy": {} } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!(
            "flowpage-settings-missing-{}.json",
            std::process::id()
        ));
        let settings = AppSettings::load_or_default(&path).expect("defaults");
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn schema_mentions_top_level_sections() {
        let schema = AppSettings::schema_json().expect("schema");
        for key in ["edit", "view", "validation", "publisher", "recovery"] {
            assert!(schema.contains(key), "schema is missing {key}");
        }
    }
}
