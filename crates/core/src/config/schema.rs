//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub editing: EditingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GeneralConfig {
    /// `.xcodeproj` bundle used when a command is given no project path
    #[serde(default)]
    pub project: Option<String>,
}

/// Defaults for commands that edit a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EditingConfig {
    /// Source tree of added file references
    #[serde(default = "default_source_tree")]
    pub source_tree: String,

    /// Create groups without a backing folder
    #[serde(default)]
    pub without_folder: bool,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self {
            source_tree: default_source_tree(),
            without_folder: false,
        }
    }
}

fn default_source_tree() -> String {
    "<group>".to_string()
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter level, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let schema: ConfigSchema = toml::from_str("").unwrap();
        assert_eq!(schema, ConfigSchema::default());
        assert_eq!(schema.editing.source_tree, "<group>");
        assert_eq!(schema.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let schema: ConfigSchema = toml::from_str(
            r#"
[general]
project = "App.xcodeproj"

[editing]
without_folder = true
"#,
        )
        .unwrap();
        assert_eq!(schema.general.project.as_deref(), Some("App.xcodeproj"));
        assert!(schema.editing.without_folder);
        assert_eq!(schema.editing.source_tree, "<group>");
        assert!(!schema.logging.json);
    }
}
