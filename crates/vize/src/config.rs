//! Configuration file loading for vize.
//!
//! Reads `vize.config.json` from the current working directory.
//! Also provides the JSON Schema for editor autocompletion.

use serde::{Deserialize, Serialize};
use std::path::Path;
use vize_pentimento::ConvertOptions;

/// Configuration file name
pub const CONFIG_FILE: &str = "vize.config.json";

/// Top-level vize configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VizeConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Migration configuration.
    #[serde(default)]
    pub migrate: ConvertOptions,
}

/// Load `vize.config.json` from the given path, directory, or CWD if None.
pub fn load_config(path: Option<&Path>) -> VizeConfig {
    let config_path = match path {
        Some(path) if path.is_file() => path.to_path_buf(),
        Some(dir) => dir.join(CONFIG_FILE),
        None => std::env::current_dir().unwrap_or_default().join(CONFIG_FILE),
    };

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return VizeConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            eprintln!(
                "\x1b[33mWarning:\x1b[0m Failed to parse {}: {}",
                config_path.display(),
                e
            );
            VizeConfig::default()
        }),
        Err(e) => {
            eprintln!(
                "\x1b[33mWarning:\x1b[0m Failed to read {}: {}",
                config_path.display(),
                e
            );
            VizeConfig::default()
        }
    }
}

#[inline]
fn parse_config(content: &str) -> Result<VizeConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// JSON Schema for `vize.config.json`.
pub const VIZE_CONFIG_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Vize Configuration",
  "description": "Configuration file for vize - Vue component migration to <script setup>",
  "type": "object",
  "properties": {
    "$schema": {
      "type": "string",
      "description": "JSON Schema reference for editor autocompletion"
    },
    "migrate": {
      "type": "object",
      "description": "Migration configuration",
      "properties": {
        "lang": {
          "type": "string",
          "enum": ["ts", "tsx", "js", "jsx"],
          "default": "ts",
          "description": "Script language used when a <script> block has no lang attribute"
        },
        "imports": {
          "type": "string",
          "enum": ["legacy", "always", "never"],
          "default": "legacy",
          "description": "When to emit the import of Composition API helpers from 'vue'. \"legacy\" emits it for Options API objects only."
        },
        "format": {
          "type": "boolean",
          "default": false,
          "description": "Reprint the converted script with the code generator"
        },
        "singleQuote": {
          "type": "boolean",
          "default": false,
          "description": "Use single quotes when reprinting"
        }
      },
      "additionalProperties": false
    }
  },
  "additionalProperties": false
}"#;
