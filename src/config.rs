use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::atomic::write_atomic;
use crate::domain::{SemanticVersion, VersionRecord};
use crate::error::{Result, VersionUpperError};

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "version-upper.json";

const FIELD_CURRENT_VERSION: &str = "current_version";
const FIELD_CURRENT_SEMANTIC_VERSION: &str = "current_semantic_version";
const FIELD_FILES: &str = "files";

/// Persisted version state and the files that carry it.
///
/// `current_version` is the raw string substituted into target files;
/// its semantic part always equals `current_semantic_version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub current_version: VersionRecord,
    pub current_semantic_version: SemanticVersion,
    pub files: Vec<PathBuf>,
}

/// On-disk shape. Field order here is the serialized key order.
#[derive(Serialize)]
struct ConfigDocument<'a> {
    current_version: String,
    current_semantic_version: String,
    files: &'a [PathBuf],
}

impl Config {
    /// The canonical default config
    pub fn sample() -> Self {
        let version = SemanticVersion::new(0, 0, 0);
        Config {
            current_version: VersionRecord::new(version),
            current_semantic_version: version,
            files: Vec::new(),
        }
    }

    /// Loads and validates the config file at `path`.
    ///
    /// # Returns
    /// * `Ok(Config)` - Validated configuration
    /// * `Err(ConfigAccess)` - If the file cannot be read
    /// * `Err(ConfigFormat)` - If the document has the wrong shape
    /// * `Err(Parse)` - If a version string is malformed
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| VersionUpperError::ConfigAccess {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_json_str(&text).map_err(|e| match e {
            VersionUpperError::ConfigFormat(msg) => {
                VersionUpperError::config_format(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parses and validates a config document
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| VersionUpperError::config_format(format!("invalid JSON: {}", e)))?;
        Config::from_value(&document)
    }

    /// Validates the structure of an already-parsed document.
    pub fn from_value(document: &Value) -> Result<Self> {
        let object = document
            .as_object()
            .ok_or_else(|| VersionUpperError::config_format("expected a JSON object"))?;

        if let Some(unknown) = object.keys().find(|key| {
            ![FIELD_CURRENT_VERSION, FIELD_CURRENT_SEMANTIC_VERSION, FIELD_FILES]
                .contains(&key.as_str())
        }) {
            return Err(VersionUpperError::config_format(format!(
                "unknown field `{}`",
                unknown
            )));
        }

        let current_version = required_str(object, FIELD_CURRENT_VERSION)?;
        let current_semantic_version = required_str(object, FIELD_CURRENT_SEMANTIC_VERSION)?;
        let files = required_files(object)?;

        let current_version = VersionRecord::parse(current_version)?;
        let current_semantic_version = SemanticVersion::parse(current_semantic_version)?;

        if current_version.base != current_semantic_version {
            return Err(VersionUpperError::config_format(format!(
                "`{}` ({}) does not match `{}` ({})",
                FIELD_CURRENT_VERSION,
                current_version,
                FIELD_CURRENT_SEMANTIC_VERSION,
                current_semantic_version
            )));
        }

        Ok(Config {
            current_version,
            current_semantic_version,
            files,
        })
    }

    /// Serializes with stable key order, two-space indent and a trailing newline
    pub fn to_json_string(&self) -> Result<String> {
        let document = ConfigDocument {
            current_version: self.current_version.to_string(),
            current_semantic_version: self.current_semantic_version.to_string(),
            files: &self.files,
        };
        let mut text = serde_json::to_string_pretty(&document)?;
        text.push('\n');
        Ok(text)
    }

    /// Writes the config to `path`, replacing it atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_json_string()?;
        write_atomic(path, text.as_bytes()).map_err(|source| VersionUpperError::ConfigAccess {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn required_str<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    match object.get(field) {
        None => Err(VersionUpperError::config_format(format!(
            "missing field `{}`",
            field
        ))),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(VersionUpperError::config_format(format!(
            "field `{}` must be a string, found {}",
            field,
            type_name(other)
        ))),
    }
}

fn required_files(object: &Map<String, Value>) -> Result<Vec<PathBuf>> {
    let entries = match object.get(FIELD_FILES) {
        None => {
            return Err(VersionUpperError::config_format(format!(
                "missing field `{}`",
                FIELD_FILES
            )))
        }
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(VersionUpperError::config_format(format!(
                "field `{}` must be an array, found {}",
                FIELD_FILES,
                type_name(other)
            )))
        }
    };

    let mut seen = HashSet::new();
    let mut files = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let path = match entry {
            Value::String(s) if !s.is_empty() => s.as_str(),
            Value::String(_) => {
                return Err(VersionUpperError::config_format(format!(
                    "`{}[{}]` must not be empty",
                    FIELD_FILES, index
                )))
            }
            other => {
                return Err(VersionUpperError::config_format(format!(
                    "`{}[{}]` must be a string, found {}",
                    FIELD_FILES,
                    index,
                    type_name(other)
                )))
            }
        };
        if !seen.insert(path) {
            return Err(VersionUpperError::config_format(format!(
                "duplicate entry `{}` in `{}`",
                path, FIELD_FILES
            )));
        }
        files.push(PathBuf::from(path));
    }
    Ok(files)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Structural description of the config file, JSON-Schema shaped.
pub fn config_schema() -> Value {
    json!({
        "title": "Config",
        "description": "The configuration file schema",
        "type": "object",
        "properties": {
            "current_version": {
                "title": "Current Version",
                "description": "The current version, optionally suffixed with +<commit hash>",
                "type": "string",
                "default": "0.0.0",
                "pattern": r"^\d+\.\d+\.\d+(-rc\d+)?(\+[0-9A-Za-z.-]+)?$",
                "examples": [
                    "0.0.0",
                    "0.0.0-rc1",
                    "0.0.0+57fabefae989244d87b562cc4fd576fb5e4e6933"
                ]
            },
            "current_semantic_version": {
                "title": "Current Semantic Version",
                "description": "The current semantic version",
                "type": "string",
                "default": "0.0.0",
                "pattern": r"^\d+\.\d+\.\d+(-rc\d+)?$"
            },
            "files": {
                "title": "Files",
                "description": "Files and directories wherein version strings will be updated. Directories will be searched recursively.",
                "type": "array",
                "items": { "type": "string" },
                "uniqueItems": true,
                "default": [],
                "examples": ["app/main.py", "app/module/"]
            }
        },
        "required": [FIELD_CURRENT_VERSION, FIELD_CURRENT_SEMANTIC_VERSION, FIELD_FILES],
        "additionalProperties": false
    })
}
