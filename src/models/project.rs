use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The `project.json` document.
///
/// Only the keys the resolver reads or writes are typed. Everything else is
/// captured in the flattened `extra` maps so that Load -> mutate -> Save
/// cycles never drop unknown keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(rename = "RemakeEngine", default)]
    pub remake_engine: RemakeEngine,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemakeEngine {
    #[serde(rename = "Config", default)]
    pub config: EngineConfig,

    #[serde(rename = "Directories", default)]
    pub directories: Directories,

    /// Tool registry consumed by the downstream pipeline. Opaque here.
    #[serde(rename = "Tools", default)]
    pub tools: IndexMap<String, Value>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub project_path: String,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// Path entries are kept as raw JSON values. A `null` or non-string entry
/// reads as unset and is written back unchanged until the resolver replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directories {
    /// Last validated source root. Empty until a run reaches a checkpoint.
    #[serde(rename = "TSGPS2SourcePath", default = "blank_path")]
    pub source_path: Value,

    /// Operator-supplied path recorded while the layout is still unverified.
    #[serde(
        rename = "MainTSGPS2SourcePath",
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub provisional_source_path: Option<Value>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            source_path: blank_path(),
            provisional_source_path: None,
            extra: IndexMap::new(),
        }
    }
}

fn blank_path() -> Value {
    Value::String(String::new())
}

/// Distinguish an explicit `null` from an absent key.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ProjectConfig {
    /// Build the document written on first run.
    pub fn with_defaults(project_base_dir: &str) -> Self {
        Self {
            remake_engine: RemakeEngine {
                config: EngineConfig {
                    project_path: project_base_dir.to_string(),
                    extra: IndexMap::new(),
                },
                directories: Directories::default(),
                tools: IndexMap::new(),
                extra: IndexMap::new(),
            },
            extra: IndexMap::new(),
        }
    }

    /// The recorded source path, or `None` when unset, blank or not a string.
    pub fn source_path(&self) -> Option<&str> {
        self.remake_engine
            .directories
            .source_path
            .as_str()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    pub fn set_source_path(&mut self, path: &str) {
        self.remake_engine.directories.source_path = Value::String(path.to_string());
    }

    pub fn set_provisional_source_path(&mut self, path: &str) {
        self.remake_engine.directories.provisional_source_path =
            Some(Value::String(path.to_string()));
    }

    pub fn project_path(&self) -> &str {
        &self.remake_engine.config.project_path
    }

    /// Fill in `Config.project_path` if an older document left it blank.
    ///
    /// Returns true when the document changed.
    pub fn ensure_project_path(&mut self, project_base_dir: &str) -> bool {
        if self.remake_engine.config.project_path.trim().is_empty() {
            self.remake_engine.config.project_path = project_base_dir.to_string();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_document_shape() {
        let config = ProjectConfig::with_defaults("/games/project");
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(
            value,
            json!({
                "RemakeEngine": {
                    "Config": { "project_path": "/games/project" },
                    "Directories": { "TSGPS2SourcePath": "" },
                    "Tools": {}
                }
            })
        );
    }

    #[test]
    fn test_missing_sections_created_on_demand() {
        let config: ProjectConfig = serde_json::from_value(json!({ "RemakeEngine": {} })).unwrap();
        assert_eq!(config.source_path(), None);
        assert_eq!(config.project_path(), "");

        let config: ProjectConfig = serde_json::from_value(json!({})).unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert!(value["RemakeEngine"]["Directories"].is_object());
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let raw = json!({
            "RemakeEngine": {
                "Config": { "project_path": "/p", "theme": "dark" },
                "Directories": { "TSGPS2SourcePath": "/src", "Output": "/out" },
                "Tools": { "ffmpeg": { "path": "C:/bin/ffmpeg.exe" } },
                "Modules": ["a", "b"]
            },
            "Other": 42
        });

        let mut config: ProjectConfig = serde_json::from_value(raw.clone()).unwrap();
        config.set_source_path("/src");
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }

    #[test]
    fn test_blank_source_path_is_none() {
        let mut config = ProjectConfig::with_defaults("/p");
        config.set_source_path("   ");
        assert_eq!(config.source_path(), None);

        config.set_source_path("/data");
        assert_eq!(config.source_path(), Some("/data"));
    }

    #[test]
    fn test_provisional_key_written_only_when_set() {
        let mut config = ProjectConfig::with_defaults("/p");
        let value = serde_json::to_value(&config).unwrap();
        assert!(value["RemakeEngine"]["Directories"]
            .get("MainTSGPS2SourcePath")
            .is_none());

        config.set_provisional_source_path("/typed");
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value["RemakeEngine"]["Directories"]["MainTSGPS2SourcePath"],
            "/typed"
        );
    }

    #[test]
    fn test_null_and_non_string_paths_read_as_unset() {
        let raw = json!({
            "RemakeEngine": {
                "Directories": { "TSGPS2SourcePath": null, "MainTSGPS2SourcePath": null }
            }
        });
        let config: ProjectConfig = serde_json::from_value(raw).unwrap();
        assert_eq!(config.source_path(), None);

        let value = serde_json::to_value(&config).unwrap();
        assert!(value["RemakeEngine"]["Directories"]["TSGPS2SourcePath"].is_null());
        assert!(value["RemakeEngine"]["Directories"]
            .get("MainTSGPS2SourcePath")
            .is_some_and(Value::is_null));

        let config: ProjectConfig = serde_json::from_value(json!({
            "RemakeEngine": { "Directories": { "TSGPS2SourcePath": 12 } }
        }))
        .unwrap();
        assert_eq!(config.source_path(), None);
    }

    #[test]
    fn test_ensure_project_path() {
        let mut config: ProjectConfig = serde_json::from_value(json!({ "RemakeEngine": {} })).unwrap();
        assert!(config.ensure_project_path("/base"));
        assert_eq!(config.project_path(), "/base");
        assert!(!config.ensure_project_path("/elsewhere"));
        assert_eq!(config.project_path(), "/base");
    }
}
