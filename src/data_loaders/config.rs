use std::path::Path;

use serde_yaml::{Mapping, Value};

use super::yaml::{load_yaml, parse_yaml};

#[derive(Debug, Clone, Default)]
pub struct LidLockSettings {
    pub diagnostics: DiagnosticsSettings,
    pub runtime: RuntimeSettings,
}

#[derive(Debug, Clone)]
pub struct DiagnosticsSettings {
    pub debug: bool,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub realtime_priority: bool,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            realtime_priority: true,
        }
    }
}

impl LidLockSettings {
    pub fn load(path: &Path) -> Option<Self> {
        let value = load_yaml(path)?;
        Self::from_yaml(&value)
    }

    pub fn parse(txt: &str) -> Option<Self> {
        Self::from_yaml(&parse_yaml(txt)?)
    }

    pub fn from_yaml(root: &Value) -> Option<Self> {
        let map = root.as_mapping()?;
        Some(parse_settings(map))
    }
}

fn parse_settings(root: &Mapping) -> LidLockSettings {
    let mut settings = LidLockSettings::default();

    // Top-level shorthands
    settings.diagnostics.debug = bool_at(root, "debug").unwrap_or(settings.diagnostics.debug);
    if let Some(level) = str_at(root, "log_level") {
        settings.diagnostics.log_level = level.to_lowercase();
    }

    let settings_map = mapping_at(root, "settings");
    let diagnostics_map = settings_map.and_then(|v| mapping_at(v, "diagnostics"));
    let runtime_map = settings_map.and_then(|v| mapping_at(v, "runtime"));

    if let Some(diag) = diagnostics_map {
        settings.diagnostics.debug =
            bool_any(diag, &["debug", "debug_mode"]).unwrap_or(settings.diagnostics.debug);
        if let Some(level) = str_any(diag, &["log_level", "logging"]) {
            settings.diagnostics.log_level = level.to_lowercase();
        }
    }

    if let Some(runtime) = runtime_map {
        settings.runtime.realtime_priority = bool_any(
            runtime,
            &["realtime_priority", "elevate_priority"],
        )
        .unwrap_or(settings.runtime.realtime_priority);
    }

    settings
}

fn bool_at(map: &Mapping, key: &str) -> Option<bool> {
    map.get(Value::String(key.to_string()))?.as_bool()
}

fn bool_any(map: &Mapping, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| bool_at(map, k))
}

fn str_at<'a>(map: &'a Mapping, key: &str) -> Option<&'a str> {
    map.get(Value::String(key.to_string()))?.as_str()
}

fn str_any<'a>(map: &'a Mapping, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| str_at(map, k))
}

fn mapping_at<'a>(map: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    map.get(Value::String(key.to_string()))?.as_mapping()
}
