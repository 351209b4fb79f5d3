// ~/src/data_loaders/yaml.rs

use std::{fs, path::Path};

use serde_yaml::Value;

/// Reads and parses a YAML file; a missing or malformed file yields `None`.
pub fn load_yaml(path: &Path) -> Option<Value> {
    let txt = fs::read_to_string(path).ok()?;
    parse_yaml(&txt)
}

pub fn parse_yaml(txt: &str) -> Option<Value> {
    serde_yaml::from_str(txt).ok()
}
