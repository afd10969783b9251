//! Registering the theme namespace in composer.json

use crate::error::{Result, ScaffoldError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::path::Path;

/// Namespace separator appended to PSR-4 prefixes
pub const NAMESPACE_SEPARATOR: char = '\\';

const DEFAULT_INDENT: &str = "    ";

/// Insert `namespace\` → `include_path` into `autoload.psr-4` of the manifest
/// at `manifest_path`, creating the nested objects when missing.
///
/// Everything else in the document is written back untouched, in its original
/// key order and indentation.
pub fn patch_manifest(manifest_path: &Path, namespace: &str, include_path: &str) -> Result<()> {
    let content = std::fs::read_to_string(manifest_path)
        .map_err(|e| ScaffoldError::manifest(manifest_path, e))?;
    let mut document: Value =
        serde_json::from_str(&content).map_err(|e| ScaffoldError::manifest(manifest_path, e))?;

    let key = format!(
        "{}{}",
        namespace.trim_matches(NAMESPACE_SEPARATOR),
        NAMESPACE_SEPARATOR
    );
    insert_psr4(&mut document, key, include_path)
        .map_err(|message| ScaffoldError::manifest(manifest_path, message))?;

    let output = to_json(&document, &detect_indent(&content))
        .map_err(|e| ScaffoldError::manifest(manifest_path, e))?;
    std::fs::write(manifest_path, output).map_err(|e| ScaffoldError::manifest(manifest_path, e))
}

fn insert_psr4(document: &mut Value, key: String, include_path: &str) -> Result<(), String> {
    let root = document
        .as_object_mut()
        .ok_or("the document root is not a JSON object")?;
    let autoload = root
        .entry("autoload")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or("\"autoload\" is not a JSON object")?;
    let psr4 = autoload
        .entry("psr-4")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or("\"autoload.psr-4\" is not a JSON object")?;

    psr4.insert(key, Value::String(include_path.to_string()));
    Ok(())
}

/// Indentation of the first indented line, four spaces when there is none
fn detect_indent(content: &str) -> String {
    content
        .lines()
        .skip(1)
        .map(|line| {
            line.chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect::<String>()
        })
        .find(|indent| !indent.is_empty())
        .unwrap_or_else(|| DEFAULT_INDENT.to_string())
}

fn to_json(document: &Value, indent: &str) -> serde_json::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document.serialize(&mut serializer)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// Path of the theme relative to the project root, without leading or
/// trailing slashes, as written into the autoload map
pub fn autoload_path(theme_path: &Path, project_root: &Path) -> String {
    let relative = theme_path.strip_prefix(project_root).unwrap_or(theme_path);
    relative
        .to_string_lossy()
        .replace('\\', "/")
        .trim_matches('/')
        .to_string()
}
