//! Utilities for parsing files

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorExt};

/// Parses the TOML file at `path` into the structure expected by the generic argument
/// # Arguments
/// * `path` - The path to the file to parse
/// # Errors
/// Any IO error while reading or a deserialization error
pub fn parse_toml<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let context = || format!("Parsing TOML file {}", path.to_string_lossy());

    let file_str = std::fs::read_to_string(path).e_context(context)?;
    let toml_content: T = toml::from_str(&file_str).e_context(context)?;

    Ok(toml_content)
}

/// Parses the TOML file at `path` if it exists
/// # Arguments
/// * `path` - The path to the file to parse
/// # Returns
/// `None` if there is no file at `path`, else the result of `parse_toml()`
pub fn parse_toml_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, Error> {
    if !path.is_file() {
        return Ok(None);
    }

    parse_toml(path).map(Some)
}
