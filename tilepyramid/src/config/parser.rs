//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::{ConfigFile, StoreKind};
use crate::reformat::BufferConfig;

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [store] section
    if let Some(section) = ini.section(Some("store")) {
        if let Some(v) = section.get("type") {
            config.store.kind = v
                .parse::<StoreKind>()
                .map_err(|_| invalid("store", "type", v, "must be one of: file, s3, memory"))?;
        }
        if let Some(v) = section.get("base_path") {
            let v = v.trim();
            if !v.is_empty() {
                config.store.base_path = expand_tilde(v);
            }
        }
    }

    // [s3] section
    if let Some(section) = ini.section(Some("s3")) {
        let s3 = &mut config.store.s3;
        if let Some(v) = section.get("bucket") {
            let v = v.trim();
            if !v.is_empty() {
                s3.bucket = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("endpoint") {
            let v = v.trim();
            if !v.is_empty() {
                if !(v.starts_with("http://") || v.starts_with("https://")) {
                    return Err(invalid("s3", "endpoint", v, "must be an http:// or https:// URL"));
                }
                s3.endpoint = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("date_prefix") {
            s3.date_prefix = v.trim().trim_matches('/').to_string();
        }
        if let Some(v) = section.get("path") {
            s3.path = v.trim().trim_matches('/').to_string();
        }
        if let Some(v) = section.get("reduced_redundancy") {
            s3.reduced_redundancy = parse_bool(v);
        }
    }

    // [layers] section
    if let Some(section) = ini.section(Some("layers")) {
        if let Some(v) = section.get("all") {
            let mut names: Vec<String> = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if names.is_empty() {
                return Err(invalid("layers", "all", v, "must list at least one layer"));
            }
            if names.iter().any(|n| n == crate::layers::ALL_LAYERS) {
                return Err(invalid("layers", "all", v, "'all' is reserved"));
            }
            names.sort();
            names.dedup();
            config.layers.all = names;
        }
    }

    // [buffer] section
    if let Some(section) = ini.section(Some("buffer")) {
        config.buffer = parse_buffers(section.iter())?;
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

/// Parse `<ext>.layer.<name>` and `<ext>.geometry.<kind>` buffer entries.
fn parse_buffers<'a, I>(entries: I) -> Result<BufferConfig, ConfigFileError>
where
    I: Iterator<Item = (&'a str, &'a str)>,
{
    const KEY_REASON: &str = "key must be <ext>.layer.<name> or <ext>.geometry.<point|line|polygon>";

    let mut buffers = BufferConfig::new();
    for (key, value) in entries {
        let pixels: f64 = value
            .trim()
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| invalid("buffer", key, value, "must be a non-negative number of pixels"))?;

        let mut parts = key.splitn(3, '.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(ext), Some("layer"), Some(name)) if !ext.is_empty() && !name.is_empty() => {
                buffers.set_layer_buffer(ext, name, pixels);
            }
            (Some(ext), Some("geometry"), Some(kind @ ("point" | "line" | "polygon")))
                if !ext.is_empty() =>
            {
                buffers.set_geometry_buffer(ext, kind, pixels);
            }
            _ => return Err(invalid("buffer", key, value, KEY_REASON)),
        }
    }
    Ok(buffers)
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
