//! INI serialization logic for converting `ConfigFile` → INI string.

use std::fmt::Write as _;
use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let s3 = &config.store.s3;
    let bucket = s3.bucket.as_deref().unwrap_or("");
    let endpoint = s3.endpoint.as_deref().unwrap_or("");
    let reduced_redundancy = if s3.reduced_redundancy { "true" } else { "false" };

    let mut out = format!(
        r#"[store]
; Artifact backend: file, s3 or memory
type = {}
; Root directory for the file backend
base_path = {}

[s3]
bucket = {}
; S3-compatible endpoint URL (default: https://s3.amazonaws.com)
endpoint = {}
; Leading key segment, e.g. a build date
date_prefix = {}
; Key segment after the hash; leave empty to omit
path = {}
reduced_redundancy = {}

[layers]
; Every layer name that "all" expands to
all = {}

[logging]
directory = {}
file = {}
"#,
        config.store.kind,
        path_to_string(&config.store.base_path),
        bucket,
        endpoint,
        s3.date_prefix,
        s3.path,
        reduced_redundancy,
        config.layers.all.join(","),
        path_to_string(&config.logging.directory),
        config.logging.file,
    );

    out.push_str("\n[buffer]\n; <ext>.layer.<name> or <ext>.geometry.<point|line|polygon> = pixels\n");
    for (extension, buffers) in config.buffer.formats() {
        let mut layers: Vec<_> = buffers.layer.iter().collect();
        layers.sort_by(|a, b| a.0.cmp(b.0));
        for (name, pixels) in layers {
            let _ = writeln!(out, "{}.layer.{} = {}", extension, name, pixels);
        }
        let mut kinds: Vec<_> = buffers.geometry.iter().collect();
        kinds.sort_by(|a, b| a.0.cmp(b.0));
        for (kind, pixels) in kinds {
            let _ = writeln!(out, "{}.geometry.{} = {}", extension, kind, pixels);
        }
    }

    out
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreKind;
    use tempfile::TempDir;

    #[test]
    fn test_written_config_loads_back() {
        let mut config = ConfigFile::default();
        config.store.kind = StoreKind::S3;
        config.store.s3.bucket = Some("tiles".to_string());
        config.store.s3.date_prefix = "20240101".to_string();
        config.store.s3.reduced_redundancy = true;
        config.layers.all = vec!["roads".to_string(), "water".to_string()];
        config.buffer.set_layer_buffer("json", "roads", 8.0);
        config.buffer.set_geometry_buffer("zip", "point", 1.5);

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sub/config.ini");
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_empty_optional_values() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("type = file"));
        assert!(text.contains("bucket = \n"));
        assert!(text.contains("[buffer]"));
    }
}
