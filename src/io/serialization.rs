// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! YAML and JSON serialization helpers.
//!
//! Configuration and the local store index are read and written through
//! these, with the format chosen from the file extension.

use crate::error::{Result, SitemarkError};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Export a value to YAML format.
pub fn export_yaml<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    write_atomically(path, yaml.as_bytes())
}

/// Export a value to pretty-printed JSON format.
pub fn export_json<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    write_atomically(path, json.as_bytes())
}

/// Import a value from YAML format.
pub fn import_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import a value from JSON format.
pub fn import_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

/// Import YAML or JSON depending on the extension of `path`.
pub fn import_by_extension<T: DeserializeOwned>(path: &Path) -> Result<T> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        other => Err(SitemarkError::Serialization(format!(
            "Unsupported file extension: {:?}",
            other
        ))),
    }
}

/// Export YAML or JSON depending on the extension of `path`.
pub fn export_by_extension<T: Serialize>(data: &T, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        other => Err(SitemarkError::Serialization(format!(
            "Unsupported file extension: {:?}",
            other
        ))),
    }
}

/// Write through a temporary sibling and rename, so readers never see a
/// half-written file.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    if let Err(e) = std::fs::write(&tmp, bytes) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e.into());
    }
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        SitemarkError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerConfig;

    #[test]
    fn test_yaml_and_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig {
            company_name: "Acme Builders".into(),
            ..Default::default()
        };
        for name in ["ledger.yaml", "ledger.json"] {
            let path = dir.path().join(name);
            export_by_extension(&config, &path).unwrap();
            let back: LedgerConfig = import_by_extension(&path).unwrap();
            assert_eq!(back, config);
        }
        assert!(export_by_extension(&config, &dir.path().join("ledger.toml")).is_err());
    }
}
