//! Built-in and External Catalog Data
//!
//! Catalog records are loaded from:
//! 1. JSON files embedded into the binary (always available)
//! 2. User JSON files in a catalog directory, which override embedded
//!    records with the same part number
//!
//! Every file holds a JSON array of [`CatalogEntry`] records.

use std::path::Path;

use crate::catalog::{CatalogEntry, InMemoryCatalog};
use crate::core::HarnessGuardError;

const EMBEDDED_CONNECTORS: &str = include_str!("../../catalog/connectors.json");
const EMBEDDED_WIRES: &str = include_str!("../../catalog/wires.json");
const EMBEDDED_TERMINALS: &str = include_str!("../../catalog/terminals.json");

/// All records from the embedded catalog files.
pub fn get_builtin_entries() -> Vec<CatalogEntry> {
    let embedded_jsons = [EMBEDDED_CONNECTORS, EMBEDDED_WIRES, EMBEDDED_TERMINALS];

    let mut entries = Vec::new();
    for json_str in embedded_jsons {
        match serde_json::from_str::<Vec<CatalogEntry>>(json_str) {
            Ok(parsed) => entries.extend(parsed),
            Err(e) => {
                tracing::warn!("Failed to parse embedded catalog: {}", e);
            }
        }
    }

    entries
}

/// Load the records of a single catalog JSON file.
pub fn load_catalog_from_file(path: &Path) -> Result<Vec<CatalogEntry>, HarnessGuardError> {
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<CatalogEntry> = serde_json::from_str(&content)
        .map_err(|e| HarnessGuardError::Catalog(format!("{}: {}", path.display(), e)))?;
    Ok(entries)
}

/// Load every `*.json` file of a directory into `catalog`.
///
/// Unreadable files are skipped and reported in the returned error list, so
/// one broken file does not hide the rest of the catalog.
pub fn load_catalog_from_directory(
    catalog: &mut InMemoryCatalog,
    dir: &Path,
) -> Result<(usize, Vec<String>), HarnessGuardError> {
    if !dir.is_dir() {
        return Err(HarnessGuardError::Catalog(format!(
            "Catalog directory not found: {}",
            dir.display()
        )));
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    // Later files win on duplicate part numbers; keep that deterministic.
    paths.sort();

    let mut loaded = 0;
    let mut errors = Vec::new();
    for path in paths {
        match load_catalog_from_file(&path) {
            Ok(entries) => {
                tracing::info!("Loaded {} catalog entries from {:?}", entries.len(), path.file_name());
                loaded += entries.len();
                catalog.extend(entries);
            }
            Err(e) => {
                let error_msg = format!("Failed to load {:?}: {}", path.file_name(), e);
                tracing::warn!("{}", error_msg);
                errors.push(error_msg);
            }
        }
    }

    Ok((loaded, errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogLookup, CatalogSpec};
    use crate::model::ComplianceStatus;

    #[test]
    fn test_builtin_catalog_parses() {
        let entries = get_builtin_entries();
        assert_eq!(entries.len(), 8);
        assert!(entries.iter().any(|e| e.part_number == "SPH-002T-P0.5S"));
    }

    #[test]
    fn test_builtin_terminal_spec() {
        let catalog = InMemoryCatalog::builtin();
        let spec = catalog.get_specification("SPH-002T-P0.5S").unwrap();
        let terminal = spec.as_terminal().unwrap();
        assert_eq!(terminal.gauge_range(), Some((24.0, 28.0)));
        assert_eq!(terminal.compatible_connector_series, vec!["PHR".to_string()]);
    }

    #[test]
    fn test_builtin_non_rohs_connector() {
        let catalog = InMemoryCatalog::builtin();
        match catalog.get_specification("OLD-CONN-01") {
            Some(CatalogSpec::Connector(spec)) => {
                assert_eq!(spec.is_rohs, ComplianceStatus::NonCompliant);
                assert_eq!(spec.pin_count, Some(4));
            }
            other => panic!("unexpected spec: {:?}", other),
        }
    }

    #[test]
    fn test_directory_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("custom.json"),
            r#"[{"part_number": "PHR-3", "kind": "connector", "voltage_rating": 250.0}]"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("README.md"), "ignored").unwrap();

        let mut catalog = InMemoryCatalog::builtin();
        let (loaded, errors) = load_catalog_from_directory(&mut catalog, dir.path()).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(errors.len(), 1);
        let spec = catalog.get_specification("PHR-3").unwrap();
        assert_eq!(spec.as_connector().unwrap().voltage_rating, Some(250.0));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let mut catalog = InMemoryCatalog::new();
        let result = load_catalog_from_directory(&mut catalog, Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(HarnessGuardError::Catalog(_))));
    }
}
