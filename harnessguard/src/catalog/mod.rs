//! Parts Catalog
//!
//! Read-only technical specifications keyed by part number. The validation
//! engine and the enrichment step only see the [`CatalogLookup`] trait; the
//! in-memory implementation here backs tests, the CLI, and any caller that
//! loads catalog JSON files.
//!
//! Records are a closed variant per component kind so that "field absent" is
//! an explicit `None` rather than a missing map key:
//!
//! ```json
//! {"part_number": "SPH-002T-P0.5S", "kind": "terminal",
//!  "applicable_wire_gauge_min": 24, "applicable_wire_gauge_max": 28,
//!  "compatible_connector_series": ["PHR"]}
//! ```

pub mod builtin;
pub mod enrich;

pub use builtin::{load_catalog_from_directory, load_catalog_from_file};
pub use enrich::{enrich_request, EnrichmentSummary};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::ComplianceStatus;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConnectorSpec {
    #[serde(default)]
    pub voltage_rating: Option<f64>,
    #[serde(default)]
    pub applicable_wire_max_diameter: Option<f64>,
    #[serde(default)]
    pub is_rohs: ComplianceStatus,
    #[serde(default)]
    pub is_ul: ComplianceStatus,
    #[serde(default)]
    pub pin_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WireSpec {
    #[serde(default)]
    pub voltage_rating: Option<f64>,
    #[serde(default)]
    pub outer_diameter: Option<f64>,
    #[serde(default)]
    pub is_rohs: ComplianceStatus,
    #[serde(default)]
    pub is_ul: ComplianceStatus,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TerminalSpec {
    /// Inclusive AWG bounds.
    #[serde(default)]
    pub applicable_wire_gauge_min: Option<f64>,
    #[serde(default)]
    pub applicable_wire_gauge_max: Option<f64>,
    /// Connector series prefixes this terminal fits. Empty means unconstrained.
    #[serde(default)]
    pub compatible_connector_series: Vec<String>,
}

impl TerminalSpec {
    /// Both gauge bounds, when the catalog defines them.
    pub fn gauge_range(&self) -> Option<(f64, f64)> {
        match (self.applicable_wire_gauge_min, self.applicable_wire_gauge_max) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    pub fn accepts_gauge(&self, gauge: f64) -> bool {
        self.gauge_range()
            .map(|(min, max)| gauge >= min && gauge <= max)
            .unwrap_or(false)
    }

    pub fn accepts_series(&self, series: &str) -> bool {
        self.compatible_connector_series.is_empty()
            || self.compatible_connector_series.iter().any(|s| s == series)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogSpec {
    Connector(ConnectorSpec),
    Wire(WireSpec),
    Terminal(TerminalSpec),
}

impl CatalogSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogSpec::Connector(_) => "connector",
            CatalogSpec::Wire(_) => "wire",
            CatalogSpec::Terminal(_) => "terminal",
        }
    }

    pub fn as_connector(&self) -> Option<&ConnectorSpec> {
        match self {
            CatalogSpec::Connector(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> Option<&WireSpec> {
        match self {
            CatalogSpec::Wire(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&TerminalSpec> {
        match self {
            CatalogSpec::Terminal(spec) => Some(spec),
            _ => None,
        }
    }
}

/// One catalog record as stored in JSON catalog files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub part_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(flatten)]
    pub spec: CatalogSpec,
}

/// Part number -> specification lookup.
///
/// Must answer consistently for the duration of a validation pass.
pub trait CatalogLookup: Send + Sync {
    fn get_specification(&self, part_number: &str) -> Option<CatalogSpec>;
}

/// Catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl InMemoryCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog pre-loaded with the embedded part data.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.extend(builtin::get_builtin_entries());
        tracing::info!("Loaded {} built-in catalog entries", catalog.len());
        catalog
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.part_number.clone(), entry);
    }

    pub fn with_entry(mut self, part_number: &str, spec: CatalogSpec) -> Self {
        self.insert(CatalogEntry {
            part_number: part_number.to_string(),
            manufacturer: None,
            spec,
        });
        self
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = CatalogEntry>) {
        for entry in entries {
            self.insert(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CatalogLookup for InMemoryCatalog {
    fn get_specification(&self, part_number: &str) -> Option<CatalogSpec> {
        self.entries.get(part_number).map(|e| e.spec.clone())
    }
}

/// Connector series: the part number up to the first `-`.
///
/// `"DF13-3S-1.25C"` -> `"DF13"`; a part number without a separator is its
/// own series.
pub fn connector_series(part_number: &str) -> &str {
    part_number.split('-').next().unwrap_or(part_number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_series() {
        assert_eq!(connector_series("DF13-3S-1.25C"), "DF13");
        assert_eq!(connector_series("PHR-3"), "PHR");
        assert_eq!(connector_series("MOLEX"), "MOLEX");
        assert_eq!(connector_series(""), "");
    }

    #[test]
    fn test_terminal_gauge_bounds_inclusive() {
        let spec = TerminalSpec {
            applicable_wire_gauge_min: Some(24.0),
            applicable_wire_gauge_max: Some(28.0),
            compatible_connector_series: vec![],
        };
        assert!(spec.accepts_gauge(24.0));
        assert!(spec.accepts_gauge(28.0));
        assert!(!spec.accepts_gauge(22.0));
        assert!(!spec.accepts_gauge(30.0));
    }

    #[test]
    fn test_terminal_without_bounds_accepts_nothing() {
        let spec = TerminalSpec {
            applicable_wire_gauge_min: Some(24.0),
            ..Default::default()
        };
        assert_eq!(spec.gauge_range(), None);
        assert!(!spec.accepts_gauge(24.0));
    }

    #[test]
    fn test_empty_series_list_is_unconstrained() {
        let spec = TerminalSpec::default();
        assert!(spec.accepts_series("DF13"));

        let spec = TerminalSpec {
            compatible_connector_series: vec!["PHR".to_string()],
            ..Default::default()
        };
        assert!(spec.accepts_series("PHR"));
        assert!(!spec.accepts_series("DF13"));
    }

    #[test]
    fn test_entry_json_is_tagged_by_kind() {
        let json = r#"{"part_number": "X-1", "kind": "wire", "outer_diameter": 1.2, "is_rohs": false}"#;
        let entry: CatalogEntry = serde_json::from_str(json).unwrap();
        let wire = entry.spec.as_wire().unwrap();
        assert_eq!(wire.outer_diameter, Some(1.2));
        assert_eq!(wire.is_rohs, ComplianceStatus::NonCompliant);
        assert_eq!(wire.is_ul, ComplianceStatus::Unknown);
        assert!(entry.spec.as_connector().is_none());
    }

    #[test]
    fn test_lookup_missing_part() {
        let catalog = InMemoryCatalog::new().with_entry(
            "PHR-3",
            CatalogSpec::Connector(ConnectorSpec::default()),
        );
        assert!(catalog.get_specification("PHR-3").is_some());
        assert!(catalog.get_specification("PHR-4").is_none());
    }
}
