//! Harness Data Model
//!
//! In-memory representation of a wire harness: connectors with their pins,
//! wires, and the connections that join two pins with a wire. Every entity
//! carries a generated internal identity (`Uuid`) plus the human-assigned
//! logical id that is only unique within its harness.
//!
//! Technical specification fields are independently optional. `None` (or
//! [`ComplianceStatus::Unknown`]) means the value has not been enriched from
//! the catalog yet, which is different from a known non-compliant value.

pub mod harness;
pub mod request;

pub use harness::{Harness, ResolvedConnection};
pub use request::{ConnectionCreate, ConnectorCreate, HarnessCreate, PinCreate, WireCreate};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tri-state compliance flag (RoHS, UL).
///
/// Serialised as `null`, `true` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum ComplianceStatus {
    #[default]
    Unknown,
    Compliant,
    NonCompliant,
}

impl ComplianceStatus {
    pub fn is_unknown(&self) -> bool {
        matches!(self, ComplianceStatus::Unknown)
    }

    pub fn is_non_compliant(&self) -> bool {
        matches!(self, ComplianceStatus::NonCompliant)
    }
}

impl From<Option<bool>> for ComplianceStatus {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => ComplianceStatus::Unknown,
            Some(true) => ComplianceStatus::Compliant,
            Some(false) => ComplianceStatus::NonCompliant,
        }
    }
}

impl From<ComplianceStatus> for Option<bool> {
    fn from(value: ComplianceStatus) -> Self {
        match value {
            ComplianceStatus::Unknown => None,
            ComplianceStatus::Compliant => Some(true),
            ComplianceStatus::NonCompliant => Some(false),
        }
    }
}

/// A contact position inside a connector housing ("1", "A", ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pin {
    pub id: Uuid,
    pub logical_id: String,
    pub connector_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub id: Uuid,
    pub logical_id: String,
    pub manufacturer: String,
    pub part_number: String,
    pub voltage_rating: Option<f64>,
    /// Largest wire outer diameter (mm) the housing accepts.
    pub applicable_wire_max_diameter: Option<f64>,
    pub is_rohs: ComplianceStatus,
    pub is_ul: ComplianceStatus,
    pub pins: Vec<Pin>,
}

impl Connector {
    /// Names of the catalog-backed fields that are still unknown.
    pub fn missing_specs(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.voltage_rating.is_none() {
            missing.push("voltage_rating");
        }
        if self.applicable_wire_max_diameter.is_none() {
            missing.push("applicable_wire_max_diameter");
        }
        if self.is_rohs.is_unknown() {
            missing.push("is_rohs");
        }
        if self.is_ul.is_unknown() {
            missing.push("is_ul");
        }
        missing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wire {
    pub id: Uuid,
    pub logical_id: String,
    pub manufacturer: String,
    pub part_number: String,
    pub color: String,
    /// AWG, integer valued in practice.
    pub gauge: f64,
    /// Cut length in millimetres.
    pub length: f64,
    pub voltage_rating: Option<f64>,
    /// Insulated outer diameter in millimetres.
    pub outer_diameter: Option<f64>,
    pub is_rohs: ComplianceStatus,
    pub is_ul: ComplianceStatus,
}

impl Wire {
    /// Names of the catalog-backed fields that are still unknown.
    pub fn missing_specs(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.voltage_rating.is_none() {
            missing.push("voltage_rating");
        }
        if self.outer_diameter.is_none() {
            missing.push("outer_diameter");
        }
        if self.is_rohs.is_unknown() {
            missing.push("is_rohs");
        }
        if self.is_ul.is_unknown() {
            missing.push("is_ul");
        }
        missing
    }
}

/// One wire run between two pins, with per-end assembly data.
///
/// Side A is the `from_pin` end, side B the `to_pin` end.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Connection {
    pub id: Uuid,
    pub wire_id: Uuid,
    pub from_pin_id: Uuid,
    pub to_pin_id: Uuid,
    pub strip_length_a: Option<f64>,
    pub strip_length_b: Option<f64>,
    pub terminal_part_number_a: Option<String>,
    pub terminal_part_number_b: Option<String>,
    pub marking_text_a: Option<String>,
    pub marking_text_b: Option<String>,
}

/// Project-level requirements the validation engine checks against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default)]
    pub system_voltage: Option<f64>,
    #[serde(default)]
    pub require_rohs: bool,
    /// Accepted and stored, not enforced by any default rule.
    #[serde(default)]
    pub require_ul: bool,
}

impl ProjectSettings {
    /// System voltage when set to a non-zero value.
    pub fn effective_system_voltage(&self) -> Option<f64> {
        self.system_voltage.filter(|v| *v != 0.0)
    }
}
