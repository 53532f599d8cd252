//! Harness creation requests
//!
//! The flat, logical-id based shape used for creating or replacing a harness
//! (and as the on-disk JSON format). Building a request is the one place
//! where referential integrity is enforced.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ComplianceStatus, Connection, Connector, Harness, Pin, Wire};
use crate::core::HarnessGuardError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinCreate {
    /// Pin identifier within the connector, e.g. "1" or "A1".
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorCreate {
    /// Logical connector id, e.g. "CONN1".
    pub id: String,
    pub manufacturer: String,
    pub part_number: String,
    #[serde(default)]
    pub pins: Vec<PinCreate>,
    #[serde(default)]
    pub voltage_rating: Option<f64>,
    #[serde(default)]
    pub applicable_wire_max_diameter: Option<f64>,
    #[serde(default)]
    pub is_rohs: ComplianceStatus,
    #[serde(default)]
    pub is_ul: ComplianceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireCreate {
    /// Logical wire id, e.g. "W-001".
    pub id: String,
    pub manufacturer: String,
    pub part_number: String,
    pub color: String,
    pub gauge: f64,
    /// Millimetres.
    pub length: f64,
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
pub struct ConnectionCreate {
    pub wire_id: String,
    pub from_connector_id: String,
    pub from_pin_id: String,
    pub to_connector_id: String,
    pub to_pin_id: String,
    #[serde(default)]
    pub strip_length_a: Option<f64>,
    #[serde(default)]
    pub strip_length_b: Option<f64>,
    #[serde(default)]
    pub terminal_part_number_a: Option<String>,
    #[serde(default)]
    pub terminal_part_number_b: Option<String>,
    #[serde(default)]
    pub marking_text_a: Option<String>,
    #[serde(default)]
    pub marking_text_b: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HarnessCreate {
    pub name: String,
    #[serde(default)]
    pub connectors: Vec<ConnectorCreate>,
    #[serde(default)]
    pub wires: Vec<WireCreate>,
    #[serde(default)]
    pub connections: Vec<ConnectionCreate>,
}

impl HarnessCreate {
    /// Build a new harness with a freshly generated id.
    pub fn build(&self) -> Result<Harness, HarnessGuardError> {
        self.build_with_id(Uuid::new_v4())
    }

    /// Build a harness under an existing id (used when replacing children).
    pub fn build_with_id(&self, harness_id: Uuid) -> Result<Harness, HarnessGuardError> {
        let mut connector_ids: HashSet<&str> = HashSet::new();
        let mut pin_map: HashMap<(&str, &str), Uuid> = HashMap::new();
        let mut connectors = Vec::with_capacity(self.connectors.len());

        for conn_in in &self.connectors {
            if !connector_ids.insert(conn_in.id.as_str()) {
                return Err(HarnessGuardError::InvalidHarnessData(format!(
                    "Duplicate connector id '{}'.",
                    conn_in.id
                )));
            }

            let connector_id = Uuid::new_v4();
            let mut pins = Vec::with_capacity(conn_in.pins.len());
            for pin_in in &conn_in.pins {
                let pin_id = Uuid::new_v4();
                if pin_map
                    .insert((conn_in.id.as_str(), pin_in.id.as_str()), pin_id)
                    .is_some()
                {
                    return Err(HarnessGuardError::InvalidHarnessData(format!(
                        "Duplicate pin '{}' on connector '{}'.",
                        pin_in.id, conn_in.id
                    )));
                }
                pins.push(Pin {
                    id: pin_id,
                    logical_id: pin_in.id.clone(),
                    connector_id,
                });
            }

            connectors.push(Connector {
                id: connector_id,
                logical_id: conn_in.id.clone(),
                manufacturer: conn_in.manufacturer.clone(),
                part_number: conn_in.part_number.clone(),
                voltage_rating: conn_in.voltage_rating,
                applicable_wire_max_diameter: conn_in.applicable_wire_max_diameter,
                is_rohs: conn_in.is_rohs,
                is_ul: conn_in.is_ul,
                pins,
            });
        }

        let mut wire_map: HashMap<&str, Uuid> = HashMap::new();
        let mut wires = Vec::with_capacity(self.wires.len());
        for wire_in in &self.wires {
            let wire_id = Uuid::new_v4();
            if wire_map.insert(wire_in.id.as_str(), wire_id).is_some() {
                return Err(HarnessGuardError::InvalidHarnessData(format!(
                    "Duplicate wire id '{}'.",
                    wire_in.id
                )));
            }
            wires.push(Wire {
                id: wire_id,
                logical_id: wire_in.id.clone(),
                manufacturer: wire_in.manufacturer.clone(),
                part_number: wire_in.part_number.clone(),
                color: wire_in.color.clone(),
                gauge: wire_in.gauge,
                length: wire_in.length,
                voltage_rating: wire_in.voltage_rating,
                outer_diameter: wire_in.outer_diameter,
                is_rohs: wire_in.is_rohs,
                is_ul: wire_in.is_ul,
            });
        }

        let mut connections = Vec::with_capacity(self.connections.len());
        for conn_data in &self.connections {
            let from_pin = pin_map.get(&(
                conn_data.from_connector_id.as_str(),
                conn_data.from_pin_id.as_str(),
            ));
            let to_pin = pin_map.get(&(
                conn_data.to_connector_id.as_str(),
                conn_data.to_pin_id.as_str(),
            ));

            let (from_pin_id, to_pin_id) = match (from_pin, to_pin) {
                (Some(&from), Some(&to)) => (from, to),
                (None, _) => {
                    return Err(HarnessGuardError::InvalidHarnessData(format!(
                        "Pin not found for connection: {}-{}.",
                        conn_data.from_connector_id, conn_data.from_pin_id
                    )))
                }
                (_, None) => {
                    return Err(HarnessGuardError::InvalidHarnessData(format!(
                        "Pin not found for connection: {}-{}.",
                        conn_data.to_connector_id, conn_data.to_pin_id
                    )))
                }
            };

            let wire_id = *wire_map.get(conn_data.wire_id.as_str()).ok_or_else(|| {
                HarnessGuardError::InvalidHarnessData(format!(
                    "Wire not found for connection: {}.",
                    conn_data.wire_id
                ))
            })?;

            connections.push(Connection {
                id: Uuid::new_v4(),
                wire_id,
                from_pin_id,
                to_pin_id,
                strip_length_a: conn_data.strip_length_a,
                strip_length_b: conn_data.strip_length_b,
                terminal_part_number_a: conn_data.terminal_part_number_a.clone(),
                terminal_part_number_b: conn_data.terminal_part_number_b.clone(),
                marking_text_a: conn_data.marking_text_a.clone(),
                marking_text_b: conn_data.marking_text_b.clone(),
            });
        }

        tracing::debug!(
            "Built harness '{}' with {} connectors, {} wires, {} connections",
            self.name,
            connectors.len(),
            wires.len(),
            connections.len()
        );

        Ok(Harness::from_parts(
            harness_id,
            self.name.clone(),
            connectors,
            wires,
            connections,
        ))
    }
}
