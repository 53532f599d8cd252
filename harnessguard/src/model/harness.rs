//! Harness Aggregate
//!
//! The [`Harness`] owns its connectors, wires and connections and keeps
//! precomputed index maps so that validation and reporting can resolve a
//! connection's wire, pins and owning connectors in O(1):
//! - wire id -> wire
//! - connector id -> connector
//! - pin id -> (owning connector, pin)

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use super::request::{ConnectionCreate, ConnectorCreate, HarnessCreate, PinCreate, WireCreate};
use super::{Connection, Connector, Pin, Wire};

/// A connection whose wire, both pins and both connectors were found.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedConnection<'a> {
    pub connection: &'a Connection,
    pub wire: &'a Wire,
    pub from_connector: &'a Connector,
    pub from_pin: &'a Pin,
    pub to_connector: &'a Connector,
    pub to_pin: &'a Pin,
}

impl ResolvedConnection<'_> {
    /// `"{connector}-{pin}"` location of the from end.
    pub fn from_location(&self) -> String {
        format!("{}-{}", self.from_connector.logical_id, self.from_pin.logical_id)
    }

    /// `"{connector}-{pin}"` location of the to end.
    pub fn to_location(&self) -> String {
        format!("{}-{}", self.to_connector.logical_id, self.to_pin.logical_id)
    }
}

/// Index maps: entity id -> position in the owning vectors.
#[derive(Debug, Clone, Default)]
struct HarnessIndex {
    connector_indices: HashMap<Uuid, usize>,
    pin_indices: HashMap<Uuid, (usize, usize)>,
    wire_indices: HashMap<Uuid, usize>,
}

impl HarnessIndex {
    fn build(connectors: &[Connector], wires: &[Wire]) -> Self {
        let mut index = HarnessIndex::default();

        for (ci, connector) in connectors.iter().enumerate() {
            index.connector_indices.insert(connector.id, ci);
            for (pi, pin) in connector.pins.iter().enumerate() {
                index.pin_indices.insert(pin.id, (ci, pi));
            }
        }

        for (wi, wire) in wires.iter().enumerate() {
            index.wire_indices.insert(wire.id, wi);
        }

        index
    }
}

/// Aggregate root for one wiring assembly.
///
/// Children are fixed at construction; an update builds a new `Harness`.
#[derive(Debug, Clone, Serialize)]
pub struct Harness {
    id: Uuid,
    name: String,
    connectors: Vec<Connector>,
    wires: Vec<Wire>,
    connections: Vec<Connection>,
    #[serde(skip)]
    index: HarnessIndex,
}

impl Harness {
    /// Assemble a harness from already-identified children.
    ///
    /// Connections are not checked here: a connection whose references do
    /// not resolve is kept and treated as incomplete by the reports.
    pub fn from_parts(
        id: Uuid,
        name: impl Into<String>,
        connectors: Vec<Connector>,
        wires: Vec<Wire>,
        connections: Vec<Connection>,
    ) -> Self {
        let index = HarnessIndex::build(&connectors, &wires);
        Self {
            id,
            name: name.into(),
            connectors,
            wires,
            connections,
            index,
        }
    }

    /// An empty harness with a fresh id.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::from_parts(Uuid::new_v4(), name, Vec::new(), Vec::new(), Vec::new())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty() && self.wires.is_empty() && self.connections.is_empty()
    }

    pub fn connector(&self, id: Uuid) -> Option<&Connector> {
        self.index
            .connector_indices
            .get(&id)
            .map(|&ci| &self.connectors[ci])
    }

    pub fn wire(&self, id: Uuid) -> Option<&Wire> {
        self.index.wire_indices.get(&id).map(|&wi| &self.wires[wi])
    }

    /// Look up a pin together with the connector that owns it.
    pub fn pin(&self, id: Uuid) -> Option<(&Connector, &Pin)> {
        self.index.pin_indices.get(&id).map(|&(ci, pi)| {
            let connector = &self.connectors[ci];
            (connector, &connector.pins[pi])
        })
    }

    pub fn connector_of_pin(&self, pin_id: Uuid) -> Option<&Connector> {
        self.pin(pin_id).map(|(connector, _)| connector)
    }

    pub fn wire_of(&self, connection: &Connection) -> Option<&Wire> {
        self.wire(connection.wire_id)
    }

    pub fn from_connector(&self, connection: &Connection) -> Option<&Connector> {
        self.connector_of_pin(connection.from_pin_id)
    }

    pub fn to_connector(&self, connection: &Connection) -> Option<&Connector> {
        self.connector_of_pin(connection.to_pin_id)
    }

    /// Resolve every reference of a connection, or `None` if any is missing.
    pub fn resolve<'a>(&'a self, connection: &'a Connection) -> Option<ResolvedConnection<'a>> {
        let wire = self.wire_of(connection)?;
        let (from_connector, from_pin) = self.pin(connection.from_pin_id)?;
        let (to_connector, to_pin) = self.pin(connection.to_pin_id)?;
        Some(ResolvedConnection {
            connection,
            wire,
            from_connector,
            from_pin,
            to_connector,
            to_pin,
        })
    }

    /// All connections that resolve fully, in iteration order.
    pub fn resolved_connections(&self) -> impl Iterator<Item = ResolvedConnection<'_>> {
        self.connections.iter().filter_map(move |c| self.resolve(c))
    }

    /// Read the harness back into its creation shape.
    ///
    /// Only fully resolvable connections are emitted.
    pub fn to_request(&self) -> HarnessCreate {
        HarnessCreate {
            name: self.name.clone(),
            connectors: self
                .connectors
                .iter()
                .map(|c| ConnectorCreate {
                    id: c.logical_id.clone(),
                    manufacturer: c.manufacturer.clone(),
                    part_number: c.part_number.clone(),
                    pins: c
                        .pins
                        .iter()
                        .map(|p| PinCreate {
                            id: p.logical_id.clone(),
                        })
                        .collect(),
                    voltage_rating: c.voltage_rating,
                    applicable_wire_max_diameter: c.applicable_wire_max_diameter,
                    is_rohs: c.is_rohs,
                    is_ul: c.is_ul,
                })
                .collect(),
            wires: self
                .wires
                .iter()
                .map(|w| WireCreate {
                    id: w.logical_id.clone(),
                    manufacturer: w.manufacturer.clone(),
                    part_number: w.part_number.clone(),
                    color: w.color.clone(),
                    gauge: w.gauge,
                    length: w.length,
                    voltage_rating: w.voltage_rating,
                    outer_diameter: w.outer_diameter,
                    is_rohs: w.is_rohs,
                    is_ul: w.is_ul,
                })
                .collect(),
            connections: self
                .resolved_connections()
                .map(|r| ConnectionCreate {
                    wire_id: r.wire.logical_id.clone(),
                    from_connector_id: r.from_connector.logical_id.clone(),
                    from_pin_id: r.from_pin.logical_id.clone(),
                    to_connector_id: r.to_connector.logical_id.clone(),
                    to_pin_id: r.to_pin.logical_id.clone(),
                    strip_length_a: r.connection.strip_length_a,
                    strip_length_b: r.connection.strip_length_b,
                    terminal_part_number_a: r.connection.terminal_part_number_a.clone(),
                    terminal_part_number_b: r.connection.terminal_part_number_b.clone(),
                    marking_text_a: r.connection.marking_text_a.clone(),
                    marking_text_b: r.connection.marking_text_b.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComplianceStatus;

    fn connector(logical_id: &str, pins: &[&str]) -> Connector {
        let id = Uuid::new_v4();
        Connector {
            id,
            logical_id: logical_id.to_string(),
            manufacturer: "JST".to_string(),
            part_number: "PHR-3".to_string(),
            voltage_rating: None,
            applicable_wire_max_diameter: None,
            is_rohs: ComplianceStatus::Unknown,
            is_ul: ComplianceStatus::Unknown,
            pins: pins
                .iter()
                .map(|p| Pin {
                    id: Uuid::new_v4(),
                    logical_id: p.to_string(),
                    connector_id: id,
                })
                .collect(),
        }
    }

    fn wire(logical_id: &str) -> Wire {
        Wire {
            id: Uuid::new_v4(),
            logical_id: logical_id.to_string(),
            manufacturer: "Test".to_string(),
            part_number: "UL1007-26-RD".to_string(),
            color: "RD".to_string(),
            gauge: 26.0,
            length: 150.0,
            voltage_rating: None,
            outer_diameter: None,
            is_rohs: ComplianceStatus::Unknown,
            is_ul: ComplianceStatus::Unknown,
        }
    }

    #[test]
    fn test_resolve_connection() {
        let c1 = connector("CONN1", &["1", "2"]);
        let c2 = connector("CONN2", &["A"]);
        let w1 = wire("W1");
        let connection = Connection {
            id: Uuid::new_v4(),
            wire_id: w1.id,
            from_pin_id: c1.pins[1].id,
            to_pin_id: c2.pins[0].id,
            ..Default::default()
        };
        let harness = Harness::from_parts(
            Uuid::new_v4(),
            "H",
            vec![c1.clone(), c2.clone()],
            vec![w1],
            vec![connection],
        );

        let resolved = harness.resolve(&harness.connections()[0]).unwrap();
        assert_eq!(resolved.wire.logical_id, "W1");
        assert_eq!(resolved.from_location(), "CONN1-2");
        assert_eq!(resolved.to_location(), "CONN2-A");
        assert_eq!(harness.connector_of_pin(c2.pins[0].id).unwrap().id, c2.id);
    }

    #[test]
    fn test_dangling_connection_is_kept_but_unresolved() {
        let c1 = connector("CONN1", &["1"]);
        let connection = Connection {
            id: Uuid::new_v4(),
            wire_id: Uuid::new_v4(),
            from_pin_id: c1.pins[0].id,
            to_pin_id: Uuid::new_v4(),
            ..Default::default()
        };
        let harness = Harness::from_parts(Uuid::new_v4(), "H", vec![c1], vec![], vec![connection]);

        assert_eq!(harness.connections().len(), 1);
        assert!(harness.resolve(&harness.connections()[0]).is_none());
        assert!(harness.from_connector(&harness.connections()[0]).is_some());
        assert!(harness.to_connector(&harness.connections()[0]).is_none());
        assert_eq!(harness.resolved_connections().count(), 0);
    }

    #[test]
    fn test_to_request_skips_incomplete_connections() {
        let c1 = connector("CONN1", &["1", "2"]);
        let w1 = wire("W1");
        let good = Connection {
            id: Uuid::new_v4(),
            wire_id: w1.id,
            from_pin_id: c1.pins[0].id,
            to_pin_id: c1.pins[1].id,
            marking_text_a: Some("W1-A".to_string()),
            ..Default::default()
        };
        let broken = Connection {
            id: Uuid::new_v4(),
            wire_id: Uuid::new_v4(),
            from_pin_id: c1.pins[0].id,
            to_pin_id: c1.pins[1].id,
            ..Default::default()
        };
        let harness = Harness::from_parts(Uuid::new_v4(), "H", vec![c1], vec![w1], vec![good, broken]);

        let request = harness.to_request();
        assert_eq!(request.connections.len(), 1);
        assert_eq!(request.connections[0].from_pin_id, "1");
        assert_eq!(request.connections[0].marking_text_a.as_deref(), Some("W1-A"));
        assert_eq!(request.connectors[0].pins.len(), 2);
    }
}
