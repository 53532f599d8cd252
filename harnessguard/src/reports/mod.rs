//! Derived Reports
//!
//! Pure functions over a loaded [`Harness`]: Bill of Materials, cutlist,
//! from-to list, and the strip and mark-tube lists used on the shop floor.
//! None of them mutate the harness, and all of them follow the iteration
//! order of the harness collections.

pub mod export;

pub use export::{export_procurement, ExportRejected, ProcurementExport, ProcurementRow};

use std::collections::HashMap;

use serde::Serialize;

use crate::core::HarnessGuardError;
use crate::model::Harness;

/// Heat-shrink marker tube dimensions used for every printed marking.
pub const MARK_TUBE_DIAMETER_MM: f64 = 3.0;
pub const MARK_TUBE_LENGTH_MM: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomItem {
    pub part_number: String,
    pub manufacturer: String,
    pub quantity: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BomResult {
    pub connectors: Vec<BomItem>,
    pub wires: Vec<BomItem>,
}

impl BomResult {
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty() && self.wires.is_empty()
    }

    /// Total quantity recorded for a part number across both groups.
    pub fn quantity_of(&self, part_number: &str) -> usize {
        self.connectors
            .iter()
            .chain(self.wires.iter())
            .filter(|item| item.part_number == part_number)
            .map(|item| item.quantity)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutlistItem {
    pub wire_id: String,
    pub part_number: String,
    pub color: String,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CutlistResult {
    pub items: Vec<CutlistItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FromToItem {
    pub wire_id: String,
    /// e.g. "CONN1-1"
    pub from_location: String,
    /// e.g. "CONN2-3"
    pub to_location: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FromToResult {
    pub items: Vec<FromToItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripListItem {
    pub wire_id: String,
    pub strip_length_a: Option<f64>,
    pub terminal_part_number_a: Option<String>,
    pub strip_length_b: Option<f64>,
    pub terminal_part_number_b: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkTubeItem {
    pub text_to_print: String,
    pub quantity: u32,
    pub diameter_mm: f64,
    pub length_mm: u32,
}

/// Groups keyed by part number, in order of first occurrence.
fn group_by_part_number<'a>(parts: impl Iterator<Item = (&'a str, &'a str)>) -> Vec<BomItem> {
    let mut items: Vec<BomItem> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for (part_number, manufacturer) in parts {
        match positions.get(part_number) {
            Some(&pos) => items[pos].quantity += 1,
            None => {
                positions.insert(part_number, items.len());
                items.push(BomItem {
                    part_number: part_number.to_string(),
                    manufacturer: manufacturer.to_string(),
                    quantity: 1,
                });
            }
        }
    }

    items
}

pub fn generate_bom(harness: &Harness) -> BomResult {
    BomResult {
        connectors: group_by_part_number(
            harness
                .connectors()
                .iter()
                .map(|c| (c.part_number.as_str(), c.manufacturer.as_str())),
        ),
        wires: group_by_part_number(
            harness
                .wires()
                .iter()
                .map(|w| (w.part_number.as_str(), w.manufacturer.as_str())),
        ),
    }
}

pub fn generate_cutlist(harness: &Harness) -> CutlistResult {
    CutlistResult {
        items: harness
            .wires()
            .iter()
            .map(|wire| CutlistItem {
                wire_id: wire.logical_id.clone(),
                part_number: wire.part_number.clone(),
                color: wire.color.clone(),
                length: wire.length,
            })
            .collect(),
    }
}

/// One row per fully resolvable connection; incomplete ones are dropped.
pub fn generate_fromto(harness: &Harness) -> FromToResult {
    FromToResult {
        items: harness
            .resolved_connections()
            .map(|resolved| FromToItem {
                wire_id: resolved.wire.logical_id.clone(),
                from_location: resolved.from_location(),
                to_location: resolved.to_location(),
            })
            .collect(),
    }
}

/// Strip lengths and terminals per wire end, for connections with a known wire.
pub fn generate_strip_list(harness: &Harness) -> Vec<StripListItem> {
    harness
        .connections()
        .iter()
        .filter_map(|conn| {
            let wire = harness.wire_of(conn)?;
            Some(StripListItem {
                wire_id: wire.logical_id.clone(),
                strip_length_a: conn.strip_length_a,
                terminal_part_number_a: conn.terminal_part_number_a.clone(),
                strip_length_b: conn.strip_length_b,
                terminal_part_number_b: conn.terminal_part_number_b.clone(),
            })
        })
        .collect()
}

/// One marker per non-empty marking text, side A before side B.
pub fn generate_mark_tube_list(harness: &Harness) -> Vec<MarkTubeItem> {
    harness
        .connections()
        .iter()
        .flat_map(|conn| [conn.marking_text_a.as_deref(), conn.marking_text_b.as_deref()])
        .flatten()
        .filter(|text| !text.is_empty())
        .map(|text| MarkTubeItem {
            text_to_print: text.to_string(),
            quantity: 1,
            diameter_mm: MARK_TUBE_DIAMETER_MM,
            length_mm: MARK_TUBE_LENGTH_MM,
        })
        .collect()
}

/// Render report rows as CSV with a header row.
///
/// `None` values become empty cells.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<String, HarnessGuardError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| HarnessGuardError::Other(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| HarnessGuardError::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionCreate, ConnectorCreate, HarnessCreate, PinCreate, WireCreate};

    fn connector(id: &str, part_number: &str, manufacturer: &str) -> ConnectorCreate {
        ConnectorCreate {
            id: id.to_string(),
            manufacturer: manufacturer.to_string(),
            part_number: part_number.to_string(),
            pins: vec![PinCreate { id: "1".to_string() }, PinCreate { id: "2".to_string() }],
            voltage_rating: None,
            applicable_wire_max_diameter: None,
            is_rohs: Default::default(),
            is_ul: Default::default(),
        }
    }

    fn wire(id: &str, part_number: &str, color: &str, length: f64) -> WireCreate {
        WireCreate {
            id: id.to_string(),
            manufacturer: "Sumitomo".to_string(),
            part_number: part_number.to_string(),
            color: color.to_string(),
            gauge: 26.0,
            length,
            voltage_rating: None,
            outer_diameter: None,
            is_rohs: Default::default(),
            is_ul: Default::default(),
        }
    }

    fn sample() -> Harness {
        HarnessCreate {
            name: "Sample".to_string(),
            connectors: vec![
                connector("CONN1", "PHR-3", "JST"),
                connector("CONN2", "DF13-3S-1.25C", "Hirose"),
                connector("CONN3", "PHR-3", "JST"),
            ],
            wires: vec![
                wire("W1", "UL1007-26-RD", "RD", 120.0),
                wire("W2", "UL1007-26-RD", "RD", 80.5),
                wire("W3", "UL1007-22-BK", "BK", 200.0),
            ],
            connections: vec![
                ConnectionCreate {
                    wire_id: "W1".to_string(),
                    from_connector_id: "CONN1".to_string(),
                    from_pin_id: "1".to_string(),
                    to_connector_id: "CONN2".to_string(),
                    to_pin_id: "2".to_string(),
                    strip_length_a: Some(2.5),
                    terminal_part_number_a: Some("SPH-002T-P0.5S".to_string()),
                    marking_text_a: Some("W1-A".to_string()),
                    marking_text_b: Some("W1-B".to_string()),
                    ..Default::default()
                },
                ConnectionCreate {
                    wire_id: "W3".to_string(),
                    from_connector_id: "CONN3".to_string(),
                    from_pin_id: "2".to_string(),
                    to_connector_id: "CONN1".to_string(),
                    to_pin_id: "2".to_string(),
                    marking_text_b: Some(String::new()),
                    ..Default::default()
                },
            ],
        }
        .build()
        .unwrap()
    }

    #[test]
    fn test_bom_groups_in_first_occurrence_order() {
        let bom = generate_bom(&sample());

        assert_eq!(bom.connectors.len(), 2);
        assert_eq!(bom.connectors[0].part_number, "PHR-3");
        assert_eq!(bom.connectors[0].manufacturer, "JST");
        assert_eq!(bom.connectors[0].quantity, 2);
        assert_eq!(bom.connectors[1].part_number, "DF13-3S-1.25C");
        assert_eq!(bom.connectors[1].quantity, 1);

        assert_eq!(bom.wires.len(), 2);
        assert_eq!(bom.wires[0].part_number, "UL1007-26-RD");
        assert_eq!(bom.wires[0].quantity, 2);
        assert_eq!(bom.quantity_of("UL1007-22-BK"), 1);
    }

    #[test]
    fn test_bom_quantity_matches_instance_count() {
        let harness = sample();
        let bom = generate_bom(&harness);
        for connector in harness.connectors() {
            let count = harness
                .connectors()
                .iter()
                .filter(|c| c.part_number == connector.part_number)
                .count();
            assert_eq!(bom.quantity_of(&connector.part_number), count);
        }
    }

    #[test]
    fn test_cutlist_one_row_per_wire() {
        let cutlist = generate_cutlist(&sample());
        let ids: Vec<_> = cutlist.items.iter().map(|i| i.wire_id.as_str()).collect();
        assert_eq!(ids, vec!["W1", "W2", "W3"]);
        assert_eq!(cutlist.items[1].length, 80.5);
        assert_eq!(cutlist.items[2].color, "BK");
    }

    #[test]
    fn test_fromto_locations() {
        let fromto = generate_fromto(&sample());
        assert_eq!(
            fromto.items,
            vec![
                FromToItem {
                    wire_id: "W1".to_string(),
                    from_location: "CONN1-1".to_string(),
                    to_location: "CONN2-2".to_string(),
                },
                FromToItem {
                    wire_id: "W3".to_string(),
                    from_location: "CONN3-2".to_string(),
                    to_location: "CONN1-2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_harness_reports() {
        let harness = Harness::empty("Empty");
        assert!(generate_bom(&harness).is_empty());
        assert!(generate_cutlist(&harness).items.is_empty());
        assert!(generate_fromto(&harness).items.is_empty());
        assert!(generate_strip_list(&harness).is_empty());
        assert!(generate_mark_tube_list(&harness).is_empty());
    }

    #[test]
    fn test_mark_tube_skips_empty_text() {
        let marks = generate_mark_tube_list(&sample());
        let texts: Vec<_> = marks.iter().map(|m| m.text_to_print.as_str()).collect();
        assert_eq!(texts, vec!["W1-A", "W1-B"]);
        assert_eq!(marks[0].quantity, 1);
        assert_eq!(marks[0].length_mm, 20);
    }

    #[test]
    fn test_strip_list_csv() {
        let csv = to_csv(&generate_strip_list(&sample())).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "wire_id,strip_length_a,terminal_part_number_a,strip_length_b,terminal_part_number_b"
        );
        assert_eq!(lines[1], "W1,2.5,SPH-002T-P0.5S,,");
        assert_eq!(lines[2], "W3,,,,");
    }
}
