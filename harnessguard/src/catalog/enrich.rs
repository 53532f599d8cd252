//! Catalog enrichment of harness requests
//!
//! Fills unknown technical fields of connectors and wires from the catalog
//! before a harness is built. Known values are never overwritten.

use serde::Serialize;

use crate::catalog::{CatalogLookup, ConnectorSpec, WireSpec};
use crate::model::{ComplianceStatus, ConnectorCreate, HarnessCreate, PinCreate, WireCreate};

/// What an enrichment pass changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichmentSummary {
    pub connectors_enriched: usize,
    pub wires_enriched: usize,
    pub pins_created: usize,
    /// Part numbers with no catalog record of the matching kind.
    pub unknown_part_numbers: Vec<String>,
}

pub fn enrich_request(request: &mut HarnessCreate, catalog: &dyn CatalogLookup) -> EnrichmentSummary {
    let mut summary = EnrichmentSummary::default();

    for connector in &mut request.connectors {
        let spec = catalog.get_specification(&connector.part_number);
        match spec.as_ref().and_then(|s| s.as_connector()) {
            Some(spec) => {
                if apply_connector_spec(connector, spec, &mut summary.pins_created) {
                    summary.connectors_enriched += 1;
                }
            }
            None => note_unknown(&mut summary, &connector.part_number),
        }
    }

    for wire in &mut request.wires {
        let spec = catalog.get_specification(&wire.part_number);
        match spec.as_ref().and_then(|s| s.as_wire()) {
            Some(spec) => {
                if apply_wire_spec(wire, spec) {
                    summary.wires_enriched += 1;
                }
            }
            None => note_unknown(&mut summary, &wire.part_number),
        }
    }

    tracing::debug!(
        "Enriched {} connectors and {} wires ({} unknown part numbers)",
        summary.connectors_enriched,
        summary.wires_enriched,
        summary.unknown_part_numbers.len()
    );

    summary
}

fn note_unknown(summary: &mut EnrichmentSummary, part_number: &str) {
    tracing::debug!("No catalog record for part number {}", part_number);
    if !summary.unknown_part_numbers.iter().any(|p| p == part_number) {
        summary.unknown_part_numbers.push(part_number.to_string());
    }
}

fn fill<T: Copy>(slot: &mut Option<T>, value: Option<T>) -> bool {
    if slot.is_none() && value.is_some() {
        *slot = value;
        true
    } else {
        false
    }
}

fn fill_status(slot: &mut ComplianceStatus, value: ComplianceStatus) -> bool {
    if slot.is_unknown() && !value.is_unknown() {
        *slot = value;
        true
    } else {
        false
    }
}

fn apply_connector_spec(connector: &mut ConnectorCreate, spec: &ConnectorSpec, pins_created: &mut usize) -> bool {
    let mut changed = fill(&mut connector.voltage_rating, spec.voltage_rating);
    changed |= fill(
        &mut connector.applicable_wire_max_diameter,
        spec.applicable_wire_max_diameter,
    );
    changed |= fill_status(&mut connector.is_rohs, spec.is_rohs);
    changed |= fill_status(&mut connector.is_ul, spec.is_ul);

    if connector.pins.is_empty() {
        if let Some(count) = spec.pin_count.filter(|&n| n > 0) {
            connector.pins = (1..=count)
                .map(|n| PinCreate { id: n.to_string() })
                .collect();
            *pins_created += count as usize;
            changed = true;
        }
    }

    changed
}

fn apply_wire_spec(wire: &mut WireCreate, spec: &WireSpec) -> bool {
    let mut changed = fill(&mut wire.voltage_rating, spec.voltage_rating);
    changed |= fill(&mut wire.outer_diameter, spec.outer_diameter);
    changed |= fill_status(&mut wire.is_rohs, spec.is_rohs);
    changed |= fill_status(&mut wire.is_ul, spec.is_ul);
    changed
}
