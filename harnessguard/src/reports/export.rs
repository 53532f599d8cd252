//! Procurement export
//!
//! The only path from a harness to a purchasing document. It runs the full
//! validation pass first and refuses to produce anything while findings
//! remain.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::CatalogLookup;
use crate::core::HarnessGuardError;
use crate::model::{Harness, ProjectSettings};
use crate::reports::generate_bom;
use crate::validation::{validate, ValidationError};

pub const PROCUREMENT_CSV_HEADER: [&str; 3] = ["part_number", "manufacturer", "quantity"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcurementRow {
    pub part_number: String,
    pub manufacturer: String,
    pub quantity: usize,
}

/// Purchasing rows: connectors first, then wires.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProcurementExport {
    pub harness_name: String,
    pub rows: Vec<ProcurementRow>,
}

impl ProcurementExport {
    pub fn to_csv(&self) -> Result<String, HarnessGuardError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(PROCUREMENT_CSV_HEADER)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| HarnessGuardError::Other(format!("CSV flush failed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| HarnessGuardError::Other(e.to_string()))
    }
}

/// Export refused because validation produced findings.
#[derive(Debug, Clone, Error)]
#[error("procurement export rejected: {} validation error(s)", .errors.len())]
pub struct ExportRejected {
    pub errors: Vec<ValidationError>,
}

pub fn export_procurement(
    harness: &Harness,
    settings: &ProjectSettings,
    catalog: &dyn CatalogLookup,
) -> Result<ProcurementExport, ExportRejected> {
    let errors = validate(harness, settings, catalog);
    if !errors.is_empty() {
        tracing::info!(
            "Procurement export of '{}' rejected with {} findings",
            harness.name(),
            errors.len()
        );
        return Err(ExportRejected { errors });
    }

    let bom = generate_bom(harness);
    let rows = bom
        .connectors
        .into_iter()
        .chain(bom.wires)
        .map(|item| ProcurementRow {
            part_number: item.part_number,
            manufacturer: item.manufacturer,
            quantity: item.quantity,
        })
        .collect();

    Ok(ProcurementExport {
        harness_name: harness.name().to_string(),
        rows,
    })
}
