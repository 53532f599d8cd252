//! HarnessGuard - wire harness validation and manufacturing report library
//!
//! This library models a wire harness (connectors, pins, wires and the
//! connections between them), derives manufacturing reports from it, and
//! validates it against project requirements and a component catalog
//! before anything is sent to procurement.
//!
//! # Quick Start
//!
//! ```no_run
//! use harnessguard::{HarnessGuardCore, ValidationOptions};
//! use std::path::Path;
//!
//! let settings = HarnessGuardCore::load_settings(None).unwrap();
//! let result = HarnessGuardCore::validate_file(
//!     Path::new("harness.json"),
//!     &settings,
//!     &ValidationOptions::default(),
//! ).unwrap();
//!
//! for error in &result.errors {
//!     println!("{}: {}", error.error_type, error.message);
//! }
//! ```
//!
//! # Features
//!
//! - **Harness model**: O(1) resolution of a connection's wire, pins and connectors
//! - **Reports**: BOM, cut list, from-to list, strip list, mark tube list
//! - **Validation**: data quality, voltage, RoHS, diameter fit, terminal compatibility
//! - **Procurement gate**: CSV export only for harnesses without findings

pub mod catalog;
pub mod core;
pub mod model;
pub mod reports;
pub mod store;
pub mod validation;

// Re-export main types
pub use crate::core::{
    HarnessGuardCore, HarnessGuardError, LoadedHarness, ValidationOptions, ValidationResult,
    ValidationStats,
};
pub use catalog::{
    connector_series, enrich_request, CatalogLookup, CatalogSpec, EnrichmentSummary,
    InMemoryCatalog,
};
pub use model::{ComplianceStatus, Harness, HarnessCreate, ProjectSettings};
pub use reports::{
    export_procurement, generate_bom, generate_cutlist, generate_fromto,
    generate_mark_tube_list, generate_strip_list, ExportRejected, ProcurementExport,
};
pub use store::HarnessStore;
pub use validation::{
    validate, ComponentType, ErrorType, Rule, RuleContext, RulesEngine, ValidationError,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        validate, CatalogLookup, ErrorType, Harness, HarnessCreate, HarnessGuardCore,
        HarnessGuardError, InMemoryCatalog, ProjectSettings, ValidationError, ValidationOptions,
        ValidationResult,
    };
}
