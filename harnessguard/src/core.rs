//! File-level facade shared by the CLI and library callers.
//! Loads harness requests, settings and catalogs from disk, then runs
//! enrichment, validation and export over the result.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

use crate::catalog::{enrich_request, load_catalog_from_directory, EnrichmentSummary, InMemoryCatalog};
use crate::model::{Harness, HarnessCreate, ProjectSettings};
use crate::reports::{export_procurement, ExportRejected, ProcurementExport};
use crate::validation::{validate, ErrorType, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum HarnessGuardError {
    #[error("Invalid harness data: {0}")]
    InvalidHarnessData(String),
    #[error("Harness not found: {0}")]
    HarnessNotFound(Uuid),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error(transparent)]
    ExportRejected(#[from] ExportRejected),
    #[error("{0}")]
    Other(String),
}

/// Options for file-based runs (CLI or library).
#[derive(Clone, Debug)]
pub struct ValidationOptions {
    /// Enrich from, and check terminals against, the catalog.
    pub use_catalog: bool,
    /// Extra JSON catalog files that override built-in entries.
    pub catalog_dir: Option<PathBuf>,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            use_catalog: true,
            catalog_dir: None,
        }
    }
}

/// Per-file validation result with findings and counts.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub file: PathBuf,
    pub harness_name: String,
    pub errors: Vec<ValidationError>,
    pub stats: ValidationStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationStats {
    pub data_quality: usize,
    pub electrical: usize,
    pub compliance: usize,
    pub physical: usize,
    pub compatibility: usize,
}

impl ValidationStats {
    pub fn from_errors(errors: &[ValidationError]) -> Self {
        let mut stats = Self::default();
        for e in errors {
            match e.error_type {
                ErrorType::DataQualityError => stats.data_quality += 1,
                ErrorType::ElectricalError => stats.electrical += 1,
                ErrorType::ComplianceError => stats.compliance += 1,
                ErrorType::PhysicalError => stats.physical += 1,
                ErrorType::CompatibilityError => stats.compatibility += 1,
            }
        }
        stats
    }

    pub fn count(&self, error_type: ErrorType) -> usize {
        match error_type {
            ErrorType::DataQualityError => self.data_quality,
            ErrorType::ElectricalError => self.electrical,
            ErrorType::ComplianceError => self.compliance,
            ErrorType::PhysicalError => self.physical,
            ErrorType::CompatibilityError => self.compatibility,
        }
    }

    pub fn total(&self) -> usize {
        self.data_quality + self.electrical + self.compliance + self.physical + self.compatibility
    }
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has(&self, error_type: ErrorType) -> bool {
        self.stats.count(error_type) > 0
    }

    pub fn total_errors(&self) -> usize {
        self.stats.total()
    }
}

/// A harness loaded from disk, plus what catalog enrichment changed.
#[derive(Debug, Clone)]
pub struct LoadedHarness {
    pub harness: Harness,
    pub enrichment: EnrichmentSummary,
}

/// Core file API used by the CLI.
pub struct HarnessGuardCore;

impl HarnessGuardCore {
    /// Read a harness creation request from a JSON file.
    pub fn load_request(path: &Path) -> Result<HarnessCreate, HarnessGuardError> {
        let content = fs::read_to_string(path)?;
        let request = serde_json::from_str(&content)?;
        Ok(request)
    }

    /// Read project settings; `None` gives the defaults.
    pub fn load_settings(path: Option<&Path>) -> Result<ProjectSettings, HarnessGuardError> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&content)?)
            }
            None => Ok(ProjectSettings::default()),
        }
    }

    /// Built-in catalog plus `catalog_dir` overrides, or an empty catalog
    /// when the catalog is disabled.
    pub fn load_catalog(options: &ValidationOptions) -> Result<InMemoryCatalog, HarnessGuardError> {
        if !options.use_catalog {
            return Ok(InMemoryCatalog::new());
        }

        let mut catalog = InMemoryCatalog::builtin();
        if let Some(dir) = &options.catalog_dir {
            let (loaded, failures) = load_catalog_from_directory(&mut catalog, dir)?;
            tracing::info!(
                "Loaded {} catalog entries from {} ({} files skipped)",
                loaded,
                dir.display(),
                failures.len()
            );
        }
        Ok(catalog)
    }

    /// Load, enrich and build a harness.
    pub fn load_harness(
        path: &Path,
        catalog: &InMemoryCatalog,
    ) -> Result<LoadedHarness, HarnessGuardError> {
        let mut request = Self::load_request(path)?;
        let enrichment = enrich_request(&mut request, catalog);
        let harness = request.build()?;
        Ok(LoadedHarness { harness, enrichment })
    }

    /// Validate a single harness file.
    pub fn validate_file(
        path: &Path,
        settings: &ProjectSettings,
        options: &ValidationOptions,
    ) -> Result<ValidationResult, HarnessGuardError> {
        let catalog = Self::load_catalog(options)?;
        let loaded = Self::load_harness(path, &catalog)?;
        let errors = validate(&loaded.harness, settings, &catalog);
        let stats = ValidationStats::from_errors(&errors);

        tracing::info!(
            "Validated {} ({} findings)",
            path.display(),
            errors.len()
        );

        Ok(ValidationResult {
            file: path.to_path_buf(),
            harness_name: loaded.harness.name().to_string(),
            errors,
            stats,
        })
    }

    /// Produce the procurement export for a harness file. Validation
    /// findings come back as [`HarnessGuardError::ExportRejected`].
    pub fn export_procurement_file(
        path: &Path,
        settings: &ProjectSettings,
        options: &ValidationOptions,
    ) -> Result<ProcurementExport, HarnessGuardError> {
        let catalog = Self::load_catalog(options)?;
        let loaded = Self::load_harness(path, &catalog)?;
        Ok(export_procurement(&loaded.harness, settings, &catalog)?)
    }
}
