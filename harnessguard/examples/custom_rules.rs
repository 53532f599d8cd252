//! Example: adding a caller-defined rule to the RulesEngine.
//! The default rules do not enforce `require_ul`; this adds a UL check.
//! Run with: cargo run --example custom_rules [path/to/harness.json]

use anyhow::Context;
use harnessguard::validation::{ComponentType, ErrorType, Rule, RuleContext, ValidationError};
use harnessguard::{HarnessGuardCore, ProjectSettings, RulesEngine, ValidationOptions};
use std::path::Path;
use std::sync::Arc;

struct UlListingRule;

impl Rule for UlListingRule {
    fn id(&self) -> &str {
        "ul_listing"
    }

    fn name(&self) -> &str {
        "UL listing"
    }

    fn description(&self) -> &str {
        "Flags parts known not to be UL listed when the project requires UL"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        if !ctx.settings.require_ul {
            return Vec::new();
        }
        let connectors = ctx
            .harness
            .connectors()
            .iter()
            .filter(|c| c.is_ul.is_non_compliant())
            .map(|c| (c.id, ComponentType::Connector, &c.logical_id));
        let wires = ctx
            .harness
            .wires()
            .iter()
            .filter(|w| w.is_ul.is_non_compliant())
            .map(|w| (w.id, ComponentType::Wire, &w.logical_id));

        connectors
            .chain(wires)
            .map(|(id, component_type, logical_id)| {
                ValidationError::new(
                    id,
                    component_type,
                    ErrorType::ComplianceError,
                    format!("Component {} is not UL listed.", logical_id),
                )
            })
            .collect()
    }
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/valid_harness.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example custom_rules [path/to/harness.json]");
        std::process::exit(1);
    }

    let catalog = HarnessGuardCore::load_catalog(&ValidationOptions::default())?;
    let loaded = HarnessGuardCore::load_harness(path, &catalog)
        .with_context(|| format!("loading {}", path.display()))?;
    let settings = ProjectSettings {
        system_voltage: Some(24.0),
        require_rohs: true,
        require_ul: true,
    };

    let mut engine = RulesEngine::with_default_rules();
    engine.add_rule(Arc::new(UlListingRule));

    let ctx = RuleContext {
        harness: &loaded.harness,
        settings: &settings,
        catalog: &catalog,
    };
    let errors = engine.analyze(&ctx);

    println!("Custom validation found {} findings for {}", errors.len(), path.display());
    for error in &errors {
        println!("  [{}] {} {}: {}", error.error_type, error.component_type, error.component_id, error.message);
    }

    if !errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
