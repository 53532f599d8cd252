//! Harness Validation Engine
//!
//! A single synchronous pass of ordered rules over one harness snapshot.
//! Every rule always runs; findings are returned as data, never raised.
//!
//! Default rule order:
//! 1. `data_quality`     - unknown technical specifications
//! 2. `electrical`       - voltage rating below the system voltage
//! 3. `compliance`       - known non-RoHS parts when RoHS is required
//! 4. `physical`         - wire too thick for the from-side connector
//! 5. `terminal`         - terminal gauge range and connector series

pub mod rules;

pub use rules::{ComplianceRule, DataQualityRule, ElectricalRule, PhysicalFitRule, TerminalCompatibilityRule};

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CatalogLookup;
use crate::model::{Harness, ProjectSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    Connector,
    Wire,
    Connection,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentType::Connector => "Connector",
            ComponentType::Wire => "Wire",
            ComponentType::Connection => "Connection",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    DataQualityError,
    ElectricalError,
    ComplianceError,
    PhysicalError,
    CompatibilityError,
}

impl ErrorType {
    pub const ALL: [ErrorType; 5] = [
        ErrorType::DataQualityError,
        ErrorType::ElectricalError,
        ErrorType::ComplianceError,
        ErrorType::PhysicalError,
        ErrorType::CompatibilityError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DataQualityError => "DataQualityError",
            ErrorType::ElectricalError => "ElectricalError",
            ErrorType::ComplianceError => "ComplianceError",
            ErrorType::PhysicalError => "PhysicalError",
            ErrorType::CompatibilityError => "CompatibilityError",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding. Field order is the serialised order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub component_id: String,
    pub component_type: ComponentType,
    pub message: String,
    pub error_type: ErrorType,
}

impl ValidationError {
    pub fn new(
        component_id: Uuid,
        component_type: ComponentType,
        error_type: ErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            component_id: component_id.to_string(),
            component_type,
            message: message.into(),
            error_type,
        }
    }
}

/// Everything a rule may read. Nothing in it is mutated during a pass.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub harness: &'a Harness,
    pub settings: &'a ProjectSettings,
    pub catalog: &'a dyn CatalogLookup,
}

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError>;
}

pub struct RulesEngine {
    rules: Vec<Arc<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Arc::new(DataQualityRule));
        engine.add_rule(Arc::new(ElectricalRule));
        engine.add_rule(Arc::new(ComplianceRule));
        engine.add_rule(Arc::new(PhysicalFitRule));
        engine.add_rule(Arc::new(TerminalCompatibilityRule));
        engine
    }

    /// Append a rule; it runs after the ones already registered.
    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn analyze(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for rule in &self.rules {
            let found = rule.check(ctx);
            tracing::debug!("Rule {} produced {} findings", rule.id(), found.len());
            errors.extend(found);
        }
        errors
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Run the default rule set over one harness.
pub fn validate(
    harness: &Harness,
    settings: &ProjectSettings,
    catalog: &dyn CatalogLookup,
) -> Vec<ValidationError> {
    let ctx = RuleContext {
        harness,
        settings,
        catalog,
    };
    RulesEngine::with_default_rules().analyze(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;

    #[test]
    fn test_default_rule_order() {
        let engine = RulesEngine::with_default_rules();
        let ids: Vec<_> = engine.rules().map(|r| r.id().to_string()).collect();
        assert_eq!(
            ids,
            vec!["data_quality", "electrical", "compliance", "physical", "terminal"]
        );
    }

    #[test]
    fn test_empty_harness_has_no_findings() {
        let settings = ProjectSettings {
            system_voltage: Some(48.0),
            require_rohs: true,
            require_ul: true,
        };
        let errors = validate(&Harness::empty("Empty"), &settings, &InMemoryCatalog::builtin());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_validation_error_serialised_field_order() {
        let error = ValidationError {
            component_id: "abc".to_string(),
            component_type: ComponentType::Connection,
            message: "msg".to_string(),
            error_type: ErrorType::PhysicalError,
        };
        assert_eq!(
            serde_json::to_string(&error).unwrap(),
            r#"{"component_id":"abc","component_type":"Connection","message":"msg","error_type":"PhysicalError"}"#
        );
    }

    struct AlwaysFlag;

    impl Rule for AlwaysFlag {
        fn id(&self) -> &str {
            "always"
        }
        fn name(&self) -> &str {
            "Always"
        }
        fn description(&self) -> &str {
            "Flags every connector"
        }
        fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
            ctx.harness
                .connectors()
                .iter()
                .map(|c| {
                    ValidationError::new(c.id, ComponentType::Connector, ErrorType::ComplianceError, "flag")
                })
                .collect()
        }
    }

    #[test]
    fn test_custom_rule_on_empty_engine() {
        let mut engine = RulesEngine::new();
        engine.add_rule(Arc::new(AlwaysFlag));
        let harness = crate::model::HarnessCreate {
            name: "H".to_string(),
            connectors: vec![crate::model::ConnectorCreate {
                id: "C1".to_string(),
                manufacturer: "X".to_string(),
                part_number: "X-1".to_string(),
                pins: vec![],
                voltage_rating: None,
                applicable_wire_max_diameter: None,
                is_rohs: Default::default(),
                is_ul: Default::default(),
            }],
            ..Default::default()
        }
        .build()
        .unwrap();
        let settings = ProjectSettings::default();
        let catalog = InMemoryCatalog::new();
        let ctx = RuleContext {
            harness: &harness,
            settings: &settings,
            catalog: &catalog,
        };

        let errors = engine.analyze(&ctx);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "flag");
    }
}
