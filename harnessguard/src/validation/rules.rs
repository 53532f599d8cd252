//! Default harness rules
//!
//! Unknown spec values are only ever reported by [`DataQualityRule`]; every
//! other rule skips a comparison it cannot evaluate.

use crate::catalog::{connector_series, CatalogSpec};
use crate::model::Connection;
use crate::validation::{ComponentType, ErrorType, Rule, RuleContext, ValidationError};

pub struct DataQualityRule;

impl Rule for DataQualityRule {
    fn id(&self) -> &str {
        "data_quality"
    }

    fn name(&self) -> &str {
        "Missing technical specifications"
    }

    fn description(&self) -> &str {
        "Flags connectors and wires with an unknown voltage rating, diameter, RoHS or UL status"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for connector in ctx.harness.connectors() {
            let missing = connector.missing_specs();
            if !missing.is_empty() {
                errors.push(ValidationError::new(
                    connector.id,
                    ComponentType::Connector,
                    ErrorType::DataQualityError,
                    format!(
                        "Connector {} ({}) has missing technical specifications: {}.",
                        connector.logical_id,
                        connector.part_number,
                        missing.join(", ")
                    ),
                ));
            }
        }

        for wire in ctx.harness.wires() {
            let missing = wire.missing_specs();
            if !missing.is_empty() {
                errors.push(ValidationError::new(
                    wire.id,
                    ComponentType::Wire,
                    ErrorType::DataQualityError,
                    format!(
                        "Wire {} ({}) has missing technical specifications: {}.",
                        wire.logical_id,
                        wire.part_number,
                        missing.join(", ")
                    ),
                ));
            }
        }

        errors
    }
}

pub struct ElectricalRule;

impl Rule for ElectricalRule {
    fn id(&self) -> &str {
        "electrical"
    }

    fn name(&self) -> &str {
        "Voltage rating"
    }

    fn description(&self) -> &str {
        "Flags connectors and wires rated below the project system voltage"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let Some(system_voltage) = ctx.settings.effective_system_voltage() else {
            return Vec::new();
        };

        let mut errors = Vec::new();

        for connector in ctx.harness.connectors() {
            if let Some(rating) = connector.voltage_rating.filter(|r| *r < system_voltage) {
                errors.push(ValidationError::new(
                    connector.id,
                    ComponentType::Connector,
                    ErrorType::ElectricalError,
                    format!(
                        "Connector {} voltage rating ({}V) is less than system voltage ({}V).",
                        connector.logical_id, rating, system_voltage
                    ),
                ));
            }
        }

        for wire in ctx.harness.wires() {
            if let Some(rating) = wire.voltage_rating.filter(|r| *r < system_voltage) {
                errors.push(ValidationError::new(
                    wire.id,
                    ComponentType::Wire,
                    ErrorType::ElectricalError,
                    format!(
                        "Wire {} voltage rating ({}V) is less than system voltage ({}V).",
                        wire.logical_id, rating, system_voltage
                    ),
                ));
            }
        }

        errors
    }
}

/// RoHS only. `require_ul` has no rule.
pub struct ComplianceRule;

impl Rule for ComplianceRule {
    fn id(&self) -> &str {
        "compliance"
    }

    fn name(&self) -> &str {
        "RoHS compliance"
    }

    fn description(&self) -> &str {
        "Flags parts known to be non-RoHS when the project requires RoHS"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        if !ctx.settings.require_rohs {
            return Vec::new();
        }

        let connectors = ctx.harness.connectors().iter().map(|c| {
            (c.id, ComponentType::Connector, c.logical_id.as_str(), c.part_number.as_str(), c.is_rohs)
        });
        let wires = ctx.harness.wires().iter().map(|w| {
            (w.id, ComponentType::Wire, w.logical_id.as_str(), w.part_number.as_str(), w.is_rohs)
        });

        connectors
            .chain(wires)
            .filter(|(_, _, _, _, rohs)| rohs.is_non_compliant())
            .map(|(id, component_type, logical_id, part_number, _)| {
                ValidationError::new(
                    id,
                    component_type,
                    ErrorType::ComplianceError,
                    format!(
                        "Component {} ({}) is not RoHS compliant.",
                        logical_id, part_number
                    ),
                )
            })
            .collect()
    }
}

/// Compares the wire against the from-side connector only.
pub struct PhysicalFitRule;

impl Rule for PhysicalFitRule {
    fn id(&self) -> &str {
        "physical"
    }

    fn name(&self) -> &str {
        "Wire diameter fit"
    }

    fn description(&self) -> &str {
        "Flags connections whose wire is thicker than the from-side connector accepts"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        for connection in ctx.harness.connections() {
            let (Some(wire), Some(from_connector)) = (
                ctx.harness.wire_of(connection),
                ctx.harness.from_connector(connection),
            ) else {
                continue;
            };

            if let (Some(diameter), Some(max_diameter)) =
                (wire.outer_diameter, from_connector.applicable_wire_max_diameter)
            {
                if diameter > max_diameter {
                    errors.push(ValidationError::new(
                        connection.id,
                        ComponentType::Connection,
                        ErrorType::PhysicalError,
                        format!(
                            "Wire {} ({}mm) exceeds max diameter for connector {} ({}mm).",
                            wire.logical_id, diameter, from_connector.logical_id, max_diameter
                        ),
                    ));
                }
            }
        }

        errors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

impl Side {
    fn label(&self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }

    fn terminal<'a>(&self, connection: &'a Connection) -> Option<&'a str> {
        match self {
            Side::A => connection.terminal_part_number_a.as_deref(),
            Side::B => connection.terminal_part_number_b.as_deref(),
        }
    }
}

/// Terminal gauge range and connector series checks, side A then side B.
pub struct TerminalCompatibilityRule;

impl TerminalCompatibilityRule {
    fn check_side(
        &self,
        ctx: &RuleContext<'_>,
        connection: &Connection,
        side: Side,
        errors: &mut Vec<ValidationError>,
    ) {
        let Some(terminal_pn) = side.terminal(connection).filter(|pn| !pn.is_empty()) else {
            return;
        };

        let terminal = match ctx.catalog.get_specification(terminal_pn) {
            Some(CatalogSpec::Terminal(spec)) => spec,
            Some(other) => {
                errors.push(ValidationError::new(
                    connection.id,
                    ComponentType::Connection,
                    ErrorType::DataQualityError,
                    format!(
                        "Terminal {} (side {}) is listed in the catalog as a {}, not a terminal.",
                        terminal_pn,
                        side.label(),
                        other.kind()
                    ),
                ));
                return;
            }
            None => {
                errors.push(ValidationError::new(
                    connection.id,
                    ComponentType::Connection,
                    ErrorType::DataQualityError,
                    format!(
                        "Terminal {} (side {}) not found in catalog.",
                        terminal_pn,
                        side.label()
                    ),
                ));
                return;
            }
        };

        if let Some(wire) = ctx.harness.wire_of(connection) {
            if !terminal.accepts_gauge(wire.gauge) {
                let message = match terminal.gauge_range() {
                    Some((min, max)) => format!(
                        "Wire gauge AWG{} of wire {} is not compatible with terminal {} (side {}, AWG {}-{}).",
                        wire.gauge,
                        wire.logical_id,
                        terminal_pn,
                        side.label(),
                        min,
                        max
                    ),
                    None => format!(
                        "Wire gauge AWG{} of wire {} cannot be verified: terminal {} (side {}) defines no wire gauge range.",
                        wire.gauge,
                        wire.logical_id,
                        terminal_pn,
                        side.label()
                    ),
                };
                errors.push(ValidationError::new(
                    connection.id,
                    ComponentType::Connection,
                    ErrorType::CompatibilityError,
                    message,
                ));
            }
        }

        let connector = match side {
            Side::A => ctx.harness.from_connector(connection),
            Side::B => ctx.harness.to_connector(connection),
        };
        if let Some(connector) = connector {
            let series = connector_series(&connector.part_number);
            if !terminal.accepts_series(series) {
                errors.push(ValidationError::new(
                    connection.id,
                    ComponentType::Connection,
                    ErrorType::CompatibilityError,
                    format!(
                        "Terminal {} (side {}) is not compatible with connector series {} (compatible: {}).",
                        terminal_pn,
                        side.label(),
                        series,
                        terminal.compatible_connector_series.join(", ")
                    ),
                ));
            }
        }
    }
}

impl Rule for TerminalCompatibilityRule {
    fn id(&self) -> &str {
        "terminal"
    }

    fn name(&self) -> &str {
        "Terminal compatibility"
    }

    fn description(&self) -> &str {
        "Checks each crimp terminal against the catalog, the wire gauge and the connector series"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for connection in ctx.harness.connections() {
            self.check_side(ctx, connection, Side::A, &mut errors);
            self.check_side(ctx, connection, Side::B, &mut errors);
        }
        errors
    }
}
