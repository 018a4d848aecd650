//! Abstract Syntax Tree types for the netlist format.

use std::collections::HashMap;

/// Name every spelling of the reference node is normalized to.
pub const GROUND_NAME: &str = "0";

/// Complete AST representation of a parsed netlist.
#[derive(Debug, Clone, Default)]
pub struct CircuitAst {
    /// All component instances, in file order
    pub components: Vec<ComponentDef>,
    /// Reference node from `.ground`, if given
    pub ground: Option<String>,
}

impl CircuitAst {
    /// Create a new empty netlist AST.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ground node name, defaulting to `0`.
    pub fn ground_node(&self) -> &str {
        self.ground.as_deref().unwrap_or(GROUND_NAME)
    }
}

/// A component definition from the netlist.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    /// Component type (R, V, W, D)
    pub component_type: ComponentType,
    /// Explicit name; `None` keeps the derived display name
    pub name: Option<String>,
    /// Connected node names
    pub nodes: Vec<String>,
    /// Positional value (ohms, volts, or threshold volts)
    pub value: Option<f64>,
    /// Additional `key=value` parameters
    pub params: HashMap<String, f64>,
    /// Source line number for error reporting
    pub line: usize,
}

impl ComponentDef {
    /// Name used in error messages.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.component_type.prefix().to_string())
    }
}

/// Component types supported by the netlist format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    /// Perfect wire
    Wire,
    /// Resistor
    Resistor,
    /// Voltage Source
    VoltageSource,
    /// Threshold element (LED)
    ThresholdElement,
}

impl ComponentType {
    /// Parse a component type from its netlist prefix.
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix.to_ascii_uppercase() {
            'W' => Some(Self::Wire),
            'R' => Some(Self::Resistor),
            'V' => Some(Self::VoltageSource),
            'D' => Some(Self::ThresholdElement),
            _ => None,
        }
    }

    /// Parse a component type from a keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "WIRE" => Some(Self::Wire),
            "LED" => Some(Self::ThresholdElement),
            _ => None,
        }
    }

    /// Single-letter prefix for this type.
    pub fn prefix(&self) -> char {
        match self {
            Self::Wire => 'W',
            Self::Resistor => 'R',
            Self::VoltageSource => 'V',
            Self::ThresholdElement => 'D',
        }
    }

    /// Get the expected number of nodes for this component type.
    pub fn expected_node_count(&self) -> usize {
        2
    }

    /// Whether the type needs a positional value.
    pub fn requires_value(&self) -> bool {
        matches!(self, Self::Resistor | Self::VoltageSource)
    }
}
