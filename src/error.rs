//! Error types for the Ohmgrid analyzer.
//!
//! This module provides a unified error type [`GridError`] that covers
//! all error conditions that can occur during netlist parsing, component
//! placement, and DC solving.

use thiserror::Error;

/// Result type alias using [`GridError`].
pub type Result<T> = std::result::Result<T, GridError>;

/// Unified error type for all Ohmgrid operations.
#[derive(Error, Debug)]
pub enum GridError {
    // ============ Netlist Parsing Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Unknown component type
    #[error("Unknown component type '{component_type}' at line {line}")]
    UnknownComponentType { component_type: String, line: usize },

    // ============ Circuit Errors ============
    /// Component endpoint outside the placement grid
    #[error("Component '{component}' endpoint ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        component: String,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    /// No component with the given name
    #[error("Component '{name}' not found in circuit")]
    ComponentNotFound { name: String },

    // ============ Solve Errors ============
    /// Ground node is not an endpoint of any component
    #[error("Ground node '{node}' is not connected to any component")]
    MissingGround { node: String },

    /// The assembled system is singular
    #[error("{}", singular_message(.floating))]
    SingularCircuit { floating: Vec<String> },

    /// Threshold states kept changing until the iteration cap (strict mode only)
    #[error("Threshold element states did not settle after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },

    // ============ I/O Errors ============
    /// Error reading netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error rendering a solution as JSON
    #[cfg(feature = "cli")]
    #[error("Failed to write JSON output: {0}")]
    JsonError(#[from] serde_json::Error),

    // ============ WASM Errors ============
    /// WASM-specific error
    #[cfg(feature = "wasm")]
    #[error("WASM error: {message}")]
    WasmError { message: String },
}

fn singular_message(floating: &[String]) -> String {
    if floating.is_empty() {
        "Singular circuit - check for shorted or looped voltage sources".to_string()
    } else {
        format!(
            "Singular circuit - no path to ground from node(s) {}",
            floating.join(", ")
        )
    }
}

impl GridError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        component: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            component: component.into(),
            param: param.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singular_message_lists_floating_nodes() {
        let err = GridError::SingularCircuit {
            floating: vec!["x".to_string(), "y".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Singular circuit - no path to ground from node(s) x, y"
        );

        let err = GridError::SingularCircuit { floating: vec![] };
        assert!(err.to_string().contains("voltage sources"));
    }
}
