//! Netlist parser for text circuit descriptions.
//!
//! This module provides a SPICE-inspired, line-oriented format for
//! describing DC resistive networks with named nodes.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { line }
//! line        = comment | directive | component | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = ".ground" node
//! component   = (type_name | keyword name) node node [value] { param '=' value }
//!
//! type_name   = ("R" | "V" | "W" | "D") { letter | digit | '_' }
//! keyword     = "LED" | "WIRE"
//! node        = identifier | "0" | "GND"
//! value       = number [unit_suffix]
//!
//! number      = ['-'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! identifier  = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! # Component Types
//!
//! | Type | Description | Syntax |
//! |------|-------------|--------|
//! | R | Resistor | `R<name> <a> <b> <ohms>` |
//! | V | Voltage Source | `V<name> <n+> <n-> <volts>` |
//! | W | Wire | `W<name> <a> <b>` |
//! | D | Threshold element | `D<name> <anode> <cathode> [vth=..] [ron=..] [roff=..]` |
//!
//! A bare type letter (`R`, `V`, `W`, `D`) leaves the display name derived
//! from the component's kind and value. The keyword forms always take a
//! name: `LED <name> <anode> <cathode> ...` and `WIRE <name> <a> <b>`.
//!
//! # Example
//!
//! ```text
//! # LED with series resistor
//! .ground 0
//!
//! V1  a  0  5
//! R1  a  b  100
//! D1  b  0  vth=1.6
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a netlist string into an AST.
pub fn parse(input: &str) -> Result<CircuitAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer);
    parser.parse()
}

/// Parse a netlist file.
pub fn parse_file(path: &std::path::Path) -> Result<CircuitAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::GridError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
