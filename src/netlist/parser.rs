//! Parser for the netlist format.

use std::collections::HashMap;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{GridError, Result};

/// Parser for netlists.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            current: Token {
                kind: TokenKind::Newline,
                text: String::new(),
                line: 1,
                column: 1,
            },
        }
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<CircuitAst> {
        let mut ast = CircuitAst::new();
        self.advance()?;

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.components.push(component);
                }
                _ => {
                    return Err(GridError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            match self.current.kind {
                TokenKind::Newline => self.advance()?,
                TokenKind::Eof => {}
                _ => {
                    return Err(GridError::parse(
                        self.current.line,
                        format!("unexpected trailing token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn parse_directive(&mut self, ast: &mut CircuitAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".ground" => {
                let node = self.parse_node().ok_or_else(|| {
                    GridError::parse(line, ".ground requires a node name")
                })?;
                self.advance()?;
                if ast.ground.is_some() {
                    return Err(GridError::parse(line, "duplicate .ground directive"));
                }
                ast.ground = Some(node);
            }
            _ => {
                return Err(GridError::parse(
                    line,
                    format!("unknown directive: {}", directive),
                ));
            }
        }

        Ok(())
    }

    /// Interpret the current token as a node name, normalizing ground aliases.
    fn parse_node(&self) -> Option<String> {
        match self.current.kind {
            TokenKind::Identifier | TokenKind::Number => {
                let text = &self.current.text;
                if text == GROUND_NAME || text.eq_ignore_ascii_case("GND") {
                    Some(GROUND_NAME.to_string())
                } else if self.current.kind == TokenKind::Number {
                    // Plain integers are valid node names
                    text.chars().all(|c| c.is_ascii_digit()).then(|| text.clone())
                } else {
                    Some(text.clone())
                }
            }
            _ => None,
        }
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let first_token = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        // Keywords first, so "LED" is not read as a component named "ED"
        let keyword = ComponentType::from_keyword(&first_token).map(|_| first_token.to_uppercase());
        let (component_type, name) = if let Some(ct) = ComponentType::from_keyword(&first_token) {
            // For keyword-based types the NEXT token is the name
            if self.current.kind != TokenKind::Identifier {
                return Err(GridError::parse(
                    line,
                    format!("{} requires a component name", first_token),
                ));
            }
            let name = self.current.text.clone();
            self.advance()?;
            (ct, Some(name))
        } else if first_token.to_uppercase().starts_with("LED") {
            (ComponentType::ThresholdElement, Some(first_token))
        } else {
            let first_char = first_token.chars().next().unwrap_or('?');
            let ct = ComponentType::from_prefix(first_char).ok_or_else(|| {
                GridError::UnknownComponentType {
                    component_type: first_token.clone(),
                    line,
                }
            })?;
            let name = (first_token.chars().count() > 1).then_some(first_token);
            (ct, name)
        };

        let display = name
            .clone()
            .unwrap_or_else(|| component_type.prefix().to_string());
        let expected_nodes = component_type.expected_node_count();
        let mut nodes = Vec::with_capacity(expected_nodes);
        let mut value = None;
        let mut params = HashMap::new();

        while self.current.kind != TokenKind::Newline && self.current.kind != TokenKind::Eof {
            if nodes.len() < expected_nodes {
                let node = self.parse_node().ok_or_else(|| {
                    GridError::invalid_component(
                        &display,
                        line,
                        format!("invalid node name {:?}", self.current.text),
                    )
                })?;
                nodes.push(node);
                self.advance()?;
                continue;
            }

            match self.current.kind {
                TokenKind::Identifier => {
                    let key = self.current.text.to_lowercase();
                    self.advance()?;
                    if self.current.kind != TokenKind::Equals {
                        return Err(GridError::invalid_component(
                            &display,
                            line,
                            format!("expected '=' after parameter '{}'", key),
                        ));
                    }
                    self.advance()?;
                    let v = self.parse_number(&display, line)?;
                    params.insert(key, v);
                }
                TokenKind::Number if value.is_none() => {
                    value = Some(self.parse_number(&display, line)?);
                }
                _ => {
                    return Err(GridError::invalid_component(
                        &display,
                        line,
                        format!("unexpected token {:?}{}", self.current.text, keyword_hint(keyword.as_deref())),
                    ));
                }
            }
        }

        if nodes.len() < expected_nodes {
            return Err(GridError::invalid_component(
                &display,
                line,
                format!(
                    "expected {} nodes, got {}{}",
                    expected_nodes,
                    nodes.len(),
                    keyword_hint(keyword.as_deref())
                ),
            ));
        }

        if component_type.requires_value() && value.is_none() {
            return Err(GridError::invalid_component(&display, line, "missing value"));
        }

        Ok(ComponentDef {
            component_type,
            name,
            nodes,
            value,
            params,
            line,
        })
    }

    fn parse_number(&mut self, display: &str, line: usize) -> Result<f64> {
        let text = self.current.text.clone();
        let value = match self.current.kind {
            TokenKind::Number => parse_value(&text),
            _ => None,
        }
        .ok_or_else(|| GridError::invalid_component(display, line, format!("invalid number {:?}", text)))?;
        self.advance()?;
        Ok(value)
    }
}

/// Reminder appended to errors on keyword lines, where the first word after
/// the keyword is always the component name.
fn keyword_hint(keyword: Option<&str>) -> String {
    match keyword {
        Some(kw) => format!(" ({} takes a name first: {} <name> <a> <b> ...)", kw, kw),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resistor() {
        let ast = super::super::parse("R1 in out 10k").unwrap();
        assert_eq!(ast.components.len(), 1);
        assert_eq!(ast.components[0].component_type, ComponentType::Resistor);
        assert_eq!(ast.components[0].name.as_deref(), Some("R1"));
        assert_eq!(ast.components[0].nodes, vec!["in", "out"]);
        assert_eq!(ast.components[0].value, Some(10_000.0));
    }

    #[test]
    fn test_parse_ground_aliases() {
        let ast = super::super::parse(".ground GND\nV1 a gnd 5\nW 1 0").unwrap();
        assert_eq!(ast.ground_node(), "0");
        assert_eq!(ast.components[0].nodes, vec!["a", "0"]);
        assert_eq!(ast.components[1].nodes, vec!["1", "0"]);
        assert_eq!(ast.components[1].name, None);
    }

    #[test]
    fn test_parse_led_params() {
        let ast = super::super::parse("LED D7 b 0 vth=1.6 ron=20 roff=1G\nD b c").unwrap();
        let led = &ast.components[0];
        assert_eq!(led.component_type, ComponentType::ThresholdElement);
        assert_eq!(led.name.as_deref(), Some("D7"));
        assert_eq!(led.params["vth"], 1.6);
        assert_eq!(led.params["ron"], 20.0);
        assert_eq!(led.params["roff"], 1e9);
        assert_eq!(ast.components[1].component_type, ComponentType::ThresholdElement);
        assert_eq!(ast.components[1].name, None);

        let ast = super::super::parse("LED1 b 0 1.8").unwrap();
        assert_eq!(ast.components[0].name.as_deref(), Some("LED1"));
        assert_eq!(ast.components[0].value, Some(1.8));
    }

    #[test]
    fn test_parse_with_comments() {
        let input = "# This is a comment\nR1 in out 1k ; inline comment style\n\n";
        let ast = super::super::parse(input).unwrap();
        assert_eq!(ast.components.len(), 1);
        assert_eq!(ast.ground, None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            super::super::parse("X1 a b 1"),
            Err(GridError::UnknownComponentType { line: 1, .. })
        ));
        assert!(matches!(
            super::super::parse("R1 a b"),
            Err(GridError::InvalidComponent { .. })
        ));
        assert!(matches!(
            super::super::parse("R1 a"),
            Err(GridError::InvalidComponent { .. })
        ));
        assert!(matches!(
            super::super::parse("\n.tran a"),
            Err(GridError::ParseError { line: 2, .. })
        ));
        assert!(matches!(
            super::super::parse("R1 a b 1 2"),
            Err(GridError::InvalidComponent { .. })
        ));
    }

    #[test]
    fn test_keyword_without_name_explains_itself() {
        for text in ["LED a b vth=2", "LED a b", "wire a b"] {
            match super::super::parse(text) {
                Err(GridError::InvalidComponent { message, .. }) => {
                    assert!(message.contains("takes a name first"), "{}: {}", text, message)
                }
                other => panic!("{}: expected InvalidComponent, got {:?}", text, other),
            }
        }
        let ast = super::super::parse("LED D9 a b vth=2").unwrap();
        assert_eq!(ast.components[0].name.as_deref(), Some("D9"));
        assert_eq!(ast.components[0].params["vth"], 2.0);
    }
}
