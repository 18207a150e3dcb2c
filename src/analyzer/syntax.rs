//! Python syntax pre-check with tree-sitter
//!
//! The external tools produce noisy or partial output on files that do not
//! parse, so broken files are rejected before any tool runs.

use tree_sitter::{Node, Parser};

use crate::types::{RepolyzeError, Result};

fn python_parser(path: &str) -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| {
            RepolyzeError::analysis(path, format!("Failed to set Python language: {}", e))
        })?;
    Ok(parser)
}

/// Fail with an `Analysis` error naming the first line that does not parse
pub fn check_python(path: &str, content: &str) -> Result<()> {
    let mut parser = python_parser(path)?;
    let tree = parser
        .parse(content, None)
        .ok_or_else(|| RepolyzeError::analysis(path, "Failed to parse Python file"))?;

    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }

    let node = first_error(root).unwrap_or(root);
    let line = node.start_position().row + 1;
    let message = if node.is_missing() {
        format!("syntax error at line {}: missing '{}'", line, node.kind())
    } else {
        format!("syntax error at line {}", line)
    };
    Err(RepolyzeError::analysis(path, message))
}

fn first_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}
