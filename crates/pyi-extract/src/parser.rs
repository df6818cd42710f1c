//! Python parser management using tree-sitter.
//!
//! This module provides the [`PyParser`] struct for turning source text into
//! a [`SyntaxTree`] the extractor can walk.

use std::fmt;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::ParseError;
use crate::syntax::{column_of, first_named, line_of, statements};

/// A successfully parsed Python source unit.
///
/// The tree is guaranteed to be free of syntax errors; [`PyParser::parse`]
/// rejects anything else.
pub struct SyntaxTree<'src> {
    tree: Tree,
    source: &'src str,
    source_id: String,
}

impl<'src> SyntaxTree<'src> {
    /// Returns the root `module` node.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Returns the source text the tree was parsed from.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }

    /// Returns the identifier used in diagnostics.
    #[inline]
    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Returns the underlying tree-sitter tree.
    #[inline]
    #[must_use]
    pub const fn tree(&self) -> &Tree {
        &self.tree
    }
}

impl fmt::Debug for SyntaxTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("source_id", &self.source_id)
            .field("len", &self.source.len())
            .finish_non_exhaustive()
    }
}

/// Python parser for stub extraction.
///
/// Wraps a tree-sitter parser configured for Python. The parser can be
/// reused for multiple files to avoid repeated initialization.
///
/// # Thread Safety
///
/// `PyParser` is `Send` but not `Sync`. For parallel conversion with rayon,
/// create one parser per worker with `map_init`.
///
/// # Examples
///
/// ```
/// use pyi_extract::PyParser;
///
/// let mut parser = PyParser::new()?;
/// let tree = parser.parse("import os\n", "example.py")?;
/// assert_eq!(tree.root().kind(), "module");
///
/// let err = parser.parse("def broken(:\n", "broken.py").unwrap_err();
/// assert_eq!(err.source_id(), Some("broken.py"));
/// # Ok::<(), pyi_extract::ParseError>(())
/// ```
pub struct PyParser {
    parser: Parser,
}

impl PyParser {
    /// Creates a new Python parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the Python language cannot be
    /// set on the parser.
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_python::LANGUAGE.into();

        parser
            .set_language(&language)
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser })
    }

    /// Parses a source unit.
    ///
    /// # Errors
    ///
    /// - Returns [`ParseError::Parse`] if tree-sitter produced no tree
    /// - Returns [`ParseError::Syntax`] for the first error or missing token
    ///   in the tree, or for the first construct tree-sitter recovers from
    ///   silently (an empty block, a parameter without a default after one
    ///   with a default)
    pub fn parse<'src>(
        &mut self,
        source: &'src str,
        source_id: &str,
    ) -> Result<SyntaxTree<'src>, ParseError> {
        let tree = self.parser.parse(source, None).ok_or(ParseError::Parse)?;

        let root = tree.root_node();
        if root.has_error() {
            let node = first_error(root).unwrap_or(root);
            let message = if node.is_missing() {
                format!("missing '{}'", node.kind())
            } else {
                "invalid syntax".to_owned()
            };
            return Err(syntax_error(node, source_id, message));
        }
        if let Some((node, message)) = first_invalid(root) {
            return Err(syntax_error(node, source_id, message.to_owned()));
        }

        Ok(SyntaxTree {
            tree,
            source,
            source_id: source_id.to_owned(),
        })
    }
}

impl fmt::Debug for PyParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PyParser")
            .field("language", &"Python")
            .finish_non_exhaustive()
    }
}

/// Finds the first error or missing node in document order.
///
/// Only subtrees that report an error are descended into.
fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// Finds the first construct the grammar accepts but Python rejects.
fn first_invalid(root: Node<'_>) -> Option<(Node<'_>, &'static str)> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if let Some(message) = invalid_reason(node) {
            return Some((node, message));
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn invalid_reason(node: Node<'_>) -> Option<&'static str> {
    match node.kind() {
        "block" if statements(node).next().is_none() => Some("expected an indented block"),
        "parameters" | "lambda_parameters" if has_required_after_default(node) => {
            Some("non-default argument follows default argument")
        }
        _ => None,
    }
}

/// Checks the positional parameters, up to the first `*`, `*args` or
/// `**kwargs`.
fn has_required_after_default(parameters: Node<'_>) -> bool {
    let mut seen_default = false;
    for param in statements(parameters) {
        match param.kind() {
            "default_parameter" | "typed_default_parameter" => seen_default = true,
            "typed_parameter"
                if first_named(param).is_some_and(|inner| {
                    matches!(inner.kind(), "list_splat_pattern" | "dictionary_splat_pattern")
                }) =>
            {
                return false;
            }
            "identifier" | "typed_parameter" | "tuple_pattern" if seen_default => return true,
            "keyword_separator" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                return false;
            }
            _ => {}
        }
    }
    false
}

fn syntax_error(node: Node<'_>, source_id: &str, message: String) -> ParseError {
    ParseError::Syntax {
        source_id: source_id.to_owned(),
        line: line_of(node),
        column: column_of(node),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_new() {
        assert!(PyParser::new().is_ok());
    }

    #[test]
    fn test_parse_empty_source() {
        let mut parser = PyParser::new().expect("Parser creation failed");
        let tree = parser.parse("", "empty.py").expect("Parse failed");
        assert_eq!(tree.root().named_child_count(), 0);
        assert_eq!(tree.source_id(), "empty.py");
    }

    #[test]
    fn test_parse_valid_source() {
        let mut parser = PyParser::new().expect("Parser creation failed");
        let source = "import os\n\nclass Foo:\n    x: int = 1\n";
        let tree = parser.parse(source, "foo.py").expect("Parse failed");
        assert_eq!(tree.root().kind(), "module");
        assert_eq!(tree.source(), source);
    }

    #[test]
    fn test_parse_syntax_error_location() {
        let mut parser = PyParser::new().expect("Parser creation failed");
        let source = "x = 1\ny = (\n";
        let err = parser.parse(source, "bad.py").expect_err("should fail");
        match err {
            ParseError::Syntax { source_id, line, .. } => {
                assert_eq!(source_id, "bad.py");
                assert!(line >= 2, "error reported on line {line}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parser_is_reusable_after_error() {
        let mut parser = PyParser::new().expect("Parser creation failed");
        assert!(parser.parse("def (:\n", "a.py").is_err());
        assert!(parser.parse("def f(): pass\n", "b.py").is_ok());
    }

    fn syntax_message(source: &str) -> String {
        let mut parser = PyParser::new().expect("Parser creation failed");
        match parser.parse(source, "bad.py") {
            Err(ParseError::Syntax { message, .. }) => message,
            other => panic!("expected a syntax error for {source:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_blocks_are_rejected() {
        for source in ["def f():\n", "class A:\n", "if x:\n"] {
            assert_eq!(syntax_message(source), "expected an indented block", "{source:?}");
        }
    }

    #[test]
    fn test_required_parameter_after_default_is_rejected() {
        for source in [
            "def f(a=1, b): pass\n",
            "def f(a: int = 1, b: int): pass\n",
            "def f(a=1, /, b): pass\n",
            "g = lambda a=1, b: 0\n",
        ] {
            assert_eq!(
                syntax_message(source),
                "non-default argument follows default argument",
                "{source:?}"
            );
        }
    }

    #[test]
    fn test_parameters_after_star_may_omit_defaults() {
        let mut parser = PyParser::new().expect("Parser creation failed");
        for source in [
            "def f(a=1, *, b): pass\n",
            "def f(a=1, *args, b): pass\n",
            "def f(a=1, *args: int, b): pass\n",
            "def f(a, b=1, **kw): pass\n",
        ] {
            assert!(parser.parse(source, "ok.py").is_ok(), "{source:?}");
        }
    }

    #[test]
    fn test_parser_debug() {
        let parser = PyParser::new().expect("Parser creation failed");
        let debug = format!("{parser:?}");
        assert!(debug.contains("PyParser"));
        assert!(debug.contains("Python"));
    }
}
