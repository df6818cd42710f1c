//! Closed classification of the tree-sitter node kinds the extractor handles.
//!
//! Tree-sitter exposes node kinds as strings. The extractor never branches
//! on those strings directly; it classifies a node once into [`Stmt`] or
//! [`Expr`] and matches exhaustively on the result. Kinds it has no use for
//! end up in the `Other` variants, which every consumer has to handle (and
//! usually reports).

use tree_sitter::Node;

/// Returns the 1-indexed line a node starts on.
#[inline]
pub(crate) fn line_of(node: Node<'_>) -> u32 {
    u32::try_from(node.start_position().row + 1).unwrap_or(u32::MAX)
}

/// Returns the 1-indexed column a node starts on.
#[inline]
pub(crate) fn column_of(node: Node<'_>) -> u32 {
    u32::try_from(node.start_position().column + 1).unwrap_or(u32::MAX)
}

/// Returns the source text covered by a node.
#[inline]
pub(crate) fn text_of<'src>(node: Node<'_>, source: &'src str) -> &'src str {
    source.get(node.byte_range()).unwrap_or_default()
}

/// Iterates over the named, non-extra children of a node.
///
/// Comments and line continuations are extras and never statements.
pub(crate) fn statements<'tree>(node: Node<'tree>) -> impl Iterator<Item = Node<'tree>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'tree>> = node
        .named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect();
    children.into_iter()
}

/// Returns the first named, non-extra child of a node.
pub(crate) fn first_named<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    statements(node).next()
}

/// Returns `true` for a `# type: ...` comment that is not `# type: ignore`.
pub(crate) fn is_type_comment(comment: &str) -> bool {
    let Some(rest) = comment.strip_prefix('#') else {
        return false;
    };
    let Some(rest) = rest.trim_start().strip_prefix("type:") else {
        return false;
    };
    !rest.trim_start().starts_with("ignore")
}

/// A statement, classified by shape.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Stmt<'tree> {
    /// `expression_statement`: assignments and bare expressions.
    Expression(Node<'tree>),
    /// `import a, b as c`
    Import(Node<'tree>),
    /// `from m import a`
    ImportFrom(Node<'tree>),
    /// `from __future__ import a`
    FutureImport(Node<'tree>),
    /// `def f(): ...`
    Function(Node<'tree>),
    /// `async def f(): ...`
    AsyncFunction,
    /// `@decorator` followed by a definition.
    Decorated(Node<'tree>),
    /// `class C: ...`
    Class(Node<'tree>),
    /// `if` / `elif` / `else`
    If(Node<'tree>),
    /// `try` / `except` / `else` / `finally`
    Try(Node<'tree>),
    /// `pass`
    Pass(Node<'tree>),
    /// Anything else.
    Other(Node<'tree>),
}

impl<'tree> Stmt<'tree> {
    /// Classifies a statement node.
    pub(crate) fn classify(node: Node<'tree>) -> Self {
        match node.kind() {
            "expression_statement" => Self::Expression(node),
            "import_statement" => Self::Import(node),
            "import_from_statement" => Self::ImportFrom(node),
            "future_import_statement" => Self::FutureImport(node),
            "function_definition" if is_async(node) => Self::AsyncFunction,
            "function_definition" => Self::Function(node),
            "decorated_definition" => Self::Decorated(node),
            "class_definition" => Self::Class(node),
            "if_statement" => Self::If(node),
            "try_statement" => Self::Try(node),
            "pass_statement" => Self::Pass(node),
            _ => Self::Other(node),
        }
    }

    /// Returns the kind name used in diagnostics.
    pub(crate) fn kind_name(self) -> &'static str {
        match self {
            Self::AsyncFunction => "async_function_definition",
            Self::Expression(node)
            | Self::Import(node)
            | Self::ImportFrom(node)
            | Self::FutureImport(node)
            | Self::Function(node)
            | Self::Decorated(node)
            | Self::Class(node)
            | Self::If(node)
            | Self::Try(node)
            | Self::Pass(node)
            | Self::Other(node) => node.kind(),
        }
    }
}

fn is_async(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| child.kind() == "async");
    found
}

/// An expression or type expression, classified by shape.
///
/// `type` wrappers and parentheses are looked through, so `(3)` classifies
/// as an [`Expr::Integer`] and the `type` node of an annotation classifies as
/// whatever it wraps.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Expr<'tree> {
    /// `name`
    Name(Node<'tree>),
    /// `a.b`
    Attribute(Node<'tree>),
    /// `a[b]` in expression position.
    Subscript(Node<'tree>),
    /// `a[b]` in annotation position.
    Generic(Node<'tree>),
    /// `a.b` in annotation position.
    Member(Node<'tree>),
    /// A plain or bytes string, possibly implicitly concatenated.
    Str(Node<'tree>),
    /// An f-string.
    FormattedStr(Node<'tree>),
    /// An integer literal, possibly imaginary.
    Integer(Node<'tree>),
    /// A float literal, possibly imaginary.
    Float(Node<'tree>),
    /// `True` or `False`
    Bool(Node<'tree>),
    /// `None`
    None(Node<'tree>),
    /// `...`
    Ellipsis(Node<'tree>),
    /// `[a, b]`
    List(Node<'tree>),
    /// `(a, b)` or a bare `a, b`.
    Tuple(Node<'tree>),
    /// `{a: b}`
    Dict(Node<'tree>),
    /// `{a, b}`
    Set(Node<'tree>),
    /// `f(x)`
    Call(Node<'tree>),
    /// `not x`
    Not(Node<'tree>),
    /// `-x`, `+x`, `~x`
    Unary(Node<'tree>),
    /// Anything else.
    Other(Node<'tree>),
}

impl<'tree> Expr<'tree> {
    /// Classifies an expression node.
    pub(crate) fn classify(node: Node<'tree>, source: &str) -> Self {
        match node.kind() {
            "type" | "parenthesized_expression" => match first_named(node) {
                Some(inner) => Self::classify(inner, source),
                None => Self::Other(node),
            },
            "identifier" | "keyword_identifier" => Self::Name(node),
            "attribute" => Self::Attribute(node),
            "subscript" => Self::Subscript(node),
            "generic_type" => Self::Generic(node),
            "member_type" => Self::Member(node),
            "string" if is_formatted(node, source) => Self::FormattedStr(node),
            "concatenated_string" if statements(node).any(|part| is_formatted(part, source)) => {
                Self::FormattedStr(node)
            }
            "string" | "concatenated_string" => Self::Str(node),
            "integer" => Self::Integer(node),
            "float" => Self::Float(node),
            "true" | "false" => Self::Bool(node),
            "none" => Self::None(node),
            "ellipsis" => Self::Ellipsis(node),
            "list" => Self::List(node),
            "tuple" | "expression_list" | "pattern_list" => Self::Tuple(node),
            "dictionary" => Self::Dict(node),
            "set" => Self::Set(node),
            "call" => Self::Call(node),
            "not_operator" => Self::Not(node),
            "unary_operator" => Self::Unary(node),
            _ => Self::Other(node),
        }
    }

    /// Returns the underlying node.
    pub(crate) fn node(self) -> Node<'tree> {
        match self {
            Self::Name(node)
            | Self::Attribute(node)
            | Self::Subscript(node)
            | Self::Generic(node)
            | Self::Member(node)
            | Self::Str(node)
            | Self::FormattedStr(node)
            | Self::Integer(node)
            | Self::Float(node)
            | Self::Bool(node)
            | Self::None(node)
            | Self::Ellipsis(node)
            | Self::List(node)
            | Self::Tuple(node)
            | Self::Dict(node)
            | Self::Set(node)
            | Self::Call(node)
            | Self::Not(node)
            | Self::Unary(node)
            | Self::Other(node) => node,
        }
    }

    /// Returns the kind name used in diagnostics.
    pub(crate) fn kind_name(self) -> &'static str {
        self.node().kind()
    }

    /// Returns `true` for literal constants (docstrings, numbers, `...`).
    pub(crate) const fn is_constant(self) -> bool {
        matches!(
            self,
            Self::Str(_)
                | Self::Integer(_)
                | Self::Float(_)
                | Self::Bool(_)
                | Self::None(_)
                | Self::Ellipsis(_)
        )
    }
}

/// Returns `true` if the string literal is an f-string.
fn is_formatted(node: Node<'_>, source: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|child| match child.kind() {
        "interpolation" => true,
        "string_start" => text_of(child, source).contains(['f', 'F']),
        _ => false,
    });
    found
}

/// Returns the prefix letters of a string literal, e.g. `rb` for `rb"x"`.
pub(crate) fn string_prefix<'src>(node: Node<'_>, source: &'src str) -> &'src str {
    let start = if node.kind() == "concatenated_string" {
        first_named(node).and_then(first_named)
    } else {
        first_named(node)
    };
    let Some(start) = start.filter(|start| start.kind() == "string_start") else {
        return "";
    };
    let text = text_of(start, source);
    text.trim_end_matches(['"', '\''])
}

/// Returns the text between the quotes of a single string literal.
pub(crate) fn string_content<'src>(node: Node<'_>, source: &'src str) -> &'src str {
    let mut cursor = node.walk();
    let mut start = None;
    let mut end = None;
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => start = Some(child.end_byte()),
            "string_end" => end = Some(child.start_byte()),
            _ => {}
        }
    }
    match (start, end) {
        (Some(start), Some(end)) if start <= end => source.get(start..end).unwrap_or_default(),
        _ => "",
    }
}
