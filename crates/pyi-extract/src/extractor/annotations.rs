//! Annotations, dotted names, and base-class types.
//!
//! All three reduce an expression to text. When any part of the expression
//! cannot be expressed, a diagnostic is reported and the whole result is
//! `None`; a partial annotation is never produced. The one exception is a
//! list annotation (`Callable[[int, str], None]`), whose unsupported items
//! are skipped.

use pyi_core::{Annotation, DiagnosticSink, DottedName, Type};
use smallvec::SmallVec;
use tree_sitter::Node;

use super::ExtractContext;
use crate::syntax::{statements, string_content, string_prefix, Expr};

impl<S: DiagnosticSink> ExtractContext<'_, S> {
    /// Reduces a type expression to an [`Annotation`].
    pub(super) fn extract_annotation(&mut self, node: Node<'_>) -> Option<Annotation> {
        self.annotation_text(node).map(Annotation::new)
    }

    fn annotation_text(&mut self, node: Node<'_>) -> Option<String> {
        match self.expr(node) {
            Expr::None(_) => Some("None".to_owned()),
            Expr::Ellipsis(_) => Some("...".to_owned()),
            Expr::Str(string) if !string_prefix(string, self.source).contains(['b', 'B']) => {
                Some(self.forward_reference(string))
            }
            constant @ (Expr::Str(_) | Expr::Integer(_) | Expr::Float(_) | Expr::Bool(_)) => {
                let text = self.text(constant.node());
                self.warn(
                    constant.node(),
                    format!("unsupported constant {text} for annotations"),
                );
                None
            }
            Expr::Name(_) | Expr::Attribute(_) | Expr::Member(_) => {
                self.extract_dotted_name(node).map(DottedName::into_string)
            }
            Expr::Subscript(subscript) => self.subscript_annotation(subscript),
            Expr::Generic(generic) => self.generic_annotation(generic),
            Expr::List(list) => {
                let mut items: Vec<String> = Vec::new();
                for item in statements(list) {
                    items.extend(self.annotation_text(item));
                }
                Some(format!("[{}]", items.join(", ")))
            }
            other @ (Expr::FormattedStr(_)
            | Expr::Tuple(_)
            | Expr::Dict(_)
            | Expr::Set(_)
            | Expr::Call(_)
            | Expr::Not(_)
            | Expr::Unary(_)
            | Expr::Other(_)) => {
                self.warn(
                    other.node(),
                    format!("unsupported ast type '{}' for annotations", other.kind_name()),
                );
                None
            }
        }
    }

    /// Returns the text of a quoted annotation. Implicitly concatenated
    /// parts are joined.
    fn forward_reference(&self, string: Node<'_>) -> String {
        if string.kind() == "concatenated_string" {
            statements(string)
                .map(|part| string_content(part, self.source))
                .collect()
        } else {
            string_content(string, self.source).to_owned()
        }
    }

    /// `Base[Arg]` or `Base[Arg1, Arg2]` in expression position.
    fn subscript_annotation(&mut self, subscript: Node<'_>) -> Option<String> {
        let value = subscript.child_by_field_name("value")?;
        if !matches!(self.expr(value), Expr::Name(_) | Expr::Attribute(_)) {
            self.warn_unsupported_ast(subscript, value);
            return None;
        }
        let base = self.extract_dotted_name(value)?;

        let mut cursor = subscript.walk();
        let mut arguments: SmallVec<[Node<'_>; 4]> = subscript
            .children_by_field_name("subscript", &mut cursor)
            .collect();
        // `Base[(A, B)]` means the same as `Base[A, B]`.
        if let [single] = arguments.as_slice() {
            if let Expr::Tuple(tuple) = self.expr(*single) {
                arguments = statements(tuple).collect();
            }
        }

        self.join_arguments(base.as_str(), &arguments)
    }

    /// `Base[Arg, ...]` in annotation position.
    fn generic_annotation(&mut self, generic: Node<'_>) -> Option<String> {
        let mut children = statements(generic);
        let base = children.next()?;
        let parameters = children.find(|child| child.kind() == "type_parameter")?;
        let base = self.extract_dotted_name(base)?;
        let arguments: SmallVec<[Node<'_>; 4]> = statements(parameters).collect();
        self.join_arguments(base.as_str(), &arguments)
    }

    fn join_arguments(&mut self, base: &str, arguments: &[Node<'_>]) -> Option<String> {
        let mut rendered: SmallVec<[String; 4]> = SmallVec::new();
        let mut complete = true;
        for &argument in arguments {
            match self.annotation_text(argument) {
                Some(text) => rendered.push(text),
                None => complete = false,
            }
        }
        complete.then(|| format!("{base}[{}]", rendered.join(", ")))
    }

    // ========================================================================
    // Dotted names
    // ========================================================================

    /// Resolves a name or attribute path to its dotted text.
    pub(super) fn extract_dotted_name(&mut self, node: Node<'_>) -> Option<DottedName> {
        self.dotted_path(node, node).map(DottedName::new)
    }

    fn dotted_path(&mut self, outer: Node<'_>, node: Node<'_>) -> Option<String> {
        match self.expr(node) {
            Expr::Name(name) => Some(self.text(name).to_owned()),
            Expr::Attribute(attribute) => {
                let object = attribute.child_by_field_name("object")?;
                let member = attribute.child_by_field_name("attribute")?;
                let base = self.dotted_path(outer, object)?;
                Some(format!("{base}.{}", self.text(member)))
            }
            Expr::Member(member) => {
                let parts: SmallVec<[Node<'_>; 2]> = statements(member).collect();
                let (last, init) = parts.split_last()?;
                let base = self.dotted_path(outer, *init.first()?)?;
                Some(format!("{base}.{}", self.text(*last)))
            }
            other => {
                self.warn(
                    other.node(),
                    format!("unsupported ast type for quoted names '{}'", outer.kind()),
                );
                None
            }
        }
    }

    // ========================================================================
    // Base classes
    // ========================================================================

    /// Reduces a base-class expression: a dotted name, or a dotted name
    /// subscripted by a single base-class expression.
    pub(super) fn extract_type(&mut self, node: Node<'_>) -> Option<Type> {
        match self.expr(node) {
            Expr::Name(_) | Expr::Attribute(_) => self.extract_dotted_name(node).map(Type::from),
            Expr::Subscript(subscript) => {
                let value = subscript.child_by_field_name("value")?;
                if !matches!(self.expr(value), Expr::Name(_) | Expr::Attribute(_)) {
                    self.warn_unsupported_ast(subscript, value);
                    return None;
                }
                let base = self.extract_dotted_name(value)?;

                let mut cursor = subscript.walk();
                let arguments: SmallVec<[Node<'_>; 2]> = subscript
                    .children_by_field_name("subscript", &mut cursor)
                    .collect();
                let [argument] = arguments.as_slice() else {
                    self.warn(subscript, "unsupported base class type 'tuple'");
                    return None;
                };
                let inner = self.extract_type(*argument)?;
                Some(Type::new(format!("{base}[{inner}]")))
            }
            other => {
                self.warn(
                    other.node(),
                    format!("unsupported base class type '{}'", other.kind_name()),
                );
                None
            }
        }
    }
}
