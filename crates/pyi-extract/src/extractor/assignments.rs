//! Assignments at module level and in class bodies.
//!
//! At module level the shape of the right-hand side decides what an
//! assignment becomes:
//!
//! | Right-hand side | Result |
//! |-----------------|--------|
//! | `None` | `x: Optional[Any]` |
//! | string, bytes, number, bool | `x: str`, `x: bytes`, `x: int`, ... |
//! | `[...]`, `{...: ...}`, `{...}`, `(...)` | `x: List[Any]`, `x: Dict[Any, Any]`, ... |
//! | a call | `x: Any` |
//! | anything else | `X = <annotation>` (an alias) |
//!
//! The right-hand side is never evaluated, only inspected.

use pyi_core::{
    Alias, Annotation, Attribute, ClassAssign, ClassContent, DiagnosticSink, ModuleContent,
};
use smallvec::SmallVec;
use tree_sitter::Node;

use super::ExtractContext;
use crate::syntax::{is_type_comment, statements, string_prefix, Expr};

/// What a right-hand side tells us about the bound name's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inference {
    /// A literal of a known type.
    Known {
        annotation: &'static str,
        requires: &'static [&'static str],
    },
    /// A constant that has no stub spelling (`...`, `1j`).
    UnsupportedConstant(&'static str),
    /// Not a literal at all.
    NotLiteral,
}

impl Inference {
    const fn known(annotation: &'static str) -> Self {
        Self::Known {
            annotation,
            requires: &[],
        }
    }
}

const ANY: &str = "typing.Any";
const CLASS_VAR: &str = "typing.ClassVar";

impl<'a, S: DiagnosticSink> ExtractContext<'a, S> {
    // ========================================================================
    // Module level
    // ========================================================================

    /// Extracts `stmt`, an expression statement holding `assign`.
    pub(super) fn extract_top_level_assignment(
        &mut self,
        stmt: Node<'_>,
        assign: Node<'_>,
    ) -> Vec<ModuleContent> {
        if let Some(annotation) = assign.child_by_field_name("type") {
            return self
                .extract_top_level_annotated(assign, annotation)
                .map(ModuleContent::from)
                .into_iter()
                .collect();
        }

        let (targets, value) = assignment_chain(assign);
        let Some(value) = value else {
            return Vec::new();
        };

        // The comment itself is dropped; the targets are kept.
        if self.has_type_comment(stmt) {
            self.unsupported(stmt, "type comments");
        }

        let inference = self.literal_type(value);
        if inference == Inference::NotLiteral {
            self.extract_top_level_alias(assign, &targets, value)
        } else {
            self.extract_top_level_attribute(assign, &targets, value, inference)
                .into_iter()
                .map(ModuleContent::from)
                .collect()
        }
    }

    fn extract_top_level_annotated(
        &mut self,
        assign: Node<'_>,
        annotation: Node<'_>,
    ) -> Option<Attribute> {
        let target = assign.child_by_field_name("left")?;
        if !is_name(target) {
            self.warn_unsupported_ast(assign, target);
            return None;
        }
        let annotation = self.extract_annotation(annotation)?;
        // The value is ignored.
        Some(Attribute::new(self.text(target), annotation))
    }

    fn extract_top_level_attribute(
        &mut self,
        assign: Node<'_>,
        targets: &[Node<'_>],
        value: Node<'_>,
        inference: Inference,
    ) -> Vec<Attribute> {
        let (annotation, requires) = match inference {
            Inference::Known {
                annotation,
                requires,
            } => (annotation, requires),
            Inference::UnsupportedConstant(kind) => {
                self.warn(assign, format!("{kind} constants are unsupported"));
                return Vec::new();
            }
            Inference::NotLiteral => {
                self.warn_unsupported_ast(assign, value);
                return Vec::new();
            }
        };

        let mut bound: Vec<(&'a str, String)> = Vec::new();
        let mut required = false;
        for &target in targets {
            if is_name(target) {
                if !required {
                    requires.iter().for_each(|name| self.require(name));
                    required = true;
                }
                bound.push((self.text(target), annotation.to_owned()));
            } else if is_pattern(target) {
                self.destructure(assign, target, Some(value), &mut bound);
            } else {
                self.warn_unsupported_ast(assign, target);
            }
        }

        bound
            .into_iter()
            .map(|(name, annotation)| Attribute::new(name, Annotation::new(annotation)))
            .collect()
    }

    /// Binds each name of an unpacking target to the type of the matching
    /// element, or to `Any` when the right-hand side cannot be split.
    fn destructure(
        &mut self,
        assign: Node<'_>,
        pattern: Node<'_>,
        value: Option<Node<'_>>,
        bound: &mut Vec<(&'a str, String)>,
    ) {
        let elements: SmallVec<[Node<'_>; 4]> = statements(pattern).collect();
        let values: Option<SmallVec<[Node<'_>; 4]>> = value
            .filter(|&value| matches!(self.expr(value), Expr::Tuple(_) | Expr::List(_)))
            .map(|value| statements(value).collect::<SmallVec<[Node<'_>; 4]>>())
            .filter(|values| {
                values.len() == elements.len()
                    && !elements.iter().chain(values.iter()).any(|n| is_splat(*n))
            });

        for (index, &element) in elements.iter().enumerate() {
            let element_value = values.as_ref().and_then(|values| values.get(index)).copied();
            if is_name(element) {
                let annotation = self.element_type(element_value);
                bound.push((self.text(element), annotation));
            } else if is_pattern(element) {
                self.destructure(assign, element, element_value, bound);
            } else {
                self.warn_unsupported_ast(assign, element);
            }
        }
    }

    fn element_type(&mut self, value: Option<Node<'_>>) -> String {
        match value.map(|value| self.literal_type(value)) {
            Some(Inference::Known {
                annotation,
                requires,
            }) => {
                requires.iter().for_each(|name| self.require(name));
                annotation.to_owned()
            }
            _ => {
                self.require(ANY);
                "Any".to_owned()
            }
        }
    }

    /// Name targets become aliases of `value`. Unpacking targets cannot
    /// split a type expression, so each of their names is bound to `Any`.
    fn extract_top_level_alias(
        &mut self,
        assign: Node<'_>,
        targets: &[Node<'_>],
        value: Node<'_>,
    ) -> Vec<ModuleContent> {
        let annotation = if targets.iter().any(|&target| is_name(target)) {
            self.extract_annotation(value)
        } else {
            None
        };

        let mut content = Vec::new();
        for &target in targets {
            if is_name(target) {
                if let Some(annotation) = &annotation {
                    content.push(Alias::new(self.text(target), annotation.clone()).into());
                }
            } else if is_pattern(target) {
                let mut bound: Vec<(&'a str, String)> = Vec::new();
                self.destructure(assign, target, None, &mut bound);
                content.extend(bound.into_iter().map(|(name, annotation)| {
                    ModuleContent::from(Attribute::new(name, Annotation::new(annotation)))
                }));
            } else {
                self.warn_unsupported_ast(assign, target);
            }
        }
        content
    }

    /// Infers the type of a literal right-hand side.
    fn literal_type(&self, value: Node<'_>) -> Inference {
        match self.expr(value) {
            Expr::None(_) => Inference::Known {
                annotation: "Optional[Any]",
                requires: &["typing.Optional", ANY],
            },
            Expr::Str(string) => {
                if string_prefix(string, self.source).contains(['b', 'B']) {
                    Inference::known("bytes")
                } else {
                    Inference::known("str")
                }
            }
            Expr::Integer(number) if is_imaginary(self.text(number)) => {
                Inference::UnsupportedConstant("complex")
            }
            Expr::Integer(_) => Inference::known("int"),
            Expr::Float(number) if is_imaginary(self.text(number)) => {
                Inference::UnsupportedConstant("complex")
            }
            Expr::Float(_) => Inference::known("float"),
            Expr::Bool(_) => Inference::known("bool"),
            Expr::Ellipsis(_) => Inference::UnsupportedConstant("ellipsis"),
            Expr::List(_) => Inference::Known {
                annotation: "List[Any]",
                requires: &["typing.List", ANY],
            },
            Expr::Dict(_) => Inference::Known {
                annotation: "Dict[Any, Any]",
                requires: &["typing.Dict", ANY],
            },
            Expr::Set(_) => Inference::Known {
                annotation: "Set[Any]",
                requires: &["typing.Set", ANY],
            },
            Expr::Tuple(_) => Inference::Known {
                annotation: "Tuple[Any, ...]",
                requires: &["typing.Tuple", ANY],
            },
            Expr::Call(_) => Inference::Known {
                annotation: "Any",
                requires: &[ANY],
            },
            Expr::Unary(unary) => self.signed_number_type(unary),
            Expr::Name(_)
            | Expr::Attribute(_)
            | Expr::Subscript(_)
            | Expr::Generic(_)
            | Expr::Member(_)
            | Expr::FormattedStr(_)
            | Expr::Not(_)
            | Expr::Other(_) => Inference::NotLiteral,
        }
    }

    /// `-1` and `+2.5` are numbers; `-x` and `~1` are not literals.
    fn signed_number_type(&self, unary: Node<'_>) -> Inference {
        let sign = unary
            .child_by_field_name("operator")
            .map(|operator| self.text(operator));
        let argument = unary.child_by_field_name("argument");
        match (sign, argument) {
            (Some("-" | "+"), Some(argument))
                if matches!(self.expr(argument), Expr::Integer(_) | Expr::Float(_)) =>
            {
                self.literal_type(argument)
            }
            _ => Inference::NotLiteral,
        }
    }

    // ========================================================================
    // Class body
    // ========================================================================

    /// Extracts `stmt`, an expression statement in a class body holding
    /// `assign`.
    pub(super) fn extract_class_assignment(
        &mut self,
        stmt: Node<'_>,
        assign: Node<'_>,
    ) -> Vec<ClassContent> {
        if let Some(annotation) = assign.child_by_field_name("type") {
            return self
                .extract_class_annotated(assign, annotation)
                .map(ClassContent::from)
                .into_iter()
                .collect();
        }

        self.require(ANY);
        self.require(CLASS_VAR);

        if self.has_type_comment(stmt) {
            self.unsupported(stmt, "type comments");
        }

        let (targets, _) = assignment_chain(assign);
        let mut body = Vec::new();
        for target in targets {
            self.class_var_targets(assign, target, &mut body);
        }
        body
    }

    fn class_var_targets(&mut self, assign: Node<'_>, target: Node<'_>, body: &mut Vec<ClassContent>) {
        if is_name(target) {
            body.push(ClassAssign::class_var(self.text(target)).into());
        } else if is_pattern(target) {
            for element in statements(target) {
                self.class_var_targets(assign, element, body);
            }
        } else {
            self.warn_unsupported_ast(assign, target);
        }
    }

    /// `x: int` becomes an annotated field; `x: ClassVar[int]` a class
    /// variable of type `int`.
    fn extract_class_annotated(
        &mut self,
        assign: Node<'_>,
        annotation: Node<'_>,
    ) -> Option<ClassAssign> {
        let target = assign.child_by_field_name("left")?;
        if !is_name(target) {
            self.warn_unsupported_ast(assign, target);
            return None;
        }
        let annotation = self.extract_annotation(annotation)?;
        let name = self.text(target);
        Some(match strip_class_var(annotation.as_str()) {
            Some(inner) => ClassAssign {
                name: name.to_owned(),
                annotation: Annotation::new(inner),
                class_var: true,
            },
            None => ClassAssign::annotated(name, annotation),
        })
    }

    // ========================================================================
    // Type comments
    // ========================================================================

    /// Returns `true` if a `# type:` comment trails the statement on its
    /// last line.
    pub(super) fn has_type_comment(&self, stmt: Node<'_>) -> bool {
        let row = stmt.end_position().row;
        let mut cursor = stmt.walk();
        let inner = stmt
            .children(&mut cursor)
            .filter(|child| child.kind() == "comment")
            .any(|comment| is_type_comment(self.text(comment)));
        inner
            || std::iter::successors(stmt.next_sibling(), Node::next_sibling)
                .take_while(|sibling| sibling.is_extra() && sibling.start_position().row == row)
                .any(|comment| comment.kind() == "comment" && is_type_comment(self.text(comment)))
    }
}

/// Flattens `a = b = value` into its targets and the final value.
fn assignment_chain(assign: Node<'_>) -> (SmallVec<[Node<'_>; 2]>, Option<Node<'_>>) {
    let mut targets = SmallVec::new();
    let mut current = assign;
    loop {
        targets.extend(current.child_by_field_name("left"));
        match current.child_by_field_name("right") {
            Some(right) if right.kind() == "assignment" => current = right,
            right => return (targets, right),
        }
    }
}

/// Strips a `ClassVar[...]` wrapper from annotation text.
fn strip_class_var(annotation: &str) -> Option<&str> {
    annotation
        .strip_prefix("typing.ClassVar[")
        .or_else(|| annotation.strip_prefix("ClassVar["))
        .and_then(|rest| rest.strip_suffix(']'))
}

fn is_imaginary(number: &str) -> bool {
    number.ends_with(['j', 'J'])
}

fn is_name(node: Node<'_>) -> bool {
    matches!(node.kind(), "identifier" | "keyword_identifier")
}

fn is_pattern(node: Node<'_>) -> bool {
    matches!(node.kind(), "pattern_list" | "tuple_pattern" | "list_pattern")
}

fn is_splat(node: Node<'_>) -> bool {
    matches!(node.kind(), "list_splat_pattern" | "list_splat")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_class_var() {
        assert_eq!(strip_class_var("ClassVar[int]"), Some("int"));
        assert_eq!(strip_class_var("typing.ClassVar[Dict[str, Any]]"), Some("Dict[str, Any]"));
        assert_eq!(strip_class_var("ClassVar"), None);
        assert_eq!(strip_class_var("Optional[int]"), None);
    }

    #[test]
    fn test_is_imaginary() {
        assert!(is_imaginary("3j"));
        assert!(is_imaginary("1.5J"));
        assert!(!is_imaginary("0x1F"));
    }
}
