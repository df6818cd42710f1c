//! Function signatures and decorators.
//!
//! Only the signature is inspected. Parameters are split into four groups
//! (positional, `*args`, keyword-only, `**kwargs`); default values are
//! reduced to a "has a default" flag.

use pyi_core::{rzip_longest, Argument, Decorator, DiagnosticSink, Function};
use smallvec::SmallVec;
use tree_sitter::Node;

use super::ExtractContext;
use crate::syntax::{first_named, is_type_comment, Expr};

/// Which group a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    Positional,
    KeywordOnly,
    VarArg,
    KwArg,
}

/// A parameter before annotation extraction.
#[derive(Debug, Clone, Copy)]
struct Param<'tree> {
    kind: ParamKind,
    name: Node<'tree>,
    annotation: Option<Node<'tree>>,
    default: Option<Node<'tree>>,
}

impl<S: DiagnosticSink> ExtractContext<'_, S> {
    /// Extracts a `function_definition` with the decorators preceding it.
    pub(super) fn extract_function(&mut self, def: Node<'_>, decorators: &[Node<'_>]) -> Function {
        let decorators: SmallVec<[Decorator; 2]> = decorators
            .iter()
            .filter_map(|&decorator| self.extract_decorator(decorator))
            .collect();

        let name = def
            .child_by_field_name("name")
            .map(|name| self.text(name))
            .unwrap_or_default();
        let mut function = Function::new(name);

        if let Some(parameters) = def.child_by_field_name("parameters") {
            self.extract_parameters(parameters, &mut function);
        }

        function.return_annotation = def
            .child_by_field_name("return_type")
            .and_then(|annotation| self.extract_annotation(annotation));

        if self.has_function_type_comment(def) {
            self.unsupported(def, "type comments");
        }

        // The body of functions is ignored.
        function.decorators = decorators;
        function
    }

    /// Keeps `@name` and `@dotted.name`; drops everything else, such as
    /// calls, with a diagnostic.
    fn extract_decorator(&mut self, decorator: Node<'_>) -> Option<Decorator> {
        let expression = first_named(decorator)?;
        match self.expr(expression) {
            Expr::Name(_) | Expr::Attribute(_) => {
                self.extract_dotted_name(expression).map(Decorator::new)
            }
            other => {
                self.warn(
                    other.node(),
                    format!("unsupported ast type '{}' for decorators", other.kind_name()),
                );
                None
            }
        }
    }

    fn extract_parameters(&mut self, parameters: Node<'_>, function: &mut Function) {
        let params = self.classify_parameters(parameters);

        let positional: SmallVec<[Param<'_>; 8]> = params
            .iter()
            .filter(|param| param.kind == ParamKind::Positional)
            .copied()
            .collect();
        let defaults: SmallVec<[Node<'_>; 4]> =
            positional.iter().filter_map(|param| param.default).collect();

        // Defaults belong to the trailing positional parameters; the parser
        // rejects a required parameter after a defaulted one.
        match rzip_longest(positional, defaults) {
            Ok(pairs) => {
                for (param, default) in pairs {
                    let argument = self.build_argument(param, default.is_some());
                    function.args.push(argument);
                }
            }
            Err(err) => self.warn(parameters, err.to_string()),
        }

        for param in params {
            match param.kind {
                ParamKind::Positional => {}
                ParamKind::KeywordOnly => {
                    let argument = self.build_argument(param, param.default.is_some());
                    function.kw_args.push(argument);
                }
                ParamKind::VarArg => function.var_arg = Some(self.build_argument(param, false)),
                ParamKind::KwArg => function.kw_arg = Some(self.build_argument(param, false)),
            }
        }
    }

    /// Sorts the children of a `parameters` node into groups, in order.
    fn classify_parameters<'t>(&mut self, parameters: Node<'t>) -> Vec<Param<'t>> {
        let mut cursor = parameters.walk();
        let children: Vec<Node<'t>> = parameters.named_children(&mut cursor).collect();

        let mut params = Vec::with_capacity(children.len());
        let mut keyword_only = false;
        let mut position_only_reported = false;
        let positional_kind = |keyword_only: bool| {
            if keyword_only {
                ParamKind::KeywordOnly
            } else {
                ParamKind::Positional
            }
        };

        for child in children {
            if child.is_extra() {
                if child.kind() == "comment" && is_type_comment(self.text(child)) {
                    self.unsupported(child, "type comments");
                }
                continue;
            }

            match child.kind() {
                "positional_separator" => {
                    // Parameters before `/` stay ordinary positional ones.
                    if !position_only_reported {
                        self.unsupported(child, "position-only arguments");
                        position_only_reported = true;
                    }
                }
                "keyword_separator" => keyword_only = true,
                "identifier" => params.push(Param {
                    kind: positional_kind(keyword_only),
                    name: child,
                    annotation: None,
                    default: None,
                }),
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    if let Some(param) = self.splat_param(parameters, child, None) {
                        keyword_only |= param.kind == ParamKind::VarArg;
                        params.push(param);
                    }
                }
                "typed_parameter" => {
                    let annotation = child.child_by_field_name("type");
                    let Some(inner) = first_named(child) else {
                        continue;
                    };
                    match inner.kind() {
                        "list_splat_pattern" | "dictionary_splat_pattern" => {
                            if let Some(param) = self.splat_param(parameters, inner, annotation) {
                                keyword_only |= param.kind == ParamKind::VarArg;
                                params.push(param);
                            }
                        }
                        _ => params.push(Param {
                            kind: positional_kind(keyword_only),
                            name: inner,
                            annotation,
                            default: None,
                        }),
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let Some(name) = child.child_by_field_name("name") else {
                        continue;
                    };
                    if name.kind() != "identifier" {
                        self.warn_unsupported_ast(child, name);
                        continue;
                    }
                    params.push(Param {
                        kind: positional_kind(keyword_only),
                        name,
                        annotation: child.child_by_field_name("type"),
                        default: child.child_by_field_name("value"),
                    });
                }
                _ => self.warn_unsupported_ast(parameters, child),
            }
        }

        params
    }

    /// `*args` or `**kwargs`, optionally annotated.
    fn splat_param<'t>(
        &mut self,
        parameters: Node<'t>,
        splat: Node<'t>,
        annotation: Option<Node<'t>>,
    ) -> Option<Param<'t>> {
        let kind = if splat.kind() == "list_splat_pattern" {
            ParamKind::VarArg
        } else {
            ParamKind::KwArg
        };
        match first_named(splat) {
            Some(name) if name.kind() == "identifier" => Some(Param {
                kind,
                name,
                annotation,
                default: None,
            }),
            _ => {
                self.warn_unsupported_ast(parameters, splat);
                None
            }
        }
    }

    fn build_argument(&mut self, param: Param<'_>, has_default: bool) -> Argument {
        let annotation = param
            .annotation
            .and_then(|annotation| self.extract_annotation(annotation));
        Argument {
            name: self.text(param.name).to_owned(),
            annotation,
            has_default,
        }
    }

    /// Looks for a `# type:` comment on the `def` line or leading the body.
    fn has_function_type_comment(&self, def: Node<'_>) -> bool {
        let mut cursor = def.walk();
        let mut comments: SmallVec<[Node<'_>; 2]> = def
            .children(&mut cursor)
            .filter(|child| child.kind() == "comment")
            .collect();
        if let Some(body) = def.child_by_field_name("body") {
            let mut cursor = body.walk();
            comments.extend(
                body.children(&mut cursor)
                    .take_while(|child| child.is_extra())
                    .filter(|child| child.kind() == "comment"),
            );
        }
        comments
            .into_iter()
            .any(|comment| is_type_comment(self.text(comment)))
    }
}
