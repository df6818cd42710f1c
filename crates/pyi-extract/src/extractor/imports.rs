//! `import` and `from ... import` statements.
//!
//! Imports are kept verbatim. Pruning them to the names the stub actually
//! uses would need name resolution, which the extractor does not do.

use pyi_core::{DiagnosticSink, DottedName, Import, ImportFrom, ImportedName};
use tree_sitter::Node;

use super::ExtractContext;
use crate::syntax::statements;

impl<S: DiagnosticSink> ExtractContext<'_, S> {
    /// Splits `import a, b as c` into one [`Import`] per name.
    pub(super) fn extract_import(&self, stmt: Node<'_>) -> Vec<Import> {
        let mut cursor = stmt.walk();
        let names: Vec<Node<'_>> = stmt.children_by_field_name("name", &mut cursor).collect();
        names
            .into_iter()
            .map(|node| {
                let (name, alias) = self.imported_name(node);
                Import {
                    name: DottedName::new(name),
                    alias,
                }
            })
            .collect()
    }

    /// Handles both `from m import ...` and `from __future__ import ...`.
    pub(super) fn extract_import_from(&self, stmt: Node<'_>) -> ImportFrom {
        let (module, level) = match stmt.child_by_field_name("module_name") {
            Some(relative) if relative.kind() == "relative_import" => {
                let mut level = 0;
                let mut module = String::new();
                for part in statements(relative) {
                    match part.kind() {
                        "import_prefix" => {
                            level = self.text(part).chars().filter(|&c| c == '.').count();
                        }
                        _ => module = self.dotted_text(part),
                    }
                }
                (module, u32::try_from(level).unwrap_or(u32::MAX))
            }
            Some(absolute) => (self.dotted_text(absolute), 0),
            None => ("__future__".to_owned(), 0),
        };

        let mut names: Vec<ImportedName> = Vec::new();
        let mut cursor = stmt.walk();
        for node in stmt.children_by_field_name("name", &mut cursor) {
            let (name, alias) = self.imported_name(node);
            names.push(ImportedName { name, alias });
        }
        if statements(stmt).any(|child| child.kind() == "wildcard_import") {
            names.push(ImportedName::new("*", None));
        }

        ImportFrom::new(module, level, names)
    }

    fn imported_name(&self, node: Node<'_>) -> (String, Option<String>) {
        if node.kind() == "aliased_import" {
            let name = node
                .child_by_field_name("name")
                .map(|name| self.dotted_text(name))
                .unwrap_or_default();
            let alias = node
                .child_by_field_name("alias")
                .map(|alias| self.text(alias).to_owned());
            (name, alias)
        } else {
            (self.dotted_text(node), None)
        }
    }

    /// Joins the segments of a `dotted_name`, dropping any whitespace
    /// between them.
    fn dotted_text(&self, node: Node<'_>) -> String {
        if node.kind() == "dotted_name" {
            statements(node)
                .map(|segment| self.text(segment))
                .collect::<Vec<_>>()
                .join(".")
        } else {
            self.text(node).to_owned()
        }
    }
}
