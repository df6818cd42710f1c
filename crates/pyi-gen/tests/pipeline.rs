//! Source-to-stub tests through the extractor and the generator.

use pyi_core::{Diagnostic, ExtractConfig, GenerateConfig, Module};
use pyi_extract::{extract_str, Extraction};
use pyi_gen::Generator;

fn extract(source: &str) -> Extraction {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    extract_str(source, "test.py", &ExtractConfig::default(), &mut diagnostics)
        .expect("valid source")
}

fn stub(source: &str) -> String {
    pyi_gen::generate(&extract(source).module)
}

fn reextract(module: &Module) -> Module {
    extract(&pyi_gen::generate(module)).module
}

#[test]
fn test_docstring_only_renders_nothing() {
    assert_eq!(stub("'''Docstring.'''\n"), "");
    assert_eq!(stub("\n\n"), "");
}

#[test]
fn test_imports() {
    assert_eq!(stub("import os as so\n"), "import os as so\n");
    assert_eq!(stub("import os, sys\n"), "import os\nimport sys\n");
}

#[test]
fn test_function_bodies_are_erased() {
    assert_eq!(stub("def foo(x, y):  pass\n"), "def foo(x, y): ...\n");
    assert_eq!(
        stub("def foo(*, x, y: str = ''):  pass\n"),
        "def foo(*, x, y: str = ...): ...\n"
    );
}

#[test]
fn test_placeholder_class_bodies_collapse() {
    let source = "class Foo:\n    '''Docstring.'''\n    pass\n    ...\n";
    assert_eq!(stub(source), "class Foo: ...\n");
}

#[test]
fn test_inferred_attributes() {
    assert_eq!(stub("x = None\n"), "x: Optional[Any]\n");
    assert_eq!(stub("x = 3.3\n"), "x: float\n");
}

#[test]
fn test_class_tuple_assignment() {
    insta::assert_snapshot!(stub("class Foo:\n  x, y = 1, 2\n"), @r"
class Foo:
    x: ClassVar[Any]
    y: ClassVar[Any]
");
}

#[test]
fn test_branch_union() {
    let source = "\
if sys.platform == 'win32':
    def f(a): ...
else:
    def f(a, b): ...
";
    assert_eq!(stub(source), "def f(a): ...\ndef f(a, b): ...\n");

    let guarded = "\
if TYPE_CHECKING:
    from m import T
else:
    T = object
";
    assert_eq!(stub(guarded), "from m import T\n");
}

#[test]
fn test_required_imports_are_emitted_on_request() {
    let extraction = extract("x = None\nclass C:\n    y = 1\n");
    let config = GenerateConfig {
        emit_required_imports: true,
    };
    let text = Generator::new(config)
        .with_required_imports(&extraction.required_imports)
        .generate_to_string(&extraction.module);

    insta::assert_snapshot!(text, @r"
from typing import Any, ClassVar, Optional

x: Optional[Any]
class C:
    y: ClassVar[Any]
");
}

const FULL_SOURCE: &str = r#"
'''A module exercising most stub constructs.'''
import os
import os.path as osp
from . import sibling
from ..pkg.mod import a as b, c
from typing import *

CONSTANT = 1
NAME = 'x'
maybe = None
items = []
Alias = List[int]
x, y = 1, 2.0
annotated: Dict[str, int] = {}

@decorator
@pkg.decorator
def function(a, b: int, c=1, d: str = '', *args, e, f: int = 2, **kwargs) -> Optional[str]:
    return None

def only_keywords(*, key): ...

class Empty: pass

class Full(Base, pkg.Other, Generic[T]):
    '''Docstring.'''
    counter = 0
    name: str
    limit: ClassVar[int] = 3

    def method(self, value: 'Forward') -> None: ...

    @property
    def prop(self):
        return self.name
"#;

#[test]
fn test_full_module() {
    insta::assert_snapshot!(stub(FULL_SOURCE), @r"
import os
import os.path as osp
from . import sibling
from ..pkg.mod import a as b, c
from typing import *

CONSTANT: int
NAME: str
maybe: Optional[Any]
items: List[Any]
Alias = List[int]
x: int
y: float
annotated: Dict[str, int]
@decorator
@pkg.decorator
def function(a, b: int, c=..., d: str = ..., *args, e, f: int = ..., **kwargs) -> Optional[str]: ...
def only_keywords(*, key): ...
class Empty: ...
class Full(Base, pkg.Other, Generic[T]):
    counter: ClassVar[Any]
    name: str
    limit: ClassVar[int]
    def method(self, value: Forward) -> None: ...
    @property
    def prop(self): ...
");
}

#[test]
fn test_round_trip_preserves_tree() {
    let module = extract(FULL_SOURCE).module;
    assert_eq!(reextract(&module), module);
}

#[test]
fn test_generation_is_idempotent() {
    let first = stub(FULL_SOURCE);
    let second = stub(&first);
    assert_eq!(first, second);
}

#[test]
fn test_generated_stub_has_no_diagnostics() {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let text = stub(FULL_SOURCE);
    extract_str(&text, "out.pyi", &ExtractConfig::default(), &mut diagnostics)
        .expect("generated stub parses");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}
