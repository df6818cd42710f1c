//! Conversion of real files in temporary directories.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use pyi_core::Config;
use pyi_scanner::{Converter, ScanError};
use tempfile::TempDir;

fn temp_dir() -> (TempDir, Utf8PathBuf) {
    let dir = tempfile::Builder::new()
        .prefix("pyi-scanner")
        .tempdir()
        .expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    (dir, root)
}

fn write(path: &Utf8Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write file");
}

fn read(path: &Utf8Path) -> String {
    fs::read_to_string(path).expect("read file")
}

fn convert(config: Config, inputs: &[Utf8PathBuf]) -> (pyi_scanner::ConversionReport, String) {
    let diagnostics = Mutex::new(Vec::<u8>::new());
    let report = Converter::new(config)
        .convert_inputs(inputs, &diagnostics)
        .expect("conversion runs");
    let diagnostics = String::from_utf8(diagnostics.into_inner()).expect("utf-8 diagnostics");
    (report, diagnostics)
}

#[test]
fn test_converts_directory_tree() {
    let (_dir, root) = temp_dir();
    write(&root.join("pkg/a.py"), "x = 1\ndef f(a, b=2): return a\n");
    write(&root.join("pkg/sub/b.py"), "class B:\n    pass\n");
    write(&root.join("pkg/__pycache__/c.py"), "y = 1\n");
    write(&root.join("pkg/notes.txt"), "not python\n");

    let (report, diagnostics) = convert(Config::default(), &[root.join("pkg")]);

    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(report.stats.total, 2);
    assert_eq!(report.stats.converted, 2);
    assert!(diagnostics.is_empty());

    assert_eq!(read(&root.join("pkg/a.pyi")), "x: int\ndef f(a, b=...): ...\n");
    assert_eq!(read(&root.join("pkg/sub/b.pyi")), "class B: ...\n");
    assert!(!root.join("pkg/__pycache__/c.pyi").exists());
    assert!(!root.join("pkg/notes.txt.pyi").exists());
}

#[test]
fn test_explicit_file_without_py_extension() {
    let (_dir, root) = temp_dir();
    let script = root.join("tool");
    write(&script, "import sys\n");

    let (report, _) = convert(Config::default(), &[script]);

    assert_eq!(report.stats.converted, 1);
    assert_eq!(read(&root.join("tool.pyi")), "import sys\n");
}

#[test]
fn test_existing_stub_is_kept_without_overwrite() {
    let (_dir, root) = temp_dir();
    let source = root.join("mod.py");
    let target = root.join("mod.pyi");
    write(&source, "x = 1\n");
    write(&target, "# hand written\n");

    let (report, _) = convert(Config::default(), &[source.clone()]);

    assert_eq!(report.stats.skipped, 1);
    assert_eq!(report.stats.converted, 0);
    match report.errors.as_slice() {
        [err @ ScanError::TargetExists { path }] => {
            assert_eq!(path, &target);
            assert_eq!(err.to_string(), format!("file '{target}' already exists"));
        }
        other => panic!("expected TargetExists, got {other:?}"),
    }
    assert_eq!(read(&target), "# hand written\n");

    let mut config = Config::default();
    config.scan.overwrite = true;
    let (report, _) = convert(config, &[source]);

    assert!(report.errors.is_empty());
    assert_eq!(read(&target), "x: int\n");
}

#[test]
fn test_invalid_python_is_reported_and_not_written() {
    let (_dir, root) = temp_dir();
    let good = root.join("good.py");
    let bad = root.join("bad.py");
    write(&good, "y = 'a'\n");
    write(&bad, "def broken(:\n    pass\n");

    let (report, _) = convert(Config::default(), &[bad.clone(), good]);

    assert_eq!(report.stats.total, 2);
    assert_eq!(report.stats.converted, 1);
    assert_eq!(report.stats.failed, 1);
    match report.errors.as_slice() {
        [err @ ScanError::Parse { path, .. }] => {
            assert_eq!(path, &bad);
            assert!(err.to_string().starts_with(&format!("invalid Python file '{bad}': ")));
        }
        other => panic!("expected Parse, got {other:?}"),
    }
    assert!(!root.join("bad.pyi").exists());
    assert_eq!(read(&root.join("good.pyi")), "y: str\n");
}

#[test]
fn test_missing_input_is_reported() {
    let (_dir, root) = temp_dir();
    let missing = root.join("missing.py");

    let (report, _) = convert(Config::default(), &[missing.clone()]);

    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path(), Some(&missing));
}

#[test]
fn test_diagnostics_are_written_per_file() {
    let (_dir, root) = temp_dir();
    let source = root.join("noisy.py");
    write(&source, "x = None\nprint(x)\nasync def f(): pass\n");

    let (report, diagnostics) = convert(Config::default(), &[source.clone()]);

    assert_eq!(report.stats.diagnostics, 2);
    assert_eq!(
        diagnostics,
        format!(
            "WARNING:{source}:2:unsupported ast type 'call' in 'expression_statement'\n\
             WARNING:{source}:3:unsupported ast type 'async_function_definition' at top-level\n"
        )
    );
    assert_eq!(read(&root.join("noisy.pyi")), "x: Optional[Any]\n");
}

#[test]
fn test_required_imports_and_job_limit() {
    let (_dir, root) = temp_dir();
    for index in 0..8 {
        write(&root.join(format!("m{index}.py")), "items = []\n");
    }

    let mut config = Config::default();
    config.generate.emit_required_imports = true;
    config.scan.max_parallel_jobs = Some(2);
    let (report, _) = convert(config, &[root.clone()]);

    assert_eq!(report.stats.converted, 8);
    assert_eq!(
        read(&root.join("m3.pyi")),
        "from typing import Any, List\n\nitems: List[Any]\n"
    );
}
