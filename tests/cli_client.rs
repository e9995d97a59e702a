//! E2E tests for client-side function output.

mod common;

use std::fs;
use std::io::Write;
use std::process::Stdio;
use tempfile::tempdir;

use common::{pugc, write_file};

#[test]
fn client_mode_emits_named_function() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("index.pug"), "h1.title Pug");

    let output = pugc()
        .args(["--client", "--name", "foo", "index.pug"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let js = fs::read_to_string(dir.path().join("index.js")).unwrap();
    assert!(js.starts_with("function foo(locals)"), "{js}");
    assert!(js.contains("<h1 class=\\\"title\\\">Pug</h1>"), "{js}");
}

#[test]
fn client_mode_includes_debug_filename_by_default() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("index.pug"), "p hi");

    pugc()
        .args(["--client", "index.pug"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    let js = fs::read_to_string(dir.path().join("index.js")).unwrap();
    assert!(js.contains("pug_debug_filename"), "{js}");
    assert!(js.contains("index.pug"), "{js}");
}

#[test]
fn no_debug_strips_debug_filename() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("index.pug"), "p hi");

    pugc()
        .args(["--client", "--no-debug", "index.pug"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    let js = fs::read_to_string(dir.path().join("index.js")).unwrap();
    assert!(!js.contains("pug_debug_filename"), "{js}");
}

#[test]
fn unnamed_client_function_defaults_to_template() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("index.pug"), "p hi");

    pugc()
        .args(["--client", "index.pug"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    let js = fs::read_to_string(dir.path().join("index.js")).unwrap();
    assert!(js.starts_with("function template(locals)"), "{js}");
}

#[test]
fn name_after_file_derives_camel_case_names() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("user-card.pug"), "p card");

    pugc()
        .args(["--client", "--name-after-file", "user-card.pug"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    let js = fs::read_to_string(dir.path().join("user-card.js")).unwrap();
    assert!(js.starts_with("function userCardTemplate(locals)"), "{js}");
}

#[test]
fn explicit_name_beats_name_after_file() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("user-card.pug"), "p card");

    pugc()
        .args(["--client", "--name-after-file", "--name", "chosen", "user-card.pug"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    let js = fs::read_to_string(dir.path().join("user-card.js")).unwrap();
    assert!(js.starts_with("function chosen(locals)"), "{js}");
}

#[test]
fn name_without_client_is_rejected() {
    let output = pugc().args(["--name", "foo", "a.pug"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn stdin_client_mode_writes_function_to_stdout() {
    let mut child = pugc()
        .args(["--client", "--no-debug", "--name", "greet"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(b"h1 Pug!")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let js = String::from_utf8_lossy(&output.stdout);
    assert!(js.starts_with("function greet(locals)"), "{js}");
    assert!(js.contains("<h1>Pug!</h1>"), "{js}");
}
