//! End-to-end tests running the `dachs` binary.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn dachs(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dachs"))
        .args(args)
        .current_dir(dir)
        .env_remove("DACHS_LIB_PATH")
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn test_print_tokens() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.dcs"), "func main; end").unwrap();

    let out = dachs(&["--tokens", "main.dcs"], dir.path());
    assert!(out.status.success());
    insta::assert_snapshot!(stdout(&out), @r"
    <FUNC:func>(1:1:0-1:5:4)
    <IDENT:main>(1:6:5-1:10:9)
    <SEMICOLON:;>(1:10:9-1:11:10)
    <END:end>(1:12:11-1:15:14)
    <EOF:>(1:15:14-1:15:14)
    ");
}

#[test]
fn test_print_ast_with_modules() {
    let dir: TempDir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("main.dcs"),
        "import .util.helper\nfunc main\n  helper()\nend\n",
    )
    .unwrap();
    fs::write(dir.path().join("util.dcs"), "func helper; end\n").unwrap();

    let out = dachs(&["--ast", "main.dcs"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = stdout(&out);
    let headers: Vec<&str> = text.lines().filter(|l| l.starts_with("AST of ")).collect();
    assert_eq!(headers.len(), 2, "{}", text);
    assert!(headers[0].ends_with("main.dcs:"));
    assert!(headers[1].ends_with("util.dcs:"));
    assert!(text.contains("Function helper()"), "{}", text);
}

#[test]
fn test_check_reads_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_dachs"))
        .current_dir(dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"func main\n  print(1)\nend\n")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn test_failure_exits_with_status_4() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.dcs"), "func main(\n").unwrap();

    let out = dachs(&["bad.dcs"], dir.path());
    assert_eq!(out.status.code(), Some(4));
    assert!(!out.stderr.is_empty());
}

#[test]
fn test_missing_file_exits_with_status_4() {
    let dir = tempfile::tempdir().unwrap();
    let out = dachs(&["--tokens", "nowhere.dcs"], dir.path());
    assert_eq!(out.status.code(), Some(4));
}

#[test]
fn test_unknown_log_component() {
    let dir = tempfile::tempdir().unwrap();
    let out = dachs(&["--log", "Codegen", "main.dcs"], dir.path());
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown log component 'Codegen'"));
}
