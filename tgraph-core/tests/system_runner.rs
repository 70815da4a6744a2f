//! Integration tests for the process runner and loader against real processes.
//!
//! Shell scripts stand in for the `tuist` binary. Unix only.

#![cfg(unix)]

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tgraph_core::loader::{BINARY_PATH_ENV, FORCE_CACHE_DIRECTORY_ENV, GRAPH_FILE_NAME};
use tgraph_core::{GraphError, GraphLoader, InvocationError, ProcessRunner, RunError, SystemRunner};

// ============================================================================
// Test Utilities
// ============================================================================

/// Write an executable shell script into `dir`
fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("Failed to chmod script");
    path
}

/// A fake `tuist graph` that honours --output-path and --path
const FAKE_TOOL: &str = r#"
out=""
proj=""
while [ $# -gt 0 ]; do
  case "$1" in
    --output-path) out="$2"; shift 2 ;;
    --path) proj="$2"; shift 2 ;;
    *) shift ;;
  esac
done
name="${proj##*/}"
printf '{"name":"%s","path":"%s","projects":{"%s":{"name":"%s","path":"%s","targets":[{"name":"%s","product":"app"}]}}}' \
  "$name" "$proj" "$proj" "$name" "$proj" "$name" > "$out/graph.json"
"#;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn no_env() -> BTreeMap<String, String> {
    BTreeMap::new()
}

fn loader_for(tool: &Path, scratch_root: &Path, extra: &[(&str, &str)]) -> GraphLoader {
    let mut env: HashMap<String, String> = extra
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    env.insert(BINARY_PATH_ENV.to_string(), tool.display().to_string());
    GraphLoader::new().with_env(env).with_scratch_root(scratch_root)
}

fn assert_empty_dir(dir: &Path) {
    let entries: Vec<_> = fs::read_dir(dir).unwrap().collect();
    assert!(entries.is_empty(), "expected {} to be empty: {:?}", dir.display(), entries);
}

// ============================================================================
// Process Runner
// ============================================================================

#[test]
fn test_runner_success() {
    let dir = TempDir::new().unwrap();
    let tool = script(dir.path(), "ok", "echo 'to stdout'; exit 0");

    SystemRunner
        .run(tool.to_str().unwrap(), &[], &no_env())
        .expect("exit 0 should succeed");
}

#[test]
fn test_runner_nonzero_exit_with_stderr() {
    let dir = TempDir::new().unwrap();
    let tool = script(dir.path(), "fail", "echo 'missing config' >&2; exit 1");
    let executable = tool.to_str().unwrap();

    let err = SystemRunner
        .run(executable, &args(&["graph", "--format"]), &no_env())
        .unwrap_err();

    match err {
        RunError::Invocation(InvocationError::Terminated { command, code, stderr }) => {
            assert_eq!(command, format!("{}graph--format", executable));
            assert_eq!(code, 1);
            assert_eq!(stderr, b"missing config\n");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_runner_nonzero_exit_message() {
    let dir = TempDir::new().unwrap();
    let tool = script(dir.path(), "fail", "echo 'missing config' >&2; exit 1");

    let message = SystemRunner
        .run(tool.to_str().unwrap(), &[], &no_env())
        .unwrap_err()
        .to_string();
    assert!(message.contains("exited with error code 1"));
    assert!(message.contains("missing config"));
}

#[test]
fn test_runner_nonzero_exit_without_stderr() {
    let dir = TempDir::new().unwrap();
    let tool = script(dir.path(), "quiet", "exit 3");

    let message = SystemRunner
        .run(tool.to_str().unwrap(), &[], &no_env())
        .unwrap_err()
        .to_string();
    assert!(message.ends_with("exited with error code 3"));
}

#[test]
fn test_runner_signal() {
    let dir = TempDir::new().unwrap();
    let tool = script(dir.path(), "killed", "echo dying >&2; kill -9 $$");

    let err = SystemRunner
        .run(tool.to_str().unwrap(), &[], &no_env())
        .unwrap_err();
    match err {
        RunError::Invocation(InvocationError::Signalled { code, stderr, .. }) => {
            assert_eq!(code, 9);
            assert_eq!(stderr, b"dying\n");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_runner_spawn_failure() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    let err = SystemRunner
        .run(missing.to_str().unwrap(), &[], &no_env())
        .unwrap_err();
    assert!(matches!(err, RunError::Spawn { .. }));
}

#[test]
fn test_runner_passes_only_given_environment() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("env.txt");
    let tool = script(
        dir.path(),
        "dump",
        r#"printf '%s|%s' "$FORWARDED" "${HOME:-unset}" > "$1""#,
    );

    let mut env = BTreeMap::new();
    env.insert("FORWARDED".to_string(), "yes".to_string());
    SystemRunner
        .run(tool.to_str().unwrap(), &args(&[out.to_str().unwrap()]), &env)
        .unwrap();

    assert_eq!(fs::read_to_string(&out).unwrap(), "yes|unset");
}

// ============================================================================
// Graph Loader
// ============================================================================

#[test]
fn test_loader_end_to_end() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let tool = script(bin.path(), "tuist", FAKE_TOOL);

    let graph = loader_for(&tool, scratch.path(), &[])
        .graph(Some(Path::new("/work/App")), Vec::<String>::new())
        .unwrap();

    assert_eq!(graph.name, "App");
    assert_eq!(graph.path, "/work/App");
    assert_eq!(graph.find_target("App").unwrap().1.product, "app");
    assert_empty_dir(scratch.path());
}

#[test]
fn test_loader_without_path_argument() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let tool = script(bin.path(), "tuist", FAKE_TOOL);

    let graph = loader_for(&tool, scratch.path(), &[])
        .graph(None, Vec::<String>::new())
        .unwrap();

    assert_eq!(graph.path, "");
    assert_empty_dir(scratch.path());
}

#[test]
fn test_loader_forwards_environment() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let tool = script(
        bin.path(),
        "tuist",
        r#"
while [ $# -gt 0 ]; do
  case "$1" in
    --output-path) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf '{"name":"%s|%s|%s"}' "$TOKEN" "${EMPTY-absent}" "$TUIST_CONFIG_FORCE_CONFIG_CACHE_DIRECTORY" > "$out/graph.json"
"#,
    );

    let loader = loader_for(
        &tool,
        scratch.path(),
        &[("TOKEN", "abc"), ("EMPTY", ""), (FORCE_CACHE_DIRECTORY_ENV, "/cache")],
    );
    let graph = loader.graph(None, ["TOKEN", "EMPTY"]).unwrap();

    assert_eq!(graph.name, "abc|absent|/cache");
}

#[test]
fn test_loader_failure_cleans_scratch() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let tool = script(bin.path(), "tuist", "echo 'missing config' >&2; exit 1");

    let err = loader_for(&tool, scratch.path(), &[])
        .graph(None, Vec::<String>::new())
        .unwrap_err();

    assert!(matches!(err, GraphError::Invocation(InvocationError::Terminated { code: 1, .. })));
    let message = err.to_string();
    assert!(message.contains('1'));
    assert!(message.contains("missing config"));
    assert_empty_dir(scratch.path());
}

#[test]
fn test_loader_missing_output_cleans_scratch() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let tool = script(bin.path(), "tuist", "exit 0");

    let err = loader_for(&tool, scratch.path(), &[])
        .graph(None, Vec::<String>::new())
        .unwrap_err();

    assert!(matches!(err, GraphError::ReadOutput { .. }));
    assert_empty_dir(scratch.path());
}

#[test]
fn test_loader_malformed_output_cleans_scratch() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let tool = script(
        bin.path(),
        "tuist",
        &format!(
            r#"
while [ $# -gt 0 ]; do
  case "$1" in
    --output-path) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf 'garbage' > "$out/{}"
"#,
            GRAPH_FILE_NAME
        ),
    );

    let err = loader_for(&tool, scratch.path(), &[])
        .graph(None, Vec::<String>::new())
        .unwrap_err();

    assert!(matches!(err, GraphError::Decode(_)));
    assert_empty_dir(scratch.path());
}

#[test]
fn test_loader_concurrent_calls() {
    let bin = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let tool = script(bin.path(), "tuist", FAKE_TOOL);
    let loader = loader_for(&tool, scratch.path(), &[]);

    let (a, b) = std::thread::scope(|scope| {
        let a = scope.spawn(|| loader.graph(Some(Path::new("/work/Alpha")), Vec::<String>::new()));
        let b = scope.spawn(|| loader.graph(Some(Path::new("/work/Beta")), Vec::<String>::new()));
        (a.join().unwrap().unwrap(), b.join().unwrap().unwrap())
    });

    assert_eq!(a.name, "Alpha");
    assert_eq!(b.name, "Beta");
    assert!(a.find_target("Beta").is_none());
    assert!(b.find_target("Alpha").is_none());
    assert_empty_dir(scratch.path());
}
