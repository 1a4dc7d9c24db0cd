//! Architecture guard tests for deepint-core.
//!
//! These tests scan source files to enforce design-level consistency:
//! - Error types derive thiserror, no hand-written Display
//! - No `Result<_, String>` (use DeepintResult)
//! - No `unwrap()`/`expect()` outside tests
//! - Environment variables are read by the config loader only
//! - No blocking sleeps in async code
//!
//! Run: `cargo test --package deepint-core --test architecture_guards -- --nocapture`

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Walk `dir` recursively, collecting .rs files that are not test-only.
fn collect_source_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_source_files(&path));
            } else if path.extension().is_some_and(|e| e == "rs") && !is_test_file(&path) {
                files.push(path);
            }
        }
    }
    files
}

fn is_test_file(path: &Path) -> bool {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    name == "tests.rs" || name == "test_support.rs" || name.ends_with("_tests.rs")
}

fn src_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")
}

fn rel(path: &Path) -> String {
    path.strip_prefix(src_dir())
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Non-comment lines before the inline `mod tests` block, with line numbers
fn production_lines(content: &str) -> Vec<(usize, &str)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.starts_with("mod tests {"))
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.starts_with("//"))
        .collect()
}

/// Run `detect` over every production line, panicking with a report on hits
fn guard(rule: &str, hint: &str, allowlist: &[&str], detect: impl Fn(&str) -> bool) {
    let allowlist: HashSet<&str> = allowlist.iter().copied().collect();
    let mut violations = Vec::new();

    for file in collect_source_files(&src_dir()) {
        let relative = rel(&file);
        if allowlist.contains(relative.as_str()) {
            continue;
        }
        let Ok(content) = fs::read_to_string(&file) else {
            continue;
        };
        for (line_no, line) in production_lines(&content) {
            if detect(line) {
                violations.push(format!("  {}:{} -> {}", relative, line_no, line));
            }
        }
    }

    if !violations.is_empty() {
        panic!("\n[{rule}] {hint}\n\n{}\n", violations.join("\n"));
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[test]
fn test_error_types_use_thiserror() {
    guard(
        "DI-ERR-01",
        "Hand-written Display for an error type. Derive thiserror::Error instead.",
        &[],
        |line| line.starts_with("impl") && line.contains("Display for") && line.contains("Error"),
    );
}

#[test]
fn test_no_result_string() {
    guard(
        "DI-ERR-02",
        "Result<_, String> found. Use DeepintResult.",
        &[],
        |line| {
            line.find("Result")
                .is_some_and(|pos| line[pos..].contains(", String>"))
        },
    );
}

#[test]
fn test_no_unwrap_outside_tests() {
    guard(
        "DI-ERR-03",
        "unwrap()/expect() in production code. Propagate a DeepintError instead.",
        // Regexes compiled from literals
        &["http/error_utils.rs"],
        |line| line.contains(".unwrap()") || line.contains(".expect("),
    );
}

#[test]
fn test_env_read_only_by_loader() {
    guard(
        "DI-CFG-01",
        "Environment read outside the config loader.",
        &["config/loader.rs"],
        |line| line.contains("env::var"),
    );
}

#[test]
fn test_no_blocking_sleep() {
    guard(
        "DI-ASYNC-01",
        "std::thread::sleep blocks the runtime. Use tokio::time::sleep.",
        &[],
        |line| line.contains("thread::sleep"),
    );
}
