//! Cross-process determinism for sequential routing traces.
//!
//! Spawns the `trace_fixture` binary under several environment variants
//! and asserts all produce identical output.

use std::path::Path;
use std::process::Command;

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = env!("CARGO_BIN_EXE_trace_fixture");

    let mut command = Command::new(bin);
    command.current_dir(work_dir);

    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE");

    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });

    assert!(
        output.status.success(),
        "trace_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

fn field<'a>(output: &'a str, key: &str) -> &'a str {
    output
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
        .unwrap_or_else(|| panic!("output missing {key}: {output}"))
}

// ACCEPTANCE: GRID-TRACE-CROSSPROC
#[test]
fn crossproc_trace_determinism_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    assert!(field(&baseline, "trace_digest").starts_with("sha256:"));
    assert_eq!(field(&baseline, "route_cost"), "31.000000");
    assert_eq!(field(&baseline, "route_len"), "32");
    let path: Vec<(i32, i32)> = serde_json::from_str(field(&baseline, "route_json")).unwrap();
    assert_eq!(path.first(), Some(&(0, 0)));
    assert_eq!(path.last(), Some(&(20, 20)));

    // Variant 2: different cwd.
    let alt_cwd = std::env::temp_dir();
    let alt_cwd = alt_cwd.to_string_lossy();
    let variant_cwd = run_variant(&alt_cwd, &[]);
    assert_eq!(
        baseline, variant_cwd,
        "output differs when cwd changes from {root} to {alt_cwd}"
    );

    // Variant 3: different locale env.
    let variant_locale = run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(baseline, variant_locale, "output differs under LC_ALL=C");

    // Variant 4: verbose logging requested; the library installs no
    // subscriber, so stdout must not change.
    let variant_log = run_variant(&root, &[("RUST_LOG", "trace")]);
    assert_eq!(baseline, variant_log, "output differs under RUST_LOG=trace");
}

#[test]
fn fixture_size_argument_changes_digest() {
    let bin = env!("CARGO_BIN_EXE_trace_fixture");
    let output = Command::new(bin).arg("14").output().unwrap();
    assert!(output.status.success());
    let small = String::from_utf8(output.stdout).unwrap();
    assert_eq!(field(&small, "route_cost"), "19.000000");

    let baseline = run_variant(&workspace_root(), &[]);
    assert_ne!(field(&small, "trace_digest"), field(&baseline, "trace_digest"));
}
