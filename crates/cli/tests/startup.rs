//! Startup failures must exit non-zero before any work is done.

use std::process::Command;

use tempfile::TempDir;

/// Run the binary in `dir` with a quiet logger.
fn autotss(dir: &TempDir, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_autotss"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("AUTOTSS_CONFIG")
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to run autotss")
}

#[test]
fn test_missing_generator_path_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let output = autotss(&dir, &["-p", "/nonexistent/tsschecker"]);

    assert!(!output.status.success());
    // Nothing was created: the run stopped before opening the database
    assert!(!dir.path().join("autotss.db").exists());
}

#[cfg(unix)]
#[test]
fn test_non_executable_generator_path_exits_non_zero() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let fake = dir.path().join("tsschecker");
    std::fs::write(&fake, "#!/bin/sh\necho 'Version: abc - 999'\n").unwrap();
    std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o644)).unwrap();

    let output = autotss(&dir, &["--path", fake.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(!dir.path().join("autotss.db").exists());
}

#[cfg(unix)]
#[test]
fn test_generator_below_minimum_version_exits_non_zero() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let old = dir.path().join("tsschecker_old");
    std::fs::write(&old, "#!/bin/sh\necho 'Version: x - 100'\n").unwrap();
    std::fs::set_permissions(&old, std::fs::Permissions::from_mode(0o755)).unwrap();

    let output = autotss(&dir, &["-p", old.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(!dir.path().join("autotss.db").exists());
}

#[test]
fn test_missing_explicit_config_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_autotss"))
        .current_dir(dir.path())
        .env("AUTOTSS_CONFIG", dir.path().join("missing.toml"))
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to run autotss");

    assert!(!output.status.success());
}

#[test]
fn test_help_mentions_path_flag() {
    let dir = TempDir::new().unwrap();
    let output = autotss(&dir, &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--path"));
}
