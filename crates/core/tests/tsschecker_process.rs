//! Runs the real process-backed generator against a stand-in shell script.
//!
//! Everything lives in one test: writing and executing scripts from
//! parallel tests in the same binary can fail with ETXTBSY.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use autotss_core::{
    ensure_min_version, testing::fixtures, ArchiveOutcome, BlobArchiver, Generator,
    GeneratorError, TsscheckerGenerator,
};

/// Prints a version banner when run bare. Otherwise saves for build B100
/// only, and echoes its arguments.
const FAKE_TSSCHECKER: &str = r#"#!/bin/sh
if [ "$#" -eq 0 ]; then
    echo "Version: 3f3e10a6d89c2f6a8e7c2ac6f35a7b1d57a7ffc3 - 247"
    echo "released by tihmstar"
    exit 1
fi
echo "args: $*"
for arg in "$@"; do
    if [ "$arg" = "B100" ]; then
        echo "[TSSC] opening firmware.json"
        echo "Saved shsh blobs!   "
        exit 0
    fi
done
echo "[Error] ERROR: TSS request failed" >&2
echo "[TSSC] checking tss status failed!"
exit 0
"#;

fn write_script(dir: &Path, name: &str, contents: &str, mode: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
    path
}

#[tokio::test]
async fn test_tsschecker_process_lifecycle() {
    let dir = TempDir::new().unwrap();
    let script = write_script(dir.path(), "tsschecker", FAKE_TSSCHECKER, 0o755);
    let silent = write_script(dir.path(), "silent", "#!/bin/sh\nexit 0\n", 0o755);
    let plain = write_script(dir.path(), "plain", FAKE_TSSCHECKER, 0o644);

    // Operator-supplied paths are checked up front
    assert!(matches!(
        TsscheckerGenerator::from_user_path(dir.path().join("missing")),
        Err(GeneratorError::NotFound { .. })
    ));
    assert!(matches!(
        TsscheckerGenerator::from_user_path(&plain),
        Err(GeneratorError::NotExecutable { .. })
    ));
    assert!(matches!(
        TsscheckerGenerator::from_user_path(dir.path()),
        Err(GeneratorError::NotExecutable { .. })
    ));

    // Version probe reads the first banner line, whatever the exit code
    let generator = TsscheckerGenerator::from_user_path(&script).unwrap();
    assert_eq!(generator.version().await.unwrap(), 247);
    assert_eq!(ensure_min_version(&generator, 247).await.unwrap(), 247);
    assert!(matches!(
        ensure_min_version(&generator, 248).await,
        Err(GeneratorError::VersionTooOld {
            found: 247,
            minimum: 248
        })
    ));

    let silent_generator = TsscheckerGenerator::new(&silent);
    assert!(matches!(
        silent_generator.version().await,
        Err(GeneratorError::NoVersionOutput { .. })
    ));

    let missing_generator = TsscheckerGenerator::new(dir.path().join("missing"));
    assert!(matches!(
        missing_generator.invoke(&[]).await,
        Err(GeneratorError::NotFound { .. })
    ));

    // Lines are captured trimmed, stderr is not captured
    let output = generator
        .invoke(&["--buildid".to_string(), "B100".to_string()])
        .await
        .unwrap();
    assert_eq!(output.exit_code, Some(0));
    assert_eq!(
        output.lines,
        vec![
            "args: --buildid B100".to_string(),
            "[TSSC] opening firmware.json".to_string(),
            "Saved shsh blobs!".to_string(),
        ]
    );

    // Through the archiver: one saved pair, one failed pair
    let blobs_dir = dir.path().join("blobs");
    let archiver = BlobArchiver::new(generator.clone(), &blobs_dir);
    let mut device = fixtures::device("Phone", "iPhone10,3", "E1");

    let outcome = archiver.archive(&mut device, "B100", "14.0").await.unwrap();
    let save_path = blobs_dir.join("iPhone10,3").join("E1").join("14.0").join("B100");
    assert_eq!(outcome, ArchiveOutcome::Saved { save_path });
    assert!(device.has_blob("B100"));

    let outcome = archiver.archive(&mut device, "B101", "14.1").await.unwrap();
    let log_path = blobs_dir
        .join("iPhone10,3")
        .join("E1")
        .join("14.1")
        .join("B101")
        .join("tsschecker_log.txt");
    assert_eq!(
        outcome,
        ArchiveOutcome::Failed {
            log_path: log_path.clone()
        }
    );
    assert!(!device.has_blob("B101"));

    let log = std::fs::read_to_string(&log_path).unwrap();
    let (invocation, output) = log.split_once("\n\n").unwrap();
    assert!(invocation.starts_with(&script.to_string_lossy().to_string()));
    assert!(invocation.contains("--boardconfig d22ap --buildid B101"));
    assert!(output.ends_with("[TSSC] checking tss status failed!"));
    assert!(!output.contains("TSS request failed"));
}
