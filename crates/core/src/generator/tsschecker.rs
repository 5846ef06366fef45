//! tsschecker-backed generator implementation.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use super::error::GeneratorError;
use super::traits::Generator;
use super::types::GeneratorOutput;

/// Trailing build number, after the last `-` when there is one.
static VERSION_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|-)\s*(\d+)\s*$").expect("valid version regex"));

/// Runs a tsschecker binary.
#[derive(Debug, Clone)]
pub struct TsscheckerGenerator {
    path: PathBuf,
}

impl TsscheckerGenerator {
    /// Generator at `path`; a bare name is resolved through `PATH` on spawn.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Generator at a path supplied by the operator, which must already be
    /// an executable file.
    pub fn from_user_path(path: impl Into<PathBuf>) -> Result<Self, GeneratorError> {
        let path = path.into();
        ensure_executable(&path)?;
        Ok(Self { path })
    }
}

/// Checks that `path` is an existing, executable regular file.
pub fn ensure_executable(path: &Path) -> Result<(), GeneratorError> {
    let metadata = std::fs::metadata(path).map_err(|_| GeneratorError::NotFound {
        path: path.to_path_buf(),
    })?;

    if !metadata.is_file() || !is_executable(&metadata) {
        return Err(GeneratorError::NotExecutable {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}

/// Extracts the build number from the first line of tsschecker's banner,
/// e.g. `Version: 3f3e10a6d89c2f6a8e7c2ac6f35a7b1d57a7ffc3 - 247`.
pub fn parse_version_line(line: &str) -> Result<u32, GeneratorError> {
    let unparseable = || GeneratorError::UnparseableVersion {
        line: line.to_string(),
    };

    VERSION_NUMBER
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(unparseable)
}

#[async_trait]
impl Generator for TsscheckerGenerator {
    fn program(&self) -> &Path {
        &self.path
    }

    async fn invoke(&self, args: &[String]) -> Result<GeneratorOutput, GeneratorError> {
        debug!("Running {} {}", self.path.display(), args.join(" "));

        let mut child = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| GeneratorError::from_spawn(&self.path, e))?;

        let mut lines = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            let mut reader = BufReader::new(stdout);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf).await? == 0 {
                    break;
                }
                lines.push(String::from_utf8_lossy(&buf).trim().to_string());
            }
        }

        let status = child.wait().await?;
        Ok(GeneratorOutput::new(status.code(), lines))
    }

    async fn version(&self) -> Result<u32, GeneratorError> {
        let output = Command::new(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| GeneratorError::from_spawn(&self.path, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let first_line = stdout
            .lines()
            .next()
            .ok_or_else(|| GeneratorError::NoVersionOutput {
                path: self.path.clone(),
            })?;

        parse_version_line(first_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_line_banner() {
        let line = "Version: 3f3e10a6d89c2f6a8e7c2ac6f35a7b1d57a7ffc3 - 247";
        assert_eq!(parse_version_line(line).unwrap(), 247);
    }

    #[test]
    fn test_parse_version_line_takes_last_hyphen_segment() {
        assert_eq!(parse_version_line("Version: 1-2-3 - 300").unwrap(), 300);
        assert_eq!(parse_version_line("Version: abc - 247").unwrap(), 247);
    }

    #[test]
    fn test_parse_version_line_no_spaces() {
        assert_eq!(parse_version_line("tsschecker-304").unwrap(), 304);
    }

    #[test]
    fn test_parse_version_line_bare_number() {
        assert_eq!(parse_version_line(" 251 \n").unwrap(), 251);
    }

    #[test]
    fn test_parse_version_line_garbage() {
        let err = parse_version_line("usage: tsschecker [OPTIONS]").unwrap_err();
        assert!(matches!(err, GeneratorError::UnparseableVersion { .. }));
    }

    #[test]
    fn test_ensure_executable_missing() {
        let err = ensure_executable(Path::new("/nonexistent/tsschecker")).unwrap_err();
        assert!(matches!(err, GeneratorError::NotFound { .. }));
    }

    #[test]
    fn test_ensure_executable_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ensure_executable(dir.path()).unwrap_err();
        assert!(matches!(err, GeneratorError::NotExecutable { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_executable_checks_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tsschecker");
        std::fs::write(&path, "#!/bin/sh\n").unwrap();

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(matches!(
            ensure_executable(&path),
            Err(GeneratorError::NotExecutable { .. })
        ));

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(ensure_executable(&path).is_ok());
        assert!(TsscheckerGenerator::from_user_path(&path).is_ok());
    }

    #[tokio::test]
    async fn test_invoke_missing_binary() {
        let generator = TsscheckerGenerator::new("/nonexistent/tsschecker");
        let err = generator.invoke(&[]).await.unwrap_err();
        assert!(matches!(err, GeneratorError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_version_missing_binary() {
        let generator = TsscheckerGenerator::new("/nonexistent/tsschecker");
        let err = generator.version().await.unwrap_err();
        assert!(matches!(err, GeneratorError::NotFound { .. }));
    }
}
