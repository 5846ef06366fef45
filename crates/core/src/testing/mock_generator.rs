//! Mock generator for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::generator::{Generator, GeneratorError, GeneratorOutput, DEFAULT_SUCCESS_MARKER};

/// Mock implementation of the Generator trait.
///
/// Provides controllable behavior for testing:
/// - Record every invocation's arguments
/// - Return configurable output lines (succeeds by default)
/// - Report a configurable version
/// - Fail the next call with a given error
///
/// Clones share state, so a clone can be handed to the archiver while the
/// test keeps the original for assertions.
///
/// # Example
///
/// ```rust,ignore
/// use autotss_core::testing::MockGenerator;
///
/// let generator = MockGenerator::new();
/// generator.set_output(vec!["[Error] ERROR: TSS request failed"]).await;
///
/// let archiver = BlobArchiver::new(generator.clone(), "blobs");
/// archiver.archive(&mut device, "B100", "14.0").await?;
///
/// assert_eq!(generator.invocation_count().await, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockGenerator {
    program: PathBuf,
    /// Arguments of each invocation, in call order.
    invocations: Arc<RwLock<Vec<Vec<String>>>>,
    /// Output returned by every invocation.
    output: Arc<RwLock<GeneratorOutput>>,
    /// Version reported by the probe.
    version: Arc<RwLock<u32>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<GeneratorError>>>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    /// Create a mock that reports version 300 and confirms every save.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("tsschecker"),
            invocations: Arc::new(RwLock::new(Vec::new())),
            output: Arc::new(RwLock::new(Self::success_output())),
            version: Arc::new(RwLock::new(300)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    fn success_output() -> GeneratorOutput {
        GeneratorOutput::new(
            Some(0),
            vec![
                "[TSSC] opening firmware.json".to_string(),
                "[TSSC] got firmwareurl for iOS".to_string(),
                DEFAULT_SUCCESS_MARKER.to_string(),
            ],
        )
    }

    /// Return the success marker on every following invocation.
    pub async fn succeed(&self) {
        *self.output.write().await = Self::success_output();
    }

    /// Return exactly these lines (exit code 0) on every following invocation.
    pub async fn set_output<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.output.write().await =
            GeneratorOutput::new(Some(0), lines.into_iter().map(Into::into).collect());
    }

    /// Exit code reported by following invocations, output lines unchanged.
    pub async fn set_exit_code(&self, exit_code: Option<i32>) {
        self.output.write().await.exit_code = exit_code;
    }

    /// Set the version reported by the probe.
    pub async fn set_version(&self, version: u32) {
        *self.version.write().await = version;
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: GeneratorError) {
        *self.next_error.write().await = Some(error);
    }

    /// Arguments of every invocation so far.
    pub async fn recorded_invocations(&self) -> Vec<Vec<String>> {
        self.invocations.read().await.clone()
    }

    /// Get the number of invocations performed.
    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    /// Clear recorded invocations.
    pub async fn clear_recorded(&self) {
        self.invocations.write().await.clear();
    }
}

#[async_trait]
impl Generator for MockGenerator {
    fn program(&self) -> &Path {
        &self.program
    }

    async fn invoke(&self, args: &[String]) -> Result<GeneratorOutput, GeneratorError> {
        self.invocations.write().await.push(args.to_vec());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.output.read().await.clone())
    }

    async fn version(&self) -> Result<u32, GeneratorError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(*self.version.read().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_output_contains_marker() {
        let generator = MockGenerator::new();
        let output = generator.invoke(&["-d".to_string()]).await.unwrap();
        assert!(output.contains_line(DEFAULT_SUCCESS_MARKER));
        assert_eq!(generator.invocation_count().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let generator = MockGenerator::new();
        let clone = generator.clone();
        clone.invoke(&[]).await.unwrap();
        assert_eq!(generator.invocation_count().await, 1);

        generator.clear_recorded().await;
        assert_eq!(clone.invocation_count().await, 0);
    }

    #[tokio::test]
    async fn test_next_error_is_consumed_once() {
        let generator = MockGenerator::new();
        generator
            .set_next_error(GeneratorError::NotFound {
                path: "tsschecker".into(),
            })
            .await;

        assert!(generator.invoke(&[]).await.is_err());
        assert!(generator.invoke(&[]).await.is_ok());
        assert_eq!(generator.invocation_count().await, 2);
    }

    #[tokio::test]
    async fn test_set_exit_code_keeps_lines() {
        let generator = MockGenerator::new();
        generator.set_exit_code(Some(1)).await;

        let output = generator.invoke(&[]).await.unwrap();
        assert_eq!(output.exit_code, Some(1));
        assert!(output.contains_line(DEFAULT_SUCCESS_MARKER));
    }

    #[tokio::test]
    async fn test_set_output_then_succeed() {
        let generator = MockGenerator::new();
        generator.set_output(vec!["nope"]).await;
        assert!(!generator.invoke(&[]).await.unwrap().contains_line(DEFAULT_SUCCESS_MARKER));

        generator.succeed().await;
        assert!(generator.invoke(&[]).await.unwrap().contains_line(DEFAULT_SUCCESS_MARKER));
    }
}
