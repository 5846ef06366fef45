//! Trait definitions for the generator module.

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use super::error::GeneratorError;
use super::types::GeneratorOutput;

/// An external program that saves blobs.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Program path, as used to spawn it and in failure logs.
    fn program(&self) -> &Path;

    /// Runs the generator with `args` and waits for it to exit.
    async fn invoke(&self, args: &[String]) -> Result<GeneratorOutput, GeneratorError>;

    /// Build number reported when the generator runs with no arguments.
    async fn version(&self) -> Result<u32, GeneratorError>;
}

/// Fails unless the generator reports at least `minimum`.
pub async fn ensure_min_version<G>(generator: &G, minimum: u32) -> Result<u32, GeneratorError>
where
    G: Generator + ?Sized,
{
    let found = generator.version().await?;
    if found < minimum {
        return Err(GeneratorError::VersionTooOld { found, minimum });
    }

    info!(
        "Using {} (version {})",
        generator.program().display(),
        found
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGenerator;

    #[tokio::test]
    async fn test_ensure_min_version_accepts_equal() {
        let generator = MockGenerator::new();
        generator.set_version(247).await;
        assert_eq!(ensure_min_version(&generator, 247).await.unwrap(), 247);
    }

    #[tokio::test]
    async fn test_ensure_min_version_rejects_older() {
        let generator = MockGenerator::new();
        generator.set_version(246).await;

        let err = ensure_min_version(&generator, 247).await.unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::VersionTooOld {
                found: 246,
                minimum: 247
            }
        ));
    }

    #[tokio::test]
    async fn test_ensure_min_version_propagates_probe_error() {
        let generator = MockGenerator::new();
        generator
            .set_next_error(GeneratorError::NotFound {
                path: "tsschecker".into(),
            })
            .await;

        let err = ensure_min_version(&generator, 247).await.unwrap_err();
        assert!(matches!(err, GeneratorError::NotFound { .. }));
    }
}
