//! Per-pair blob archival.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::types::{ArchiveError, ArchiveOutcome};
use crate::device::{Device, SavedBlobRecord};
use crate::generator::{BlobRequest, Generator, MarkerClassifier, OutcomeClassifier};

/// Default name of the failure log written next to the blobs.
pub const DEFAULT_LOG_FILE_NAME: &str = "tsschecker_log.txt";

/// Saves blobs for one (device, build) pair at a time.
pub struct BlobArchiver<G: Generator> {
    generator: G,
    classifier: Box<dyn OutcomeClassifier>,
    blobs_dir: PathBuf,
    log_file_name: String,
}

impl<G: Generator> BlobArchiver<G> {
    /// Archiver writing under `blobs_dir`, using the default marker check.
    pub fn new(generator: G, blobs_dir: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            classifier: Box::new(MarkerClassifier::default()),
            blobs_dir: blobs_dir.into(),
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
        }
    }

    /// Replace the success classifier.
    pub fn with_classifier(mut self, classifier: impl OutcomeClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Set the failure log file name.
    pub fn with_log_file_name(mut self, name: impl Into<String>) -> Self {
        self.log_file_name = name.into();
        self
    }

    /// `<blobs_dir>/<device type>/<ecid>/<version>/<build>`.
    pub fn save_path(
        &self,
        device: &Device,
        version: &str,
        build_id: &str,
    ) -> Result<PathBuf, ArchiveError> {
        let components = [
            ("device type", device.device_type_id.as_str()),
            ("ecid", device.ecid.as_str()),
            ("version", version),
            ("build id", build_id),
        ];

        let mut path = self.blobs_dir.clone();
        for (field, value) in components {
            check_component(field, value)?;
            path.push(value);
        }
        Ok(path)
    }

    /// Whether the device history already holds `build_id`.
    pub fn has_archive(&self, device: &Device, build_id: &str) -> bool {
        device.has_blob(build_id)
    }

    /// Save blobs for `build_id` unless they are already in the history.
    ///
    /// On success the device history gains a release record. On failure the
    /// history is left alone and the full invocation plus captured output is
    /// written to the log file in the save path.
    pub async fn archive(
        &self,
        device: &mut Device,
        build_id: &str,
        version: &str,
    ) -> Result<ArchiveOutcome, ArchiveError> {
        if self.has_archive(device, build_id) {
            debug!(
                ecid = %device.ecid,
                build_id,
                "Blobs already saved"
            );
            return Ok(ArchiveOutcome::AlreadySaved);
        }

        let save_path = self.save_path(device, version, build_id)?;
        tokio::fs::create_dir_all(&save_path)
            .await
            .map_err(|source| ArchiveError::OutputDirectory {
                path: save_path.clone(),
                source,
            })?;

        let request = BlobRequest {
            device_type_id: device.device_type_id.clone(),
            ecid: device.ecid.clone(),
            board_config: device.board_config.clone(),
            build_id: build_id.to_string(),
            save_path: save_path.clone(),
        };
        let args = request.to_args();

        let (saved, lines) = match self.generator.invoke(&args).await {
            Ok(output) => (self.classifier.is_success(&output), output.lines),
            Err(e) => {
                warn!(ecid = %device.ecid, build_id, "Generator could not be run: {}", e);
                (false, vec![format!("Failed to run generator: {}", e)])
            }
        };

        if saved {
            device.record_blob(SavedBlobRecord::release(version, build_id));
            info!(
                "[{}] [{} - {}] Saved shsh blobs!",
                device.name, version, build_id
            );
            return Ok(ArchiveOutcome::Saved { save_path });
        }

        let log_path = save_path.join(&self.log_file_name);
        let invocation = invocation_line(self.generator.program(), &args);
        write_failure_log(&log_path, &invocation, &lines).await?;

        warn!(
            "[{}] [{} - {}] Error, see log file: {}",
            device.name,
            version,
            build_id,
            log_path.display()
        );
        Ok(ArchiveOutcome::Failed { log_path })
    }
}

fn check_component(field: &'static str, value: &str) -> Result<(), ArchiveError> {
    let unsafe_value = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);

    if unsafe_value {
        return Err(ArchiveError::UnsafePathComponent {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Program followed by its arguments, space separated.
fn invocation_line(program: &Path, args: &[String]) -> String {
    std::iter::once(program.to_string_lossy().to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

async fn write_failure_log(
    log_path: &Path,
    invocation: &str,
    lines: &[String],
) -> Result<(), ArchiveError> {
    let contents = format!("{}\n\n{}", invocation, lines.join("\n"));
    tokio::fs::write(log_path, contents)
        .await
        .map_err(|source| ArchiveError::WriteLog {
            path: log_path.to_path_buf(),
            source,
        })
}
