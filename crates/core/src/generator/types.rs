//! Types for the generator module.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What one generator run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Standard output, one trimmed entry per line.
    pub lines: Vec<String>,
}

impl GeneratorOutput {
    pub fn new(exit_code: Option<i32>, lines: Vec<String>) -> Self {
        Self { exit_code, lines }
    }

    /// Whether any line equals `line` exactly.
    pub fn contains_line(&self, line: &str) -> bool {
        self.lines.iter().any(|l| l == line)
    }
}

/// Everything needed to save blobs for one (device, build) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRequest {
    pub device_type_id: String,
    pub ecid: String,
    pub board_config: String,
    pub build_id: String,
    pub save_path: PathBuf,
}

impl BlobRequest {
    /// Generator arguments, excluding the program itself.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "-d".to_string(),
            self.device_type_id.clone(),
            "-e".to_string(),
            self.ecid.clone(),
            "--boardconfig".to_string(),
            self.board_config.clone(),
            "--buildid".to_string(),
            self.build_id.clone(),
            "--save-path".to_string(),
            self.save_path.to_string_lossy().to_string(),
            // save without prompting
            "-s".to_string(),
        ]
    }
}
