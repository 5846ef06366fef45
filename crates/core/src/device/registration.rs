//! Reader for the hand-edited device registration file (`devices.ini`).
//!
//! ```ini
//! [My iPhone]
//! identifier = iPhone10,3
//! ecid = 1234567890
//! boardconfig = d22ap
//! ```
//!
//! Each section declares one device. `boardconfig` is optional and is
//! resolved from the firmware catalog when left out.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while reading a registration file.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Failed to read registration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: malformed section header {content:?}")]
    MalformedHeader { line: usize, content: String },

    #[error("line {line}: entry {content:?} appears before any [section]")]
    EntryOutsideSection { line: usize, content: String },

    #[error("line {line} in [{section}]: expected `key = value`, got {content:?}")]
    MalformedEntry {
        line: usize,
        section: String,
        content: String,
    },

    #[error("line {line}: duplicate section [{section}]")]
    DuplicateSection { line: usize, section: String },

    #[error("line {line} in [{section}]: duplicate key `{key}`")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },

    #[error("section [{section}] is missing required key `{key}`")]
    MissingKey { section: String, key: String },

    #[error("section [{section}]: key `{key}` is empty")]
    EmptyValue { section: String, key: String },

    #[error("section [{section}]: `{key}` value {value:?} cannot be used in a file path")]
    UnsafeValue {
        section: String,
        key: String,
        value: String,
    },
}

/// A device as declared in the registration file, before board config
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistration {
    /// Section name.
    pub name: String,
    /// Device type identifier with all spaces removed.
    pub identifier: String,
    pub ecid: String,
    /// Lower-cased board config, `None` when absent or blank.
    pub board_config: Option<String>,
}

/// Read registrations from `path`.
///
/// A missing file is not an error: it yields no registrations.
pub fn read_registrations(path: &Path) -> Result<Vec<DeviceRegistration>, RegistrationError> {
    if !path.is_file() {
        warn!("Unable to find {}, no new devices will be imported", path.display());
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|source| RegistrationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let registrations = parse_registrations(&contents)?;
    debug!(
        "Read {} registrations from {}",
        registrations.len(),
        path.display()
    );
    Ok(registrations)
}

struct Section {
    name: String,
    entries: HashMap<String, String>,
}

/// Parse registration file contents.
pub fn parse_registrations(input: &str) -> Result<Vec<DeviceRegistration>, RegistrationError> {
    let mut sections: Vec<Section> = Vec::new();

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            let name = line
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| RegistrationError::MalformedHeader {
                    line: line_no,
                    content: line.to_string(),
                })?;

            if sections.iter().any(|s| s.name == name) {
                return Err(RegistrationError::DuplicateSection {
                    line: line_no,
                    section: name.to_string(),
                });
            }

            sections.push(Section {
                name: name.to_string(),
                entries: HashMap::new(),
            });
            continue;
        }

        let section = sections
            .last_mut()
            .ok_or_else(|| RegistrationError::EntryOutsideSection {
                line: line_no,
                content: line.to_string(),
            })?;

        // First `=` or `:` splits key from value
        let (key, value) = line
            .find(['=', ':'])
            .map(|pos| (line[..pos].trim(), line[pos + 1..].trim()))
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| RegistrationError::MalformedEntry {
                line: line_no,
                section: section.name.clone(),
                content: line.to_string(),
            })?;

        let key = key.to_lowercase();
        if section.entries.contains_key(&key) {
            return Err(RegistrationError::DuplicateKey {
                line: line_no,
                section: section.name.clone(),
                key,
            });
        }
        section.entries.insert(key, value.to_string());
    }

    sections.into_iter().map(Section::into_registration).collect()
}

impl Section {
    fn required(&self, key: &str) -> Result<&str, RegistrationError> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| RegistrationError::MissingKey {
                section: self.name.clone(),
                key: key.to_string(),
            })?;

        if value.is_empty() {
            return Err(RegistrationError::EmptyValue {
                section: self.name.clone(),
                key: key.to_string(),
            });
        }
        Ok(value)
    }

    /// A required value that also names a directory in the blob tree.
    fn path_component(&self, key: &str, value: String) -> Result<String, RegistrationError> {
        if value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
            return Err(RegistrationError::UnsafeValue {
                section: self.name.clone(),
                key: key.to_string(),
                value,
            });
        }
        Ok(value)
    }

    fn into_registration(self) -> Result<DeviceRegistration, RegistrationError> {
        let identifier = self.required("identifier")?.replace(' ', "");
        let identifier = self.path_component("identifier", identifier)?;
        let ecid = self.path_component("ecid", self.required("ecid")?.to_string())?;
        let board_config = self
            .entries
            .get("boardconfig")
            .map(|bc| bc.to_lowercase())
            .filter(|bc| !bc.is_empty());

        Ok(DeviceRegistration {
            name: self.name,
            identifier,
            ecid,
            board_config,
        })
    }
}
