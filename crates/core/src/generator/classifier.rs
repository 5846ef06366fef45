//! Deciding whether a generator run saved a blob.

use super::types::GeneratorOutput;

/// Line tsschecker prints after writing a blob.
pub const DEFAULT_SUCCESS_MARKER: &str = "Saved shsh blobs!";

/// Classifies a finished generator run.
pub trait OutcomeClassifier: Send + Sync {
    fn is_success(&self, output: &GeneratorOutput) -> bool;
}

/// Success iff one output line equals the marker exactly. The exit status
/// is ignored.
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    marker: String,
}

impl MarkerClassifier {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SUCCESS_MARKER)
    }
}

impl OutcomeClassifier for MarkerClassifier {
    fn is_success(&self, output: &GeneratorOutput) -> bool {
        output.contains_line(&self.marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(exit_code: Option<i32>, lines: &[&str]) -> GeneratorOutput {
        GeneratorOutput::new(exit_code, lines.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_marker_present() {
        let classifier = MarkerClassifier::default();
        let out = output(
            Some(0),
            &["[TSSC] opening firmware.json", "Saved shsh blobs!"],
        );
        assert!(classifier.is_success(&out));
    }

    #[test]
    fn test_marker_absent() {
        let classifier = MarkerClassifier::default();
        let out = output(Some(0), &["[Error] ERROR: TSS request failed"]);
        assert!(!classifier.is_success(&out));
    }

    #[test]
    fn test_marker_must_be_whole_line() {
        let classifier = MarkerClassifier::default();
        let out = output(Some(0), &["Not Saved shsh blobs!"]);
        assert!(!classifier.is_success(&out));
    }

    #[test]
    fn test_exit_status_is_not_consulted() {
        let classifier = MarkerClassifier::default();
        assert!(classifier.is_success(&output(Some(255), &["Saved shsh blobs!"])));
        assert!(!classifier.is_success(&output(Some(0), &[])));
    }

    #[test]
    fn test_custom_marker() {
        let classifier = MarkerClassifier::new("Saved blobs.");
        assert_eq!(classifier.marker(), "Saved blobs.");
        assert!(classifier.is_success(&output(None, &["Saved blobs."])));
        assert!(!classifier.is_success(&output(None, &["Saved shsh blobs!"])));
    }
}
