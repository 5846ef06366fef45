//! External blob generator (tsschecker).
//!
//! The generator is only reached through the narrow [`Generator`] trait:
//! run with arguments, get back the exit code and stdout lines. Whether a
//! run actually saved a blob is decided separately by an
//! [`OutcomeClassifier`], so the success check can change without touching
//! the archiver.
//!
//! # Example
//!
//! ```ignore
//! use autotss_core::generator::{ensure_min_version, Generator, TsscheckerGenerator};
//!
//! let generator = TsscheckerGenerator::new("tsschecker");
//! ensure_min_version(&generator, 247).await?;
//!
//! let output = generator.invoke(&request.to_args()).await?;
//! for line in &output.lines {
//!     println!("{}", line);
//! }
//! ```

mod classifier;
mod error;
mod traits;
mod tsschecker;
mod types;

pub use classifier::{MarkerClassifier, OutcomeClassifier, DEFAULT_SUCCESS_MARKER};
pub use error::GeneratorError;
pub use traits::{ensure_min_version, Generator};
pub use tsschecker::{ensure_executable, parse_version_line, TsscheckerGenerator};
pub use types::{BlobRequest, GeneratorOutput};
