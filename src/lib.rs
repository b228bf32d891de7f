//! native-ocr: one async OCR entry point over the host OS vision engine.
//!
//! The crate does no recognition of its own. It hands the image to the
//! engine the operating system ships and normalizes what comes back:
//!   - macOS: Apple Vision (`VNRecognizeTextRequest`)
//!   - Windows: `Windows.Media.Ocr`
//!
//! The engine is chosen at compile time. On other targets the
//! recognition functions are not compiled, so calling them is a build
//! error; [`host_support`] reports `UnsupportedPlatform` at runtime.
//!
//! ```no_run
//! # #[cfg(any(target_os = "macos", target_os = "windows"))]
//! # async fn demo() -> Result<(), native_ocr::OcrError> {
//! use native_ocr::{recognize, OcrAccuracy};
//!
//! let result = recognize("receipt.png", OcrAccuracy::Accurate).await?;
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```
//!
//! Modules:
//!   - accuracy: Fast / Accurate tradeoff
//!   - input: path or in-memory image, up-front validation
//!   - options: per-call settings (languages, regions, ...)
//!   - result: normalized result model
//!   - normalize: line joining and CJK spacing clean-up
//!   - config: `OCR_*` environment defaults
//!   - engine: platform adapters, one per target
//!   - recognize: the façade

pub mod accuracy;
pub mod config;
mod engine;
pub mod error;
pub mod input;
pub mod normalize;
pub mod options;
mod recognize;
pub mod result;

pub use accuracy::{OcrAccuracy, ParseAccuracyError};
pub use config::{ConfigError, OcrConfig};
pub use engine::host_support;
pub use error::{ErrorKind, OcrError, Result};
pub use input::ImageInput;
pub use options::RecognizeOptions;
pub use result::{BoundingBox, OcrResult, TextRegion};

#[cfg(any(target_os = "macos", target_os = "windows"))]
pub use recognize::{engine_name, recognize, recognize_until, recognize_with, warm_up};
