//! Platform engine adapters.
//!
//! Exactly one adapter is compiled per target and re-exported as
//! `NativeEngine`:
//!   - macOS: `apple_vision`, Vision `VNRecognizeTextRequest`
//!   - Windows: `windows_ocr`, `Windows.Media.Ocr`
//!
//! Every other target builds the platform-independent parts of the crate
//! only; the recognition entry points do not exist there.

#[cfg(target_os = "macos")]
mod apple_vision;

#[cfg(target_os = "windows")]
mod windows_ocr;

#[cfg(target_os = "macos")]
pub(crate) use apple_vision::AppleVisionEngine as NativeEngine;

#[cfg(target_os = "windows")]
pub(crate) use windows_ocr::WindowsOcrEngine as NativeEngine;

use crate::accuracy::OcrAccuracy;
use crate::error::{OcrError, Result};
use crate::input::ImageInput;
use crate::options::RecognizeOptions;
use crate::result::OcrResult;

/// Bridge between the generic request and one native OCR engine.
///
/// Methods are blocking: the façade runs them on tokio's blocking pool.
#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
pub(crate) trait EngineAdapter: 'static {
    const NAME: &'static str;

    /// Runtime check that the engine exists on this host.
    fn check_host() -> Result<()>;

    fn recognize(input: &ImageInput, options: &RecognizeOptions) -> Result<OcrResult>;

    /// Run a throwaway request so the engine loads its model.
    fn warm_up() -> Result<()> {
        let png = blank_png()?;
        Self::recognize(
            &ImageInput::Bytes(png),
            &RecognizeOptions::new(OcrAccuracy::Fast).with_regions(false),
        )
        .map(|_| ())
    }
}

/// Whether this host has a usable native OCR engine.
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub fn host_support() -> Result<()> {
    <NativeEngine as EngineAdapter>::check_host()
}

/// Whether this host has a usable native OCR engine.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
pub fn host_support() -> Result<()> {
    Err(OcrError::UnsupportedPlatform(format!(
        "no native OCR engine for target OS '{}'",
        std::env::consts::OS
    )))
}

/// Small white PNG used to prime an engine.
#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
pub(crate) fn blank_png() -> Result<Vec<u8>> {
    let canvas = image::RgbImage::from_pixel(64, 32, image::Rgb([255, 255, 255]));
    let mut png_bytes = Vec::new();
    image::DynamicImage::ImageRgb8(canvas)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .map_err(|e| OcrError::engine(format!("PNG encode failed: {}", e)))?;
    Ok(png_bytes)
}
