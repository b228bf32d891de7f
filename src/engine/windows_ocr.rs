//! Windows adapter: `Windows.Media.Ocr` via the `windows` crate.
//!
//! The WinRT engine has no speed/quality knob, so both accuracy levels run
//! its single default mode. Words come back with pixel rects; a line's box
//! is the union of its words. CJK output is re-joined because the engine
//! puts a space between every glyph.

use super::EngineAdapter;
use crate::error::{OcrError, Result};
use crate::input::ImageInput;
use crate::normalize;
use crate::options::RecognizeOptions;
use crate::result::{BoundingBox, OcrResult, TextRegion};
use std::path::{Path, PathBuf};
use windows::core::{Interface, HSTRING};
use windows::Foundation::IAsyncOperation;
use windows::Foundation::Metadata::ApiInformation;
use windows::Globalization::Language;
use windows::Graphics::Imaging::{BitmapDecoder, SoftwareBitmap};
use windows::Media::Ocr::OcrEngine;
use windows::Storage::Streams::{DataWriter, InMemoryRandomAccessStream};
use windows::Storage::{FileAccessMode, StorageFile};
use windows::Win32::System::WinRT::{RoInitialize, RO_INIT_MULTITHREADED};

const OCR_ENGINE_TYPE: &str = "Windows.Media.Ocr.OcrEngine";

pub struct WindowsOcrEngine;

impl EngineAdapter for WindowsOcrEngine {
    const NAME: &'static str = "windows-media-ocr";

    fn check_host() -> Result<()> {
        init_apartment();
        match ApiInformation::IsTypePresent(&HSTRING::from(OCR_ENGINE_TYPE)) {
            Ok(true) => Ok(()),
            Ok(false) => Err(OcrError::UnsupportedPlatform(format!(
                "{} is not available on this version of Windows",
                OCR_ENGINE_TYPE
            ))),
            Err(e) => Err(OcrError::UnsupportedPlatform(format!(
                "could not query {}: {}",
                OCR_ENGINE_TYPE,
                e.message()
            ))),
        }
    }

    fn recognize(input: &ImageInput, options: &RecognizeOptions) -> Result<OcrResult> {
        init_apartment();
        log::debug!(
            "[OCR] Windows OCR has one recognition mode; '{}' runs it unchanged",
            options.accuracy
        );

        let bitmap = load_bitmap(input)?;
        let width = bitmap.PixelWidth().map_err(engine_err)?;
        let height = bitmap.PixelHeight().map_err(engine_err)?;

        let max_dimension = OcrEngine::MaxImageDimension().map_err(engine_err)?;
        if width as u32 > max_dimension || height as u32 > max_dimension {
            return Err(OcrError::engine(format!(
                "image is {}x{}px, Windows OCR accepts at most {}px per side",
                width, height, max_dimension
            )));
        }

        let engine = create_engine(&options.languages)?;
        let recognized = engine
            .RecognizeAsync(&bitmap)
            .and_then(|op| op.get())
            .map_err(engine_err)?;

        let mut regions = Vec::new();
        for line in recognized.Lines().map_err(engine_err)? {
            let text = line.Text().map_err(engine_err)?.to_string_lossy();

            let mut bounds: Option<BoundingBox> = None;
            for word in line.Words().map_err(engine_err)? {
                let rect = word.BoundingRect().map_err(engine_err)?;
                let word_box = BoundingBox::from_pixels(
                    f64::from(rect.X),
                    f64::from(rect.Y),
                    f64::from(rect.Width),
                    f64::from(rect.Height),
                    f64::from(width),
                    f64::from(height),
                );
                bounds = Some(match bounds {
                    Some(line_box) => line_box.union(&word_box),
                    None => word_box,
                });
            }

            regions.push(TextRegion {
                text: normalize::collapse_cjk_spacing(&text),
                confidence: None,
                bounds: bounds.unwrap_or_default(),
            });
        }

        Ok(OcrResult::from_regions(regions, options.include_regions))
    }
}

/// Join the multithreaded apartment. `S_FALSE` (already joined) comes back
/// as `Ok`; a thread already in another apartment can still call WinRT, so
/// the failure is only logged.
fn init_apartment() {
    log_apartment_result(unsafe { RoInitialize(RO_INIT_MULTITHREADED) });
}

fn log_apartment_result(result: windows::core::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            log::debug!(
                "[OCR] RoInitialize(MTA) failed: {} (HRESULT {:#010x})",
                e.message(),
                e.code().0
            );
            false
        }
    }
}

/// Decode the input with the WinRT imaging stack. Any failure before a
/// bitmap exists means the image itself is unusable.
fn load_bitmap(input: &ImageInput) -> Result<SoftwareBitmap> {
    let path = input.path().map(Path::to_path_buf);
    let invalid = |e: windows::core::Error| OcrError::invalid_image(path.clone(), e.message().to_string());

    let decoder = match input {
        ImageInput::Path(p) => {
            let absolute = absolute_path(p)
                .map_err(|e| OcrError::invalid_image(Some(p.clone()), e.to_string()))?;
            let file = StorageFile::GetFileFromPathAsync(&HSTRING::from(absolute.to_string_lossy().as_ref()))
                .and_then(|op| op.get())
                .map_err(invalid)?;
            let stream = file
                .OpenAsync(FileAccessMode::Read)
                .and_then(|op| op.get())
                .map_err(invalid)?;
            BitmapDecoder::CreateAsync(&stream)
                .and_then(|op| op.get())
                .map_err(invalid)?
        }
        ImageInput::Bytes(bytes) => {
            let stream = InMemoryRandomAccessStream::new().map_err(engine_err)?;
            let writer = DataWriter::CreateDataWriter(&stream).map_err(engine_err)?;
            writer.WriteBytes(bytes).map_err(engine_err)?;
            writer
                .StoreAsync()
                .and_then(|op| op.cast::<IAsyncOperation<u32>>())
                .and_then(|op| op.get())
                .map_err(engine_err)?;
            writer.FlushAsync().and_then(|op| op.get()).map_err(engine_err)?;
            writer.DetachStream().map_err(engine_err)?;
            stream.Seek(0).map_err(engine_err)?;
            BitmapDecoder::CreateAsync(&stream)
                .and_then(|op| op.get())
                .map_err(invalid)?
        }
    };

    decoder
        .GetSoftwareBitmapAsync()
        .and_then(|op| op.get())
        .map_err(invalid)
}

/// Pick the first hinted language the engine supports, otherwise the user
/// profile languages.
fn create_engine(languages: &[String]) -> Result<OcrEngine> {
    for tag in languages {
        let Ok(language) = Language::CreateLanguage(&HSTRING::from(tag.as_str())) else {
            log::warn!("[OCR] Ignoring malformed language tag '{}'", tag);
            continue;
        };
        if OcrEngine::IsLanguageSupported(&language).unwrap_or(false) {
            log::debug!("[OCR] Windows OCR using hinted language '{}'", tag);
            return OcrEngine::TryCreateFromLanguage(&language).map_err(engine_err);
        }
        log::warn!("[OCR] No Windows OCR recognizer installed for '{}', skipping", tag);
    }

    OcrEngine::TryCreateFromUserProfileLanguages().map_err(|e| {
        OcrError::engine(format!(
            "no OCR language pack for the user profile languages: {}",
            e.message()
        ))
    })
}

// StorageFile only accepts absolute paths, and canonicalize() would add a
// verbatim `\\?\` prefix it also rejects.
fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

fn engine_err(e: windows::core::Error) -> OcrError {
    OcrError::engine(format!("{} (HRESULT {:#010x})", e.message(), e.code().0))
}
