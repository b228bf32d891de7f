//! macOS adapter: Apple Vision `VNRecognizeTextRequest` via objc2.
//!
//! Vision runs synchronously inside `performRequests`, so this module only
//! ever executes on the blocking pool. Observations come back as lines in
//! reading order with a normalized, bottom-left-origin bounding box.

use super::EngineAdapter;
use crate::accuracy::OcrAccuracy;
use crate::error::{OcrError, Result};
use crate::input::ImageInput;
use crate::options::RecognizeOptions;
use crate::result::{BoundingBox, OcrResult, TextRegion};
use objc2::rc::{autoreleasepool, Retained};
use objc2::runtime::AnyObject;
use objc2::AnyThread;
use objc2_core_foundation::CGRect;
use objc2_foundation::{
    NSArray, NSData, NSDictionary, NSError, NSOperatingSystemVersion, NSProcessInfo, NSString,
    NSURL,
};
use objc2_vision::{
    VNImageOption, VNImageRequestHandler, VNRecognizeTextRequest, VNRequest,
    VNRequestTextRecognitionLevel,
};
use std::path::Path;

const VISION_ERROR_DOMAIN: &str = "com.apple.Vision";

// VNErrorCode values
const VN_REQUEST_CANCELLED: isize = 1;
const VN_IO_ERROR: isize = 6;
const VN_INVALID_IMAGE: isize = 13;

const COCOA_ERROR_DOMAIN: &str = "NSCocoaErrorDomain";

// NSFileReadUnknownError ..= NSFileReadUnsupportedSchemeError
const COCOA_FILE_READ_ERRORS: std::ops::RangeInclusive<isize> = 256..=264;

impl From<OcrAccuracy> for VNRequestTextRecognitionLevel {
    fn from(value: OcrAccuracy) -> Self {
        match value {
            OcrAccuracy::Fast => VNRequestTextRecognitionLevel::Fast,
            OcrAccuracy::Accurate => VNRequestTextRecognitionLevel::Accurate,
        }
    }
}

pub struct AppleVisionEngine;

impl EngineAdapter for AppleVisionEngine {
    const NAME: &'static str = "apple-vision";

    fn check_host() -> Result<()> {
        // VNRecognizeTextRequest shipped with macOS 10.15.
        if os_at_least(10, 15) {
            Ok(())
        } else {
            Err(OcrError::UnsupportedPlatform(
                "Vision text recognition requires macOS 10.15 or later".to_string(),
            ))
        }
    }

    fn recognize(input: &ImageInput, options: &RecognizeOptions) -> Result<OcrResult> {
        autoreleasepool(|_| perform_request(input, options))
    }
}

#[allow(unused_unsafe)]
fn perform_request(input: &ImageInput, options: &RecognizeOptions) -> Result<OcrResult> {
    unsafe {
        let image_options: Retained<NSDictionary<VNImageOption, AnyObject>> = NSDictionary::new();
        let handler = match input {
            ImageInput::Path(path) => {
                let ns_path = NSString::from_str(&path.to_string_lossy());
                let url: Retained<NSURL> = NSURL::fileURLWithPath(&ns_path);
                VNImageRequestHandler::initWithURL_options(
                    VNImageRequestHandler::alloc(),
                    &url,
                    &image_options,
                )
            }
            ImageInput::Bytes(bytes) => {
                let data = NSData::with_bytes(bytes);
                VNImageRequestHandler::initWithData_options(
                    VNImageRequestHandler::alloc(),
                    &data,
                    &image_options,
                )
            }
        };

        let request = VNRecognizeTextRequest::init(VNRecognizeTextRequest::alloc());
        request.setRecognitionLevel(options.accuracy.into());
        request.setUsesLanguageCorrection(options.language_correction);
        request.setMinimumTextHeight(options.min_text_height);

        if options.languages.is_empty() {
            // Automatic detection is macOS 13+. Older releases fall back to
            // the request's default language list.
            if os_at_least(13, 0) {
                request.setAutomaticallyDetectsLanguage(true);
            }
        } else {
            let langs: Vec<Retained<NSString>> = options
                .languages
                .iter()
                .map(|lang| NSString::from_str(lang))
                .collect();
            request.setRecognitionLanguages(&NSArray::from_retained_slice(&langs));
        }

        let vn_request: Retained<VNRequest> = request.clone().into_super().into_super();
        handler
            .performRequests_error(&NSArray::from_retained_slice(&[vn_request]))
            .map_err(|err| map_vision_error(&err, input.path()))?;

        let Some(observations) = request.results() else {
            log::debug!("[OCR] Vision returned no observations");
            return Ok(OcrResult::default());
        };

        let mut regions = Vec::new();
        for observation in observations {
            let candidates = observation.topCandidates(1);
            let Some(best) = candidates.iter().next() else {
                continue;
            };
            let rect: CGRect = observation.boundingBox();
            regions.push(TextRegion {
                text: best.string().to_string(),
                confidence: Some(f64::from(best.confidence())),
                bounds: BoundingBox::from_bottom_left(
                    rect.origin.x,
                    rect.origin.y,
                    rect.size.width,
                    rect.size.height,
                ),
            });
        }

        Ok(OcrResult::from_regions(regions, options.include_regions))
    }
}

fn map_vision_error(err: &NSError, path: Option<&Path>) -> OcrError {
    let domain = err.domain().to_string();
    let message = err.localizedDescription().to_string();
    classify_vision_error(&domain, err.code(), message, path)
}

fn classify_vision_error(domain: &str, code: isize, message: String, path: Option<&Path>) -> OcrError {
    if domain == COCOA_ERROR_DOMAIN && COCOA_FILE_READ_ERRORS.contains(&code) {
        return OcrError::invalid_image(path.map(Path::to_path_buf), message);
    }
    if domain != VISION_ERROR_DOMAIN {
        return OcrError::EngineFailure(format!("{} ({} {})", message, domain, code));
    }
    match code {
        VN_REQUEST_CANCELLED => OcrError::Cancelled,
        VN_IO_ERROR | VN_INVALID_IMAGE => {
            OcrError::invalid_image(path.map(Path::to_path_buf), message)
        }
        _ => OcrError::EngineFailure(format!("{} (Vision error {})", message, code)),
    }
}

#[allow(unused_unsafe)]
fn os_at_least(major: isize, minor: isize) -> bool {
    let version = NSOperatingSystemVersion {
        majorVersion: major,
        minorVersion: minor,
        patchVersion: 0,
    };
    unsafe { NSProcessInfo::processInfo().isOperatingSystemAtLeastVersion(version) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn accuracy_maps_to_recognition_level() {
        assert_eq!(
            VNRequestTextRecognitionLevel::from(OcrAccuracy::Fast),
            VNRequestTextRecognitionLevel::Fast
        );
        assert_eq!(
            VNRequestTextRecognitionLevel::from(OcrAccuracy::Accurate),
            VNRequestTextRecognitionLevel::Accurate
        );
    }

    #[test]
    fn invalid_image_codes_map_to_invalid_image() {
        let path = Path::new("/tmp/broken.png");
        for code in [VN_IO_ERROR, VN_INVALID_IMAGE] {
            let err = classify_vision_error(VISION_ERROR_DOMAIN, code, "bad".into(), Some(path));
            assert_eq!(err.kind(), ErrorKind::InvalidImage);
        }
    }

    #[test]
    fn cancelled_request_maps_to_cancelled() {
        let err = classify_vision_error(VISION_ERROR_DOMAIN, VN_REQUEST_CANCELLED, "x".into(), None);
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn other_errors_are_engine_failures_with_message() {
        let err = classify_vision_error(VISION_ERROR_DOMAIN, 9, "internal error".into(), None);
        assert_eq!(err.kind(), ErrorKind::EngineFailure);
        assert!(err.to_string().contains("internal error"));

        let err = classify_vision_error("NSOSStatusErrorDomain", -50, "param error".into(), None);
        assert_eq!(err.kind(), ErrorKind::EngineFailure);
        assert!(err.to_string().contains("NSOSStatusErrorDomain"));
    }

    #[test]
    fn cocoa_file_read_errors_map_to_invalid_image() {
        let path = Path::new("/tmp/locked.png");
        // unknown, no permission, corrupt, no such file
        for code in [256, 257, 259, 260] {
            let err = classify_vision_error(COCOA_ERROR_DOMAIN, code, "cannot read".into(), Some(path));
            match err {
                OcrError::InvalidImage { path: p, .. } => assert_eq!(p.as_deref(), Some(path)),
                other => panic!("code {code}: expected InvalidImage, got {other:?}"),
            }
        }

        // Cocoa errors outside the file-read range stay engine failures.
        let err = classify_vision_error(COCOA_ERROR_DOMAIN, 4, "no such file".into(), None);
        assert_eq!(err.kind(), ErrorKind::EngineFailure);
    }

    #[test]
    fn host_is_supported_on_current_macos() {
        AppleVisionEngine::check_host().unwrap();
    }
}
