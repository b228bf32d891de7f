//! Image sources accepted by the façade and their up-front validation.

use crate::error::{OcrError, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Enough bytes for every signature `image::guess_format` and the HEIF
/// brand check look at.
const HEADER_LEN: u64 = 32;

const HEIF_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// An image to recognize: a file on disk or an encoded buffer in memory.
///
/// Decoding is always left to the platform loader; this type only carries
/// the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageInput {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageInput::Path(p) => Some(p),
            ImageInput::Bytes(_) => None,
        }
    }

    /// Short human-readable label for logs.
    pub fn describe(&self) -> String {
        match self {
            ImageInput::Path(p) => p.display().to_string(),
            ImageInput::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl From<PathBuf> for ImageInput {
    fn from(value: PathBuf) -> Self {
        ImageInput::Path(value)
    }
}

impl From<&Path> for ImageInput {
    fn from(value: &Path) -> Self {
        ImageInput::Path(value.to_path_buf())
    }
}

impl From<&str> for ImageInput {
    fn from(value: &str) -> Self {
        ImageInput::Path(PathBuf::from(value))
    }
}

impl From<String> for ImageInput {
    fn from(value: String) -> Self {
        ImageInput::Path(PathBuf::from(value))
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(value: Vec<u8>) -> Self {
        ImageInput::Bytes(value)
    }
}

impl From<&[u8]> for ImageInput {
    fn from(value: &[u8]) -> Self {
        ImageInput::Bytes(value.to_vec())
    }
}

/// Reject inputs that can never reach an engine.
///
/// Paths must name a readable regular file and buffers must be non-empty;
/// both must start with a known image signature. HEIC/HEIF files are let
/// through by path only. An image with a valid header that still fails to
/// decode is caught later by the platform loader.
pub async fn validate(input: &ImageInput) -> Result<()> {
    match input {
        ImageInput::Path(path) => validate_path(path).await,
        ImageInput::Bytes(bytes) => validate_bytes(bytes),
    }
}

async fn validate_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(OcrError::invalid_image(None, "image path is empty"));
    }
    let invalid = |reason: String| OcrError::invalid_image(Some(path.to_path_buf()), reason);

    let meta = tokio::fs::metadata(path).await.map_err(|e| invalid(e.to_string()))?;
    if !meta.is_file() {
        return Err(invalid("not a regular file".to_string()));
    }

    let file = tokio::fs::File::open(path).await.map_err(|e| invalid(e.to_string()))?;
    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    file.take(HEADER_LEN)
        .read_to_end(&mut header)
        .await
        .map_err(|e| invalid(e.to_string()))?;

    if header.is_empty() {
        return Err(invalid("image file is empty".to_string()));
    }
    if is_heif(&header) {
        log::debug!("[OCR] {} sniffed as HEIF", path.display());
        return Ok(());
    }
    match image::guess_format(&header) {
        Ok(format) => {
            log::debug!("[OCR] {} sniffed as {:?}", path.display(), format);
            Ok(())
        }
        Err(e) => Err(invalid(format!("unrecognized image data: {}", e))),
    }
}

/// ISO-BMFF `ftyp` box with a HEIC/HEIF brand.
fn is_heif(header: &[u8]) -> bool {
    header.len() >= 12
        && &header[4..8] == b"ftyp"
        && HEIF_BRANDS.iter().any(|brand| &header[8..12] == *brand)
}

pub fn validate_bytes(bytes: &[u8]) -> Result<()> {
    if bytes.is_empty() {
        return Err(OcrError::invalid_image(None, "image buffer is empty"));
    }
    match image::guess_format(bytes) {
        Ok(format) => {
            log::debug!("[OCR] In-memory image sniffed as {:?}", format);
            Ok(())
        }
        Err(e) => Err(OcrError::invalid_image(None, format!("unrecognized image data: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn empty_path_is_invalid_image() {
        let err = validate(&ImageInput::from("")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidImage);
    }

    #[tokio::test]
    async fn missing_file_is_invalid_image() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.png");
        let err = validate(&ImageInput::from(missing.clone())).await.unwrap_err();
        match err {
            OcrError::InvalidImage { path, .. } => assert_eq!(path, Some(missing)),
            other => panic!("expected InvalidImage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn directory_is_invalid_image() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate(&ImageInput::from(dir.path())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidImage);
    }

    #[tokio::test]
    async fn existing_file_passes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&PNG_SIGNATURE).unwrap();
        validate(&ImageInput::from(file.path())).await.unwrap();
    }

    #[tokio::test]
    async fn text_file_named_png_is_invalid_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"this is text, not a png").unwrap();

        let err = validate(&ImageInput::from(path.clone())).await.unwrap_err();
        match err {
            OcrError::InvalidImage { path: p, reason } => {
                assert_eq!(p, Some(path));
                assert!(reason.contains("unrecognized image data"), "{reason}");
            }
            other => panic!("expected InvalidImage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_file_is_invalid_image() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = validate(&ImageInput::from(file.path())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidImage);
    }

    #[tokio::test]
    async fn heic_file_passes_by_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0, 0, 0, 0x18]).unwrap();
        file.write_all(b"ftypheic\0\0\0\0mif1heic").unwrap();
        validate(&ImageInput::from(file.path())).await.unwrap();
    }

    #[test]
    fn heic_buffer_is_rejected() {
        let mut bytes = vec![0, 0, 0, 0x18];
        bytes.extend_from_slice(b"ftypheic\0\0\0\0mif1heic");
        assert_eq!(validate_bytes(&bytes).unwrap_err().kind(), ErrorKind::InvalidImage);
    }

    #[test]
    fn heif_brand_detection() {
        assert!(is_heif(b"\0\0\0\x18ftypmif1"));
        assert!(!is_heif(b"\0\0\0\x18ftypisom"));
        assert!(!is_heif(b"ftyp"));
    }

    #[test]
    fn empty_buffer_is_invalid_image() {
        let err = validate_bytes(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidImage);
    }

    #[test]
    fn garbage_buffer_is_invalid_image() {
        let err = validate_bytes(b"definitely not an image").unwrap_err();
        assert!(err.to_string().contains("unrecognized image data"));
    }

    #[test]
    fn png_signature_is_accepted() {
        validate_bytes(&PNG_SIGNATURE).unwrap();
    }

    #[test]
    fn describe_bytes_reports_length() {
        assert_eq!(ImageInput::from(vec![1u8, 2, 3]).describe(), "<3 bytes>");
    }
}
