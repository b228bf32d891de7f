//! Shared helpers for the native OCR integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Path to a fixture image under tests/fixtures/.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn snapshot_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/snapshots")
        .join(format!("{}.{}.txt", name, std::env::consts::OS))
}

/// Compare `text` against the stored reference for this OS.
///
/// The first run for a fixture records the reference instead of asserting.
/// Delete the file to re-record.
pub fn assert_snapshot(name: &str, text: &str) {
    let path = snapshot_path(name);
    match std::fs::read_to_string(&path) {
        Ok(expected) => assert_eq!(
            text,
            expected,
            "recognized text for '{}' drifted from {}",
            name,
            path.display()
        ),
        Err(_) => {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, text).unwrap();
            eprintln!("[TEST] Recorded new snapshot {}", path.display());
        }
    }
}

/// Encoded white PNG with nothing on it.
pub fn blank_png(width: u32, height: u32) -> Vec<u8> {
    let canvas = image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));
    let mut png_bytes = Vec::new();
    image::DynamicImage::ImageRgb8(canvas)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .unwrap();
    png_bytes
}
