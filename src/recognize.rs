//! Recognition façade: the only entry point callers use.
//!
//! Each call validates its input, then moves it into a blocking task where
//! the compiled-in engine adapter runs. The task's `JoinHandle` resolves
//! exactly once, which is all the bridging the native side needs. No state
//! is shared between calls.

use crate::engine::EngineAdapter;
use crate::error::{OcrError, Result};
use crate::input::{self, ImageInput};
use crate::options::RecognizeOptions;
use crate::result::OcrResult;
use std::future::Future;
use std::time::Instant;

#[cfg(any(target_os = "macos", target_os = "windows"))]
use crate::{accuracy::OcrAccuracy, engine::NativeEngine};

/// Recognize text in an image with default options at the given accuracy.
///
/// Must be called from within a tokio runtime.
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub async fn recognize(image: impl Into<ImageInput>, accuracy: OcrAccuracy) -> Result<OcrResult> {
    run::<NativeEngine>(image.into(), RecognizeOptions::new(accuracy)).await
}

/// Recognize text with explicit options (language hints, regions, ...).
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub async fn recognize_with(image: impl Into<ImageInput>, options: RecognizeOptions) -> Result<OcrResult> {
    run::<NativeEngine>(image.into(), options).await
}

/// Like [`recognize_with`], but gives up with [`OcrError::Cancelled`] as soon
/// as `cancel` completes. The native call is left to finish on its own and
/// its result is dropped.
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub async fn recognize_until<C>(
    image: impl Into<ImageInput>,
    options: RecognizeOptions,
    cancel: C,
) -> Result<OcrResult>
where
    C: Future<Output = ()>,
{
    run_until::<NativeEngine, C>(image.into(), options, cancel).await
}

/// Fire a throwaway recognition so the engine loads its model before the
/// first real call.
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub async fn warm_up() -> Result<()> {
    warm_up_engine::<NativeEngine>().await
}

/// Identifier of the compiled-in engine.
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub fn engine_name() -> &'static str {
    <NativeEngine as EngineAdapter>::NAME
}

#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
pub(crate) async fn run<E: EngineAdapter>(image: ImageInput, options: RecognizeOptions) -> Result<OcrResult> {
    input::validate(&image).await?;

    let label = image.describe();
    let accuracy = options.accuracy;
    let start = Instant::now();

    let outcome = tokio::task::spawn_blocking(move || {
        E::check_host()?;
        E::recognize(&image, &options)
    })
    .await;

    let result = match outcome {
        Ok(result) => result,
        Err(e) if e.is_cancelled() => Err(OcrError::Cancelled),
        Err(e) => Err(OcrError::engine(format!("{} adapter panicked: {}", E::NAME, e))),
    };

    match &result {
        Ok(ocr) => log::debug!(
            "[OCR] {} ({}, {}): {} chars in {}ms",
            label,
            E::NAME,
            accuracy,
            ocr.char_count(),
            start.elapsed().as_millis()
        ),
        Err(e) => log::warn!("[OCR] {} ({}, {}) failed: {}", label, E::NAME, accuracy, e),
    }

    result
}

#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
pub(crate) async fn run_until<E, C>(image: ImageInput, options: RecognizeOptions, cancel: C) -> Result<OcrResult>
where
    E: EngineAdapter,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;
        _ = cancel => {
            log::info!("[OCR] Recognition cancelled by caller");
            Err(OcrError::Cancelled)
        }
        result = run::<E>(image, options) => result,
    }
}

#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
pub(crate) async fn warm_up_engine<E: EngineAdapter>() -> Result<()> {
    let start = Instant::now();
    let outcome = tokio::task::spawn_blocking(|| {
        E::check_host()?;
        E::warm_up()
    })
    .await
    .map_err(|e| OcrError::engine(format!("{} warm-up panicked: {}", E::NAME, e)))?;
    log::info!(
        "[OCR] {} warm-up complete in {}ms",
        E::NAME,
        start.elapsed().as_millis()
    );
    outcome
}
