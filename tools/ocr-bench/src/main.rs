//! OCR Benchmark CLI for native-ocr.
//!
//! Benchmarks the host OS vision engine through the recognition façade,
//! in-process, on one image or a whole directory.
//!
//! Usage:
//!   ocr-bench <image.png>                    Single image, accurate mode
//!   ocr-bench <image.png> --fast             Single image, fast mode
//!   ocr-bench <image.png> --compare          Single image, both modes side-by-side
//!   ocr-bench <image.png> --regions          Include per-line regions in the JSON
//!   ocr-bench --batch <directory>            All images in directory → CSV
//!   ocr-bench --batch <directory> --fast     Batch with fast mode
//!   ocr-bench --batch <directory> --compare  Batch with both modes
//!   --warm                                   Warm the engine up before measuring
//!
//! `OCR_LANGUAGES`, `OCR_MIN_TEXT_HEIGHT` and `OCR_LANGUAGE_CORRECTION`
//! (from the environment or `.env`) apply to every run.

#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
mod stats;

use std::process::ExitCode;

#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
#[derive(Debug, Clone, PartialEq)]
struct Args {
    target: Target,
    fast: bool,
    compare: bool,
    warm: bool,
    regions: bool,
}

#[cfg_attr(not(any(target_os = "macos", target_os = "windows")), allow(dead_code))]
#[derive(Debug, Clone, PartialEq)]
enum Target {
    Single(String),
    Batch(String),
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let flag = |name: &str| args.iter().any(|a| a == name);

    let target = match args.first().map(String::as_str) {
        None => return Err("missing image path".to_string()),
        Some("--batch") => {
            let dir = args
                .get(1)
                .filter(|a| !a.starts_with("--"))
                .ok_or("--batch requires a directory path")?;
            Target::Batch(dir.clone())
        }
        Some(path) if path.starts_with("--") => return Err(format!("expected an image path, got {}", path)),
        Some(path) => Target::Single(path.to_string()),
    };

    Ok(Args {
        target,
        fast: flag("--fast"),
        compare: flag("--compare"),
        warm: flag("--warm"),
        regions: flag("--regions"),
    })
}

fn usage() {
    eprintln!("Usage:");
    eprintln!("  ocr-bench <image> [--fast] [--compare] [--regions] [--warm]");
    eprintln!("  ocr-bench --batch <directory> [--fast] [--compare] [--warm]");
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            usage();
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = native_ocr::host_support() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match bench::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
mod bench {
    use super::stats::print_latency_summary;
    use super::{Args, Target};
    use native_ocr::{engine_name, recognize_with, OcrAccuracy, OcrConfig, OcrResult, RecognizeOptions};
    use serde::Serialize;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use std::time::Instant;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct SingleReport<'a> {
        engine: &'a str,
        recognition_level: OcrAccuracy,
        wall_time_ms: f64,
        confidence: Option<f64>,
        char_count: usize,
        text_preview: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        regions: Option<&'a [native_ocr::TextRegion]>,
    }

    pub async fn run(args: Args) -> Result<(), String> {
        let base = OcrConfig::from_env().map_err(|e| e.to_string())?.options;

        if args.warm {
            let warm_start = Instant::now();
            native_ocr::warm_up().await.map_err(|e| e.to_string())?;
            eprintln!(
                "[WARM-UP] {} initialized in {:.1}ms",
                engine_name(),
                warm_start.elapsed().as_micros() as f64 / 1000.0
            );
        }

        let level = if args.fast { OcrAccuracy::Fast } else { OcrAccuracy::Accurate };
        match &args.target {
            Target::Single(path) => run_single(path, &base, level, args.compare, args.regions).await,
            Target::Batch(dir) => run_batch(dir, &base, level, args.compare).await,
        }
    }

    /// Run OCR through the façade and measure wall-clock time.
    async fn timed(path: &Path, base: &RecognizeOptions, level: OcrAccuracy) -> Result<(OcrResult, f64), String> {
        let options = RecognizeOptions { accuracy: level, ..base.clone() };
        let start = Instant::now();
        let result = recognize_with(path, options).await.map_err(|e| e.to_string())?;
        Ok((result, start.elapsed().as_micros() as f64 / 1000.0))
    }

    async fn run_single(
        image_path: &str,
        base: &RecognizeOptions,
        level: OcrAccuracy,
        compare: bool,
        regions: bool,
    ) -> Result<(), String> {
        let path = Path::new(image_path);

        if compare {
            let (accurate, accurate_ms) = timed(path, base, OcrAccuracy::Accurate).await?;
            let (fast, fast_ms) = timed(path, base, OcrAccuracy::Fast).await?;

            eprintln!("=== COMPARISON: {} ({}) ===", image_path, engine_name());
            eprintln!();
            for (label, result, ms) in [("ACCURATE", &accurate, accurate_ms), ("FAST", &fast, fast_ms)] {
                eprintln!("  {}:", label);
                eprintln!("    Wall time: {:.2}ms", ms);
                eprintln!("    Chars: {}", result.char_count());
                match result.confidence {
                    Some(c) => eprintln!("    Confidence: {:.3}", c),
                    None => eprintln!("    Confidence: n/a"),
                }
                eprintln!();
            }
            eprintln!(
                "  Speedup: {:.1}x ({:.1}ms → {:.1}ms)",
                accurate_ms / fast_ms.max(0.1),
                accurate_ms,
                fast_ms
            );
            return Ok(());
        }

        let (result, wall_ms) = timed(path, base, level).await?;
        let report = SingleReport {
            engine: engine_name(),
            recognition_level: level,
            wall_time_ms: wall_ms,
            confidence: result.confidence,
            char_count: result.char_count(),
            text_preview: preview(&result.text, 200),
            regions: regions.then_some(result.regions.as_slice()),
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{}", json);
        Ok(())
    }

    async fn run_batch(dir_path: &str, base: &RecognizeOptions, level: OcrAccuracy, compare: bool) -> Result<(), String> {
        let entries = image_files(Path::new(dir_path))?;

        if compare {
            println!(
                "filename,chars_accurate,wall_ms_accurate,conf_accurate,\
                 chars_fast,wall_ms_fast,conf_fast,speedup"
            );
        } else {
            println!("filename,char_count,wall_ms,confidence,recognition_level");
        }

        let mut latencies_accurate: Vec<f64> = Vec::new();
        let mut latencies_fast: Vec<f64> = Vec::new();
        let mut failures = 0usize;

        for image_path in &entries {
            let filename = image_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if compare {
                let outcome = async {
                    let accurate = timed(image_path, base, OcrAccuracy::Accurate).await?;
                    let fast = timed(image_path, base, OcrAccuracy::Fast).await?;
                    Ok::<_, String>((accurate, fast))
                }
                .await;
                let ((accurate, accurate_ms), (fast, fast_ms)) = match outcome {
                    Ok(pair) => pair,
                    Err(e) => {
                        log::warn!("[BENCH] {}: {}", filename, e);
                        failures += 1;
                        continue;
                    }
                };
                println!(
                    "{},{},{:.2},{},{},{:.2},{},{:.1}x",
                    filename,
                    accurate.char_count(),
                    accurate_ms,
                    csv_confidence(accurate.confidence),
                    fast.char_count(),
                    fast_ms,
                    csv_confidence(fast.confidence),
                    accurate_ms / fast_ms.max(0.1)
                );
                latencies_accurate.push(accurate_ms);
                latencies_fast.push(fast_ms);
            } else {
                let (result, wall_ms) = match timed(image_path, base, level).await {
                    Ok(r) => r,
                    Err(e) => {
                        log::warn!("[BENCH] {}: {}", filename, e);
                        failures += 1;
                        continue;
                    }
                };
                println!(
                    "{},{},{:.2},{},{}",
                    filename,
                    result.char_count(),
                    wall_ms,
                    csv_confidence(result.confidence),
                    level
                );
                match level {
                    OcrAccuracy::Fast => latencies_fast.push(wall_ms),
                    OcrAccuracy::Accurate => latencies_accurate.push(wall_ms),
                }
            }

            std::io::stdout().flush().ok();
        }

        eprintln!("\n--- Benchmark Summary ({}) ---", engine_name());
        eprintln!("  Images processed: {}", entries.len());
        if failures > 0 {
            eprintln!("  Failures: {}", failures);
        }
        print_latency_summary("Accurate", &latencies_accurate, 300.0);
        print_latency_summary("Fast", &latencies_fast, 100.0);
        Ok(())
    }

    fn image_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
        if !dir.is_dir() {
            return Err(format!("Not a directory: {}", dir.display()));
        }
        let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| format!("Failed to read directory: {}", e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| {
                        matches!(
                            ext.to_ascii_lowercase().as_str(),
                            "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "gif" | "heic"
                        )
                    })
                    .unwrap_or(false)
            })
            .collect();
        entries.sort();

        if entries.is_empty() {
            return Err(format!("No image files found in {}", dir.display()));
        }
        Ok(entries)
    }

    fn csv_confidence(confidence: Option<f64>) -> String {
        confidence.map(|c| format!("{:.3}", c)).unwrap_or_default()
    }

    /// First `max_chars` characters, with an ellipsis when truncated.
    pub(super) fn preview(text: &str, max_chars: usize) -> String {
        let mut chars = text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
mod bench {
    use super::Args;

    // host_support() already failed before we get here.
    pub async fn run(_: Args) -> Result<(), String> {
        Err("ocr-bench needs macOS or Windows".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_image_with_flags() {
        let parsed = parse_args(&args(&["shot.png", "--fast", "--regions"])).unwrap();
        assert_eq!(parsed.target, Target::Single("shot.png".into()));
        assert!(parsed.fast);
        assert!(parsed.regions);
        assert!(!parsed.compare);
        assert!(!parsed.warm);
    }

    #[test]
    fn batch_requires_directory() {
        assert!(parse_args(&args(&["--batch"])).is_err());
        assert!(parse_args(&args(&["--batch", "--fast"])).is_err());
        let parsed = parse_args(&args(&["--batch", "shots", "--compare", "--warm"])).unwrap();
        assert_eq!(parsed.target, Target::Batch("shots".into()));
        assert!(parsed.compare);
        assert!(parsed.warm);
    }

    #[test]
    fn missing_or_flag_only_target_is_rejected() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_args(&args(&["--fast"])).is_err());
    }

    #[cfg(any(target_os = "macos", target_os = "windows"))]
    #[test]
    fn preview_truncates_on_char_boundaries() {
        assert_eq!(bench::preview("你好世界", 2), "你好...");
        assert_eq!(bench::preview("short", 200), "short");
    }
}
