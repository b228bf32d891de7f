//! Latency summary for batch runs.

#[derive(Debug, Clone, PartialEq)]
pub struct LatencySummary {
    pub median: f64,
    pub average: f64,
    pub p99: f64,
}

/// Median, mean and p99 of the given latencies in ms. `None` when empty.
pub fn summarize(latencies: &[f64]) -> Option<LatencySummary> {
    if latencies.is_empty() {
        return None;
    }
    let mut sorted = latencies.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    // Nearest-rank: the ceil(0.99 * n)-th smallest sample.
    let p99_rank = (99 * n).div_ceil(100);
    let p99 = sorted[p99_rank.max(1) - 1];
    let average = sorted.iter().sum::<f64>() / sorted.len() as f64;

    Some(LatencySummary { median, average, p99 })
}

pub fn print_latency_summary(label: &str, latencies: &[f64], target_ms: f64) {
    let Some(summary) = summarize(latencies) else {
        return;
    };
    eprintln!("  [{}]", label);
    eprintln!("    Median: {:.1}ms", summary.median);
    eprintln!("    Average: {:.1}ms", summary.average);
    eprintln!("    P99: {:.1}ms", summary.p99);
    eprintln!(
        "    Target (< {:.0}ms): {}",
        target_ms,
        if summary.median < target_ms { "PASS" } else { "FAIL" }
    );
}
