//! Process-level statistics for the scoring pipeline.

use crate::types::summary::UploadSummary;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector covering every upload processed by this process.
pub struct PipelineMetrics {
    pub uploads_processed: AtomicU64,
    pub records_scored: AtomicU64,
    pub records_committed: AtomicU64,
    pub chunks_failed: AtomicU64,
    /// Risk-tier totals across uploads
    tier_counts: RwLock<HashMap<String, u64>>,
    /// Per-upload wall times (microseconds)
    upload_times: RwLock<Vec<u64>>,
    start_time: Instant,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            uploads_processed: AtomicU64::new(0),
            records_scored: AtomicU64::new(0),
            records_committed: AtomicU64::new(0),
            chunks_failed: AtomicU64::new(0),
            tier_counts: RwLock::new(HashMap::new()),
            upload_times: RwLock::new(Vec::with_capacity(64)),
            start_time: Instant::now(),
        }
    }

    /// Record one completed upload.
    pub fn record_upload(&self, elapsed: Duration, summary: &UploadSummary) {
        self.uploads_processed.fetch_add(1, Ordering::Relaxed);
        self.records_scored
            .fetch_add(summary.processed_records as u64, Ordering::Relaxed);
        self.records_committed
            .fetch_add(summary.persistence.committed as u64, Ordering::Relaxed);
        self.chunks_failed.fetch_add(
            summary.persistence.failed_chunks.len() as u64,
            Ordering::Relaxed,
        );

        if let Ok(mut counts) = self.tier_counts.write() {
            for (tier, count) in &summary.risk_distribution {
                *counts.entry(tier.clone()).or_insert(0) += count;
            }
        }

        if let Ok(mut times) = self.upload_times.write() {
            times.push(elapsed.as_micros() as u64);
            // Keep the window bounded for long-running processes.
            if times.len() > 10_000 {
                times.drain(0..5_000);
            }
        }
    }

    pub fn get_upload_stats(&self) -> ProcessingStats {
        let times = match self.upload_times.read() {
            Ok(times) => times,
            Err(_) => return ProcessingStats::default(),
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();
        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    pub fn get_tier_counts(&self) -> HashMap<String, u64> {
        self.tier_counts
            .read()
            .map(|counts| counts.clone())
            .unwrap_or_default()
    }

    /// Uploads per second since process start.
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.uploads_processed.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log the end-of-run summary.
    pub fn print_summary(&self) {
        let uploads = self.uploads_processed.load(Ordering::Relaxed);
        let scored = self.records_scored.load(Ordering::Relaxed);
        let committed = self.records_committed.load(Ordering::Relaxed);
        let failed_chunks = self.chunks_failed.load(Ordering::Relaxed);
        let stats = self.get_upload_stats();

        info!(
            uploads,
            records_scored = scored,
            records_committed = committed,
            failed_chunks,
            "pipeline run complete"
        );
        info!(
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p95_us = stats.p95_us,
            p99_us = stats.p99_us,
            "upload processing times"
        );
        for (tier, count) in self.get_tier_counts() {
            let pct = if scored > 0 {
                (count as f64 / scored as f64) * 100.0
            } else {
                0.0
            };
            info!(tier = %tier, count, pct = format!("{pct:.1}%"), "tier totals");
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Upload wall-time statistics.
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}
