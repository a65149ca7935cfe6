//! Request metrics and statistics tracking for the scoring service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the scoring endpoint
pub struct ScoringMetrics {
    /// Total requests scored successfully
    pub requests_scored: AtomicU64,
    /// Requests flagged as fraudulent
    pub frauds_flagged: AtomicU64,
    /// Requests rejected by validation
    pub validation_failures: AtomicU64,
    /// Requests that failed inside the scoring function
    pub scoring_failures: AtomicU64,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Fraud probability distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ScoringMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_scored: AtomicU64::new(0),
            frauds_flagged: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            scoring_failures: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a successfully scored request
    pub fn record_request(
        &self,
        processing_time: Duration,
        fraud_probability: f64,
        fraudulent: bool,
    ) {
        self.requests_scored.fetch_add(1, Ordering::Relaxed);
        if fraudulent {
            self.frauds_flagged.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only the most recent samples
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        let bucket = (fraud_probability * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.score_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a request rejected by validation
    pub fn record_validation_failure(&self) {
        self.validation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a scoring failure
    pub fn record_scoring_failure(&self) {
        self.scoring_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = self.processing_times.read().unwrap();
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_scored.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get fraud probability distribution
    pub fn get_score_distribution(&self) -> [u64; 10] {
        *self.score_buckets.read().unwrap()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let scored = self.requests_scored.load(Ordering::Relaxed);
        let flagged = self.frauds_flagged.load(Ordering::Relaxed);
        let invalid = self.validation_failures.load(Ordering::Relaxed);
        let failed = self.scoring_failures.load(Ordering::Relaxed);
        let fraud_rate = if scored > 0 {
            (flagged as f64 / scored as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();
        let score_dist = self.get_score_distribution();

        info!("╔══════════════════════════════════════════════════════════╗");
        info!("║            FRAUD DETECTION API - METRICS SUMMARY         ║");
        info!("╠══════════════════════════════════════════════════════════╣");
        info!(
            "║ Requests Scored: {:>8}  │  Throughput: {:>6.1} req/s    ║",
            scored, throughput
        );
        info!(
            "║ Frauds Flagged:  {:>8}  │  Fraud Rate: {:>6.1}%         ║",
            flagged, fraud_rate
        );
        info!(
            "║ Validation Failures: {:>6}  │  Scoring Failures: {:>6}  ║",
            invalid, failed
        );
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5}     ║",
            processing.mean_us, processing.p50_us, processing.p95_us
        );
        info!("╠══════════════════════════════════════════════════════════╣");
        info!("║ Fraud Probability Distribution:                          ║");
        let total: u64 = score_dist.iter().sum();
        for (i, &count) in score_dist.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar_len = (pct / 2.0) as usize;
            let bar: String = "█".repeat(bar_len.min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════╝");
    }
}

impl Default for ScoringMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that prints periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<ScoringMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<ScoringMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
