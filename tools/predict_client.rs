//! Test Prediction Client
//!
//! Posts sample transactions to a running Fraud Detection API instance
//! and logs the scoring responses.

use fraud_detection_api::types::prediction::PredictionResult;
use fraud_detection_api::types::transaction::TransactionFeatures;
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate a transaction with a randomized amount.
    ///
    /// The anonymized components come from the documented sample record;
    /// only the amount varies between requests.
    fn generate(&mut self) -> TransactionFeatures {
        let mut features = TransactionFeatures::sample();
        features.amount = self.rng.gen_range(1.0..2500.0);
        features
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("predict_client=info".parse()?),
        )
        .init();

    info!("Starting Test Prediction Client");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let base_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("http://127.0.0.1:8000");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(10);
    let delay_ms: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        base_url = %base_url,
        count = count,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = reqwest::Client::new();
    let predict_url = format!("{base_url}/predict");
    let mut generator = RequestGenerator::new();
    let mut flagged = 0u64;

    for i in 1..=count {
        let features = generator.generate();
        let amount = features.amount;

        let response = match client.post(&predict_url).json(&features).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(request = i, error = %e, "Request failed");
                continue;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(request = i, status = %status, detail = %detail, "Scoring rejected");
            continue;
        }

        match response.json::<PredictionResult>().await {
            Ok(result) => {
                if result.fraudulent {
                    flagged += 1;
                }
                info!(
                    request = i,
                    amount = format!("{amount:.2}"),
                    fraud_probability = result.fraud_probability,
                    fraudulent = result.fraudulent,
                    "Transaction scored"
                );
            }
            Err(e) => {
                warn!(request = i, error = %e, "Failed to decode response");
            }
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        total = count,
        flagged = flagged,
        "Test prediction client finished"
    );

    Ok(())
}
