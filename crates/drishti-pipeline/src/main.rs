//! Incident-analysis pipeline binary.
//!
//! Usage: `drishti-pipeline <video path or URL>`

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use drishti_detector::GeminiClient;
use drishti_pipeline::{PipelineConfig, VideoPipeline};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("drishti=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let Some(source) = std::env::args().nth(1) else {
        eprintln!("usage: drishti-pipeline <video path or URL>");
        std::process::exit(2);
    };

    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    let gemini = match GeminiClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create Gemini client: {}", e);
            std::process::exit(1);
        }
    };

    let pipeline = VideoPipeline::new(config, gemini.clone()).with_narrator(gemini);

    match pipeline.run(&source).await {
        Ok(output) => {
            info!(
                total_frames = output.summary.total_frames,
                anomalies = output.summary.anomalies_detected,
                risk_level = %output.summary.risk_level,
                report = %output.report_path.display(),
                "Analysis complete"
            );
            match serde_json::to_string_pretty(&output.summary) {
                Ok(json) => println!("{json}"),
                Err(e) => error!("Failed to serialize summary: {}", e),
            }
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            std::process::exit(1);
        }
    }
}
