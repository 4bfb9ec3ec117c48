//! One-shot trigger for cron-style schedulers: run a single cycle, print the
//! report as JSON, exit non-zero if the run failed.

use news_feed_ingestor::{
    config::AppConfig, ingest::config::load_sources_default, telemetry, Pipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cfg = AppConfig::load_default()?;
    let sources = load_sources_default()?;
    let pipeline = Pipeline::from_config(&cfg, sources)?;

    let report = pipeline.run_cycle().await?;
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
