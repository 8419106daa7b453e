use anyhow::Context;
use common::{retry_with_backoff, setup_logging};
use pipeline::{NullSink, Orchestrator, PipelineConfig};
use roi::RoiConfig;
use signal_hook::{
    consts::{SIGINT, SIGTERM},
    flag,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use transport::CharDevice;

fn main() -> anyhow::Result<()> {
    let config = PipelineConfig::from_env()?;
    setup_logging(config.environment.clone());

    let stop = Arc::new(AtomicBool::new(false));
    flag::register(SIGTERM, Arc::clone(&stop))?;
    flag::register(SIGINT, Arc::clone(&stop))?;
    tracing::info!("Signal handlers registered (SIGTERM, SIGINT)");

    let transport = retry_with_backoff(
        || CharDevice::open(&config.read_device, &config.write_device),
        10,
        200,
        "DMA device open",
    )
    .with_context(|| {
        format!(
            "failed to open DMA device pair {} / {}",
            config.read_device, config.write_device
        )
    })?;

    tracing::info!(
        dvs = format!("{}x{}", config.dvs.width, config.dvs.height),
        cis = format!("{}x{}", config.cis.width, config.cis.height),
        accum = config.accum_num,
        "pipeline configured"
    );

    let orchestrator = Orchestrator::new(
        config,
        RoiConfig::from_env(),
        Arc::new(transport),
        Box::new(NullSink),
    )
    .with_fused_display();

    match orchestrator.run(stop) {
        Ok(()) => {
            tracing::info!("pipeline stopped gracefully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("pipeline failed: {}", e);
            anyhow::bail!("pipeline error: {}", e)
        }
    }
}
