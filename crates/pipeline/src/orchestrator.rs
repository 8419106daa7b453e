use crate::acquisition::{DoubleBuffer, DvsAcquisition};
use crate::config::PipelineConfig;
use crate::npu::NpuInterface;
use crate::publish::PublishLock;
use crate::station::{self, DecodeParams, FrameSink, NpuStageGates};
use anyhow::Context;
use event::NEUTRAL;
use roi::{RoiConfig, RoiDetector, RoiResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use stream::RingReader;
use transport::Transport;

/// Optional inference tail: the engine, how many worker threads walk the
/// stage chain, and the tensor dimensions the engine expects.
pub struct NpuSetup {
    pub engine: Box<dyn NpuInterface>,
    pub workers: usize,
    pub input_dims: (usize, usize),
}

/// Wires the station threads together over the shared state: DVS
/// acquisition feeding double buffers, the ROI detector publishing into
/// the shared box, the CIS consumer sampling it, and optionally the NPU
/// worker pool.
///
/// Shutdown discipline: `run` terminates every lock and gate it signals
/// into before joining — a producer that skips this leaves its consumers
/// blocked forever.
pub struct Orchestrator<T: Transport + 'static> {
    config: PipelineConfig,
    roi_config: RoiConfig,
    transport: Arc<T>,
    sink: Box<dyn FrameSink>,
    npu: Option<NpuSetup>,
    fused_display: bool,
}

impl<T: Transport + 'static> Orchestrator<T> {
    pub fn new(
        config: PipelineConfig,
        roi_config: RoiConfig,
        transport: Arc<T>,
        sink: Box<dyn FrameSink>,
    ) -> Self {
        Self {
            config,
            roi_config,
            transport,
            sink,
            npu: None,
            fused_display: false,
        }
    }

    /// Blend the event visualization over the color frame (calibration and
    /// fused-display modes).
    pub fn with_fused_display(mut self) -> Self {
        self.fused_display = true;
        self
    }

    pub fn with_npu(mut self, setup: NpuSetup) -> Self {
        self.npu = Some(setup);
        self
    }

    /// Run until the shared stop flag rises, then terminate and join all
    /// stations.
    pub fn run(self, stop: Arc<AtomicBool>) -> anyhow::Result<()> {
        let config = &self.config;
        let dvs_dims = (config.dvs.width, config.dvs.height);
        let cis_dims = (config.cis.width, config.cis.height);

        let acq = DvsAcquisition::new(
            RingReader::new(
                Arc::clone(&self.transport),
                config.dvs_layout(),
                config.poll_strategy(),
                Arc::clone(&stop),
            ),
            config.accum_num,
            config.dvs_payload_bytes(),
            config.header_enabled,
        );
        let cis_reader = RingReader::new(
            Arc::clone(&self.transport),
            config.cis_layout(),
            config.poll_strategy(),
            Arc::clone(&stop),
        );

        let buffers = Arc::new(DoubleBuffer::new(acq.buffer_bytes()));
        let fresh = Arc::new(PublishLock::new(0usize));
        let bbox: Arc<PublishLock<Option<RoiResult>>> = Arc::new(PublishLock::new(None));
        let event_view = self
            .fused_display
            .then(|| Arc::new(PublishLock::new(vec![NEUTRAL; dvs_dims.0 * dvs_dims.1])));
        let cis_view = self
            .npu
            .is_some()
            .then(|| Arc::new(PublishLock::new(vec![0u8; cis_dims.0 * cis_dims.1 * 3])));

        let detector = RoiDetector::new(self.roi_config.clone(), dvs_dims.0, dvs_dims.1)
            .with_mapping(config.sensor_map(), cis_dims.0, cis_dims.1);
        let params = DecodeParams {
            accum_num: config.accum_num,
            payload_bytes: config.dvs_payload_bytes(),
            header_enabled: config.header_enabled,
            width: dvs_dims.0,
            height: dvs_dims.1,
        };

        let mut handles: Vec<JoinHandle<()>> = Vec::new();

        handles.push(spawn_named("dvs-acq", {
            let buffers = Arc::clone(&buffers);
            let fresh = Arc::clone(&fresh);
            let stop = Arc::clone(&stop);
            move || station::dvs_station(acq, buffers, fresh, stop)
        })?);

        handles.push(spawn_named("roi-detect", {
            let buffers = Arc::clone(&buffers);
            let fresh = Arc::clone(&fresh);
            let bbox = Arc::clone(&bbox);
            let event_view = event_view.clone();
            let stop = Arc::clone(&stop);
            let hold_last = config.hold_last_roi;
            move || {
                station::roi_station(
                    buffers, fresh, bbox, event_view, detector, params, hold_last, stop,
                )
            }
        })?);

        handles.push(spawn_named("cis-fuse", {
            let bbox = Arc::clone(&bbox);
            let event_view = event_view.clone();
            let cis_view = cis_view.clone();
            let stop = Arc::clone(&stop);
            let map = config.sensor_map();
            let alpha = config.overlay_alpha;
            let sink = self.sink;
            move || {
                station::cis_station(
                    cis_reader, bbox, event_view, cis_view, sink, cis_dims, dvs_dims, map,
                    alpha, stop,
                )
            }
        })?);

        let gates = Arc::new(NpuStageGates::default());
        if let Some(setup) = self.npu {
            let engine: Arc<Mutex<Box<dyn NpuInterface>>> = Arc::new(Mutex::new(setup.engine));
            let cis_view = cis_view
                .clone()
                .context("cis view must exist when the npu is enabled")?;

            for worker in 0..setup.workers {
                handles.push(spawn_named(&format!("npu-worker-{worker}"), {
                    let bbox = Arc::clone(&bbox);
                    let cis_view = Arc::clone(&cis_view);
                    let gates = Arc::clone(&gates);
                    let engine = Arc::clone(&engine);
                    let stop = Arc::clone(&stop);
                    let input_dims = setup.input_dims;
                    move || {
                        station::npu_worker(
                            bbox, cis_view, gates, engine, cis_dims, input_dims, stop,
                        )
                    }
                })?);
            }
        }

        tracing::info!(
            stations = handles.len(),
            fused_display = self.fused_display,
            "pipeline running"
        );

        while !stop.load(Ordering::Relaxed) {
            thread::sleep(Duration::from_millis(50));
        }

        // Terminate everything we signal into before joining, so no station
        // stays blocked in a wait.
        fresh.terminate();
        bbox.terminate();
        if let Some(view) = &event_view {
            view.terminate();
        }
        if let Some(view) = &cis_view {
            view.terminate();
        }
        gates.terminate();

        for handle in handles {
            handle
                .join()
                .map_err(|_| anyhow::anyhow!("station thread panicked"))?;
        }
        tracing::info!("pipeline stopped");
        Ok(())
    }
}

fn spawn_named<F>(name: &str, f: F) -> anyhow::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .with_context(|| format!("failed to spawn {name} thread"))
}
