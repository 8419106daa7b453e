use crate::acquisition::{decode_buffer, DoubleBuffer, DvsAcquisition};
use crate::gate::StageGate;
use crate::npu::NpuInterface;
use crate::publish::PublishLock;
use event::EventFrame;
use roi::{RoiDetector, RoiResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use stream::{RingReader, StreamError};
use transport::Transport;

/// Consumer seam for composited CIS frames (display, recording, inference
/// preprocess). Display plumbing itself lives outside the core.
pub trait FrameSink: Send {
    fn consume(&mut self, frame: &[u8], roi: Option<&RoiResult>) -> anyhow::Result<()>;
}

/// Discards frames; placeholder for headless runs.
pub struct NullSink;

impl FrameSink for NullSink {
    fn consume(&mut self, _frame: &[u8], _roi: Option<&RoiResult>) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Decode parameters the ROI station needs about the acquisition buffers.
#[derive(Clone, Copy)]
pub struct DecodeParams {
    pub accum_num: usize,
    pub payload_bytes: usize,
    pub header_enabled: bool,
    pub width: usize,
    pub height: usize,
}

/// DVS acquisition station: fills alternating buffers and publishes the
/// index of each completed fill. Steady-state errors are logged and the
/// loop continues; only termination stops it.
pub fn dvs_station<T: Transport>(
    mut acq: DvsAcquisition<T>,
    buffers: Arc<DoubleBuffer>,
    fresh: Arc<PublishLock<usize>>,
    stop: Arc<AtomicBool>,
) {
    let mut fills = 0u64;
    while !stop.load(Ordering::Relaxed) {
        match acq.fill_once(&buffers) {
            Ok(idx) => {
                fresh.write(true, |v| *v = idx);
                fills += 1;
                if fills.is_multiple_of(100) {
                    tracing::debug!(
                        fills,
                        dropped = acq.frames_dropped(),
                        "dvs acquisition status"
                    );
                }
            }
            Err(StreamError::Terminated) => break,
            Err(e) => tracing::warn!(error = %e, "dvs fill error"),
        }
    }
    tracing::info!(fills, dropped = acq.frames_dropped(), "dvs station stopped");
}

/// ROI station: drains the buffer the writer just left, decodes the
/// accumulated sub-frames, runs the streak detector, and publishes into
/// the shared box — waking consumers only on an actual detection.
///
/// `event_view`, when present, receives a copy of each decoded frame for
/// the fused-display path.
#[allow(clippy::too_many_arguments)]
pub fn roi_station(
    buffers: Arc<DoubleBuffer>,
    fresh: Arc<PublishLock<usize>>,
    bbox: Arc<PublishLock<Option<RoiResult>>>,
    event_view: Option<Arc<PublishLock<Vec<u8>>>>,
    detector: RoiDetector,
    params: DecodeParams,
    hold_last: bool,
    stop: Arc<AtomicBool>,
) {
    let mut frame = EventFrame::new(params.width, params.height);
    let mut cycles = 0u64;
    let mut detections = 0u64;

    loop {
        let idx = match fresh.read_latest() {
            Ok(idx) => idx,
            Err(_) => break,
        };
        if stop.load(Ordering::Relaxed) {
            break;
        }

        {
            let buf = buffers.lock(idx);
            if let Err(e) = decode_buffer(
                &buf,
                params.accum_num,
                params.payload_bytes,
                params.header_enabled,
                &mut frame,
            ) {
                tracing::warn!(error = %e, "decode error, skipping cycle");
                continue;
            }
        }

        if let Some(view) = &event_view {
            view.write(true, |v| v.copy_from_slice(frame.data()));
        }

        cycles += 1;
        match detector.detect_streak(frame.data()) {
            Some(result) => {
                detections += 1;
                bbox.write(true, |v| *v = Some(result));
            }
            None => {
                // No ROI is a normal outcome; clear silently unless the
                // hold-last policy keeps the previous box on screen.
                if !hold_last {
                    bbox.write(false, |v| *v = None);
                }
            }
        }
    }
    tracing::info!(cycles, detections, "roi station stopped");
}

/// CIS station: reads color frames, samples the most recent available box
/// (no frame-accurate correlation with the DVS side), composites, and
/// hands off to the sink. When an `event_view` is wired, the latest event
/// visualization is alpha-blended over the frame first.
#[allow(clippy::too_many_arguments)]
pub fn cis_station<T: Transport>(
    mut reader: RingReader<T>,
    bbox: Arc<PublishLock<Option<RoiResult>>>,
    event_view: Option<Arc<PublishLock<Vec<u8>>>>,
    cis_view: Option<Arc<PublishLock<Vec<u8>>>>,
    mut sink: Box<dyn FrameSink>,
    cis_dims: (usize, usize),
    dvs_dims: (usize, usize),
    map: roi::SensorMap,
    alpha: f32,
    stop: Arc<AtomicBool>,
) {
    let (cis_w, cis_h) = cis_dims;
    let (dvs_w, dvs_h) = dvs_dims;
    let mut frame = vec![0u8; cis_w * cis_h * 3];
    let mut frames = 0u64;

    const BOX_COLOR: [u8; 3] = [0, 255, 0];

    while !stop.load(Ordering::Relaxed) {
        match reader.read_frame(&mut frame) {
            Ok(()) => {}
            Err(StreamError::Terminated) => break,
            Err(e) => {
                tracing::warn!(error = %e, "cis read error");
                continue;
            }
        }

        // Inference sees the uncomposited frame.
        if let Some(view) = &cis_view {
            view.write(false, |v| v.copy_from_slice(&frame));
        }

        if let Some(view) = &event_view {
            let dvs = view.try_read();
            fusion::overlay_events(&mut frame, cis_w, cis_h, &dvs, dvs_w, dvs_h, &map, alpha);
        }

        let latest = bbox.try_read();
        if let Some(result) = &latest
            && let Some(mapped) = &result.mapped
        {
            fusion::draw_bbox(&mut frame, cis_w, cis_h, mapped, BOX_COLOR);
        }

        if let Err(e) = sink.consume(&frame, latest.as_ref()) {
            tracing::warn!(error = %e, "sink error");
        }
        frames += 1;
    }
    tracing::info!(frames, "cis station stopped");
}

/// One gate per stage boundary: N workers all execute the same chain, and
/// the gates guarantee at most one worker inside each stage at a time.
#[derive(Default)]
pub struct NpuStageGates {
    pub preprocess: StageGate,
    pub run: StageGate,
    pub postprocess: StageGate,
}

impl NpuStageGates {
    pub fn terminate(&self) {
        self.preprocess.terminate();
        self.run.terminate();
        self.postprocess.terminate();
    }
}

/// RGB crop of `bbox` out of a frame, nearest-resized to `out_dims`.
fn crop_resize_rgb(
    frame: &[u8],
    frame_dims: (usize, usize),
    bbox: &roi::Bbox,
    out_dims: (usize, usize),
) -> Vec<u8> {
    let (fw, fh) = frame_dims;
    let b = bbox.clamped(fw as i32, fh as i32);
    let (crop_w, crop_h) = (b.width() as usize, b.height() as usize);
    let (out_w, out_h) = out_dims;

    let mut out = vec![0u8; out_w * out_h * 3];
    for oy in 0..out_h {
        let sy = b.ly as usize + oy * crop_h / out_h;
        for ox in 0..out_w {
            let sx = b.lx as usize + ox * crop_w / out_w;
            let src = (sy * fw + sx) * 3;
            let dst = (oy * out_w + ox) * 3;
            out[dst..dst + 3].copy_from_slice(&frame[src..src + 3]);
        }
    }
    out
}

/// Inference worker: blocks for a published detection, crops the latest
/// CIS frame to the mapped box, and walks the preprocess → run →
/// postprocess chain through the stage gates. Several workers may run this
/// loop concurrently; the gates serialize each stage.
pub fn npu_worker(
    bbox: Arc<PublishLock<Option<RoiResult>>>,
    cis_view: Arc<PublishLock<Vec<u8>>>,
    gates: Arc<NpuStageGates>,
    npu: Arc<Mutex<Box<dyn NpuInterface>>>,
    cis_dims: (usize, usize),
    input_dims: (usize, usize),
    stop: Arc<AtomicBool>,
) {
    let mut inferences = 0u64;

    while !stop.load(Ordering::Relaxed) {
        let result = match bbox.read_latest() {
            Ok(Some(result)) => result,
            Ok(None) => continue,
            Err(_) => break,
        };
        let Some(mapped) = result.mapped else {
            continue;
        };

        if gates.preprocess.enter().is_err() {
            break;
        }
        let tensor = crop_resize_rgb(&cis_view.try_read(), cis_dims, &mapped, input_dims);
        gates.preprocess.leave();

        if gates.run.enter().is_err() {
            break;
        }
        let outcome = {
            let mut engine = match npu.lock() {
                Ok(g) => g,
                Err(poisoned) => poisoned.into_inner(),
            };
            engine
                .load_input(&tensor)
                .and_then(|_| engine.start())
                .and_then(|_| engine.wait_done())
        };
        gates.run.leave();

        if gates.postprocess.enter().is_err() {
            break;
        }
        match outcome {
            Ok(()) => {
                inferences += 1;
                tracing::trace!(?mapped, "inference complete");
            }
            Err(e) => tracing::warn!(error = %e, "inference failed"),
        }
        gates.postprocess.leave();
    }
    tracing::info!(inferences, "npu worker stopped");
}
