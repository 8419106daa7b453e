use crate::bbox::{Bbox, SensorMap};
use crate::config::RoiConfig;
use crate::{average, finalize, streak};

/// One detection outcome: the raw committed bounds, the finalized
/// (inflated, clamped) box in the DVS frame, and the finalized box in the
/// CIS frame when a sensor mapping is configured.
#[derive(Debug, Clone, Copy)]
pub struct RoiResult {
    pub raw: Bbox,
    pub bbox: Bbox,
    pub mapped: Option<Bbox>,
}

/// Detector over decoded single-channel event frames. Holds the tunables,
/// the DVS frame geometry, and the optional mapping into the companion
/// color sensor's frame.
pub struct RoiDetector {
    config: RoiConfig,
    width: usize,
    height: usize,
    mapping: Option<(SensorMap, (usize, usize))>,
}

impl RoiDetector {
    pub fn new(config: RoiConfig, width: usize, height: usize) -> Self {
        Self {
            config,
            width,
            height,
            mapping: None,
        }
    }

    /// Configure the DVS→CIS mapping and the CIS frame dimensions used to
    /// clamp the mapped box.
    pub fn with_mapping(mut self, map: SensorMap, cis_width: usize, cis_height: usize) -> Self {
        self.mapping = Some((map, (cis_width, cis_height)));
        self
    }

    pub fn config(&self) -> &RoiConfig {
        &self.config
    }

    /// Average-threshold projection variant.
    pub fn detect_average(&self, frame: &[u8]) -> Option<RoiResult> {
        let raw = average::detect(frame, self.width, self.height, &self.config)?;
        Some(self.finish(raw))
    }

    /// Maximum-subarray streak variant (preferred).
    pub fn detect_streak(&self, frame: &[u8]) -> Option<RoiResult> {
        let raw = streak::detect(frame, self.width, self.height, &self.config)?;
        Some(self.finish(raw))
    }

    fn finish(&self, raw: Bbox) -> RoiResult {
        let bbox = finalize::finalize(&raw, self.width as i32, self.height as i32, &self.config);

        let mapped = self.mapping.as_ref().map(|(map, (cw, ch))| {
            finalize::finalize(&map.map_bbox(&raw), *cw as i32, *ch as i32, &self.config)
        });

        tracing::debug!(?raw, ?bbox, "roi detected");
        RoiResult { raw, bbox, mapped }
    }
}
