use common::config::env_or;

/// Detector tunables. Defaults match the calibrated sensor pairing; all
/// overridable from the environment.
#[derive(Debug, Clone)]
pub struct RoiConfig {
    /// Minimum run of consecutive above-average columns/rows for the
    /// average-threshold detector.
    pub line_width: usize,
    /// Score contributed by an event pixel in the streak detector's
    /// maximum-subarray scan (non-events score -1).
    pub event_score: i32,
    /// Minimum best-interval score for a row to count as active.
    pub row_score_threshold: i32,
    /// Consecutive active rows required before a candidate commits.
    pub height_min_threshold: usize,
    /// Final box inflation, truncating multiply on the raw extent.
    pub inflation_ratio: f32,
    /// Lower clamp on the inflated box's extent, in pixels.
    pub min_size: i32,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            line_width: 5,
            event_score: 5,
            row_score_threshold: 25,
            height_min_threshold: 10,
            inflation_ratio: 1.5,
            min_size: 60,
        }
    }
}

impl RoiConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            line_width: env_or("ROI_LINE_WIDTH", d.line_width),
            event_score: env_or("ROI_EVENT_SCORE", d.event_score),
            row_score_threshold: env_or("ROI_ROW_SCORE_THRESHOLD", d.row_score_threshold),
            height_min_threshold: env_or("ROI_HEIGHT_MIN_THRESHOLD", d.height_min_threshold),
            inflation_ratio: env_or("ROI_INFLATION_RATIO", d.inflation_ratio),
            min_size: env_or("ROI_MIN_SIZE", d.min_size),
        }
    }
}
