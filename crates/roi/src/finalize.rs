use crate::bbox::Bbox;
use crate::config::RoiConfig;

/// Finalize a raw detection into the box handed downstream: clamp to the
/// frame, inflate width and height independently by the configured ratio
/// (truncating multiply, clamped to `[min_size, frame_height]`), center the
/// inflated box on the raw midpoint, and slide it fully inside the frame on
/// overflow.
///
/// Despite centering "square" extents, width and height inflate from their
/// own raw extents and generally differ.
pub fn finalize(raw: &Bbox, width: i32, height: i32, config: &RoiConfig) -> Bbox {
    let raw = raw.clamped(width, height);

    let inflated_w = inflate_extent(raw.width(), config, height);
    let inflated_h = inflate_extent(raw.height(), config, height);

    let cx = (raw.lx + raw.hx) / 2;
    let cy = (raw.ly + raw.hy) / 2;

    let (lx, hx) = place_span(cx, inflated_w, width);
    let (ly, hy) = place_span(cy, inflated_h, height);
    Bbox::new(lx, ly, hx, hy)
}

fn inflate_extent(raw_extent: i32, config: &RoiConfig, frame_height: i32) -> i32 {
    // min_size may exceed a small frame; the frame bound wins.
    let floor = config.min_size.min(frame_height);
    ((config.inflation_ratio * raw_extent as f32) as i32).clamp(floor, frame_height)
}

/// Center a span of `extent` pixels on `center`, sliding inside `[0, limit)`.
fn place_span(center: i32, extent: i32, limit: i32) -> (i32, i32) {
    let mut lo = center - extent / 2;
    let mut hi = lo + extent - 1;

    if lo < 0 {
        hi -= lo;
        lo = 0;
    }
    if hi > limit - 1 {
        lo -= hi - (limit - 1);
        hi = limit - 1;
    }
    (lo.max(0), hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RoiConfig {
        RoiConfig::default()
    }

    #[test]
    fn inflated_box_contains_raw_box() {
        let raw = Bbox::new(200, 150, 299, 249);
        let out = finalize(&raw, 960, 720, &config());
        assert!(out.contains(&raw));
        // 1.5 * 100 = 150 per axis.
        assert_eq!(out.width(), 150);
        assert_eq!(out.height(), 150);
    }

    #[test]
    fn small_detection_grows_to_min_size() {
        let raw = Bbox::new(400, 300, 405, 304);
        let out = finalize(&raw, 960, 720, &config());
        assert_eq!(out.width(), config().min_size);
        assert_eq!(out.height(), config().min_size);
        assert!(out.contains(&raw));
    }

    #[test]
    fn box_near_edge_slides_inside_frame() {
        let raw = Bbox::new(0, 0, 9, 9);
        let out = finalize(&raw, 960, 720, &config());
        assert!(out.lx >= 0 && out.ly >= 0);
        assert!(out.hx < 960 && out.hy < 720);
        assert!(out.contains(&raw));
    }

    #[test]
    fn huge_detection_clamps_to_frame_height() {
        let raw = Bbox::new(0, 0, 959, 719);
        let out = finalize(&raw, 960, 720, &config());
        assert!(out.width() <= 720 && out.height() <= 720);
        assert!(out.hx < 960 && out.hy < 720);
    }
}
