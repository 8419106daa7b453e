use roi::SensorMap;

/// Nearest-neighbor resize of a single-channel frame.
pub fn resize_nearest(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<u8> {
    let mut dst = vec![0u8; dst_w * dst_h];
    for dy in 0..dst_h {
        let sy = dy * src_h / dst_h;
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            dst[dy * dst_w + dx] = src[sy * src_w + sx];
        }
    }
    dst
}

/// Composite a gray DVS visualization onto an RGB CIS frame in place.
///
/// The DVS frame is taken to occupy the footprint the sensor mapping
/// implies: scaled to `(scale_x * dvs_w, scale_y * dvs_h)` and placed at
/// `(offset_x, offset_y)` in CIS coordinates. Only the intersection of
/// that footprint with the CIS frame is touched, so partially (or fully)
/// off-frame placements are handled by clamping. Blend is
/// `cis = (1 - alpha) * cis + alpha * dvs` per channel, the gray value
/// broadcast across RGB. Stateless; resize, crop, and blend in one pass.
pub fn overlay_events(
    cis: &mut [u8],
    cis_w: usize,
    cis_h: usize,
    dvs: &[u8],
    dvs_w: usize,
    dvs_h: usize,
    map: &SensorMap,
    alpha: f32,
) {
    let target_w = (map.scale_x * dvs_w as f32) as i64;
    let target_h = (map.scale_y * dvs_h as f32) as i64;
    if target_w <= 0 || target_h <= 0 {
        return;
    }

    let x0 = map.offset_x as i64;
    let y0 = map.offset_y as i64;

    let cx_lo = x0.max(0);
    let cy_lo = y0.max(0);
    let cx_hi = (x0 + target_w).min(cis_w as i64);
    let cy_hi = (y0 + target_h).min(cis_h as i64);
    if cx_lo >= cx_hi || cy_lo >= cy_hi {
        return;
    }

    for cy in cy_lo..cy_hi {
        let sy = ((cy - y0) * dvs_h as i64 / target_h) as usize;
        for cx in cx_lo..cx_hi {
            let sx = ((cx - x0) * dvs_w as i64 / target_w) as usize;
            let v = dvs[sy * dvs_w + sx] as f32;

            let base = (cy as usize * cis_w + cx as usize) * 3;
            for ch in &mut cis[base..base + 3] {
                *ch = ((1.0 - alpha) * *ch as f32 + alpha * v) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(scale: f32, ox: f32, oy: f32) -> SensorMap {
        SensorMap {
            scale_x: scale,
            scale_y: scale,
            offset_x: ox,
            offset_y: oy,
        }
    }

    #[test]
    fn resize_preserves_corner_values() {
        let src = vec![
            10, 20, //
            30, 40,
        ];
        let dst = resize_nearest(&src, 2, 2, 4, 4);
        assert_eq!(dst[0], 10);
        assert_eq!(dst[3], 20);
        assert_eq!(dst[12], 30);
        assert_eq!(dst[15], 40);
    }

    #[test]
    fn full_alpha_replaces_cis_inside_footprint() {
        let (cw, ch) = (8, 8);
        let mut cis = vec![100u8; cw * ch * 3];
        let dvs = vec![200u8; 4 * 4];

        overlay_events(&mut cis, cw, ch, &dvs, 4, 4, &map(1.0, 2.0, 2.0), 1.0);

        // Inside the 4x4 footprint at (2,2).
        let inside = (3 * cw + 3) * 3;
        assert_eq!(&cis[inside..inside + 3], &[200, 200, 200]);
        // Outside untouched.
        let outside = 0;
        assert_eq!(&cis[outside..outside + 3], &[100, 100, 100]);
    }

    #[test]
    fn half_alpha_blends() {
        let (cw, ch) = (4, 4);
        let mut cis = vec![100u8; cw * ch * 3];
        let dvs = vec![200u8; 4 * 4];

        overlay_events(&mut cis, cw, ch, &dvs, 4, 4, &map(1.0, 0.0, 0.0), 0.5);
        assert_eq!(cis[0], 150);
    }

    #[test]
    fn negative_offset_clips_to_frame() {
        let (cw, ch) = (4, 4);
        let mut cis = vec![0u8; cw * ch * 3];
        let dvs = vec![255u8; 4 * 4];

        overlay_events(&mut cis, cw, ch, &dvs, 4, 4, &map(1.0, -2.0, -2.0), 1.0);

        // Visible part covers (0,0)-(1,1).
        assert_eq!(cis[0], 255);
        let beyond = (2 * cw + 2) * 3;
        assert_eq!(cis[beyond], 0);
    }

    #[test]
    fn fully_off_frame_footprint_is_a_no_op() {
        let (cw, ch) = (4, 4);
        let mut cis = vec![7u8; cw * ch * 3];
        let dvs = vec![255u8; 4 * 4];

        overlay_events(&mut cis, cw, ch, &dvs, 4, 4, &map(1.0, 100.0, 100.0), 1.0);
        assert!(cis.iter().all(|&b| b == 7));
    }

    #[test]
    fn scaled_footprint_doubles_coverage() {
        let (cw, ch) = (8, 8);
        let mut cis = vec![0u8; cw * ch * 3];
        let dvs = vec![255u8; 2 * 2];

        overlay_events(&mut cis, cw, ch, &dvs, 2, 2, &map(2.0, 0.0, 0.0), 1.0);

        // 2x scale of a 2x2 source covers (0,0)-(3,3).
        assert_eq!(cis[(3 * cw + 3) * 3], 255);
        assert_eq!(cis[(4 * cw + 4) * 3], 0);
    }
}
