use roi::Bbox;

/// Evenly spaced calibration grid over an RGB frame: `regions` vertical and
/// horizontal divisions, for manual scale/offset tuning against a live
/// overlay.
pub fn draw_calibration_grid(
    frame: &mut [u8],
    width: usize,
    height: usize,
    regions: usize,
    color: [u8; 3],
) {
    if regions == 0 {
        return;
    }

    for i in 1..regions {
        let x = i * width / regions;
        for y in 0..height {
            put(frame, width, x, y, color);
        }
        let y = i * height / regions;
        for x in 0..width {
            put(frame, width, x, y, color);
        }
    }
}

/// One-pixel rectangle outline on an RGB frame. Out-of-frame bounds are
/// clamped rather than rejected.
pub fn draw_bbox(frame: &mut [u8], width: usize, height: usize, bbox: &Bbox, color: [u8; 3]) {
    let b = bbox.clamped(width as i32, height as i32);
    let (lx, ly, hx, hy) = (b.lx as usize, b.ly as usize, b.hx as usize, b.hy as usize);

    for x in lx..=hx {
        put(frame, width, x, ly, color);
        put(frame, width, x, hy, color);
    }
    for y in ly..=hy {
        put(frame, width, lx, y, color);
        put(frame, width, hx, y, color);
    }
}

fn put(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 3]) {
    let base = (y * width + x) * 3;
    frame[base..base + 3].copy_from_slice(&color);
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: [u8; 3] = [0, 255, 0];

    #[test]
    fn grid_lines_land_on_region_boundaries() {
        let (w, h) = (8, 8);
        let mut frame = vec![0u8; w * h * 3];
        draw_calibration_grid(&mut frame, w, h, 2, GREEN);

        // Vertical line at x=4, horizontal at y=4.
        assert_eq!(&frame[4 * 3..4 * 3 + 3], &GREEN);
        assert_eq!(&frame[(4 * w) * 3..(4 * w) * 3 + 3], &GREEN);
        // Off-grid pixel untouched.
        assert_eq!(frame[(w + 1) * 3], 0);
    }

    #[test]
    fn bbox_outline_touches_only_the_border() {
        let (w, h) = (16, 16);
        let mut frame = vec![0u8; w * h * 3];
        draw_bbox(&mut frame, w, h, &Bbox::new(2, 2, 6, 6), GREEN);

        assert_eq!(&frame[(2 * w + 2) * 3..(2 * w + 2) * 3 + 3], &GREEN);
        assert_eq!(&frame[(6 * w + 4) * 3..(6 * w + 4) * 3 + 3], &GREEN);
        // Interior stays black.
        assert_eq!(frame[(4 * w + 4) * 3], 0);
    }

    #[test]
    fn out_of_frame_bbox_is_clamped_not_panicking() {
        let (w, h) = (8, 8);
        let mut frame = vec![0u8; w * h * 3];
        draw_bbox(&mut frame, w, h, &Bbox::new(-4, -4, 20, 20), GREEN);
        assert_eq!(&frame[0..3], &GREEN);
    }
}
