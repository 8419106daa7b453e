use crate::bbox::Bbox;
use crate::config::RoiConfig;
use event::NEUTRAL;

/// Noise floor for the per-axis average threshold: near-empty frames would
/// otherwise produce an average of 0 and let single stray events qualify.
const MIN_AXIS_AVG: u32 = 5;

/// Average-threshold projection detector.
///
/// Projects event counts onto both axes, then looks for runs of at least
/// `line_width` consecutive columns (rows) whose count exceeds the axis
/// average. Returns the raw union of qualifying runs, or None when either
/// axis has no qualifying run.
pub fn detect(frame: &[u8], width: usize, height: usize, config: &RoiConfig) -> Option<Bbox> {
    let mut x_count = vec![0u32; width];
    let mut y_count = vec![0u32; height];
    let mut total = 0u32;

    for y in 0..height {
        let row = &frame[y * width..(y + 1) * width];
        for (x, &px) in row.iter().enumerate() {
            if px != NEUTRAL {
                x_count[x] += 1;
                y_count[y] += 1;
                total += 1;
            }
        }
    }

    let x_avg = (total / width as u32).max(MIN_AXIS_AVG);
    let y_avg = (total / height as u32).max(MIN_AXIS_AVG);

    let x_range = scan_axis(&x_count, x_avg, config.line_width)?;
    let y_range = scan_axis(&y_count, y_avg, config.line_width)?;

    Some(Bbox::new(
        x_range.0 as i32,
        y_range.0 as i32,
        x_range.1 as i32,
        y_range.1 as i32,
    ))
}

/// Union of all runs of `min_run` consecutive above-threshold bins.
fn scan_axis(counts: &[u32], threshold: u32, min_run: usize) -> Option<(usize, usize)> {
    let mut run = 0usize;
    let mut range: Option<(usize, usize)> = None;

    for (i, &count) in counts.iter().enumerate() {
        if count > threshold {
            run += 1;
            if run >= min_run {
                let start = i + 1 - run;
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(start), hi.max(i)),
                    None => (start, i),
                });
            }
        } else {
            run = 0;
        }
    }
    range
}

#[cfg(test)]
mod tests {
    use super::*;
    use event::ON_VALUE;

    fn frame_with_block(
        width: usize,
        height: usize,
        lx: usize,
        ly: usize,
        hx: usize,
        hy: usize,
    ) -> Vec<u8> {
        let mut frame = vec![NEUTRAL; width * height];
        for y in ly..=hy {
            for x in lx..=hx {
                frame[y * width + x] = ON_VALUE;
            }
        }
        frame
    }

    #[test]
    fn raw_box_is_contained_in_the_true_block() {
        let (w, h) = (320, 240);
        let frame = frame_with_block(w, h, 100, 80, 160, 140);
        let config = RoiConfig::default();

        let raw = detect(&frame, w, h, &config).expect("block must be detected");
        let truth = Bbox::new(100, 80, 160, 140);
        assert!(truth.contains(&raw), "raw {raw:?} outside block {truth:?}");
    }

    #[test]
    fn block_touching_origin_is_still_a_detection() {
        // The source used index 0 as a "nothing found" sentinel; a block in
        // the top-left corner must not be mistaken for absence.
        let (w, h) = (320, 240);
        let frame = frame_with_block(w, h, 0, 0, 60, 60);
        let raw = detect(&frame, w, h, &RoiConfig::default()).expect("corner block detected");
        assert_eq!((raw.lx, raw.ly), (0, 0));
    }

    #[test]
    fn empty_frame_yields_none() {
        let frame = vec![NEUTRAL; 320 * 240];
        assert!(detect(&frame, 320, 240, &RoiConfig::default()).is_none());
    }

    #[test]
    fn sparse_noise_yields_none() {
        let (w, h) = (320, 240);
        let mut frame = vec![NEUTRAL; w * h];
        // Scattered isolated events, none forming a line_width run.
        for i in 0..20 {
            frame[(i * 97) % (w * h)] = ON_VALUE;
        }
        assert!(detect(&frame, w, h, &RoiConfig::default()).is_none());
    }
}
