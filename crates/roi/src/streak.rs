use crate::bbox::Bbox;
use crate::config::RoiConfig;
use event::NEUTRAL;

/// Maximum-subarray (streak) detector.
///
/// Scores each row's pixels `+event_score` for an event and `-1` otherwise,
/// finds the best contiguous column interval per row (Kadane scan, ties to
/// the earliest interval), and requires `height_min_threshold` consecutive
/// rows whose best score clears `row_score_threshold` before committing the
/// accumulated candidate into the global box. A failing row resets the
/// streak and the candidate, never an already-committed box; the committed
/// box only grows for the remainder of the call.
pub fn detect(frame: &[u8], width: usize, height: usize, config: &RoiConfig) -> Option<Bbox> {
    let mut committed: Option<Bbox> = None;

    let mut streak = 0usize;
    let mut cand_lo = usize::MAX;
    let mut cand_hi = 0usize;

    for y in 0..height {
        let row = &frame[y * width..(y + 1) * width];

        match best_interval(row, config.event_score) {
            Some((lo, hi, score)) if score >= config.row_score_threshold => {
                streak += 1;
                cand_lo = cand_lo.min(lo);
                cand_hi = cand_hi.max(hi);

                if streak >= config.height_min_threshold {
                    let top = (y + 1 - streak) as i32;
                    let grown = match committed {
                        Some(b) => Bbox::new(
                            b.lx.min(cand_lo as i32),
                            b.ly.min(top),
                            b.hx.max(cand_hi as i32),
                            b.hy.max(y as i32),
                        ),
                        None => Bbox::new(cand_lo as i32, top, cand_hi as i32, y as i32),
                    };
                    committed = Some(grown);
                }
            }
            _ => {
                streak = 0;
                cand_lo = usize::MAX;
                cand_hi = 0;
            }
        }
    }

    committed
}

/// Kadane scan over one row: the contiguous column interval with the
/// highest cumulative score and that score. Strict comparisons keep the
/// earliest-starting interval on ties. None only for an empty row.
fn best_interval(row: &[u8], event_score: i32) -> Option<(usize, usize, i32)> {
    let mut best: Option<(usize, usize, i32)> = None;
    let mut cur_score = 0i32;
    let mut cur_start = 0usize;

    for (x, &px) in row.iter().enumerate() {
        if cur_score <= 0 {
            cur_score = 0;
            cur_start = x;
        }
        cur_score += if px != NEUTRAL { event_score } else { -1 };

        if best.map_or(true, |(_, _, s)| cur_score > s) {
            best = Some((cur_start, x, cur_score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use event::{OFF_VALUE, ON_VALUE};

    fn row(pattern: &[(usize, usize)], width: usize) -> Vec<u8> {
        let mut r = vec![NEUTRAL; width];
        for &(lo, hi) in pattern {
            for px in &mut r[lo..=hi] {
                *px = ON_VALUE;
            }
        }
        r
    }

    #[test]
    fn best_interval_finds_dense_run() {
        let r = row(&[(10, 19)], 64);
        let (lo, hi, score) = best_interval(&r, 5).unwrap();
        assert_eq!((lo, hi), (10, 19));
        assert_eq!(score, 50);
    }

    #[test]
    fn best_interval_bridges_a_small_gap() {
        // 5 events, 2 gaps, 5 events: bridging costs 2 and gains 25.
        let r = row(&[(10, 14), (17, 21)], 64);
        let (lo, hi, score) = best_interval(&r, 5).unwrap();
        assert_eq!((lo, hi), (10, 21));
        assert_eq!(score, 48);
    }

    #[test]
    fn ties_favor_the_earliest_interval() {
        let r = row(&[(5, 9), (40, 44)], 64);
        let (lo, hi, _) = best_interval(&r, 5).unwrap();
        assert_eq!((lo, hi), (5, 9));
    }

    #[test]
    fn off_events_score_like_on_events() {
        let mut r = vec![NEUTRAL; 64];
        for px in &mut r[20..30] {
            *px = OFF_VALUE;
        }
        let (lo, hi, score) = best_interval(&r, 5).unwrap();
        assert_eq!((lo, hi, score), (20, 29, 50));
    }

    #[test]
    fn short_streak_never_commits() {
        let (w, h) = (64, 64);
        let config = RoiConfig::default();
        let mut frame = vec![NEUTRAL; w * h];
        // Only height_min_threshold - 1 active rows.
        for y in 10..10 + config.height_min_threshold - 1 {
            for x in 20..40 {
                frame[y * w + x] = ON_VALUE;
            }
        }
        assert!(detect(&frame, w, h, &config).is_none());
    }

    #[test]
    fn interrupted_streak_resets_candidate_but_not_committed() {
        let (w, h) = (64, 128);
        let config = RoiConfig::default();
        let mut frame = vec![NEUTRAL; w * h];

        // A committing block...
        for y in 10..30 {
            for x in 20..40 {
                frame[y * w + x] = ON_VALUE;
            }
        }
        // ...then a too-short second block lower down.
        for y in 50..55 {
            for x in 0..15 {
                frame[y * w + x] = ON_VALUE;
            }
        }

        let raw = detect(&frame, w, h, &config).unwrap();
        assert_eq!(raw, Bbox::new(20, 10, 39, 29), "short block must not leak in");
    }

    #[test]
    fn all_neutral_frame_commits_nothing() {
        let frame = vec![NEUTRAL; 64 * 64];
        assert!(detect(&frame, 64, 64, &RoiConfig::default()).is_none());
    }
}
