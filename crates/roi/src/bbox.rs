/// Inclusive pixel bounds of a rectangular region. Valid boxes satisfy
/// `lx <= hx` and `ly <= hy`; "no ROI" is expressed as `Option::None` at
/// the detector boundary, never as sentinel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bbox {
    pub lx: i32,
    pub ly: i32,
    pub hx: i32,
    pub hy: i32,
}

impl Bbox {
    pub fn new(lx: i32, ly: i32, hx: i32, hy: i32) -> Self {
        Self { lx, ly, hx, hy }
    }

    pub fn width(&self) -> i32 {
        self.hx - self.lx + 1
    }

    pub fn height(&self) -> i32 {
        self.hy - self.ly + 1
    }

    pub fn contains(&self, other: &Bbox) -> bool {
        self.lx <= other.lx && self.ly <= other.ly && self.hx >= other.hx && self.hy >= other.hy
    }

    /// Clamp all four bounds into `[0, w-1] x [0, h-1]`.
    pub fn clamped(&self, width: i32, height: i32) -> Self {
        Self {
            lx: self.lx.clamp(0, width - 1),
            ly: self.ly.clamp(0, height - 1),
            hx: self.hx.clamp(0, width - 1),
            hy: self.hy.clamp(0, height - 1),
        }
    }
}

/// Affine mapping from DVS pixel coordinates into the CIS frame:
/// `cis = scale * dvs + offset`, truncating float-to-int casts. Set once
/// from calibration constants at startup, read-only after.
#[derive(Debug, Clone, Copy)]
pub struct SensorMap {
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl SensorMap {
    pub fn map_point(&self, x: i32, y: i32) -> (i32, i32) {
        (
            (self.scale_x * x as f32 + self.offset_x) as i32,
            (self.scale_y * y as f32 + self.offset_y) as i32,
        )
    }

    pub fn map_bbox(&self, b: &Bbox) -> Bbox {
        let (lx, ly) = self.map_point(b.lx, b.ly);
        let (hx, hy) = self.map_point(b.hx, b.hy);
        Bbox::new(lx, ly, hx, hy)
    }

    /// Inverse direction (CIS → DVS), same truncating cast convention as
    /// the forward mapping.
    pub fn unmap_point(&self, x: i32, y: i32) -> (i32, i32) {
        (
            ((x as f32 - self.offset_x) / self.scale_x) as i32,
            ((y as f32 - self.offset_y) / self.scale_y) as i32,
        )
    }

    pub fn unmap_bbox(&self, b: &Bbox) -> Bbox {
        let (lx, ly) = self.unmap_point(b.lx, b.ly);
        let (hx, hy) = self.unmap_point(b.hx, b.hy);
        Bbox::new(lx, ly, hx, hy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_extents_are_inclusive() {
        let b = Bbox::new(10, 20, 19, 39);
        assert_eq!(b.width(), 10);
        assert_eq!(b.height(), 20);
    }

    #[test]
    fn clamping_pins_out_of_frame_bounds() {
        let b = Bbox::new(-5, 10, 700, 700).clamped(640, 480);
        assert_eq!(b, Bbox::new(0, 10, 639, 479));
    }

    #[test]
    fn mapping_round_trip_within_one_pixel() {
        let map = SensorMap {
            scale_x: 1.35,
            scale_y: 1.35,
            offset_x: 160.0,
            offset_y: 90.0,
        };
        let b = Bbox::new(100, 200, 300, 450);

        let back = map.unmap_bbox(&map.map_bbox(&b));
        for (got, want) in [
            (back.lx, b.lx),
            (back.ly, b.ly),
            (back.hx, b.hx),
            (back.hy, b.hy),
        ] {
            assert!(
                (got - want).abs() <= 1,
                "round trip drifted more than 1px: {got} vs {want}"
            );
        }
    }

    #[test]
    fn negative_offsets_map_both_ways() {
        let map = SensorMap {
            scale_x: 0.5,
            scale_y: 0.5,
            offset_x: -20.0,
            offset_y: -10.0,
        };
        assert_eq!(map.map_point(100, 100), (30, 40));
        let (x, y) = map.unmap_point(30, 40);
        assert!((x - 100).abs() <= 1 && (y - 100).abs() <= 1);
    }
}
