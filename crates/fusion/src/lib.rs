pub mod grid;
pub mod overlay;

pub use grid::{draw_bbox, draw_calibration_grid};
pub use overlay::{overlay_events, resize_nearest};
