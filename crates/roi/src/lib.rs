pub mod average;
pub mod bbox;
pub mod config;
pub mod detector;
pub mod finalize;
pub mod streak;

pub use bbox::{Bbox, SensorMap};
pub use config::RoiConfig;
pub use detector::{RoiDetector, RoiResult};
