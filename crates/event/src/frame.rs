use crate::decoder::NEUTRAL;

/// Decoded single-channel event frame at sensor-native resolution, one byte
/// per pixel, row-major. Starts neutral; the decoder mutates it in place
/// across accumulated sub-frames.
pub struct EventFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl EventFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![NEUTRAL; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Reset to neutral before starting a new logical output frame.
    pub fn reset(&mut self) {
        self.data.fill(NEUTRAL);
    }
}
