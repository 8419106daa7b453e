/// Bytes of sequence header at the start of a slot payload, when enabled.
pub const HEADER_BYTES: usize = 8;

/// Frames ignored before drop accounting starts; the counter has not
/// stabilized right after sensor bring-up.
const WARMUP_FRAMES: u64 = 1000;

/// Per-frame sequence header packed at the front of the payload:
/// bytes [0..4) little-endian timestamp, bytes [4..8) little-endian frame
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub timestamp: u32,
    pub frame_num: u32,
}

impl FrameHeader {
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < HEADER_BYTES {
            return None;
        }
        let timestamp = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
        let frame_num = u32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]);
        Some(Self { timestamp, frame_num })
    }
}

/// Frame-drop diagnostic over decoded sequence headers.
///
/// Counts non-contiguous frame numbers after the warm-up window. Purely
/// observational: never alters ring cursors or pauses acquisition.
#[derive(Debug, Default)]
pub struct SequenceTracker {
    prev: Option<u32>,
    observed: u64,
    dropped: u64,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one decoded frame number. Returns true if a drop was counted.
    pub fn record(&mut self, frame_num: u32) -> bool {
        self.observed += 1;
        let prev = self.prev.replace(frame_num);

        if self.observed <= WARMUP_FRAMES {
            return false;
        }

        match prev {
            Some(p) if frame_num != p.wrapping_add(1) => {
                self.dropped += 1;
                tracing::warn!(
                    expected = p.wrapping_add(1),
                    got = frame_num,
                    total_dropped = self.dropped,
                    "frame sequence discontinuity"
                );
                true
            }
            _ => false,
        }
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn observed(&self) -> u64 {
        self.observed
    }
}
