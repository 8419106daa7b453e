/// Board-defined layout of one sensor stream's ring in the remote address
/// space: an array of one-byte ready flags and an array of fixed-size
/// payload slots, both supplied as configuration at construction time.
#[derive(Debug, Clone, Copy)]
pub struct RingLayout {
    /// Base address of the per-slot flag bytes.
    pub flag_base: u64,
    /// Base address of the payload slot array.
    pub slot_base: u64,
    /// Number of slots the remote producer cycles through.
    pub slot_count: usize,
    /// Address stride between consecutive payload slots.
    pub slot_stride: u64,
    /// Bytes of payload per slot (header included when enabled).
    pub payload_bytes: usize,
}

impl RingLayout {
    pub fn flag_addr(&self, slot: usize) -> u64 {
        self.flag_base + slot as u64
    }

    pub fn slot_addr(&self, slot: usize) -> u64 {
        self.slot_base + slot as u64 * self.slot_stride
    }
}
