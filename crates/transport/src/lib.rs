pub mod chardev;
pub mod errors;
pub mod mmap;

pub use chardev::CharDevice;
pub use errors::TransportError;
pub use mmap::MmapRegion;

/// Byte-addressed block transfer to and from a remote memory region.
///
/// Offsets are remote addresses, not local file positions. Implementations
/// return the number of bytes actually moved; a count smaller than the
/// request is a short transfer, reported but not fatal (the ring protocol's
/// ready/done flags are the correctness gate, not the byte count).
pub trait Transport: Send + Sync {
    fn read_at(&self, buf: &mut [u8], remote_offset: u64) -> Result<usize, TransportError>;
    fn write_at(&self, buf: &[u8], remote_offset: u64) -> Result<usize, TransportError>;

    /// Read a single byte, for flag polling.
    fn read_byte(&self, remote_offset: u64) -> Result<u8, TransportError> {
        let mut byte = [0u8; 1];
        self.read_at(&mut byte, remote_offset)?;
        Ok(byte[0])
    }

    /// Write a single byte, for flag acknowledgment.
    fn write_byte(&self, value: u8, remote_offset: u64) -> Result<(), TransportError> {
        self.write_at(&[value], remote_offset)?;
        Ok(())
    }
}
