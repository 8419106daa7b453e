use crate::errors::StreamError;
use crate::layout::RingLayout;
use crate::poll::PollStrategy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use transport::Transport;

/// Flag byte: bit 0 set by the remote producer when a slot holds a frame.
pub const READY: u8 = 0x01;
/// Flag byte written back after the payload read, releasing the slot.
pub const DONE: u8 = 0x02;

/// Polling consumer for one sensor stream's ring.
///
/// Cycle per frame: wait for the current slot's ready bit, bulk-read the
/// payload, write the done byte, advance the cursor modulo the slot count.
/// The cursor only advances after a completed cycle, so a transport error
/// leaves the reader re-attempting the same slot on the next call.
///
/// One reader serves exactly one consumer thread; slots are never owned by
/// two readers concurrently.
pub struct RingReader<T: Transport> {
    transport: Arc<T>,
    layout: RingLayout,
    poll: PollStrategy,
    stop: Arc<AtomicBool>,
    rd_ptr: usize,
    frames_read: u64,
}

impl<T: Transport> RingReader<T> {
    pub fn new(
        transport: Arc<T>,
        layout: RingLayout,
        poll: PollStrategy,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            transport,
            layout,
            poll,
            stop,
            rd_ptr: 0,
            frames_read: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.rd_ptr
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Consume exactly one slot into `dst`, which must match the slot
    /// payload size.
    ///
    /// Blocks per the configured poll strategy until the slot is ready;
    /// returns `StreamError::Terminated` if the shared stop flag is raised
    /// while waiting.
    pub fn read_frame(&mut self, dst: &mut [u8]) -> Result<(), StreamError> {
        if dst.len() != self.layout.payload_bytes {
            return Err(StreamError::SizeMismatch {
                expected: self.layout.payload_bytes,
                actual: dst.len(),
            });
        }

        let flag_addr = self.layout.flag_addr(self.rd_ptr);

        // WAIT_READY
        loop {
            if self.stop.load(Ordering::Relaxed) {
                return Err(StreamError::Terminated);
            }
            if self.transport.read_byte(flag_addr)? & READY != 0 {
                break;
            }
            self.poll.pause();
        }

        // READ_PAYLOAD
        let got = self
            .transport
            .read_at(dst, self.layout.slot_addr(self.rd_ptr))?;
        if got < dst.len() {
            tracing::warn!(
                slot = self.rd_ptr,
                requested = dst.len(),
                actual = got,
                "payload underflow"
            );
        }

        // WRITE_DONE
        self.transport.write_byte(DONE, flag_addr)?;

        // ADVANCE
        self.rd_ptr = (self.rd_ptr + 1) % self.layout.slot_count;
        self.frames_read += 1;
        Ok(())
    }
}
