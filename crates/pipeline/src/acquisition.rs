use event::{decode_accum, decode_full, DecodeError, EventFrame};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use stream::{FrameHeader, RingReader, SequenceTracker, StreamError, HEADER_BYTES};
use transport::Transport;

struct Slot {
    data: Mutex<Vec<u8>>,
    owners: AtomicU32,
}

/// Two independently locked byte buffers with an owner counter per slot.
///
/// The writer exclusively owns a slot while filling it, a reader while
/// draining it; handoff is only ever via lock acquisition. The owner
/// counters exist to make that claim checkable: they must never exceed 1.
pub struct DoubleBuffer {
    slots: [Slot; 2],
}

impl DoubleBuffer {
    pub fn new(bytes_per_buffer: usize) -> Self {
        let slot = || Slot {
            data: Mutex::new(vec![0u8; bytes_per_buffer]),
            owners: AtomicU32::new(0),
        };
        Self {
            slots: [slot(), slot()],
        }
    }

    pub fn lock(&self, idx: usize) -> BufferGuard<'_> {
        let slot = &self.slots[idx];
        let guard = match slot.data.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let prev = slot.owners.fetch_add(1, Ordering::SeqCst);
        debug_assert_eq!(prev, 0, "buffer {idx} locked by two owners");
        BufferGuard {
            guard,
            owners: &slot.owners,
        }
    }

    pub fn owner_count(&self, idx: usize) -> u32 {
        self.slots[idx].owners.load(Ordering::SeqCst)
    }
}

pub struct BufferGuard<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
    owners: &'a AtomicU32,
}

impl Deref for BufferGuard<'_> {
    type Target = Vec<u8>;
    fn deref(&self) -> &Vec<u8> {
        &self.guard
    }
}

impl DerefMut for BufferGuard<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.guard
    }
}

impl Drop for BufferGuard<'_> {
    fn drop(&mut self) {
        self.owners.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Writer role of the double-buffered DVS acquisition.
///
/// Each `fill_once` locks the buffer the reader is not draining, performs
/// `accum_num` ring read cycles directly into it (one slot payload per
/// sub-frame), feeds decoded sequence headers to the drop tracker, then
/// releases and flips the alternating index. The reader's visible latency
/// is bounded by one buffer-fill cycle.
pub struct DvsAcquisition<T: Transport> {
    reader: RingReader<T>,
    accum_num: usize,
    payload_bytes: usize,
    header_enabled: bool,
    tracker: SequenceTracker,
    fill_idx: usize,
}

impl<T: Transport> DvsAcquisition<T> {
    pub fn new(
        reader: RingReader<T>,
        accum_num: usize,
        payload_bytes: usize,
        header_enabled: bool,
    ) -> Self {
        Self {
            reader,
            accum_num,
            payload_bytes,
            header_enabled,
            tracker: SequenceTracker::new(),
            fill_idx: 0,
        }
    }

    pub fn buffer_bytes(&self) -> usize {
        self.accum_num * self.payload_bytes
    }

    pub fn frames_dropped(&self) -> u64 {
        self.tracker.dropped()
    }

    /// Fill the current buffer with one logical output frame's worth of
    /// sub-frames. Returns the filled buffer index.
    ///
    /// On error the alternating index is not flipped and the ring cursor
    /// is wherever the failed cycle left it, so the next call resumes
    /// cleanly; the partially filled buffer is never published.
    pub fn fill_once(&mut self, buffers: &DoubleBuffer) -> Result<usize, StreamError> {
        let idx = self.fill_idx;
        {
            let mut buf = buffers.lock(idx);
            for k in 0..self.accum_num {
                let chunk = &mut buf[k * self.payload_bytes..(k + 1) * self.payload_bytes];
                self.reader.read_frame(chunk)?;

                if self.header_enabled
                    && let Some(header) = FrameHeader::parse(chunk)
                {
                    self.tracker.record(header.frame_num);
                }
            }
        }
        self.fill_idx ^= 1;
        Ok(idx)
    }
}

/// Decode one filled acquisition buffer into an event frame: fresh decode
/// of the first sub-frame, accumulating decode of the rest, merging
/// `accum_num` sub-frames into one visualization frame.
pub fn decode_buffer(
    buf: &[u8],
    accum_num: usize,
    payload_bytes: usize,
    header_enabled: bool,
    frame: &mut EventFrame,
) -> Result<(), DecodeError> {
    let skip = if header_enabled { HEADER_BYTES } else { 0 };
    for k in 0..accum_num {
        let packed = &buf[k * payload_bytes + skip..(k + 1) * payload_bytes];
        if k == 0 {
            decode_full(packed, frame.data_mut())?;
        } else {
            decode_accum(packed, frame.data_mut())?;
        }
    }
    Ok(())
}
