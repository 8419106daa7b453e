use crate::errors::TransportError;
use crate::Transport;
use memmap2::{MmapMut, MmapOptions};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Memory-mapped remote region: a file-backed (or anonymous) mapping
/// standing in for a BAR-exposed device window. Also serves as the
/// simulated remote side in tests, where one mapping is shared between a
/// fake producer and the ring reader under test.
pub struct MmapRegion {
    map: Mutex<MmapMut>,
}

impl MmapRegion {
    /// Create or open a file-backed region, growing the file if undersized.
    pub fn create(path: impl AsRef<Path>, size: usize) -> Result<Self, TransportError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        if file.metadata()?.len() < size as u64 {
            file.set_len(size as u64)?;
        }

        let map = unsafe { MmapOptions::new().map_mut(&file)? };
        Ok(Self { map: Mutex::new(map) })
    }

    /// Open an existing file-backed region at its current size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let map = unsafe { MmapOptions::new().map_mut(&file)? };
        Ok(Self { map: Mutex::new(map) })
    }

    /// Anonymous in-process region, for tests.
    pub fn anonymous(size: usize) -> Result<Self, TransportError> {
        let map = MmapOptions::new().len(size).map_anon()?;
        Ok(Self { map: Mutex::new(map) })
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard(&self) -> MutexGuard<'_, MmapMut> {
        // A poisoned lock only means another thread panicked mid-copy; the
        // mapping itself is still usable.
        match self.map.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn check_bounds(offset: u64, len: usize, size: usize) -> Result<usize, TransportError> {
    let start = usize::try_from(offset)
        .map_err(|_| TransportError::OutOfBounds { offset, len, size })?;
    start
        .checked_add(len)
        .filter(|&end| end <= size)
        .ok_or(TransportError::OutOfBounds { offset, len, size })?;
    Ok(start)
}

impl Transport for MmapRegion {
    fn read_at(&self, buf: &mut [u8], remote_offset: u64) -> Result<usize, TransportError> {
        let map = self.guard();
        let start = check_bounds(remote_offset, buf.len(), map.len())?;
        buf.copy_from_slice(&map[start..start + buf.len()]);
        Ok(buf.len())
    }

    fn write_at(&self, buf: &[u8], remote_offset: u64) -> Result<usize, TransportError> {
        let mut map = self.guard();
        let size = map.len();
        let start = check_bounds(remote_offset, buf.len(), size)?;
        map[start..start + buf.len()].copy_from_slice(buf);
        Ok(buf.len())
    }
}
