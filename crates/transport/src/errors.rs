use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("transfer out of bounds: offset {offset} + {len} bytes exceeds region of {size} bytes")]
    OutOfBounds { offset: u64, len: usize, size: usize },
}
