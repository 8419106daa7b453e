use thiserror::Error;
use transport::TransportError;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("destination buffer is {actual} bytes, slot payload is {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("stream terminated")]
    Terminated,
}
