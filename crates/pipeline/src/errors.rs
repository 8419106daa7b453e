use thiserror::Error;
use transport::TransportError;

/// Shutdown signal observed while blocked in a synchronization primitive.
///
/// Every producer must call `terminate()` on each gate or lock it signals
/// into before joining; a blocked thread whose producer exited without
/// terminating hangs forever (there is no watchdog).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SyncError {
    #[error("terminated")]
    Terminated,
}

#[derive(Error, Debug)]
pub enum NpuError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("input buffer address {addr:#x} does not fit the 32-bit address register")]
    AddressOutOfRange { addr: u64 },

    #[error("accelerator wait terminated")]
    Terminated,
}
