pub mod errors;
pub mod layout;
pub mod poll;
pub mod reader;
pub mod sequence;

pub use errors::StreamError;
pub use layout::RingLayout;
pub use poll::PollStrategy;
pub use reader::{RingReader, DONE, READY};
pub use sequence::{FrameHeader, SequenceTracker, HEADER_BYTES};
