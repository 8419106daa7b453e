use std::time::Duration;

/// How the reader waits between unsuccessful ready-flag polls.
///
/// `Spin` is a tight busy-poll with zero added latency, appropriate against
/// real hardware at high frame rates. `Sleep` trades latency for not
/// saturating the transport (and lets tests run without burning a core).
#[derive(Debug, Clone, Copy)]
pub enum PollStrategy {
    Spin,
    Sleep(Duration),
}

impl PollStrategy {
    pub fn pause(&self) {
        match self {
            PollStrategy::Spin => std::hint::spin_loop(),
            PollStrategy::Sleep(interval) => std::thread::sleep(*interval),
        }
    }
}
