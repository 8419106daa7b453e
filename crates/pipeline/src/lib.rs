pub mod acquisition;
pub mod config;
pub mod errors;
pub mod gate;
pub mod npu;
pub mod orchestrator;
pub mod publish;
pub mod station;

pub use acquisition::{DoubleBuffer, DvsAcquisition};
pub use config::PipelineConfig;
pub use errors::{NpuError, SyncError};
pub use gate::StageGate;
pub use npu::{MmioNpu, NpuInterface, NpuRegisters};
pub use orchestrator::{NpuSetup, Orchestrator};
pub use publish::PublishLock;
pub use station::{FrameSink, NullSink};
