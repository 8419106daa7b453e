use crate::errors::NpuError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use transport::{Transport, TransportError};

/// Delay after the register sequence before the region is considered
/// committed by the accelerator.
const REGISTER_SETTLE: Duration = Duration::from_micros(100);

/// Black-box inference accelerator seam: write the input tensor, flip the
/// start bit, wait for completion. Layer semantics live on the other side
/// of this interface.
pub trait NpuInterface: Send {
    fn load_input(&mut self, tensor: &[u8]) -> Result<(), NpuError>;
    fn start(&mut self) -> Result<(), NpuError>;
    fn wait_done(&mut self) -> Result<(), NpuError>;
}

/// Memory-mapped register block of the accelerator. Offsets are
/// board-defined configuration, like the ring layout.
#[derive(Debug, Clone, Copy)]
pub struct NpuRegisters {
    pub mode: u64,
    pub input_addr: u64,
    pub width: u64,
    pub height: u64,
    pub start: u64,
    pub status: u64,
}

/// Accelerator driven over a `Transport`. The register writes happen in a
/// fixed order (mode, buffer address, dimensions, start) followed by a
/// settle delay; `wait_done` polls the status register's low bit,
/// returning `NpuError::Terminated` when the shared stop flag rises so a
/// wedged accelerator cannot hang shutdown.
pub struct MmioNpu<T: Transport> {
    transport: Arc<T>,
    regs: NpuRegisters,
    input_base: u64,
    input_dims: (u32, u32),
    mode_flags: u32,
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
}

impl<T: Transport> MmioNpu<T> {
    /// The device's address register is 32 bits wide; `input_base` beyond
    /// that range is rejected here rather than truncated at start time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transport: Arc<T>,
        regs: NpuRegisters,
        input_base: u64,
        input_dims: (u32, u32),
        mode_flags: u32,
        poll_interval: Duration,
        stop: Arc<AtomicBool>,
    ) -> Result<Self, NpuError> {
        if input_base > u32::MAX as u64 {
            return Err(NpuError::AddressOutOfRange { addr: input_base });
        }
        Ok(Self {
            transport,
            regs,
            input_base,
            input_dims,
            mode_flags,
            poll_interval,
            stop,
        })
    }

    fn write_reg(&self, addr: u64, value: u32) -> Result<(), TransportError> {
        self.transport.write_at(&value.to_le_bytes(), addr)?;
        Ok(())
    }
}

impl<T: Transport> NpuInterface for MmioNpu<T> {
    fn load_input(&mut self, tensor: &[u8]) -> Result<(), NpuError> {
        self.transport.write_at(tensor, self.input_base)?;
        Ok(())
    }

    fn start(&mut self) -> Result<(), NpuError> {
        // Register order is part of the device protocol.
        self.write_reg(self.regs.mode, self.mode_flags)?;
        self.write_reg(self.regs.input_addr, self.input_base as u32)?;
        self.write_reg(self.regs.width, self.input_dims.0)?;
        self.write_reg(self.regs.height, self.input_dims.1)?;
        self.write_reg(self.regs.start, 1)?;
        std::thread::sleep(REGISTER_SETTLE);
        Ok(())
    }

    fn wait_done(&mut self) -> Result<(), NpuError> {
        loop {
            if self.stop.load(Ordering::Relaxed) {
                return Err(NpuError::Terminated);
            }
            if self.transport.read_byte(self.regs.status)? & 0x01 != 0 {
                return Ok(());
            }
            std::thread::sleep(self.poll_interval);
        }
    }
}
