use common::config::{env_addr_or, env_or};
use common::Environment;
use roi::SensorMap;
use std::env;
use std::time::Duration;
use stream::{PollStrategy, RingLayout, HEADER_BYTES};

/// Board-defined geometry of one sensor stream: where its ring lives and
/// the sensor's native resolution.
#[derive(Debug, Clone)]
pub struct SensorRingConfig {
    pub flag_base: u64,
    pub slot_base: u64,
    pub slot_count: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub environment: Environment,
    /// Device-to-host and host-to-device character device nodes.
    pub read_device: String,
    pub write_device: String,
    pub dvs: SensorRingConfig,
    pub cis: SensorRingConfig,
    /// DVS sub-frames accumulated into one logical output frame.
    pub accum_num: usize,
    /// Whether DVS payloads carry the 8-byte sequence header.
    pub header_enabled: bool,
    /// Ready-flag poll pause in microseconds; 0 selects a tight spin.
    pub poll_interval_us: u64,
    /// Calibrated DVS→CIS mapping constants.
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Overlay blend weight for the event visualization.
    pub overlay_alpha: f32,
    /// When true, a cycle without a detection leaves the previously
    /// published box in place instead of clearing it.
    pub hold_last_roi: bool,
}

impl PipelineConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = Environment::from_env();

        let read_device =
            env::var("READ_DEVICE").unwrap_or_else(|_| "/dev/xdma0_c2h_0".to_string());
        let write_device =
            env::var("WRITE_DEVICE").unwrap_or_else(|_| "/dev/xdma0_h2c_0".to_string());

        let dvs = SensorRingConfig {
            flag_base: env_addr_or("DVS_FLAG_BASE", 0x0001_0000),
            slot_base: env_addr_or("DVS_SLOT_BASE", 0x0100_0000),
            slot_count: env_or("DVS_SLOT_COUNT", 8),
            width: env_or("DVS_WIDTH", 960),
            height: env_or("DVS_HEIGHT", 720),
        };
        let cis = SensorRingConfig {
            flag_base: env_addr_or("CIS_FLAG_BASE", 0x0002_0000),
            slot_base: env_addr_or("CIS_SLOT_BASE", 0x0200_0000),
            slot_count: env_or("CIS_SLOT_COUNT", 4),
            width: env_or("CIS_WIDTH", 1920),
            height: env_or("CIS_HEIGHT", 1080),
        };

        Ok(Self {
            environment,
            read_device,
            write_device,
            dvs,
            cis,
            accum_num: env_or("DVS_ACCUM_NUM", 4),
            header_enabled: env_or("DVS_HEADER_ENABLED", true),
            poll_interval_us: env_or("POLL_INTERVAL_US", 0),
            scale_x: env_or("MAP_SCALE_X", 2.0),
            scale_y: env_or("MAP_SCALE_Y", 1.5),
            offset_x: env_or("MAP_OFFSET_X", 0.0),
            offset_y: env_or("MAP_OFFSET_Y", 0.0),
            overlay_alpha: env_or("OVERLAY_ALPHA", 0.5),
            hold_last_roi: env_or("HOLD_LAST_ROI", false),
        })
    }

    /// Packed 2-bit payload size per DVS slot, header included.
    pub fn dvs_payload_bytes(&self) -> usize {
        let header = if self.header_enabled { HEADER_BYTES } else { 0 };
        header + self.dvs.width * self.dvs.height * 2 / 8
    }

    /// RGB payload size per CIS slot.
    pub fn cis_payload_bytes(&self) -> usize {
        self.cis.width * self.cis.height * 3
    }

    pub fn dvs_layout(&self) -> RingLayout {
        let payload = self.dvs_payload_bytes();
        RingLayout {
            flag_base: self.dvs.flag_base,
            slot_base: self.dvs.slot_base,
            slot_count: self.dvs.slot_count,
            slot_stride: payload as u64,
            payload_bytes: payload,
        }
    }

    pub fn cis_layout(&self) -> RingLayout {
        let payload = self.cis_payload_bytes();
        RingLayout {
            flag_base: self.cis.flag_base,
            slot_base: self.cis.slot_base,
            slot_count: self.cis.slot_count,
            slot_stride: payload as u64,
            payload_bytes: payload,
        }
    }

    pub fn poll_strategy(&self) -> PollStrategy {
        if self.poll_interval_us == 0 {
            PollStrategy::Spin
        } else {
            PollStrategy::Sleep(Duration::from_micros(self.poll_interval_us))
        }
    }

    pub fn sensor_map(&self) -> SensorMap {
        SensorMap {
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }

    /// Small test pairing over an in-process region: tiny rings, compact
    /// addresses, sleep polling.
    #[cfg(test)]
    pub fn test_default() -> Self {
        Self {
            environment: Environment::Development,
            read_device: String::new(),
            write_device: String::new(),
            dvs: SensorRingConfig {
                flag_base: 0,
                slot_base: 0x100,
                slot_count: 4,
                width: 32,
                height: 16,
            },
            cis: SensorRingConfig {
                flag_base: 0x10,
                slot_base: 0x4000,
                slot_count: 2,
                width: 64,
                height: 32,
            },
            accum_num: 2,
            header_enabled: true,
            poll_interval_us: 50,
            scale_x: 2.0,
            scale_y: 2.0,
            offset_x: 0.0,
            offset_y: 0.0,
            overlay_alpha: 0.5,
            hold_last_roi: false,
        }
    }
}
