pub mod decoder;
pub mod frame;

pub use decoder::{
    decode_accum, decode_accum_filtered, decode_full, pack_pixels, DecodeError, NEUTRAL,
    OFF_VALUE, ON_VALUE, PIXELS_PER_BYTE,
};
pub use frame::EventFrame;
