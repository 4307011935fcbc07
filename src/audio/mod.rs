// Audio module - CPAL backend and real-time callback

pub mod dsp_utils;
pub mod engine;
pub mod format_conversion;
pub mod parameters;
pub mod status;
