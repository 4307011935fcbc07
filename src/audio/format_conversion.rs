// Format conversion for CPAL output buffers
//
// All synthesis happens in f32; conversion to the device sample type happens
// at the moment a frame is written, via CPAL's `FromSample`. Allocation-free
// and safe for the real-time callback.

use cpal::{FromSample, Sample};

/// Write one mono f32 sample to every channel of an interleaved frame.
#[inline]
pub fn write_mono_to_interleaved_frame<T>(sample: f32, output_frame: &mut [T])
where
    T: Sample + FromSample<f32>,
{
    for channel_sample in output_frame.iter_mut() {
        *channel_sample = Sample::from_sample::<f32>(sample);
    }
}
