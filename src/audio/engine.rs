// Audio engine - Real-time CPAL callback
//
// The engine opens the default output device and renders the game's tones.
// Sample formats are handled generically: synthesis is always f32 and the
// conversion to the device format happens when a frame is written. The
// stream and device are owned by the engine struct, so the output device is
// released whenever the engine goes out of scope.
//
// Note: on macOS (CoreAudio) the Stream is not Send/Sync, so the engine has
// to live on the thread that created it. The error callback reports stream
// failures through the notification channel and the atomic device status.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::audio::dsp_utils::{OnePoleSmoother, soft_clip};
use crate::audio::format_conversion::write_mono_to_interleaved_frame;
use crate::audio::parameters::AtomicF32;
use crate::audio::status::{AtomicDeviceStatus, DeviceStatus};
use crate::messaging::channels::{CommandConsumer, NotificationProducer};
use crate::messaging::command::Command;
use crate::messaging::notification::{Notification, NotificationCategory};
use crate::synth::tone::TonePlayer;

/// Smoothing time for the master volume (avoids clicks on slider moves).
const VOLUME_SMOOTHING_MS: f32 = 10.0;

#[derive(Debug, Error)]
pub enum AudioEngineError {
    #[error("no audio output device found")]
    NoOutputDevice,
    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("unsupported sample format: {0:?} (supported: F32, I16, U16)")]
    UnsupportedFormat(SampleFormat),
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

pub struct AudioEngine {
    _device: Device,
    _stream: Stream,
    sample_rate: f32,
    device_name: String,
    pub volume: AtomicF32,
    pub status: AtomicDeviceStatus,
}

impl AudioEngine {
    pub fn new(
        command_rx: CommandConsumer,
        notification_tx: Arc<Mutex<NotificationProducer>>,
        initial_volume: f32,
    ) -> Result<Self, AudioEngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioEngineError::NoOutputDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        let sample_rate = supported_config.sample_rate().0 as f32;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        let volume = AtomicF32::new(initial_volume);
        let status = AtomicDeviceStatus::new(DeviceStatus::Connecting);

        // Shared with the callback.
        let tone_player = Arc::new(Mutex::new(TonePlayer::new(sample_rate)));
        let volume_smoother = Arc::new(Mutex::new(OnePoleSmoother::new(
            initial_volume,
            VOLUME_SMOOTHING_MS,
            sample_rate,
        )));
        let command_rx = Arc::new(Mutex::new(command_rx));

        let stream = match sample_format {
            SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                channels,
                command_rx,
                tone_player,
                volume.clone(),
                volume_smoother,
                status.clone(),
                notification_tx,
            ),
            SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                channels,
                command_rx,
                tone_player,
                volume.clone(),
                volume_smoother,
                status.clone(),
                notification_tx,
            ),
            SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                channels,
                command_rx,
                tone_player,
                volume.clone(),
                volume_smoother,
                status.clone(),
                notification_tx,
            ),
            other => return Err(AudioEngineError::UnsupportedFormat(other)),
        }?;

        stream.play()?;
        status.set(DeviceStatus::Connected);

        Ok(Self {
            _device: device,
            _stream: stream,
            sample_rate,
            device_name,
            volume,
            status,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        command_rx: Arc<Mutex<CommandConsumer>>,
        tone_player: Arc<Mutex<TonePlayer>>,
        volume: AtomicF32,
        volume_smoother: Arc<Mutex<OnePoleSmoother>>,
        status: AtomicDeviceStatus,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Result<Stream, AudioEngineError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let Ok(mut rx) = command_rx.lock() else { return };
                let Ok(mut player) = tone_player.lock() else { return };
                let Ok(mut smoother) = volume_smoother.lock() else {
                    return;
                };

                // Drain pending commands before rendering this buffer.
                while let Some(command) = ringbuf::traits::Consumer::try_pop(&mut *rx) {
                    match command {
                        Command::Tone(signal) => player.trigger_signal(signal),
                        Command::GameOverTone => player.trigger_game_over(),
                        Command::Silence => player.silence(),
                    }
                }

                let target_volume = volume.get();
                for frame in data.chunks_mut(channels) {
                    let sample = player.process_sample() * smoother.process(target_volume);
                    write_mono_to_interleaved_frame(soft_clip(sample), frame);
                }
            },
            move |err| {
                status.set(DeviceStatus::Error);
                if let Ok(mut tx) = notification_tx.lock() {
                    let _ = ringbuf::traits::Producer::try_push(
                        &mut *tx,
                        Notification::error(
                            NotificationCategory::Audio,
                            format!("Audio stream error: {}", err),
                        ),
                    );
                }
            },
            None,
        )?;

        Ok(stream)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}
