use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};

const TONE_HZ: f32 = 440.0;
const TONE_LENGTH: Duration = Duration::from_millis(200);

/// Driver-side tone generator.
///
/// The machine's sound interface is a single edge ("the sound timer hit
/// zero"); the speaker turns each edge into one fixed-length sine tone.
pub struct Speaker {
    device: cpal::Device,
    config: cpal::StreamConfig,
    format: cpal::SampleFormat,
    playing: Option<(cpal::Stream, Instant)>,
}

impl Speaker {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no audio output device")?;
        let supported = device
            .default_output_config()
            .context("no supported output config")?;
        let format = supported.sample_format();
        Ok(Self {
            device,
            config: supported.into(),
            format,
            playing: None,
        })
    }

    /// Starts the tone. A tone already in flight keeps playing; `poll`
    /// stops it once it has run its length.
    pub fn beep(&mut self) {
        if self.playing.is_some() {
            return;
        }
        let stream = match self.format {
            cpal::SampleFormat::F32 => self.tone_stream::<f32>(),
            cpal::SampleFormat::I16 => self.tone_stream::<i16>(),
            cpal::SampleFormat::U16 => self.tone_stream::<u16>(),
            other => Err(anyhow!("unsupported sample format '{other}'")),
        };
        match stream {
            Ok(stream) => self.playing = Some((stream, Instant::now() + TONE_LENGTH)),
            Err(err) => log::warn!("beep failed: {err}"),
        }
    }

    /// Drops the stream once the tone is over. Called once per frame.
    pub fn poll(&mut self) {
        if let Some((_, until)) = &self.playing {
            if Instant::now() >= *until {
                self.playing = None;
            }
        }
    }

    fn tone_stream<T>(&self) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = self.config.sample_rate.0 as f32;
        let channels = self.config.channels as usize;

        let mut sample_clock = 0f32;
        let mut next_sample = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin()
        };

        let stream = self.device.build_output_stream(
            &self.config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let value = T::from_sample(next_sample());
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            |err| log::warn!("audio stream error: {err}"),
            None,
        )?;
        stream.play()?;
        Ok(stream)
    }
}
