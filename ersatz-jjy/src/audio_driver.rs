//! Opens the mono float32 48kHz output stream and drives the realtime
//! callback. The stream is fixed at exactly 48kHz; the callback computes
//! each sample on demand rather than draining a producer/consumer queue.

use std::time::{SystemTime, UNIX_EPOCH};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use ersatz_core::callback::{self, CallbackState, Protocol};
use ersatz_core::jjy::{JjyExtra, JjyProtocol};
use log::{error, info};

const FRAMES_PER_BUFFER: u32 = 64;

/// Owns the live `cpal::Stream`; dropping it stops playback.
pub struct AudioDriver {
    _stream: cpal::Stream,
}

impl AudioDriver {
    pub fn start(proto: JjyProtocol, jst: bool) -> anyhow::Result<Self> {
        let tables = proto.build_wavetables()?;

        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        let mut state: CallbackState<JjyExtra> =
            callback::seed(&proto, now.as_secs() as i64, now.subsec_nanos(), JjyExtra { jst });

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("no audio output device available"))?;

        info!("Sound:");
        info!("\tDevice: {:?}", device.name()?);
        info!(
            "\tCarrier: {:?} Hz, wavetable size {}",
            proto.carrier_freq(),
            proto.wt_size()
        );

        let config = StreamConfig {
            channels: 1,
            sample_rate: SampleRate(callback::SAMPLE_RATE),
            buffer_size: BufferSize::Fixed(FRAMES_PER_BUFFER),
        };

        let err_fn = |err| error!("an error occurred on the output audio stream: {err}");
        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for sample in data.iter_mut() {
                    *sample = callback::advance(&proto, &tables, &mut state);
                }
            },
            err_fn,
            None,
        )?;
        stream.play()?;

        Ok(AudioDriver { _stream: stream })
    }
}
