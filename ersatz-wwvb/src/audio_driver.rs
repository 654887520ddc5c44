//! Opens the mono int16 48kHz output stream and drives the realtime
//! callback. See `ersatz-jjy::audio_driver` for the rationale; WWVB differs
//! only in sample format (`i16`), buffer size (512 frames per spec.md §3),
//! and needing no per-stream `Extra` state.

use std::time::{SystemTime, UNIX_EPOCH};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, StreamConfig};
use ersatz_core::callback::{self, CallbackState, Protocol};
use ersatz_core::wwvb::WwvbProtocol;
use log::{error, info};

const FRAMES_PER_BUFFER: u32 = 512;

pub struct AudioDriver {
    _stream: cpal::Stream,
}

impl AudioDriver {
    pub fn start() -> anyhow::Result<Self> {
        let proto = WwvbProtocol;
        let tables = proto.build_wavetables()?;

        let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
        let mut state: CallbackState<()> =
            callback::seed(&proto, now.as_secs() as i64, now.subsec_nanos(), ());

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
            move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
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
