//! Pre-computed carrier samples, shared read-only after setup.
//!
//! A [`Wavetables`] holds a whole number of sine-cycles of the carrier at
//! the stream's sample rate, so that consecutive repetitions are
//! phase-continuous (spec.md §3, "Wavetable"). Two amplitude variants exist:
//! `high` (full amplitude) and `low` (attenuated, the "pilot" level between
//! pulses).

use crate::error::{Error, Result};

/// A sample type a wavetable can be populated with.
///
/// `f32` is used for JJY's float32 stream; `i16` for WWVB's int16 stream
/// (scaled by `i16::MAX`), matching `ersatz-jjy.c`'s `float WT_HIGH[]` and
/// `ersatz-wwvb.c`'s `int16_t WT_HIGH[]` respectively.
pub trait WavetableSample: Copy + Default {
    fn from_unit(x: f64) -> Self;
}

impl WavetableSample for f32 {
    fn from_unit(x: f64) -> Self {
        x as f32
    }
}

impl WavetableSample for i16 {
    fn from_unit(x: f64) -> Self {
        (x * 32767.0).round() as i16
    }
}

/// The full/attenuated wavetable pair for one protocol stream.
pub struct Wavetables<S> {
    pub high: Vec<S>,
    pub low: Vec<S>,
    pub wt_size: usize,
}

impl<S: WavetableSample> Wavetables<S> {
    /// Builds both wavetables for a carrier of `freq_num / freq_den` Hz.
    ///
    /// Returns [`Error::WavetableInvariant`] if `wt_size` samples do not
    /// hold an integer number of carrier cycles at `sample_rate` — the
    /// precondition that keeps repeated wavetable reads phase-continuous.
    pub fn populate(
        freq_num: u64,
        freq_den: u64,
        sample_rate: u32,
        wt_size: usize,
        low_attenuation: f64,
    ) -> Result<Self> {
        let cycles_numer = freq_num * wt_size as u64;
        let cycles_denom = freq_den * sample_rate as u64;
        if cycles_denom == 0 || cycles_numer % cycles_denom != 0 {
            return Err(Error::WavetableInvariant {
                freq_num,
                freq_den,
                wt_size,
                sample_rate,
            });
        }

        let cycles_per_sample = (freq_num as f64 / freq_den as f64) / sample_rate as f64;
        let mut high = Vec::with_capacity(wt_size);
        let mut low = Vec::with_capacity(wt_size);
        for i in 0..wt_size {
            let phase = 2.0 * std::f64::consts::PI * i as f64 * cycles_per_sample;
            high.push(S::from_unit(phase.sin()));
            low.push(S::from_unit(low_attenuation * phase.sin()));
        }
        Ok(Wavetables { high, low, wt_size })
    }
}
