//! The realtime synthesis callback (spec.md §4.E) and the state it carries
//! across invocations (spec.md §3, "CallbackState").
//!
//! [`advance`] is the one frame-stepping routine both protocols share; each
//! protocol supplies the handful of policy decisions spec.md's component
//! table assigns to the bit codec / second classifier / PM engine through
//! the [`Protocol`] trait.

use crate::time::BrokenDownTime;
use crate::wavetable::{WavetableSample, Wavetables};

pub const SAMPLE_RATE: u32 = 48_000;

/// Protocol-specific policy consulted once per second (classification,
/// time-lens selection) and, for WWVB, once per frame at the 100ms mark.
pub trait Protocol {
    type Sample: WavetableSample;
    /// Per-stream mutable state beyond the fields every protocol needs.
    /// JJY carries a frozen JST flag here; WWVB needs nothing extra (its
    /// "cached PM-phase-target index" from spec.md §3 *is* `wt_index`).
    type Extra;

    fn wt_size(&self) -> usize;
    /// Carrier frequency as an exact `(numerator, denominator)` in Hz, so
    /// the wavetable-size invariant can be checked without floating point.
    fn carrier_freq(&self) -> (u64, u64);
    fn low_attenuation(&self) -> f64;
    /// `true` for JJY (high amplitude leads each second), `false` for WWVB
    /// (reduced amplitude leads each second) — spec.md §4.C's "inversion".
    fn leading_high(&self) -> bool;
    fn boundary_samples(&self, bdt: &BrokenDownTime) -> u32;
    fn broken_down_time(&self, wall_second: i64, extra: &Self::Extra) -> BrokenDownTime;
    /// Called once per frame before the sample is read. WWVB uses this to
    /// flip `wt_index` at the 100ms mark (spec.md §4.E step 1); JJY does
    /// nothing here.
    fn on_sample_index(&self, _state: &mut CallbackState<Self::Extra>) {}

    fn build_wavetables(&self) -> crate::error::Result<Wavetables<Self::Sample>> {
        let (num, den) = self.carrier_freq();
        Wavetables::populate(num, den, SAMPLE_RATE, self.wt_size(), self.low_attenuation())
    }
}

/// The realtime mutable state a callback carries across invocations.
///
/// Owned exclusively by the audio callback thread (spec.md §5); nothing
/// else mutates it.
pub struct CallbackState<E> {
    pub wall_second: i64,
    pub sample_index: u32,
    pub wt_index: usize,
    pub boundary_samples: u32,
    pub current_bdt: BrokenDownTime,
    pub extra: E,
}

/// Seeds initial state from a wall-clock reading (spec.md §4.E, "Initial
/// state seeding"): aligns audio second-boundaries with wall-clock ones.
pub fn seed<P: Protocol>(proto: &P, wall_second: i64, nanos: u32, extra: P::Extra) -> CallbackState<P::Extra> {
    let sample_index = (nanos as u64 * SAMPLE_RATE as u64 / 1_000_000_000) as u32;
    let wt_index = sample_index as usize % proto.wt_size();
    let current_bdt = proto.broken_down_time(wall_second, &extra);
    let boundary_samples = proto.boundary_samples(&current_bdt);
    CallbackState {
        wall_second,
        sample_index,
        wt_index,
        boundary_samples,
        current_bdt,
        extra,
    }
}

/// Produces the next output sample and advances `state` by one frame.
///
/// Never allocates, never blocks; the only per-frame work beyond a
/// wavetable read and a couple of index increments is the protocol's
/// `on_sample_index` hook (a single comparison for JJY, one comparison plus
/// an occasional PM-bit lookup for WWVB). Per-second recomputation
/// (`broken_down_time` + `boundary_samples`) only runs once every
/// `SAMPLE_RATE` calls.
pub fn advance<P: Protocol>(
    proto: &P,
    tables: &Wavetables<P::Sample>,
    state: &mut CallbackState<P::Extra>,
) -> P::Sample {
    proto.on_sample_index(state);

    let leading = state.sample_index < state.boundary_samples;
    let use_high = if proto.leading_high() { leading } else { !leading };
    let sample = if use_high {
        tables.high[state.wt_index]
    } else {
        tables.low[state.wt_index]
    };

    state.wt_index = (state.wt_index + 1) % tables.wt_size;
    state.sample_index += 1;
    if state.sample_index >= SAMPLE_RATE {
        state.wall_second += 1;
        state.sample_index = 0;
        state.current_bdt = proto.broken_down_time(state.wall_second, &state.extra);
        state.boundary_samples = proto.boundary_samples(&state.current_bdt);
    }
    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jjy::{JjyExtra, JjyProtocol};

    #[test]
    fn exactly_sample_rate_frames_between_second_increments() {
        let proto = JjyProtocol { fukushima: false };
        let tables = proto.build_wavetables().unwrap();
        let mut state = seed(&proto, 1_700_000_000, 0, JjyExtra { jst: true });
        let start_second = state.wall_second;
        for _ in 0..SAMPLE_RATE - 1 {
            advance(&proto, &tables, &mut state);
            assert_eq!(state.wall_second, start_second);
        }
        advance(&proto, &tables, &mut state);
        assert_eq!(state.wall_second, start_second + 1);
    }

    #[test]
    fn invariants_hold_after_every_frame() {
        let proto = JjyProtocol { fukushima: false };
        let tables = proto.build_wavetables().unwrap();
        let mut state = seed(&proto, 1_700_000_000, 123_456_789, JjyExtra { jst: true });
        for _ in 0..(SAMPLE_RATE * 3) {
            advance(&proto, &tables, &mut state);
            assert!(state.sample_index < SAMPLE_RATE);
            assert!(state.wt_index < tables.wt_size);
            assert!(state.boundary_samples <= SAMPLE_RATE);
        }
    }

    #[test]
    fn seeding_aligns_sample_index_to_nanosecond_fraction() {
        let proto = JjyProtocol { fukushima: false };
        let state = seed(&proto, 1_700_000_000, 500_000_000, JjyExtra { jst: true });
        assert_eq!(state.sample_index, 24_000);
        assert_eq!(state.wt_index, 24_000 % proto.wt_size());
    }
}
