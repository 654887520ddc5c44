//! WWVB amplitude-modulation bit codec, second classifier, and the overlaid
//! BPSK phase-modulation engine (spec.md §4.B-D), ported in meaning from
//! `wwvb_b01`..`wwvb_b58`, `wwvb_pm*`, `half_hour_seq`, and
//! `minute_of_century` in `ersatz-wwvb.c`.

use crate::callback::{CallbackState, Protocol};
use crate::time::{self, BrokenDownTime};

pub fn b01(t: &BrokenDownTime) -> bool {
    t.minute >= 40
}
pub fn b02(t: &BrokenDownTime) -> bool {
    (t.minute % 40) >= 20
}
pub fn b03(t: &BrokenDownTime) -> bool {
    (t.minute % 20) >= 10
}
pub fn b05(t: &BrokenDownTime) -> bool {
    (t.minute % 10) >= 8
}
pub fn b06(t: &BrokenDownTime) -> bool {
    (t.minute % 10 % 8) >= 4
}
pub fn b07(t: &BrokenDownTime) -> bool {
    (t.minute % 10 % 4) >= 2
}
pub fn b08(t: &BrokenDownTime) -> bool {
    t.minute % 2 > 0
}

pub fn b12(t: &BrokenDownTime) -> bool {
    t.hour >= 20
}
pub fn b13(t: &BrokenDownTime) -> bool {
    (t.hour % 20) >= 10
}
pub fn b15(t: &BrokenDownTime) -> bool {
    (t.hour % 10) >= 8
}
pub fn b16(t: &BrokenDownTime) -> bool {
    (t.hour % 10 % 8) >= 4
}
pub fn b17(t: &BrokenDownTime) -> bool {
    (t.hour % 10 % 4) >= 2
}
pub fn b18(t: &BrokenDownTime) -> bool {
    t.hour % 2 > 0
}

pub fn b22(t: &BrokenDownTime) -> bool {
    t.day_of_year >= 200
}
pub fn b23(t: &BrokenDownTime) -> bool {
    (t.day_of_year % 200) >= 100
}
pub fn b25(t: &BrokenDownTime) -> bool {
    (t.day_of_year % 100) >= 80
}
pub fn b26(t: &BrokenDownTime) -> bool {
    (t.day_of_year % 100 % 80) >= 40
}
pub fn b27(t: &BrokenDownTime) -> bool {
    (t.day_of_year % 100 % 40) >= 20
}
pub fn b28(t: &BrokenDownTime) -> bool {
    (t.day_of_year % 20) >= 10
}
pub fn b30(t: &BrokenDownTime) -> bool {
    (t.day_of_year % 10) >= 8
}
pub fn b31(t: &BrokenDownTime) -> bool {
    (t.day_of_year % 10 % 8) >= 4
}
pub fn b32(t: &BrokenDownTime) -> bool {
    (t.day_of_year % 10 % 4) >= 2
}
pub fn b33(t: &BrokenDownTime) -> bool {
    t.day_of_year % 2 > 0
}

/// DUT1 sign, fixed to "+" (spec.md §4.B: no DUT1 transmission).
pub fn b36(_t: &BrokenDownTime) -> bool {
    true
}
pub fn b37(_t: &BrokenDownTime) -> bool {
    false
}
pub fn b38(_t: &BrokenDownTime) -> bool {
    true
}
/// DUT1 magnitude, fixed to 0.0s.
pub fn b40(_t: &BrokenDownTime) -> bool {
    false
}
pub fn b41(_t: &BrokenDownTime) -> bool {
    false
}
pub fn b42(_t: &BrokenDownTime) -> bool {
    false
}
pub fn b43(_t: &BrokenDownTime) -> bool {
    false
}

pub fn b45(t: &BrokenDownTime) -> bool {
    t.year_of_century >= 80
}
pub fn b46(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 80) >= 40
}
pub fn b47(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 40) >= 20
}
pub fn b48(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 20) >= 10
}
pub fn b50(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 10) >= 8
}
pub fn b51(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 10 % 8) >= 4
}
pub fn b52(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 10 % 4) >= 2
}
pub fn b53(t: &BrokenDownTime) -> bool {
    t.year_of_century % 2 > 0
}

pub fn b55(t: &BrokenDownTime) -> bool {
    t.is_leap_year()
}
/// No upcoming leap second is ever signalled (spec.md Non-goals).
pub fn b56(_t: &BrokenDownTime) -> bool {
    false
}

/// Needs the wall-clock second rather than `t`'s fields, to locate local
/// midnight/end-of-day on the underlying UTC calendar date; takes `&_t` so it
/// shares the `VariableDst` function-pointer shape the other bit functions do.
pub fn b57(_t: &BrokenDownTime, wall_second: i64) -> bool {
    time::local_dst_at_utc_day_boundary(wall_second, (23, 59, 59))
}

pub fn b58(_t: &BrokenDownTime, wall_second: i64) -> bool {
    time::local_dst_at_utc_day_boundary(wall_second, (0, 0, 0))
}

#[derive(Clone, Copy)]
enum SecondKind {
    Marker,
    ConstZero,
    Variable(fn(&BrokenDownTime) -> bool),
    /// b57/b58 need the wall-clock second, not just the broken-down fields.
    VariableDst(fn(&BrokenDownTime, i64) -> bool),
}
use SecondKind::*;

/// Indexed by `tm_sec` (0-60); `sec_low_samples` in `ersatz-wwvb.c`.
static TABLE: [SecondKind; 61] = [
    Marker,             // 0
    Variable(b01),      // 1
    Variable(b02),      // 2
    Variable(b03),      // 3
    ConstZero,          // 4
    Variable(b05),      // 5
    Variable(b06),      // 6
    Variable(b07),      // 7
    Variable(b08),      // 8
    Marker,             // 9
    ConstZero,          // 10
    ConstZero,          // 11
    Variable(b12),      // 12
    Variable(b13),      // 13
    ConstZero,          // 14
    Variable(b15),      // 15
    Variable(b16),      // 16
    Variable(b17),      // 17
    Variable(b18),      // 18
    Marker,             // 19
    ConstZero,          // 20
    ConstZero,          // 21
    Variable(b22),      // 22
    Variable(b23),      // 23
    ConstZero,          // 24
    Variable(b25),      // 25
    Variable(b26),      // 26
    Variable(b27),      // 27
    Variable(b28),      // 28
    Marker,             // 29
    Variable(b30),      // 30
    Variable(b31),      // 31
    Variable(b32),      // 32
    Variable(b33),      // 33
    ConstZero,          // 34
    ConstZero,          // 35
    Variable(b36),      // 36
    Variable(b37),      // 37
    Variable(b38),      // 38
    Marker,             // 39
    Variable(b40),      // 40
    Variable(b41),      // 41
    Variable(b42),      // 42
    Variable(b43),      // 43
    ConstZero,          // 44
    Variable(b45),      // 45
    Variable(b46),      // 46
    Variable(b47),      // 47
    Variable(b48),      // 48
    Marker,             // 49
    Variable(b50),      // 50
    Variable(b51),      // 51
    Variable(b52),      // 52
    Variable(b53),      // 53
    ConstZero,          // 54
    Variable(b55),      // 55
    Variable(b56),      // 56
    VariableDst(b57),   // 57
    VariableDst(b58),   // 58
    Marker,             // 59
    Marker,             // 60, leap second: preserved as a marker
];

pub const MARKER_SAMPLES: u32 = 48_000 * 4 / 5; // 0.8s low
pub const ZERO_SAMPLES: u32 = 48_000 / 5; // 0.2s low
pub const ONE_SAMPLES: u32 = 48_000 / 2; // 0.5s low

/// Number of leading (reduced-amplitude) samples for the second in `t`.
pub fn boundary_samples(t: &BrokenDownTime, wall_second: i64) -> u32 {
    match TABLE.get(t.second as usize) {
        Some(Marker) => MARKER_SAMPLES,
        Some(ConstZero) => ZERO_SAMPLES,
        Some(Variable(f)) => {
            if f(t) {
                ONE_SAMPLES
            } else {
                ZERO_SAMPLES
            }
        }
        Some(VariableDst(f)) => {
            if f(t, wall_second) {
                ONE_SAMPLES
            } else {
                ZERO_SAMPLES
            }
        }
        None => ZERO_SAMPLES, // unreachable tm_sec: defensive default (spec.md §7)
    }
}

const HALF_HOUR_SEQ_BITS: [u64; 2] = [0x34bd771e648ab67f, 0xb5037c1610e8c4e5];
const FIXED_TIMING_WORD: [u64; 2] = [0x42a5cb431d9a6b8b, 0x0000009207fb6b47];

fn access_bit(words: &[u64; 2], index: i64) -> bool {
    let index = index.rem_euclid(127) as u32;
    (words[(index / 64) as usize] >> (index % 64)) & 1 != 0
}

/// Selects which rotation of the 127-bit PRBS applies at this half-hour
/// boundary (spec.md §4.D, `half_hour_seq`).
fn half_hour_seq(t: &BrokenDownTime, dst_eod: bool, dst_bod: bool) -> i64 {
    let base = (t.hour as i64) * 4 + (t.minute as i64) / 17;
    match (dst_eod, dst_bod) {
        (false, false) => base + 1,
        (true, true) => base + 2,
        (true, false) => {
            if t.hour <= 3 {
                base + 1
            } else if t.hour <= 10 {
                base + 81
            } else {
                base + 2
            }
        }
        (false, true) => {
            if t.hour <= 3 {
                base + 2
            } else if t.hour <= 10 {
                base + 82
            } else {
                base + 1
            }
        }
    }
}

fn pm_six_min(t: &BrokenDownTime, wall_second: i64) -> bool {
    let frame_sec = (t.minute % 10) as i64 * 60 + t.second as i64;
    let dst_eod = b57(t, wall_second);
    let dst_bod = b58(t, wall_second);
    if frame_sec < 127 {
        let seq = half_hour_seq(t, dst_eod, dst_bod);
        access_bit(&HALF_HOUR_SEQ_BITS, seq - 1 + frame_sec)
    } else if frame_sec < 233 {
        access_bit(&FIXED_TIMING_WORD, frame_sec - 127)
    } else {
        let seq = half_hour_seq(t, dst_eod, dst_bod);
        access_bit(&HALF_HOUR_SEQ_BITS, seq + 358 - frame_sec)
    }
}

/// Second-of-minute `sec` for PM data-bit position `i` in 1..=25, the
/// inverse of `wwvb_pm_time`'s mapping in `ersatz-wwvb.c`.
fn data_bit_second(i: i64) -> u32 {
    (if i <= 6 {
        46 - i
    } else if i <= 15 {
        45 - i
    } else if i <= 24 {
        44 - i
    } else {
        18
    }) as u32
}

/// Raw time-data PM bit for the second-of-minute recorded in `t.second`,
/// read out of the per-minute bitfield `mins` (`minute_of_century`,
/// reinterpreted bit-for-bit the way `wwvb_pm_time` does).
fn pm_time_bit(sec: u32, mins: u64) -> bool {
    let i: i64 = if sec >= 40 {
        46 - sec as i64
    } else if sec >= 30 {
        45 - sec as i64
    } else if sec >= 20 {
        44 - sec as i64
    } else if sec == 19 {
        0
    } else {
        25
    };
    (mins >> i) & 1 != 0
}

fn pm_ecc_bit(sec: u32, mins: u64) -> bool {
    let p = 17 - sec as i64;
    let mut parity = true;
    for i in 1i64..26 {
        if (1i64 << p) & i == 0 {
            continue;
        }
        parity ^= pm_time_bit(data_bit_second(i), mins);
    }
    parity
}

/// The single PM bit for the second described by `t` (spec.md §4.D,
/// `wwvb_pm`).
pub fn pm_bit(t: &BrokenDownTime, wall_second: i64) -> bool {
    if (10..=16).contains(&(t.minute % 30)) {
        return pm_six_min(t, wall_second);
    }
    match t.second {
        0 | 1 | 5 | 8 | 10 | 11 | 12 | 29 | 39 | 49 | 59 | 60 => false,
        2 | 3 | 4 | 6 | 7 | 9 => true,
        13..=17 => {
            let mins = time::minute_of_century(t);
            pm_ecc_bit(t.second, mins)
        }
        18..=28 | 30..=38 | 40..=46 => {
            let mins = time::minute_of_century(t);
            pm_time_bit(t.second, mins)
        }
        47 | 50 => b57(t, wall_second) != b58(t, wall_second),
        48 => !(b57(t, wall_second) || b58(t, wall_second)),
        51 => b57(t, wall_second),
        52 => b58(t, wall_second),
        53 => false,
        54 => true,
        55 => true,
        56 => false,
        57 => true,
        58 => true,
        _ => false,
    }
}

/// WWVB transmits only the 60kHz carrier (no 40kHz Fukushima-style variant).
#[derive(Clone, Copy, Default)]
pub struct WwvbProtocol;

impl Protocol for WwvbProtocol {
    type Sample = i16;
    type Extra = ();

    fn wt_size(&self) -> usize {
        12
    }

    fn carrier_freq(&self) -> (u64, u64) {
        (20_000, 1)
    }

    fn low_attenuation(&self) -> f64 {
        0.02
    }

    fn leading_high(&self) -> bool {
        false
    }

    fn boundary_samples(&self, bdt: &BrokenDownTime) -> u32 {
        boundary_samples(bdt, bdt_wall_second(bdt))
    }

    fn broken_down_time(&self, wall_second: i64, _extra: &()) -> BrokenDownTime {
        BrokenDownTime::from_utc(wall_second)
    }

    fn on_sample_index(&self, state: &mut CallbackState<()>) {
        if state.sample_index == crate::callback::SAMPLE_RATE / 10 {
            let wall_second = state.wall_second;
            let flip = pm_bit(&state.current_bdt, wall_second);
            state.wt_index = if flip { self.wt_size() / 2 } else { 0 };
        }
    }
}

/// `BrokenDownTime` no longer carries the originating `wall_second` once
/// decomposed; `boundary_samples` (called once per second-advance, never on
/// the hot path) needs it for the DST-edge bits, so `WwvbProtocol` derives
/// it back out of the UTC fields rather than threading an extra parameter
/// through the whole `Protocol` trait.
fn bdt_wall_second(t: &BrokenDownTime) -> i64 {
    use chrono::{TimeZone, Utc};
    let date = chrono::NaiveDate::from_yo_opt(t.year, t.day_of_year).expect("valid day of year");
    let naive = date
        .and_hms_opt(t.hour, t.minute, t.second.min(59))
        .expect("valid time of day");
    Utc.from_utc_datetime(&naive).timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bdt(minute: u32, second: u32) -> BrokenDownTime {
        BrokenDownTime {
            year: 2024,
            year_of_century: 24,
            day_of_year: 1,
            hour: 0,
            minute,
            second,
            weekday: 0,
            dst: false,
        }
    }

    #[test]
    fn dut1_bits_are_fixed() {
        let t = bdt(0, 0);
        assert!(b36(&t));
        assert!(!b37(&t));
        assert!(b38(&t));
        assert!(!b40(&t));
        assert!(!b41(&t));
        assert!(!b42(&t));
        assert!(!b43(&t));
    }

    #[test]
    fn dut1_boundary_samples_follow_fixed_bits() {
        let t = bdt(0, 36);
        assert_eq!(boundary_samples(&t, 0), ONE_SAMPLES);
        let t = bdt(0, 37);
        assert_eq!(boundary_samples(&t, 0), ZERO_SAMPLES);
    }

    #[test]
    fn leap_year_bit_matches_gregorian_rule() {
        for year in 1900..=2099 {
            let mut t = bdt(0, 55);
            t.year = year;
            let expected = (year % 4 == 0) && ((year % 100 != 0) || (year % 400 == 0));
            assert_eq!(b55(&t), expected, "year {year}");
        }
    }

    #[test]
    fn six_minute_window_fixed_timing_word_bit() {
        // minute % 30 == 13, sec == 0 -> frame_sec = 180, bit = FIXED_TIMING_WORD[53]
        let t = bdt(13, 0);
        let wall = bdt_wall_second(&t);
        assert_eq!(pm_bit(&t, wall), access_bit(&FIXED_TIMING_WORD, 180 - 127));
        assert_eq!(access_bit(&FIXED_TIMING_WORD, 53), true);
    }

    #[test]
    fn marker_seconds_return_marker_length() {
        for sec in [0, 9, 19, 29, 39, 49, 59, 60] {
            let t = bdt(0, sec);
            assert_eq!(boundary_samples(&t, 0), MARKER_SAMPLES, "sec {sec}");
        }
    }

    #[test]
    fn minute_round_trips_through_bcd_bits() {
        for minute in 0..60 {
            let t = bdt(minute, 0);
            let tens = (b01(&t) as u32) * 4 + (b02(&t) as u32) * 2 + (b03(&t) as u32);
            let ones = (b05(&t) as u32) * 8
                + (b06(&t) as u32) * 4
                + (b07(&t) as u32) * 2
                + (b08(&t) as u32);
            assert_eq!(tens * 10 + ones, minute);
        }
    }
}
