//! JJY bit codec, second classifier, and [`crate::callback::Protocol`] impl.
//!
//! Bit formulas are ported in meaning from `jjy_b01`..`jjy_b54` in
//! `ersatz-jjy.c`: each is the recursive "remainder against the next decade
//! up, compared to this digit's weight" BCD extraction.

use crate::callback::{CallbackState, Protocol};
use crate::time::BrokenDownTime;

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

/// Hour parity.
pub fn b36(t: &BrokenDownTime) -> bool {
    b12(t) ^ b13(t) ^ b15(t) ^ b16(t) ^ b17(t) ^ b18(t)
}
/// Minute parity.
pub fn b37(t: &BrokenDownTime) -> bool {
    b01(t) ^ b02(t) ^ b03(t) ^ b05(t) ^ b06(t) ^ b07(t) ^ b08(t)
}

pub fn b41(t: &BrokenDownTime) -> bool {
    t.year_of_century >= 80
}
pub fn b42(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 80) >= 40
}
pub fn b43(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 40) >= 20
}
pub fn b44(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 20) >= 10
}
pub fn b45(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 10) >= 8
}
pub fn b46(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 10 % 8) >= 4
}
pub fn b47(t: &BrokenDownTime) -> bool {
    (t.year_of_century % 10 % 4) >= 2
}
pub fn b48(t: &BrokenDownTime) -> bool {
    t.year_of_century % 2 > 0
}

pub fn b50(t: &BrokenDownTime) -> bool {
    t.weekday >= 4
}
pub fn b51(t: &BrokenDownTime) -> bool {
    (t.weekday % 4) >= 2
}
pub fn b52(t: &BrokenDownTime) -> bool {
    t.weekday % 2 > 0
}

/// Reserved for leap-second signalling in the real broadcast; this system
/// implements no leap-second support (spec.md Non-goals), so these are
/// always zero, same as `jjy_b53`/`jjy_b54` in `ersatz-jjy.c`.
pub fn b53(_t: &BrokenDownTime) -> bool {
    false
}
pub fn b54(_t: &BrokenDownTime) -> bool {
    false
}

#[derive(Clone, Copy)]
enum SecondKind {
    Marker,
    ConstZero,
    Variable(fn(&BrokenDownTime) -> bool),
}
use SecondKind::*;

/// Indexed by `tm_sec` (0-60); `sec_high_samples` in `ersatz-jjy.c`.
static TABLE: [SecondKind; 61] = [
    Marker,           // 0
    Variable(b01),    // 1
    Variable(b02),    // 2
    Variable(b03),    // 3
    ConstZero,        // 4
    Variable(b05),    // 5
    Variable(b06),    // 6
    Variable(b07),    // 7
    Variable(b08),    // 8
    Marker,           // 9
    ConstZero,        // 10
    ConstZero,        // 11
    Variable(b12),    // 12
    Variable(b13),    // 13
    ConstZero,        // 14
    Variable(b15),    // 15
    Variable(b16),    // 16
    Variable(b17),    // 17
    Variable(b18),    // 18
    Marker,           // 19
    ConstZero,        // 20
    ConstZero,        // 21
    Variable(b22),    // 22
    Variable(b23),    // 23
    ConstZero,        // 24
    Variable(b25),    // 25
    Variable(b26),    // 26
    Variable(b27),    // 27
    Variable(b28),    // 28
    Marker,           // 29
    Variable(b30),    // 30
    Variable(b31),    // 31
    Variable(b32),    // 32
    Variable(b33),    // 33
    ConstZero,        // 34
    ConstZero,        // 35
    Variable(b36),    // 36
    Variable(b37),    // 37
    ConstZero,        // 38
    Marker,           // 39
    ConstZero,        // 40
    Variable(b41),    // 41
    Variable(b42),    // 42
    Variable(b43),    // 43
    Variable(b44),    // 44
    Variable(b45),    // 45
    Variable(b46),    // 46
    Variable(b47),    // 47
    Variable(b48),    // 48
    Marker,           // 49
    Variable(b50),    // 50
    Variable(b51),    // 51
    Variable(b52),    // 52
    Variable(b53),    // 53
    Variable(b54),    // 54
    ConstZero,        // 55
    ConstZero,        // 56
    ConstZero,        // 57
    ConstZero,        // 58
    Marker,           // 59
    Marker,           // 60, leap second: preserved as a marker (spec.md §9 open question)
];

pub const MARKER_SAMPLES: u32 = 48_000 / 5; // 0.2s high
pub const ZERO_SAMPLES: u32 = 48_000 * 4 / 5; // 0.8s high
pub const ONE_SAMPLES: u32 = 48_000 / 2; // 0.5s high

/// Number of leading (high-amplitude) samples for the second in `t`.
pub fn boundary_samples(t: &BrokenDownTime) -> u32 {
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
        None => ZERO_SAMPLES, // unreachable tm_sec: defensive default (spec.md §7)
    }
}

/// A JJY carrier variant: 60kHz/20kHz "standard" or 40kHz "Fukushima".
#[derive(Clone, Copy)]
pub struct JjyProtocol {
    pub fukushima: bool,
}

/// Per-stream state that only JJY needs: whether `-j`/`--jst` forces JST
/// decomposition regardless of the host's system timezone.
#[derive(Clone, Copy)]
pub struct JjyExtra {
    pub jst: bool,
}

impl Protocol for JjyProtocol {
    type Sample = f32;
    type Extra = JjyExtra;

    fn wt_size(&self) -> usize {
        if self.fukushima {
            18
        } else {
            12
        }
    }

    fn carrier_freq(&self) -> (u64, u64) {
        if self.fukushima {
            (40_000, 3)
        } else {
            (20_000, 1)
        }
    }

    fn low_attenuation(&self) -> f64 {
        0.1
    }

    fn leading_high(&self) -> bool {
        true
    }

    fn boundary_samples(&self, bdt: &BrokenDownTime) -> u32 {
        boundary_samples(bdt)
    }

    fn broken_down_time(&self, wall_second: i64, extra: &JjyExtra) -> BrokenDownTime {
        if extra.jst {
            BrokenDownTime::from_jst(wall_second)
        } else {
            BrokenDownTime::from_local(wall_second)
        }
    }

    fn on_sample_index(&self, _state: &mut CallbackState<JjyExtra>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bdt(minute: u32) -> BrokenDownTime {
        BrokenDownTime {
            year: 2024,
            year_of_century: 24,
            day_of_year: 1,
            hour: 0,
            minute,
            second: 0,
            weekday: 0,
            dst: false,
        }
    }

    #[test]
    fn minute_42_bit_extraction() {
        let t = bdt(42);
        assert!(b01(&t));
        assert!(!b02(&t));
        assert!(!b03(&t));
        assert!(!b05(&t));
        assert!(!b06(&t));
        assert!(b07(&t));
        assert!(!b08(&t));
        assert!(!b37(&t));
    }

    #[test]
    fn minute_round_trips_through_bcd_bits() {
        for minute in 0..60 {
            let t = bdt(minute);
            let tens = (b01(&t) as u32) * 4 + (b02(&t) as u32) * 2 + (b03(&t) as u32);
            let ones = (b05(&t) as u32) * 8
                + (b06(&t) as u32) * 4
                + (b07(&t) as u32) * 2
                + (b08(&t) as u32);
            assert_eq!(tens * 10 + ones, minute);
        }
    }

    #[test]
    fn marker_at_top_of_every_minute() {
        let mut t = bdt(0);
        t.second = 0;
        assert_eq!(boundary_samples(&t), MARKER_SAMPLES);
    }

    #[test]
    fn second_sixty_is_a_marker() {
        let mut t = bdt(0);
        t.second = 60;
        assert_eq!(boundary_samples(&t), MARKER_SAMPLES);
    }

    #[test]
    fn fukushima_wavetable_parameters() {
        let p = JjyProtocol { fukushima: true };
        assert_eq!(p.wt_size(), 18);
        assert_eq!(p.carrier_freq(), (40_000, 3));
    }
}
