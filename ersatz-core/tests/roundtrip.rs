//! Full-field BCD round-trip checks across the whole domain of each field
//! (spec.md §8, "Testable Properties"), plus a couple of cross-protocol
//! invariants that don't belong inside either bit-codec module.

use ersatz_core::time::BrokenDownTime;
use ersatz_core::{jjy, wwvb};

fn bdt(hour: u32, minute: u32, day_of_year: u32, year_of_century: u32, weekday: u32) -> BrokenDownTime {
    BrokenDownTime {
        year: 2000 + year_of_century as i32,
        year_of_century,
        day_of_year,
        hour,
        minute,
        second: 0,
        weekday,
        dst: false,
    }
}

#[test]
fn jjy_hour_round_trips_through_bcd_bits() {
    for hour in 0..24 {
        let t = bdt(hour, 0, 1, 0, 0);
        let tens = (jjy::b12(&t) as u32) * 2 + (jjy::b13(&t) as u32);
        let ones = (jjy::b15(&t) as u32) * 8
            + (jjy::b16(&t) as u32) * 4
            + (jjy::b17(&t) as u32) * 2
            + (jjy::b18(&t) as u32);
        assert_eq!(tens * 10 + ones, hour);
    }
}

#[test]
fn jjy_day_of_year_round_trips_through_bcd_bits() {
    for day in 1..=366u32 {
        let t = bdt(0, 0, day, 0, 0);
        let hundreds = jjy::b22(&t) as u32 * 2 + jjy::b23(&t) as u32;
        let tens = (jjy::b25(&t) as u32) * 8
            + (jjy::b26(&t) as u32) * 4
            + (jjy::b27(&t) as u32) * 2
            + (jjy::b28(&t) as u32);
        let ones = (jjy::b30(&t) as u32) * 8
            + (jjy::b31(&t) as u32) * 4
            + (jjy::b32(&t) as u32) * 2
            + (jjy::b33(&t) as u32);
        assert_eq!(hundreds * 100 + tens * 10 + ones, day);
    }
}

#[test]
fn jjy_year_of_century_round_trips_through_bcd_bits() {
    for year in 0..100u32 {
        let t = bdt(0, 0, 1, year, 0);
        let tens = (jjy::b41(&t) as u32) * 8
            + (jjy::b42(&t) as u32) * 4
            + (jjy::b43(&t) as u32) * 2
            + (jjy::b44(&t) as u32);
        let ones = (jjy::b45(&t) as u32) * 8
            + (jjy::b46(&t) as u32) * 4
            + (jjy::b47(&t) as u32) * 2
            + (jjy::b48(&t) as u32);
        assert_eq!(tens * 10 + ones, year);
    }
}

#[test]
fn jjy_weekday_round_trips_through_bcd_bits() {
    for weekday in 0..7u32 {
        let t = bdt(0, 0, 1, 0, weekday);
        let value =
            (jjy::b50(&t) as u32) * 4 + (jjy::b51(&t) as u32) * 2 + (jjy::b52(&t) as u32);
        assert_eq!(value, weekday);
    }
}

#[test]
fn wwvb_hour_and_year_round_trip_through_bcd_bits() {
    for hour in 0..24 {
        let t = bdt(hour, 0, 1, 0, 0);
        let tens = (wwvb::b12(&t) as u32) * 2 + (wwvb::b13(&t) as u32);
        let ones = (wwvb::b15(&t) as u32) * 8
            + (wwvb::b16(&t) as u32) * 4
            + (wwvb::b17(&t) as u32) * 2
            + (wwvb::b18(&t) as u32);
        assert_eq!(tens * 10 + ones, hour);
    }
    for year in 0..100u32 {
        let t = bdt(0, 0, 1, year, 0);
        let tens = (wwvb::b45(&t) as u32) * 8
            + (wwvb::b46(&t) as u32) * 4
            + (wwvb::b47(&t) as u32) * 2
            + (wwvb::b48(&t) as u32);
        let ones = (wwvb::b50(&t) as u32) * 8
            + (wwvb::b51(&t) as u32) * 4
            + (wwvb::b52(&t) as u32) * 2
            + (wwvb::b53(&t) as u32);
        assert_eq!(tens * 10 + ones, year);
    }
}

#[test]
fn jjy_parity_bits_match_their_definitions() {
    for (hour, minute) in [(0, 0), (13, 42), (23, 59), (9, 8)] {
        let t = bdt(hour, minute, 100, 24, 3);
        let expected_hour_parity =
            jjy::b12(&t) ^ jjy::b13(&t) ^ jjy::b15(&t) ^ jjy::b16(&t) ^ jjy::b17(&t) ^ jjy::b18(&t);
        assert_eq!(jjy::b36(&t), expected_hour_parity);
        let expected_minute_parity = jjy::b01(&t)
            ^ jjy::b02(&t)
            ^ jjy::b03(&t)
            ^ jjy::b05(&t)
            ^ jjy::b06(&t)
            ^ jjy::b07(&t)
            ^ jjy::b08(&t);
        assert_eq!(jjy::b37(&t), expected_minute_parity);
    }
}
