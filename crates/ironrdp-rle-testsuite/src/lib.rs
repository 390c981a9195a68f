// No need to be as strict as in production libraries
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_possible_truncation)]

pub mod encoder;

/// Builds the stream bytes of an order using the general, escaped or extended length form.
///
/// Only valid for order codes `0x0..=0x4` other than fill-or-mix (`0x2`).
pub fn general_order(code: u8, run_length: usize) -> Vec<u8> {
    assert!(code <= 4 && code != 2, "not a general run order");

    match run_length {
        1..=31 => vec![(code << 5) | run_length as u8],
        32..=287 => vec![code << 5, (run_length - 32) as u8],
        _ => {
            let [low, high] = u16::try_from(run_length).expect("run length fits in 16 bits").to_le_bytes();
            vec![0xF0 | code, low, high]
        }
    }
}
