#![no_main]

use ironrdp_rle_fuzzing::generators::BitmapInput;
use ironrdp_rle_fuzzing::oracles;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: BitmapInput<'_>| {
    oracles::rle_decompress(input);
});
