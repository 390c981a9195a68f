//! Oracles.
//!
//! Oracles take a test case and determine whether we have a bug. The RLE oracle
//! decodes arbitrary bytes as a compressed bitmap at every supported pixel
//! width, and checks that decoding never panics and never touches bytes past
//! the end of the image.
//!
//! When an oracle finds a bug, it should report it to the fuzzing engine by
//! panicking.

use ironrdp_rle::BytesPerPixel;

use crate::generators::BitmapInput;

/// Bytes appended after the image to detect out-of-bounds writes.
const GUARD_LEN: usize = 16;
const GUARD_BYTE: u8 = 0xA5;

pub fn rle_decode(input: BitmapInput<'_>) {
    let width = usize::from(input.width);
    let height = usize::from(input.height);

    for bytes_per_pixel in [BytesPerPixel::One, BytesPerPixel::Two, BytesPerPixel::Three] {
        let image_len = width * height * bytes_per_pixel.as_usize();
        let mut out = vec![GUARD_BYTE; image_len + GUARD_LEN];

        let _ = ironrdp_rle::decode(&mut out, width, height, input.src, bytes_per_pixel);

        assert!(
            out[image_len..].iter().all(|byte| *byte == GUARD_BYTE),
            "decoder wrote past the end of the image"
        );
    }
}

pub fn rle_decompress(input: BitmapInput<'_>) {
    let mut out = Vec::new();

    for bpp in [8usize, 15, 16, 24] {
        let _ = ironrdp_rle::decompress(input.src, &mut out, input.width, input.height, bpp);
    }
}
