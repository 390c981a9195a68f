//! A small, greedy RLE encoder used to produce reference streams for the decoder tests.
//!
//! It only emits fill, mix, fill-or-mix, color, copy, bicolor, white and black orders,
//! and never changes the mix color, so every mixed pixel uses the default white mix.
//! Compression ratio is not a concern here.

use crate::general_order;

const MAX_RUN_LENGTH: usize = 0xFFFF;

const CODE_FILL: u8 = 0x0;
const CODE_MIX: u8 = 0x1;
const CODE_COLOR: u8 = 0x3;
const CODE_COPY: u8 = 0x4;

const ORDER_WHITE: u8 = 0xFD;
const ORDER_BLACK: u8 = 0xFE;

struct Image<'a> {
    pixels: &'a [u8],
    width: usize,
    height: usize,
    bpp: usize,
}

impl Image<'_> {
    fn len(&self) -> usize {
        self.width * self.height
    }

    /// Pixel at position `i` in decoding order (bottom row first).
    fn pixel(&self, i: usize) -> &[u8] {
        let row = self.height - 1 - i / self.width;
        let offset = (row * self.width + i % self.width) * self.bpp;
        &self.pixels[offset..offset + self.bpp]
    }

    fn above(&self, i: usize) -> Vec<u8> {
        if i < self.width {
            vec![0; self.bpp]
        } else {
            self.pixel(i - self.width).to_vec()
        }
    }

    fn is_fill(&self, i: usize) -> bool {
        self.pixel(i) == self.above(i)
    }

    fn is_mix(&self, i: usize) -> bool {
        self.pixel(i).iter().zip(self.above(i)).all(|(pixel, above)| *pixel == !above)
    }

    fn run_while(&self, start: usize, predicate: impl Fn(usize) -> bool) -> usize {
        (start..self.len()).take_while(|i| predicate(*i)).count()
    }
}

/// Encodes a top-down image of `width * height` pixels of `bpp` bytes each.
///
/// # Panics
///
/// If the image buffer size does not match the dimensions.
pub fn encode(pixels: &[u8], width: usize, height: usize, bpp: usize) -> Vec<u8> {
    assert_eq!(pixels.len(), width * height * bpp, "image size mismatch");

    let image = Image {
        pixels,
        width,
        height,
        bpp,
    };

    let mut out = Vec::new();
    let mut last_was_fill = false;
    let mut i = 0;

    while i < image.len() {
        let fill_len = image.run_while(i, |j| image.is_fill(j));

        // Two fill orders in a row imply a mixed pixel, so a fill never follows a fill.
        if fill_len > 0 && !last_was_fill {
            let len = fill_len.min(MAX_RUN_LENGTH);
            out.extend(general_order(CODE_FILL, len));
            last_was_fill = true;
            i += len;
            continue;
        }

        last_was_fill = false;

        let mix_len = image.run_while(i, |j| image.is_mix(j));
        let fill_or_mix_len = image.run_while(i, |j| image.is_fill(j) || image.is_mix(j));

        if fill_or_mix_len >= 8 && mix_len < 8 {
            let len = (fill_or_mix_len / 8 * 8).min(31 * 8);
            out.push(0x40 | (len / 8) as u8);

            for chunk_start in (i..i + len).step_by(8) {
                let mask = (0..8)
                    .filter(|bit| image.is_mix(chunk_start + bit))
                    .fold(0u8, |mask, bit| mask | (1u8 << bit));
                out.push(mask);
            }

            i += len;
            continue;
        }

        if mix_len > 0 {
            let len = mix_len.min(MAX_RUN_LENGTH);
            out.extend(general_order(CODE_MIX, len));
            i += len;
            continue;
        }

        let first = image.pixel(i);
        let color_len = image.run_while(i, |j| image.pixel(j) == first);

        if color_len == 1 && first.iter().all(|byte| *byte == 0xFF) {
            out.push(ORDER_WHITE);
            i += 1;
            continue;
        }

        if color_len == 1 && first.iter().all(|byte| *byte == 0x00) {
            out.push(ORDER_BLACK);
            i += 1;
            continue;
        }

        if color_len >= 2 {
            let len = color_len.min(MAX_RUN_LENGTH);
            out.extend(general_order(CODE_COLOR, len));
            out.extend_from_slice(first);
            i += len;
            continue;
        }

        if i + 1 < image.len() {
            let second = image.pixel(i + 1);
            let pairs = (i..image.len() - 1)
                .step_by(2)
                .take_while(|j| image.pixel(*j) == first && image.pixel(j + 1) == second)
                .count()
                .min(MAX_RUN_LENGTH);

            if pairs >= 2 {
                match pairs {
                    1..=15 => out.push(0xE0 | pairs as u8),
                    16..=271 => out.extend([0xE0, (pairs - 16) as u8]),
                    _ => {
                        out.push(0xF8);
                        out.extend((pairs as u16).to_le_bytes());
                    }
                }
                out.extend_from_slice(first);
                out.extend_from_slice(second);
                i += pairs * 2;
                continue;
            }
        }

        let copy_len = image
            .run_while(i, |j| {
                j == i
                    || !(image.is_fill(j)
                        || image.is_mix(j)
                        || (j + 1 < image.len() && image.pixel(j) == image.pixel(j + 1)))
            })
            .min(MAX_RUN_LENGTH);

        out.extend(general_order(CODE_COPY, copy_len));
        for j in i..i + copy_len {
            out.extend_from_slice(image.pixel(j));
        }
        i += copy_len;
    }

    out
}
