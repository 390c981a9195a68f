#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![doc(html_logo_url = "https://cdnweb.devolutions.net/images/projects/devolutions/logos/devolutions-icon-shadow.svg")]

//! Interleaved Run-Length Encoding (RLE) Bitmap Codec
//!
//! ### References
//!
//! - Microsoft Learn:
//!   - [RLE_BITMAP_STREAM](https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-rdpbcgr/b3b60873-16a8-4cbc-8aaa-5f0a93083280)
//!   - [Pseudo-code](https://learn.microsoft.com/en-us/openspecs/windows_protocols/ms-rdpbcgr/b6a3f5c2-0804-4c10-9d25-a321720fd23e)

mod cursor;
mod decoder;
mod error;
mod order;
mod pixel;
mod raster;

use tracing::{debug, warn};

pub use self::error::RleError;
pub use self::pixel::{BytesPerPixel, Pixel, RlePixelFormat};

use self::decoder::RleDecoder;

/// Decodes a 1-byte-per-pixel RLE compressed bitmap.
///
/// `dst`: destination buffer, at least `width * height` bytes
/// `width`: decompressed bitmap width
/// `height`: decompressed bitmap height
/// `src`: source buffer containing the compressed bitmap
///
/// The first decoded scanline is written to the last row of `dst`. On error, rows
/// that were not completed hold unspecified data.
pub fn decode_1bpp(dst: &mut [u8], width: usize, height: usize, src: &[u8]) -> Result<(), RleError> {
    decode_helper::<1>(dst, width, height, src)
}

/// Decodes a 2-bytes-per-pixel RLE compressed bitmap (15 or 16 bits per pixel).
///
/// `dst`: destination buffer, at least `width * height * 2` bytes
/// `width`: decompressed bitmap width
/// `height`: decompressed bitmap height
/// `src`: source buffer containing the compressed bitmap
pub fn decode_2bpp(dst: &mut [u8], width: usize, height: usize, src: &[u8]) -> Result<(), RleError> {
    decode_helper::<2>(dst, width, height, src)
}

/// Decodes a 3-bytes-per-pixel RLE compressed bitmap.
///
/// `dst`: destination buffer, at least `width * height * 3` bytes
/// `width`: decompressed bitmap width
/// `height`: decompressed bitmap height
/// `src`: source buffer containing the compressed bitmap
pub fn decode_3bpp(dst: &mut [u8], width: usize, height: usize, src: &[u8]) -> Result<(), RleError> {
    decode_helper::<3>(dst, width, height, src)
}

/// Decodes an RLE compressed bitmap whose pixel width is only known at runtime.
pub fn decode(
    dst: &mut [u8],
    width: usize,
    height: usize,
    src: &[u8],
    bytes_per_pixel: BytesPerPixel,
) -> Result<(), RleError> {
    match bytes_per_pixel {
        BytesPerPixel::One => decode_1bpp(dst, width, height, src),
        BytesPerPixel::Two => decode_2bpp(dst, width, height, src),
        BytesPerPixel::Three => decode_3bpp(dst, width, height, src),
    }
}

/// Decompress an RLE compressed bitmap.
///
/// `src`: source buffer containing compressed bitmap
/// `dst`: destination buffer, resized to fit the decompressed bitmap
/// `width`: decompressed bitmap width
/// `height`: decompressed bitmap height
/// `bpp`: bits per pixel
pub fn decompress(
    src: &[u8],
    dst: &mut Vec<u8>,
    width: impl Into<usize>,
    height: impl Into<usize>,
    bpp: impl Into<usize>,
) -> Result<RlePixelFormat, RleError> {
    let width = width.into();
    let height = height.into();
    let bpp = bpp.into();

    debug!(bpp, width, height, src_len = src.len(), "Decompressing RLE bitmap");

    let format = RlePixelFormat::from_bpp(bpp)?;
    let bytes_per_pixel = format.bytes_per_pixel();

    let required = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(bytes_per_pixel.as_usize()))
        .ok_or(RleError::OutputTooSmall {
            required: usize::MAX,
            actual: dst.len(),
        })?;

    dst.clear();
    dst.resize(required, 0);

    decode(dst, width, height, src, bytes_per_pixel)
        .inspect_err(|error| warn!(%error, ?format, "Invalid RLE-compressed bitmap"))?;

    Ok(format)
}

fn decode_helper<const N: usize>(dst: &mut [u8], width: usize, height: usize, src: &[u8]) -> Result<(), RleError> {
    RleDecoder::<N>::new(src, dst, width, height)?.decode()
}
