use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RleError {
    #[error("not enough bytes: expected {expected} bytes, but got {actual}")]
    NotEnoughBytes { expected: usize, actual: usize },

    #[error("decoded data overflows the image: no scanline left to write into")]
    ImageOverflow,

    #[error("bad RLE order code: 0x{code:02X}")]
    BadOrderCode { code: u8 },

    #[error("output buffer too small: {required} bytes are required, but only {actual} are available")]
    OutputTooSmall { required: usize, actual: usize },

    #[error("image width is zero")]
    ZeroWidth,

    #[error("invalid bytes per pixel: {bytes_per_pixel}")]
    InvalidBytesPerPixel { bytes_per_pixel: usize },

    #[error("invalid bits per pixel: {bpp}")]
    InvalidBpp { bpp: usize },
}
