use core::ops::BitXor;

use crate::RleError;

/// A single pixel, `N` bytes wide, in wire byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pixel<const N: usize>(pub [u8; N]);

impl<const N: usize> Pixel<N> {
    pub const BLACK: Self = Self([0x00; N]);

    pub const WHITE: Self = Self([0xFF; N]);

    pub const fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> Default for Pixel<N> {
    fn default() -> Self {
        Self::BLACK
    }
}

impl<const N: usize> BitXor for Pixel<N> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        let mut out = self.0;
        out.iter_mut().zip(rhs.0).for_each(|(lhs, rhs)| *lhs ^= rhs);
        Self(out)
    }
}

/// Supported pixel widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BytesPerPixel {
    One,
    Two,
    Three,
}

impl BytesPerPixel {
    pub const fn as_usize(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<usize> for BytesPerPixel {
    type Error = RleError;

    fn try_from(bytes_per_pixel: usize) -> Result<Self, Self::Error> {
        match bytes_per_pixel {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(RleError::InvalidBytesPerPixel { bytes_per_pixel }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RlePixelFormat {
    Rgb24,
    Rgb16,
    Rgb15,
    Rgb8,
}

impl RlePixelFormat {
    /// Maps a color depth in bits per pixel to its pixel format.
    pub fn from_bpp(bpp: usize) -> Result<Self, RleError> {
        match bpp {
            24 => Ok(Self::Rgb24),
            16 => Ok(Self::Rgb16),
            15 => Ok(Self::Rgb15),
            8 => Ok(Self::Rgb8),
            _ => Err(RleError::InvalidBpp { bpp }),
        }
    }

    pub const fn bits_per_pixel(self) -> usize {
        match self {
            Self::Rgb24 => 24,
            Self::Rgb16 => 16,
            Self::Rgb15 => 15,
            Self::Rgb8 => 8,
        }
    }

    /// 15-bit pixels are stored on two bytes, like 16-bit ones.
    pub const fn bytes_per_pixel(self) -> BytesPerPixel {
        match self {
            Self::Rgb24 => BytesPerPixel::Three,
            Self::Rgb16 | Self::Rgb15 => BytesPerPixel::Two,
            Self::Rgb8 => BytesPerPixel::One,
        }
    }
}
