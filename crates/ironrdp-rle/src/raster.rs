use crate::pixel::Pixel;
use crate::RleError;

/// Output pixel grid, filled from the last row up to the first one.
///
/// Row `r` occupies bytes `[r * width * N, (r + 1) * width * N)`. The row decoded
/// just before the current one (the "previous" row) is the row right below it,
/// at index `row + 1`.
pub(crate) struct Raster<'a, const N: usize> {
    buf: &'a mut [u8],
    width: usize,
    height: usize,
    /// Index of the scanline being written; equal to `height` until the first one is opened.
    row: usize,
    x: usize,
}

impl<'a, const N: usize> Raster<'a, N> {
    pub(crate) fn new(buf: &'a mut [u8], width: usize, height: usize) -> Result<Self, RleError> {
        if width == 0 {
            return Err(RleError::ZeroWidth);
        }

        let actual = buf.len();
        let required = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(N))
            .ok_or(RleError::OutputTooSmall {
                required: usize::MAX,
                actual,
            })?;

        if required > actual {
            return Err(RleError::OutputTooSmall { required, actual });
        }

        Ok(Self {
            buf: &mut buf[..required],
            width,
            height,
            row: height,
            x: width,
        })
    }

    /// Opens the next scanline when the current one is complete.
    ///
    /// Must be called before every pixel write.
    pub(crate) fn ensure_row(&mut self) -> Result<(), RleError> {
        if self.x >= self.width {
            if self.row == 0 {
                return Err(RleError::ImageOverflow);
            }

            self.row -= 1;
            self.x = 0;
        }

        Ok(())
    }

    pub(crate) fn previous_row(&self) -> Option<usize> {
        let previous = self.row + 1;
        (previous < self.height).then_some(previous)
    }

    /// True before the first pixel is written and right after the first scanline is completed.
    pub(crate) fn at_first_row_boundary(&self) -> bool {
        self.x == self.width && self.previous_row().is_none()
    }

    /// Same-column pixel of the previous row, or black on the first scanline.
    pub(crate) fn pixel_above(&self) -> Pixel<N> {
        match self.previous_row() {
            Some(previous) => {
                let offset = self.offset(previous, self.x);
                let mut pixel = [0; N];
                pixel.copy_from_slice(&self.buf[offset..offset + N]);
                Pixel(pixel)
            }
            None => Pixel::BLACK,
        }
    }

    pub(crate) fn write_pixel(&mut self, pixel: Pixel<N>) {
        let offset = self.offset(self.row, self.x);
        self.buf[offset..offset + N].copy_from_slice(pixel.as_bytes());
        self.x += 1;
    }

    fn offset(&self, row: usize, x: usize) -> usize {
        (row * self.width + x) * N
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(raster: &mut Raster<'_, 2>, value: u8) {
        raster.ensure_row().expect("room for another pixel");
        raster.write_pixel(Pixel([value, value]));
    }

    #[test]
    fn fills_from_last_row_up() {
        let mut buf = vec![0; 3 * 2 * 2];
        let mut raster = Raster::<2>::new(&mut buf, 3, 2).expect("valid dimensions");

        assert!(raster.at_first_row_boundary());

        for value in 1..=3 {
            write(&mut raster, value);
        }
        assert!(raster.at_first_row_boundary());

        write(&mut raster, 4);
        assert!(!raster.at_first_row_boundary());
        assert_eq!(raster.pixel_above(), Pixel([2, 2]));
        write(&mut raster, 5);
        write(&mut raster, 6);

        assert_eq!(raster.ensure_row(), Err(RleError::ImageOverflow));
        assert_eq!(buf, [4, 4, 5, 5, 6, 6, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn first_row_reads_black_above() {
        let mut buf = vec![0xAA; 4];
        let mut raster = Raster::<1>::new(&mut buf, 2, 2).expect("valid dimensions");

        raster.ensure_row().expect("room for another pixel");
        assert_eq!(raster.previous_row(), None);
        assert_eq!(raster.pixel_above(), Pixel::BLACK);
    }

    #[test]
    fn zero_height_cannot_open_a_row() {
        let mut buf: [u8; 0] = [];
        let mut raster = Raster::<3>::new(&mut buf, 4, 0).expect("valid dimensions");

        assert_eq!(raster.ensure_row(), Err(RleError::ImageOverflow));
    }

    #[test]
    fn rejects_bad_dimensions() {
        let mut buf = vec![0; 5];

        assert_eq!(
            Raster::<2>::new(&mut buf, 3, 1).err(),
            Some(RleError::OutputTooSmall { required: 6, actual: 5 })
        );
        assert_eq!(Raster::<2>::new(&mut buf, 0, 1).err(), Some(RleError::ZeroWidth));
        assert!(matches!(
            Raster::<3>::new(&mut buf, usize::MAX, 2),
            Err(RleError::OutputTooSmall { .. })
        ));
    }
}
