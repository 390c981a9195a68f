use crate::cursor::ReadCursor;
use crate::order::{OrderCode, OrderHeader};
use crate::pixel::Pixel;
use crate::raster::Raster;
use crate::RleError;

// Dither masks of the two special fill-or-mix orders.
const MASK_FILL_OR_MIX_1: u8 = 0x03;
const MASK_FILL_OR_MIX_2: u8 = 0x05;

/// Where a fill-or-mix run takes its bitmask from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaskSource {
    /// One mask byte is read from the input for every 8 pixels.
    Stream,
    Fixed(u8),
}

/// Body behavior of a run, resolved once from its order header and operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<const N: usize> {
    Fill,
    Mix,
    FillOrMix { mask: MaskSource },
    Color(Pixel<N>),
    Copy,
    Bicolor { first: Pixel<N>, second: Pixel<N> },
    White,
    Black,
}

/// State carried from one run to the next.
#[derive(Debug, Clone)]
struct RunState<const N: usize> {
    /// Order code of the previous run, after set-mix and special orders are folded.
    last_code: Option<OrderCode>,
    /// A fill run following another fill run starts with one mixed pixel.
    insert_mix: bool,
    /// Set while the second color of a bicolor pair is pending.
    bicolor_second: bool,
    mask: u8,
    /// Sampling register walking over the bits of `mask`.
    mix_mask: u8,
    mix: Pixel<N>,
}

impl<const N: usize> Default for RunState<N> {
    fn default() -> Self {
        Self {
            last_code: None,
            insert_mix: false,
            bicolor_second: false,
            mask: 0,
            mix_mask: 0,
            mix: Pixel::WHITE,
        }
    }
}

pub(crate) struct RleDecoder<'src, 'dst, const N: usize> {
    src: ReadCursor<'src>,
    dst: Raster<'dst, N>,
    state: RunState<N>,
}

impl<'src, 'dst, const N: usize> RleDecoder<'src, 'dst, N> {
    pub(crate) fn new(src: &'src [u8], dst: &'dst mut [u8], width: usize, height: usize) -> Result<Self, RleError> {
        Ok(Self {
            src: ReadCursor::new(src),
            dst: Raster::new(dst, width, height)?,
            state: RunState::default(),
        })
    }

    /// Decodes runs until the input is exhausted.
    pub(crate) fn decode(mut self) -> Result<(), RleError> {
        while !self.src.eof() {
            let order = OrderHeader::read(&mut self.src)?;
            let run = self.start_run(order)?;
            self.write_run_body(run, order.run_length)?;
        }

        Ok(())
    }

    /// Reads the run operands and updates the carried state before any pixel is written.
    fn start_run(&mut self, order: OrderHeader) -> Result<Run<N>, RleError> {
        let (code, run) = match order.code {
            OrderCode::FILL => {
                if self.state.last_code == Some(OrderCode::FILL) && !self.dst.at_first_row_boundary() {
                    self.state.insert_mix = true;
                }

                (OrderCode::FILL, Run::Fill)
            }
            OrderCode::MIX => (OrderCode::MIX, Run::Mix),
            OrderCode::FILL_OR_MIX => (
                OrderCode::FILL_OR_MIX,
                Run::FillOrMix {
                    mask: MaskSource::Stream,
                },
            ),
            OrderCode::COLOR => (OrderCode::COLOR, Run::Color(self.read_pixel()?)),
            OrderCode::COPY => (OrderCode::COPY, Run::Copy),
            OrderCode::SET_MIX_MIX => {
                self.state.mix = self.read_pixel()?;
                (OrderCode::MIX, Run::Mix)
            }
            OrderCode::SET_MIX_FILL_OR_MIX => {
                self.state.mix = self.read_pixel()?;
                (
                    OrderCode::FILL_OR_MIX,
                    Run::FillOrMix {
                        mask: MaskSource::Stream,
                    },
                )
            }
            OrderCode::BICOLOR => {
                let first = self.read_pixel()?;
                let second = self.read_pixel()?;
                (OrderCode::BICOLOR, Run::Bicolor { first, second })
            }
            OrderCode::FILL_OR_MIX_1 => (
                OrderCode::FILL_OR_MIX,
                Run::FillOrMix {
                    mask: MaskSource::Fixed(MASK_FILL_OR_MIX_1),
                },
            ),
            OrderCode::FILL_OR_MIX_2 => (
                OrderCode::FILL_OR_MIX,
                Run::FillOrMix {
                    mask: MaskSource::Fixed(MASK_FILL_OR_MIX_2),
                },
            ),
            OrderCode::WHITE => (OrderCode::WHITE, Run::White),
            OrderCode::BLACK => (OrderCode::BLACK, Run::Black),
            _ => return Err(RleError::BadOrderCode { code: order.header }),
        };

        self.state.last_code = Some(code);
        self.state.mix_mask = 0;

        Ok(run)
    }

    fn write_run_body(&mut self, run: Run<N>, mut count: usize) -> Result<(), RleError> {
        while count > 0 {
            self.dst.ensure_row()?;

            let pixel = match run {
                Run::Fill => {
                    let above = self.dst.pixel_above();

                    if self.state.insert_mix {
                        self.state.insert_mix = false;
                        above ^ self.state.mix
                    } else {
                        above
                    }
                }
                Run::Mix => self.dst.pixel_above() ^ self.state.mix,
                Run::FillOrMix { mask } => {
                    let above = self.dst.pixel_above();

                    if self.advance_dither_bit(mask)? {
                        above ^ self.state.mix
                    } else {
                        above
                    }
                }
                Run::Color(color) => color,
                Run::Copy => self.read_pixel()?,
                Run::Bicolor { first, second } => {
                    if self.state.bicolor_second {
                        self.state.bicolor_second = false;
                        second
                    } else {
                        // The run length counts pairs: starting a pair adds a pixel.
                        self.state.bicolor_second = true;
                        count += 1;
                        first
                    }
                }
                Run::White => Pixel::WHITE,
                Run::Black => Pixel::BLACK,
            };

            self.dst.write_pixel(pixel);
            count -= 1;
        }

        Ok(())
    }

    /// Moves to the next mask bit and tells whether the current pixel is mixed.
    fn advance_dither_bit(&mut self, mask: MaskSource) -> Result<bool, RleError> {
        self.state.mix_mask <<= 1;

        if self.state.mix_mask == 0 {
            self.state.mask = match mask {
                MaskSource::Fixed(mask) => mask,
                MaskSource::Stream => self.src.try_read_u8()?,
            };
            self.state.mix_mask = 1;
        }

        Ok(self.state.mask & self.state.mix_mask != 0)
    }

    fn read_pixel(&mut self) -> Result<Pixel<N>, RleError> {
        self.src.try_read_array::<N>().map(Pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<const N: usize>(src: &[u8], width: usize, height: usize) -> Result<Vec<u8>, RleError> {
        let mut dst = vec![0; width * height * N];
        RleDecoder::<N>::new(src, &mut dst, width, height)?.decode()?;
        Ok(dst)
    }

    #[test]
    fn white_and_black_orders() {
        assert_eq!(decode::<1>(&[0xFD, 0xFE, 0xFD, 0xFE], 4, 1), Ok(vec![0xFF, 0x00, 0xFF, 0x00]));
        assert_eq!(decode::<3>(&[0xFE, 0xFD], 2, 1), Ok(vec![0, 0, 0, 0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn color_run() {
        assert_eq!(decode::<1>(&[0x64, 0x7A], 4, 1), Ok(vec![0x7A; 4]));
        assert_eq!(
            decode::<2>(&[0xF3, 0x03, 0x00, 0x34, 0x12], 3, 1),
            Ok(vec![0x34, 0x12, 0x34, 0x12, 0x34, 0x12])
        );
    }

    #[test]
    fn copy_run_writes_literal_pixels() {
        assert_eq!(
            decode::<2>(&[0x83, 1, 2, 3, 4, 5, 6], 3, 1),
            Ok(vec![1, 2, 3, 4, 5, 6])
        );
    }

    #[test]
    fn fill_copies_previous_row() {
        // Bottom row first: [0x11, 0x22], then the top row copies it.
        assert_eq!(decode::<1>(&[0x82, 0x11, 0x22, 0x02], 2, 2), Ok(vec![0x11, 0x22, 0x11, 0x22]));
    }

    #[test]
    fn fill_on_first_row_is_black() {
        let mut dst = vec![0xAA; 3];
        RleDecoder::<1>::new(&[0x03], &mut dst, 3, 1)
            .expect("valid dimensions")
            .decode()
            .expect("decode");
        assert_eq!(dst, [0, 0, 0]);
    }

    #[test]
    fn mix_xors_previous_row() {
        // Default mix is white.
        assert_eq!(decode::<1>(&[0x82, 0x11, 0x22, 0x22], 2, 2), Ok(vec![0xEE, 0xDD, 0x11, 0x22]));
        // Set-mix order carries its own mix color.
        assert_eq!(
            decode::<1>(&[0x82, 0x11, 0x22, 0xC2, 0x0F], 2, 2),
            Ok(vec![0x1E, 0x2D, 0x11, 0x22])
        );
        // On the first row the mix color itself is written.
        assert_eq!(decode::<3>(&[0x21], 1, 1), Ok(vec![0xFF; 3]));
    }

    #[test]
    fn consecutive_fills_insert_one_mixed_pixel() {
        assert_eq!(
            decode::<1>(&[0x84, 1, 2, 3, 4, 0x01, 0x03], 4, 2),
            Ok(vec![1, 0xFD, 3, 4, 1, 2, 3, 4])
        );
    }

    #[test]
    fn consecutive_fills_inside_first_row_insert_mix() {
        // The mixed pixel lands on the first row, and the next row copies it.
        assert_eq!(decode::<1>(&[0x02, 0x04], 3, 2), Ok(vec![0, 0, 0xFF, 0, 0, 0xFF]));
    }

    #[test]
    fn consecutive_fills_at_first_row_boundary_do_not_insert_mix() {
        // Second fill starts right after the first row is complete.
        assert_eq!(decode::<1>(&[0x02, 0x02], 2, 2), Ok(vec![0; 4]));
        // Zero-length fill before the very first pixel.
        assert_eq!(decode::<1>(&[0xF0, 0x00, 0x00, 0x02], 2, 1), Ok(vec![0; 2]));
    }

    #[test]
    fn fill_or_mix_reads_mask_from_stream() {
        assert_eq!(
            decode::<1>(&[0x68, 0x10, 0x41, 0b1010_0101], 8, 2),
            Ok(vec![0xEF, 0x10, 0xEF, 0x10, 0x10, 0xEF, 0x10, 0xEF, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10])
        );
    }

    #[test]
    fn fill_or_mix_refreshes_mask_every_eight_pixels() {
        let mut expected = vec![0xFF; 8];
        expected.push(0x00);

        assert_eq!(decode::<1>(&[0x40, 0x08, 0xFF, 0x00], 9, 1), Ok(expected));
        assert_eq!(
            decode::<1>(&[0x40, 0x08, 0xFF], 9, 1),
            Err(RleError::NotEnoughBytes { expected: 1, actual: 0 })
        );
    }

    #[test]
    fn special_fill_or_mix_orders_use_fixed_masks() {
        // Black bottom row, then a zero-length set-mix order to change the mix color.
        let prefix = [0x08, 0xF6, 0x00, 0x00, 0x0F];

        let mut src = prefix.to_vec();
        src.push(0xF9);
        let mut expected = vec![0; 8];
        expected[..3].copy_from_slice(&[0x0F, 0x0F, 0x00]);
        expected.extend([0; 8]);
        assert_eq!(decode::<1>(&src, 8, 2), Ok(expected));

        let mut src = prefix.to_vec();
        src.push(0xFA);
        let mut expected = vec![0; 8];
        expected[..3].copy_from_slice(&[0x0F, 0x00, 0x0F]);
        expected.extend([0; 8]);
        assert_eq!(decode::<1>(&src, 8, 2), Ok(expected));
    }

    #[test]
    fn bicolor_run_length_counts_pairs() {
        assert_eq!(
            decode::<1>(&[0xE3, 0xAA, 0xBB], 6, 1),
            Ok(vec![0xAA, 0xBB, 0xAA, 0xBB, 0xAA, 0xBB])
        );
        assert_eq!(decode::<2>(&[0xE1, 1, 2, 3, 4], 2, 1), Ok(vec![1, 2, 3, 4]));
    }

    #[test]
    fn bicolor_pairs_span_scanlines() {
        assert_eq!(
            decode::<1>(&[0xE3, 0xAA, 0xBB], 3, 2),
            Ok(vec![0xBB, 0xAA, 0xBB, 0xAA, 0xBB, 0xAA])
        );
    }

    #[test]
    fn empty_input_succeeds() {
        assert_eq!(decode::<1>(&[], 4, 0), Ok(vec![]));
        assert_eq!(decode::<2>(&[], 4, 3), Ok(vec![0; 24]));
    }

    #[test]
    fn overflowing_runs_fail() {
        assert_eq!(decode::<1>(&[0x03], 2, 1), Err(RleError::ImageOverflow));
        assert_eq!(decode::<1>(&[0xFD], 2, 0), Err(RleError::ImageOverflow));
    }

    #[test]
    fn truncated_input_fails() {
        assert_eq!(
            decode::<1>(&[0x82, 0x11], 2, 1),
            Err(RleError::NotEnoughBytes { expected: 1, actual: 0 })
        );
        assert_eq!(
            decode::<3>(&[0xE1, 1, 2, 3, 4], 2, 1),
            Err(RleError::NotEnoughBytes { expected: 3, actual: 1 })
        );
    }

    #[test]
    fn unknown_order_codes_fail() {
        assert_eq!(
            decode::<1>(&[0xF5, 0x01, 0x00], 2, 1),
            Err(RleError::BadOrderCode { code: 0xF5 })
        );
        assert_eq!(decode::<1>(&[0xA1], 2, 1), Err(RleError::BadOrderCode { code: 0xA1 }));
        assert_eq!(decode::<1>(&[0xFB], 2, 1), Err(RleError::BadOrderCode { code: 0xFB }));
        assert_eq!(decode::<1>(&[0xFF], 2, 1), Err(RleError::BadOrderCode { code: 0xFF }));
    }

    #[test]
    fn fill_mix_insertion_survives_zero_length_fill() {
        // Second fill has no pixels: the pending mixed pixel goes to the next fill run.
        assert_eq!(
            decode::<1>(&[0x84, 1, 2, 3, 4, 0x01, 0xF0, 0x00, 0x00, 0xFD, 0x02], 4, 2),
            Ok(vec![1, 0xFF, 0xFC, 4, 1, 2, 3, 4])
        );
    }
}
