//! Compression order header resolution.
//!
//! The first byte of every order selects one of three encodings:
//!
//! - general orders (`0x00..=0xBF`): the top three bits carry the order code,
//!   the low five bits the run length;
//! - short orders (`0xC0..=0xEF`): the high nibble carries the order code,
//!   the low nibble the run length;
//! - extended orders (`0xF0..=0xFF`): the low nibble carries the order code,
//!   followed by a 16-bit run length for codes below `0x9`.

use core::fmt;

use crate::cursor::ReadCursor;
use crate::RleError;

const MASK_GENERAL_RUN_LENGTH: u8 = 0x1F;
const MASK_SHORT_RUN_LENGTH: u8 = 0x0F;

/// Extra length added to an escaped (zero) general run length.
const GENERAL_LENGTH_OFFSET: usize = 32;

/// Extra length added to an escaped (zero) short run length.
const SHORT_LENGTH_OFFSET: usize = 16;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct OrderCode(u8);

impl fmt::Debug for OrderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::FILL => "FILL",
            Self::MIX => "MIX",
            Self::FILL_OR_MIX => "FILL_OR_MIX",
            Self::COLOR => "COLOR",
            Self::COPY => "COPY",
            Self::SET_MIX_MIX => "SET_MIX_MIX",
            Self::SET_MIX_FILL_OR_MIX => "SET_MIX_FILL_OR_MIX",
            Self::BICOLOR => "BICOLOR",
            Self::FILL_OR_MIX_1 => "FILL_OR_MIX_1",
            Self::FILL_OR_MIX_2 => "FILL_OR_MIX_2",
            Self::WHITE => "WHITE",
            Self::BLACK => "BLACK",
            _ => "UNKNOWN",
        };

        write!(f, "OrderCode(0x{:X}-{name})", self.0)
    }
}

impl OrderCode {
    pub(crate) const FILL: OrderCode = OrderCode(0x0);
    pub(crate) const MIX: OrderCode = OrderCode(0x1);
    pub(crate) const FILL_OR_MIX: OrderCode = OrderCode(0x2);
    pub(crate) const COLOR: OrderCode = OrderCode(0x3);
    pub(crate) const COPY: OrderCode = OrderCode(0x4);
    pub(crate) const SET_MIX_MIX: OrderCode = OrderCode(0x6);
    pub(crate) const SET_MIX_FILL_OR_MIX: OrderCode = OrderCode(0x7);
    pub(crate) const BICOLOR: OrderCode = OrderCode(0x8);
    pub(crate) const FILL_OR_MIX_1: OrderCode = OrderCode(0x9);
    pub(crate) const FILL_OR_MIX_2: OrderCode = OrderCode(0xA);
    pub(crate) const WHITE: OrderCode = OrderCode(0xD);
    pub(crate) const BLACK: OrderCode = OrderCode(0xE);

    /// Fill-or-mix lengths are stored divided by 8, except when escaped.
    fn is_fill_or_mix(self) -> bool {
        self == Self::FILL_OR_MIX || self == Self::SET_MIX_FILL_OR_MIX
    }
}

/// Order code and run length of a compression order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OrderHeader {
    /// Raw first byte, kept for error reporting.
    pub(crate) header: u8,
    pub(crate) code: OrderCode,
    pub(crate) run_length: usize,
}

impl OrderHeader {
    pub(crate) fn read(src: &mut ReadCursor<'_>) -> Result<Self, RleError> {
        let header = src.try_read_u8()?;

        let (code, run_length, length_offset) = match header >> 4 {
            0xC..=0xE => (
                OrderCode((header >> 4) - 6),
                usize::from(header & MASK_SHORT_RUN_LENGTH),
                SHORT_LENGTH_OFFSET,
            ),
            0xF => {
                let code = OrderCode(header & 0x0F);

                let run_length = if code.0 < 0x9 {
                    usize::from(src.try_read_u16()?)
                } else if code.0 < 0xB {
                    8
                } else {
                    1
                };

                return Ok(Self {
                    header,
                    code,
                    run_length,
                });
            }
            top => (
                OrderCode(top >> 1),
                usize::from(header & MASK_GENERAL_RUN_LENGTH),
                GENERAL_LENGTH_OFFSET,
            ),
        };

        let run_length = match run_length {
            0 if code.is_fill_or_mix() => usize::from(src.try_read_u8()?) + 1,
            0 => usize::from(src.try_read_u8()?) + length_offset,
            run_length if code.is_fill_or_mix() => run_length * 8,
            run_length => run_length,
        };

        Ok(Self {
            header,
            code,
            run_length,
        })
    }
}
