use crate::RleError;

macro_rules! ensure_enough_bytes {
    (in: $buf:ident, size: $expected:expr) => {{
        let actual = $buf.len();
        let expected = $expected;
        if expected > actual {
            return Err(RleError::NotEnoughBytes { expected, actual });
        }
    }};
}

/// A bounds-checked cursor over the compressed input stream.
///
/// Every read checks the remaining length first and reports
/// [`RleError::NotEnoughBytes`] instead of panicking.
#[derive(Clone, Debug)]
pub(crate) struct ReadCursor<'a> {
    inner: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    pub(crate) const fn new(bytes: &'a [u8]) -> Self {
        Self { inner: bytes, pos: 0 }
    }

    /// Returns the number of bytes remaining.
    pub(crate) const fn len(&self) -> usize {
        self.inner.len() - self.pos
    }

    pub(crate) const fn eof(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn try_read_array<const N: usize>(&mut self) -> Result<[u8; N], RleError> {
        ensure_enough_bytes!(in: self, size: N);

        let mut bytes = [0; N];
        bytes.copy_from_slice(&self.inner[self.pos..self.pos + N]);
        self.pos += N;

        Ok(bytes)
    }

    pub(crate) fn try_read_u8(&mut self) -> Result<u8, RleError> {
        let [byte] = self.try_read_array::<1>()?;
        Ok(byte)
    }

    pub(crate) fn try_read_u16(&mut self) -> Result<u16, RleError> {
        self.try_read_array::<2>().map(u16::from_le_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_position() {
        let mut cursor = ReadCursor::new(&[0x01, 0x34, 0x12, 0xAA, 0xBB, 0xCC]);

        assert_eq!(cursor.try_read_u8(), Ok(0x01));
        assert_eq!(cursor.try_read_u16(), Ok(0x1234));
        assert_eq!(cursor.try_read_array::<3>(), Ok([0xAA, 0xBB, 0xCC]));
        assert!(cursor.eof());
    }

    #[test]
    fn short_read_leaves_cursor_untouched() {
        let mut cursor = ReadCursor::new(&[0x01]);

        assert_eq!(
            cursor.try_read_u16(),
            Err(RleError::NotEnoughBytes { expected: 2, actual: 1 })
        );
        assert_eq!(cursor.len(), 1);
        assert_eq!(cursor.try_read_u8(), Ok(0x01));
        assert_eq!(
            cursor.try_read_u8(),
            Err(RleError::NotEnoughBytes { expected: 1, actual: 0 })
        );
    }
}
