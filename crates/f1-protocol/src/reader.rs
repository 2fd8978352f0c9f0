//! Cursor-style little-endian reader shared by every decoder.

use crate::error::DecodeError;
use crate::Result;

/// Cursor-style byte reader for little-endian binary data.
///
/// Every read is bounds-checked and advances the cursor only on success.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current offset from the start of the underlying slice.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let data: &'a [u8] = self.data;
        let out_of_bounds = || DecodeError::truncated_input(self.pos, n, self.remaining());
        let end = self.pos.checked_add(n).ok_or_else(out_of_bounds)?;
        let bytes = data.get(self.pos..end).ok_or_else(out_of_bounds)?;
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Split off the next `len` bytes as an independent reader.
    ///
    /// Used to walk fixed-stride arrays: the parent always advances by exactly
    /// `len`, whatever the element decoder consumes.
    pub fn sub(&mut self, len: usize) -> Result<ByteReader<'a>> {
        self.take(len).map(ByteReader::new)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8> {
        self.array::<1>().map(|[b]| b)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8> {
        self.array::<1>().map(i8::from_le_bytes)
    }

    /// A `u8` flag where any non-zero value is true.
    #[inline]
    pub fn flag(&mut self) -> Result<bool> {
        self.u8().map(|v| v != 0)
    }

    #[inline]
    pub fn u16_le(&mut self) -> Result<u16> {
        self.array().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn i16_le(&mut self) -> Result<i16> {
        self.array().map(i16::from_le_bytes)
    }

    #[inline]
    pub fn u32_le(&mut self) -> Result<u32> {
        self.array().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn u64_le(&mut self) -> Result<u64> {
        self.array().map(u64::from_le_bytes)
    }

    /// Non-finite values are replaced with `0.0`.
    #[inline]
    pub fn f32_le(&mut self) -> Result<f32> {
        self.array()
            .map(f32::from_le_bytes)
            .map(|v| if v.is_finite() { v } else { 0.0 })
    }

    /// Non-finite values are replaced with `0.0`.
    #[inline]
    pub fn f64_le(&mut self) -> Result<f64> {
        self.array()
            .map(f64::from_le_bytes)
            .map(|v| if v.is_finite() { v } else { 0.0 })
    }

    pub fn u8_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.array()
    }

    pub fn u16_le_array<const N: usize>(&mut self) -> Result<[u16; N]> {
        let mut arr = [0u16; N];
        for item in arr.iter_mut() {
            *item = self.u16_le()?;
        }
        Ok(arr)
    }

    pub fn i16_le_array<const N: usize>(&mut self) -> Result<[i16; N]> {
        let mut arr = [0i16; N];
        for item in arr.iter_mut() {
            *item = self.i16_le()?;
        }
        Ok(arr)
    }

    pub fn f32_le_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut arr = [0.0f32; N];
        for item in arr.iter_mut() {
            *item = self.f32_le()?;
        }
        Ok(arr)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }
}

/// Read `N` elements, each from its own `stride`-byte window.
pub(crate) fn read_strided<T, const N: usize>(
    r: &mut ByteReader<'_>,
    stride: usize,
    mut decode_one: impl FnMut(&mut ByteReader<'_>) -> Result<T>,
) -> Result<[T; N]> {
    let mut items = Vec::with_capacity(N);
    for _ in 0..N {
        let mut element = r.sub(stride)?;
        items.push(decode_one(&mut element)?);
    }
    let offset = r.position();
    items
        .try_into()
        .map_err(|_unfilled: Vec<T>| DecodeError::truncated_input(offset, stride, r.remaining()))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn byte_reader_u16_le() -> TestResult {
        let data = [0x34, 0x12];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.u16_le()?, 0x1234);
        assert_eq!(r.remaining(), 0);
        Ok(())
    }

    #[test]
    fn byte_reader_out_of_bounds_reports_offset() -> TestResult {
        let data = [0u8; 3];
        let mut r = ByteReader::new(&data);
        r.u8()?;
        let err = r.u32_le().err().ok_or("expected a truncation error")?;
        assert_eq!(err, DecodeError::truncated_input(1, 4, 2));
        assert_eq!(r.position(), 1, "failed read must not advance");
        Ok(())
    }

    #[test]
    fn byte_reader_f32_le_round_trip() -> TestResult {
        let bytes = 83.456f32.to_le_bytes();
        let mut r = ByteReader::new(&bytes);
        assert!((r.f32_le()? - 83.456).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn byte_reader_non_finite_float_becomes_zero() -> TestResult {
        let bytes = f32::NAN.to_le_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.f32_le()?.to_bits(), 0.0f32.to_bits());
        Ok(())
    }

    #[test]
    fn byte_reader_signed_values() -> TestResult {
        let data = [0xFF, 0xFE, 0xFF];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.i8()?, -1);
        assert_eq!(r.i16_le()?, -2);
        Ok(())
    }

    #[test]
    fn sub_reader_advances_by_full_stride() -> TestResult {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut r = ByteReader::new(&data);
        let mut first = r.sub(4)?;
        assert_eq!(first.u8()?, 1);
        assert_eq!(r.position(), 4);
        assert_eq!(r.u8()?, 5);
        Ok(())
    }

    #[test]
    fn read_strided_ignores_unread_element_tail() -> TestResult {
        let data = [1u8, 0xAA, 2, 0xBB, 3, 0xCC];
        let mut r = ByteReader::new(&data);
        let values: [u8; 3] = read_strided(&mut r, 2, |e| e.u8())?;
        assert_eq!(values, [1, 2, 3]);
        Ok(())
    }
}
