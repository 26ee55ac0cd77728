//! Bounds-checked little-endian cursor over a datagram.

use crate::{Result, TelemetryError};

/// Cursor-style reader for little-endian binary data.
///
/// Every read checks the remaining length first and fails with
/// [`TelemetryError::TruncatedInput`] instead of panicking.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    context: &'static str,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, context: "binary field" }
    }

    /// Reader whose errors name the structure being decoded.
    pub fn with_context(data: &'a [u8], context: &'static str) -> Self {
        Self { data, pos: 0, context }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.pos.checked_add(N).filter(|&end| end <= self.data.len()).ok_or_else(|| {
            TelemetryError::truncated(self.context, self.pos.saturating_add(N), self.data.len())
        })?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(bytes)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8> {
        self.take::<1>().map(|[b]| b)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8> {
        self.take::<1>().map(i8::from_le_bytes)
    }

    #[inline]
    pub fn u16(&mut self) -> Result<u16> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn i16(&mut self) -> Result<i16> {
        self.take::<2>().map(i16::from_le_bytes)
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn u64(&mut self) -> Result<u64> {
        self.take::<8>().map(u64::from_le_bytes)
    }

    /// Raw IEEE-754 value; NaN and infinities pass through untouched.
    #[inline]
    pub fn f32(&mut self) -> Result<f32> {
        self.take::<4>().map(f32::from_le_bytes)
    }

    pub fn u8_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.take::<N>()
    }

    pub fn u16_array<const N: usize>(&mut self) -> Result<[u16; N]> {
        let mut arr = [0u16; N];
        for item in arr.iter_mut() {
            *item = self.u16()?;
        }
        Ok(arr)
    }

    pub fn f32_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut arr = [0.0f32; N];
        for item in arr.iter_mut() {
            *item = self.f32()?;
        }
        Ok(arr)
    }
}
