//! Serialization of fixed layout page headers.
//!
//! All multi-byte integers are little-endian, independent of
//! the platform which writes the page.

use crate::error::{Error, Result};
use std::mem;

pub trait Serde {
    /// Serialize a u32 value to a byte slice.
    fn ser_u32(&mut self, idx: usize, val: u32) -> usize;

    /// Deserialize a u32 value from a byte slice.
    fn deser_u32(&self, idx: usize) -> Result<(usize, u32)>;
}

impl Serde for [u8] {
    #[inline]
    fn ser_u32(&mut self, idx: usize, val: u32) -> usize {
        debug_assert!(idx + mem::size_of::<u32>() <= self.len());
        self[idx..idx + mem::size_of::<u32>()].copy_from_slice(&val.to_le_bytes());
        idx + mem::size_of::<u32>()
    }

    #[inline]
    fn deser_u32(&self, idx: usize) -> Result<(usize, u32)> {
        let end_idx = idx
            .checked_add(mem::size_of::<u32>())
            .ok_or(Error::InvalidFormat)?;
        let bytes = self.get(idx..end_idx).ok_or(Error::InvalidFormat)?;
        let val = u32::from_le_bytes(bytes.try_into()?);
        Ok((end_idx, val))
    }
}

/// Defines how to serialize self to bytes.
///
/// This trait is designed to write a serialized object with a known
/// size to a fixed-sized buffer.
pub trait Ser {
    /// length of serialized bytes.
    fn ser_len(&self) -> usize;

    /// Serialize object into fix-sized byte slice.
    /// The buffer is guaranteed to be big enough.
    fn ser<S: Serde + ?Sized>(&self, out: &mut S, start_idx: usize) -> usize;
}

/// Defines how to deserialize objects from bytes.
pub trait Deser: Sized {
    /// Deserialize objects from input.
    fn deser<S: Serde + ?Sized>(input: &S, start_idx: usize) -> Result<(usize, Self)>;
}

impl Ser for u32 {
    #[inline]
    fn ser_len(&self) -> usize {
        mem::size_of::<u32>()
    }

    #[inline]
    fn ser<S: Serde + ?Sized>(&self, out: &mut S, start_idx: usize) -> usize {
        out.ser_u32(start_idx, *self)
    }
}

impl Deser for u32 {
    #[inline]
    fn deser<S: Serde + ?Sized>(input: &S, start_idx: usize) -> Result<(usize, Self)> {
        input.deser_u32(start_idx)
    }
}
