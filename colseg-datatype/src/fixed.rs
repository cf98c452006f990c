//! Fixed-width type descriptors.
//!
//! A descriptor tells the storage layer how many bytes a single value
//! occupies and how two encoded values are ordered. Page codecs are
//! generic over the descriptor, so width and comparison are resolved
//! at compile time for every supported type.
//!
//! Numeric values are stored in little-endian order: two's complement
//! for integers and decimals, IEEE-754 for floating-point numbers.

use crate::field_type::FieldType;
use std::cmp::Ordering;
use std::fmt;
use std::mem;

/// Capability interface of a fixed-width type.
pub trait FixedWidthType: Clone + Send + Sync + 'static {
    /// Semantic type described.
    const FIELD_TYPE: FieldType;

    /// In-memory representation of a value.
    type Native: Clone + PartialEq + fmt::Debug;

    /// Encoded length of each value.
    fn width(&self) -> usize;

    /// Compare two encoded values.
    /// Both inputs must contain at least `width()` bytes.
    fn cmp_raw(&self, lhs: &[u8], rhs: &[u8]) -> Ordering;

    /// Append encoded value to the end of buffer.
    fn encode_to(&self, value: &Self::Native, buf: &mut Vec<u8>);

    /// Decode value from the first `width()` bytes of input.
    fn decode(&self, raw: &[u8]) -> Self::Native;

    /// Encode single value into a new buffer.
    #[inline]
    fn encode(&self, value: &Self::Native) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.width());
        self.encode_to(value, &mut buf);
        buf
    }
}

#[inline(always)]
fn le_array<const N: usize>(raw: &[u8]) -> [u8; N] {
    let mut res = [0u8; N];
    res.copy_from_slice(&raw[..N]);
    res
}

macro_rules! impl_fixed_int {
    ($($name:ident => $native:ty, $field_type:expr);* $(;)?) => {
        $(
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $name;

            impl FixedWidthType for $name {
                const FIELD_TYPE: FieldType = $field_type;
                type Native = $native;

                #[inline(always)]
                fn width(&self) -> usize {
                    mem::size_of::<$native>()
                }

                #[inline(always)]
                fn cmp_raw(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
                    self.decode(lhs).cmp(&self.decode(rhs))
                }

                #[inline(always)]
                fn encode_to(&self, value: &$native, buf: &mut Vec<u8>) {
                    buf.extend_from_slice(&value.to_le_bytes());
                }

                #[inline(always)]
                fn decode(&self, raw: &[u8]) -> $native {
                    <$native>::from_le_bytes(le_array(raw))
                }
            }
        )*
    }
}

impl_fixed_int! {
    TinyInt => i8, FieldType::TinyInt;
    SmallInt => i16, FieldType::SmallInt;
    Int => i32, FieldType::Int;
    BigInt => i64, FieldType::BigInt;
    LargeInt => i128, FieldType::LargeInt;
    Decimal32 => i32, FieldType::Decimal32;
    Decimal64 => i64, FieldType::Decimal64;
    Decimal128 => i128, FieldType::Decimal128;
    // Day number of the date.
    Date => i32, FieldType::Date;
    // Microseconds of the timestamp.
    Datetime => i64, FieldType::Datetime;
}

// NaN compares equal to any value, same as the comparison
// used by the computing layer.
macro_rules! impl_fixed_float {
    ($($name:ident => $native:ty, $field_type:expr);* $(;)?) => {
        $(
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $name;

            impl FixedWidthType for $name {
                const FIELD_TYPE: FieldType = $field_type;
                type Native = $native;

                #[inline(always)]
                fn width(&self) -> usize {
                    mem::size_of::<$native>()
                }

                #[inline(always)]
                fn cmp_raw(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
                    self.decode(lhs)
                        .partial_cmp(&self.decode(rhs))
                        .unwrap_or(Ordering::Equal)
                }

                #[inline(always)]
                fn encode_to(&self, value: &$native, buf: &mut Vec<u8>) {
                    buf.extend_from_slice(&value.to_le_bytes());
                }

                #[inline(always)]
                fn decode(&self, raw: &[u8]) -> $native {
                    <$native>::from_le_bytes(le_array(raw))
                }
            }
        )*
    }
}

impl_fixed_float! {
    Float => f32, FieldType::Float;
    Double => f64, FieldType::Double;
}

/// Boolean is stored as one byte, 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

impl FixedWidthType for Boolean {
    const FIELD_TYPE: FieldType = FieldType::Boolean;
    type Native = bool;

    #[inline(always)]
    fn width(&self) -> usize {
        1
    }

    #[inline(always)]
    fn cmp_raw(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
        lhs[0].cmp(&rhs[0])
    }

    #[inline(always)]
    fn encode_to(&self, value: &bool, buf: &mut Vec<u8>) {
        buf.push(*value as u8);
    }

    #[inline(always)]
    fn decode(&self, raw: &[u8]) -> bool {
        raw[0] != 0
    }
}

/// Fixed-length character type.
/// Shorter values are padded with zero bytes, longer values
/// are truncated. Comparison is byte-wise.
/// Length must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Char {
    len: usize,
}

impl Char {
    #[inline]
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "char length must be positive");
        Char { len }
    }
}

impl FixedWidthType for Char {
    const FIELD_TYPE: FieldType = FieldType::Char;
    type Native = Vec<u8>;

    #[inline(always)]
    fn width(&self) -> usize {
        self.len
    }

    #[inline(always)]
    fn cmp_raw(&self, lhs: &[u8], rhs: &[u8]) -> Ordering {
        lhs[..self.len].cmp(&rhs[..self.len])
    }

    #[inline]
    fn encode_to(&self, value: &Vec<u8>, buf: &mut Vec<u8>) {
        let n = value.len().min(self.len);
        buf.extend_from_slice(&value[..n]);
        buf.resize(buf.len() + self.len - n, 0);
    }

    #[inline]
    fn decode(&self, raw: &[u8]) -> Vec<u8> {
        raw[..self.len].to_vec()
    }
}
