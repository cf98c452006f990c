//! Destinations of decoded values.
//!
//! Decoders copy raw fixed-width values without interpreting them.
//! [`FixedColumn`] is a growable column used by vectorized scans.
//! [`ColumnBlockView`] is a window over a pre-allocated block, which
//! is filled from front to back.

use colseg_datatype::FixedWidthType;

/// Growable column of fixed-width values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedColumn {
    width: usize,
    data: Vec<u8>,
}

impl FixedColumn {
    #[inline]
    pub fn new(width: usize) -> Self {
        debug_assert!(width > 0);
        FixedColumn {
            width,
            data: vec![],
        }
    }

    #[inline]
    pub fn with_capacity(width: usize, rows: usize) -> Self {
        debug_assert!(width > 0);
        FixedColumn {
            width,
            data: Vec::with_capacity(width * rows),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.width
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns encoded value at given position.
    #[inline]
    pub fn value(&self, idx: usize) -> Option<&[u8]> {
        let start_idx = idx * self.width;
        self.data.get(start_idx..start_idx + self.width)
    }

    /// Append encoded values and returns number of appended values.
    /// Input must consist of whole values.
    #[inline]
    pub fn append_numbers(&mut self, raw: &[u8]) -> usize {
        debug_assert!(raw.len() % self.width == 0);
        self.data.extend_from_slice(raw);
        raw.len() / self.width
    }

    /// Append native numbers whose in-memory layout equals the
    /// encoded layout, e.g. `i32` of `Int` on little-endian platform.
    #[inline]
    pub fn append_pod<T: bytemuck::NoUninit>(&mut self, vals: &[T]) -> usize {
        debug_assert_eq!(std::mem::size_of::<T>(), self.width);
        self.append_numbers(bytemuck::cast_slice(vals))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Decode all values with given type.
    #[inline]
    pub fn values<T: FixedWidthType>(&self, ty: &T) -> Vec<T::Native> {
        debug_assert_eq!(ty.width(), self.width);
        self.data
            .chunks_exact(self.width)
            .map(|raw| ty.decode(raw))
            .collect()
    }
}

/// Window over a pre-allocated block of fixed-width values.
pub struct ColumnBlockView<'a> {
    data: &'a mut [u8],
    width: usize,
    row_idx: usize,
}

impl<'a> ColumnBlockView<'a> {
    #[inline]
    pub fn new(data: &'a mut [u8], width: usize) -> Self {
        debug_assert!(width > 0);
        ColumnBlockView {
            data,
            width,
            row_idx: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns number of values already written.
    #[inline]
    pub fn position(&self) -> usize {
        self.row_idx
    }

    /// Returns number of values which can still be written.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() / self.width - self.row_idx
    }

    /// Returns the unwritten part of the block.
    #[inline]
    pub fn data(&mut self) -> &mut [u8] {
        &mut self.data[self.row_idx * self.width..]
    }

    /// Mark `rows` values as written.
    #[inline]
    pub fn advance(&mut self, rows: usize) {
        debug_assert!(rows <= self.remaining());
        self.row_idx += rows;
    }

    /// Returns all written values.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.data[..self.row_idx * self.width]
    }
}
