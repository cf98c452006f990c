//! Zone map of a page.
//!
//! Zone map keeps min and max value of a page, so that reader can
//! skip pages which can not contain the values it looks for.

use crate::error::Result;
use crate::page::{PageBuilder, PageDecoder, PlainPageDecoder};
use colseg_datatype::FixedWidthType;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMap {
    min: Vec<u8>,
    max: Vec<u8>,
}

impl ZoneMap {
    #[inline]
    pub fn new(min: Vec<u8>, max: Vec<u8>) -> Self {
        debug_assert_eq!(min.len(), max.len());
        ZoneMap { min, max }
    }

    /// Build zone map from first and last value of a sealed page.
    /// The page must be sorted. Returns None if page is empty.
    pub fn from_sorted_builder<B: PageBuilder + ?Sized>(
        builder: &B,
        width: usize,
    ) -> Result<Option<Self>> {
        let mut min = vec![0u8; width];
        match builder.get_first_value(&mut min) {
            Ok(()) => (),
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        }
        let mut max = vec![0u8; width];
        builder.get_last_value(&mut max)?;
        Ok(Some(ZoneMap { min, max }))
    }

    /// Build zone map by scanning all values of a parsed page.
    /// Returns None if page is empty.
    pub fn from_decoder<T: FixedWidthType>(decoder: &PlainPageDecoder<'_, T>) -> Option<Self> {
        let ty = decoder.ty();
        let mut min = decoder.value_at(0)?;
        let mut max = min;
        for idx in 1..decoder.count() {
            let v = decoder.value_at(idx)?;
            if ty.cmp_raw(v, min) == Ordering::Less {
                min = v;
            } else if ty.cmp_raw(v, max) == Ordering::Greater {
                max = v;
            }
        }
        Some(ZoneMap {
            min: min.to_vec(),
            max: max.to_vec(),
        })
    }

    #[inline]
    pub fn min(&self) -> &[u8] {
        &self.min
    }

    #[inline]
    pub fn max(&self) -> &[u8] {
        &self.max
    }

    /// Returns false if the value is surely not in the page.
    #[inline]
    pub fn may_contain<T: FixedWidthType>(&self, ty: &T, value: &[u8]) -> bool {
        ty.cmp_raw(value, &self.min) != Ordering::Less
            && ty.cmp_raw(value, &self.max) != Ordering::Greater
    }

    /// Returns false if no value in `[lower, upper]` is in the page.
    #[inline]
    pub fn may_overlap<T: FixedWidthType>(&self, ty: &T, lower: &[u8], upper: &[u8]) -> bool {
        ty.cmp_raw(lower, &self.max) != Ordering::Greater
            && ty.cmp_raw(upper, &self.min) != Ordering::Less
    }
}
