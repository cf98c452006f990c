//! Plain encoding of fixed-width values.
//!
//! Values are stored as is, one after another, so any value can be
//! accessed by its position without decoding the whole page.
//!
//! ```text
//! |-------------------------|-----------|
//! | field                   | length(B) |
//! |-------------------------|-----------|
//! | count                   | 4         |
//! | values                  | count * W |
//! |-------------------------|-----------|
//! ```
//!
//! `count` is little-endian. `W` is the width of the column type,
//! which is not stored in the page: reader must use the same type
//! as writer. There is no padding and no checksum.

use crate::column::{ColumnBlockView, FixedColumn};
use crate::error::{Error, Result};
use crate::page::options::{PAGE_BUFFER_SLOP, PageBuilderOptions, PageDecoderOptions};
use crate::page::{EncodingKind, PageBuilder, PageDecoder};
use crate::range::SparseRange;
use crate::serde::{Deser, Ser, Serde};
use colseg_datatype::FixedWidthType;
use std::cmp::Ordering;
use std::mem;

pub const PLAIN_PAGE_HEADER_SIZE: usize = mem::size_of::<u32>();

/// Header of plain page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainPageHeader {
    count: u32,
}

impl PlainPageHeader {
    #[inline]
    pub fn new(count: u32) -> Self {
        PlainPageHeader { count }
    }

    /// Number of values in the page.
    #[inline]
    pub fn count(&self) -> usize {
        self.count as usize
    }
}

impl Ser for PlainPageHeader {
    #[inline]
    fn ser_len(&self) -> usize {
        PLAIN_PAGE_HEADER_SIZE
    }

    #[inline]
    fn ser<S: Serde + ?Sized>(&self, out: &mut S, start_idx: usize) -> usize {
        self.count.ser(out, start_idx)
    }
}

impl Deser for PlainPageHeader {
    #[inline]
    fn deser<S: Serde + ?Sized>(input: &S, start_idx: usize) -> Result<(usize, Self)> {
        let (idx, count) = u32::deser(input, start_idx)?;
        Ok((idx, PlainPageHeader { count }))
    }
}

/// Builder of plain page.
///
/// The buffer always starts with space reserved for the header,
/// which is filled in `finish()`.
pub struct PlainPageBuilder<T: FixedWidthType> {
    ty: T,
    page_size: usize,
    buffer: Vec<u8>,
    count: usize,
    max_count: usize,
    sealed: bool,
    first_value: Vec<u8>,
    last_value: Vec<u8>,
}

impl<T: FixedWidthType> PlainPageBuilder<T> {
    #[inline]
    pub fn new(ty: T, options: PageBuilderOptions) -> Self {
        let page_size = options.page_size();
        let max_count = page_size / ty.width();
        let mut builder = PlainPageBuilder {
            ty,
            page_size,
            buffer: Vec::with_capacity(page_size + PAGE_BUFFER_SLOP),
            count: 0,
            max_count,
            sealed: false,
            first_value: vec![],
            last_value: vec![],
        };
        builder.reset();
        builder
    }

    #[inline]
    pub fn ty(&self) -> &T {
        &self.ty
    }

    /// Encode and add values to the page.
    /// Same as `add()` but accepts in-memory values.
    #[inline]
    pub fn add_values(&mut self, vals: &[T::Native]) -> usize {
        debug_assert!(!self.sealed);
        if self.is_page_full() {
            return 0;
        }
        let to_add = (self.max_count - self.count).min(vals.len());
        for v in &vals[..to_add] {
            self.ty.encode_to(v, &mut self.buffer);
        }
        self.count += to_add;
        to_add
    }

    #[inline]
    fn copy_sealed_value(&self, src: &[u8], value: &mut [u8]) -> Result<()> {
        if self.count == 0 {
            return Err(Error::NotFound("page is empty"));
        }
        if !self.sealed {
            return Err(Error::InvalidState);
        }
        let width = self.ty.width();
        if value.len() < width {
            return Err(Error::InvalidArgument);
        }
        value[..width].copy_from_slice(src);
        Ok(())
    }
}

impl<T: FixedWidthType> PageBuilder for PlainPageBuilder<T> {
    #[inline]
    fn encoding_kind(&self) -> EncodingKind {
        EncodingKind::Plain
    }

    #[inline]
    fn is_page_full(&self) -> bool {
        self.buffer.len() > self.page_size
    }

    #[inline]
    fn add(&mut self, vals: &[u8]) -> usize {
        debug_assert!(!self.sealed, "add() on sealed page");
        let width = self.ty.width();
        debug_assert!(vals.len() % width == 0);
        if self.is_page_full() {
            return 0;
        }
        let to_add = (self.max_count - self.count).min(vals.len() / width);
        self.buffer.extend_from_slice(&vals[..to_add * width]);
        self.count += to_add;
        to_add
    }

    #[inline]
    fn finish(&mut self) -> &[u8] {
        debug_assert!(self.count <= u32::MAX as usize);
        let header = PlainPageHeader::new(self.count as u32);
        let idx = header.ser(&mut self.buffer[..], 0);
        debug_assert_eq!(idx, header.ser_len());
        if self.count > 0 {
            let width = self.ty.width();
            let last_idx = PLAIN_PAGE_HEADER_SIZE + (self.count - 1) * width;
            self.first_value.clear();
            self.first_value
                .extend_from_slice(&self.buffer[PLAIN_PAGE_HEADER_SIZE..PLAIN_PAGE_HEADER_SIZE + width]);
            self.last_value.clear();
            self.last_value
                .extend_from_slice(&self.buffer[last_idx..last_idx + width]);
        }
        self.sealed = true;
        log::trace!(
            "plain page sealed: count={}, size={}, page_size={}",
            self.count,
            self.buffer.len(),
            self.page_size
        );
        &self.buffer
    }

    #[inline]
    fn reset(&mut self) {
        self.count = 0;
        self.sealed = false;
        self.first_value.clear();
        self.last_value.clear();
        self.buffer.clear();
        self.buffer.reserve(self.page_size + PAGE_BUFFER_SLOP);
        self.buffer.resize(PLAIN_PAGE_HEADER_SIZE, 0);
    }

    #[inline]
    fn count(&self) -> usize {
        self.count
    }

    #[inline]
    fn size(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    fn get_first_value(&self, value: &mut [u8]) -> Result<()> {
        self.copy_sealed_value(&self.first_value, value)
    }

    #[inline]
    fn get_last_value(&self, value: &mut [u8]) -> Result<()> {
        self.copy_sealed_value(&self.last_value, value)
    }
}

/// Decoder of plain page.
///
/// The decoder borrows page bytes owned by caller, e.g. a cached
/// block of segment file.
pub struct PlainPageDecoder<'a, T: FixedWidthType> {
    ty: T,
    data: &'a [u8],
    options: PageDecoderOptions,
    parsed: bool,
    num_elems: usize,
    cur_idx: usize,
}

impl<'a, T: FixedWidthType> PlainPageDecoder<'a, T> {
    #[inline]
    pub fn new(ty: T, data: &'a [u8], options: PageDecoderOptions) -> Self {
        PlainPageDecoder {
            ty,
            data,
            options,
            parsed: false,
            num_elems: 0,
            cur_idx: 0,
        }
    }

    #[inline]
    pub fn ty(&self) -> &T {
        &self.ty
    }

    #[inline]
    pub fn options(&self) -> &PageDecoderOptions {
        &self.options
    }

    /// Returns encoded value at given position.
    #[inline]
    pub fn value_at(&self, idx: usize) -> Option<&'a [u8]> {
        self.check_parsed();
        if idx < self.num_elems {
            Some(self.value_slice(idx))
        } else {
            None
        }
    }

    /// Copy value at position 0 to output.
    #[inline]
    pub fn get_first_value(&self, value: &mut [u8]) -> Result<()> {
        self.check_parsed();
        if self.num_elems == 0 {
            return Err(Error::NotFound("page is empty"));
        }
        self.copy_value(0, value)
    }

    /// Copy value at position count()-1 to output.
    #[inline]
    pub fn get_last_value(&self, value: &mut [u8]) -> Result<()> {
        self.check_parsed();
        if self.num_elems == 0 {
            return Err(Error::NotFound("page is empty"));
        }
        self.copy_value(self.num_elems - 1, value)
    }

    #[inline]
    fn copy_value(&self, idx: usize, value: &mut [u8]) -> Result<()> {
        let width = self.ty.width();
        if value.len() < width {
            return Err(Error::InvalidArgument);
        }
        value[..width].copy_from_slice(self.value_slice(idx));
        Ok(())
    }

    #[inline(always)]
    fn value_slice(&self, idx: usize) -> &'a [u8] {
        let width = self.ty.width();
        let start_idx = PLAIN_PAGE_HEADER_SIZE + idx * width;
        &self.data[start_idx..start_idx + width]
    }

    #[inline(always)]
    fn values_slice(&self, idx: usize, n: usize) -> &'a [u8] {
        let width = self.ty.width();
        let start_idx = PLAIN_PAGE_HEADER_SIZE + idx * width;
        &self.data[start_idx..start_idx + n * width]
    }

    #[inline(always)]
    fn check_parsed(&self) {
        assert!(self.parsed, "must call init() first");
    }
}

impl<'a, T: FixedWidthType> PageDecoder for PlainPageDecoder<'a, T> {
    fn init(&mut self) -> Result<()> {
        assert!(!self.parsed, "page already parsed");
        if self.data.len() < PLAIN_PAGE_HEADER_SIZE {
            log::debug!("plain page too short: size={}", self.data.len());
            return Err(Error::Corruption(format!(
                "not enough bytes for header of plain page: data size {}, header size {}",
                self.data.len(),
                PLAIN_PAGE_HEADER_SIZE
            )));
        }
        let (_, header) = PlainPageHeader::deser(self.data, 0)?;
        let num_elems = header.count();
        let width = self.ty.width();
        let expected = num_elems
            .checked_mul(width)
            .and_then(|len| len.checked_add(PLAIN_PAGE_HEADER_SIZE));
        if expected != Some(self.data.len()) {
            log::debug!(
                "plain page size mismatch: count={}, width={}, size={}",
                num_elems,
                width,
                self.data.len()
            );
            return Err(Error::Corruption(format!(
                "unexpected size of plain page: count {}, width {}, expected size {}, actual size {}",
                num_elems,
                width,
                expected.map_or_else(|| String::from("overflow"), |len| len.to_string()),
                self.data.len()
            )));
        }
        self.num_elems = num_elems;
        self.parsed = true;
        self.seek_to_position_in_page(0)
    }

    #[inline]
    fn seek_to_position_in_page(&mut self, pos: usize) -> Result<()> {
        self.check_parsed();
        if pos > self.num_elems {
            return Err(Error::InvalidPosition {
                pos,
                count: self.num_elems,
            });
        }
        self.cur_idx = pos;
        Ok(())
    }

    #[inline]
    fn seek_at_or_after_value(&mut self, value: &[u8]) -> Result<bool> {
        self.check_parsed();
        if self.num_elems == 0 {
            return Err(Error::NotFound("page is empty"));
        }
        if value.len() < self.ty.width() {
            return Err(Error::InvalidArgument);
        }
        // lower bound: after the loop, left is the index of first
        // value >= target, or num_elems if all values < target.
        let mut left = 0;
        let mut right = self.num_elems;
        while left < right {
            let mid = left + (right - left) / 2;
            if self.ty.cmp_raw(self.value_slice(mid), value) == Ordering::Less {
                left = mid + 1;
            } else {
                right = mid;
            }
        }
        if left >= self.num_elems {
            return Err(Error::NotFound("all values smaller than target"));
        }
        let exact_match = self.ty.cmp_raw(self.value_slice(left), value) == Ordering::Equal;
        self.cur_idx = left;
        Ok(exact_match)
    }

    #[inline]
    fn next_batch(&mut self, n: usize, dst: &mut ColumnBlockView<'_>) -> Result<usize> {
        self.check_parsed();
        if n == 0 || self.cur_idx >= self.num_elems {
            return Ok(0);
        }
        let width = self.ty.width();
        let max_fetch = n.min(self.num_elems - self.cur_idx);
        if dst.width() != width || dst.remaining() < max_fetch {
            return Err(Error::InvalidArgument);
        }
        let src = self.values_slice(self.cur_idx, max_fetch);
        dst.data()[..src.len()].copy_from_slice(src);
        dst.advance(max_fetch);
        self.cur_idx += max_fetch;
        Ok(max_fetch)
    }

    fn next_range_batch(&mut self, range: &SparseRange, dst: &mut FixedColumn) -> Result<usize> {
        self.check_parsed();
        let to_read = range.span_size();
        if to_read == 0 || self.cur_idx >= self.num_elems {
            return Ok(0);
        }
        if dst.width() != self.ty.width() {
            return Err(Error::InvalidArgument);
        }
        let mut read = 0;
        let mut iter = range.new_iterator();
        while iter.has_more() && self.cur_idx < self.num_elems {
            let r = iter.next_range(to_read);
            // cursor never moves backward, rows behind it are skipped.
            let begin = r.begin().max(self.cur_idx);
            if begin >= r.end() {
                continue;
            }
            if begin >= self.num_elems {
                self.cur_idx = self.num_elems;
                break;
            }
            let max_fetch = (r.end() - begin).min(self.num_elems - begin);
            let n = dst.append_numbers(self.values_slice(begin, max_fetch));
            debug_assert_eq!(n, max_fetch);
            self.cur_idx = begin + max_fetch;
            read += max_fetch;
        }
        Ok(read)
    }

    #[inline]
    fn count(&self) -> usize {
        self.check_parsed();
        self.num_elems
    }

    #[inline]
    fn current_index(&self) -> usize {
        self.check_parsed();
        self.cur_idx
    }

    #[inline]
    fn encoding_kind(&self) -> EncodingKind {
        EncodingKind::Plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;
    use colseg_datatype::{BigInt, Char, Double, Int, SmallInt};
    use easy_parallel::Parallel;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;
    use rand_distr::Normal;

    fn build_int_page(values: &[i32], page_size: usize) -> Vec<u8> {
        let options = PageBuilderOptions::default().data_page_size(page_size);
        let mut builder = PlainPageBuilder::new(Int, options);
        assert_eq!(builder.add(bytemuck::cast_slice(values)), values.len());
        builder.finish().to_vec()
    }

    fn new_int_decoder(page: &[u8]) -> PlainPageDecoder<'_, Int> {
        let mut decoder = PlainPageDecoder::new(Int, page, PageDecoderOptions::default());
        decoder.init().unwrap();
        decoder
    }

    #[test]
    fn test_plain_page_layout() {
        let page = build_int_page(&[1, -1, 256], 1024);
        assert_eq!(
            page,
            vec![3, 0, 0, 0, 1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff, 0, 1, 0, 0]
        );
        let (idx, header) = PlainPageHeader::deser(&page[..], 0).unwrap();
        assert_eq!(idx, PLAIN_PAGE_HEADER_SIZE);
        assert_eq!(header.count(), 3);
    }

    #[test]
    fn test_plain_page_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let values: Vec<i64> = (0..1000).map(|_| rng.random()).collect();
        let options = PageBuilderOptions::default().data_page_size(64 * 1024usize);
        let mut builder = PlainPageBuilder::new(BigInt, options);
        // add in random sized batches.
        let mut added = 0;
        while added < values.len() {
            let n = rng.random_range(1..=50usize).min(values.len() - added);
            let raw = bytemuck::cast_slice(&values[added..added + n]);
            assert_eq!(builder.add(raw), n);
            added += n;
        }
        assert!(!builder.is_page_full());
        assert_eq!(builder.count(), 1000);
        let page = builder.finish();
        assert_eq!(page.len(), PLAIN_PAGE_HEADER_SIZE + 8000);

        let mut decoder = PlainPageDecoder::new(BigInt, page, PageDecoderOptions::default());
        decoder.init().unwrap();
        assert_eq!(decoder.count(), 1000);
        let mut col = FixedColumn::new(8);
        let mut total = 0;
        loop {
            let n = decoder.next_column_batch(128, &mut col).unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(total, 1000);
        assert_eq!(col.values(&BigInt), values);
        assert_eq!(col.as_bytes(), bytemuck::cast_slice::<i64, u8>(&values));
    }

    #[test]
    fn test_plain_page_capacity() {
        // 100 bytes per page: at most 25 values of i32.
        let options = PageBuilderOptions::default().data_page_size(100usize);
        let mut builder = PlainPageBuilder::new(Int, options);
        let values: Vec<i32> = (0..100).collect();
        let raw: &[u8] = bytemuck::cast_slice(&values);

        assert_eq!(builder.add(&raw[..20 * 4]), 20);
        assert!(!builder.is_page_full());
        // capped by max count 25, page goes over its limit.
        assert_eq!(builder.add(&raw[20 * 4..]), 5);
        assert_eq!(builder.count(), 25);
        assert_eq!(builder.size(), PLAIN_PAGE_HEADER_SIZE + 100);
        assert!(builder.is_page_full());
        assert_eq!(builder.add(&raw[..4]), 0);
        assert_eq!(builder.count(), 25);

        let page = builder.finish().to_vec();
        let decoder = new_int_decoder(&page);
        assert_eq!(decoder.count(), 25);

        // reset keeps reserved capacity.
        let capacity = builder.buffer.capacity();
        builder.reset();
        assert_eq!(builder.count(), 0);
        assert_eq!(builder.size(), PLAIN_PAGE_HEADER_SIZE);
        assert!(builder.buffer.capacity() >= capacity.min(100 + PAGE_BUFFER_SLOP));
        assert!(!builder.is_page_full());
        assert_eq!(builder.add(&raw[..8]), 2);
    }

    #[test]
    fn test_plain_page_capacity_random() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let page_size = rng.random_range(1..512usize);
            let options = PageBuilderOptions::default().data_page_size(page_size);
            let mut builder = PlainPageBuilder::new(SmallInt, options);
            let max_count = page_size / 2;
            let mut accepted = 0;
            while !builder.is_page_full() {
                let n = rng.random_range(1..40usize);
                let vals = vec![0u8; n * 2];
                let res = builder.add(&vals);
                if res == 0 {
                    // max count reached but page is within its limit.
                    assert_eq!(accepted, max_count);
                    break;
                }
                accepted += res;
                assert!(accepted <= max_count);
            }
            assert_eq!(builder.add(&[0u8; 2]), 0);
            assert_eq!(builder.count(), accepted);
        }
    }

    #[test]
    fn test_plain_page_empty() {
        let options = PageBuilderOptions::default();
        let mut builder = PlainPageBuilder::new(Int, options);
        let page = builder.finish().to_vec();
        assert_eq!(page, vec![0, 0, 0, 0]);
        let mut out = [0u8; 4];
        assert!(builder.get_first_value(&mut out).unwrap_err().is_not_found());
        assert!(builder.get_last_value(&mut out).unwrap_err().is_not_found());

        let mut decoder = new_int_decoder(&page);
        assert_eq!(decoder.count(), 0);
        assert_eq!(decoder.current_index(), 0);
        assert!(decoder.get_first_value(&mut out).unwrap_err().is_not_found());
        assert!(decoder.get_last_value(&mut out).unwrap_err().is_not_found());
        let res = decoder.seek_at_or_after_value(&1i32.to_le_bytes());
        assert_eq!(res, Err(Error::NotFound("page is empty")));
        assert!(decoder.seek_to_position_in_page(0).is_ok());
        assert_eq!(
            decoder.seek_to_position_in_page(1),
            Err(Error::InvalidPosition { pos: 1, count: 0 })
        );
        let mut col = FixedColumn::new(4);
        assert_eq!(decoder.next_column_batch(10, &mut col).unwrap(), 0);
        let mut block = [0u8; 16];
        let mut view = ColumnBlockView::new(&mut block, 4);
        assert_eq!(decoder.next_batch(4, &mut view).unwrap(), 0);
    }

    #[test]
    fn test_plain_page_seek_value() {
        let page = build_int_page(&[1, 3, 5, 7, 9], 1024);
        let mut decoder = new_int_decoder(&page);

        assert!(decoder.seek_at_or_after_value(&5i32.to_le_bytes()).unwrap());
        assert_eq!(decoder.current_index(), 2);

        assert!(!decoder.seek_at_or_after_value(&6i32.to_le_bytes()).unwrap());
        assert_eq!(decoder.current_index(), 3);
        assert_eq!(decoder.value_at(3), Some(&7i32.to_le_bytes()[..]));

        assert!(!decoder.seek_at_or_after_value(&0i32.to_le_bytes()).unwrap());
        assert_eq!(decoder.current_index(), 0);

        assert!(decoder.seek_at_or_after_value(&9i32.to_le_bytes()).unwrap());
        assert_eq!(decoder.current_index(), 4);

        let res = decoder.seek_at_or_after_value(&10i32.to_le_bytes());
        assert_eq!(res, Err(Error::NotFound("all values smaller than target")));

        let res = decoder.seek_at_or_after_value(&[1u8, 0]);
        assert_eq!(res, Err(Error::InvalidArgument));
    }

    #[test]
    fn test_plain_page_seek_duplicates() {
        let page = build_int_page(&[1, 2, 2, 2, 2, 2, 3, 3, 8], 1024);
        let mut decoder = new_int_decoder(&page);
        assert!(decoder.seek_at_or_after_value(&2i32.to_le_bytes()).unwrap());
        assert_eq!(decoder.current_index(), 1);
        assert!(decoder.seek_at_or_after_value(&3i32.to_le_bytes()).unwrap());
        assert_eq!(decoder.current_index(), 6);
        assert!(!decoder.seek_at_or_after_value(&4i32.to_le_bytes()).unwrap());
        assert_eq!(decoder.current_index(), 8);
    }

    #[test]
    fn test_plain_page_seek_random() {
        let mut rng = ChaCha8Rng::seed_from_u64(1024);
        // clustered values produce long runs of duplicates.
        let normal = Normal::new(0.0f64, 300.0).unwrap();
        let mut values: Vec<i32> = (0..500)
            .map(|_| (rng.sample(normal).round() as i32).clamp(-1000, 1000))
            .collect();
        values.sort();
        let page = build_int_page(&values, 4096);
        let mut decoder = new_int_decoder(&page);
        for _ in 0..500 {
            let target = rng.random_range(-1100..1100i32);
            let expected = values.partition_point(|v| *v < target);
            match decoder.seek_at_or_after_value(&target.to_le_bytes()) {
                Ok(exact_match) => {
                    assert_eq!(decoder.current_index(), expected);
                    assert_eq!(exact_match, values[expected] == target);
                }
                Err(e) => {
                    assert!(e.is_not_found());
                    assert_eq!(expected, values.len());
                }
            }
        }
    }

    #[test]
    fn test_plain_page_next_batch() {
        let page = build_int_page(&[1, 3, 5, 7, 9], 1024);
        let mut decoder = new_int_decoder(&page);
        let mut block = vec![0u8; 4 * 16];
        let mut view = ColumnBlockView::new(&mut block, 4);

        assert_eq!(decoder.next_batch(3, &mut view).unwrap(), 3);
        assert_eq!(decoder.current_index(), 3);
        assert_eq!(view.written(), bytemuck::cast_slice::<i32, u8>(&[1, 3, 5]));

        assert_eq!(decoder.next_batch(10, &mut view).unwrap(), 2);
        assert_eq!(decoder.current_index(), 5);
        assert_eq!(
            view.written(),
            bytemuck::cast_slice::<i32, u8>(&[1, 3, 5, 7, 9])
        );

        assert_eq!(decoder.next_batch(10, &mut view).unwrap(), 0);
        decoder.seek_to_position_in_page(1).unwrap();
        assert_eq!(decoder.next_batch(0, &mut view).unwrap(), 0);
        assert_eq!(decoder.current_index(), 1);
        assert_eq!(
            decoder.seek_to_position_in_page(6),
            Err(Error::InvalidPosition { pos: 6, count: 5 })
        );
        assert_eq!(decoder.current_index(), 1);
        decoder.seek_to_position_in_page(5).unwrap();
        assert_eq!(decoder.next_batch(1, &mut view).unwrap(), 0);
    }

    #[test]
    fn test_plain_page_next_batch_invalid_block() {
        let page = build_int_page(&[1, 3, 5, 7, 9], 1024);
        let mut decoder = new_int_decoder(&page);
        let mut small = vec![0u8; 8];
        let mut view = ColumnBlockView::new(&mut small, 4);
        assert_eq!(decoder.next_batch(3, &mut view), Err(Error::InvalidArgument));
        // nothing changed on failure.
        assert_eq!(decoder.current_index(), 0);
        assert_eq!(view.position(), 0);

        let mut wide = vec![0u8; 64];
        let mut view = ColumnBlockView::new(&mut wide, 8);
        assert_eq!(decoder.next_batch(1, &mut view), Err(Error::InvalidArgument));
        let mut col = FixedColumn::new(8);
        assert_eq!(
            decoder.next_column_batch(1, &mut col),
            Err(Error::InvalidArgument)
        );
        assert_eq!(decoder.current_index(), 0);
    }

    #[test]
    fn test_plain_page_column_batch_to_end() {
        let page = build_int_page(&[1, 3, 5, 7, 9], 1024);
        let mut decoder = new_int_decoder(&page);
        let mut col = FixedColumn::new(4);
        decoder.seek_to_position_in_page(2).unwrap();
        assert_eq!(decoder.next_column_batch(usize::MAX, &mut col).unwrap(), 3);
        assert_eq!(decoder.current_index(), 5);
        assert_eq!(col.values(&Int), vec![5, 7, 9]);
        assert_eq!(decoder.next_column_batch(usize::MAX, &mut col).unwrap(), 0);

        decoder.seek_to_position_in_page(1).unwrap();
        assert_eq!(decoder.next_column_batch(0, &mut col).unwrap(), 0);
        assert_eq!(decoder.current_index(), 1);
    }

    #[test]
    fn test_plain_page_range_batch() {
        let page = build_int_page(&[1, 3, 5, 7, 9], 1024);
        let mut decoder = new_int_decoder(&page);
        let mut col = FixedColumn::new(4);

        // rows 3, 4, 5, 6: clamped to the page.
        let range = SparseRange::from(Range::new(3, 7));
        assert_eq!(decoder.next_range_batch(&range, &mut col).unwrap(), 2);
        assert_eq!(decoder.current_index(), 5);
        assert_eq!(col.values(&Int), vec![7, 9]);

        // cursor at end.
        assert_eq!(decoder.next_range_batch(&range, &mut col).unwrap(), 0);
        assert_eq!(
            decoder
                .next_range_batch(&SparseRange::new(), &mut col)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_plain_page_sparse_range_batch() {
        let values: Vec<i32> = (0..100).collect();
        let page = build_int_page(&values, 1024);
        let mut decoder = new_int_decoder(&page);
        let mut col = FixedColumn::new(4);

        let range: SparseRange = [Range::new(2, 5), Range::new(10, 12), Range::new(50, 51)]
            .into_iter()
            .collect();
        assert_eq!(decoder.next_range_batch(&range, &mut col).unwrap(), 6);
        assert_eq!(decoder.current_index(), 51);
        assert_eq!(col.values(&Int), vec![2, 3, 4, 10, 11, 50]);

        // spans behind the cursor are not read again.
        col.clear();
        decoder.seek_to_position_in_page(11).unwrap();
        assert_eq!(decoder.next_range_batch(&range, &mut col).unwrap(), 2);
        assert_eq!(col.values(&Int), vec![11, 50]);

        // span beyond the page end.
        col.clear();
        decoder.seek_to_position_in_page(90).unwrap();
        let range: SparseRange = [Range::new(95, 97), Range::new(120, 130)]
            .into_iter()
            .collect();
        assert_eq!(decoder.next_range_batch(&range, &mut col).unwrap(), 2);
        assert_eq!(decoder.current_index(), 100);
        assert_eq!(col.values(&Int), vec![95, 96]);
    }

    #[test]
    fn test_plain_page_selection_batch() {
        let values: Vec<i32> = (0..200).map(|v| v * 10).collect();
        let page = build_int_page(&values, 4096);
        let mut decoder = new_int_decoder(&page);
        let mut bits = [0u64; 4];
        for i in (0..200).filter(|i| i % 3 == 0) {
            bits[i / 64] |= 1 << (i % 64);
        }
        let range = SparseRange::from_selection(&bits, 200, 0);
        let mut col = FixedColumn::new(4);
        assert_eq!(decoder.next_range_batch(&range, &mut col).unwrap(), 67);
        let expected: Vec<i32> = (0..200).filter(|i| i % 3 == 0).map(|v| v * 10).collect();
        assert_eq!(col.values(&Int), expected);
    }

    #[test]
    fn test_plain_page_first_last_value() {
        let options = PageBuilderOptions::default();
        let mut builder = PlainPageBuilder::new(Int, options);
        assert_eq!(builder.add_values(&[1, 3, 5, 7, 9]), 5);
        let mut out = [0u8; 4];
        // not sealed yet.
        assert_eq!(builder.get_first_value(&mut out), Err(Error::InvalidState));
        let page = builder.finish().to_vec();

        builder.get_first_value(&mut out).unwrap();
        assert_eq!(i32::from_le_bytes(out), 1);
        builder.get_last_value(&mut out).unwrap();
        assert_eq!(i32::from_le_bytes(out), 9);
        let mut short = [0u8; 2];
        assert_eq!(
            builder.get_last_value(&mut short),
            Err(Error::InvalidArgument)
        );

        let decoder = new_int_decoder(&page);
        let mut first = [0u8; 4];
        let mut last = [0u8; 4];
        decoder.get_first_value(&mut first).unwrap();
        decoder.get_last_value(&mut last).unwrap();
        assert_eq!(Some(&first[..]), decoder.value_at(0));
        assert_eq!(Some(&last[..]), decoder.value_at(4));
        assert_eq!(i32::from_le_bytes(first), 1);
        assert_eq!(i32::from_le_bytes(last), 9);
        assert_eq!(decoder.value_at(5), None);

        // finish again produces same page.
        assert_eq!(builder.finish(), &page[..]);
        builder.reset();
        assert!(builder.get_first_value(&mut out).unwrap_err().is_not_found());
    }

    #[test]
    fn test_plain_page_corruption() {
        let _ = env_logger::builder().is_test(true).try_init();
        let page = build_int_page(&[1, 3, 5], 1024);

        let mut decoder = PlainPageDecoder::new(Int, &page[..2], PageDecoderOptions::default());
        assert!(decoder.init().unwrap_err().is_corruption());

        for len in [4, 8, 15] {
            let mut decoder =
                PlainPageDecoder::new(Int, &page[..len], PageDecoderOptions::default());
            let err = decoder.init().unwrap_err();
            assert!(err.is_corruption(), "{}", err);
        }

        let mut longer = page.clone();
        longer.push(0);
        let mut decoder = PlainPageDecoder::new(Int, &longer, PageDecoderOptions::default());
        assert!(decoder.init().unwrap_err().is_corruption());

        // count does not match width of reader.
        let mut decoder = PlainPageDecoder::new(BigInt, &page, PageDecoderOptions::default());
        assert!(decoder.init().unwrap_err().is_corruption());

        // huge count.
        let mut bad = page.clone();
        bad[..4].copy_from_slice(&u32::MAX.to_le_bytes());
        let mut decoder = PlainPageDecoder::new(Int, &bad, PageDecoderOptions::default());
        assert!(decoder.init().unwrap_err().is_corruption());

        let decoder = new_int_decoder(&page);
        assert_eq!(decoder.count(), 3);
    }

    #[test]
    #[should_panic(expected = "must call init() first")]
    fn test_plain_page_uninitialized() {
        let page = build_int_page(&[1, 3, 5], 1024);
        let decoder = PlainPageDecoder::new(Int, &page, PageDecoderOptions::default());
        decoder.count();
    }

    #[test]
    #[should_panic(expected = "must call init() first")]
    fn test_plain_page_use_after_failed_init() {
        let page = build_int_page(&[1, 3, 5], 1024);
        let mut decoder = PlainPageDecoder::new(Int, &page[..5], PageDecoderOptions::default());
        assert!(decoder.init().is_err());
        let _ = decoder.seek_to_position_in_page(0);
    }

    #[test]
    fn test_plain_page_double() {
        let values = [-1.5f64, 0.0, 2.25, 1e10];
        let options = PageBuilderOptions::default();
        let mut builder = PlainPageBuilder::new(Double, options);
        assert_eq!(builder.add_values(&values), 4);
        let page = builder.finish().to_vec();
        let mut decoder = PlainPageDecoder::new(Double, &page, PageDecoderOptions::default());
        decoder.init().unwrap();
        assert!(!decoder.seek_at_or_after_value(&1.0f64.to_le_bytes()).unwrap());
        assert_eq!(decoder.current_index(), 2);
        let mut col = FixedColumn::new(8);
        assert_eq!(decoder.next_column_batch(4, &mut col).unwrap(), 2);
        assert_eq!(col.values(&Double), vec![2.25, 1e10]);
    }

    #[test]
    fn test_plain_page_char() {
        let ty = Char::new(5);
        let options = PageBuilderOptions::default().data_page_size(20usize);
        let mut builder = PlainPageBuilder::new(ty, options);
        let values: Vec<Vec<u8>> = ["apple", "kiwi", "lemon", "mango", "peach"]
            .iter()
            .map(|s| s.as_bytes().to_vec())
            .collect();
        // at most 4 values in 20 bytes.
        assert_eq!(builder.add_values(&values), 4);
        assert!(builder.is_page_full());
        assert_eq!(builder.add_values(&values[4..]), 0);
        let page = builder.finish().to_vec();

        let mut decoder = PlainPageDecoder::new(ty, &page, PageDecoderOptions::default());
        decoder.init().unwrap();
        assert_eq!(decoder.count(), 4);
        assert!(decoder.seek_at_or_after_value(b"lemon").unwrap());
        assert_eq!(decoder.current_index(), 2);
        assert_eq!(decoder.value_at(1), Some(&b"kiwi\0"[..]));
        let res = decoder.seek_at_or_after_value(b"zzzzz");
        assert!(res.unwrap_err().is_not_found());
    }

    #[test]
    fn test_plain_page_parallel_decode() {
        let pages: Vec<Vec<u8>> = (0..4)
            .map(|p| {
                let values: Vec<i32> = (0..256).map(|v| p * 1000 + v).collect();
                build_int_page(&values, 4096)
            })
            .collect();
        let sums = Parallel::new()
            .each(pages.iter(), |page| {
                let mut decoder = new_int_decoder(page);
                let mut col = FixedColumn::new(4);
                decoder.next_column_batch(1000, &mut col).unwrap();
                col.values(&Int).iter().map(|v| *v as i64).sum::<i64>()
            })
            .run();
        for (p, sum) in sums.into_iter().enumerate() {
            let expected: i64 = (0..256).map(|v| p as i64 * 1000 + v).sum();
            assert_eq!(sum, expected);
        }
    }
}
