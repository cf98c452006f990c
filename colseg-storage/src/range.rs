//! Row ranges.
//!
//! A reader describes the rows it wants from a page with a
//! [`SparseRange`]: an ordered list of non-overlapping half-open
//! spans of row positions. Filtered scans build the sparse range
//! from a selection bitmap, contiguous scans use a single span.

use smallvec::SmallVec;
use std::fmt;

/// Contiguous rows in `[begin, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
    begin: usize,
    end: usize,
}

impl Range {
    #[inline]
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end);
        Range { begin, end }
    }

    #[inline]
    pub fn begin(&self) -> usize {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns number of rows in this range.
    #[inline]
    pub fn span_size(&self) -> usize {
        self.end - self.begin
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    #[inline]
    pub fn contains(&self, row: usize) -> bool {
        self.begin <= row && row < self.end
    }

    /// Returns the overlapped part of two ranges.
    /// The result is an empty range if they do not overlap.
    #[inline]
    pub fn intersect(&self, other: &Range) -> Range {
        let begin = self.begin.max(other.begin);
        let end = self.end.min(other.end);
        if begin < end {
            Range::new(begin, end)
        } else {
            Range::default()
        }
    }
}

impl From<std::ops::Range<usize>> for Range {
    #[inline]
    fn from(src: std::ops::Range<usize>) -> Self {
        Range::new(src.start, src.end)
    }
}

impl fmt::Display for Range {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.begin, self.end)
    }
}

/// Union of ranges.
///
/// Spans are kept in ascending order. Overlapping or adjacent spans
/// are merged on insertion, so two neighbours always have a gap
/// between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseRange {
    ranges: SmallVec<[Range; 4]>,
}

impl SparseRange {
    #[inline]
    pub fn new() -> Self {
        SparseRange::default()
    }

    /// Add a range. Empty range is ignored.
    #[inline]
    pub fn add(&mut self, range: Range) {
        if range.is_empty() {
            return;
        }
        // first span which overlaps or touches the new range.
        let start_idx = self.ranges.partition_point(|r| r.end < range.begin);
        let mut end_idx = start_idx;
        let mut merged = range;
        while end_idx < self.ranges.len() && self.ranges[end_idx].begin <= merged.end {
            merged.begin = merged.begin.min(self.ranges[end_idx].begin);
            merged.end = merged.end.max(self.ranges[end_idx].end);
            end_idx += 1;
        }
        self.ranges.drain(start_idx..end_idx);
        self.ranges.insert(start_idx, merged);
    }

    /// Returns total number of rows.
    #[inline]
    pub fn span_size(&self) -> usize {
        self.ranges.iter().map(|r| r.span_size()).sum()
    }

    /// Returns number of contiguous spans.
    #[inline]
    pub fn size(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// First row of this range, 0 if empty.
    #[inline]
    pub fn begin(&self) -> usize {
        self.ranges.first().map(|r| r.begin).unwrap_or(0)
    }

    /// End of the last span, 0 if empty.
    #[inline]
    pub fn end(&self) -> usize {
        self.ranges.last().map(|r| r.end).unwrap_or(0)
    }

    #[inline]
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// Returns rows both in this sparse range and given range.
    #[inline]
    pub fn intersect_range(&self, range: &Range) -> SparseRange {
        let ranges = self
            .ranges
            .iter()
            .map(|r| r.intersect(range))
            .filter(|r| !r.is_empty())
            .collect();
        SparseRange { ranges }
    }

    #[inline]
    pub fn new_iterator(&self) -> SparseRangeIter<'_> {
        SparseRangeIter::new(&self.ranges)
    }

    /// Build sparse range from a selection bitmap.
    /// Bit `i` (LSB first in each word) marks row `offset + i`
    /// as selected. Only the first `len` bits are inspected.
    pub fn from_selection(bits: &[u64], len: usize, offset: usize) -> SparseRange {
        debug_assert!(len <= bits.len() * 64);
        let mut res = SparseRange::new();
        let mut idx = 0;
        while idx < len {
            let begin = find_bit(bits, idx, len, true);
            if begin == len {
                break;
            }
            let end = find_bit(bits, begin, len, false);
            // runs are separated by at least one unselected row.
            res.ranges.push(Range::new(offset + begin, offset + end));
            idx = end;
        }
        res
    }
}

/// Returns index of first bit equal to `value` in `[from, len)`,
/// or `len` if not found.
#[inline]
fn find_bit(bits: &[u64], from: usize, len: usize, value: bool) -> usize {
    let mut idx = from;
    while idx < len {
        let unit = if value { bits[idx / 64] } else { !bits[idx / 64] };
        let word = unit >> (idx % 64);
        if word == 0 {
            idx = (idx / 64 + 1) * 64;
            continue;
        }
        idx += word.trailing_zeros() as usize;
        break;
    }
    idx.min(len)
}

impl From<Range> for SparseRange {
    #[inline]
    fn from(range: Range) -> Self {
        let mut res = SparseRange::new();
        res.add(range);
        res
    }
}

impl FromIterator<Range> for SparseRange {
    #[inline]
    fn from_iter<T: IntoIterator<Item = Range>>(iter: T) -> Self {
        let mut res = SparseRange::new();
        for r in iter {
            res.add(r);
        }
        res
    }
}

impl fmt::Display for SparseRange {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, r) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", r)?;
        }
        f.write_str(")")
    }
}

/// Forward-only cursor over the spans of a sparse range.
pub struct SparseRangeIter<'a> {
    ranges: &'a [Range],
    index: usize,
    next_row: usize,
}

impl<'a> SparseRangeIter<'a> {
    #[inline]
    fn new(ranges: &'a [Range]) -> Self {
        SparseRangeIter {
            ranges,
            index: 0,
            next_row: ranges.first().map(|r| r.begin).unwrap_or(0),
        }
    }

    #[inline]
    pub fn has_more(&self) -> bool {
        self.index < self.ranges.len()
    }

    /// Returns the next row to be returned.
    #[inline]
    pub fn begin(&self) -> usize {
        self.next_row
    }

    /// Returns contiguous rows from current position, at most `size`
    /// rows. Never crosses a span boundary.
    /// Empty range is returned if the iterator is exhausted.
    #[inline]
    pub fn next_range(&mut self, size: usize) -> Range {
        if !self.has_more() {
            return Range::new(self.next_row, self.next_row);
        }
        let curr = self.ranges[self.index];
        let end = curr.end.min(self.next_row.saturating_add(size));
        let res = Range::new(self.next_row, end);
        self.next_row = end;
        if end == curr.end {
            self.index += 1;
            if let Some(r) = self.ranges.get(self.index) {
                self.next_row = r.begin;
            }
        }
        res
    }

    /// Skip `n` rows, possibly across spans.
    #[inline]
    pub fn skip(&mut self, mut n: usize) {
        while n > 0 && self.has_more() {
            let r = self.next_range(n);
            n -= r.span_size();
        }
    }
}
