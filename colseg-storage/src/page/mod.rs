//! Page codecs of column data.
//!
//! A page is the unit of encoded column storage. Each encoding provides
//! a builder which packs values into a page and a decoder which reads
//! values back from it. All encodings share the [`PageBuilder`] and
//! [`PageDecoder`] interfaces so that segment reader can pick the
//! decoder by the encoding recorded in column metadata.

pub mod options;
pub mod plain;
pub mod zone_map;

pub use options::*;
pub use plain::*;
pub use zone_map::*;

use crate::column::{ColumnBlockView, FixedColumn};
use crate::error::{Error, Result};
use crate::range::{Range, SparseRange};
use colseg_datatype::{
    BigInt, Boolean, Char, Date, Datetime, Decimal32, Decimal64, Decimal128, Double, FieldType,
    Float, Int, LargeInt, SmallInt, TinyInt,
};

/// Encoding of a page.
///
/// The numeric tag is persisted in column metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EncodingKind {
    Default = 1,
    Plain = 2,
    Prefix = 3,
    Rle = 4,
    Dict = 5,
    BitShuffle = 6,
    For = 7,
}

impl TryFrom<u8> for EncodingKind {
    type Error = Error;
    #[inline]
    fn try_from(value: u8) -> Result<Self> {
        let res = match value {
            1 => EncodingKind::Default,
            2 => EncodingKind::Plain,
            3 => EncodingKind::Prefix,
            4 => EncodingKind::Rle,
            5 => EncodingKind::Dict,
            6 => EncodingKind::BitShuffle,
            7 => EncodingKind::For,
            _ => return Err(Error::InvalidFormat),
        };
        Ok(res)
    }
}

/// Builder accumulates values of one column into a page.
///
/// Values are passed as raw bytes of the column's fixed-width encoding.
/// A builder is owned by one writer and reused across pages via `reset()`.
pub trait PageBuilder {
    fn encoding_kind(&self) -> EncodingKind;

    /// Returns whether the page already exceeds its size limit.
    /// This check is retrospective: the last `add()` may leave
    /// the page larger than the limit, but no more value is
    /// accepted after that.
    fn is_page_full(&self) -> bool;

    /// Add values to the page and returns number of accepted values.
    /// Input must consist of whole values. Returns 0 if page is full.
    fn add(&mut self, vals: &[u8]) -> usize;

    /// Seal the page and returns the encoded bytes.
    fn finish(&mut self) -> &[u8];

    /// Clear all values so the builder can be used for next page.
    fn reset(&mut self);

    /// Returns number of values added.
    fn count(&self) -> usize;

    /// Returns current size of page in bytes.
    fn size(&self) -> usize;

    /// Copy first value of the sealed page to output.
    fn get_first_value(&self, value: &mut [u8]) -> Result<()>;

    /// Copy last value of the sealed page to output.
    fn get_last_value(&self, value: &mut [u8]) -> Result<()>;
}

/// Decoder reads values from an encoded page.
///
/// `init()` must be called before any other method.
/// Reads start from the current position of the decoder and
/// move it forward.
pub trait PageDecoder {
    /// Parse the page.
    fn init(&mut self) -> Result<()>;

    /// Move the cursor to given position, which can be at most count().
    fn seek_to_position_in_page(&mut self, pos: usize) -> Result<()>;

    /// Move the cursor to the first value which is not less than given value.
    /// Values in the page must be sorted.
    /// Returns whether the value at the cursor equals to given value.
    fn seek_at_or_after_value(&mut self, value: &[u8]) -> Result<bool>;

    /// Copy at most `n` values from cursor into the block.
    /// Returns number of copied values, 0 at the end of page.
    fn next_batch(&mut self, n: usize, dst: &mut ColumnBlockView<'_>) -> Result<usize>;

    /// Append values at rows of given range to the column.
    /// Rows before the cursor are skipped. Returns number of appended values,
    /// which can be less than size of range if page ends.
    fn next_range_batch(&mut self, range: &SparseRange, dst: &mut FixedColumn) -> Result<usize>;

    /// Append at most `n` values from cursor to the column.
    /// `n` larger than the remaining values reads to the end of page.
    #[inline]
    fn next_column_batch(&mut self, n: usize, dst: &mut FixedColumn) -> Result<usize> {
        let begin = self.current_index();
        let end = begin.saturating_add(n).min(self.count());
        if begin >= end {
            return Ok(0);
        }
        let range = SparseRange::from(Range::new(begin, end));
        self.next_range_batch(&range, dst)?;
        Ok(self.current_index() - begin)
    }

    /// Returns number of values in the page.
    fn count(&self) -> usize;

    /// Returns position of the cursor.
    fn current_index(&self) -> usize;

    fn encoding_kind(&self) -> EncodingKind;
}

macro_rules! dispatch_fixed_type {
    ($field_type:expr, $width:expr, $ty:ident => $body:expr) => {
        match $field_type {
            FieldType::TinyInt => {
                let $ty = TinyInt;
                $body
            }
            FieldType::SmallInt => {
                let $ty = SmallInt;
                $body
            }
            FieldType::Int => {
                let $ty = Int;
                $body
            }
            FieldType::BigInt => {
                let $ty = BigInt;
                $body
            }
            FieldType::LargeInt => {
                let $ty = LargeInt;
                $body
            }
            FieldType::Float => {
                let $ty = Float;
                $body
            }
            FieldType::Double => {
                let $ty = Double;
                $body
            }
            FieldType::Boolean => {
                let $ty = Boolean;
                $body
            }
            FieldType::Decimal32 => {
                let $ty = Decimal32;
                $body
            }
            FieldType::Decimal64 => {
                let $ty = Decimal64;
                $body
            }
            FieldType::Decimal128 => {
                let $ty = Decimal128;
                $body
            }
            FieldType::Date => {
                let $ty = Date;
                $body
            }
            FieldType::Datetime => {
                let $ty = Datetime;
                $body
            }
            FieldType::Char => {
                let $ty = Char::new($width);
                $body
            }
            FieldType::Varchar | FieldType::Json => return Err(Error::DataTypeNotSupported),
        }
    };
}

#[inline]
fn check_codec(field_type: FieldType, width: usize, encoding: EncodingKind) -> Result<()> {
    if encoding != EncodingKind::Plain {
        log::debug!("page encoding {:?} not supported for {}", encoding, field_type);
        return Err(Error::NotSupported("page encoding"));
    }
    if !field_type.is_fixed() {
        log::debug!("variable-width type {} for plain page", field_type);
        return Err(Error::DataTypeNotSupported);
    }
    match field_type.fixed_len() {
        Some(len) if len != width => Err(Error::InvalidArgument),
        None if width == 0 => Err(Error::InvalidArgument),
        _ => Ok(()),
    }
}

/// Create page builder for given column type and encoding.
/// `width` is the encoded length of each value, which must match
/// the field type, and is the length of char type.
pub fn new_page_builder(
    field_type: FieldType,
    width: usize,
    encoding: EncodingKind,
    options: PageBuilderOptions,
) -> Result<Box<dyn PageBuilder>> {
    check_codec(field_type, width, encoding)?;
    let builder: Box<dyn PageBuilder> = dispatch_fixed_type!(field_type, width, ty => {
        Box::new(PlainPageBuilder::new(ty, options))
    });
    Ok(builder)
}

/// Create page decoder over page bytes for given column type and encoding.
/// The returned decoder is not initialized.
pub fn new_page_decoder<'a>(
    field_type: FieldType,
    width: usize,
    encoding: EncodingKind,
    data: &'a [u8],
    options: PageDecoderOptions,
) -> Result<Box<dyn PageDecoder + 'a>> {
    check_codec(field_type, width, encoding)?;
    let decoder: Box<dyn PageDecoder + 'a> = dispatch_fixed_type!(field_type, width, ty => {
        Box::new(PlainPageDecoder::new(ty, data, options))
    });
    Ok(decoder)
}

/// Create page decoder from type and encoding tags persisted in
/// column metadata.
pub fn new_page_decoder_from_meta<'a>(
    field_tag: u8,
    width: usize,
    encoding_tag: u8,
    data: &'a [u8],
    options: PageDecoderOptions,
) -> Result<Box<dyn PageDecoder + 'a>> {
    let field_type = FieldType::try_from(field_tag)?;
    let encoding = EncodingKind::try_from(encoding_tag)?;
    new_page_decoder(field_type, width, encoding, data, options)
}
