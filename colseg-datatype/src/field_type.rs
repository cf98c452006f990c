use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic type of a column.
///
/// The numeric tag of each variant is persisted in segment metadata,
/// so existing values must never be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FieldType {
    TinyInt = 1,
    SmallInt = 3,
    Int = 5,
    BigInt = 7,
    LargeInt = 9,
    Float = 10,
    Double = 11,
    Char = 13,
    Varchar = 17,
    Boolean = 24,
    Decimal32 = 47,
    Decimal64 = 48,
    Decimal128 = 49,
    Date = 50,
    Datetime = 51,
    Json = 54,
}

impl FieldType {
    /// Returns encoded length of a single value if it is
    /// determined by the type itself.
    /// Char is fixed-width but its length is a column attribute,
    /// so None is returned.
    #[inline]
    pub const fn fixed_len(self) -> Option<usize> {
        let len = match self {
            FieldType::TinyInt | FieldType::Boolean => 1,
            FieldType::SmallInt => 2,
            FieldType::Int | FieldType::Float | FieldType::Decimal32 | FieldType::Date => 4,
            FieldType::BigInt
            | FieldType::Double
            | FieldType::Decimal64
            | FieldType::Datetime => 8,
            FieldType::LargeInt | FieldType::Decimal128 => 16,
            FieldType::Char | FieldType::Varchar | FieldType::Json => return None,
        };
        Some(len)
    }

    /// Returns whether all values of one column have same encoded length.
    #[inline]
    pub const fn is_fixed(self) -> bool {
        !matches!(self, FieldType::Varchar | FieldType::Json)
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::TinyInt => "TINYINT",
            FieldType::SmallInt => "SMALLINT",
            FieldType::Int => "INT",
            FieldType::BigInt => "BIGINT",
            FieldType::LargeInt => "LARGEINT",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
            FieldType::Char => "CHAR",
            FieldType::Varchar => "VARCHAR",
            FieldType::Boolean => "BOOLEAN",
            FieldType::Decimal32 => "DECIMAL32",
            FieldType::Decimal64 => "DECIMAL64",
            FieldType::Decimal128 => "DECIMAL128",
            FieldType::Date => "DATE",
            FieldType::Datetime => "DATETIME",
            FieldType::Json => "JSON",
        }
    }
}

const ALL_FIELD_TYPES: [FieldType; 16] = [
    FieldType::TinyInt,
    FieldType::SmallInt,
    FieldType::Int,
    FieldType::BigInt,
    FieldType::LargeInt,
    FieldType::Float,
    FieldType::Double,
    FieldType::Char,
    FieldType::Varchar,
    FieldType::Boolean,
    FieldType::Decimal32,
    FieldType::Decimal64,
    FieldType::Decimal128,
    FieldType::Date,
    FieldType::Datetime,
    FieldType::Json,
];

impl TryFrom<u8> for FieldType {
    type Error = Error;
    #[inline]
    fn try_from(value: u8) -> Result<Self> {
        ALL_FIELD_TYPES
            .iter()
            .copied()
            .find(|ft| *ft as u8 == value)
            .ok_or(Error::UnknownFieldType(value))
    }
}

impl FromStr for FieldType {
    type Err = Error;
    #[inline]
    fn from_str(s: &str) -> Result<Self> {
        ALL_FIELD_TYPES
            .iter()
            .copied()
            .find(|ft| ft.name().eq_ignore_ascii_case(s))
            .ok_or(Error::InvalidFormat)
    }
}

impl fmt::Display for FieldType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
