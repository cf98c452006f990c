use crate::error::{Error, Result};
use byte_unit::Byte;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_PAGE_SIZE: Byte = Byte::from_u64(64 * 1024);
// Extra bytes reserved for the buffer of page builder,
// because the last add() may overrun the page by a few values.
pub const PAGE_BUFFER_SLOP: usize = 1024;

/// Options to build a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageBuilderOptions {
    // Soft limit of page size.
    // The builder stops accepting values once the page
    // exceeds this size.
    pub data_page_size: Byte,
}

impl PageBuilderOptions {
    #[inline]
    pub fn data_page_size<T>(mut self, data_page_size: T) -> Self
    where
        Byte: From<T>,
    {
        self.data_page_size = Byte::from(data_page_size);
        self
    }

    /// Page size in bytes.
    #[inline]
    pub fn page_size(&self) -> usize {
        self.data_page_size.as_u64() as usize
    }
}

impl Default for PageBuilderOptions {
    #[inline]
    fn default() -> Self {
        PageBuilderOptions {
            data_page_size: DEFAULT_DATA_PAGE_SIZE,
        }
    }
}

/// Options to decode a page.
/// No option is recognized yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDecoderOptions {}

/// Page codec section of storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageCodecConfig {
    pub builder: PageBuilderOptions,
    pub decoder: PageDecoderOptions,
}

impl PageCodecConfig {
    #[inline]
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| {
            log::debug!("invalid page codec config: {}", e);
            Error::InvalidFormat
        })
    }
}
