use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid format")]
    InvalidFormat,
    #[error("unknown field type({0})")]
    UnknownFieldType(u8),
}
