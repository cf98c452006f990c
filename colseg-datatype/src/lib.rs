pub mod error;
pub mod field_type;
pub mod fixed;

pub use field_type::FieldType;
pub use fixed::*;
