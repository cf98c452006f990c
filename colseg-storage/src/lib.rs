pub mod column;
pub mod error;
pub mod page;
pub mod range;
pub mod serde;

pub mod prelude {
    pub use crate::column::*;
    pub use crate::error::*;
    pub use crate::page::*;
    pub use crate::range::*;
}
