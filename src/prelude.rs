//! Frequently used imports.

pub use crate::block::Block;
pub use crate::fail::AllocError;
pub use crate::ptr::Pointer;
