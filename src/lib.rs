//! **tinystl:** Generic containers on a pooled allocator.
//!
//! This crate provides the classic sequence and ordered containers, a small algorithm library,
//! and the memory layer beneath them: a two-level allocator which serves small requests from
//! size-class free lists refilled out of a growing arena, and sends large ones to the system.
//!
//! Every container takes its allocator as a type parameter, defaulting to the per-thread pool.

#![warn(missing_docs)]

#[macro_use]
mod log;

extern crate tinystl_shim as shim;

mod prelude;

pub mod algo;
pub mod allocator;
pub mod block;
pub mod bookkeeper;
pub mod construct;
pub mod deque;
pub mod fail;
pub mod functional;
pub mod iter;
pub mod list;
pub mod ptr;
pub mod rbtree;
pub mod slist;
pub mod sys;
pub mod vector;

pub use allocator::{Alloc, Allocator, PoolAlloc, SystemAlloc};
pub use deque::Deque;
pub use fail::{AllocError, Error};
pub use functional::{Compare, Greater, Less};
pub use list::List;
pub use rbtree::{Map, RbTree, Set};
pub use slist::Slist;
pub use vector::Vector;
