//! Symbols and tunables that `tinystl` depends on.
//!
//! This crate provides the system allocator bindings and the compile-time configuration of the
//! pool and the containers.

#![warn(missing_docs)]

pub mod config;
pub mod syscalls;
