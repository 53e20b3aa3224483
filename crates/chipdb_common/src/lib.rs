//! Shared foundational types used across the chip database compiler.
//!
//! This crate provides grid coordinates and bounds, interned name tables, and
//! content hashing for produced database images.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod location;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use location::{Grid, Location};
