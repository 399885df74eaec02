//! Core types for StoreForge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod niche;
pub mod outcome;
pub mod product;

pub use niche::Niche;
pub use outcome::*;
pub use product::*;
