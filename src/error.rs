//! Errors raised while configuring a [`SkipList`][crate::SkipList].
//!
//! The core operations (insert, search, remove) never fail: they report their
//! outcome through booleans and the [`Floor`][crate::Floor] sentinel. Only the
//! configuration surface can be given values that make no sense.

use thiserror::Error;

/// Errors that can occur when configuring a skip list.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum Error {
    /// The maximum tower height must be at least 1, as every key occupies
    /// level 0.
    #[error("max height must be non-zero.")]
    ZeroMaxHeight,
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
