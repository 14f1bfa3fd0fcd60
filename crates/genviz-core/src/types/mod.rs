//! Shared type aliases.

mod aliases;

pub use aliases::*;
