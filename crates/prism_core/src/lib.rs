//! Prism Core
//!
//! Foundational value types shared by the theme and animation crates.
//! Currently this is the [`Color`] type and its interpolation helpers.

mod color;

pub use color::Color;
