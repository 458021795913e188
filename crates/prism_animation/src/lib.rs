//! Prism Animation
//!
//! Time-based value interpolation: easing curves, the [`Animated`] value
//! container used for background color transitions, and a [`FrameDriver`]
//! that pumps redraws while a transition is in flight.
//!
//! Animated values are sampled against the monotonic clock, so a read at any
//! instant yields the exactly-interpolated value without waiting for a tick.

pub mod animated;
pub mod driver;
pub mod easing;

pub use animated::{Animatable, Animated, AnimatedColor, AnimatedColorReader, AnimatedReader};
pub use driver::FrameDriver;
pub use easing::Easing;
