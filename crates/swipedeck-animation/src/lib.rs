//! Animation system for the swipe deck.
//!
//! Provides frame-driven tween and spring animations plus the animated 2-D
//! offset that tracks the top card.

mod animation;
mod interpolate;
mod position;

pub use animation::{
    Animatable, AnimationSpec, AnimationType, Easing, Lerp, SpringScalar, SpringSpec,
};
pub use interpolate::interpolate;
pub use position::{
    AnimatedOffset, CardLayout, PositionTracker, MAX_ROTATION_DEGREES, ROTATION_WIDTH_FACTOR,
};
