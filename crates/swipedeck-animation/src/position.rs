//! Animated 2-D offset of the top card.

use swipedeck_core::{Point, RuntimeHandle};

use crate::animation::{Animatable, AnimationType};
use crate::interpolate::interpolate;

/// Rotation saturates at this many degrees either side of upright.
pub const MAX_ROTATION_DEGREES: f32 = 120.0;

/// The rotation domain spans this many viewport widths either side of rest.
pub const ROTATION_WIDTH_FACTOR: f32 = 2.0;

/// Offset and rotation applied to the interactive card for one render.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardLayout {
    pub x: f32,
    pub y: f32,
    pub rotation_degrees: f32,
}

/// Capability the deck uses to move its top card.
///
/// The deck depends only on this contract; [`AnimatedOffset`] is the
/// frame-clock backed implementation.
pub trait PositionTracker {
    /// Immediate update used while a drag is live. Stops any running
    /// animation.
    fn set_offset(&self, dx: f32, dy: f32);

    /// Move to `target`, calling `on_complete` once when it is reached.
    fn animate_to(
        &self,
        target: Point,
        animation: AnimationType,
        on_complete: Box<dyn FnOnce() + 'static>,
    );

    fn offset(&self) -> Point;

    fn is_animating(&self) -> bool;

    /// Rotation in degrees for a horizontal offset `x`.
    fn rotation_for(&self, x: f32) -> f32;

    fn current_layout(&self) -> CardLayout {
        let offset = self.offset();
        CardLayout {
            x: offset.x,
            y: offset.y,
            rotation_degrees: self.rotation_for(offset.x),
        }
    }
}

/// Frame-clock driven [`PositionTracker`].
#[derive(Clone)]
pub struct AnimatedOffset {
    value: Animatable<Point>,
    rotation_input: [f32; 3],
    rotation_output: [f32; 3],
}

impl AnimatedOffset {
    /// Create a tracker at rest whose rotation domain is derived from
    /// `viewport_width`.
    pub fn new(runtime: RuntimeHandle, viewport_width: f32) -> Self {
        let reach = viewport_width * ROTATION_WIDTH_FACTOR;
        Self {
            value: Animatable::new(Point::ZERO, runtime),
            rotation_input: [-reach, 0.0, reach],
            rotation_output: [-MAX_ROTATION_DEGREES, 0.0, MAX_ROTATION_DEGREES],
        }
    }

    pub fn animatable(&self) -> &Animatable<Point> {
        &self.value
    }
}

impl PositionTracker for AnimatedOffset {
    fn set_offset(&self, dx: f32, dy: f32) {
        self.value.snap_to(Point::new(dx, dy));
    }

    fn animate_to(
        &self,
        target: Point,
        animation: AnimationType,
        on_complete: Box<dyn FnOnce() + 'static>,
    ) {
        log::trace!("offset animating to ({}, {})", target.x, target.y);
        self.value.animate_to(target, animation, on_complete);
    }

    fn offset(&self) -> Point {
        self.value.value()
    }

    fn is_animating(&self) -> bool {
        self.value.is_running()
    }

    fn rotation_for(&self, x: f32) -> f32 {
        interpolate(x, &self.rotation_input, &self.rotation_output)
    }
}

impl std::fmt::Debug for AnimatedOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedOffset")
            .field("value", &self.value)
            .field("rotation_input", &self.rotation_input)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/position_tests.rs"]
mod tests;
