use swipedeck_animation::{AnimationSpec, SpringSpec};
use swipedeck_foundation::gesture_constants::{
    swipe_threshold, STACK_OFFSET_STEP, SWIPE_OUT_DURATION_MS,
};
use swipedeck_foundation::LeftSwipeRule;

/// Resolved deck configuration.
///
/// The swipe threshold is derived from the viewport width once, when the
/// options are created, and stays fixed for the deck's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckOptions {
    pub viewport_width: f32,
    pub swipe_threshold: f32,
    pub left_swipe_rule: LeftSwipeRule,
    pub swipe_out: AnimationSpec,
    pub reset_spring: SpringSpec,
    pub stack_offset_step: f32,
}

impl DeckOptions {
    pub fn new(viewport_width: f32) -> Self {
        Self {
            viewport_width,
            swipe_threshold: swipe_threshold(viewport_width),
            left_swipe_rule: LeftSwipeRule::default(),
            swipe_out: AnimationSpec::linear(SWIPE_OUT_DURATION_MS),
            reset_spring: SpringSpec::default(),
            stack_offset_step: STACK_OFFSET_STEP,
        }
    }

    pub fn with_left_swipe_rule(mut self, rule: LeftSwipeRule) -> Self {
        self.left_swipe_rule = rule;
        self
    }

    pub fn with_swipe_out(mut self, spec: AnimationSpec) -> Self {
        self.swipe_out = spec;
        self
    }

    pub fn with_reset_spring(mut self, spec: SpringSpec) -> Self {
        self.reset_spring = spec;
        self
    }

    pub fn with_stack_offset_step(mut self, step: f32) -> Self {
        self.stack_offset_step = step;
        self
    }
}
