//! Release classification for swipe gestures.

use crate::gesture_constants::swipe_threshold;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Horizontal sign of the off-screen target.
    pub fn sign(self) -> f32 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }
}

impl std::fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwipeDirection::Left => f.write_str("left"),
            SwipeDirection::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    Commit(SwipeDirection),
    Reset,
}

/// Which displacement commits a LEFT swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeftSwipeRule {
    /// Dragging up past the threshold (`dy < -threshold`). Horizontal
    /// movement to the left alone never commits.
    #[default]
    VerticalUp,
    /// Dragging left past the threshold (`dx < -threshold`).
    Horizontal,
}

/// Classifies a released drag. RIGHT is checked first; comparisons are
/// strict, so a release exactly on the threshold resets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeClassifier {
    threshold: f32,
    left_rule: LeftSwipeRule,
}

impl SwipeClassifier {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            left_rule: LeftSwipeRule::default(),
        }
    }

    pub fn for_viewport(viewport_width: f32) -> Self {
        Self::new(swipe_threshold(viewport_width))
    }

    pub fn with_left_rule(mut self, left_rule: LeftSwipeRule) -> Self {
        self.left_rule = left_rule;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn left_rule(&self) -> LeftSwipeRule {
        self.left_rule
    }

    pub fn classify(&self, dx: f32, dy: f32) -> SwipeDecision {
        if dx > self.threshold {
            return SwipeDecision::Commit(SwipeDirection::Right);
        }
        let left = match self.left_rule {
            LeftSwipeRule::VerticalUp => dy < -self.threshold,
            LeftSwipeRule::Horizontal => dx < -self.threshold,
        };
        if left {
            SwipeDecision::Commit(SwipeDirection::Left)
        } else {
            SwipeDecision::Reset
        }
    }
}
