//! Deck state record and its transitions.
//!
//! The record is plain data; every transition takes the current record and
//! returns the next one, or `None` when the transition is not allowed from
//! the current state.

use swipedeck_foundation::SwipeDirection;

/// What the top card is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckPhase {
    /// At rest.
    #[default]
    Idle,
    /// Following a live drag.
    Dragging,
    /// Springing back to the centre after a release under the threshold.
    Settling,
    /// Flying off screen after a committed swipe. The card no longer accepts
    /// input.
    SwipingOut(SwipeDirection),
}

/// `Active(cursor)` while items remain, `Exhausted` once all are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckStatus {
    Active(usize),
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeckState {
    /// Index of the top card. Items before it have been swiped away.
    pub cursor: usize,
    pub phase: DeckPhase,
}

impl DeckState {
    pub const fn initial() -> Self {
        Self {
            cursor: 0,
            phase: DeckPhase::Idle,
        }
    }

    pub fn status(&self, len: usize) -> DeckStatus {
        if self.cursor < len {
            DeckStatus::Active(self.cursor)
        } else {
            DeckStatus::Exhausted
        }
    }

    /// Whether the top card accepts gestures.
    pub fn is_interactive(&self, len: usize) -> bool {
        self.cursor < len && !matches!(self.phase, DeckPhase::SwipingOut(_))
    }

    pub fn begin_drag(self, len: usize) -> Option<Self> {
        self.is_interactive(len).then_some(Self {
            phase: DeckPhase::Dragging,
            ..self
        })
    }

    pub fn begin_swipe(self, direction: SwipeDirection, len: usize) -> Option<Self> {
        self.is_interactive(len).then_some(Self {
            phase: DeckPhase::SwipingOut(direction),
            ..self
        })
    }

    pub fn begin_reset(self, len: usize) -> Option<Self> {
        self.is_interactive(len).then_some(Self {
            phase: DeckPhase::Settling,
            ..self
        })
    }

    /// The reset spring finished. Only a settling card returns to rest; a
    /// drag that took over in the meantime keeps its phase.
    pub fn settle(self) -> Self {
        match self.phase {
            DeckPhase::Settling => Self {
                phase: DeckPhase::Idle,
                ..self
            },
            _ => self,
        }
    }

    /// The swipe-out animation finished. Returns the next record together
    /// with the index and direction of the item that was swiped.
    pub fn complete_swipe(self, len: usize) -> Option<(Self, usize, SwipeDirection)> {
        match self.phase {
            DeckPhase::SwipingOut(direction) if self.cursor < len => Some((
                Self {
                    cursor: self.cursor + 1,
                    phase: DeckPhase::Idle,
                },
                self.cursor,
                direction,
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
