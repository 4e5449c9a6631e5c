use std::rc::Rc;

use swipedeck_animation::PositionTracker;
use swipedeck_foundation::{SwipeClassifier, SwipeDecision};

/// Maps a drag session onto the top card's position and classifies the
/// release.
///
/// Holds no state between sessions; the position tracker is borrowed for
/// writes during a live drag and is owned by the deck.
#[derive(Clone)]
pub struct SwipeGestureController {
    classifier: SwipeClassifier,
    position: Rc<dyn PositionTracker>,
}

impl SwipeGestureController {
    pub fn new(classifier: SwipeClassifier, position: Rc<dyn PositionTracker>) -> Self {
        Self {
            classifier,
            position,
        }
    }

    pub fn classifier(&self) -> &SwipeClassifier {
        &self.classifier
    }

    /// The top card is always draggable.
    pub fn on_drag_start(&self) -> bool {
        true
    }

    /// `dx`/`dy` are cumulative offsets from the drag start.
    pub fn on_drag_move(&self, dx: f32, dy: f32) {
        self.position.set_offset(dx, dy);
    }

    pub fn on_drag_end(&self, dx: f32, dy: f32) -> SwipeDecision {
        let decision = self.classifier.classify(dx, dy);
        log::debug!(
            "drag released at ({dx}, {dy}), threshold {}: {decision:?}",
            self.classifier.threshold()
        );
        decision
    }
}

impl std::fmt::Debug for SwipeGestureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwipeGestureController")
            .field("classifier", &self.classifier)
            .finish()
    }
}
