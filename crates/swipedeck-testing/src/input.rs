//! Pointer scripts for driving a deck.

use swipedeck_core::Point;
use swipedeck_foundation::PointerEvent;
use swipedeck_ui::{Deck, DeckItem};

/// A press, a series of moves and an optional release, in deck coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DragScript {
    pub start: Point,
    pub end: Point,
    pub steps: usize,
    pub release: bool,
}

impl DragScript {
    /// Drag from `start` by `(dx, dy)` in ten even steps, then release.
    pub fn new(start: Point, dx: f32, dy: f32) -> Self {
        Self {
            start,
            end: start + Point::new(dx, dy),
            steps: 10,
            release: true,
        }
    }

    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = steps.max(1);
        self
    }

    /// Keep the pointer down at the end of the script.
    pub fn hold(mut self) -> Self {
        self.release = false;
        self
    }

    pub fn events(&self) -> Vec<PointerEvent> {
        let mut events = Vec::with_capacity(self.steps + 2);
        events.push(PointerEvent::down(self.start.x, self.start.y));
        let delta = self.end - self.start;
        for step in 1..=self.steps {
            let t = step as f32 / self.steps as f32;
            events.push(PointerEvent::moved(
                self.start.x + delta.x * t,
                self.start.y + delta.y * t,
            ));
        }
        if self.release {
            events.push(PointerEvent::up(self.end.x, self.end.y));
        }
        events
    }

    /// Send the script to `deck`. Returns how many events it consumed.
    pub fn perform<T: DeckItem + 'static, N>(&self, deck: &Deck<T, N>) -> usize {
        let consumed = self
            .events()
            .iter()
            .filter(|event| deck.on_pointer_event(event))
            .count();
        log::trace!(
            "drag {:?} -> {:?}: {consumed} events consumed",
            self.start,
            self.end
        );
        consumed
    }
}

/// Press the top card and drag it by `(dx, dy)` without releasing.
pub fn drag_by<T: DeckItem + 'static, N>(deck: &Deck<T, N>, dx: f32, dy: f32) -> usize {
    DragScript::new(Point::ZERO, dx, dy).hold().perform(deck)
}

/// Drag the top card by `(dx, dy)` and let go.
pub fn drag_and_release<T: DeckItem + 'static, N>(deck: &Deck<T, N>, dx: f32, dy: f32) -> usize {
    DragScript::new(Point::ZERO, dx, dy).perform(deck)
}
