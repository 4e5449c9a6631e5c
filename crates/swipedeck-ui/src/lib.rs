//! Swipeable card deck.
//!
//! A [`Deck`] shows a sequence of items one at a time. The top card follows
//! the pointer; on release it either flies off screen (committing a swipe,
//! notifying the consumer and advancing to the next item) or springs back to
//! the centre.

mod deck;
mod error;
mod gesture_controller;
mod item;
mod options;
mod render;
mod state;

pub use deck::{Deck, DeckBuilder};
pub use error::DeckError;
pub use gesture_controller::SwipeGestureController;
pub use item::DeckItem;
pub use options::DeckOptions;
pub use render::{project_cards, CardNode, CardPlacement, DeckFrame};
pub use state::{DeckPhase, DeckState, DeckStatus};

pub use swipedeck_animation::{CardLayout, PositionTracker};
pub use swipedeck_foundation::{LeftSwipeRule, SwipeDecision, SwipeDirection};
