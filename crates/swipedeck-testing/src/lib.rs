//! Testing utilities and harness for the swipe deck.
//!
//! [`DeckTestRule`] owns a runtime and a virtual frame clock so animations
//! can be stepped deterministically. The drag helpers in [`input`] feed
//! pointer sequences into a [`swipedeck_ui::Deck`].

pub mod fixtures;
pub mod input;
pub mod rule;

pub use fixtures::{test_cards, TestCard};
pub use input::{drag_and_release, drag_by, DragScript};
pub use rule::{DeckTestRule, FRAME_NANOS};

pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::input::*;
    pub use crate::rule::*;
}
