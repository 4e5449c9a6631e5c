//! Shared gesture and layout constants for the deck.
//!
//! Distances are in logical pixels.

/// Fraction of the viewport width a release must exceed to commit a swipe.
///
/// The resulting threshold is computed once per deck from the viewport width
/// reported at construction and is not re-read per event.
pub const SWIPE_THRESHOLD_FRACTION: f32 = 0.25;

/// Duration of the off-screen animation after a committed swipe.
pub const SWIPE_OUT_DURATION_MS: u64 = 250;

/// Vertical offset between consecutive stacked cards.
pub const STACK_OFFSET_STEP: f32 = 10.0;

/// Paint priority of the interactive card.
pub const TOP_CARD_Z_INDEX: i32 = 99;

/// Paint priority of the static cards underneath.
pub const STACKED_CARD_Z_INDEX: i32 = 5;

/// Swipe threshold for a viewport of `viewport_width`.
pub fn swipe_threshold(viewport_width: f32) -> f32 {
    viewport_width * SWIPE_THRESHOLD_FRACTION
}
