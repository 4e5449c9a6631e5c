//! Pointer input types and the swipe gesture recognisers built on them.

pub mod gesture_constants;
pub mod gestures;
pub mod pointer;

pub use gestures::{
    DragEvent, DragGesture, LeftSwipeRule, SwipeClassifier, SwipeDecision, SwipeDirection,
};
pub use pointer::{
    PointerButton, PointerButtons, PointerEvent, PointerEventKind, PointerId, PointerPhase,
};
