pub mod drag;
pub mod swipe;

pub use drag::{DragEvent, DragGesture};
pub use swipe::{LeftSwipeRule, SwipeClassifier, SwipeDecision, SwipeDirection};
