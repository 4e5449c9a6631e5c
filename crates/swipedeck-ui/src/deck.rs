//! The deck state machine.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashSet;
use swipedeck_animation::{
    AnimatedOffset, AnimationSpec, AnimationType, CardLayout, PositionTracker, SpringSpec,
};
use swipedeck_core::{Point, RuntimeHandle};
use swipedeck_foundation::{
    DragEvent, DragGesture, LeftSwipeRule, PointerEvent, SwipeClassifier, SwipeDecision,
    SwipeDirection,
};

use crate::error::DeckError;
use crate::gesture_controller::SwipeGestureController;
use crate::item::DeckItem;
use crate::options::DeckOptions;
use crate::render::{project_cards, DeckFrame};
use crate::state::{DeckPhase, DeckState, DeckStatus};

type SwipeCallback<T> = Rc<dyn Fn(&T) + 'static>;
type CardRenderer<T, N> = Box<dyn Fn(&T) -> N + 'static>;
type ExhaustedRenderer<N> = Box<dyn Fn() -> N + 'static>;

/// State shared with animation completions.
struct DeckShared<T> {
    items: Rc<[T]>,
    state: DeckState,
}

struct SwipeCallbacks<T> {
    on_swipe_right: SwipeCallback<T>,
    on_swipe_left: SwipeCallback<T>,
}

impl<T> SwipeCallbacks<T> {
    fn for_direction(&self, direction: SwipeDirection) -> &SwipeCallback<T> {
        match direction {
            SwipeDirection::Right => &self.on_swipe_right,
            SwipeDirection::Left => &self.on_swipe_left,
        }
    }
}

/// Swipeable stack of items.
///
/// The deck owns the cursor and the top card's position. Gestures arrive
/// either as raw pointer events ([`Deck::on_pointer_event`]) or as an
/// already-recognised drag ([`Deck::on_drag_start`] and friends).
pub struct Deck<T: DeckItem + 'static, N> {
    shared: Rc<RefCell<DeckShared<T>>>,
    callbacks: Rc<SwipeCallbacks<T>>,
    render_card: CardRenderer<T, N>,
    render_exhausted: ExhaustedRenderer<N>,
    position: Rc<dyn PositionTracker>,
    controller: SwipeGestureController,
    drag: RefCell<DragGesture>,
    options: DeckOptions,
}

impl<T: DeckItem + 'static, N> Deck<T, N> {
    pub fn builder(items: impl IntoIterator<Item = T>) -> DeckBuilder<T, N> {
        DeckBuilder::new(items)
    }

    pub fn options(&self) -> &DeckOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.shared.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn state(&self) -> DeckState {
        self.shared.borrow().state
    }

    pub fn cursor(&self) -> usize {
        self.state().cursor
    }

    pub fn phase(&self) -> DeckPhase {
        self.state().phase
    }

    pub fn status(&self) -> DeckStatus {
        let shared = self.shared.borrow();
        shared.state.status(shared.items.len())
    }

    pub fn is_exhausted(&self) -> bool {
        self.status() == DeckStatus::Exhausted
    }

    /// Whether the top card currently accepts gestures.
    pub fn is_interactive(&self) -> bool {
        let shared = self.shared.borrow();
        shared.state.is_interactive(shared.items.len())
    }

    /// Key of the item on top, if any.
    pub fn current_key(&self) -> Option<T::Key> {
        let shared = self.shared.borrow();
        shared.items.get(shared.state.cursor).map(T::key)
    }

    /// Run `f` with the item on top, if any.
    pub fn with_current_item<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let (items, cursor) = {
            let shared = self.shared.borrow();
            (Rc::clone(&shared.items), shared.state.cursor)
        };
        items.get(cursor).map(f)
    }

    /// Live offset and rotation of the top card.
    pub fn layout(&self) -> CardLayout {
        self.position.current_layout()
    }

    pub fn position(&self) -> &Rc<dyn PositionTracker> {
        &self.position
    }

    /// Feed a raw pointer event. Returns whether the deck used it; events
    /// are ignored while no card is interactive.
    pub fn on_pointer_event(&self, event: &PointerEvent) -> bool {
        if !self.is_interactive() {
            self.drag.borrow_mut().reset();
            return false;
        }
        let drag_event = self.drag.borrow_mut().on_pointer_event(event);
        match drag_event {
            Some(DragEvent::Started) => self.on_drag_start(),
            Some(DragEvent::Moved { dx, dy }) => {
                self.on_drag_move(dx, dy);
                true
            }
            Some(DragEvent::Ended { dx, dy }) => self.on_drag_end(dx, dy).is_some(),
            Some(DragEvent::Cancelled { .. }) => self.on_drag_cancel(),
            None => false,
        }
    }

    /// Start a drag session on the top card.
    pub fn on_drag_start(&self) -> bool {
        if !self.transition(|state, len| state.begin_drag(len)) {
            return false;
        }
        self.controller.on_drag_start()
    }

    /// Follow the drag; offsets are cumulative from the drag start.
    pub fn on_drag_move(&self, dx: f32, dy: f32) {
        if self.phase() != DeckPhase::Dragging && !self.on_drag_start() {
            return;
        }
        self.controller.on_drag_move(dx, dy);
    }

    /// Release the drag. Returns the decision, or `None` if no card could
    /// take the gesture.
    pub fn on_drag_end(&self, dx: f32, dy: f32) -> Option<SwipeDecision> {
        if !self.is_interactive() {
            return None;
        }
        let decision = self.controller.on_drag_end(dx, dy);
        match decision {
            SwipeDecision::Commit(direction) => self.commit_swipe(direction),
            SwipeDecision::Reset => self.reset_to_center(),
        };
        Some(decision)
    }

    /// An interrupted session puts the card back without classifying it.
    pub fn on_drag_cancel(&self) -> bool {
        log::debug!("drag cancelled; returning card to centre");
        self.reset_to_center()
    }

    /// Send the top card off screen in `direction`.
    ///
    /// The card stops being interactive immediately. Once the animation
    /// finishes, the matching swipe callback receives the item, the position
    /// returns to the origin and the cursor advances.
    pub fn commit_swipe(&self, direction: SwipeDirection) -> bool {
        if !self.transition(|state, len| state.begin_swipe(direction, len)) {
            log::warn!("swipe {direction} ignored: no interactive card");
            return false;
        }
        self.drag.borrow_mut().reset();
        log::debug!("committing swipe {direction} at cursor {}", self.cursor());

        let target = Point::new(direction.sign() * self.options.viewport_width, 0.0);
        let shared = Rc::downgrade(&self.shared);
        let position = Rc::downgrade(&self.position);
        let callbacks = Rc::clone(&self.callbacks);
        self.position.animate_to(
            target,
            AnimationType::Tween(self.options.swipe_out),
            Box::new(move || finish_swipe(&shared, &position, &callbacks)),
        );
        true
    }

    /// Spring the top card back to the centre. No callback fires and the
    /// cursor stays put.
    pub fn reset_to_center(&self) -> bool {
        if !self.transition(|state, len| state.begin_reset(len)) {
            return false;
        }
        let shared = Rc::downgrade(&self.shared);
        self.position.animate_to(
            Point::ZERO,
            AnimationType::Spring(self.options.reset_spring),
            Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    let mut shared = shared.borrow_mut();
                    shared.state = shared.state.settle();
                }
            }),
        );
        true
    }

    /// Describe what to paint for the current state.
    pub fn render(&self) -> DeckFrame<T::Key, N> {
        let (items, state) = {
            let shared = self.shared.borrow();
            (Rc::clone(&shared.items), shared.state)
        };
        match state.status(items.len()) {
            DeckStatus::Exhausted => DeckFrame::Exhausted((self.render_exhausted)()),
            DeckStatus::Active(cursor) => DeckFrame::Cards(project_cards(
                &items,
                cursor,
                self.position.current_layout(),
                state.is_interactive(items.len()),
                self.options.stack_offset_step,
                |item| (self.render_card)(item),
            )),
        }
    }

    fn transition(&self, step: impl FnOnce(DeckState, usize) -> Option<DeckState>) -> bool {
        let mut shared = self.shared.borrow_mut();
        let len = shared.items.len();
        match step(shared.state, len) {
            Some(next) => {
                shared.state = next;
                true
            }
            None => false,
        }
    }
}

/// Post-commit sequence, run once after the swipe-out animation completes.
fn finish_swipe<T: DeckItem>(
    shared: &Weak<RefCell<DeckShared<T>>>,
    position: &Weak<dyn PositionTracker>,
    callbacks: &SwipeCallbacks<T>,
) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let (items, state) = {
        let shared = shared.borrow();
        (Rc::clone(&shared.items), shared.state)
    };
    let Some((next, consumed, direction)) = state.complete_swipe(items.len()) else {
        log::warn!("swipe-out finished without a swipe in progress");
        return;
    };

    (callbacks.for_direction(direction))(&items[consumed]);
    if let Some(position) = position.upgrade() {
        position.set_offset(0.0, 0.0);
    }
    shared.borrow_mut().state = next;
    log::debug!(
        "swiped {direction} item {:?}; cursor now {} of {}",
        items[consumed].key(),
        next.cursor,
        items.len()
    );
}

impl<T: DeckItem + 'static, N> std::fmt::Debug for Deck<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Deck")
            .field("len", &shared.items.len())
            .field("state", &shared.state)
            .field("options", &self.options)
            .finish()
    }
}

/// Configures and validates a [`Deck`].
pub struct DeckBuilder<T: DeckItem, N> {
    items: Vec<T>,
    viewport_width: Option<f32>,
    on_swipe_right: Option<SwipeCallback<T>>,
    on_swipe_left: Option<SwipeCallback<T>>,
    render_card: Option<CardRenderer<T, N>>,
    render_exhausted: Option<ExhaustedRenderer<N>>,
    left_swipe_rule: LeftSwipeRule,
    swipe_out: Option<AnimationSpec>,
    reset_spring: Option<SpringSpec>,
    stack_offset_step: Option<f32>,
    position_tracker: Option<Rc<dyn PositionTracker>>,
}

impl<T: DeckItem + 'static, N> DeckBuilder<T, N> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            viewport_width: None,
            on_swipe_right: None,
            on_swipe_left: None,
            render_card: None,
            render_exhausted: None,
            left_swipe_rule: LeftSwipeRule::default(),
            swipe_out: None,
            reset_spring: None,
            stack_offset_step: None,
            position_tracker: None,
        }
    }

    /// Width of the viewport, measured once. Sets the swipe threshold, the
    /// off-screen targets and the rotation range.
    pub fn viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = Some(width);
        self
    }

    pub fn on_swipe_right(mut self, callback: impl Fn(&T) + 'static) -> Self {
        self.on_swipe_right = Some(Rc::new(callback));
        self
    }

    pub fn on_swipe_left(mut self, callback: impl Fn(&T) + 'static) -> Self {
        self.on_swipe_left = Some(Rc::new(callback));
        self
    }

    pub fn render_card(mut self, render: impl Fn(&T) -> N + 'static) -> Self {
        self.render_card = Some(Box::new(render));
        self
    }

    pub fn render_exhausted(mut self, render: impl Fn() -> N + 'static) -> Self {
        self.render_exhausted = Some(Box::new(render));
        self
    }

    pub fn left_swipe_rule(mut self, rule: LeftSwipeRule) -> Self {
        self.left_swipe_rule = rule;
        self
    }

    pub fn swipe_out(mut self, spec: AnimationSpec) -> Self {
        self.swipe_out = Some(spec);
        self
    }

    pub fn reset_spring(mut self, spec: SpringSpec) -> Self {
        self.reset_spring = Some(spec);
        self
    }

    pub fn stack_offset_step(mut self, step: f32) -> Self {
        self.stack_offset_step = Some(step);
        self
    }

    /// Replace the frame-clock driven position with another implementation.
    pub fn position_tracker(mut self, tracker: Rc<dyn PositionTracker>) -> Self {
        self.position_tracker = Some(tracker);
        self
    }

    pub fn build(self, runtime: &RuntimeHandle) -> Result<Deck<T, N>, DeckError> {
        let viewport_width = self.viewport_width.ok_or(DeckError::MissingViewportWidth)?;
        if !viewport_width.is_finite() || viewport_width <= 0.0 {
            return Err(DeckError::InvalidViewportWidth(viewport_width));
        }
        let render_card = self.render_card.ok_or(DeckError::MissingCardRenderer)?;
        let render_exhausted = self
            .render_exhausted
            .ok_or(DeckError::MissingExhaustedRenderer)?;

        let mut seen = FxHashSet::default();
        for item in &self.items {
            let key = item.key();
            if !seen.insert(key.clone()) {
                return Err(DeckError::DuplicateKey(format!("{key:?}")));
            }
        }

        let mut options =
            DeckOptions::new(viewport_width).with_left_swipe_rule(self.left_swipe_rule);
        if let Some(spec) = self.swipe_out {
            options = options.with_swipe_out(spec);
        }
        if let Some(spec) = self.reset_spring {
            options = options.with_reset_spring(spec);
        }
        if let Some(step) = self.stack_offset_step {
            options = options.with_stack_offset_step(step);
        }

        let position = self.position_tracker.unwrap_or_else(|| {
            Rc::new(AnimatedOffset::new(runtime.clone(), viewport_width)) as Rc<dyn PositionTracker>
        });
        let classifier =
            SwipeClassifier::new(options.swipe_threshold).with_left_rule(options.left_swipe_rule);
        let controller = SwipeGestureController::new(classifier, Rc::clone(&position));

        let noop: SwipeCallback<T> = Rc::new(|_: &T| {});
        let callbacks = SwipeCallbacks {
            on_swipe_right: self.on_swipe_right.unwrap_or_else(|| Rc::clone(&noop)),
            on_swipe_left: self.on_swipe_left.unwrap_or(noop),
        };

        log::debug!(
            "deck built with {} items, viewport {viewport_width}, threshold {}",
            self.items.len(),
            options.swipe_threshold
        );

        Ok(Deck {
            shared: Rc::new(RefCell::new(DeckShared {
                items: self.items.into(),
                state: DeckState::initial(),
            })),
            callbacks: Rc::new(callbacks),
            render_card,
            render_exhausted,
            position,
            controller,
            drag: RefCell::new(DragGesture::new()),
            options,
        })
    }
}

#[cfg(test)]
#[path = "tests/deck_tests.rs"]
mod tests;
