use super::*;

use std::cell::Cell;

use swipedeck_animation::Easing;
use swipedeck_core::Runtime;

use crate::render::CardPlacement;

#[derive(Debug, Clone, PartialEq)]
struct Card {
    id: u32,
    name: &'static str,
}

impl DeckItem for Card {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

fn card(id: u32, name: &'static str) -> Card {
    Card { id, name }
}

type PendingAnimation = (Point, AnimationType, Box<dyn FnOnce()>);

/// Tracker whose animations only finish when the test says so.
#[derive(Default)]
struct ManualTracker {
    offset: Cell<Point>,
    pending: RefCell<Option<PendingAnimation>>,
}

impl ManualTracker {
    fn pending_target(&self) -> Option<(Point, AnimationType)> {
        self.pending
            .borrow()
            .as_ref()
            .map(|(target, animation, _)| (*target, *animation))
    }

    fn finish(&self) -> bool {
        let pending = self.pending.borrow_mut().take();
        match pending {
            Some((target, _, on_complete)) => {
                self.offset.set(target);
                on_complete();
                true
            }
            None => false,
        }
    }
}

impl PositionTracker for ManualTracker {
    fn set_offset(&self, dx: f32, dy: f32) {
        self.pending.borrow_mut().take();
        self.offset.set(Point::new(dx, dy));
    }

    fn animate_to(
        &self,
        target: Point,
        animation: AnimationType,
        on_complete: Box<dyn FnOnce() + 'static>,
    ) {
        *self.pending.borrow_mut() = Some((target, animation, on_complete));
    }

    fn offset(&self) -> Point {
        self.offset.get()
    }

    fn is_animating(&self) -> bool {
        self.pending.borrow().is_some()
    }

    fn rotation_for(&self, x: f32) -> f32 {
        x / 10.0
    }
}

#[derive(Default)]
struct Swipes {
    right: RefCell<Vec<u32>>,
    left: RefCell<Vec<u32>>,
}

struct Fixture {
    _runtime: Runtime,
    deck: Deck<Card, String>,
    tracker: Rc<ManualTracker>,
    swipes: Rc<Swipes>,
}

fn fixture_with(
    items: Vec<Card>,
    configure: impl FnOnce(DeckBuilder<Card, String>) -> DeckBuilder<Card, String>,
) -> Fixture {
    let runtime = Runtime::default();
    let tracker = Rc::new(ManualTracker::default());
    let swipes = Rc::new(Swipes::default());
    let builder = Deck::builder(items)
        .viewport_width(400.0)
        .render_card(|card: &Card| card.name.to_string())
        .render_exhausted(|| "no more cards".to_string())
        .on_swipe_right({
            let swipes = Rc::clone(&swipes);
            move |card: &Card| swipes.right.borrow_mut().push(card.id)
        })
        .on_swipe_left({
            let swipes = Rc::clone(&swipes);
            move |card: &Card| swipes.left.borrow_mut().push(card.id)
        })
        .position_tracker(tracker.clone());
    let deck = configure(builder)
        .build(&runtime.handle())
        .expect("valid deck");
    Fixture {
        _runtime: runtime,
        deck,
        tracker,
        swipes,
    }
}

fn fixture(items: Vec<Card>) -> Fixture {
    fixture_with(items, |builder| builder)
}

fn two_cards() -> Vec<Card> {
    vec![card(1, "A"), card(2, "B")]
}

#[test]
fn release_past_threshold_swipes_right() {
    let f = fixture(two_cards());

    assert!(f.deck.on_drag_start());
    f.deck.on_drag_move(150.0, 0.0);
    assert_eq!(f.deck.layout().x, 150.0);
    assert_eq!(
        f.deck.on_drag_end(150.0, 0.0),
        Some(SwipeDecision::Commit(SwipeDirection::Right))
    );

    assert_eq!(
        f.tracker.pending_target(),
        Some((
            Point::new(400.0, 0.0),
            AnimationType::Tween(AnimationSpec::linear(250))
        ))
    );
    assert!(!f.deck.is_interactive());
    assert!(f.swipes.right.borrow().is_empty(), "callback waits for the animation");
    assert_eq!(f.deck.cursor(), 0);

    assert!(f.tracker.finish());

    assert_eq!(f.swipes.right.borrow().as_slice(), &[1]);
    assert!(f.swipes.left.borrow().is_empty());
    assert_eq!(f.deck.cursor(), 1);
    assert_eq!(f.deck.layout(), CardLayout::default());
    assert_eq!(f.deck.current_key(), Some(2));

    let frame = f.deck.render();
    assert_eq!(frame.keys(), vec![&2]);
    let top = frame.top().expect("B on top");
    assert_eq!(top.placement, CardPlacement::Top(CardLayout::default()));
    assert!(top.interactive);
    assert_eq!(top.node, "B");
}

#[test]
fn upward_release_swipes_left() {
    let f = fixture(two_cards());

    f.deck.on_drag_start();
    f.deck.on_drag_move(-20.0, -130.0);
    assert_eq!(
        f.deck.on_drag_end(-20.0, -130.0),
        Some(SwipeDecision::Commit(SwipeDirection::Left))
    );
    assert_eq!(
        f.tracker.pending_target().map(|(target, _)| target),
        Some(Point::new(-400.0, 0.0))
    );
    f.tracker.finish();

    assert_eq!(f.swipes.left.borrow().as_slice(), &[1]);
    assert!(f.swipes.right.borrow().is_empty());
    assert_eq!(f.deck.cursor(), 1);
}

#[test]
fn leftward_release_resets_by_default() {
    let f = fixture(two_cards());

    f.deck.on_drag_start();
    f.deck.on_drag_move(-300.0, 0.0);
    assert_eq!(f.deck.on_drag_end(-300.0, 0.0), Some(SwipeDecision::Reset));
    f.tracker.finish();

    assert_eq!(f.deck.cursor(), 0);
    assert!(f.swipes.left.borrow().is_empty());
}

#[test]
fn horizontal_rule_swipes_left_on_leftward_release() {
    let f = fixture_with(two_cards(), |builder| {
        builder.left_swipe_rule(LeftSwipeRule::Horizontal)
    });

    f.deck.on_drag_start();
    assert_eq!(
        f.deck.on_drag_end(-300.0, 0.0),
        Some(SwipeDecision::Commit(SwipeDirection::Left))
    );
    f.tracker.finish();
    assert_eq!(f.swipes.left.borrow().as_slice(), &[1]);
}

#[test]
fn short_release_springs_back_without_callback() {
    let f = fixture(two_cards());

    f.deck.on_drag_start();
    f.deck.on_drag_move(60.0, -40.0);
    assert_eq!(f.deck.on_drag_end(60.0, -40.0), Some(SwipeDecision::Reset));

    assert_eq!(f.deck.phase(), DeckPhase::Settling);
    assert!(f.deck.is_interactive());
    assert_eq!(
        f.tracker.pending_target(),
        Some((Point::ZERO, AnimationType::Spring(SpringSpec::default())))
    );

    f.tracker.finish();
    assert_eq!(f.deck.phase(), DeckPhase::Idle);
    assert_eq!(f.deck.cursor(), 0);
    assert_eq!(f.deck.layout().x, 0.0);
    assert!(f.swipes.right.borrow().is_empty());
    assert!(f.swipes.left.borrow().is_empty());
}

#[test]
fn threshold_is_strict() {
    let f = fixture(two_cards());
    f.deck.on_drag_start();
    assert_eq!(f.deck.on_drag_end(100.0, -100.0), Some(SwipeDecision::Reset));
}

#[test]
fn exhausted_deck_renders_placeholder_and_ignores_input() {
    let f = fixture(two_cards());

    for _ in 0..2 {
        f.deck.on_drag_start();
        f.deck.on_drag_end(200.0, 0.0);
        f.tracker.finish();
    }

    assert!(f.deck.is_exhausted());
    assert_eq!(f.deck.status(), DeckStatus::Exhausted);
    assert_eq!(
        f.deck.render(),
        DeckFrame::Exhausted("no more cards".to_string())
    );
    assert_eq!(f.swipes.right.borrow().as_slice(), &[1, 2]);

    assert!(!f.deck.on_drag_start());
    assert_eq!(f.deck.on_drag_end(200.0, 0.0), None);
    assert!(!f.deck.commit_swipe(SwipeDirection::Left));
    assert!(!f.deck.reset_to_center());
    let press = PointerEvent::down(10.0, 10.0);
    assert!(!f.deck.on_pointer_event(&press));
    assert!(!press.is_consumed());
    assert!(!f.tracker.finish());
    assert_eq!(f.swipes.right.borrow().len(), 2);
    assert!(f.swipes.left.borrow().is_empty());
}

#[test]
fn empty_sequence_is_exhausted_from_the_start() {
    let f = fixture(Vec::new());
    assert!(f.deck.is_empty());
    assert!(f.deck.render().is_exhausted());
    assert_eq!(f.deck.current_key(), None);
}

#[test]
fn swiping_card_rejects_new_gestures() {
    let f = fixture(two_cards());

    assert!(f.deck.commit_swipe(SwipeDirection::Right));
    assert!(!f.deck.commit_swipe(SwipeDirection::Left));
    assert!(!f.deck.on_drag_start());
    assert!(!f.deck.reset_to_center());

    let press = PointerEvent::down(0.0, 0.0);
    assert!(!f.deck.on_pointer_event(&press));
    assert!(!press.is_consumed());

    let frame = f.deck.render();
    assert!(frame.cards().iter().all(|card| !card.interactive));

    f.tracker.finish();
    assert_eq!(f.swipes.right.borrow().as_slice(), &[1]);
    assert!(f.swipes.left.borrow().is_empty());
}

#[test]
fn pointer_events_drive_the_drag() {
    let f = fixture(two_cards());

    let press = PointerEvent::down(200.0, 300.0);
    assert!(f.deck.on_pointer_event(&press));
    assert!(press.is_consumed());
    assert_eq!(f.deck.phase(), DeckPhase::Dragging);

    assert!(f.deck.on_pointer_event(&PointerEvent::moved(260.0, 310.0)));
    assert_eq!(f.tracker.offset(), Point::new(60.0, 10.0));
    assert_eq!(f.deck.layout().rotation_degrees, 6.0);

    assert!(f.deck.on_pointer_event(&PointerEvent::up(380.0, 310.0)));
    assert_eq!(f.deck.phase(), DeckPhase::SwipingOut(SwipeDirection::Right));
    f.tracker.finish();
    assert_eq!(f.swipes.right.borrow().as_slice(), &[1]);
}

#[test]
fn cancelled_pointer_session_resets() {
    let f = fixture(two_cards());

    f.deck.on_pointer_event(&PointerEvent::down(0.0, 0.0));
    f.deck.on_pointer_event(&PointerEvent::moved(300.0, 0.0));
    assert!(f.deck.on_pointer_event(&PointerEvent::cancel(300.0, 0.0)));

    assert_eq!(f.deck.phase(), DeckPhase::Settling);
    assert_eq!(
        f.tracker.pending_target().map(|(target, _)| target),
        Some(Point::ZERO)
    );
    f.tracker.finish();
    assert!(f.swipes.right.borrow().is_empty());
    assert_eq!(f.deck.cursor(), 0);
}

#[test]
fn stacked_render_offsets_follow_depth() {
    let f = fixture(vec![card(1, "A"), card(2, "B"), card(3, "C")]);
    f.deck.on_drag_move(30.0, 5.0);

    let frame = f.deck.render();
    let cards = frame.cards();
    assert_eq!(frame.keys(), vec![&3, &2, &1]);
    assert_eq!(cards[0].placement, CardPlacement::Stacked { top: 20.0 });
    assert_eq!(cards[1].placement, CardPlacement::Stacked { top: 10.0 });
    assert_eq!(
        cards[2].placement,
        CardPlacement::Top(CardLayout {
            x: 30.0,
            y: 5.0,
            rotation_degrees: 3.0,
        })
    );
}

#[test]
fn custom_options_are_applied() {
    let f = fixture_with(two_cards(), |builder| {
        builder
            .swipe_out(AnimationSpec::tween(100, Easing::EaseIn))
            .stack_offset_step(4.0)
    });

    assert_eq!(
        f.deck.render().cards()[0].placement,
        CardPlacement::Stacked { top: 4.0 }
    );
    f.deck.commit_swipe(SwipeDirection::Right);
    assert_eq!(
        f.tracker.pending_target().map(|(_, animation)| animation),
        Some(AnimationType::Tween(AnimationSpec::tween(100, Easing::EaseIn)))
    );
}

#[test]
fn callback_can_read_the_deck_state() {
    let runtime = Runtime::default();
    let tracker = Rc::new(ManualTracker::default());
    let observed = Rc::new(Cell::new(None));
    let deck: Rc<RefCell<Option<Rc<Deck<Card, String>>>>> = Rc::new(RefCell::new(None));

    let built = Deck::builder(two_cards())
        .viewport_width(400.0)
        .render_card(|card: &Card| card.name.to_string())
        .render_exhausted(String::new)
        .on_swipe_right({
            let deck = Rc::clone(&deck);
            let observed = Rc::clone(&observed);
            move |_: &Card| {
                if let Some(deck) = deck.borrow().as_ref() {
                    observed.set(Some((deck.cursor(), deck.render().keys().len())));
                }
            }
        })
        .position_tracker(tracker.clone())
        .build(&runtime.handle())
        .map(Rc::new)
        .expect("valid deck");
    *deck.borrow_mut() = Some(Rc::clone(&built));

    built.commit_swipe(SwipeDirection::Right);
    tracker.finish();

    assert_eq!(observed.get(), Some((0, 2)));
    assert_eq!(built.cursor(), 1);
    deck.borrow_mut().take();
}

#[test]
fn builder_rejects_contract_violations() {
    let runtime = Runtime::default();
    let handle = runtime.handle();

    let missing_card = Deck::<Card, ()>::builder(two_cards())
        .viewport_width(400.0)
        .render_exhausted(|| ())
        .build(&handle);
    assert_eq!(missing_card.err(), Some(DeckError::MissingCardRenderer));

    let missing_exhausted = Deck::<Card, ()>::builder(two_cards())
        .viewport_width(400.0)
        .render_card(|_| ())
        .build(&handle);
    assert_eq!(missing_exhausted.err(), Some(DeckError::MissingExhaustedRenderer));

    let missing_width = Deck::<Card, ()>::builder(two_cards())
        .render_card(|_| ())
        .render_exhausted(|| ())
        .build(&handle);
    assert_eq!(missing_width.err(), Some(DeckError::MissingViewportWidth));

    let zero_width = Deck::<Card, ()>::builder(two_cards())
        .viewport_width(0.0)
        .render_card(|_| ())
        .render_exhausted(|| ())
        .build(&handle);
    assert_eq!(zero_width.err(), Some(DeckError::InvalidViewportWidth(0.0)));

    let duplicate = Deck::<Card, ()>::builder(vec![card(1, "A"), card(1, "A again")])
        .viewport_width(400.0)
        .render_card(|_| ())
        .render_exhausted(|| ())
        .build(&handle);
    let error = duplicate.err().expect("duplicate keys rejected");
    assert_eq!(error, DeckError::DuplicateKey("1".to_string()));
    assert_eq!(error.to_string(), "item key 1 appears more than once");
}

#[test]
fn callbacks_default_to_no_ops() {
    let runtime = Runtime::default();
    let tracker = Rc::new(ManualTracker::default());
    let deck = Deck::builder(two_cards())
        .viewport_width(400.0)
        .render_card(|card: &Card| card.id)
        .render_exhausted(|| 0)
        .position_tracker(tracker.clone())
        .build(&runtime.handle())
        .expect("valid deck");

    deck.commit_swipe(SwipeDirection::Left);
    tracker.finish();
    assert_eq!(deck.cursor(), 1);
    assert_eq!(deck.with_current_item(|card| card.name), Some("B"));
}
