//! Scripted deck session used by the `deck-demo` binary.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context};
use swipedeck_core::Point;
use swipedeck_foundation::PointerEvent;
use swipedeck_runtime_std::StdRuntime;
use swipedeck_ui::{CardPlacement, Deck, DeckFrame, DeckItem, SwipeDirection};
use web_time::Instant;

/// Wall-clock budget for one settle before a session is considered stuck.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct DemoCard {
    pub id: u32,
    pub text: &'static str,
    pub uri: &'static str,
}

impl DeckItem for DemoCard {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

pub fn demo_cards() -> Vec<DemoCard> {
    vec![
        DemoCard {
            id: 1,
            text: "Card #1",
            uri: "https://picsum.photos/id/10/300/200",
        },
        DemoCard {
            id: 2,
            text: "Card #2",
            uri: "https://picsum.photos/id/20/300/200",
        },
        DemoCard {
            id: 3,
            text: "Card #3",
            uri: "https://picsum.photos/id/30/300/200",
        },
        DemoCard {
            id: 4,
            text: "Card #4",
            uri: "https://picsum.photos/id/40/300/200",
        },
    ]
}

/// One scripted pointer drag from the middle of the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedDrag {
    pub dx: f32,
    pub dy: f32,
    pub steps: usize,
}

impl ScriptedDrag {
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy, steps: 8 }
    }
}

/// Right swipe, a release that springs back, an upward swipe, then another
/// right swipe and one against the empty deck.
pub fn default_script(viewport_width: f32) -> Vec<ScriptedDrag> {
    let far = viewport_width * 0.4;
    vec![
        ScriptedDrag::new(far, 10.0),
        ScriptedDrag::new(far * 0.3, -far * 0.2),
        ScriptedDrag::new(-20.0, -far),
        ScriptedDrag::new(far, 0.0),
        ScriptedDrag::new(far, 0.0),
        ScriptedDrag::new(far, 0.0),
    ]
}

pub struct DemoSession {
    runtime: StdRuntime,
    deck: Deck<DemoCard, String>,
    swipes: Rc<RefCell<Vec<(SwipeDirection, u32)>>>,
    frame_interval: Duration,
    viewport_width: f32,
}

impl DemoSession {
    pub fn new(viewport_width: f32, frame_interval: Duration) -> anyhow::Result<Self> {
        let runtime = StdRuntime::new();
        let swipes = Rc::new(RefCell::new(Vec::new()));
        let record = |direction: SwipeDirection| {
            let swipes = Rc::clone(&swipes);
            move |card: &DemoCard| {
                log::info!("swiped {direction}: {}", card.text);
                swipes.borrow_mut().push((direction, card.id));
            }
        };
        let deck = Deck::builder(demo_cards())
            .viewport_width(viewport_width)
            .render_card(|card: &DemoCard| format!("{} <{}>", card.text, card.uri))
            .render_exhausted(|| "All done! There's no more content here.".to_string())
            .on_swipe_right(record(SwipeDirection::Right))
            .on_swipe_left(record(SwipeDirection::Left))
            .build(&runtime.runtime().handle())
            .context("building demo deck")?;
        Ok(Self {
            runtime,
            deck,
            swipes,
            frame_interval,
            viewport_width,
        })
    }

    pub fn deck(&self) -> &Deck<DemoCard, String> {
        &self.deck
    }

    pub fn swipes(&self) -> Vec<(SwipeDirection, u32)> {
        self.swipes.borrow().clone()
    }

    /// Press, move and release. Returns whether the deck took the gesture.
    pub fn perform(&self, drag: ScriptedDrag) -> bool {
        let origin = Point::new(self.viewport_width / 2.0, self.viewport_width / 2.0);
        if !self
            .deck
            .on_pointer_event(&PointerEvent::down(origin.x, origin.y))
        {
            log::info!("drag ({}, {}) ignored", drag.dx, drag.dy);
            return false;
        }
        let steps = drag.steps.max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            self.deck.on_pointer_event(&PointerEvent::moved(
                origin.x + drag.dx * t,
                origin.y + drag.dy * t,
            ));
        }
        self.deck.on_pointer_event(&PointerEvent::up(
            origin.x + drag.dx,
            origin.y + drag.dy,
        ))
    }

    /// Pump wall-clock frames until the runtime goes idle. Returns the number
    /// of frames pumped.
    pub fn run_until_idle(&self) -> anyhow::Result<usize> {
        let started = Instant::now();
        let mut frames = 0;
        while !self.runtime.is_idle() {
            if started.elapsed() > SETTLE_TIMEOUT {
                bail!("deck still animating after {frames} frames");
            }
            let frame_start = Instant::now();
            self.runtime.pump_frame();
            frames += 1;
            std::thread::sleep(self.frame_interval.saturating_sub(frame_start.elapsed()));
        }
        Ok(frames)
    }

    /// Run every drag in `script`, settling between them. Returns a
    /// description of the deck after each step.
    pub fn run_script(&self, script: &[ScriptedDrag]) -> anyhow::Result<Vec<String>> {
        let mut frames = Vec::with_capacity(script.len());
        for (index, drag) in script.iter().enumerate() {
            let accepted = self.perform(*drag);
            let pumped = self
                .run_until_idle()
                .with_context(|| format!("settling step {}", index + 1))?;
            log::debug!("step {} accepted={accepted} frames={pumped}", index + 1);
            frames.push(describe_frame(&self.deck.render()));
        }
        Ok(frames)
    }
}

/// Text rendering of a frame, one card per line in paint order.
pub fn describe_frame(frame: &DeckFrame<u32, String>) -> String {
    match frame {
        DeckFrame::Exhausted(node) => node.clone(),
        DeckFrame::Cards(cards) => {
            let mut out = String::new();
            for card in cards {
                let placement = match card.placement {
                    CardPlacement::Top(layout) => format!(
                        "top x={:.1} y={:.1} rot={:.1}",
                        layout.x, layout.y, layout.rotation_degrees
                    ),
                    CardPlacement::Stacked { top } => format!("stacked top={top:.0}"),
                };
                let _ = writeln!(out, "[z={}] {} ({placement})", card.z_index, card.node);
            }
            out
        }
    }
}
