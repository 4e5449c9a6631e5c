//! Single-pointer drag recogniser.
//!
//! Turns raw pointer events into a drag session with offsets measured from
//! the press position. Only one pointer is tracked at a time; events from
//! other pointers are ignored until the session ends.

use swipedeck_core::Point;

use crate::pointer::{PointerEvent, PointerEventKind, PointerId};

/// Drag session events. Offsets are cumulative from the press position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Started,
    Moved { dx: f32, dy: f32 },
    Ended { dx: f32, dy: f32 },
    Cancelled { dx: f32, dy: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    pointer: PointerId,
    origin: Point,
    last: Point,
}

impl ActiveDrag {
    fn offset_to(&self, position: Point) -> (f32, f32) {
        let delta = position - self.origin;
        (delta.x, delta.y)
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    active: Option<ActiveDrag>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Current cumulative offset of the live session.
    pub fn offset(&self) -> Option<(f32, f32)> {
        self.active.map(|drag| drag.offset_to(drag.last))
    }

    /// Feed one pointer event. Events that advance the session are consumed.
    pub fn on_pointer_event(&mut self, event: &PointerEvent) -> Option<DragEvent> {
        let drag_event = match (event.kind, self.active) {
            (PointerEventKind::Down, None) => {
                self.active = Some(ActiveDrag {
                    pointer: event.id,
                    origin: event.position,
                    last: event.position,
                });
                Some(DragEvent::Started)
            }
            (PointerEventKind::Down, Some(active)) => {
                if active.pointer != event.id {
                    log::debug!(
                        "ignoring pointer {} while pointer {} is dragging",
                        event.id,
                        active.pointer
                    );
                }
                None
            }
            (PointerEventKind::Move, Some(mut active)) if active.pointer == event.id => {
                active.last = event.position;
                self.active = Some(active);
                let (dx, dy) = active.offset_to(event.position);
                Some(DragEvent::Moved { dx, dy })
            }
            (PointerEventKind::Up, Some(active)) if active.pointer == event.id => {
                self.active = None;
                let (dx, dy) = active.offset_to(event.position);
                Some(DragEvent::Ended { dx, dy })
            }
            (PointerEventKind::Cancel, Some(active)) if active.pointer == event.id => {
                self.active = None;
                let (dx, dy) = active.offset_to(active.last);
                Some(DragEvent::Cancelled { dx, dy })
            }
            _ => None,
        };
        if drag_event.is_some() {
            event.consume();
        }
        drag_event
    }

    pub fn reset(&mut self) {
        self.active = None;
    }
}
