use crate::core::Point;

/// Kind of a pointer event delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer (mouse or touch) event in viewport CSS-pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub pos: Point,
    /// Host-supplied event time in milliseconds. Carried for diagnostics;
    /// the engines themselves are frame-clocked.
    pub timestamp_ms: f64,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self {
            kind: PointerKind::Down,
            pos: Point::new(x, y),
            timestamp_ms,
        }
    }

    pub fn moved(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            pos: Point::new(x, y),
            timestamp_ms,
        }
    }

    pub fn up(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self {
            kind: PointerKind::Up,
            pos: Point::new(x, y),
            timestamp_ms,
        }
    }
}

/// FIFO buffer decoupling asynchronous host input callbacks from the frame
/// tick. Events are appended as they arrive and drained once per frame; no
/// engine ever renders from inside an input handler.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<PointerEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ev: PointerEvent) {
        self.events.push(ev);
    }

    /// Remove and yield all buffered events in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = PointerEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_arrival_order() {
        let mut q = InputQueue::new();
        q.push(PointerEvent::down(1.0, 2.0, 0.0));
        q.push(PointerEvent::moved(3.0, 4.0, 8.0));
        q.push(PointerEvent::up(3.0, 4.0, 16.0));
        let kinds: Vec<_> = q.drain().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![PointerKind::Down, PointerKind::Move, PointerKind::Up]
        );
        assert!(q.is_empty());
    }

    #[test]
    fn drain_on_empty_queue_yields_nothing() {
        let mut q = InputQueue::new();
        assert_eq!(q.drain().count(), 0);
    }
}
