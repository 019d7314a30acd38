/// Input event types the engine understands.
/// Gestures are already recognized by the host; the engine only sees results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A tap/click at normalized device coordinates (x right, y up, -1..1).
    PointerTap { x: f32, y: f32 },
    /// A one-finger or mouse drag, delta in pixels.
    DragRotate { dx: f32, dy: f32 },
    /// A pinch or wheel step as a relative factor (> 1 zooms in).
    PinchScale { scale: f32 },
    /// A drag or pinch gesture started.
    GestureStart,
    /// The active gesture ended.
    GestureEnd,
    /// A custom event from the UI layer (sliders, buttons, etc.).
    /// `kind` identifies the event type; `a`, `b`, `c` carry arbitrary data.
    Custom { kind: u32, a: f32, b: f32, c: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    /// Push a new input event (called from JS via wasm-bindgen).
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_keeps_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::GestureStart);
        q.push(InputEvent::DragRotate { dx: 4.0, dy: -2.0 });
        q.push(InputEvent::GestureEnd);
        assert_eq!(q.len(), 3);
        let events = q.drain();
        assert_eq!(events[0], InputEvent::GestureStart);
        assert_eq!(events[2], InputEvent::GestureEnd);
        assert!(q.is_empty());
    }

    #[test]
    fn custom_event() {
        let mut q = InputQueue::new();
        q.push(InputEvent::Custom { kind: 6, a: 45.0, b: 0.0, c: 0.0 });
        let first = q.iter().next();
        match first {
            Some(InputEvent::Custom { kind, a, .. }) => {
                assert_eq!(*kind, 6);
                assert_eq!(*a, 45.0);
            }
            other => panic!("Expected Custom event, got {:?}", other),
        }
    }
}
