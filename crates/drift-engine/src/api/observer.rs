//! Typed delivery of [`GlowFrame`]s to whoever reacts to the field.

use std::sync::mpsc::Sender;

use crate::api::types::GlowFrame;

/// Receives one frame per simulation step.
pub trait FrameObserver {
    fn on_frame(&mut self, frame: &GlowFrame);
}

impl<F: FnMut(&GlowFrame)> FrameObserver for F {
    fn on_frame(&mut self, frame: &GlowFrame) {
        self(frame)
    }
}

/// Channel delivery. A dropped receiver is not an error; frames are simply lost.
impl FrameObserver for Sender<GlowFrame> {
    fn on_frame(&mut self, frame: &GlowFrame) {
        let _ = self.send(frame.clone());
    }
}

/// Handle returned by [`Publisher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

impl SubscriptionId {
    /// Raw value for crossing the JS boundary.
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

/// Fan-out of frames to registered observers, in subscription order.
#[derive(Default)]
pub struct Publisher {
    observers: Vec<(SubscriptionId, Box<dyn FrameObserver>)>,
    next_id: u32,
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl FrameObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn publish(&mut self, frame: &GlowFrame) {
        for (_, observer) in &mut self.observers {
            observer.on_frame(frame);
        }
    }

    /// Drop every observer.
    pub fn clear(&mut self) {
        self.observers.clear();
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc::channel;

    #[test]
    fn closure_observer_sees_every_frame() {
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        let mut publisher = Publisher::new();
        publisher.subscribe(move |_: &GlowFrame| *counter.borrow_mut() += 1);

        publisher.publish(&GlowFrame::default());
        publisher.publish(&GlowFrame::default());

        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn channel_observer_receives_frames() {
        let (tx, rx) = channel();
        let mut publisher = Publisher::new();
        publisher.subscribe(tx);

        let frame = GlowFrame {
            active: true,
            ..GlowFrame::default()
        };
        publisher.publish(&frame);

        assert_eq!(rx.try_recv().unwrap(), frame);
    }

    #[test]
    fn dropped_receiver_is_harmless() {
        let (tx, rx) = channel::<GlowFrame>();
        drop(rx);
        let mut publisher = Publisher::new();
        publisher.subscribe(tx);
        publisher.publish(&GlowFrame::default());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        let mut publisher = Publisher::new();
        let id = publisher.subscribe(move |_: &GlowFrame| *counter.borrow_mut() += 1);

        assert!(publisher.unsubscribe(id));
        assert!(!publisher.unsubscribe(id));
        publisher.publish(&GlowFrame::default());

        assert_eq!(*seen.borrow(), 0);
        assert!(publisher.is_empty());
    }
}
