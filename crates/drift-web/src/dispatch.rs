//! Page callbacks and frame delivery outside the runner borrow.

use std::cell::RefCell;
use std::thread::LocalKey;

use drift_engine::{FrameObserver, RegionProvider, SubscriptionId};

use crate::runner::FieldRunner;

/// The `thread_local!` cell holding the page's runner.
pub type RunnerSlot<P> = RefCell<Option<FieldRunner<P>>>;

/// Callbacks registered by the page.
///
/// Kept apart from the runner: a subscription can be made before the
/// field starts and stays in place when the field is started again.
pub struct Subscribers<O> {
    entries: Vec<(SubscriptionId, O)>,
    next_id: u32,
}

impl<O> Default for Subscribers<O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<O: FrameObserver + Clone> Subscribers<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: O) -> SubscriptionId {
        let id = SubscriptionId::from_raw(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Returns false for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(sid, _)| *sid != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn snapshot(&self) -> Vec<O> {
        self.entries.iter().map(|(_, o)| o.clone()).collect()
    }
}

/// Run `f` against the runner in `slot`.
///
/// `None` when there is no runner, or when it is already borrowed further up
/// the stack.
pub fn with_runner<P, R>(
    slot: &'static LocalKey<RunnerSlot<P>>,
    f: impl FnOnce(&mut FieldRunner<P>) -> R,
) -> Option<R>
where
    P: RegionProvider + 'static,
{
    slot.with(|cell| match cell.try_borrow_mut() {
        Ok(mut runner) => runner.as_mut().map(f),
        Err(_) => {
            log::warn!("drift field busy, call ignored");
            None
        }
    })
}

/// Tick the runner, release it, then hand each stepped frame to every
/// subscriber.
///
/// Callbacks see the subscriber list as it was when delivery began and are
/// free to call back into the runner or the registry.
pub fn tick_and_deliver<P, O>(
    slot: &'static LocalKey<RunnerSlot<P>>,
    subscribers: &'static LocalKey<RefCell<Subscribers<O>>>,
    dt: f32,
) where
    P: RegionProvider + 'static,
    O: FrameObserver + Clone + 'static,
{
    let frames = with_runner(slot, |r| {
        r.tick(dt);
        r.take_frames()
    })
    .unwrap_or_default();
    if frames.is_empty() {
        return;
    }

    let mut observers = subscribers.with(|s| s.borrow().snapshot());
    for frame in &frames {
        for observer in &mut observers {
            observer.on_frame(frame);
        }
    }
}
