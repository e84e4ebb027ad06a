//! Queue-style observer backed by an mpsc channel.

use super::{StoreEvent, StoreObserver};
use log::debug;
use std::sync::mpsc::{self, Receiver, Sender};

/// Forwards every event into a channel so the consumer decides when to drain.
pub struct ChannelObserver {
    sender: Sender<StoreEvent>,
}

impl ChannelObserver {
    /// Returns the observer and the receiving end of its queue.
    pub fn new() -> (Self, Receiver<StoreEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl StoreObserver for ChannelObserver {
    fn on_event(&self, event: &StoreEvent) {
        if self.sender.send(event.clone()).is_err() {
            debug!("event=notify module=event status=skipped reason=receiver_dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelObserver;
    use crate::event::{ObjectAction, ObjectEvent, StoreEvent, StoreObserver};
    use crate::model::category::Category;

    #[test]
    fn forwards_events_and_survives_dropped_receiver() {
        let (observer, receiver) = ChannelObserver::new();
        let event = StoreEvent::Category(ObjectEvent::single(
            ObjectAction::Edited,
            Category::new("Home"),
        ));

        observer.on_event(&event);
        assert_eq!(receiver.try_recv().unwrap(), event);

        drop(receiver);
        observer.on_event(&event);
    }
}
