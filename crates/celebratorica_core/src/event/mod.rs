//! Change notifications for store collaborators.
//!
//! # Responsibility
//! - Describe requests (`Add`/`Edit`/`Remove`) and completions
//!   (`Added`/`Edited`/`Removed`/`GetResponse`) for categories and items.
//! - Fan completed mutations out to explicitly registered observers.
//!
//! # Invariants
//! - Observers run synchronously, in registration order, after the mutation
//!   has been written.
//! - Observers never receive a store handle, so they cannot re-enter it.

mod channel;

pub use channel::ChannelObserver;

use crate::model::category::Category;
use crate::model::item::Item;
use log::debug;
use serde::{Deserialize, Serialize};

/// Action tag carried by every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectAction {
    Add,
    Added,
    Edit,
    Edited,
    Remove,
    Removed,
    GetResponse,
}

impl ObjectAction {
    /// Maps a request to the action announced once it has been performed.
    pub fn completion(self) -> Option<Self> {
        match self {
            Self::Add => Some(Self::Added),
            Self::Edit => Some(Self::Edited),
            Self::Remove => Some(Self::Removed),
            Self::Added | Self::Edited | Self::Removed | Self::GetResponse => None,
        }
    }

    pub fn is_request(self) -> bool {
        self.completion().is_some()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Added => "added",
            Self::Edit => "edit",
            Self::Edited => "edited",
            Self::Remove => "remove",
            Self::Removed => "removed",
            Self::GetResponse => "get_response",
        }
    }
}

/// One action applied to one or more entities of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEvent<T> {
    pub action: ObjectAction,
    pub objects: Vec<T>,
}

impl<T> ObjectEvent<T> {
    pub fn new(action: ObjectAction, objects: Vec<T>) -> Self {
        Self { action, objects }
    }

    pub fn single(action: ObjectAction, object: T) -> Self {
        Self::new(action, vec![object])
    }

    pub fn first_object(&self) -> Option<&T> {
        self.objects.first()
    }
}

pub type CategoryEvent = ObjectEvent<Category>;
pub type ItemEvent = ObjectEvent<Item>;

/// Event envelope keyed by entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event")]
pub enum StoreEvent {
    Category(CategoryEvent),
    Item(ItemEvent),
}

impl StoreEvent {
    pub fn action(&self) -> ObjectAction {
        match self {
            Self::Category(event) => event.action,
            Self::Item(event) => event.action,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Category(_) => "category",
            Self::Item(_) => "item",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Category(event) => event.objects.len(),
            Self::Item(event) => event.objects.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<CategoryEvent> for StoreEvent {
    fn from(value: CategoryEvent) -> Self {
        Self::Category(value)
    }
}

impl From<ItemEvent> for StoreEvent {
    fn from(value: ItemEvent) -> Self {
        Self::Item(value)
    }
}

/// Receiver of completed store events.
pub trait StoreObserver: Send {
    fn on_event(&self, event: &StoreEvent);
}

impl<F> StoreObserver for F
where
    F: Fn(&StoreEvent) + Send,
{
    fn on_event(&self, event: &StoreEvent) {
        self(event)
    }
}

/// Registry of observers owned by the store.
#[derive(Default)]
pub struct EventHub {
    observers: Vec<Box<dyn StoreObserver>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl StoreObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Delivers `event` to every observer. Empty payloads are dropped.
    pub fn publish(&self, event: StoreEvent) {
        if event.is_empty() {
            return;
        }
        debug!(
            "event=notify module=event kind={} action={} objects={} observers={}",
            event.kind(),
            event.action().as_str(),
            event.len(),
            self.observers.len()
        );
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventHub, ObjectAction, ObjectEvent, StoreEvent};
    use crate::model::category::Category;
    use std::sync::{Arc, Mutex};

    #[test]
    fn completion_maps_requests_only() {
        assert_eq!(ObjectAction::Add.completion(), Some(ObjectAction::Added));
        assert_eq!(ObjectAction::Edit.completion(), Some(ObjectAction::Edited));
        assert_eq!(ObjectAction::Remove.completion(), Some(ObjectAction::Removed));
        assert_eq!(ObjectAction::GetResponse.completion(), None);
        assert!(!ObjectAction::Added.is_request());
    }

    #[test]
    fn publish_reaches_observers_in_order_and_skips_empty_payloads() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hub = EventHub::new();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            hub.subscribe(move |event: &StoreEvent| {
                seen.lock().unwrap().push((tag, event.action()));
            });
        }

        hub.publish(StoreEvent::Category(ObjectEvent::new(
            ObjectAction::Removed,
            Vec::new(),
        )));
        hub.publish(ObjectEvent::single(ObjectAction::Added, Category::new("Work")).into());

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("first", ObjectAction::Added),
                ("second", ObjectAction::Added)
            ]
        );
    }

    #[test]
    fn action_tags_serialize_in_screaming_case() {
        let json = serde_json::to_string(&ObjectAction::GetResponse).unwrap();
        assert_eq!(json, "\"GET_RESPONSE\"");
    }
}
