//! Item use-case service.
//!
//! # Responsibility
//! - Provide the Item Store entry points used by collaborators.
//! - Announce every completed mutation through the event hub.

use crate::event::{EventHub, ItemEvent, ObjectAction};
use crate::model::id::{CategoryId, ItemId};
use crate::model::item::Item;
use crate::repo::item_repo::ItemRepository;
use crate::repo::RepoResult;

/// Item Store: repository access plus change notifications.
pub struct ItemService<'hub, R: ItemRepository> {
    repo: R,
    events: &'hub EventHub,
}

impl<'hub, R: ItemRepository> ItemService<'hub, R> {
    pub fn new(repo: R, events: &'hub EventHub) -> Self {
        Self { repo, events }
    }

    /// Lists items newest first; `None` lists across all categories.
    pub fn list(&self, category_id: Option<CategoryId>) -> RepoResult<Vec<Item>> {
        self.repo.list_items(category_id)
    }

    pub fn get(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.get_item(id)
    }

    pub fn count(&self, category_id: CategoryId) -> RepoResult<u64> {
        self.repo.count_items(category_id)
    }

    /// Lists items and publishes them as a `GetResponse`.
    pub fn refresh(&self, category_id: Option<CategoryId>) -> RepoResult<Vec<Item>> {
        let items = self.repo.list_items(category_id)?;
        self.publish(ObjectAction::GetResponse, items.clone());
        Ok(items)
    }

    /// Persists a new item and publishes `Added`.
    pub fn add(&self, item: &Item) -> RepoResult<Item> {
        let added = self.repo.insert_item(item)?;
        self.publish(ObjectAction::Added, vec![added.clone()]);
        Ok(added)
    }

    /// Overwrites text and date and publishes `Edited`.
    pub fn update(&self, item: &Item) -> RepoResult<Item> {
        let updated = self.repo.update_item(item)?;
        self.publish(ObjectAction::Edited, vec![updated.clone()]);
        Ok(updated)
    }

    /// Deletes an item and publishes `Removed`.
    pub fn remove(&self, item: &Item) -> RepoResult<Item> {
        let removed = self.repo.delete_item(item.persisted_id()?)?;
        self.publish(ObjectAction::Removed, vec![removed.clone()]);
        Ok(removed)
    }

    pub fn add_all(&self, items: &[Item]) -> RepoResult<Vec<Item>> {
        self.apply_all(items, ObjectAction::Added, |repo, item| repo.insert_item(item))
    }

    pub fn update_all(&self, items: &[Item]) -> RepoResult<Vec<Item>> {
        self.apply_all(items, ObjectAction::Edited, |repo, item| repo.update_item(item))
    }

    pub fn remove_all(&self, items: &[Item]) -> RepoResult<Vec<Item>> {
        self.apply_all(items, ObjectAction::Removed, |repo, item| {
            repo.delete_item(item.persisted_id()?)
        })
    }

    fn apply_all(
        &self,
        items: &[Item],
        action: ObjectAction,
        op: impl Fn(&R, &Item) -> RepoResult<Item>,
    ) -> RepoResult<Vec<Item>> {
        let mut done = Vec::with_capacity(items.len());
        for item in items {
            match op(&self.repo, item) {
                Ok(result) => done.push(result),
                Err(err) => {
                    self.publish(action, done);
                    return Err(err);
                }
            }
        }
        self.publish(action, done.clone());
        Ok(done)
    }

    fn publish(&self, action: ObjectAction, items: Vec<Item>) {
        self.events.publish(ItemEvent::new(action, items).into());
    }
}
