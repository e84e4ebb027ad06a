//! Category use-case service.
//!
//! # Responsibility
//! - Provide the Category Store entry points used by collaborators.
//! - Announce every completed mutation through the event hub.
//!
//! # Invariants
//! - Exactly one event is published per call; batch calls carry every
//!   affected category in that one event.
//! - Events are published only for mutations that reached storage.

use crate::event::{CategoryEvent, EventHub, ObjectAction};
use crate::model::category::Category;
use crate::model::id::CategoryId;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoResult;
use log::info;

/// Category Store: repository access plus change notifications.
pub struct CategoryService<'hub, R: CategoryRepository> {
    repo: R,
    events: &'hub EventHub,
}

impl<'hub, R: CategoryRepository> CategoryService<'hub, R> {
    pub fn new(repo: R, events: &'hub EventHub) -> Self {
        Self { repo, events }
    }

    /// Lists categories sorted by ascending order.
    pub fn list(&self) -> RepoResult<Vec<Category>> {
        self.repo.list_categories()
    }

    pub fn get(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        self.repo.get_category(id)
    }

    /// Case-insensitive lookup by name.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        self.repo.find_category_by_name(name)
    }

    /// Lists categories and publishes them as a `GetResponse`.
    pub fn refresh(&self) -> RepoResult<Vec<Category>> {
        let categories = self.repo.list_categories()?;
        self.publish(ObjectAction::GetResponse, categories.clone());
        Ok(categories)
    }

    /// Adds one category and publishes `Added`.
    ///
    /// # Contract
    /// - Positive `order`: categories from that order onwards shift down by one.
    /// - Otherwise the category is appended after the current last one.
    /// - The returned category carries its new id and effective order.
    pub fn add(&self, category: &Category) -> RepoResult<Category> {
        let added = self.repo.insert_category(category)?;
        info!(
            "event=category_add module=service status=ok category_id={} order={}",
            display_id(&added),
            added.order
        );
        self.publish(ObjectAction::Added, vec![added.clone()]);
        Ok(added)
    }

    /// Overwrites name and order of an existing category and publishes `Edited`.
    pub fn update(&self, category: &Category) -> RepoResult<Category> {
        let updated = self.repo.update_category(category)?;
        self.publish(ObjectAction::Edited, vec![updated.clone()]);
        Ok(updated)
    }

    /// Moves a category to another display position and publishes `Edited`.
    pub fn reorder(&self, id: CategoryId, order: i64) -> RepoResult<Category> {
        let moved = self.repo.move_category(id, order)?;
        self.publish(ObjectAction::Edited, vec![moved.clone()]);
        Ok(moved)
    }

    /// Removes a category, closes the order gap and publishes `Removed`.
    ///
    /// Items of the category are left in place.
    pub fn remove(&self, category: &Category) -> RepoResult<Category> {
        let removed = self.repo.delete_category(category.persisted_id()?)?;
        self.publish(ObjectAction::Removed, vec![removed.clone()]);
        Ok(removed)
    }

    /// Adds categories one after another; see [`Self::add`].
    pub fn add_all(&self, categories: &[Category]) -> RepoResult<Vec<Category>> {
        self.apply_all(categories, ObjectAction::Added, |repo, category| {
            repo.insert_category(category)
        })
    }

    pub fn update_all(&self, categories: &[Category]) -> RepoResult<Vec<Category>> {
        self.apply_all(categories, ObjectAction::Edited, |repo, category| {
            repo.update_category(category)
        })
    }

    pub fn remove_all(&self, categories: &[Category]) -> RepoResult<Vec<Category>> {
        self.apply_all(categories, ObjectAction::Removed, |repo, category| {
            repo.delete_category(category.persisted_id()?)
        })
    }

    /// Applies `op` in sequence. On failure the categories handled so far stay
    /// written and are still announced before the error is returned.
    fn apply_all(
        &self,
        categories: &[Category],
        action: ObjectAction,
        op: impl Fn(&R, &Category) -> RepoResult<Category>,
    ) -> RepoResult<Vec<Category>> {
        let mut done = Vec::with_capacity(categories.len());
        for category in categories {
            match op(&self.repo, category) {
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

    fn publish(&self, action: ObjectAction, categories: Vec<Category>) {
        self.events
            .publish(CategoryEvent::new(action, categories).into());
    }
}

fn display_id(category: &Category) -> String {
    category
        .id
        .map(|id| id.to_string())
        .unwrap_or_default()
}
