//! Item domain model: one dated text entry inside a category.

use crate::model::id::{self, CategoryId, ItemId};
use crate::model::ModelError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Storage-assigned id; `None` until persisted.
    #[serde(default, with = "id::optional")]
    pub id: Option<ItemId>,
    pub category_id: CategoryId,
    #[serde(default)]
    pub text: String,
    /// Unix epoch milliseconds.
    pub date: i64,
}

impl Item {
    /// Creates an unsaved item.
    pub fn new(category_id: CategoryId, text: impl Into<String>, date: i64) -> Self {
        Self {
            id: None,
            category_id,
            text: text.into(),
            date,
        }
    }

    pub fn persisted_id(&self) -> Result<ItemId, ModelError> {
        self.id.ok_or(ModelError::MissingId("item"))
    }
}
