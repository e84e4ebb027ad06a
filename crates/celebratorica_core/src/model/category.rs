//! Category domain model.
//!
//! # Responsibility
//! - Define a named, ordered grouping of items (rendered as one tab).
//! - Normalize names so case-insensitive matching is stable.
//!
//! # Invariants
//! - Persisted orders form a dense 1-based sequence.
//! - `order <= 0` on an unsaved category means "append at the end".

use crate::model::id::{self, CategoryId};
use crate::model::ModelError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Named, ordered list of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Storage-assigned id; `None` until persisted.
    #[serde(default, with = "id::optional")]
    pub id: Option<CategoryId>,
    pub name: String,
    /// 1-based display rank. Zero or negative requests an append on insert.
    #[serde(default)]
    pub order: i64,
}

impl Category {
    /// Creates an unsaved category that will be appended after the last one.
    pub fn new(name: impl Into<String>) -> Self {
        Self::at_order(name, 0)
    }

    /// Creates an unsaved category that will be inserted at `order`,
    /// pushing existing categories from that rank onwards down by one.
    pub fn at_order(name: impl Into<String>, order: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            order,
        }
    }

    /// Checks rules shared by insert and update paths.
    pub fn validate(&self) -> Result<(), ModelError> {
        if normalize_category_name(&self.name).is_empty() {
            return Err(ModelError::EmptyCategoryName);
        }
        Ok(())
    }

    /// Checks rules for editing an already persisted category.
    pub fn validate_for_update(&self) -> Result<CategoryId, ModelError> {
        self.validate()?;
        if self.order < 1 {
            return Err(ModelError::InvalidOrder(self.order));
        }
        self.persisted_id()
    }

    pub fn persisted_id(&self) -> Result<CategoryId, ModelError> {
        self.id.ok_or(ModelError::MissingId("category"))
    }
}

/// Trims and collapses internal whitespace runs to a single space.
pub fn normalize_category_name(name: &str) -> String {
    WHITESPACE_RE.replace_all(name.trim(), " ").into_owned()
}
