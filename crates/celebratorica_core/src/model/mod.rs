//! Domain model for categories and their dated items.
//!
//! # Responsibility
//! - Define the records passed between stores, the merger and observers.
//! - Own validation rules applied before any write reaches SQLite.
//!
//! # Invariants
//! - Ids are assigned by storage; an absent id means "not persisted yet".
//! - Category names are stored in normalized form (see `normalize_category_name`).

pub mod category;
pub mod id;
pub mod item;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Category name is empty after whitespace normalization.
    EmptyCategoryName,
    /// Display order must be a positive, 1-based rank.
    InvalidOrder(i64),
    /// Edit/remove was requested for an entity without a persisted id.
    MissingId(&'static str),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCategoryName => write!(f, "category name cannot be empty"),
            Self::InvalidOrder(order) => {
                write!(f, "category order must be >= 1, got {order}")
            }
            Self::MissingId(kind) => write!(f, "{kind} has no persisted id"),
        }
    }
}

impl Error for ModelError {}
