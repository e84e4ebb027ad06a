//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the Category Store, Item Store and
//!   Import/Export Merger APIs.
//! - Publish change notifications for every completed mutation.
//! - Keep collaborators decoupled from storage details.

pub mod category_service;
pub mod item_service;
pub mod transfer_service;
