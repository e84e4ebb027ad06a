//! Table and column names shared by migrations and repositories.
//!
//! Keep these in sync with `migrations/0001_init.sql`.

pub const CATEGORY_TABLE: &str = "categories";
pub const CATEGORY_ID: &str = "category_id";
pub const CATEGORY_NAME: &str = "name";
pub const CATEGORY_ORDER: &str = "display_order";

pub const ITEM_TABLE: &str = "items";
pub const ITEM_ID: &str = "item_id";
/// Foreign reference column on `items`; shares its name with `CATEGORY_ID`.
pub const ITEM_CATEGORY_ID: &str = CATEGORY_ID;
pub const ITEM_TEXT: &str = "text";
pub const ITEM_DATE: &str = "date";
