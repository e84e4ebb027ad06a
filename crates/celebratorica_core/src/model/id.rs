//! Storage-assigned identifiers.
//!
//! Both ids wrap SQLite row ids. On the wire they travel as decimal strings,
//! and an empty string stands for "not persisted".

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Row id of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub i64);

/// Row id of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub i64);

/// Conversion shared by both id newtypes.
pub trait RowId: Copy {
    fn from_raw(value: i64) -> Self;
    fn raw(self) -> i64;
}

impl RowId for CategoryId {
    fn from_raw(value: i64) -> Self {
        Self(value)
    }

    fn raw(self) -> i64 {
        self.0
    }
}

impl RowId for ItemId {
    fn from_raw(value: i64) -> Self {
        Self(value)
    }

    fn raw(self) -> i64 {
        self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CategoryId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(Self)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse().map(Self)
    }
}

/// Accepts both `"12"` and `12`; exports written by older builds used numbers.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Number(i64),
}

fn parse_repr<T: RowId, E: serde::de::Error>(repr: IdRepr) -> Result<Option<T>, E> {
    match repr {
        IdRepr::Number(value) => Ok(Some(T::from_raw(value))),
        IdRepr::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(|value| Some(T::from_raw(value)))
                .map_err(|_| E::custom(format!("invalid id `{trimmed}`")))
        }
    }
}

fn serialize_raw<S: Serializer>(value: i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

fn deserialize_required<'de, D: Deserializer<'de>, T: RowId>(
    deserializer: D,
) -> Result<T, D::Error> {
    parse_repr::<T, D::Error>(IdRepr::deserialize(deserializer)?)?
        .ok_or_else(|| D::Error::custom("id cannot be empty"))
}

impl Serialize for CategoryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_raw(self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_required(deserializer)
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_raw(self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_required(deserializer)
    }
}

/// `#[serde(with = ...)]` adapter writing `None` as `""`.
pub mod optional {
    use super::{parse_repr, serialize_raw, IdRepr, RowId};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer, T: RowId>(
        value: &Option<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(id) => serialize_raw(id.raw(), serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>, T: RowId>(
        deserializer: D,
    ) -> Result<Option<T>, D::Error> {
        match Option::<IdRepr>::deserialize(deserializer)? {
            Some(repr) => parse_repr(repr),
            None => Ok(None),
        }
    }
}
