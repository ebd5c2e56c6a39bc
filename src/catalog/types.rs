//! Catalog record types, as served by the upstream API.
//!
//! Upstream records are loosely typed: apart from `id`, any field may be
//! missing or `null` and decodes to its zero value.

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier shared by models, categories and manufacturers.
pub type ModelId = i64;

/// Technical details nested inside a [`CarModel`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    #[serde(default, deserialize_with = "null_as_default")]
    pub engine: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub horsepower: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transmission: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub drivetrain: String,
}

/// A car model snapshot.
///
/// Copied verbatim into the visitor's comparison list, so the JSON shape must
/// survive a session round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarModel {
    pub id: ModelId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub manufacturer_id: ModelId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_id: ModelId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specifications: Specification,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: ModelId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: ModelId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
