//! Tolerant encoding of the comparison and favorite lists.
//!
//! Reads accept every shape a [`SessionValue`] can take and normalize it to
//! the canonical typed list straight away. Writes always store a JSON string.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Session, SessionError, SessionValue};
use crate::catalog::{CarModel, ModelId};

/// Session key holding the comparison list (full model records).
pub const COMPARISONS_KEY: &str = "comparisons";
/// Session key holding the favorite model ids.
pub const FAVORITES_KEY: &str = "favorites";

pub fn read_comparisons(session: &Session) -> Result<Vec<CarModel>, SessionError> {
    decode_comparisons(session.get(COMPARISONS_KEY))
}

pub fn read_favorites(session: &Session) -> Result<Vec<ModelId>, SessionError> {
    decode_favorites(session.get(FAVORITES_KEY))
}

/// Store the comparison list and save the session.
pub fn write_comparisons(session: &mut Session, models: &[CarModel]) -> Result<(), SessionError> {
    write_json(session, COMPARISONS_KEY, models)
}

/// Store the favorite ids and save the session.
pub fn write_favorites(session: &mut Session, ids: &[ModelId]) -> Result<(), SessionError> {
    write_json(session, FAVORITES_KEY, ids)
}

/// Decode a raw comparison value.
///
/// Elements of a generic sequence that do not form a valid model are
/// dropped. Byte and string payloads must decode as a whole. The result is
/// unique by id (first occurrence wins) and holds no non-positive ids.
pub fn decode_comparisons(raw: Option<&SessionValue>) -> Result<Vec<CarModel>, SessionError> {
    let key = COMPARISONS_KEY;
    let models = match raw {
        None => return Ok(Vec::new()),
        Some(SessionValue::Models(models)) => models.clone(),
        Some(SessionValue::List(items)) => items
            .iter()
            .filter_map(|item| CarModel::deserialize(item).ok())
            .collect(),
        Some(SessionValue::Bytes(bytes)) => {
            serde_json::from_slice(bytes).map_err(|source| SessionError::Decode { key, source })?
        }
        Some(SessionValue::Text(text)) => {
            serde_json::from_str(text).map_err(|source| SessionError::Decode { key, source })?
        }
        Some(other) => {
            return Err(SessionError::UnsupportedValueType {
                key,
                found: other.kind(),
            });
        }
    };
    Ok(dedup_models(models))
}

/// Decode a raw favorites value.
///
/// Ids may arrive as integers, floats or numeric strings; anything else is
/// dropped. The result never holds duplicates or non-positive ids.
pub fn decode_favorites(raw: Option<&SessionValue>) -> Result<Vec<ModelId>, SessionError> {
    let key = FAVORITES_KEY;
    let ids = match raw {
        None => return Ok(Vec::new()),
        Some(SessionValue::Ids(ids)) => ids.clone(),
        Some(SessionValue::List(items)) => coerce_ids(items),
        Some(SessionValue::Bytes(bytes)) => {
            let items: Vec<Value> = serde_json::from_slice(bytes)
                .map_err(|source| SessionError::Decode { key, source })?;
            coerce_ids(&items)
        }
        Some(SessionValue::Text(text)) => {
            let items: Vec<Value> =
                serde_json::from_str(text).map_err(|source| SessionError::Decode { key, source })?;
            coerce_ids(&items)
        }
        Some(other) => {
            return Err(SessionError::UnsupportedValueType {
                key,
                found: other.kind(),
            });
        }
    };
    Ok(dedup_positive(ids))
}

fn coerce_ids(items: &[Value]) -> Vec<ModelId> {
    items.iter().filter_map(coerce_id).collect()
}

fn coerce_id(item: &Value) -> Option<ModelId> {
    match item {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as ModelId)
        }),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn dedup_models(models: Vec<CarModel>) -> Vec<CarModel> {
    let mut seen = HashSet::with_capacity(models.len());
    models
        .into_iter()
        .filter(|m| m.id > 0 && seen.insert(m.id))
        .collect()
}

fn dedup_positive(ids: Vec<ModelId>) -> Vec<ModelId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter()
        .filter(|&id| id > 0 && seen.insert(id))
        .collect()
}

fn write_json<T: Serialize + ?Sized>(
    session: &mut Session,
    key: &'static str,
    value: &T,
) -> Result<(), SessionError> {
    let json = serde_json::to_string(value).map_err(|source| SessionError::Encode { key, source })?;
    session.set(key, SessionValue::Text(json));
    session.save()
}
