//! Comparison and favorite list operations.
//!
//! Each operation reads the list from the session, applies the change and
//! writes it back (read-decode-modify-encode-save). Nothing here is
//! transactional.

use tracing::warn;

use crate::catalog::{CarModel, ModelId};
use crate::session::{Session, SessionError, codec};

/// Default comparison list capacity.
pub const DEFAULT_MAX_COMPARISONS: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("invalid model id {0}")]
    InvalidModel(ModelId),

    #[error("invalid id {0}")]
    InvalidId(ModelId),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Add `model` to the visitor's comparison list.
///
/// Returns `Ok(false)` without touching the session when the model is
/// already listed. When the list grows past `max` the oldest entries are
/// evicted. A `max` of zero disables the cap.
pub fn add_comparison(
    session: &mut Session,
    model: CarModel,
    max: usize,
) -> Result<bool, ListError> {
    if model.id <= 0 {
        return Err(ListError::InvalidModel(model.id));
    }

    let mut models = codec::read_comparisons(session).unwrap_or_else(|e| {
        warn!(name: "comparisons.read.failed", error = %e, "Discarding unreadable comparisons");
        Vec::new()
    });

    if !push_capped(&mut models, model, max) {
        return Ok(false);
    }

    codec::write_comparisons(session, &models)?;
    Ok(true)
}

/// Remove the model with `id` from the comparison list.
///
/// Returns `Ok(false)` and leaves the session untouched if it was not listed.
pub fn remove_comparison(session: &mut Session, id: ModelId) -> Result<bool, ListError> {
    let mut models = codec::read_comparisons(session)?;

    let before = models.len();
    models.retain(|m| m.id != id);
    if models.len() == before {
        return Ok(false);
    }

    codec::write_comparisons(session, &models)?;
    Ok(true)
}

/// Flip `id` in the favorites set.
///
/// Returns `true` when the id was added and `false` when it was removed.
pub fn toggle_favorite(session: &mut Session, id: ModelId) -> Result<bool, ListError> {
    if id <= 0 {
        return Err(ListError::InvalidId(id));
    }

    let mut ids = codec::read_favorites(session).unwrap_or_else(|e| {
        warn!(name: "favorites.read.failed", error = %e, "Discarding unreadable favorites");
        Vec::new()
    });

    let added = toggle_id(&mut ids, id);
    codec::write_favorites(session, &ids)?;
    Ok(added)
}

/// Append `model` unless its id is already present, then evict from the front
/// until at most `max` remain.
fn push_capped(models: &mut Vec<CarModel>, model: CarModel, max: usize) -> bool {
    if models.iter().any(|m| m.id == model.id) {
        return false;
    }

    models.push(model);
    if max > 0 && models.len() > max {
        let excess = models.len() - max;
        models.drain(..excess);
    }
    true
}

fn toggle_id(ids: &mut Vec<ModelId>, id: ModelId) -> bool {
    if let Some(pos) = ids.iter().position(|&v| v == id) {
        ids.remove(pos);
        false
    } else {
        ids.push(id);
        true
    }
}
