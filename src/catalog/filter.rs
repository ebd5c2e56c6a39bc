//! Listing filters.

use url::form_urlencoded;

use super::{CarModel, ModelId};

/// Category/manufacturer filter for the home listing.
///
/// `None` on an axis means "no filter". Query values that are missing,
/// non-numeric or `0` all map to `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: Option<ModelId>,
    pub manufacturer: Option<ModelId>,
}

impl CatalogFilter {
    /// Build a filter from raw query-string values.
    pub fn from_query(category: Option<&str>, manufacturer: Option<&str>) -> Self {
        Self {
            category: parse_axis(category),
            manufacturer: parse_axis(manufacturer),
        }
    }

    /// Build a filter from a raw query string such as `category=2&manufacturer=0`.
    ///
    /// When a key repeats, its first value is used.
    pub fn from_query_string(raw: Option<&str>) -> Self {
        let mut category = None;
        let mut manufacturer = None;
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "category" if category.is_none() => category = Some(value),
                "manufacturer" if manufacturer.is_none() => manufacturer = Some(value),
                _ => {}
            }
        }
        Self::from_query(category.as_deref(), manufacturer.as_deref())
    }

    pub fn matches(&self, model: &CarModel) -> bool {
        self.category.is_none_or(|c| model.category_id == c)
            && self.manufacturer.is_none_or(|m| model.manufacturer_id == m)
    }

    /// Keep the models that pass the filter, preserving order.
    pub fn apply(&self, models: &[CarModel]) -> Vec<CarModel> {
        models.iter().filter(|m| self.matches(m)).cloned().collect()
    }
}

fn parse_axis(raw: Option<&str>) -> Option<ModelId> {
    raw.and_then(|v| v.trim().parse::<ModelId>().ok())
        .filter(|&id| id != 0)
}
