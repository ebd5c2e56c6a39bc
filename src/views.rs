//! Page view models and template rendering.
//!
//! Each route renders exactly one view struct; the struct's fields are the
//! only variables its template can see.

use std::collections::HashMap;

use minijinja::Environment;
use serde::Serialize;

use crate::catalog::{CarModel, CatalogFilter, Category, Manufacturer, ModelId};

/// Compiled page templates.
///
/// Templates are embedded at build time; `.html` names are auto-escaped.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", include_str!("../templates/layout.html"))?;
        env.add_template("index.html", include_str!("../templates/index.html"))?;
        env.add_template(
            "comparisons.html",
            include_str!("../templates/comparisons.html"),
        )?;
        Ok(Self { env })
    }

    pub fn render<V: Serialize>(&self, name: &str, view: &V) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(view)
    }
}

/// Context for `GET /`.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub title: &'static str,
    pub cars: Vec<CarModel>,
    pub categories: Vec<Category>,
    pub manufacturers: Vec<Manufacturer>,
    pub recommendations: Vec<CarModel>,
    /// Favorited ids that still exist in the catalog.
    pub favorite_ids: Vec<ModelId>,
    pub selected_category: Option<ModelId>,
    pub selected_manufacturer: Option<ModelId>,
}

impl HomeView {
    pub fn new(
        models: &[CarModel],
        filter: CatalogFilter,
        categories: Vec<Category>,
        manufacturers: Vec<Manufacturer>,
        favorites: &[ModelId],
    ) -> Self {
        let recommendations = recommendations(models, favorites);
        let favorite_ids = recommendations.iter().map(|m| m.id).collect();
        Self {
            title: "Home",
            cars: filter.apply(models),
            categories,
            manufacturers,
            recommendations,
            favorite_ids,
            selected_category: filter.category,
            selected_manufacturer: filter.manufacturer,
        }
    }
}

/// Context for `GET /comparisons`.
#[derive(Debug, Serialize)]
pub struct ComparisonsView {
    pub title: &'static str,
    pub models: Vec<CarModel>,
}

impl ComparisonsView {
    pub fn new(models: Vec<CarModel>) -> Self {
        Self {
            title: "Car Comparison",
            models,
        }
    }
}

/// Resolve favorite ids against the full catalog, in favorite order.
///
/// Ids missing from the catalog (discontinued models) are skipped.
pub fn recommendations(models: &[CarModel], favorites: &[ModelId]) -> Vec<CarModel> {
    if favorites.is_empty() {
        return Vec::new();
    }
    let lookup: HashMap<ModelId, &CarModel> = models.iter().map(|m| (m.id, m)).collect();
    favorites
        .iter()
        .filter_map(|id| lookup.get(id).map(|m| (*m).clone()))
        .collect()
}
