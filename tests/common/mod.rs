//! Shared fixtures for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use car_catalog_web::{
    AppState,
    catalog::{CarModel, Catalog, CatalogError, Category, Manufacturer, ModelId, Specification},
    config::{AppConfig, CatalogConfig, ComparisonConfig, ServerConfig, SessionConfig},
    server::build_router,
    session::{SessionBackend, SessionId},
    views::Templates,
};
use tower::ServiceExt;

pub const COOKIE_NAME: &str = "catalog_session";

/// In-memory catalog with switchable failures.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    pub models: Vec<CarModel>,
    pub categories: Vec<Category>,
    pub manufacturers: Vec<Manufacturer>,
    pub fail_models: bool,
    pub fail_secondary: bool,
}

fn unavailable(path: &str) -> CatalogError {
    CatalogError::Status {
        status: 503,
        url: format!("http://catalog.test{path}"),
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn fetch_models(&self) -> Result<Vec<CarModel>, CatalogError> {
        if self.fail_models {
            return Err(unavailable("/api/models"));
        }
        Ok(self.models.clone())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        if self.fail_secondary {
            return Err(unavailable("/api/categories"));
        }
        Ok(self.categories.clone())
    }

    async fn fetch_manufacturers(&self) -> Result<Vec<Manufacturer>, CatalogError> {
        if self.fail_secondary {
            return Err(unavailable("/api/manufacturers"));
        }
        Ok(self.manufacturers.clone())
    }

    async fn fetch_model_by_id(&self, id: ModelId) -> Result<CarModel, CatalogError> {
        self.fetch_models()
            .await?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or(CatalogError::NotFound(id))
    }
}

pub fn car(id: ModelId, name: &str, manufacturer_id: ModelId, category_id: ModelId) -> CarModel {
    CarModel {
        id,
        name: name.to_string(),
        manufacturer_id,
        category_id,
        year: 2023,
        specifications: Specification {
            engine: "2.5L I4".to_string(),
            horsepower: 200,
            transmission: "CVT".to_string(),
            drivetrain: "FWD".to_string(),
        },
        image: format!("/images/{id}.jpg"),
    }
}

/// A small catalog: six models over two categories and two manufacturers.
pub fn sample_catalog() -> StaticCatalog {
    StaticCatalog {
        models: vec![
            car(1, "Aurora", 1, 1),
            car(2, "Borealis", 2, 2),
            car(3, "Cirrus", 1, 2),
            car(4, "Dynamo", 2, 1),
            car(5, "Eclipse", 1, 1),
            car(6, "Fjord", 2, 2),
        ],
        categories: vec![
            Category {
                id: 1,
                name: "Sedan".to_string(),
            },
            Category {
                id: 2,
                name: "Crossover".to_string(),
            },
        ],
        manufacturers: vec![
            Manufacturer {
                id: 1,
                name: "Northwind Motors".to_string(),
            },
            Manufacturer {
                id: 2,
                name: "Southgate Auto".to_string(),
            },
        ],
        ..StaticCatalog::default()
    }
}

pub fn test_config(static_dir: &str) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            static_dir: static_dir.to_string(),
            request_timeout_secs: 30,
        },
        catalog: CatalogConfig {
            base_url: "http://catalog.test".to_string(),
            timeout_secs: 3,
        },
        session: SessionConfig {
            cookie_name: COOKIE_NAME.to_string(),
            ttl_secs: 1800,
        },
        comparison: ComparisonConfig { max_items: 4 },
    }
}

pub fn test_app(catalog: StaticCatalog, sessions: Arc<dyn SessionBackend>) -> Router {
    test_app_with_config(catalog, sessions, test_config("public"))
}

pub fn test_app_with_config(
    catalog: StaticCatalog,
    sessions: Arc<dyn SessionBackend>,
    config: AppConfig,
) -> Router {
    build_router(AppState {
        catalog: Arc::new(catalog),
        sessions,
        templates: Arc::new(Templates::new().expect("templates compile")),
        config: Arc::new(config),
    })
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router is infallible")
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// The `name=value` pair from the response's session `Set-Cookie`, if any.
pub fn issued_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(COOKIE_NAME))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn session_id(cookie: &str) -> SessionId {
    let value = cookie
        .split_once('=')
        .map(|(_, v)| v)
        .expect("cookie pair");
    SessionId::parse(value).expect("session id is a uuid")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect location")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
